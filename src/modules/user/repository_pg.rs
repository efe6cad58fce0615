use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        store::repository_pg::PgStore,
        user::{
            model::{UpdateCapabilities, UserSearch},
            repository::UserRepository,
            schema::UserEntity,
        },
    },
};

fn like_pattern(value: &str) -> String {
    format!("%{}%", value.replace('%', "\\%").replace('_', "\\_"))
}

#[async_trait::async_trait]
impl UserRepository for PgStore {
    async fn find_by_id(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<UserEntity>, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(tx.as_mut())
            .await?;
        Ok(user)
    }

    async fn find_by_ids(
        &self,
        ids: &[Uuid],
        tx: &mut Self::Tx,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = sqlx::query_as::<_, UserEntity>(
            "SELECT * FROM users WHERE id = ANY($1) ORDER BY name",
        )
        .bind(ids)
        .fetch_all(tx.as_mut())
        .await?;
        Ok(users)
    }

    async fn update_capabilities(
        &self,
        id: &Uuid,
        capabilities: &UpdateCapabilities,
        tx: &mut Self::Tx,
    ) -> Result<UserEntity, error::SystemError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users
            SET
                is_owner   = COALESCE($2, is_owner),
                is_sitter  = COALESCE($3, is_sitter),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(capabilities.is_owner)
        .bind(capabilities.is_sitter)
        .fetch_optional(tx.as_mut())
        .await?
        .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        Ok(user)
    }

    async fn search_users(
        &self,
        search: &UserSearch,
        exclude_id: &Uuid,
        limit: i64,
        tx: &mut Self::Tx,
    ) -> Result<Vec<UserEntity>, error::SystemError> {
        let users = match search {
            UserSearch::Email(email) => {
                sqlx::query_as::<_, UserEntity>(
                    r#"
                    SELECT * FROM users
                    WHERE id <> $1
                    AND lower(email) LIKE $2
                    ORDER BY id
                    LIMIT $3
                    "#,
                )
                .bind(exclude_id)
                .bind(like_pattern(email))
                .bind(limit)
                .fetch_all(tx.as_mut())
                .await?
            }
            UserSearch::NameTokens(tokens) => {
                let patterns: Vec<String> = tokens.iter().map(|t| like_pattern(t)).collect();
                sqlx::query_as::<_, UserEntity>(
                    r#"
                    SELECT * FROM users
                    WHERE id <> $1
                    AND lower(name) LIKE ALL($2)
                    ORDER BY id
                    LIMIT $3
                    "#,
                )
                .bind(exclude_id)
                .bind(&patterns)
                .bind(limit)
                .fetch_all(tx.as_mut())
                .await?
            }
        };
        Ok(users)
    }
}
