use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        friend::{
            repository::FriendshipRepository,
            schema::{FriendshipEntity, FriendshipStatus},
        },
        store::repository_pg::PgStore,
    },
};

#[async_trait::async_trait]
impl FriendshipRepository for PgStore {
    async fn find_between(
        &self,
        user_id_a: &Uuid,
        user_id_b: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<FriendshipEntity>, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE
                (requester_id = $1 AND addressee_id = $2)
            OR (requester_id = $2 AND addressee_id = $1)
            "#,
        )
        .bind(user_id_a)
        .bind(user_id_b)
        .fetch_optional(tx.as_mut())
        .await?;

        Ok(friendship)
    }

    async fn find_accepted_for(
        &self,
        user_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE status = $2
            AND (requester_id = $1 OR addressee_id = $1)
            "#,
        )
        .bind(user_id)
        .bind(FriendshipStatus::Accepted)
        .fetch_all(tx.as_mut())
        .await?;

        Ok(rows)
    }

    async fn find_pending_from(
        &self,
        requester_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE requester_id = $1 AND status = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(requester_id)
        .bind(FriendshipStatus::Pending)
        .fetch_all(tx.as_mut())
        .await?;

        Ok(rows)
    }

    async fn find_pending_to(
        &self,
        addressee_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE addressee_id = $1 AND status = $2
            ORDER BY created_at DESC
            "#,
        )
        .bind(addressee_id)
        .bind(FriendshipStatus::Pending)
        .fetch_all(tx.as_mut())
        .await?;

        Ok(rows)
    }

    async fn find_touching(
        &self,
        user_id: &Uuid,
        others: &[Uuid],
        tx: &mut Self::Tx,
    ) -> Result<Vec<FriendshipEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            SELECT *
            FROM friendships
            WHERE
                (requester_id = $1 AND addressee_id = ANY($2))
            OR (addressee_id = $1 AND requester_id = ANY($2))
            "#,
        )
        .bind(user_id)
        .bind(others)
        .fetch_all(tx.as_mut())
        .await?;

        Ok(rows)
    }

    async fn create_request(
        &self,
        requester_id: &Uuid,
        addressee_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            INSERT INTO friendships (id, requester_id, addressee_id, status)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(requester_id)
        .bind(addressee_id)
        .bind(FriendshipStatus::Pending)
        .fetch_one(tx.as_mut())
        .await?;

        Ok(friendship)
    }

    async fn mark_accepted(
        &self,
        friendship_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<FriendshipEntity, error::SystemError> {
        let friendship = sqlx::query_as::<_, FriendshipEntity>(
            r#"
            UPDATE friendships
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(friendship_id)
        .bind(FriendshipStatus::Accepted)
        .fetch_optional(tx.as_mut())
        .await?
        .ok_or_else(|| error::SystemError::not_found("Friend request not found"))?;

        Ok(friendship)
    }

    async fn delete_friendship(
        &self,
        friendship_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<(), error::SystemError> {
        sqlx::query("DELETE FROM friendships WHERE id = $1")
            .bind(friendship_id)
            .execute(tx.as_mut())
            .await?;

        Ok(())
    }
}
