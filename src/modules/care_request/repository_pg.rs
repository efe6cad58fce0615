use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        care_request::{
            model::NewCareRequest,
            repository::CareRequestRepository,
            schema::{CareRequestEntity, CareRequestStatus},
        },
        store::repository_pg::PgStore,
    },
};

#[async_trait::async_trait]
impl CareRequestRepository for PgStore {
    async fn insert_request(
        &self,
        owner_id: &Uuid,
        request: &NewCareRequest,
        tx: &mut Self::Tx,
    ) -> Result<CareRequestEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let request = sqlx::query_as::<_, CareRequestEntity>(
            r#"
            INSERT INTO care_requests (id, owner_id, pet_id, start_at, end_at, location_text, notes, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(request.pet_id)
        .bind(request.window.start_at())
        .bind(request.window.end_at())
        .bind(&request.location_text)
        .bind(&request.notes)
        .bind(CareRequestStatus::Open)
        .fetch_one(tx.as_mut())
        .await?;

        Ok(request)
    }

    async fn find_request(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<CareRequestEntity>, error::SystemError> {
        let request =
            sqlx::query_as::<_, CareRequestEntity>("SELECT * FROM care_requests WHERE id = $1")
                .bind(id)
                .fetch_optional(tx.as_mut())
                .await?;
        Ok(request)
    }

    async fn find_request_for_update(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<CareRequestEntity>, error::SystemError> {
        let request = sqlx::query_as::<_, CareRequestEntity>(
            "SELECT * FROM care_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(tx.as_mut())
        .await?;
        Ok(request)
    }

    async fn list_requests_by_owner(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<CareRequestEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, CareRequestEntity>(
            "SELECT * FROM care_requests WHERE owner_id = $1 ORDER BY start_at DESC, id DESC",
        )
        .bind(owner_id)
        .fetch_all(tx.as_mut())
        .await?;
        Ok(rows)
    }

    async fn list_open_by_owners(
        &self,
        owner_ids: &[Uuid],
        offset: i64,
        limit: i64,
        tx: &mut Self::Tx,
    ) -> Result<Vec<CareRequestEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, CareRequestEntity>(
            r#"
            SELECT *
            FROM care_requests
            WHERE status = $1 AND owner_id = ANY($2)
            ORDER BY start_at ASC, id ASC
            OFFSET $3
            LIMIT $4
            "#,
        )
        .bind(CareRequestStatus::Open)
        .bind(owner_ids)
        .bind(offset)
        .bind(limit)
        .fetch_all(tx.as_mut())
        .await?;
        Ok(rows)
    }

    async fn update_request(
        &self,
        id: &Uuid,
        request: &NewCareRequest,
        tx: &mut Self::Tx,
    ) -> Result<CareRequestEntity, error::SystemError> {
        let request = sqlx::query_as::<_, CareRequestEntity>(
            r#"
            UPDATE care_requests
            SET
                pet_id        = $2,
                start_at      = $3,
                end_at        = $4,
                location_text = $5,
                notes         = $6,
                updated_at    = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.pet_id)
        .bind(request.window.start_at())
        .bind(request.window.end_at())
        .bind(&request.location_text)
        .bind(&request.notes)
        .fetch_optional(tx.as_mut())
        .await?
        .ok_or_else(|| error::SystemError::not_found("Care request not found"))?;

        Ok(request)
    }

    async fn set_request_status(
        &self,
        id: &Uuid,
        status: CareRequestStatus,
        tx: &mut Self::Tx,
    ) -> Result<CareRequestEntity, error::SystemError> {
        let request = sqlx::query_as::<_, CareRequestEntity>(
            r#"
            UPDATE care_requests
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(tx.as_mut())
        .await?
        .ok_or_else(|| error::SystemError::not_found("Care request not found"))?;

        Ok(request)
    }

    async fn has_live_assignments(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<bool, error::SystemError> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM care_assignments
                WHERE care_request_id = $1
                AND status IN ('pending', 'active')
            )
            "#,
        )
        .bind(id)
        .fetch_one(tx.as_mut())
        .await?;

        Ok(exists)
    }
}
