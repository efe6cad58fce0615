use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        assignment::schema::{AssignmentEntity, AssignmentStatus},
        care_request::schema::{CareRequestEntity, CareRequestStatus},
        dashboard::{model::StatusCount, repository::DashboardRepository},
        store::repository_pg::PgStore,
    },
};

#[async_trait::async_trait]
impl DashboardRepository for PgStore {
    async fn count_pets(&self, owner_id: &Uuid, tx: &mut Self::Tx) -> Result<i64, error::SystemError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pets WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(tx.as_mut())
            .await?;
        Ok(count)
    }

    async fn count_requests_with_status(
        &self,
        owner_id: &Uuid,
        status: CareRequestStatus,
        tx: &mut Self::Tx,
    ) -> Result<i64, error::SystemError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM care_requests WHERE owner_id = $1 AND status = $2",
        )
        .bind(owner_id)
        .bind(status)
        .fetch_one(tx.as_mut())
        .await?;
        Ok(count)
    }

    async fn count_active_sitter_assignments(
        &self,
        sitter_id: &Uuid,
        ending_at_or_after: DateTime<Utc>,
        tx: &mut Self::Tx,
    ) -> Result<i64, error::SystemError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM care_assignments
            WHERE sitter_id = $1 AND status = $2 AND end_at >= $3
            "#,
        )
        .bind(sitter_id)
        .bind(AssignmentStatus::Active)
        .bind(ending_at_or_after)
        .fetch_one(tx.as_mut())
        .await?;
        Ok(count)
    }

    async fn count_open_requests_of(
        &self,
        owner_ids: &[Uuid],
        tx: &mut Self::Tx,
    ) -> Result<i64, error::SystemError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM care_requests WHERE status = $1 AND owner_id = ANY($2)",
        )
        .bind(CareRequestStatus::Open)
        .bind(owner_ids)
        .fetch_one(tx.as_mut())
        .await?;
        Ok(count)
    }

    async fn count_pending_applications(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<i64, error::SystemError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM care_assignments ca
            JOIN care_requests cr ON cr.id = ca.care_request_id
            WHERE cr.owner_id = $1 AND ca.status = $2
            "#,
        )
        .bind(owner_id)
        .bind(AssignmentStatus::Pending)
        .fetch_one(tx.as_mut())
        .await?;
        Ok(count)
    }

    async fn latest_requests(
        &self,
        owner_id: &Uuid,
        limit: i64,
        tx: &mut Self::Tx,
    ) -> Result<Vec<CareRequestEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, CareRequestEntity>(
            r#"
            SELECT *
            FROM care_requests
            WHERE owner_id = $1
            ORDER BY start_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .fetch_all(tx.as_mut())
        .await?;
        Ok(rows)
    }

    async fn count_requests_by_status(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<StatusCount>, error::SystemError> {
        let rows = sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM care_requests
            WHERE owner_id = $1
            GROUP BY status
            ORDER BY status
            "#,
        )
        .bind(owner_id)
        .fetch_all(tx.as_mut())
        .await?;
        Ok(rows)
    }

    async fn request_starts_since(
        &self,
        owner_id: &Uuid,
        since: DateTime<Utc>,
        tx: &mut Self::Tx,
    ) -> Result<Vec<DateTime<Utc>>, error::SystemError> {
        let rows = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT start_at FROM care_requests WHERE owner_id = $1 AND start_at >= $2",
        )
        .bind(owner_id)
        .bind(since)
        .fetch_all(tx.as_mut())
        .await?;
        Ok(rows)
    }

    async fn sitter_assignments_since(
        &self,
        sitter_id: &Uuid,
        statuses: &[AssignmentStatus],
        since: DateTime<Utc>,
        tx: &mut Self::Tx,
    ) -> Result<Vec<AssignmentEntity>, error::SystemError> {
        let rows = sqlx::query_as::<_, AssignmentEntity>(
            r#"
            SELECT *
            FROM care_assignments
            WHERE sitter_id = $1 AND status = ANY($2) AND start_at >= $3
            "#,
        )
        .bind(sitter_id)
        .bind(statuses)
        .bind(since)
        .fetch_all(tx.as_mut())
        .await?;
        Ok(rows)
    }
}
