use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        assignment::schema::{AssignmentEntity, AssignmentStatus},
        care_request::schema::{CareRequestEntity, CareRequestStatus},
        dashboard::model::StatusCount,
        store::repository::Store,
    },
};

/// Read-only aggregates scoped to one user.
#[async_trait::async_trait]
pub trait DashboardRepository: Store {
    async fn count_pets(&self, owner_id: &Uuid, tx: &mut Self::Tx) -> Result<i64, error::SystemError>;

    async fn count_requests_with_status(
        &self,
        owner_id: &Uuid,
        status: CareRequestStatus,
        tx: &mut Self::Tx,
    ) -> Result<i64, error::SystemError>;

    async fn count_active_sitter_assignments(
        &self,
        sitter_id: &Uuid,
        ending_at_or_after: DateTime<Utc>,
        tx: &mut Self::Tx,
    ) -> Result<i64, error::SystemError>;

    async fn count_open_requests_of(
        &self,
        owner_ids: &[Uuid],
        tx: &mut Self::Tx,
    ) -> Result<i64, error::SystemError>;

    /// Pending applications on requests owned by `owner_id`.
    async fn count_pending_applications(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<i64, error::SystemError>;

    async fn latest_requests(
        &self,
        owner_id: &Uuid,
        limit: i64,
        tx: &mut Self::Tx,
    ) -> Result<Vec<CareRequestEntity>, error::SystemError>;

    async fn count_requests_by_status(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<StatusCount>, error::SystemError>;

    async fn request_starts_since(
        &self,
        owner_id: &Uuid,
        since: DateTime<Utc>,
        tx: &mut Self::Tx,
    ) -> Result<Vec<DateTime<Utc>>, error::SystemError>;

    async fn sitter_assignments_since(
        &self,
        sitter_id: &Uuid,
        statuses: &[AssignmentStatus],
        since: DateTime<Utc>,
        tx: &mut Self::Tx,
    ) -> Result<Vec<AssignmentEntity>, error::SystemError>;
}
