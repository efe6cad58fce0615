use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        care_request::{
            model::NewCareRequest,
            schema::{CareRequestEntity, CareRequestStatus},
        },
        store::repository::Store,
    },
};

#[async_trait::async_trait]
pub trait CareRequestRepository: Store {
    async fn insert_request(
        &self,
        owner_id: &Uuid,
        request: &NewCareRequest,
        tx: &mut Self::Tx,
    ) -> Result<CareRequestEntity, error::SystemError>;

    async fn find_request(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<CareRequestEntity>, error::SystemError>;

    /// Same as [`find_request`](Self::find_request) but holds a row lock until
    /// `tx` ends.
    async fn find_request_for_update(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<CareRequestEntity>, error::SystemError>;

    /// Newest window first.
    async fn list_requests_by_owner(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<CareRequestEntity>, error::SystemError>;

    /// Open requests of any of `owner_ids`, earliest window first.
    async fn list_open_by_owners(
        &self,
        owner_ids: &[Uuid],
        offset: i64,
        limit: i64,
        tx: &mut Self::Tx,
    ) -> Result<Vec<CareRequestEntity>, error::SystemError>;

    async fn update_request(
        &self,
        id: &Uuid,
        request: &NewCareRequest,
        tx: &mut Self::Tx,
    ) -> Result<CareRequestEntity, error::SystemError>;

    async fn set_request_status(
        &self,
        id: &Uuid,
        status: CareRequestStatus,
        tx: &mut Self::Tx,
    ) -> Result<CareRequestEntity, error::SystemError>;

    /// Whether the request has an assignment that is still pending or active.
    async fn has_live_assignments(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<bool, error::SystemError>;
}
