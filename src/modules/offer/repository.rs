use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        offer::schema::{OfferEntity, OfferStatus},
        store::repository::Store,
    },
};

#[async_trait::async_trait]
pub trait OfferRepository: Store {
    async fn insert_offer(
        &self,
        care_request_id: &Uuid,
        sitter_id: &Uuid,
        message: Option<&str>,
        tx: &mut Self::Tx,
    ) -> Result<OfferEntity, error::SystemError>;

    async fn find_offer_for_update(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<OfferEntity>, error::SystemError>;

    /// The still-offered offer for the pair, if any.
    async fn find_open_offer(
        &self,
        care_request_id: &Uuid,
        sitter_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<OfferEntity>, error::SystemError>;

    async fn set_offer_status(
        &self,
        id: &Uuid,
        status: OfferStatus,
        tx: &mut Self::Tx,
    ) -> Result<OfferEntity, error::SystemError>;

    /// Newest first.
    async fn list_offers_for_sitter(
        &self,
        sitter_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<OfferEntity>, error::SystemError>;

    /// Newest first.
    async fn list_offers_for_request(
        &self,
        care_request_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<OfferEntity>, error::SystemError>;
}
