use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        assignment::{
            model::NewAssignment,
            repository::AssignmentRepository,
            schema::{AssignmentEntity, AssignmentStatus},
            service::{ensure_no_active_overlap, schedule_keys},
        },
        care_request::{
            repository::CareRequestRepository,
            schema::{CareRequestEntity, CareRequestStatus},
        },
        friend::{repository::FriendRepo, service::are_friends},
        offer::{
            model::CreateOfferModel,
            repository::OfferRepository,
            schema::{OfferEntity, OfferStatus},
        },
    },
};

pub trait OfferRepo: OfferRepository + AssignmentRepository + CareRequestRepository + FriendRepo {}

impl<T> OfferRepo for T where
    T: OfferRepository + AssignmentRepository + CareRequestRepository + FriendRepo
{
}

#[derive(Clone)]
pub struct OfferService<R>
where
    R: OfferRepo,
{
    repo: Arc<R>,
}

impl<R> OfferService<R>
where
    R: OfferRepo,
{
    pub fn with_dependencies(repo: Arc<R>) -> Self {
        OfferService { repo }
    }

    #[tracing::instrument(skip(self, model), fields(request_id = %model.care_request_id))]
    pub async fn create_offer(
        &self,
        caller: Uuid,
        model: CreateOfferModel,
    ) -> Result<OfferEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;

        let request = self
            .repo
            .find_request_for_update(&model.care_request_id, &mut tx)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Care request not found"))?;

        if request.owner_id != caller {
            return Err(error::SystemError::forbidden("Only the owner can send offers"));
        }
        if !request.is_open() {
            return Err(error::SystemError::RequestNotOpen);
        }

        let sitter = self
            .repo
            .find_by_id(&model.sitter_id, &mut tx)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Sitter not found"))?;

        if sitter.id == caller {
            return Err(error::SystemError::not_eligible("You cannot offer to yourself"));
        }
        if !sitter.is_sitter {
            return Err(error::SystemError::not_eligible("This user is not a sitter"));
        }
        if !are_friends(self.repo.as_ref(), &caller, &sitter.id, &mut tx).await? {
            return Err(error::SystemError::not_eligible(
                "You can offer only to accepted friends",
            ));
        }

        if self.repo.find_open_offer(&request.id, &sitter.id, &mut tx).await?.is_some() {
            return Err(error::SystemError::duplicate_application(
                "There is already an active offer for this sitter",
            ));
        }

        let message = model.message.as_deref().map(str::trim).filter(|m| !m.is_empty());
        let offer = self.repo.insert_offer(&request.id, &sitter.id, message, &mut tx).await?;
        self.repo.commit(tx).await?;

        log::info!("Owner {} offered request {} to {}", caller, request.id, sitter.id);
        Ok(offer)
    }

    /// Locks an offered offer and its request, owned by `caller`.
    async fn owner_offer(
        &self,
        caller: &Uuid,
        offer_id: &Uuid,
        tx: &mut R::Tx,
    ) -> Result<(OfferEntity, CareRequestEntity), error::SystemError> {
        let offer = self
            .repo
            .find_offer_for_update(offer_id, tx)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Offer not found"))?;

        let request = self
            .repo
            .find_request_for_update(&offer.care_request_id, tx)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Care request not found"))?;

        if request.owner_id != *caller || offer.status != OfferStatus::Offered {
            return Err(error::SystemError::forbidden("Not allowed"));
        }

        Ok((offer, request))
    }

    /// Books the sitter for the whole request window and confirms the request.
    #[tracing::instrument(skip(self))]
    pub async fn accept_offer(
        &self,
        caller: Uuid,
        offer_id: Uuid,
    ) -> Result<AssignmentEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        let (offer, request) = self.owner_offer(&caller, &offer_id, &mut tx).await?;

        if !request.is_open() {
            return Err(error::SystemError::RequestNotOpen);
        }

        let window = request.window()?;
        self.repo.lock_keys(&schedule_keys(offer.sitter_id, request.pet_id), &mut tx).await?;
        ensure_no_active_overlap(
            self.repo.as_ref(),
            &offer.sitter_id,
            request.pet_id.as_ref(),
            &window,
            None,
            &mut tx,
        )
        .await?;

        let assignment = self
            .repo
            .insert_assignment(
                &NewAssignment {
                    care_request_id: request.id,
                    sitter_id: offer.sitter_id,
                    pet_id: request.pet_id,
                    window,
                    sitter_note: None,
                    status: AssignmentStatus::Active,
                },
                &mut tx,
            )
            .await?;

        self.repo.set_offer_status(&offer.id, OfferStatus::AcceptedByOwner, &mut tx).await?;
        self.repo.set_request_status(&request.id, CareRequestStatus::Confirmed, &mut tx).await?;
        self.repo.commit(tx).await?;

        log::info!("Offer {} accepted, assignment {} created", offer.id, assignment.id);
        Ok(assignment)
    }

    pub async fn decline_offer(
        &self,
        caller: Uuid,
        offer_id: Uuid,
    ) -> Result<OfferEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        self.owner_offer(&caller, &offer_id, &mut tx).await?;
        let offer =
            self.repo.set_offer_status(&offer_id, OfferStatus::DeclinedByOwner, &mut tx).await?;
        self.repo.commit(tx).await?;
        Ok(offer)
    }

    pub async fn withdraw_offer(
        &self,
        caller: Uuid,
        offer_id: Uuid,
    ) -> Result<OfferEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        let offer = self
            .repo
            .find_offer_for_update(&offer_id, &mut tx)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Offer not found"))?;

        if offer.sitter_id != caller || offer.status != OfferStatus::Offered {
            return Err(error::SystemError::forbidden("Not allowed"));
        }

        let offer = self.repo.set_offer_status(&offer_id, OfferStatus::Withdrawn, &mut tx).await?;
        self.repo.commit(tx).await?;
        Ok(offer)
    }

    pub async fn list_mine(&self, caller: Uuid) -> Result<Vec<OfferEntity>, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        let rows = self.repo.list_offers_for_sitter(&caller, &mut tx).await?;
        self.repo.commit(tx).await?;
        Ok(rows)
    }

    pub async fn list_for_request(
        &self,
        caller: Uuid,
        request_id: Uuid,
    ) -> Result<Vec<OfferEntity>, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        let request = self
            .repo
            .find_request(&request_id, &mut tx)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Care request not found"))?;

        if request.owner_id != caller {
            return Err(error::SystemError::forbidden(
                "Only the owner can view offers for this request",
            ));
        }

        let rows = self.repo.list_offers_for_request(&request_id, &mut tx).await?;
        self.repo.commit(tx).await?;
        Ok(rows)
    }
}
