use std::{collections::HashMap, sync::Arc};
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        care_request::{
            model::{CareRequestModel, FriendOpenRequest, NewCareRequest, PER_PAGE, Page},
            repository::CareRequestRepository,
            schema::{CareRequestEntity, CareRequestStatus},
        },
        friend::{
            model::FriendResponse,
            repository::FriendRepo,
            service::{are_friends, friend_ids},
        },
        pet::repository::PetRepository,
        user::service::load_caller,
    },
};

pub trait CareRequestRepo: CareRequestRepository + PetRepository + FriendRepo {}

impl<T> CareRequestRepo for T where T: CareRequestRepository + PetRepository + FriendRepo {}

#[derive(Clone)]
pub struct CareRequestService<R>
where
    R: CareRequestRepo,
{
    repo: Arc<R>,
}

impl<R> CareRequestService<R>
where
    R: CareRequestRepo,
{
    pub fn with_dependencies(repo: Arc<R>) -> Self {
        CareRequestService { repo }
    }

    async fn require_owner(&self, caller: &Uuid, tx: &mut R::Tx) -> Result<(), error::SystemError> {
        let user = load_caller(self.repo.as_ref(), caller, tx).await?;
        if !user.is_owner {
            return Err(error::SystemError::forbidden("Only owners can manage care requests"));
        }
        Ok(())
    }

    /// Locked row of one of the caller's own requests. Other owners' requests
    /// are reported as missing.
    async fn owned_request(
        &self,
        caller: &Uuid,
        request_id: &Uuid,
        tx: &mut R::Tx,
    ) -> Result<CareRequestEntity, error::SystemError> {
        self.repo
            .find_request_for_update(request_id, tx)
            .await?
            .filter(|r| r.owner_id == *caller)
            .ok_or_else(|| error::SystemError::not_found("Care request not found"))
    }

    async fn check_pet(
        &self,
        caller: &Uuid,
        pet_id: Option<Uuid>,
        tx: &mut R::Tx,
    ) -> Result<(), error::SystemError> {
        let Some(pet_id) = pet_id else {
            return Ok(());
        };
        match self.repo.find_pet(&pet_id, tx).await? {
            Some(pet) if pet.owner_id == *caller => Ok(()),
            _ => Err(error::SystemError::not_found("Pet not found")),
        }
    }

    #[tracing::instrument(skip(self, model))]
    pub async fn create_request(
        &self,
        caller: Uuid,
        model: CareRequestModel,
    ) -> Result<CareRequestEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        self.require_owner(&caller, &mut tx).await?;
        self.check_pet(&caller, model.pet_id, &mut tx).await?;
        let new = NewCareRequest::try_from(model)?;

        let request = self.repo.insert_request(&caller, &new, &mut tx).await?;
        self.repo.commit(tx).await?;

        log::info!("Owner {} posted care request {}", caller, request.id);
        Ok(request)
    }

    pub async fn list_mine(&self, caller: Uuid) -> Result<Vec<CareRequestEntity>, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        self.require_owner(&caller, &mut tx).await?;
        let rows = self.repo.list_requests_by_owner(&caller, &mut tx).await?;
        self.repo.commit(tx).await?;
        Ok(rows)
    }

    /// Visible to the owner and to the owner's accepted friends.
    pub async fn get_request(
        &self,
        caller: Uuid,
        request_id: Uuid,
    ) -> Result<CareRequestEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        let request = self
            .repo
            .find_request(&request_id, &mut tx)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Care request not found"))?;

        if request.owner_id != caller
            && !are_friends(self.repo.as_ref(), &caller, &request.owner_id, &mut tx).await?
        {
            return Err(error::SystemError::not_eligible(
                "Only the owner's friends can view this request",
            ));
        }

        self.repo.commit(tx).await?;
        Ok(request)
    }

    #[tracing::instrument(skip(self, model))]
    pub async fn update_request(
        &self,
        caller: Uuid,
        request_id: Uuid,
        model: CareRequestModel,
    ) -> Result<CareRequestEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        self.require_owner(&caller, &mut tx).await?;
        let current = self.owned_request(&caller, &request_id, &mut tx).await?;
        if current.status.is_terminal() {
            return Err(error::SystemError::RequestNotOpen);
        }
        self.check_pet(&caller, model.pet_id, &mut tx).await?;
        if model.pet_id != current.pet_id
            && self.repo.has_live_assignments(&request_id, &mut tx).await?
        {
            return Err(error::SystemError::conflict(
                "Cannot change the pet while applications are pending or active",
            ));
        }
        let new = NewCareRequest::try_from(model)?;

        let request = self.repo.update_request(&request_id, &new, &mut tx).await?;
        self.repo.commit(tx).await?;
        Ok(request)
    }

    #[tracing::instrument(skip(self))]
    pub async fn cancel_request(
        &self,
        caller: Uuid,
        request_id: Uuid,
    ) -> Result<CareRequestEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        self.require_owner(&caller, &mut tx).await?;
        let current = self.owned_request(&caller, &request_id, &mut tx).await?;
        if current.status.is_terminal() {
            return Err(error::SystemError::RequestNotOpen);
        }

        let request =
            self.repo.set_request_status(&request_id, CareRequestStatus::Cancelled, &mut tx).await?;
        self.repo.commit(tx).await?;

        log::info!("Care request {} cancelled", request_id);
        Ok(request)
    }

    #[tracing::instrument(skip(self))]
    pub async fn complete_request(
        &self,
        caller: Uuid,
        request_id: Uuid,
    ) -> Result<CareRequestEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        self.require_owner(&caller, &mut tx).await?;
        let current = self.owned_request(&caller, &request_id, &mut tx).await?;
        if current.status != CareRequestStatus::Confirmed {
            return Err(error::SystemError::RequestNotOpen);
        }

        let request =
            self.repo.set_request_status(&request_id, CareRequestStatus::Completed, &mut tx).await?;
        self.repo.commit(tx).await?;

        log::info!("Care request {} completed", request_id);
        Ok(request)
    }

    /// Open requests posted by the caller's accepted friends, earliest first.
    pub async fn open_from_friends(
        &self,
        caller: Uuid,
        page: i64,
    ) -> Result<Page<FriendOpenRequest>, error::SystemError> {
        let page = page.max(1);
        let offset = (page - 1)
            .checked_mul(PER_PAGE)
            .ok_or_else(|| error::SystemError::bad_request("Page is out of range"))?;
        let mut tx = self.repo.begin().await?;

        let friends = friend_ids(self.repo.as_ref(), &caller, &mut tx).await?;
        if friends.is_empty() {
            self.repo.commit(tx).await?;
            return Ok(Page::empty(page));
        }

        let fetched =
            self.repo.list_open_by_owners(&friends, offset, PER_PAGE + 1, &mut tx).await?;

        let owners: HashMap<Uuid, FriendResponse> = self
            .repo
            .find_by_ids(&friends, &mut tx)
            .await?
            .into_iter()
            .map(|u| (u.id, FriendResponse::from(u)))
            .collect();

        let pet_ids: Vec<Uuid> = fetched.iter().filter_map(|r| r.pet_id).collect();
        let pet_names: HashMap<Uuid, String> = if pet_ids.is_empty() {
            HashMap::new()
        } else {
            self.repo
                .find_pets_by_ids(&pet_ids, &mut tx)
                .await?
                .into_iter()
                .map(|p| (p.id, p.name))
                .collect()
        };

        self.repo.commit(tx).await?;

        let rows = fetched
            .into_iter()
            .filter_map(|request| {
                let owner = owners.get(&request.owner_id)?.clone();
                let pet_name = request.pet_id.and_then(|id| pet_names.get(&id).cloned());
                Some(FriendOpenRequest { request, owner, pet_name })
            })
            .collect();

        Ok(Page::from_overfetch(rows, page))
    }
}
