use std::sync::Arc;
use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        pet::{
            model::{CreatePetModel, UpdatePetModel},
            repository::PetRepository,
            schema::PetEntity,
        },
        user::{repository::UserRepository, service::load_caller},
    },
};

pub trait PetRepo: PetRepository + UserRepository {}

impl<T> PetRepo for T where T: PetRepository + UserRepository {}

#[derive(Clone)]
pub struct PetService<R>
where
    R: PetRepo,
{
    repo: Arc<R>,
}

impl<R> PetService<R>
where
    R: PetRepo,
{
    pub fn with_dependencies(repo: Arc<R>) -> Self {
        PetService { repo }
    }

    async fn require_owner(&self, caller: &Uuid, tx: &mut R::Tx) -> Result<(), error::SystemError> {
        let user = load_caller(self.repo.as_ref(), caller, tx).await?;
        if !user.is_owner {
            return Err(error::SystemError::forbidden("Only owners can manage pets"));
        }
        Ok(())
    }

    /// Pets of other owners are reported as missing.
    async fn owned_pet(
        &self,
        caller: &Uuid,
        pet_id: &Uuid,
        tx: &mut R::Tx,
    ) -> Result<PetEntity, error::SystemError> {
        self.repo
            .find_pet(pet_id, tx)
            .await?
            .filter(|p| p.owner_id == *caller)
            .ok_or_else(|| error::SystemError::not_found("Pet not found"))
    }

    pub async fn create_pet(
        &self,
        caller: Uuid,
        pet: CreatePetModel,
    ) -> Result<PetEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        self.require_owner(&caller, &mut tx).await?;
        let pet = self.repo.insert_pet(&caller, &pet, &mut tx).await?;
        self.repo.commit(tx).await?;

        log::info!("Owner {} registered pet {}", caller, pet.id);
        Ok(pet)
    }

    pub async fn list_pets(&self, caller: Uuid) -> Result<Vec<PetEntity>, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        self.require_owner(&caller, &mut tx).await?;
        let pets = self.repo.list_pets_by_owner(&caller, &mut tx).await?;
        self.repo.commit(tx).await?;
        Ok(pets)
    }

    pub async fn get_pet(&self, caller: Uuid, pet_id: Uuid) -> Result<PetEntity, error::SystemError> {
        let mut tx = self.repo.begin().await?;
        self.require_owner(&caller, &mut tx).await?;
        let pet = self.owned_pet(&caller, &pet_id, &mut tx).await?;
        self.repo.commit(tx).await?;
        Ok(pet)
    }

    pub async fn update_pet(
        &self,
        caller: Uuid,
        pet_id: Uuid,
        changes: UpdatePetModel,
    ) -> Result<PetEntity, error::SystemError> {
        if changes.is_empty() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let mut tx = self.repo.begin().await?;
        self.require_owner(&caller, &mut tx).await?;
        self.owned_pet(&caller, &pet_id, &mut tx).await?;
        let pet = self.repo.update_pet(&pet_id, &changes, &mut tx).await?;
        self.repo.commit(tx).await?;
        Ok(pet)
    }

    pub async fn delete_pet(&self, caller: Uuid, pet_id: Uuid) -> Result<(), error::SystemError> {
        let mut tx = self.repo.begin().await?;
        self.require_owner(&caller, &mut tx).await?;
        self.owned_pet(&caller, &pet_id, &mut tx).await?;
        self.repo.delete_pet(&pet_id, &mut tx).await?;
        self.repo.commit(tx).await?;

        log::info!("Owner {} deleted pet {}", caller, pet_id);
        Ok(())
    }
}
