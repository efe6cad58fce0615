use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        pet::{
            model::{CreatePetModel, UpdatePetModel},
            schema::PetEntity,
        },
        store::repository::Store,
    },
};

#[async_trait::async_trait]
pub trait PetRepository: Store {
    async fn insert_pet(
        &self,
        owner_id: &Uuid,
        pet: &CreatePetModel,
        tx: &mut Self::Tx,
    ) -> Result<PetEntity, error::SystemError>;

    async fn find_pet(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<PetEntity>, error::SystemError>;

    async fn find_pets_by_ids(
        &self,
        ids: &[Uuid],
        tx: &mut Self::Tx,
    ) -> Result<Vec<PetEntity>, error::SystemError>;

    async fn list_pets_by_owner(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<PetEntity>, error::SystemError>;

    async fn update_pet(
        &self,
        id: &Uuid,
        pet: &UpdatePetModel,
        tx: &mut Self::Tx,
    ) -> Result<PetEntity, error::SystemError>;

    async fn delete_pet(&self, id: &Uuid, tx: &mut Self::Tx) -> Result<(), error::SystemError>;
}
