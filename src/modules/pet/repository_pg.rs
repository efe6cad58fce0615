use uuid::Uuid;

use crate::{
    api::error,
    modules::{
        pet::{
            model::{CreatePetModel, UpdatePetModel},
            repository::PetRepository,
            schema::PetEntity,
        },
        store::repository_pg::PgStore,
    },
};

#[async_trait::async_trait]
impl PetRepository for PgStore {
    async fn insert_pet(
        &self,
        owner_id: &Uuid,
        pet: &CreatePetModel,
        tx: &mut Self::Tx,
    ) -> Result<PetEntity, error::SystemError> {
        let id = Uuid::now_v7();
        let pet = sqlx::query_as::<_, PetEntity>(
            r#"
            INSERT INTO pets (id, owner_id, name, species, breed, age, care_instructions, notes, photo_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(&pet.name)
        .bind(&pet.species)
        .bind(&pet.breed)
        .bind(pet.age)
        .bind(&pet.care_instructions)
        .bind(&pet.notes)
        .bind(&pet.photo_url)
        .fetch_one(tx.as_mut())
        .await?;

        Ok(pet)
    }

    async fn find_pet(
        &self,
        id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Option<PetEntity>, error::SystemError> {
        let pet = sqlx::query_as::<_, PetEntity>("SELECT * FROM pets WHERE id = $1")
            .bind(id)
            .fetch_optional(tx.as_mut())
            .await?;
        Ok(pet)
    }

    async fn find_pets_by_ids(
        &self,
        ids: &[Uuid],
        tx: &mut Self::Tx,
    ) -> Result<Vec<PetEntity>, error::SystemError> {
        let pets = sqlx::query_as::<_, PetEntity>("SELECT * FROM pets WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(tx.as_mut())
            .await?;
        Ok(pets)
    }

    async fn list_pets_by_owner(
        &self,
        owner_id: &Uuid,
        tx: &mut Self::Tx,
    ) -> Result<Vec<PetEntity>, error::SystemError> {
        let pets = sqlx::query_as::<_, PetEntity>(
            "SELECT * FROM pets WHERE owner_id = $1 ORDER BY name, id",
        )
        .bind(owner_id)
        .fetch_all(tx.as_mut())
        .await?;
        Ok(pets)
    }

    async fn update_pet(
        &self,
        id: &Uuid,
        pet: &UpdatePetModel,
        tx: &mut Self::Tx,
    ) -> Result<PetEntity, error::SystemError> {
        let pet = sqlx::query_as::<_, PetEntity>(
            r#"
            UPDATE pets
            SET
                name              = COALESCE($2, name),
                species           = CASE WHEN $3::boolean THEN $4 ELSE species END,
                breed             = CASE WHEN $5::boolean THEN $6 ELSE breed END,
                age               = CASE WHEN $7::boolean THEN $8 ELSE age END,
                care_instructions = CASE WHEN $9::boolean THEN $10 ELSE care_instructions END,
                notes             = CASE WHEN $11::boolean THEN $12 ELSE notes END,
                photo_url         = CASE WHEN $13::boolean THEN $14 ELSE photo_url END,
                updated_at        = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&pet.name)
        .bind(pet.species.is_some())
        .bind(pet.species.as_ref().and_then(|v| v.as_ref()))
        .bind(pet.breed.is_some())
        .bind(pet.breed.as_ref().and_then(|v| v.as_ref()))
        .bind(pet.age.is_some())
        .bind(pet.age.flatten())
        .bind(pet.care_instructions.is_some())
        .bind(pet.care_instructions.as_ref().and_then(|v| v.as_ref()))
        .bind(pet.notes.is_some())
        .bind(pet.notes.as_ref().and_then(|v| v.as_ref()))
        .bind(pet.photo_url.is_some())
        .bind(pet.photo_url.as_ref().and_then(|v| v.as_ref()))
        .fetch_optional(tx.as_mut())
        .await?
        .ok_or_else(|| error::SystemError::not_found("Pet not found"))?;

        Ok(pet)
    }

    async fn delete_pet(&self, id: &Uuid, tx: &mut Self::Tx) -> Result<(), error::SystemError> {
        sqlx::query("DELETE FROM pets WHERE id = $1").bind(id).execute(tx.as_mut()).await?;
        Ok(())
    }
}
