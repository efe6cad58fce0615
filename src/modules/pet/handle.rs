use actix_web::{HttpRequest, delete, get, patch, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        pet::{
            model::{CreatePetModel, UpdatePetModel},
            schema::PetEntity,
            service::PetService,
        },
        store::repository_pg::PgStore,
    },
    utils::ValidatedJson,
};

pub type PetSvc = PetService<PgStore>;

#[get("")]
pub async fn list_pets(
    pet_service: web::Data<PetSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<PetEntity>>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let pets = pet_service.list_pets(caller).await?;
    Ok(success::Success::ok(Some(pets)).message("Pets retrieved successfully"))
}

#[post("")]
pub async fn create_pet(
    pet_service: web::Data<PetSvc>,
    body: ValidatedJson<CreatePetModel>,
    req: HttpRequest,
) -> Result<success::Success<PetEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let pet = pet_service.create_pet(caller, body.0).await?;
    Ok(success::Success::created(Some(pet)).message("Pet created successfully"))
}

#[get("/{id}")]
pub async fn get_pet(
    pet_service: web::Data<PetSvc>,
    pet_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<PetEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let pet = pet_service.get_pet(caller, pet_id.into_inner()).await?;
    Ok(success::Success::ok(Some(pet)).message("Pet retrieved successfully"))
}

#[patch("/{id}")]
pub async fn update_pet(
    pet_service: web::Data<PetSvc>,
    pet_id: web::Path<Uuid>,
    body: ValidatedJson<UpdatePetModel>,
    req: HttpRequest,
) -> Result<success::Success<PetEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let pet = pet_service.update_pet(caller, pet_id.into_inner(), body.0).await?;
    Ok(success::Success::ok(Some(pet)).message("Pet updated successfully"))
}

#[delete("/{id}")]
pub async fn delete_pet(
    pet_service: web::Data<PetSvc>,
    pet_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let caller = get_claims(&req)?.sub;
    pet_service.delete_pet(caller, pet_id.into_inner()).await?;
    Ok(success::Success::no_content())
}
