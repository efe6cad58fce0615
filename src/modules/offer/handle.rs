use actix_web::{HttpRequest, get, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        assignment::schema::AssignmentEntity,
        offer::{model::CreateOfferModel, schema::OfferEntity, service::OfferService},
        store::repository_pg::PgStore,
    },
    utils::ValidatedJson,
};

pub type OfferSvc = OfferService<PgStore>;

#[get("")]
pub async fn list_my_offers(
    offer_service: web::Data<OfferSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<OfferEntity>>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let rows = offer_service.list_mine(caller).await?;
    Ok(success::Success::ok(Some(rows)).message("Offers retrieved successfully"))
}

#[post("")]
pub async fn create_offer(
    offer_service: web::Data<OfferSvc>,
    body: ValidatedJson<CreateOfferModel>,
    req: HttpRequest,
) -> Result<success::Success<OfferEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let offer = offer_service.create_offer(caller, body.0).await?;
    Ok(success::Success::created(Some(offer)).message("Offer sent"))
}

#[get("/requests/{request_id}")]
pub async fn list_offers_for_request(
    offer_service: web::Data<OfferSvc>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<Vec<OfferEntity>>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let rows = offer_service.list_for_request(caller, request_id.into_inner()).await?;
    Ok(success::Success::ok(Some(rows)).message("Offers retrieved successfully"))
}

#[post("/{id}/accept")]
pub async fn accept_offer(
    offer_service: web::Data<OfferSvc>,
    offer_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<AssignmentEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let assignment = offer_service.accept_offer(caller, offer_id.into_inner()).await?;
    Ok(success::Success::ok(Some(assignment)).message("Offer accepted. Assignment created"))
}

#[post("/{id}/decline")]
pub async fn decline_offer(
    offer_service: web::Data<OfferSvc>,
    offer_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<OfferEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let offer = offer_service.decline_offer(caller, offer_id.into_inner()).await?;
    Ok(success::Success::ok(Some(offer)).message("Offer declined"))
}

#[post("/{id}/withdraw")]
pub async fn withdraw_offer(
    offer_service: web::Data<OfferSvc>,
    offer_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<OfferEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let offer = offer_service.withdraw_offer(caller, offer_id.into_inner()).await?;
    Ok(success::Success::ok(Some(offer)).message("Offer withdrawn"))
}
