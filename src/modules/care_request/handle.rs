use actix_web::{HttpRequest, get, patch, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        care_request::{
            model::{CareRequestModel, FriendOpenRequest, OpenRequestsQuery, Page},
            schema::CareRequestEntity,
            service::CareRequestService,
        },
        store::repository_pg::PgStore,
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type CareRequestSvc = CareRequestService<PgStore>;

#[get("")]
pub async fn list_my_requests(
    care_request_service: web::Data<CareRequestSvc>,
    req: HttpRequest,
) -> Result<success::Success<Vec<CareRequestEntity>>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let rows = care_request_service.list_mine(caller).await?;
    Ok(success::Success::ok(Some(rows)).message("Care requests retrieved successfully"))
}

#[post("")]
pub async fn create_request(
    care_request_service: web::Data<CareRequestSvc>,
    body: ValidatedJson<CareRequestModel>,
    req: HttpRequest,
) -> Result<success::Success<CareRequestEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let request = care_request_service.create_request(caller, body.0).await?;
    Ok(success::Success::created(Some(request)).message("Care request created successfully"))
}

#[get("/friends/open")]
pub async fn open_from_friends(
    care_request_service: web::Data<CareRequestSvc>,
    query: ValidatedQuery<OpenRequestsQuery>,
    req: HttpRequest,
) -> Result<success::Success<Page<FriendOpenRequest>>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let page = care_request_service.open_from_friends(caller, query.0.page.unwrap_or(1)).await?;
    Ok(success::Success::ok(Some(page)).message("Open requests retrieved successfully"))
}

#[get("/{id}")]
pub async fn get_request(
    care_request_service: web::Data<CareRequestSvc>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<CareRequestEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let request = care_request_service.get_request(caller, request_id.into_inner()).await?;
    Ok(success::Success::ok(Some(request)).message("Care request retrieved successfully"))
}

#[patch("/{id}")]
pub async fn update_request(
    care_request_service: web::Data<CareRequestSvc>,
    request_id: web::Path<Uuid>,
    body: ValidatedJson<CareRequestModel>,
    req: HttpRequest,
) -> Result<success::Success<CareRequestEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let request =
        care_request_service.update_request(caller, request_id.into_inner(), body.0).await?;
    Ok(success::Success::ok(Some(request)).message("Care request updated successfully"))
}

#[post("/{id}/cancel")]
pub async fn cancel_request(
    care_request_service: web::Data<CareRequestSvc>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<CareRequestEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let request = care_request_service.cancel_request(caller, request_id.into_inner()).await?;
    Ok(success::Success::ok(Some(request)).message("Care request cancelled"))
}

#[post("/{id}/complete")]
pub async fn complete_request(
    care_request_service: web::Data<CareRequestSvc>,
    request_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<CareRequestEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let request = care_request_service.complete_request(caller, request_id.into_inner()).await?;
    Ok(success::Success::ok(Some(request)).message("Care request completed"))
}
