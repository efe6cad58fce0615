use actix_web::{HttpRequest, get, post, web};
use uuid::Uuid;

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        assignment::{
            model::{ApplyModel, ApproveModel, AssignmentsView},
            schema::AssignmentEntity,
            service::AssignmentService,
        },
        store::repository_pg::PgStore,
    },
    utils::ValidatedJson,
};

pub type AssignmentSvc = AssignmentService<PgStore>;

#[get("")]
pub async fn list_assignments(
    assignment_service: web::Data<AssignmentSvc>,
    req: HttpRequest,
) -> Result<success::Success<AssignmentsView>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let view = assignment_service.list_assignments(caller).await?;
    Ok(success::Success::ok(Some(view)).message("Assignments retrieved successfully"))
}

#[post("")]
pub async fn apply(
    assignment_service: web::Data<AssignmentSvc>,
    body: ValidatedJson<ApplyModel>,
    req: HttpRequest,
) -> Result<success::Success<AssignmentEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let assignment = assignment_service.apply(caller, body.0).await?;
    Ok(success::Success::created(Some(assignment))
        .message("Applied. The owner will review your application"))
}

#[post("/{id}/approve")]
pub async fn approve(
    assignment_service: web::Data<AssignmentSvc>,
    assignment_id: web::Path<Uuid>,
    body: ValidatedJson<ApproveModel>,
    req: HttpRequest,
) -> Result<success::Success<AssignmentEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let assignment = assignment_service.approve(caller, assignment_id.into_inner(), body.0).await?;
    Ok(success::Success::ok(Some(assignment)).message("Assignment approved"))
}

#[post("/{id}/decline")]
pub async fn decline(
    assignment_service: web::Data<AssignmentSvc>,
    assignment_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<AssignmentEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let assignment = assignment_service.decline(caller, assignment_id.into_inner()).await?;
    Ok(success::Success::ok(Some(assignment)).message("Assignment declined"))
}

#[post("/{id}/cancel")]
pub async fn cancel(
    assignment_service: web::Data<AssignmentSvc>,
    assignment_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<AssignmentEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let assignment = assignment_service.cancel(caller, assignment_id.into_inner()).await?;
    Ok(success::Success::ok(Some(assignment)).message("Assignment cancelled"))
}

#[post("/{id}/complete")]
pub async fn complete(
    assignment_service: web::Data<AssignmentSvc>,
    assignment_id: web::Path<Uuid>,
    req: HttpRequest,
) -> Result<success::Success<AssignmentEntity>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let assignment = assignment_service.complete(caller, assignment_id.into_inner()).await?;
    Ok(success::Success::ok(Some(assignment)).message("Assignment completed"))
}
