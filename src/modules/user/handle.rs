use actix_web::{HttpRequest, get, patch, web};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        store::repository_pg::PgStore,
        user::{model, service::UserService},
    },
    utils::{ValidatedJson, ValidatedQuery},
};

pub type UserSvc = UserService<PgStore>;

#[get("/profile")]
pub async fn get_profile(
    user_service: web::Data<UserSvc>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.get_profile(id).await?;
    Ok(success::Success::ok(Some(user)).message("Profile retrieved successfully"))
}

#[patch("/capabilities")]
pub async fn update_capabilities(
    user_service: web::Data<UserSvc>,
    body: ValidatedJson<model::UpdateCapabilitiesModel>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_claims(&req)?.sub;
    let user = user_service.update_capabilities(id, body.0).await?;
    Ok(success::Success::ok(Some(user)).message("Capabilities updated successfully"))
}

#[get("/search")]
pub async fn search_users(
    user_service: web::Data<UserSvc>,
    query: ValidatedQuery<model::UserSearchQuery>,
    req: HttpRequest,
) -> Result<success::Success<Vec<model::UserSearchResult>>, error::Error> {
    let id = get_claims(&req)?.sub;
    let users = user_service.search(id, &query.0.q).await?;
    Ok(success::Success::ok(Some(users)).message("Users retrieved successfully"))
}
