use actix_web::{HttpRequest, get, web};

use crate::{
    api::{error, success},
    middlewares::get_claims,
    modules::{
        dashboard::{
            model::{Analytics, DashboardStats},
            service::DashboardService,
        },
        store::repository_pg::PgStore,
    },
};

pub type DashboardSvc = DashboardService<PgStore>;

#[get("")]
pub async fn get_stats(
    dashboard_service: web::Data<DashboardSvc>,
    req: HttpRequest,
) -> Result<success::Success<DashboardStats>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let stats = dashboard_service.stats(caller, chrono::Utc::now()).await?;
    Ok(success::Success::ok(Some(stats)).message("Dashboard retrieved successfully"))
}

#[get("/analytics")]
pub async fn get_analytics(
    dashboard_service: web::Data<DashboardSvc>,
    req: HttpRequest,
) -> Result<success::Success<Analytics>, error::Error> {
    let caller = get_claims(&req)?.sub;
    let analytics = dashboard_service.analytics(caller, chrono::Utc::now()).await?;
    Ok(success::Success::ok(Some(analytics)).message("Analytics retrieved successfully"))
}
