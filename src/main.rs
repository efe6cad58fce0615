use actix_cors::Cors;
use actix_web::{
    self, App, HttpServer,
    middleware::{Logger, from_fn},
    web,
};
use std::sync::{Arc, LazyLock};

use crate::{
    configs::{Cache, RedisCache, connect_database, run_migrations},
    middlewares::authentication,
    modules::{
        assignment::service::{AssignmentService, SchedulingPolicy},
        care_request::service::CareRequestService,
        dashboard::service::DashboardService,
        friend::service::FriendService,
        offer::service::OfferService,
        pet::service::PetService,
        store::repository_pg::PgStore,
        user::service::UserService,
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

pub static ENV: LazyLock<constants::Env> = LazyLock::new(|| {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Environment variables loaded from .env file");
    constants::Env::default()
});

#[actix_web::get("/")]
async fn health_check(store: web::Data<PgStore>) -> actix_web::HttpResponse {
    match sqlx::query("SELECT 1").execute(store.get_pool()).await {
        Ok(_) => actix_web::HttpResponse::Ok().body("Server is running"),
        Err(e) => {
            log::error!("Health check failed: {e}");
            actix_web::HttpResponse::ServiceUnavailable().body("Database unavailable")
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let db_pool = connect_database().await.map_err(|e| {
        log::error!("Database connection error: {e}");
        std::io::Error::other("Database connection error")
    })?;

    run_migrations(&db_pool).await.map_err(|e| {
        log::error!("Migration error: {e}");
        std::io::Error::other("Migration error")
    })?;

    let redis_cache =
        RedisCache::new().await.map_err(|_| std::io::Error::other("Redis connection error"))?;
    let cache: Arc<dyn Cache> = Arc::new(redis_cache);

    let store = PgStore::new(db_pool);
    let repo = Arc::new(store.clone());

    let policy = SchedulingPolicy { reopen_on_cancel: ENV.reopen_request_on_cancel };

    let user_service = UserService::with_dependencies(repo.clone(), cache.clone());
    let friend_service = FriendService::with_dependencies(repo.clone());
    let pet_service = PetService::with_dependencies(repo.clone());
    let care_request_service = CareRequestService::with_dependencies(repo.clone());
    let assignment_service = AssignmentService::with_dependencies(repo.clone(), policy);
    let offer_service = OfferService::with_dependencies(repo.clone());
    let dashboard_service = DashboardService::with_dependencies(repo);

    log::info!("Starting server at http://{}:{}", ENV.ip.as_str(), ENV.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&ENV.frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(friend_service.clone()))
            .app_data(web::Data::new(pet_service.clone()))
            .app_data(web::Data::new(care_request_service.clone()))
            .app_data(web::Data::new(assignment_service.clone()))
            .app_data(web::Data::new(offer_service.clone()))
            .app_data(web::Data::new(dashboard_service.clone()))
            .service(health_check)
            .service(
                web::scope("/api")
                    .wrap(from_fn(authentication))
                    .configure(modules::user::route::configure)
                    .configure(modules::friend::route::configure)
                    .configure(modules::pet::route::configure)
                    .configure(modules::care_request::route::configure)
                    .configure(modules::assignment::route::configure)
                    .configure(modules::offer::route::configure)
                    .configure(modules::dashboard::route::configure),
            )
    })
    .bind((ENV.ip.as_str(), ENV.port))?
    .workers(2)
    .run()
    .await
}
