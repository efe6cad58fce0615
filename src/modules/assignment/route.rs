use crate::modules::assignment::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/assignments")
            .service(list_assignments)
            .service(apply)
            .service(approve)
            .service(decline)
            .service(cancel)
            .service(complete),
    );
}
