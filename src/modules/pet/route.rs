use crate::modules::pet::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/pets")
            .service(list_pets)
            .service(create_pet)
            .service(get_pet)
            .service(update_pet)
            .service(delete_pet),
    );
}
