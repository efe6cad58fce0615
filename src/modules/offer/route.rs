use crate::modules::offer::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/offers")
            .service(list_my_offers)
            .service(create_offer)
            .service(list_offers_for_request)
            .service(accept_offer)
            .service(decline_offer)
            .service(withdraw_offer),
    );
}
