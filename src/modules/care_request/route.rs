use crate::modules::care_request::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/care-requests")
            .service(list_my_requests)
            .service(create_request)
            .service(open_from_friends)
            .service(get_request)
            .service(update_request)
            .service(cancel_request)
            .service(complete_request),
    );
}
