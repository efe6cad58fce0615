use crate::modules::friend::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/friends")
            .service(list_friends)
            .service(list_incoming_requests)
            .service(list_sent_requests)
            .service(send_friend_request)
            .service(accept_friend_request)
            .service(decline_friend_request)
            .service(cancel_friend_request),
    );
}
