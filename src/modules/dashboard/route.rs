use crate::modules::dashboard::handle::*;
use actix_web::web::{ServiceConfig, scope};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(scope("/dashboard").service(get_stats).service(get_analytics));
}
