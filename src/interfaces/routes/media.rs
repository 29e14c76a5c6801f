use actix_web::web;

use crate::handlers::media::serve_media;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(serve_media);
}
