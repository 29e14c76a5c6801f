use actix_web::web;

use crate::handlers::pages::home;

mod admin;
mod json_error;
mod media;
mod pages;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);

    cfg.service(
        web::scope("/api/v1")
            .configure(pages::config_routes)
            .configure(admin::config_routes),
    );

    cfg.configure(media::config_routes);
    cfg.configure(json_error::config_routes);
}
