use actix_web::web;

use crate::handlers::pages;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pages")
            .service(web::resource("/eboard").route(web::get().to(pages::executive_board)))
            .service(web::resource("/alumni").route(web::get().to(pages::alumni_directory))),
    );
}
