use actix_web::web;

use crate::handlers::{alumni_admin, system::admin_health_check};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    // form-schema must register ahead of the {alumni_id} matcher
    cfg.service(
        web::scope("/admin")
            .service(admin_health_check)
            .service(
                web::resource("/alumni")
                    .route(web::post().to(alumni_admin::create_alumni))
                    .route(web::get().to(alumni_admin::list_alumni)),
            )
            .service(
                web::resource("/alumni/form-schema")
                    .route(web::get().to(alumni_admin::form_schema)),
            )
            .service(
                web::resource("/alumni/{alumni_id}")
                    .route(web::get().to(alumni_admin::get_alumni))
                    .route(web::put().to(alumni_admin::update_alumni))
                    .route(web::delete().to(alumni_admin::delete_alumni)),
            )
            .service(
                web::resource("/alumni/{alumni_id}/display")
                    .route(web::patch().to(alumni_admin::set_display_flags)),
            ),
    );
}
