use actix_web::{get, web, HttpResponse, Responder};
use tracing::instrument;

use crate::{errors::AppError, AppState};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Welcome to the SHPE UVA Alumni Directory API!",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "organization": "SHPE at the University of Virginia",
        "pages": ["/api/v1/pages/eboard", "/api/v1/pages/alumni"]
    }))
}

#[instrument(skip(state))]
pub async fn executive_board(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let context = state.pages_handler.executive_board().await?;

    Ok(HttpResponse::Ok().json(context))
}

#[instrument(skip(state))]
pub async fn alumni_directory(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let context = state.pages_handler.alumni_directory().await?;

    Ok(HttpResponse::Ok().json(context))
}
