use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::errors::AppError;

/// Malformed JSON bodies come back as the same 400 shape the rest of
/// the API produces, instead of actix's default plain-text error.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler));
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidInput(format!("JSON payload error: {}", err)).into()
}
