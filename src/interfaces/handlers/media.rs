use std::io::ErrorKind;

use actix_web::{get, web, HttpResponse};

use crate::{errors::AppError, media::store::MediaError, AppState};

/// Serves stored media straight off the filesystem. Content type is
/// sniffed from the bytes; anything unrecognized goes out as an opaque
/// download.
#[get("/media/{path:.*}")]
pub async fn serve_media(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let relative = path.into_inner();

    let bytes = state.media.read(&relative).await.map_err(|e| match e {
        MediaError::Io(ref io_err) if io_err.kind() == ErrorKind::NotFound => {
            AppError::NotFound(format!("No media stored at {}", relative))
        }
        e => AppError::from(e),
    })?;

    let content_type = infer::get(&bytes)
        .map(|kind| kind.mime_type())
        .unwrap_or("application/octet-stream");

    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}
