use actix_multipart::form::MultipartForm;
use actix_web::{web, Either, HttpResponse};
use tracing::instrument;

use crate::{
    entities::alumni::{
        alumni_form_schema, AlumniListFilter, AlumniUpload, HeadshotUpload, NewAlumni,
        UpdateDisplayFlags,
    },
    errors::AppError,
    AppState,
};

type AlumniInput = Either<MultipartForm<AlumniUpload>, web::Json<NewAlumni>>;

#[instrument(skip(state, data_input))]
pub async fn create_alumni(
    state: web::Data<AppState>,
    data_input: Result<AlumniInput, actix_web::Error>,
) -> Result<HttpResponse, AppError> {
    let either = match data_input {
        Ok(either) => either,
        Err(e) => return Ok(unsupported_payload(e)),
    };

    let (metadata, upload) = split_upload(either).await?;
    let response = state.admin_handler.create_alumni(metadata, upload).await?;

    Ok(HttpResponse::Created().json(response))
}

#[instrument(skip(state, filter))]
pub async fn list_alumni(
    state: web::Data<AppState>,
    filter: web::Query<AlumniListFilter>,
) -> Result<HttpResponse, AppError> {
    let rows = state.admin_handler.list_alumni(&filter).await?;

    Ok(HttpResponse::Ok().json(rows))
}

#[instrument(skip(state))]
pub async fn get_alumni(
    state: web::Data<AppState>,
    alumni_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let detail = state.admin_handler.get_alumni(alumni_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(detail))
}

#[instrument(skip(state, data_input))]
pub async fn update_alumni(
    state: web::Data<AppState>,
    alumni_id: web::Path<i64>,
    data_input: Result<AlumniInput, actix_web::Error>,
) -> Result<HttpResponse, AppError> {
    let either = match data_input {
        Ok(either) => either,
        Err(e) => return Ok(unsupported_payload(e)),
    };

    let (metadata, upload) = split_upload(either).await?;
    let detail = state
        .admin_handler
        .update_alumni(alumni_id.into_inner(), metadata, upload)
        .await?;

    Ok(HttpResponse::Ok().json(detail))
}

#[instrument(skip(state, data))]
pub async fn set_display_flags(
    state: web::Data<AppState>,
    alumni_id: web::Path<i64>,
    data: web::Json<UpdateDisplayFlags>,
) -> Result<HttpResponse, AppError> {
    let detail = state
        .admin_handler
        .set_display_flags(alumni_id.into_inner(), &data)
        .await?;

    Ok(HttpResponse::Ok().json(detail))
}

#[instrument(skip(state))]
pub async fn delete_alumni(
    state: web::Data<AppState>,
    alumni_id: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    state.admin_handler.delete_alumni(alumni_id.into_inner()).await?;

    Ok(HttpResponse::NoContent().finish())
}

#[instrument(skip(query))]
pub async fn form_schema(
    query: web::Query<std::collections::HashMap<String, String>>,
) -> HttpResponse {
    let existing = query.get("existing").map_or(false, |v| v == "true");

    HttpResponse::Ok().json(alumni_form_schema(existing))
}

/// Pulls the metadata and the raw photo bytes out of whichever payload
/// form the request used. A present-but-empty file part counts as no
/// upload, which is how browsers submit an untouched file input.
async fn split_upload(either: AlumniInput) -> Result<(NewAlumni, Option<HeadshotUpload>), AppError> {
    match either {
        Either::Left(form) => {
            let form = form.into_inner();
            let metadata = form.metadata.0;

            let upload = match form.headshot {
                Some(file) if file.size > 0 => {
                    let bytes = tokio::fs::read(file.file.path()).await.map_err(|e| {
                        AppError::InternalError(format!("Failed to read uploaded file: {}", e))
                    })?;

                    Some(HeadshotUpload {
                        file_name: file.file_name.clone(),
                        bytes,
                    })
                }
                _ => None,
            };

            Ok((metadata, upload))
        }
        Either::Right(json) => Ok((json.into_inner(), None)),
    }
}

fn unsupported_payload(e: actix_web::Error) -> HttpResponse {
    HttpResponse::UnsupportedMediaType().json(serde_json::json!({
        "error": "Content type error",
        "message": "Request must be either application/json or multipart/form-data",
        "details": e.to_string()
    }))
}
