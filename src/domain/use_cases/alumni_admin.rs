use tracing::warn;
use validator::Validate;

use crate::{
    entities::alumni::{
        Alumni, AlumniAdminRow, AlumniCreatedResponse, AlumniDetail, AlumniListFilter,
        HeadshotUpload, NewAlumni, UpdateDisplayFlags,
    },
    errors::AppError,
    media::store::MediaStore,
    repositories::alumni::AlumniRepository,
    utils::image::{format_file_size, normalize_headshot, normalized_file_name},
};

/// Administrative CRUD over alumni records, including the photo
/// normalization pipeline that runs on every save carrying a headshot.
pub struct AlumniAdminHandler<R>
where
    R: AlumniRepository,
{
    pub alumni_repo: R,
    pub media: MediaStore,
}

impl<R> AlumniAdminHandler<R>
where
    R: AlumniRepository,
{
    pub fn new(alumni_repo: R, media: MediaStore) -> Self {
        AlumniAdminHandler { alumni_repo, media }
    }

    /// Creates a record. An attached photo is normalized and stored
    /// first; if the row insert then fails, the stored file is backed
    /// out so no orphaned state survives the save.
    pub async fn create_alumni(
        &self,
        data: NewAlumni,
        upload: Option<HeadshotUpload>,
    ) -> Result<AlumniCreatedResponse, AppError> {
        let data = data.normalized();
        data.validate()?;

        let headshot = match upload {
            Some(upload) => Some(self.normalize_and_store(upload).await?),
            None => None,
        };

        let insert = data.prepare_for_insert(headshot);
        let id = match self.alumni_repo.create_alumni(&insert).await {
            Ok(id) => id,
            Err(e) => {
                if let Some(path) = &insert.headshot {
                    self.media.discard(path).await;
                }
                return Err(e);
            }
        };

        let record = self.alumni_repo.get_alumni_by_id(id).await?;

        Ok(AlumniCreatedResponse {
            id,
            display_name: record.display_name(),
            headshot: record.headshot,
            admin_url: format!("/api/v1/admin/alumni/{}", id),
        })
    }

    pub async fn list_alumni(&self, filter: &AlumniListFilter) -> Result<Vec<AlumniAdminRow>, AppError> {
        let records = self.alumni_repo.list_admin_alumni(filter).await?;

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let image_size = self.image_size_display(&record).await;
            rows.push(record.to_admin_row(image_size));
        }

        Ok(rows)
    }

    pub async fn get_alumni(&self, id: i64) -> Result<AlumniDetail, AppError> {
        let record = self
            .alumni_repo
            .get_alumni_by_id(id)
            .await
            .map_err(missing_record)?;

        let image_size = self.image_size_display(&record).await;
        Ok(record.to_detail(image_size))
    }

    /// Full update. A new photo replaces the stored one; without a new
    /// photo the stored file is re-normalized in place, matching the
    /// behavior of saving an unchanged form.
    pub async fn update_alumni(
        &self,
        id: i64,
        data: NewAlumni,
        upload: Option<HeadshotUpload>,
    ) -> Result<AlumniDetail, AppError> {
        let data = data.normalized();
        data.validate()?;

        let current = self
            .alumni_repo
            .get_alumni_by_id(id)
            .await
            .map_err(missing_record)?;

        let headshot = match upload {
            Some(upload) => Some(self.normalize_and_store(upload).await?),
            None => {
                self.renormalize_stored(&current).await?;
                None
            }
        };

        let update = data.prepare_for_update(headshot);
        let record = self
            .alumni_repo
            .update_alumni(id, &update)
            .await
            .map_err(missing_record)?;

        let image_size = self.image_size_display(&record).await;
        Ok(record.to_detail(image_size))
    }

    /// Inline edit of the two list-view flags.
    pub async fn set_display_flags(
        &self,
        id: i64,
        flags: &UpdateDisplayFlags,
    ) -> Result<AlumniDetail, AppError> {
        let record = self
            .alumni_repo
            .set_display_flags(id, flags)
            .await
            .map_err(missing_record)?;

        let image_size = self.image_size_display(&record).await;
        Ok(record.to_detail(image_size))
    }

    /// Removes the row. The stored photo is left on disk; the file
    /// storage never garbage-collects on record deletion.
    pub async fn delete_alumni(&self, id: i64) -> Result<(), AppError> {
        self.alumni_repo
            .delete_alumni(id)
            .await
            .map_err(missing_record)
    }

    async fn normalize_and_store(&self, upload: HeadshotUpload) -> Result<String, AppError> {
        // A recognizable non-image gets a clearer rejection than the
        // decoder's; unknown types fall through to the decoder.
        if let Some(kind) = infer::get(&upload.bytes) {
            if kind.matcher_type() != infer::MatcherType::Image {
                return Err(AppError::field("headshot", "Uploaded file is not an image"));
            }
        }

        let normalized = normalize_headshot(&upload.bytes)?;
        let file_name = normalized_file_name(upload.file_name.as_deref());
        let path = self.media.store_headshot(&file_name, &normalized.bytes).await?;

        Ok(path)
    }

    /// A save re-runs normalization on the stored photo even when the
    /// edit did not touch it. A missing stored file is treated as
    /// absence and skipped with a warning; a stored file that no longer
    /// decodes aborts the save like any other decode failure.
    async fn renormalize_stored(&self, record: &Alumni) -> Result<(), AppError> {
        let Some(path) = &record.headshot else {
            return Ok(());
        };

        let bytes = match self.media.read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(
                    "Stored headshot {} for alumni {} is unreadable, skipping re-normalization: {}",
                    path, record.id, e
                );
                return Ok(());
            }
        };

        let normalized = normalize_headshot(&bytes)?;
        self.media.overwrite(path, &normalized.bytes).await?;

        Ok(())
    }

    async fn image_size_display(&self, record: &Alumni) -> String {
        match &record.headshot {
            Some(path) => match self.media.file_size(path).await {
                Some(bytes) => format_file_size(bytes),
                None => "No image".to_string(),
            },
            None => "No image".to_string(),
        }
    }
}

fn missing_record(e: AppError) -> AppError {
    match e {
        AppError::NotFound(_) => AppError::NotFound("Alumni record not found".to_string()),
        e => e,
    }
}
