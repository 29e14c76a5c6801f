use std::io;
use std::path::{Component, Path, PathBuf};

use derive_more::Display;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use tokio::fs;
use tracing::warn;

/// Subdirectory of the media root where headshots are written.
pub const ALUMNI_PHOTO_PREFIX: &str = "alumni_photos";

const COLLISION_SUFFIX_LEN: usize = 7;

/// Filesystem-backed storage for uploaded media.
///
/// All public APIs speak in paths relative to the media root (the same
/// strings persisted in the database), never absolute filesystem paths.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        MediaStore { root: root.into() }
    }

    /// Creates the media root and headshot subdirectory if absent.
    pub async fn ensure_layout(&self) -> io::Result<()> {
        fs::create_dir_all(self.root.join(ALUMNI_PHOTO_PREFIX)).await
    }

    /// Writes normalized headshot bytes under `alumni_photos/` and returns
    /// the relative path to persist. When `file_name` is already taken, a
    /// random 7-character suffix is appended to the stem rather than
    /// overwriting the existing file.
    pub async fn store_headshot(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, MediaError> {
        let relative = self.available_name(file_name).await;
        let target = self.resolve(&relative)?;

        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, bytes).await?;

        Ok(relative)
    }

    /// Reads a stored file back as raw bytes.
    pub async fn read(&self, relative: &str) -> Result<Vec<u8>, MediaError> {
        let path = self.resolve(relative)?;
        Ok(fs::read(path).await?)
    }

    /// Replaces the contents of an already-stored file in place.
    pub async fn overwrite(&self, relative: &str, bytes: &[u8]) -> Result<(), MediaError> {
        let path = self.resolve(relative)?;
        Ok(fs::write(path, bytes).await?)
    }

    /// Best-effort removal, used to back out a freshly stored file when
    /// the row write referencing it fails.
    pub async fn discard(&self, relative: &str) {
        if let Ok(path) = self.resolve(relative) {
            if let Err(e) = fs::remove_file(path).await {
                warn!("Failed to remove stored media {}: {}", relative, e);
            }
        }
    }

    /// Size of a stored file in bytes, or `None` when the path does not
    /// resolve to a readable file.
    pub async fn file_size(&self, relative: &str) -> Option<u64> {
        let path = self.resolve(relative).ok()?;
        fs::metadata(path).await.ok().map(|m| m.len())
    }

    /// Maps a relative media path onto the filesystem, rejecting anything
    /// that would escape the media root.
    pub fn resolve(&self, relative: &str) -> Result<PathBuf, MediaError> {
        let candidate = Path::new(relative);
        if candidate.is_absolute() {
            return Err(MediaError::InvalidPath(relative.to_string()));
        }
        if !candidate
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(MediaError::InvalidPath(relative.to_string()));
        }

        Ok(self.root.join(candidate))
    }

    async fn available_name(&self, file_name: &str) -> String {
        let relative = format!("{ALUMNI_PHOTO_PREFIX}/{file_name}");
        let taken = match self.resolve(&relative) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        };
        if !taken {
            return relative;
        }

        let path = Path::new(file_name);
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("headshot");
        let suffix: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(COLLISION_SUFFIX_LEN)
            .map(char::from)
            .collect();

        format!("{ALUMNI_PHOTO_PREFIX}/{stem}_{suffix}.jpg")
    }
}

/// All errors related to media storage.
#[derive(Debug, Display)]
pub enum MediaError {
    #[display("Media storage failure: {_0}")]
    Io(io::Error),

    #[display("Invalid media path: {_0}")]
    InvalidPath(String),
}

impl From<io::Error> for MediaError {
    fn from(err: io::Error) -> Self {
        MediaError::Io(err)
    }
}
