//! Local filesystem asset host
//!
//! Used when no Cloudinary account is configured. Files land in
//! `<data dir>/uploads/` under a fresh uuid name.

use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{ImageRef, ImageUpload};
use crate::ports::AssetHost;

/// Asset host that keeps uploads on disk
pub struct LocalAssetHost {
    uploads_dir: PathBuf,
}

impl LocalAssetHost {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Resolve a public id to a path inside the uploads dir.
    ///
    /// Ids are bare file names; anything with a separator is rejected.
    fn path_for(&self, public_id: &str) -> Result<PathBuf> {
        if public_id.is_empty()
            || public_id.contains(['/', '\\'])
            || public_id == "."
            || public_id == ".."
        {
            return Err(Error::asset_host(format!(
                "invalid local asset id '{}'",
                public_id
            )));
        }
        Ok(self.uploads_dir.join(public_id))
    }
}

impl AssetHost for LocalAssetHost {
    fn name(&self) -> &str {
        "local"
    }

    fn upload(&self, file: &ImageUpload) -> Result<ImageRef> {
        fs::create_dir_all(&self.uploads_dir)?;

        let extension = Path::new(&file.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default();
        let name = format!("{}{}", Uuid::new_v4(), extension);

        fs::write(self.uploads_dir.join(&name), &file.bytes)?;
        tracing::debug!(file = %name, "stored upload locally");

        Ok(ImageRef {
            url: format!("/uploads/{}", name),
            public_id: name,
        })
    }

    fn delete(&self, public_id: &str) -> Result<()> {
        let path = self.path_for(public_id)?;
        fs::remove_file(&path)
            .map_err(|e| Error::asset_host(format!("failed to delete {}: {}", public_id, e)))
    }
}
