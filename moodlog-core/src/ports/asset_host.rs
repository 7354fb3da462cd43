//! Asset host port - remote storage for profile images

use crate::domain::result::Result;
use crate::domain::{ImageRef, ImageUpload};

/// Stores and deletes profile images
///
/// Implementations talk to an external host (Cloudinary) or the local
/// filesystem. Callers treat delete failures as non-fatal.
pub trait AssetHost: Send + Sync {
    /// Provider name (e.g., "cloudinary", "local")
    fn name(&self) -> &str;

    /// Store the file and return where it can be fetched from
    fn upload(&self, file: &ImageUpload) -> Result<ImageRef>;

    /// Remove a previously uploaded asset by its public id
    fn delete(&self, public_id: &str) -> Result<()>;
}
