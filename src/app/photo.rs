//! Photo upload handling.

use crate::domain::model::{Photo, Product};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A photo part received by the transport layer and spooled somewhere readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub path: PathBuf,
    pub size: u64,
    pub content_type: String,
}

/// Byte source for uploaded photos.
#[async_trait]
pub trait PhotoReader: Send + Sync {
    async fn read_bytes(&self, path: &Path) -> std::io::Result<Vec<u8>>;
}

/// Reads uploads from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsPhotoReader;

#[async_trait]
impl PhotoReader for FsPhotoReader {
    async fn read_bytes(&self, path: &Path) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }
}

/// Sets the record's photo from `upload`, leaving it untouched when there is none.
pub async fn attach_photo(
    record: &mut Product,
    upload: Option<&PhotoUpload>,
    reader: &dyn PhotoReader,
) -> std::io::Result<()> {
    let Some(upload) = upload else {
        return Ok(());
    };
    let data = reader.read_bytes(&upload.path).await?;
    record.photo = Some(Photo {
        data,
        content_type: upload.content_type.clone(),
    });
    Ok(())
}
