//! Filesystem blob storage for publication files and rendered covers.
//!
//! Blob references are relative storage paths generated from a fresh UUIDv7:
//! `blobs/{first-2-hex}/{next-2-hex}/{uuid}{ext}`. The extension comes from
//! the caller's name hint and is the only part of the hint that is kept.
//!
//! ```rust,ignore
//! use publikasi_db::file_storage::FilesystemBackend;
//!
//! let backend = FilesystemBackend::new("/var/lib/publikasi/files");
//! let blob_ref = backend.put(&pdf_bytes, "census-2020.pdf").await?;
//! let bytes = backend.get(&blob_ref).await?;
//! ```

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use publikasi_core::file_safety::file_extension;
use publikasi_core::{BlobStore, Error, Result};

/// Longest extension (including the dot) carried into a storage path.
const MAX_EXTENSION_LEN: usize = 10;

/// Filesystem storage backend.
#[derive(Debug, Clone)]
pub struct FilesystemBackend {
    base_path: PathBuf,
}

impl FilesystemBackend {
    /// Create a new filesystem backend with the given base directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Base directory all blob references are resolved against.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a blob reference, refusing anything that escapes the base path.
    fn full_path(&self, blob_ref: &str) -> Result<PathBuf> {
        let relative = Path::new(blob_ref);
        let safe = !blob_ref.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(Error::InvalidInput(format!(
                "Invalid blob reference: {}",
                blob_ref
            )));
        }
        Ok(self.base_path.join(relative))
    }

    /// Validate that the storage backend can write, read, and delete files.
    ///
    /// Performs a full round-trip at startup to catch permission errors and
    /// missing directories early.
    pub async fn validate(&self) -> std::result::Result<(), String> {
        let test_dir = self.base_path.join("blobs/.health-check");
        let test_file = test_dir.join("check.bin");

        fs::create_dir_all(&test_dir)
            .await
            .map_err(|e| format!("create_dir_all({:?}): {}", test_dir, e))?;

        let data = b"publikasi-storage-health-check";
        fs::write(&test_file, data)
            .await
            .map_err(|e| format!("write({:?}): {}", test_file, e))?;

        let read_back = fs::read(&test_file)
            .await
            .map_err(|e| format!("read({:?}): {}", test_file, e))?;
        if read_back != data {
            return Err("read-back mismatch".to_string());
        }

        fs::remove_file(&test_file)
            .await
            .map_err(|e| format!("remove_file({:?}): {}", test_file, e))?;
        let _ = fs::remove_dir(&test_dir).await;

        Ok(())
    }
}

#[async_trait]
impl BlobStore for FilesystemBackend {
    async fn put(&self, data: &[u8], name_hint: &str) -> Result<String> {
        let blob_ref = generate_storage_path(&Uuid::now_v7(), name_hint);
        let full_path = self.full_path(&blob_ref)?;
        debug!(
            subsystem = "storage",
            component = "blob_store",
            op = "put",
            file_ref = %blob_ref,
            size = data.len(),
            "Writing blob"
        );

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                warn!(parent = %parent.display(), error = %e, "blob_store: create_dir_all failed");
                e
            })?;
        }

        // Atomic write: temp file + rename
        let temp_path = full_path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await.map_err(|e| {
            warn!(temp_path = %temp_path.display(), error = %e, "blob_store: File::create failed");
            e
        })?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &full_path).await.map_err(|e| {
            warn!(from = %temp_path.display(), to = %full_path.display(), error = %e, "blob_store: rename failed");
            e
        })?;

        // rw-r--r--, no execute
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&full_path, std::fs::Permissions::from_mode(0o644)).await?;
        }

        Ok(blob_ref)
    }

    async fn get(&self, blob_ref: &str) -> Result<Option<Vec<u8>>> {
        let full_path = self.full_path(blob_ref)?;
        match fs::read(&full_path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::Io(e)),
        }
    }

    async fn delete(&self, blob_ref: &str) -> Result<()> {
        let full_path = self.full_path(blob_ref)?;
        if fs::try_exists(&full_path).await? {
            fs::remove_file(full_path).await?;
        }
        Ok(())
    }
}

/// Generate a storage path from a UUID and a file-name hint.
///
/// Example: `blobs/01/94/01948f7e-8b2a-7c3d-9e4f-5a6b7c8d9e0f.pdf`
pub fn generate_storage_path(uuid: &Uuid, name_hint: &str) -> String {
    let hex = uuid.simple().to_string();
    let ext = file_extension(name_hint);
    let ext = if ext.len() <= MAX_EXTENSION_LEN && ext.chars().skip(1).all(|c| c.is_ascii_alphanumeric())
    {
        ext
    } else {
        String::new()
    };
    format!(
        "blobs/{}/{}/{}{}",
        &hex[0..2],
        &hex[2..4],
        uuid.as_hyphenated(),
        ext
    )
}
