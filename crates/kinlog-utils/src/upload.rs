//! Blob upload: write a string, optionally gzip-compressed, to an object store.
//!
//! The store itself sits behind [`ObjectStore`] so the same call works against
//! a real bucket client, the local filesystem ([`LocalDirStore`]) or memory
//! ([`MemoryStore`]).

use std::collections::HashMap;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("gzip compression failed: {0}")]
    Compress(#[source] std::io::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid object key {0:?}")]
    InvalidKey(String),
}

/// Destination for uploaded objects.
pub trait ObjectStore {
    fn upload(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), UploadError>;
}

/// Upload `data` to `bucket/key`, gzip-compressed at level 9 when `gzip` is set.
pub fn put_str_data<S>(
    store: &S,
    bucket: &str,
    key: &str,
    data: &str,
    gzip: bool,
) -> Result<(), UploadError>
where
    S: ObjectStore + ?Sized,
{
    let body = if gzip {
        Bytes::from(gzip_compress(data.as_bytes())?)
    } else {
        Bytes::copy_from_slice(data.as_bytes())
    };
    let size = body.len();

    let result = store.upload(bucket, key, body);
    match &result {
        Ok(()) => tracing::info!(bucket, key, bytes = size, gzip, "object uploaded"),
        Err(err) => tracing::warn!(bucket, key, error = %err, "object upload failed"),
    }
    result
}

fn gzip_compress(data: &[u8]) -> Result<Vec<u8>, UploadError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).map_err(UploadError::Compress)?;
    encoder.finish().map_err(UploadError::Compress)
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Keeps uploaded objects in memory, keyed by `(bucket, key)`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<(String, String), Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<Bytes> {
        self.lock()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, String), Bytes>> {
        // A poisoned map is still a valid map.
        self.objects.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ObjectStore for MemoryStore {
    fn upload(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), UploadError> {
        self.lock()
            .insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LocalDirStore
// ---------------------------------------------------------------------------

/// Writes objects to `<root>/<bucket>/<key>`, creating directories as needed.
#[derive(Debug, Clone)]
pub struct LocalDirStore {
    root: PathBuf,
}

impl LocalDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Where `bucket/key` lives on disk. Keys that would escape the bucket
    /// directory are rejected.
    pub fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, UploadError> {
        let normal = |s: &str| {
            !s.is_empty()
                && Path::new(s)
                    .components()
                    .all(|c| matches!(c, Component::Normal(_)))
        };
        if !normal(bucket) {
            return Err(UploadError::InvalidKey(bucket.to_string()));
        }
        if !normal(key) {
            return Err(UploadError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(bucket).join(key))
    }
}

impl ObjectStore for LocalDirStore {
    fn upload(&self, bucket: &str, key: &str, body: Bytes) -> Result<(), UploadError> {
        let path = self.object_path(bucket, key)?;
        let io_err = |source| UploadError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&path, &body).map_err(io_err)
    }
}
