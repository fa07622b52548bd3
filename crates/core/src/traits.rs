//! ObjectStore trait definition
//!
//! This trait defines the single storage operation the uploader needs. It
//! keeps the orchestration independent of the storage SDK.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Bytes to be written to one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    /// Read from a local file at upload time
    File(PathBuf),
    /// Already fetched into memory
    Bytes(Vec<u8>),
}

/// One object to upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    /// Destination object key
    pub key: String,
    pub source: ContentSource,
}

impl UploadTarget {
    pub fn file(key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            source: ContentSource::File(path.into()),
        }
    }

    pub fn bytes(key: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            source: ContentSource::Bytes(data),
        }
    }
}

/// A completed upload, as recorded in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Destination object key
    #[serde(rename = "name")]
    pub key: String,
    /// Public URL of the object
    pub url: String,
}

/// Trait for object storage writes
///
/// This trait is implemented by the S3 adapter and can be mocked for testing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write `source` under `key` and return the object's URL
    async fn put_object(&self, key: &str, source: ContentSource) -> Result<String>;
}

/// Upload every target concurrently
///
/// All puts start at once. Results come back in the order of `targets`
/// regardless of completion order; the first failure fails the whole batch.
pub async fn upload_all(
    store: &dyn ObjectStore,
    targets: Vec<UploadTarget>,
) -> Result<Vec<UploadResult>> {
    let uploads = targets.into_iter().map(|target| async move {
        let url = store.put_object(&target.key, target.source).await?;
        tracing::debug!(key = %target.key, %url, "uploaded object");
        Ok::<_, Error>(UploadResult {
            key: target.key,
            url,
        })
    });

    futures::future::try_join_all(uploads).await
}
