//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from ossup-core.
//! Objects are addressed virtual-host style unless the credentials ask for
//! path-style addressing.

use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;

use ossup_core::{ContentSource, CredentialSource, Credentials, Error, ObjectStore, Result};

use crate::credentials::{CredentialClient, RefreshingProvider};

/// Signing region used when the credentials carry none
const FALLBACK_REGION: &str = "us-east-1";

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
    credentials: Credentials,
}

impl S3Client {
    /// Create a client for the bucket named in `credentials`
    ///
    /// With a `refresh` source the SDK refetches credentials from the same
    /// endpoint when they expire.
    pub async fn new(
        credentials: Credentials,
        refresh: Option<CredentialSource>,
        credential_client: CredentialClient,
    ) -> Result<Self> {
        if credentials.bucket_name.is_empty() {
            return Err(Error::Credentials("Storage credentials name no bucket".into()));
        }
        if credentials.access_key_id.is_empty() || credentials.access_key_secret.is_empty() {
            return Err(Error::Credentials("Storage credentials have no access key".into()));
        }

        let endpoint = credentials.endpoint_url()?;
        let region = if credentials.region.is_empty() {
            FALLBACK_REGION.to_string()
        } else {
            credentials.region.clone()
        };

        let provider = RefreshingProvider::new(credentials.clone(), refresh, credential_client);

        // Build SDK config
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(provider)
            .region(aws_config::Region::new(region))
            .endpoint_url(endpoint.as_str().trim_end_matches('/'))
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(credentials.path_style)
            .build();

        tracing::debug!(
            bucket = %credentials.bucket_name,
            endpoint = %endpoint,
            path_style = credentials.path_style,
            "created storage client"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            credentials,
        })
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }

    pub fn bucket(&self) -> &str {
        &self.credentials.bucket_name
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn put_object(&self, key: &str, source: ContentSource) -> Result<String> {
        let object_key = key.trim_start_matches('/');

        let body = match source {
            ContentSource::File(path) => ByteStream::from_path(&path)
                .await
                .map_err(|e| Error::Upload(format!("{}: {e}", path.display())))?,
            ContentSource::Bytes(data) => ByteStream::from(data),
        };

        let mut request = self
            .inner
            .put_object()
            .bucket(self.bucket())
            .key(object_key)
            .body(body);

        if let Some(mime) = mime_guess::from_path(object_key).first() {
            request = request.content_type(mime.essence_str());
        }

        request
            .send()
            .await
            .map_err(|e| Error::Upload(format!("{key}: {}", DisplayErrorContext(&e))))?;

        self.credentials.object_url(key)
    }
}
