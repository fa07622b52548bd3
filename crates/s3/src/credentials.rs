//! Credential acquisition and refresh
//!
//! [`CredentialClient`] fetches temporary credentials from the configured
//! endpoint. [`RefreshingProvider`] hands them to the AWS SDK and refetches
//! from the same [`CredentialSource`] once they are due; the SDK caches
//! whatever it returns until the new expiry.

use std::time::SystemTime;

use aws_credential_types::provider::{self, ProvideCredentials, error::CredentialsError, future};
use jiff::Timestamp;
use ossup_core::{CredentialSource, Credentials, Error, Result};

/// Name reported to the SDK for credentials from this crate
const PROVIDER_NAME: &str = "ossup-credentials";

/// Fetches credentials from an HTTP endpoint
#[derive(Debug, Clone)]
pub struct CredentialClient {
    http: reqwest::Client,
}

impl CredentialClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// GET the endpoint and normalize its JSON response
    pub async fn fetch(&self, source: &CredentialSource) -> Result<Credentials> {
        let endpoint = &source.endpoint;
        let response = self
            .http
            .get(endpoint)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::Network(format!("GET {endpoint}: {e}")))?;

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| Error::Network(format!("GET {endpoint}: {e}")))?;

        let creds = Credentials::from_response(&body, &source.transform, Timestamp::now())?;
        tracing::debug!(
            bucket = %creds.bucket_name,
            region = %creds.region,
            refresh_interval_ms = ?creds.refresh_interval_ms,
            "fetched storage credentials"
        );
        Ok(creds)
    }

    /// Credentials for a run
    ///
    /// An endpoint wins over static credentials. With neither, the result is
    /// empty and building a storage client from it fails.
    pub async fn acquire(
        &self,
        source: Option<&CredentialSource>,
        fallback: Option<&Credentials>,
    ) -> Result<Credentials> {
        match (source, fallback) {
            (Some(source), _) => self.fetch(source).await,
            (None, Some(creds)) => {
                let mut creds = creds.clone();
                creds.refresh_interval_ms = creds.refresh_interval_at(Timestamp::now());
                Ok(creds)
            }
            (None, None) => {
                tracing::warn!("no credential endpoint or static credentials configured");
                Ok(Credentials::default())
            }
        }
    }
}

/// Convert to the SDK's credential type
pub fn to_sdk_credentials(creds: &Credentials) -> aws_credential_types::Credentials {
    aws_credential_types::Credentials::new(
        creds.access_key_id.clone(),
        creds.access_key_secret.clone(),
        creds.session_token().map(str::to_string),
        creds.expiration.map(SystemTime::from),
        PROVIDER_NAME,
    )
}

/// SDK credential provider that refetches expired credentials
#[derive(Debug)]
pub struct RefreshingProvider {
    current: Credentials,
    source: Option<CredentialSource>,
    client: CredentialClient,
}

impl RefreshingProvider {
    pub fn new(
        current: Credentials,
        source: Option<CredentialSource>,
        client: CredentialClient,
    ) -> Self {
        Self {
            current,
            source,
            client,
        }
    }

    async fn load(&self) -> provider::Result {
        let creds = match &self.source {
            Some(source) if self.current.needs_refresh(Timestamp::now()) => {
                tracing::debug!(endpoint = %source.endpoint, "refreshing storage credentials");
                self.client
                    .fetch(source)
                    .await
                    .map_err(CredentialsError::provider_error)?
            }
            _ => self.current.clone(),
        };
        Ok(to_sdk_credentials(&creds))
    }
}

impl ProvideCredentials for RefreshingProvider {
    fn provide_credentials<'a>(&'a self) -> future::ProvideCredentials<'a>
    where
        Self: 'a,
    {
        future::ProvideCredentials::new(self.load())
    }
}
