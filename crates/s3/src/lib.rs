//! ossup-s3: storage and HTTP adapters for ossup
//!
//! This crate provides the ObjectStore implementation on top of aws-sdk-s3,
//! the credential endpoint client and the remote file fetcher. It is the
//! only crate that talks to the network.

pub mod client;
pub mod credentials;
pub mod fetch;

#[cfg(test)]
mod test_server;

pub use client::S3Client;
pub use credentials::{CredentialClient, RefreshingProvider};
pub use fetch::{RemoteFetcher, http_client};
