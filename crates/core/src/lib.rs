//! ossup-core: Core library for the ossup uploader
//!
//! This crate provides the SDK-independent parts of an upload run:
//! - Configuration merging and upload source selection
//! - Path and link utilities, local file enumeration
//! - Destination key naming
//! - Credential normalization
//! - Interactive prompt stages
//! - ObjectStore trait, concurrent upload and the result manifest

pub mod config;
pub mod credentials;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod path;
pub mod prompt;
pub mod traits;
pub mod walk;

pub use config::{ConfigManager, ProjectConfig, RunConfig, UploadSource};
pub use credentials::{CredentialSource, Credentials, ResponseTransform};
pub use error::{Error, Result};
pub use manifest::{MANIFEST_FILE, write_manifest};
pub use naming::{generate_name, remote_key};
pub use prompt::{Answer, PromptSpec, Prompter, run_prompts};
pub use traits::{ContentSource, ObjectStore, UploadResult, UploadTarget, upload_all};
pub use walk::list_files;
