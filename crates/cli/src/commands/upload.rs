//! Upload run
//!
//! Resolves the files to upload, acquires credentials, uploads everything
//! concurrently and writes the manifest. The first error ends the run; no
//! manifest is written for a failed run.

use std::future::Future;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ossup_core::config::read_url_list;
use ossup_core::path::parse_link;
use ossup_core::{
    ContentSource, Error, ObjectStore, Result, RunConfig, UploadSource, UploadTarget,
    generate_name, list_files, remote_key, upload_all, write_manifest,
};
use ossup_s3::{CredentialClient, RemoteFetcher, S3Client, http_client};

use crate::output::{Formatter, OutputConfig, ProgressBar};

/// Steps of a run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ResolveFileList,
    AcquireCredentials,
    ConcurrentUpload,
    WriteManifest,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::ResolveFileList => "resolve-file-list",
            Stage::AcquireCredentials => "acquire-credentials",
            Stage::ConcurrentUpload => "concurrent-upload",
            Stage::WriteManifest => "write-manifest",
        };
        f.write_str(name)
    }
}

async fn stage<T>(stage: Stage, step: impl Future<Output = Result<T>>) -> Result<T> {
    tracing::debug!(%stage, "stage started");
    let result = step.await;
    if let Err(e) = &result {
        tracing::debug!(%stage, error = %e, "stage failed");
    }
    result
}

/// Run the upload described by `config` and return the manifest path
pub async fn run(config: &RunConfig, formatter: &Formatter) -> Result<PathBuf> {
    let http = http_client()?;
    let output = formatter.config();

    let fetcher = RemoteFetcher::new(http.clone());
    let targets =
        stage(Stage::ResolveFileList, resolve_targets(config, &fetcher, output)).await?;
    if targets.is_empty() {
        formatter.warning("No files found to upload.");
    }

    let credential_client = CredentialClient::new(http);
    let source = config.credential_source();
    let store = stage(Stage::AcquireCredentials, async {
        let spinner = ProgressBar::spinner(output, "fetching storage credentials...");
        let credentials = credential_client
            .acquire(source.as_ref(), config.storage.as_ref())
            .await;
        let credentials = match credentials {
            Ok(c) => {
                spinner.finish_with_message("fetched storage credentials");
                c
            }
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e);
            }
        };
        S3Client::new(credentials, source.clone(), credential_client.clone()).await
    })
    .await?;

    upload_and_record(&store, targets, &config.base_dir, output).await
}

/// Turn the configured source into upload targets
pub async fn resolve_targets(
    config: &RunConfig,
    fetcher: &RemoteFetcher,
    output: OutputConfig,
) -> Result<Vec<UploadTarget>> {
    let dir = config.save_dir();
    let random = config.random();

    match config.source() {
        UploadSource::Local(path) => local_targets(&path, dir.unwrap_or_default(), random),
        UploadSource::Url(url) => {
            let link = parse_link(&url)?;
            let spinner = ProgressBar::spinner(output, "parsing remote file url...");
            let data = fetcher
                .fetch(&url)
                .await
                .inspect_err(|_| spinner.finish_and_clear())?;
            spinner.finish_with_message("parsed remote file url");
            Ok(vec![UploadTarget::bytes(remote_key(&link, dir, random), data)])
        }
        UploadSource::UrlList(path) => {
            let urls = read_url_list(&path)?;
            let links = urls
                .iter()
                .map(|u| {
                    parse_link(u).map_err(|_| {
                        Error::InvalidPath(format!("{}: not a remote link: {u}", path.display()))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let spinner = ProgressBar::spinner(output, "parsing remote file urls...");
            let data = fetcher
                .fetch_all(&urls)
                .await
                .inspect_err(|_| spinner.finish_and_clear())?;
            spinner.finish_with_message(&format!("parsed {} remote file urls", urls.len()));

            Ok(links
                .iter()
                .zip(data)
                .map(|(link, bytes)| UploadTarget::bytes(remote_key(link, dir, random), bytes))
                .collect())
        }
    }
}

/// Targets for a local file or directory
pub fn local_targets(path: &Path, dir: &str, random: bool) -> Result<Vec<UploadTarget>> {
    let files = list_files(path)?;
    Ok(files
        .into_iter()
        .map(|file| UploadTarget::file(generate_name(&file, dir, random), file))
        .collect())
}

/// Counts finished puts on a progress bar
struct Counted<'a> {
    inner: &'a dyn ObjectStore,
    bar: &'a ProgressBar,
}

#[async_trait]
impl ObjectStore for Counted<'_> {
    async fn put_object(&self, key: &str, source: ContentSource) -> Result<String> {
        let url = self.inner.put_object(key, source).await?;
        self.bar.inc(1);
        Ok(url)
    }
}

/// Upload `targets` and write the manifest into `dir`
pub async fn upload_and_record(
    store: &dyn ObjectStore,
    targets: Vec<UploadTarget>,
    dir: &Path,
    output: OutputConfig,
) -> Result<PathBuf> {
    let bar = ProgressBar::new(output, targets.len() as u64, "uploading files...");
    let counted = Counted { inner: store, bar: &bar };

    let results = stage(Stage::ConcurrentUpload, upload_all(&counted, targets))
        .await
        .inspect_err(|_| bar.finish_and_clear())?;
    bar.finish_with_message("uploaded files");

    stage(Stage::WriteManifest, async { write_manifest(dir, &results) }).await
}
