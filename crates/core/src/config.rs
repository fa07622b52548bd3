//! Configuration management
//!
//! A run is configured from three layers: command-line flags, an optional
//! `ossup.toml` in the working directory, and interactive prompts. Flags win
//! over the project file; prompts only fill what is still missing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::credentials::{CredentialSource, Credentials, ResponseTransform};
use crate::error::{Error, Result};
use crate::path::{absolute_path, is_json_file, is_link};

/// Project configuration file name, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "ossup.toml";

/// Save directory used when the user accepts the prompt default
pub const DEFAULT_SAVE_DIR: &str = "nomi";

/// Credential endpoint settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub url: String,
    #[serde(default)]
    pub transform: ResponseTransform,
}

/// Contents of `ossup.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub api: Option<ApiConfig>,
    /// Static credentials, used when no endpoint is configured
    #[serde(default)]
    pub storage: Option<Credentials>,
    #[serde(default)]
    pub save_dir: Option<String>,
    #[serde(default)]
    pub random: Option<bool>,
    #[serde(default)]
    pub debug: Option<bool>,
}

/// Loads the project configuration file
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Look for the project file in `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            config_path: dir.join(PROJECT_CONFIG_FILE),
        }
    }

    /// Use a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load the project file
    ///
    /// A missing file is not an error; an unreadable or malformed one is.
    pub fn load(&self) -> Result<Option<ProjectConfig>> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no project config");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let config: ProjectConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("{}: {e}", self.config_path.display()))
        })?;
        Ok(Some(config))
    }
}

/// Upload source kind chosen at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Local,
    Remote,
}

/// Remote source kind chosen at the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteKind {
    Url,
    Config,
}

/// Where the files of a run come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadSource {
    /// A local file or directory
    Local(PathBuf),
    /// A single remote link
    Url(String),
    /// A JSON file listing remote links
    UrlList(PathBuf),
}

/// Merged view of flags, project config and prompt answers
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    /// Credential endpoint
    pub api: Option<String>,
    #[serde(skip_serializing_if = "is_default_transform")]
    pub transform: ResponseTransform,
    /// Static credentials from the project file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<Credentials>,
    /// Local file or directory
    pub file: Option<String>,
    /// Remote link
    pub url: Option<String>,
    /// JSON file of remote links
    pub config_file: Option<String>,
    pub save_dir: Option<String>,
    pub random: Option<bool>,
    pub debug: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_kind: Option<SourceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_kind: Option<RemoteKind>,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn is_default_transform(t: &ResponseTransform) -> bool {
    *t == ResponseTransform::default()
}

impl RunConfig {
    /// Fill fields not set on the command line from the project file
    pub fn merge_project(mut self, project: ProjectConfig) -> Self {
        // The transform only describes the project's own endpoint
        if let Some(api) = project.api {
            match self.api.as_deref() {
                None => {
                    self.api = Some(api.url);
                    self.transform = api.transform;
                }
                Some(url) if url == api.url => self.transform = api.transform,
                Some(_) => {}
            }
        }
        self.storage = self.storage.or(project.storage);
        self.save_dir = self.save_dir.or(project.save_dir);
        self.random = self.random.or(project.random);
        self.debug = self.debug || project.debug.unwrap_or(false);
        self
    }

    pub fn resolve(&self, path: &str) -> PathBuf {
        absolute_path(&self.base_dir, path)
    }

    /// A local path was given and exists
    pub fn has_valid_file(&self) -> bool {
        self.file
            .as_deref()
            .is_some_and(|f| !f.is_empty() && self.resolve(f).exists())
    }

    /// A syntactically valid remote link was given
    pub fn has_valid_url(&self) -> bool {
        self.url.as_deref().is_some_and(is_link)
    }

    /// A URL-list file was given and is an existing `.json` file
    pub fn has_valid_config_file(&self) -> bool {
        self.config_file
            .as_deref()
            .is_some_and(|f| is_json_file(&self.resolve(f)))
    }

    /// The credential endpoint is a valid link
    pub fn has_valid_api(&self) -> bool {
        self.api.as_deref().is_some_and(is_link)
    }

    /// Reject supplied paths that can never work, before any prompt is shown
    pub fn check_supplied_paths(&self) -> Result<()> {
        if let Some(file) = self.file.as_deref() {
            let path = self.resolve(file);
            if !path.exists() {
                return Err(Error::InvalidPath(format!(
                    "The file or directory does not exist: {}",
                    path.display()
                )));
            }
        }

        if let Some(config_file) = self.config_file.as_deref() {
            let path = self.resolve(config_file);
            if !path.exists() {
                return Err(Error::InvalidPath(format!(
                    "The URL list file does not exist: {}",
                    path.display()
                )));
            }
            if !is_json_file(&path) {
                return Err(Error::InvalidPath(format!(
                    "The URL list must be a .json file: {}",
                    path.display()
                )));
            }
        }

        Ok(())
    }

    /// Pick the upload source
    ///
    /// A local path wins over a remote link, which wins over a URL-list file.
    /// With none of them the working directory is uploaded.
    pub fn source(&self) -> UploadSource {
        if let Some(file) = self.file.as_deref().filter(|f| !f.is_empty()) {
            return UploadSource::Local(self.resolve(file));
        }
        if let Some(url) = self.url.as_deref().filter(|u| is_link(u)) {
            return UploadSource::Url(url.trim().to_string());
        }
        if let Some(config_file) = self.config_file.as_deref().filter(|f| !f.is_empty()) {
            return UploadSource::UrlList(self.resolve(config_file));
        }
        UploadSource::Local(self.base_dir.clone())
    }

    /// Where credentials come from: an endpoint, static values, or nothing
    pub fn credential_source(&self) -> Option<CredentialSource> {
        self.api
            .as_deref()
            .map(|api| CredentialSource::new(api).with_transform(self.transform.clone()))
    }

    /// Save directory, `None` when unset or explicitly empty
    pub fn save_dir(&self) -> Option<&str> {
        self.save_dir.as_deref().filter(|d| !d.is_empty())
    }

    pub fn random(&self) -> bool {
        self.random.unwrap_or(false)
    }
}

/// Read a URL-list file: a JSON array of link strings
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    let urls: Vec<String> = serde_json::from_str(&content).map_err(|e| {
        Error::InvalidPath(format!(
            "{} is not a JSON array of URLs: {e}",
            path.display()
        ))
    })?;
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> RunConfig {
        RunConfig {
            base_dir: dir.path().to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_nonexistent_returns_none() {
        let dir = TempDir::new().unwrap();
        let manager = ConfigManager::in_dir(dir.path());
        assert!(manager.load().unwrap().is_none());
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG_FILE),
            r#"
            save_dir = "assets"
            random = false

            [api]
            url = "https://example.com/sts"

            [api.transform]
            pointer = "/result"
            fields = { accessKeyId = "AccessKeyId" }

            [storage]
            bucketName = "media"
            region = "oss-cn-hangzhou"
            "#,
        )
        .unwrap();

        let project = ConfigManager::in_dir(dir.path()).load().unwrap().unwrap();
        assert_eq!(project.save_dir.as_deref(), Some("assets"));
        assert_eq!(project.random, Some(false));
        let api = project.api.unwrap();
        assert_eq!(api.url, "https://example.com/sts");
        assert_eq!(api.transform.pointer.as_deref(), Some("/result"));
        assert_eq!(api.transform.fields["accessKeyId"], "AccessKeyId");
        let storage = project.storage.unwrap();
        assert_eq!(storage.bucket_name, "media");
        assert!(!storage.path_style);
    }

    #[test]
    fn test_load_malformed_project_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "random = \"sometimes\"").unwrap();

        let result = ConfigManager::with_path(path).load();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_flags_win_over_project_config() {
        let cli = RunConfig {
            api: Some("https://cli.example.com/sts".into()),
            save_dir: Some("cli".into()),
            ..Default::default()
        };
        let project = ProjectConfig {
            api: Some(ApiConfig {
                url: "https://project.example.com/sts".into(),
                transform: ResponseTransform {
                    pointer: Some("/data/creds".into()),
                    ..Default::default()
                },
            }),
            save_dir: Some("project".into()),
            random: Some(false),
            debug: Some(true),
            ..Default::default()
        };

        let merged = cli.merge_project(project);
        assert_eq!(merged.api.as_deref(), Some("https://cli.example.com/sts"));
        assert_eq!(merged.transform, ResponseTransform::default());
        assert_eq!(merged.save_dir.as_deref(), Some("cli"));
        assert_eq!(merged.random, Some(false));
        assert!(merged.debug);
    }

    #[test]
    fn test_project_transform_follows_its_endpoint() {
        let project = || ProjectConfig {
            api: Some(ApiConfig {
                url: "https://project.example.com/sts".into(),
                transform: ResponseTransform {
                    pointer: Some("/data/creds".into()),
                    ..Default::default()
                },
            }),
            ..Default::default()
        };

        let merged = RunConfig::default().merge_project(project());
        assert_eq!(merged.api.as_deref(), Some("https://project.example.com/sts"));
        assert_eq!(merged.transform.pointer.as_deref(), Some("/data/creds"));

        let same = RunConfig {
            api: Some("https://project.example.com/sts".into()),
            ..Default::default()
        };
        let merged = same.merge_project(project());
        assert_eq!(merged.transform.pointer.as_deref(), Some("/data/creds"));
        assert_eq!(
            merged.credential_source().unwrap().transform.pointer.as_deref(),
            Some("/data/creds")
        );
    }

    #[test]
    fn test_source_precedence() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "a").unwrap();

        let mut config = config_in(&dir);
        assert_eq!(config.source(), UploadSource::Local(dir.path().to_path_buf()));

        config.config_file = Some("urls.json".into());
        assert_eq!(config.source(), UploadSource::UrlList(dir.path().join("urls.json")));

        config.url = Some("not a link".into());
        assert_eq!(config.source(), UploadSource::UrlList(dir.path().join("urls.json")));

        config.url = Some("https://example.com/x.png".into());
        assert_eq!(config.source(), UploadSource::Url("https://example.com/x.png".into()));

        config.file = Some("a.txt".into());
        assert_eq!(config.source(), UploadSource::Local(dir.path().join("a.txt")));
    }

    #[test]
    fn test_check_supplied_paths() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("urls.json"), "[]").unwrap();
        std::fs::write(dir.path().join("urls.txt"), "[]").unwrap();

        let mut config = config_in(&dir);
        assert!(config.check_supplied_paths().is_ok());

        config.file = Some("missing".into());
        assert!(matches!(config.check_supplied_paths(), Err(Error::InvalidPath(_))));

        config.file = None;
        config.config_file = Some("urls.txt".into());
        assert!(matches!(config.check_supplied_paths(), Err(Error::InvalidPath(_))));

        config.config_file = Some("urls.json".into());
        assert!(config.check_supplied_paths().is_ok());
        assert!(config.has_valid_config_file());
    }

    #[test]
    fn test_read_url_list() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("urls.json");
        let bad = dir.path().join("bad.json");
        std::fs::write(&good, r#"["http://host/a.png", "http://host/b/c.css"]"#).unwrap();
        std::fs::write(&bad, r#"{"urls": []}"#).unwrap();

        assert_eq!(read_url_list(&good).unwrap().len(), 2);
        assert!(matches!(read_url_list(&bad), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn test_debug_view_hides_secrets() {
        let config = RunConfig {
            storage: Some(Credentials {
                access_key_id: "id".into(),
                access_key_secret: "secret".into(),
                security_token: "token".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"accessKeyId\":\"id\""));
        assert!(!json.contains("secret"));
        assert!(!json.contains("token"));
    }
}
