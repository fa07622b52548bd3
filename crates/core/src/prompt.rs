//! Interactive prompt stages
//!
//! Each stage looks at the current [`RunConfig`] and either returns the prompt
//! needed to fill a missing field or `None` when nothing is missing. A
//! [`Prompter`] shows the prompts; [`run_prompts`] walks the stages in order
//! and applies every answer before the next stage is evaluated.

use crate::config::{DEFAULT_SAVE_DIR, RemoteKind, RunConfig, SourceKind};
use crate::error::{Error, Result};
use crate::path::{absolute_path, is_json_file, is_link};

/// Field a prompt fills in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Api,
    SourceKind,
    File,
    RemoteKind,
    Url,
    ConfigFile,
    SaveDir,
    Random,
}

/// Synchronous check of a text answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// A remote link
    Link,
    /// An existing file or directory
    ExistingPath,
    /// An existing `.json` file
    JsonFile,
}

impl Validator {
    /// Validate `input`, resolving relative paths against `base`
    pub fn check(&self, base: &std::path::Path, input: &str) -> Result<()> {
        let input = input.trim();
        let ok = match self {
            Validator::Link => is_link(input),
            Validator::ExistingPath => !input.is_empty() && absolute_path(base, input).exists(),
            Validator::JsonFile => !input.is_empty() && is_json_file(&absolute_path(base, input)),
        };
        if ok {
            return Ok(());
        }
        let message = match self {
            Validator::Link => "Please enter a valid remote file link",
            Validator::ExistingPath => "Please enter an existing file or directory path",
            Validator::JsonFile => "Please enter the path of an existing .json file",
        };
        Err(Error::Validation(message.to_string()))
    }
}

/// One entry of a select prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: &'static str,
    pub value: &'static str,
}

/// A prompt to show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSpec {
    Input {
        field: Field,
        message: &'static str,
        default: Option<&'static str>,
        validator: Option<Validator>,
    },
    Select {
        field: Field,
        message: &'static str,
        choices: Vec<Choice>,
    },
    Confirm {
        field: Field,
        message: &'static str,
        default: bool,
    },
}

impl PromptSpec {
    pub fn field(&self) -> Field {
        match self {
            PromptSpec::Input { field, .. }
            | PromptSpec::Select { field, .. }
            | PromptSpec::Confirm { field, .. } => *field,
        }
    }
}

/// Answer to a prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// Text input, or the `value` of the selected choice
    Text(String),
    Bool(bool),
}

/// Shows prompts to the user
pub trait Prompter {
    /// Show `spec` and return the answer
    ///
    /// Implementations re-ask on validation failure; an error means the
    /// prompt itself could not be shown.
    fn ask(&mut self, spec: &PromptSpec) -> Result<Answer>;
}

/// A stage of the prompt flow
pub type Stage = fn(&RunConfig) -> Option<PromptSpec>;

/// Stages in the order they are shown
pub const STAGES: [Stage; 6] = [
    api_stage,
    source_kind_stage,
    source_detail_stage,
    remote_detail_stage,
    save_dir_stage,
    random_stage,
];

fn api_stage(config: &RunConfig) -> Option<PromptSpec> {
    if config.has_valid_api() || (config.api.is_none() && config.storage.is_some()) {
        return None;
    }
    Some(PromptSpec::Input {
        field: Field::Api,
        message: "URL of the endpoint that issues storage credentials",
        default: None,
        validator: Some(Validator::Link),
    })
}

fn source_kind_stage(config: &RunConfig) -> Option<PromptSpec> {
    if config.source_kind.is_some()
        || config.has_valid_file()
        || config.has_valid_url()
        || config.has_valid_config_file()
    {
        return None;
    }
    Some(PromptSpec::Select {
        field: Field::SourceKind,
        message: "Upload from",
        choices: vec![
            Choice {
                label: "Local files",
                value: "local",
            },
            Choice {
                label: "Remote file links",
                value: "remote",
            },
        ],
    })
}

fn source_detail_stage(config: &RunConfig) -> Option<PromptSpec> {
    match config.source_kind? {
        SourceKind::Local if !config.has_valid_file() => Some(PromptSpec::Input {
            field: Field::File,
            message: "Relative path of the file or directory to upload",
            default: Some("."),
            validator: Some(Validator::ExistingPath),
        }),
        SourceKind::Remote if config.remote_kind.is_none() => Some(PromptSpec::Select {
            field: Field::RemoteKind,
            message: "Remote files come from",
            choices: vec![
                Choice {
                    label: "A single file link",
                    value: "url",
                },
                Choice {
                    label: "A .json file listing links",
                    value: "config",
                },
            ],
        }),
        _ => None,
    }
}

fn remote_detail_stage(config: &RunConfig) -> Option<PromptSpec> {
    match config.remote_kind? {
        RemoteKind::Url if !config.has_valid_url() => Some(PromptSpec::Input {
            field: Field::Url,
            message: "Link of the remote file to upload",
            default: None,
            validator: Some(Validator::Link),
        }),
        RemoteKind::Config if !config.has_valid_config_file() => Some(PromptSpec::Input {
            field: Field::ConfigFile,
            message: "Relative path of the .json file listing remote links",
            default: None,
            validator: Some(Validator::JsonFile),
        }),
        _ => None,
    }
}

fn save_dir_stage(config: &RunConfig) -> Option<PromptSpec> {
    if config.save_dir.is_some() {
        return None;
    }
    Some(PromptSpec::Input {
        field: Field::SaveDir,
        message: "Directory to save files under (created if missing)",
        default: Some(DEFAULT_SAVE_DIR),
        validator: None,
    })
}

fn random_stage(config: &RunConfig) -> Option<PromptSpec> {
    if config.random.is_some() {
        return None;
    }
    Some(PromptSpec::Confirm {
        field: Field::Random,
        message: "Generate random file names?",
        default: true,
    })
}

impl RunConfig {
    /// Store a prompt answer in the field it belongs to
    pub fn apply(&mut self, field: Field, answer: Answer) -> Result<()> {
        let mismatch = || Error::Prompt(format!("unexpected answer for {field:?}"));
        match (field, answer) {
            (Field::Api, Answer::Text(v)) => self.api = Some(v.trim().to_string()),
            (Field::File, Answer::Text(v)) => self.file = Some(v.trim().to_string()),
            (Field::Url, Answer::Text(v)) => self.url = Some(v.trim().to_string()),
            (Field::ConfigFile, Answer::Text(v)) => self.config_file = Some(v.trim().to_string()),
            (Field::SaveDir, Answer::Text(v)) => self.save_dir = Some(v.trim().to_string()),
            (Field::Random, Answer::Bool(v)) => self.random = Some(v),
            (Field::SourceKind, Answer::Text(v)) => {
                self.source_kind = Some(match v.as_str() {
                    "local" => SourceKind::Local,
                    "remote" => SourceKind::Remote,
                    _ => return Err(mismatch()),
                })
            }
            (Field::RemoteKind, Answer::Text(v)) => {
                self.remote_kind = Some(match v.as_str() {
                    "url" => RemoteKind::Url,
                    "config" => RemoteKind::Config,
                    _ => return Err(mismatch()),
                })
            }
            _ => return Err(mismatch()),
        }
        Ok(())
    }
}

/// Ask for every missing field, in stage order
pub fn run_prompts(mut config: RunConfig, prompter: &mut dyn Prompter) -> Result<RunConfig> {
    for stage in STAGES {
        if let Some(spec) = stage(&config) {
            let answer = prompter.ask(&spec)?;
            tracing::debug!(field = ?spec.field(), ?answer, "prompt answered");
            config.apply(spec.field(), answer)?;
        }
    }
    Ok(config)
}
