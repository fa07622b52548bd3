//! CLI definition and execution
//!
//! Flags are merged with the project config, missing values are prompted
//! for, and the upload run is started.

use std::path::PathBuf;

use clap::Parser;
use clap::builder::FalseyValueParser;
use ossup_core::{ConfigManager, Result, RunConfig};

use crate::exit_code::ExitCode;
use crate::output::Formatter;

pub mod prompt;
pub mod upload;

/// ossup - upload local files or remote links to an object-storage bucket
///
/// Anything not given as a flag or in ./ossup.toml is asked for interactively.
/// Uploaded object names and URLs are written to ./uploaded_list.json.
#[derive(Parser, Debug, Default)]
#[command(name = "ossup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// URL of the endpoint that issues temporary storage credentials
    #[arg(short, long)]
    pub api: Option<String>,

    /// Local file or directory to upload
    #[arg(short, long)]
    pub file: Option<String>,

    /// Bucket directory to save files under
    #[arg(short = 's', long = "saveDir", visible_alias = "save-dir")]
    pub save_dir: Option<String>,

    /// .json file containing an array of remote links to upload
    #[arg(short = 'c', long = "configFile", visible_alias = "config-file")]
    pub config_file: Option<String>,

    /// Remote file link to upload
    #[arg(short, long)]
    pub url: Option<String>,

    /// Generate random object names
    #[arg(short, long)]
    pub random: bool,

    /// Print diagnostic output, including the merged configuration
    #[arg(short, long, env = "OSSUP_DEBUG", value_parser = FalseyValueParser::new())]
    pub debug: bool,
}

impl Cli {
    /// Flags as a run configuration rooted at `base_dir`
    pub fn into_run_config(self, base_dir: PathBuf) -> RunConfig {
        RunConfig {
            api: self.api,
            file: self.file,
            url: self.url,
            config_file: self.config_file,
            save_dir: self.save_dir,
            random: self.random.then_some(true),
            debug: self.debug,
            base_dir,
            ..Default::default()
        }
    }
}

/// Merge flags with `ossup.toml` from the working directory
pub fn load_config(cli: Cli) -> Result<RunConfig> {
    let base_dir = std::env::current_dir()?;
    let project = ConfigManager::in_dir(&base_dir).load()?;
    let config = cli.into_run_config(base_dir);
    Ok(match project {
        Some(project) => config.merge_project(project),
        None => config,
    })
}

/// Run an upload and return an exit code
pub async fn execute(config: RunConfig, formatter: &Formatter) -> ExitCode {
    if let Err(e) = config.check_supplied_paths() {
        formatter.error(&e.to_string());
        return ExitCode::from(&e);
    }

    let config = match prompt::resolve(config) {
        Ok(c) => c,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from(&e);
        }
    };

    if config.debug {
        match serde_json::to_string_pretty(&config) {
            Ok(json) => tracing::debug!("merged run configuration:\n{json}"),
            Err(e) => tracing::warn!("cannot render run configuration: {e}"),
        }
    }

    match upload::run(&config, formatter).await {
        Ok(manifest) => {
            formatter.success(&format!(
                "Upload finished, see {} for the uploaded files",
                formatter.highlight(&manifest.display().to_string())
            ));
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from(&e)
        }
    }
}
