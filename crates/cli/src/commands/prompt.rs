//! Terminal prompts
//!
//! Shows the prompt stages from ossup-core with dialoguer. Validation
//! failures are shown inline and the same prompt is asked again.

use std::path::PathBuf;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use ossup_core::{Answer, Error, PromptSpec, Prompter, Result, RunConfig, run_prompts};

/// Prompter backed by the terminal
pub struct TerminalPrompter {
    base_dir: PathBuf,
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    /// Relative paths typed at a prompt are checked against `base_dir`
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            theme: ColorfulTheme::default(),
        }
    }
}

fn prompt_error(e: dialoguer::Error) -> Error {
    Error::Prompt(e.to_string())
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, spec: &PromptSpec) -> Result<Answer> {
        match spec {
            PromptSpec::Input {
                message,
                default,
                validator,
                ..
            } => {
                let mut input = Input::<String>::with_theme(&self.theme).with_prompt(*message);
                if let Some(default) = default {
                    input = input.default((*default).to_string());
                }
                if let Some(validator) = *validator {
                    let base = self.base_dir.clone();
                    input = input.validate_with(
                        move |value: &String| -> std::result::Result<(), String> {
                            validator.check(&base, value).map_err(|e| e.to_string())
                        },
                    );
                }
                input.interact_text().map(Answer::Text).map_err(prompt_error)
            }
            PromptSpec::Select {
                message, choices, ..
            } => {
                let labels: Vec<&str> = choices.iter().map(|c| c.label).collect();
                let index = Select::with_theme(&self.theme)
                    .with_prompt(*message)
                    .items(&labels)
                    .default(0)
                    .interact()
                    .map_err(prompt_error)?;
                let choice = choices
                    .get(index)
                    .ok_or_else(|| Error::Prompt(format!("no choice at index {index}")))?;
                Ok(Answer::Text(choice.value.to_string()))
            }
            PromptSpec::Confirm {
                message, default, ..
            } => Confirm::with_theme(&self.theme)
                .with_prompt(*message)
                .default(*default)
                .interact()
                .map(Answer::Bool)
                .map_err(prompt_error),
        }
    }
}

/// Prompt for whatever `config` is missing
pub fn resolve(config: RunConfig) -> Result<RunConfig> {
    let mut prompter = TerminalPrompter::new(config.base_dir.clone());
    run_prompts(config, &mut prompter)
}
