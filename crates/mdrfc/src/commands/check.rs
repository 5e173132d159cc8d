//! `mdrfc check` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdrfc_config::Config;

use super::{convert, read_input};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Markdown document to check (`-` reads stdin).
    input: PathBuf,

    /// Path to configuration file (default: auto-discover mdrfc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat warnings as errors.
    #[arg(long)]
    strict: bool,
}

impl CheckArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        let markdown = read_input(&self.input)?;
        let result = convert(&markdown, &config)?;

        if let Some(title) = &result.title {
            output.info(&format!("Title: {title}"));
        }
        output.info(&format!("Anchors: {}", result.anchors.len()));

        for warning in &result.warnings {
            output.warning(&format!("Warning: {warning}"));
        }

        if result.warnings.is_empty() {
            output.success(&format!("{}: OK", self.input.display()));
            return Ok(());
        }
        if self.strict {
            return Err(CliError::Validation(format!(
                "{}: {} warning(s)",
                self.input.display(),
                result.warnings.len()
            )));
        }
        output.info(&format!(
            "{}: {} warning(s)",
            self.input.display(),
            result.warnings.len()
        ));
        Ok(())
    }
}
