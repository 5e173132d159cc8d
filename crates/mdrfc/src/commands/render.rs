//! `mdrfc render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use mdrfc_config::{CliSettings, Config};

use super::{convert, read_input};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct RenderArgs {
    /// Markdown document to convert (`-` reads stdin).
    input: PathBuf,

    /// Write the XML to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover mdrfc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Omit the XML prolog and the `<rfc>` root element.
    #[arg(long)]
    fragment: bool,

    /// Drop inline raw HTML.
    #[arg(long)]
    skip_html: bool,

    /// Keep images (dropped by default).
    #[arg(long)]
    images: bool,

    /// Prefix marking callouts in code blocks (overrides config).
    #[arg(long)]
    callout: Option<String>,

    /// Comment marker that may precede a callout (repeatable, overrides config).
    #[arg(long = "comment")]
    comments: Vec<String>,

    /// Do not derive anchors from heading text.
    #[arg(long)]
    no_heading_ids: bool,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            fragment: self.fragment.then_some(true),
            skip_html: self.skip_html.then_some(true),
            skip_images: self.images.then_some(false),
            callout: self.callout.clone(),
            comments: (!self.comments.is_empty()).then(|| self.comments.clone()),
            auto_heading_ids: self.no_heading_ids.then_some(false),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let markdown = read_input(&self.input)?;
        let result = convert(&markdown, &config)?;

        for warning in &result.warnings {
            output.warning(&format!("Warning: {warning}"));
        }

        if let Some(path) = &self.output {
            std::fs::write(path, &result.xml)?;
            output.success(&format!("Wrote {}", path.display()));
        } else {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(result.xml.as_bytes())?;
            stdout.flush()?;
        }

        tracing::info!(
            anchors = result.anchors.len(),
            warnings = result.warnings.len(),
            "Rendered document"
        );
        Ok(())
    }
}
