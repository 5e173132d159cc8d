//! CLI command implementations.

mod check;
mod render;

use std::io::Read;
use std::path::Path;

use mdrfc_config::Config;
use mdrfc_markdown::ParseOptions;
use mdrfc_xml2::{RenderResult, RendererOptions, Xml2Renderer};

use crate::error::CliError;

pub(crate) use check::CheckArgs;
pub(crate) use render::RenderArgs;

/// Input path that stands for standard input.
const STDIN: &str = "-";

/// Read a markdown document from a file, or from stdin for `-`.
fn read_input(input: &Path) -> Result<String, CliError> {
    if input.as_os_str() == STDIN {
        let mut markdown = String::new();
        std::io::stdin().read_to_string(&mut markdown)?;
        return Ok(markdown);
    }
    Ok(std::fs::read_to_string(input)?)
}

/// Parse and render `markdown` with the loaded configuration.
fn convert(markdown: &str, config: &Config) -> Result<RenderResult, CliError> {
    let parse_options = ParseOptions {
        auto_heading_ids: config.markdown.auto_heading_ids,
    };
    let tree = mdrfc_markdown::parse(markdown, &parse_options)?;

    let mut renderer = Xml2Renderer::new(renderer_options(config));
    Ok(renderer.render(&tree)?)
}

fn renderer_options(config: &Config) -> RendererOptions {
    RendererOptions {
        fragment: config.render.fragment,
        skip_html: config.render.skip_html,
        skip_images: config.render.skip_images,
        callout: config.render.callout.clone(),
        comments: config.render.comments.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_renderer_options_from_config() {
        let mut config = Config::default();
        config.render.fragment = true;
        config.render.callout = Some("<<".to_owned());
        config.render.comments = vec!["//".to_owned()];

        assert_eq!(
            renderer_options(&config),
            RendererOptions {
                fragment: true,
                skip_html: false,
                skip_images: true,
                callout: Some("<<".to_owned()),
                comments: vec!["//".to_owned()],
            }
        );
    }

    #[test]
    fn test_convert_fragment() {
        let mut config = Config::default();
        config.render.fragment = true;

        let result = convert("Hello *world*.\n", &config).unwrap();

        assert_eq!(
            result.xml,
            "<t>Hello <spanx style=\"emph\">world</spanx>.</t>\n"
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_convert_reports_extension_error() {
        let err = convert("---\n", &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::Render(_)));
        assert!(err.to_string().contains("horizontal-rule"));
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("draft.md");
        std::fs::write(&path, "# Intro\n").unwrap();

        assert_eq!(read_input(&path).unwrap(), "# Intro\n");
    }

    #[test]
    fn test_read_input_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_input(&dir.path().join("missing.md")).unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
