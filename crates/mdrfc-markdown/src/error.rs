//! Error types for markdown parsing.

/// Error parsing a markdown document into a tree.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The `%%%` title block has no closing `%%%` line.
    #[error("title block starting at line {line} is not terminated by `%%%`")]
    UnterminatedTitleBlock { line: usize },
    /// The title block is not valid TOML or does not match the expected keys.
    #[error("invalid title block: {0}")]
    TitleBlock(#[from] toml::de::Error),
    /// The title block `date` is neither a TOML date nor `YYYY[-MM[-DD]]`.
    #[error("invalid title block date `{0}`")]
    InvalidDate(String),
}
