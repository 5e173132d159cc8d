//! `%%%` title block extraction.
//!
//! An mmark document may open with a TOML block fenced by `%%%` lines:
//!
//! ```text
//! %%%
//! title = "Using mmark"
//! date = 2019-01-02T00:00:00Z
//! [[author]]
//! surname = "Gieben"
//! %%%
//! ```

use mdrfc_ast::{TitleBlock, TitleDate};

use crate::error::ParseError;

const FENCE: &str = "%%%";

/// Split a leading title block off `markdown`.
///
/// Returns the parsed block (if any) and the remaining markdown body.
pub(crate) fn split_title_block(
    markdown: &str,
) -> Result<(Option<TitleBlock>, &str), ParseError> {
    let mut offset = 0;
    let mut lines = markdown.split_inclusive('\n').enumerate();

    let opening = loop {
        let Some((number, line)) = lines.next() else {
            return Ok((None, markdown));
        };
        offset += line.len();
        if line.trim().is_empty() {
            continue;
        }
        if line.trim_end() != FENCE {
            return Ok((None, markdown));
        }
        break number + 1;
    };

    let content_start = offset;
    for (_, line) in lines {
        if line.trim_end() == FENCE {
            let block = parse_title_block(&markdown[content_start..offset])?;
            return Ok((Some(block), &markdown[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(ParseError::UnterminatedTitleBlock { line: opening })
}

/// Deserialize the TOML between the fences.
pub(crate) fn parse_title_block(source: &str) -> Result<TitleBlock, ParseError> {
    let mut table: toml::Table = toml::from_str(source)?;
    let date = table.remove("date").map(|value| parse_date(&value)).transpose()?;

    let mut block: TitleBlock = toml::Value::Table(table).try_into()?;
    block.date = date;
    Ok(block)
}

fn parse_date(value: &toml::Value) -> Result<TitleDate, ParseError> {
    match value {
        toml::Value::Datetime(datetime) => datetime
            .date
            .map(|date| TitleDate {
                year: date.year,
                month: Some(date.month),
                day: Some(date.day),
            })
            .ok_or_else(|| ParseError::InvalidDate(datetime.to_string())),
        toml::Value::String(text) => parse_date_str(text),
        toml::Value::Integer(year) => u16::try_from(*year)
            .map(|year| TitleDate {
                year,
                month: None,
                day: None,
            })
            .map_err(|_| ParseError::InvalidDate(year.to_string())),
        other => Err(ParseError::InvalidDate(other.to_string())),
    }
}

/// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`, optionally followed by a `T` time part.
fn parse_date_str(text: &str) -> Result<TitleDate, ParseError> {
    let invalid = || ParseError::InvalidDate(text.to_owned());
    let date = text.trim().split('T').next().unwrap_or_default();
    let mut parts = date.split('-');

    let year = parts
        .next()
        .and_then(|year| year.parse::<u16>().ok())
        .ok_or_else(invalid)?;
    let month = parts
        .next()
        .map(|month| month.parse::<u8>().ok().filter(|m| (1..=12).contains(m)))
        .map(|month| month.ok_or_else(invalid))
        .transpose()?;
    let day = parts
        .next()
        .map(|day| day.parse::<u8>().ok().filter(|d| (1..=31).contains(d)))
        .map(|day| day.ok_or_else(invalid))
        .transpose()?;

    if parts.next().is_some() || (day.is_some() && month.is_none()) {
        return Err(invalid());
    }
    Ok(TitleDate { year, month, day })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_title_block() {
        let markdown = "# Heading\n\nText\n";
        let (block, body) = split_title_block(markdown).unwrap();
        assert!(block.is_none());
        assert_eq!(body, markdown);
    }

    #[test]
    fn test_split_title_block() {
        let markdown = "\n%%%\ntitle = \"Example\"\nipr = \"trust200902\"\n%%%\n\n# Intro\n";
        let (block, body) = split_title_block(markdown).unwrap();
        let block = block.unwrap();
        assert_eq!(block.title, "Example");
        assert_eq!(block.ipr, "trust200902");
        assert_eq!(body, "\n# Intro\n");
    }

    #[test]
    fn test_fence_not_first_is_ignored() {
        let markdown = "Text\n%%%\ntitle = \"x\"\n%%%\n";
        let (block, body) = split_title_block(markdown).unwrap();
        assert!(block.is_none());
        assert_eq!(body, markdown);
    }

    #[test]
    fn test_unterminated_title_block() {
        let err = split_title_block("\n%%%\ntitle = \"x\"\n").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedTitleBlock { line: 2 }));
    }

    #[test]
    fn test_invalid_toml() {
        let err = split_title_block("%%%\ntitle = \n%%%\n").unwrap_err();
        assert!(matches!(err, ParseError::TitleBlock(_)));
    }

    #[test]
    fn test_toml_datetime() {
        let block = parse_title_block("date = 2019-01-02T00:00:00Z\n").unwrap();
        assert_eq!(
            block.date,
            Some(TitleDate {
                year: 2019,
                month: Some(1),
                day: Some(2),
            })
        );
    }

    #[test]
    fn test_string_dates() {
        assert_eq!(
            parse_date_str("2020-07").unwrap(),
            TitleDate {
                year: 2020,
                month: Some(7),
                day: None,
            }
        );
        assert_eq!(
            parse_date_str("2020").unwrap(),
            TitleDate {
                year: 2020,
                month: None,
                day: None,
            }
        );
        assert!(parse_date_str("2020-13").is_err());
        assert!(parse_date_str("soon").is_err());
    }

    #[test]
    fn test_integer_year() {
        let block = parse_title_block("date = 2021\n").unwrap();
        assert_eq!(block.date.map(|d| d.year), Some(2021));
    }

    #[test]
    fn test_authors_and_keywords() {
        let block = parse_title_block(
            r#"
title = "Example"
keyword = ["a", "b"]

[[author]]
fullname = "Jane Doe"
organization = "Example Org"
"#,
        )
        .unwrap();
        assert_eq!(block.keywords, vec!["a", "b"]);
        assert_eq!(block.authors[0].fullname, "Jane Doe");
        assert_eq!(block.date, None);
    }
}
