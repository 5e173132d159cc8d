//! Title block metadata (`%%%` TOML header of an mmark document).

use serde::Deserialize;

/// Document metadata rendered into the `<rfc>` root and `<front>` section.
///
/// Field names follow the mmark title block keys, so the struct can be
/// deserialized straight from the TOML header. The `date` key carries a TOML
/// datetime and is converted by the parser into [`TitleDate`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TitleBlock {
    pub title: String,
    pub abbrev: String,
    pub ipr: String,
    pub category: String,
    #[serde(rename = "docName")]
    pub doc_name: String,
    #[serde(rename = "submissiontype")]
    pub submission_type: String,
    pub area: String,
    pub workgroup: String,
    #[serde(rename = "keyword")]
    pub keywords: Vec<String>,
    #[serde(skip)]
    pub date: Option<TitleDate>,
    #[serde(rename = "author")]
    pub authors: Vec<Author>,
}

/// Publication date. Month and day are optional in RFC 2629.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TitleDate {
    pub year: u16,
    pub month: Option<u8>,
    pub day: Option<u8>,
}

impl TitleDate {
    /// English month name used by the `month` attribute.
    #[must_use]
    pub fn month_name(&self) -> Option<&'static str> {
        const MONTHS: [&str; 12] = [
            "January",
            "February",
            "March",
            "April",
            "May",
            "June",
            "July",
            "August",
            "September",
            "October",
            "November",
            "December",
        ];
        let month = self.month?;
        MONTHS.get(usize::from(month).checked_sub(1)?).copied()
    }
}

/// Document author.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Author {
    pub initials: String,
    pub surname: String,
    pub fullname: String,
    pub role: String,
    pub organization: String,
    pub address: Address,
}

/// Author contact details.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Address {
    pub email: String,
    pub uri: String,
    pub phone: String,
    pub postal: Postal,
}

/// Postal address.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Postal {
    pub street: String,
    pub city: String,
    pub code: String,
    pub country: String,
}

impl Postal {
    /// Whether any postal field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.street.is_empty()
            && self.city.is_empty()
            && self.code.is_empty()
            && self.country.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_title_block() {
        let toml = r#"
title = "Using mmark"
abbrev = "mmark"
ipr = "trust200902"
category = "info"
docName = "draft-gieben-mmark-00"
keyword = ["markdown", "xml2rfc"]

[[author]]
initials = "R."
surname = "Gieben"
fullname = "R. (Miek) Gieben"
organization = "Example"
  [author.address]
  email = "miek@example.org"
  [author.address.postal]
  city = "London"
"#;
        let block: TitleBlock = toml::from_str(toml).unwrap();
        assert_eq!(block.title, "Using mmark");
        assert_eq!(block.doc_name, "draft-gieben-mmark-00");
        assert_eq!(block.keywords, vec!["markdown", "xml2rfc"]);
        assert_eq!(block.authors.len(), 1);
        assert_eq!(block.authors[0].address.email, "miek@example.org");
        assert_eq!(block.authors[0].address.postal.city, "London");
        assert!(block.date.is_none());
    }

    #[test]
    fn test_month_name() {
        let date = TitleDate {
            year: 2019,
            month: Some(3),
            day: None,
        };
        assert_eq!(date.month_name(), Some("March"));

        let invalid = TitleDate {
            year: 2019,
            month: Some(13),
            day: None,
        };
        assert_eq!(invalid.month_name(), None);

        let zero = TitleDate {
            year: 2019,
            month: Some(0),
            day: None,
        };
        assert_eq!(zero.month_name(), None);
    }
}
