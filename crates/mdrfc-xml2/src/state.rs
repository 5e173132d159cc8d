//! Render state tracked across one pass: open section, document matter and
//! issued anchors.
//!
//! Each struct owns one invariant of the output and writes its own tags, so
//! the renderer only decides *when* to call them.

use std::collections::{HashMap, HashSet};
use std::fmt::Write;

use mdrfc_ast::Matter;

/// Kind of structural element a heading opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SectionKind {
    Section,
    Note,
    Abstract,
}

impl SectionKind {
    fn close_tag(self) -> &'static str {
        match self {
            Self::Section => "</section>",
            Self::Note => "</note>",
            Self::Abstract => "</abstract>",
        }
    }
}

/// Heading that opened the current section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OpenSection {
    pub kind: SectionKind,
    pub level: u8,
}

/// Tracks the most recently opened section.
///
/// Only one section is open at a time from the renderer's point of view: any
/// new heading, matter transition or the end of the document closes it with
/// exactly one tag, whatever the levels involved.
#[derive(Debug, Default)]
pub(crate) struct SectionState {
    open: Option<OpenSection>,
}

impl SectionState {
    /// Record a newly opened section. The caller has already closed the previous one.
    pub fn open(&mut self, kind: SectionKind, level: u8) {
        self.open = Some(OpenSection { kind, level });
    }

    /// Close the open section, if any. Returns whether a tag was written.
    pub fn close(&mut self, out: &mut String) -> bool {
        let Some(section) = self.open.take() else {
            return false;
        };
        cr(out);
        out.push_str(section.kind.close_tag());
        cr(out);
        true
    }

    pub fn current(&self) -> Option<OpenSection> {
        self.open
    }
}

/// Front/main/back state machine.
///
/// Transitions are applied as the input dictates. An out-of-order marker
/// (back before front) produces whatever tags its transition implies.
#[derive(Debug, Default)]
pub(crate) struct MatterState {
    current: Option<Matter>,
}

impl MatterState {
    /// Switch to `matter`, closing the region the transition leaves.
    pub fn enter(&mut self, matter: Matter, out: &mut String) {
        cr(out);
        match matter {
            Matter::Front => {
                out.push_str("<front>");
            }
            Matter::Main => {
                out.push_str("</front>\n\n<middle>");
            }
            Matter::Back => {
                out.push_str("</middle>\n\n<back>");
            }
        }
        cr(out);
        self.current = Some(matter);
    }

    /// Close whatever region is open.
    pub fn finish(&mut self, out: &mut String) {
        let tag = match self.current.take() {
            Some(Matter::Front) => "</front>",
            Some(Matter::Main) => "</middle>",
            Some(Matter::Back) => "</back>",
            None => return,
        };
        cr(out);
        out.push_str(tag);
        cr(out);
    }

    pub fn current(&self) -> Option<Matter> {
        self.current
    }
}

/// Hands out anchors that are unique within one render.
///
/// The first use of a candidate returns it unchanged; later uses get a
/// numeric `-N` suffix. A suffixed form that was already handed out (for
/// example a heading literally named `intro-1`) is skipped.
#[derive(Debug, Default)]
pub struct HeadingIds {
    counts: HashMap<String, usize>,
    issued: HashSet<String>,
}

impl HeadingIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a unique anchor for `candidate`.
    pub fn allocate(&mut self, candidate: &str) -> String {
        let count = self.counts.entry(candidate.to_owned()).or_default();
        let mut id = match *count {
            0 => candidate.to_owned(),
            n => format!("{candidate}-{n}"),
        };
        *count += 1;

        while self.issued.contains(&id) {
            id = format!("{candidate}-{count}");
            *count += 1;
        }

        self.issued.insert(id.clone());
        id
    }
}

/// Whether a special heading is the abstract.
pub(crate) fn is_abstract(literal: &str) -> bool {
    literal.trim().eq_ignore_ascii_case("abstract")
}

/// BCP 14 (RFC 2119/8174) requirement keywords, rendered without emphasis.
pub(crate) fn is_bcp14(text: &str) -> bool {
    matches!(
        text,
        "MUST"
            | "MUST NOT"
            | "REQUIRED"
            | "SHALL"
            | "SHALL NOT"
            | "SHOULD"
            | "SHOULD NOT"
            | "RECOMMENDED"
            | "NOT RECOMMENDED"
            | "MAY"
            | "OPTIONAL"
    )
}

/// Start a new line unless the output is empty or already at one.
pub(crate) fn cr(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Escape XML special characters.
#[must_use]
pub fn escape_xml(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    push_escaped(s, &mut result);
    result
}

/// Append `s` to `out` with `&`, `<`, `>` and `"` escaped.
pub(crate) fn push_escaped(s: &str, out: &mut String) {
    for c in s.chars() {
        push_escaped_char(c, out);
    }
}

pub(crate) fn push_escaped_char(c: char, out: &mut String) {
    match c {
        '&' => out.push_str("&amp;"),
        '<' => out.push_str("&lt;"),
        '>' => out.push_str("&gt;"),
        '"' => out.push_str("&quot;"),
        _ => out.push(c),
    }
}

/// Write ` name="value"` with the value escaped.
pub(crate) fn push_attr(out: &mut String, name: &str, value: &str) {
    write!(out, r#" {name}="{}""#, escape_xml(value)).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b > c & d"), "a &lt; b &gt; c &amp; d");
        assert_eq!(escape_xml(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_xml("it's"), "it's");
    }

    #[test]
    fn test_escape_is_not_idempotent() {
        let once = escape_xml("&");
        assert_eq!(once, "&amp;");
        assert_eq!(escape_xml(&once), "&amp;amp;");
    }

    #[test]
    fn test_heading_ids_repeat() {
        let mut ids = HeadingIds::new();
        assert_eq!(ids.allocate("intro"), "intro");
        assert_eq!(ids.allocate("intro"), "intro-1");
        assert_eq!(ids.allocate("intro"), "intro-2");
    }

    #[test]
    fn test_heading_ids_independent_candidates() {
        let mut ids = HeadingIds::new();
        assert_eq!(ids.allocate("Overview"), "Overview");
        assert_eq!(ids.allocate("faq"), "faq");
        assert_eq!(ids.allocate("Overview"), "Overview-1");
        assert_eq!(ids.allocate("faq"), "faq-1");
    }

    #[test]
    fn test_heading_ids_skip_taken_suffix() {
        let mut ids = HeadingIds::new();
        assert_eq!(ids.allocate("intro-1"), "intro-1");
        assert_eq!(ids.allocate("intro"), "intro");
        assert_eq!(ids.allocate("intro"), "intro-2");
        assert_eq!(ids.allocate("intro-1"), "intro-1-1");
    }

    #[test]
    fn test_heading_ids_deterministic() {
        let sequence = ["a", "b", "a", "a-1", "a", "b"];
        let run = || {
            let mut ids = HeadingIds::new();
            sequence.iter().map(|c| ids.allocate(c)).collect::<Vec<_>>()
        };
        let first = run();
        assert_eq!(first, run());

        let unique: HashSet<_> = first.iter().collect();
        assert_eq!(unique.len(), first.len());
    }

    #[test]
    fn test_section_close_once() {
        let mut state = SectionState::default();
        let mut out = String::new();
        assert!(!state.close(&mut out));
        assert_eq!(out, "");

        state.open(SectionKind::Section, 1);
        assert!(state.close(&mut out));
        assert!(!state.close(&mut out));
        assert_eq!(out, "</section>\n");
    }

    #[test]
    fn test_section_close_tag_matches_kind() {
        let mut state = SectionState::default();
        let mut out = String::new();
        state.open(SectionKind::Abstract, 1);
        state.close(&mut out);
        state.open(SectionKind::Note, 1);
        state.close(&mut out);
        assert_eq!(out, "</abstract>\n</note>\n");
    }

    #[test]
    fn test_matter_transitions() {
        let mut state = MatterState::default();
        let mut out = String::new();
        state.enter(Matter::Front, &mut out);
        state.enter(Matter::Main, &mut out);
        state.enter(Matter::Back, &mut out);
        state.finish(&mut out);
        assert_eq!(
            out,
            "<front>\n</front>\n\n<middle>\n</middle>\n\n<back>\n</back>\n"
        );
        assert_eq!(state.current(), None);
    }

    #[test]
    fn test_main_without_front_writes_closing_front() {
        let mut state = MatterState::default();
        let mut out = String::new();
        state.enter(Matter::Main, &mut out);
        state.finish(&mut out);
        assert_eq!(out, "</front>\n\n<middle>\n</middle>\n");
    }

    #[test]
    fn test_matter_out_of_order_is_not_corrected() {
        let mut state = MatterState::default();
        let mut out = String::new();
        state.enter(Matter::Back, &mut out);
        state.enter(Matter::Front, &mut out);
        assert_eq!(out, "</middle>\n\n<back>\n<front>\n");
        assert_eq!(state.current(), Some(Matter::Front));
    }

    #[test]
    fn test_is_abstract() {
        assert!(is_abstract("Abstract"));
        assert!(is_abstract(" abstract "));
        assert!(!is_abstract("Status of This Memo"));
    }

    #[test]
    fn test_is_bcp14() {
        assert!(is_bcp14("MUST NOT"));
        assert!(is_bcp14("OPTIONAL"));
        assert!(!is_bcp14("must"));
        assert!(!is_bcp14("important"));
    }
}
