//! Title block and reference list output.

use std::fmt::Write;

use mdrfc_ast::{Author, BibliographyItem, TitleBlock};

use crate::state::{cr, push_attr, push_escaped};

/// Open the `<rfc>` root element with the attributes the title block sets.
pub(crate) fn write_rfc_open(block: &TitleBlock, out: &mut String) {
    out.push_str("<rfc");
    for (name, value) in [
        ("ipr", &block.ipr),
        ("category", &block.category),
        ("docName", &block.doc_name),
        ("submissionType", &block.submission_type),
    ] {
        if !value.is_empty() {
            push_attr(out, name, value);
        }
    }
    out.push('>');
    cr(out);
}

/// Metadata that opens `<front>`: title, authors, date, area, workgroup, keywords.
pub(crate) fn write_front(block: &TitleBlock, out: &mut String) {
    out.push_str("<title");
    if !block.abbrev.is_empty() {
        push_attr(out, "abbrev", &block.abbrev);
    }
    out.push('>');
    push_escaped(&block.title, out);
    out.push_str("</title>");
    cr(out);

    for author in &block.authors {
        write_author(author, out);
    }

    if let Some(date) = &block.date {
        write!(out, r#"<date year="{}""#, date.year).unwrap();
        if let Some(month) = date.month_name() {
            push_attr(out, "month", month);
        }
        if let Some(day) = date.day {
            write!(out, r#" day="{day}""#).unwrap();
        }
        out.push_str(" />");
        cr(out);
    }

    write_element("area", &block.area, out);
    write_element("workgroup", &block.workgroup, out);
    for keyword in &block.keywords {
        write_element("keyword", keyword, out);
    }
}

fn write_author(author: &Author, out: &mut String) {
    out.push_str("<author");
    for (name, value) in [
        ("initials", &author.initials),
        ("surname", &author.surname),
        ("fullname", &author.fullname),
        ("role", &author.role),
    ] {
        if !value.is_empty() {
            push_attr(out, name, value);
        }
    }
    out.push('>');
    cr(out);

    write_element("organization", &author.organization, out);

    let address = &author.address;
    let postal = &address.postal;
    if !postal.is_empty()
        || !address.phone.is_empty()
        || !address.email.is_empty()
        || !address.uri.is_empty()
    {
        out.push_str("<address>");
        cr(out);
        if !postal.is_empty() {
            out.push_str("<postal>");
            cr(out);
            write_element("street", &postal.street, out);
            write_element("city", &postal.city, out);
            write_element("code", &postal.code, out);
            write_element("country", &postal.country, out);
            out.push_str("</postal>");
            cr(out);
        }
        write_element("phone", &address.phone, out);
        write_element("email", &address.email, out);
        write_element("uri", &address.uri, out);
        out.push_str("</address>");
        cr(out);
    }

    out.push_str("</author>");
    cr(out);
}

/// `<name>value</name>` on its own line; nothing for an empty value.
fn write_element(name: &str, value: &str, out: &mut String) {
    if value.is_empty() {
        return;
    }
    write!(out, "<{name}>").unwrap();
    push_escaped(value, out);
    write!(out, "</{name}>").unwrap();
    cr(out);
}

/// Write one reference entry. Returns `false` when there is nothing to write for it.
///
/// Raw `<reference>` XML supplied by the document wins. Otherwise RFCs and
/// Internet-Drafts are pulled in through xml2rfc include processing
/// instructions.
pub(crate) fn write_bibliography_item(item: &BibliographyItem, out: &mut String) -> bool {
    if let Some(reference) = &item.reference {
        cr(out);
        out.push_str(reference.trim());
        cr(out);
        return true;
    }

    let include = if let Some(number) = rfc_number(&item.anchor) {
        format!("reference.RFC.{number}.xml")
    } else if let Some(draft) = item.anchor.strip_prefix("I-D.") {
        format!("reference.I-D.{draft}.xml")
    } else {
        return false;
    };

    cr(out);
    out.push_str(r#"<?rfc include=""#);
    push_escaped(&include, out);
    out.push_str(r#""?>"#);
    cr(out);
    true
}

/// `RFC2119` → `2119`.
fn rfc_number(anchor: &str) -> Option<&str> {
    let number = anchor.strip_prefix("RFC")?;
    (!number.is_empty() && number.bytes().all(|b| b.is_ascii_digit())).then_some(number)
}
