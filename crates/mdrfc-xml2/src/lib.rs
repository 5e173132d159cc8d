//! RFC 7991 (xml2rfc v2) renderer for mdrfc document trees.
//!
//! The renderer makes one pass over a [`mdrfc_ast::Tree`] and writes the
//! xml2rfc vocabulary for every node: flat headings become nested
//! `<section>` elements, document-matter markers become `<front>`,
//! `<middle>` and `<back>`, and captions move into `title` attributes.
//!
//! All state lives in one [`Xml2Renderer`] and is reset per document, so a
//! renderer can be reused but never shared between threads mid-render.

mod callout;
mod caption;
mod error;
mod options;
mod renderer;
mod state;
mod title;

pub use callout::escape_callouts;
pub use error::RenderError;
pub use options::{NodeHook, RendererOptions};
pub use renderer::{RenderResult, Xml2Renderer};
pub use state::{HeadingIds, escape_xml};
