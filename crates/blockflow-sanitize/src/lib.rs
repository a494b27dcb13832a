//! Markup sanitizer for Blockflow block bodies
//!
//! Block bodies come from host templates and are untrusted. [`sanitize_html`]
//! parses them as an HTML fragment and re-serializes only what is safe to
//! attach to the render tree.

mod policy;
mod writer;

pub use policy::{is_blocked_element, is_dangerous_url};
pub use writer::{sanitize_html, sanitize_markup, sanitize_xhtml, MarkupSyntax};

pub mod prelude {
    pub use crate::writer::{sanitize_html, sanitize_xhtml, MarkupSyntax};
}
