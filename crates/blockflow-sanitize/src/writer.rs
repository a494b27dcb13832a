//! Fragment parsing and filtered re-serialization.

use crate::policy::{check_attribute, is_blocked_element, Verdict, BLANK_TARGET_REL};
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{local_name, namespace_url, ns, parse_fragment, Attribute, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData, RcDom};

/// Nesting beyond this is flattened away rather than recursed into.
const MAX_DEPTH: usize = 256;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track", "wbr",
];

/// How the filtered tree is written back out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkupSyntax {
    /// HTML serialization, for bodies attached to an HTML render tree.
    Html,
    /// Well-formed XML: void elements self-close, no named entities beyond
    /// the XML five, and names XML cannot carry are dropped. For bodies
    /// embedded in SVG `foreignObject`.
    Xhtml,
}

/// Returns `markup` with dangerous elements and attributes removed.
///
/// The result is a deterministic function of the input. Markup the parser
/// cannot make sense of comes back empty or partial; this never fails.
pub fn sanitize_html(markup: &str) -> String {
    sanitize_markup(markup, MarkupSyntax::Html)
}

/// [`sanitize_html`] with XML output.
pub fn sanitize_xhtml(markup: &str) -> String {
    sanitize_markup(markup, MarkupSyntax::Xhtml)
}

pub fn sanitize_markup(markup: &str, syntax: MarkupSyntax) -> String {
    if markup.trim().is_empty() {
        return String::new();
    }
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    let context = QualName::new(None, ns!(html), local_name!("body"));
    let dom = parse_fragment(RcDom::default(), opts, context, Vec::new()).one(markup);

    let mut out = String::with_capacity(markup.len());
    // The fragment lands under a synthetic <html> root.
    for root in dom.document.children.borrow().iter() {
        for child in root.children.borrow().iter() {
            write_node(child, syntax, &mut out, 0);
        }
    }
    out
}

fn write_node(handle: &Handle, syntax: MarkupSyntax, out: &mut String, depth: usize) {
    if depth > MAX_DEPTH {
        log::debug!("sanitizer dropped markup nested deeper than {MAX_DEPTH}");
        return;
    }
    match &handle.data {
        NodeData::Text { contents } => escape_text(&contents.borrow(), syntax, out),
        NodeData::Element {
            name,
            attrs,
            template_contents,
            ..
        } => {
            let tag: &str = &name.local;
            if is_blocked_element(tag) {
                log::trace!("sanitizer removed <{tag}>");
                return;
            }
            let template = template_contents.borrow();
            let children = match template.as_ref() {
                Some(fragment) => fragment.children.borrow(),
                None => handle.children.borrow(),
            };
            if syntax == MarkupSyntax::Xhtml && !is_xml_name(tag, false) {
                // Keep the content, lose a tag XML cannot name.
                for child in children.iter() {
                    write_node(child, syntax, out, depth + 1);
                }
                return;
            }
            out.push('<');
            out.push_str(tag);
            write_attributes(&attrs.borrow(), syntax, out);
            if VOID_ELEMENTS.contains(&tag) {
                out.push_str(match syntax {
                    MarkupSyntax::Html => ">",
                    MarkupSyntax::Xhtml => "/>",
                });
                return;
            }
            out.push('>');
            for child in children.iter() {
                write_node(child, syntax, out, depth + 1);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        // Comments, doctypes and processing instructions are dropped.
        _ => {}
    }
}

fn write_attributes(attrs: &[Attribute], syntax: MarkupSyntax, out: &mut String) {
    let blank_target = attrs.iter().any(|attr| {
        &*attr.name.local == "target" && attr.value.trim().eq_ignore_ascii_case("_blank")
    });
    for attr in attrs {
        let name = attribute_name(attr);
        if blank_target && name == "rel" {
            continue;
        }
        if syntax == MarkupSyntax::Xhtml && !is_xml_name(&name, true) {
            log::trace!("sanitizer removed attribute {name:?} with no XML form");
            continue;
        }
        match check_attribute(&name, &attr.value) {
            Verdict::Keep => write_attribute(&name, &attr.value, syntax, out),
            Verdict::Replace(value) => write_attribute(&name, value, syntax, out),
            Verdict::Drop => log::trace!("sanitizer removed attribute {name}"),
        }
    }
    if blank_target {
        write_attribute("rel", BLANK_TARGET_REL, syntax, out);
    }
}

fn attribute_name(attr: &Attribute) -> String {
    let local = attr.name.local.to_string().to_ascii_lowercase();
    match &attr.name.prefix {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local,
    }
}

fn write_attribute(name: &str, value: &str, syntax: MarkupSyntax, out: &mut String) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    for c in value.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            c => escape_char(c, syntax, out),
        }
    }
    out.push('"');
}

fn escape_text(text: &str, syntax: MarkupSyntax, out: &mut String) {
    for c in text.chars() {
        escape_char(c, syntax, out);
    }
}

fn escape_char(c: char, syntax: MarkupSyntax, out: &mut String) {
    match (c, syntax) {
        ('&', _) => out.push_str("&amp;"),
        ('<', _) => out.push_str("&lt;"),
        ('>', _) => out.push_str("&gt;"),
        ('\u{a0}', MarkupSyntax::Html) => out.push_str("&nbsp;"),
        ('\u{a0}', MarkupSyntax::Xhtml) => out.push_str("&#160;"),
        // XML 1.0 has no representation for the other C0 controls.
        (c, MarkupSyntax::Xhtml) if c < ' ' && !matches!(c, '\t' | '\n' | '\r') => {}
        (c, _) => out.push(c),
    }
}

/// Conservative XML name check. A prefix is only allowed on attributes,
/// where html5ever produces the predeclared `xml`/`xmlns`/`xlink` ones.
fn is_xml_name(name: &str, allow_prefix: bool) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_')
        && chars.all(|c| {
            c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') || (allow_prefix && c == ':')
        })
}

#[cfg(test)]
#[path = "tests/sanitize_tests.rs"]
mod tests;
