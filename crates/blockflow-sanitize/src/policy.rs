//! What the sanitizer keeps, drops and rewrites.

/// Elements removed together with everything inside them.
const BLOCKED_ELEMENTS: &[&str] = &[
    "script", "iframe", "object", "embed", "form", "meta", "link", "base", "style",
];

/// Attributes whose value is navigated to or fetched.
const URL_ATTRIBUTES: &[&str] = &[
    "href",
    "src",
    "action",
    "formaction",
    "xlink:href",
    "poster",
    "background",
    "cite",
    "data",
    "longdesc",
    "manifest",
    "ping",
    "codebase",
];

const DANGEROUS_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:", "file:"];

const DANGEROUS_STYLE: &[&str] = &["expression(", "url(", "javascript:"];

/// Value written in place of a rejected `href`.
pub(crate) const HREF_PLACEHOLDER: &str = "#";

pub(crate) const BLANK_TARGET_REL: &str = "noopener noreferrer";

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Verdict {
    Keep,
    Drop,
    Replace(&'static str),
}

pub fn is_blocked_element(local_name: &str) -> bool {
    BLOCKED_ELEMENTS
        .iter()
        .any(|blocked| local_name.eq_ignore_ascii_case(blocked))
}

/// Decides the fate of one attribute. `name` is already lowercase.
pub(crate) fn check_attribute(name: &str, value: &str) -> Verdict {
    if name.starts_with("on") || name == "srcdoc" || is_pollution_shaped(name) {
        return Verdict::Drop;
    }
    if name == "srcset" {
        return if srcset_is_safe(value) {
            Verdict::Keep
        } else {
            Verdict::Drop
        };
    }
    if URL_ATTRIBUTES.contains(&name) {
        return match (is_dangerous_url(value), name) {
            (false, _) => Verdict::Keep,
            (true, "href") => Verdict::Replace(HREF_PLACEHOLDER),
            (true, _) => Verdict::Drop,
        };
    }
    if name == "style" && style_is_dangerous(value) {
        return Verdict::Drop;
    }
    Verdict::Keep
}

fn is_pollution_shaped(name: &str) -> bool {
    name.contains("__proto__") || name == "constructor" || name == "prototype"
}

/// True when `value`, once entity-decoded and stripped of whitespace and
/// control characters, starts with a script-capable or local scheme.
pub fn is_dangerous_url(value: &str) -> bool {
    let normalized: String = decode_entities(value)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .flat_map(char::to_lowercase)
        .collect();
    DANGEROUS_SCHEMES
        .iter()
        .any(|scheme| normalized.starts_with(scheme))
}

fn srcset_is_safe(value: &str) -> bool {
    decode_entities(value)
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .all(|url| !is_dangerous_url(url))
}

fn style_is_dangerous(value: &str) -> bool {
    let decoded = decode_entities(value);
    let normalized: String = strip_css_comments(&decoded)
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control() && *c != '\\')
        .flat_map(char::to_lowercase)
        .collect();
    DANGEROUS_STYLE
        .iter()
        .any(|needle| normalized.contains(needle))
}

fn strip_css_comments(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        match rest[start + 2..].find("*/") {
            Some(end) => rest = &rest[start + 2 + end + 2..],
            None => return out,
        }
    }
    out.push_str(rest);
    out
}

/// Decodes numeric character references and the handful of named entities
/// used to disguise schemes. The parser already decoded one level; this
/// catches values that were escaped twice.
pub(crate) fn decode_entities(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_one(rest) {
            Some((decoded, consumed)) => {
                out.push(decoded);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Decodes the reference at the start of `input`, returning the character
/// and the number of bytes consumed. The trailing `;` is optional.
fn decode_one(input: &str) -> Option<(char, usize)> {
    let body = input.strip_prefix('&')?;
    if let Some(numeric) = body.strip_prefix('#') {
        let (digits, radix, prefix) = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => (hex, 16, 2),
            None => (numeric, 10, 1),
        };
        let len = digits
            .find(|c: char| !c.is_digit(radix))
            .unwrap_or(digits.len());
        if len == 0 {
            return None;
        }
        let code = u32::from_str_radix(&digits[..len], radix).ok()?;
        let decoded = char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
        let semicolon = usize::from(digits[len..].starts_with(';'));
        return Some((decoded, 1 + prefix + len + semicolon));
    }
    const NAMED: &[(&str, char)] = &[
        ("colon", ':'),
        ("tab", '\t'),
        ("newline", '\n'),
        ("amp", '&'),
        ("lt", '<'),
        ("gt", '>'),
        ("quot", '"'),
        ("apos", '\''),
        ("lpar", '('),
        ("rpar", ')'),
    ];
    let lower = body.get(..body.len().min(8))?.to_ascii_lowercase();
    NAMED.iter().find_map(|(name, decoded)| {
        lower.starts_with(name).then(|| {
            let semicolon = usize::from(body[name.len()..].starts_with(';'));
            (*decoded, 1 + name.len() + semicolon)
        })
    })
}
