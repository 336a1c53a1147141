//! Key codec
//!
//! Maps typed keys into the single flat string namespace of a JSON object
//! and back again.
//!
//! ## Encoding
//! ```text
//! Integer(5)                 → "~num~5"
//! Float(2.5)                 → "~num~2.5"
//! Text("5")                  → "5"
//! Sequence([1, "a"])         → "[1, 'a']"
//! Composite([1, "1", true])  → "(1, '1', True)"
//! Composite([7])             → "(7,)"
//! Text("~num~x")             → error: ReservedKeyFormat
//! ```
//!
//! Elements are written the way a tuple literal reads: text quoted with
//! `'` and backslash escapes, bools as `True`/`False`. Keys whose elements
//! differ in type or in embedded separators therefore never share a slot.
//!
//! ## Decoding
//! Numeric encodings decode exactly, and so do sequence and composite keys
//! produced by [`encode`]. Quoted elements may use `'` or `"`. Unquoted
//! elements are read as an integer, a float or a bool when they parse as
//! one and as text otherwise. A bracketed string that is not a valid element
//! list falls back to splitting on `", "` into text elements.
//!
//! A text key that itself starts with `(` or `[` is listed as a composite or
//! sequence key.

use std::borrow::Borrow;
use std::fmt;

use crate::error::{EmberError, Result};

use super::types::{Key, KeyElement};

/// Reserved prefix marking numeric keys
pub const NUMERIC_PREFIX: &str = "~num~";

/// Separator between elements of sequence and composite encodings
pub const ELEMENT_SEPARATOR: &str = ", ";

/// A validated, encoded key as stored in the backing object
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EncodedKey(String);

impl EncodedKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Decode back into a typed key (best effort, see module docs)
    pub fn decode(&self) -> Key {
        decode(&self.0)
    }
}

impl fmt::Display for EncodedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EncodedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EncodedKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<EncodedKey> for String {
    fn from(key: EncodedKey) -> Self {
        key.0
    }
}

/// Encode a key, rejecting text that collides with the numeric prefix.
pub fn encode(key: &Key) -> Result<EncodedKey> {
    match key {
        Key::Text(s) if s.starts_with(NUMERIC_PREFIX) => {
            Err(EmberError::ReservedKeyFormat(s.clone()))
        }
        Key::Text(s) => Ok(EncodedKey(s.clone())),
        // Bracketed forms start with '[' or '(' and cannot collide
        Key::Integer(_) | Key::Float(_) | Key::Sequence(_) | Key::Composite(_) => {
            Ok(EncodedKey(key.to_string()))
        }
    }
}

/// Decode an encoded key string. Never fails: unrecognised input is text.
pub fn decode(encoded: &str) -> Key {
    if let Some(digits) = encoded.strip_prefix(NUMERIC_PREFIX) {
        if let Ok(i) = digits.parse::<i64>() {
            return Key::Integer(i);
        }
        if let Ok(f) = digits.parse::<f64>() {
            return Key::Float(f);
        }
        // Hand-edited file; keep the raw text rather than dropping the entry
        return Key::Text(encoded.to_string());
    }

    if let Some(rest) = encoded.strip_prefix('(') {
        return Key::Composite(split_elements(rest, ')'));
    }
    if let Some(rest) = encoded.strip_prefix('[') {
        return Key::Sequence(split_elements(rest, ']'));
    }

    Key::Text(encoded.to_string())
}

fn split_elements(body: &str, close: char) -> Vec<KeyElement> {
    let inner = body.strip_suffix(close).unwrap_or(body);
    let inner = match close {
        ')' => inner.strip_suffix(',').unwrap_or(inner),
        _ => inner,
    };
    if inner.is_empty() {
        return Vec::new();
    }
    parse_elements(inner).unwrap_or_else(|| {
        inner
            .split(ELEMENT_SEPARATOR)
            .map(|part| KeyElement::Text(part.to_string()))
            .collect()
    })
}

/// Parse a separator-delimited element list; `None` if a quoted element is
/// unterminated or not followed by a separator.
fn parse_elements(inner: &str) -> Option<Vec<KeyElement>> {
    let mut elements = Vec::new();
    let mut rest = inner;

    loop {
        let (element, tail) = match rest.chars().next() {
            Some(quote @ ('\'' | '"')) => read_quoted(&rest[1..], quote)?,
            _ => match rest.find(ELEMENT_SEPARATOR) {
                Some(end) => (parse_bare(&rest[..end]), &rest[end..]),
                None => (parse_bare(rest), ""),
            },
        };
        elements.push(element);

        if tail.is_empty() {
            return Some(elements);
        }
        rest = tail.strip_prefix(ELEMENT_SEPARATOR)?;
    }
}

fn read_quoted(body: &str, quote: char) -> Option<(KeyElement, &str)> {
    let mut text = String::new();
    let mut chars = body.char_indices();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let (_, escaped) = chars.next()?;
                text.push(match escaped {
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    other => other,
                });
            }
            c if c == quote => {
                return Some((KeyElement::Text(text), &body[i + c.len_utf8()..]));
            }
            c => text.push(c),
        }
    }
    None
}

fn parse_bare(token: &str) -> KeyElement {
    if let Ok(i) = token.parse::<i64>() {
        return KeyElement::Integer(i);
    }
    if let Ok(f) = token.parse::<f64>() {
        return KeyElement::Float(f);
    }
    match token {
        "True" | "true" => KeyElement::Bool(true),
        "False" | "false" => KeyElement::Bool(false),
        _ => KeyElement::Text(token.to_string()),
    }
}
