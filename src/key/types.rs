//! Key type definitions
//!
//! Keys are a closed sum type. Every kind the store accepts is a variant, so
//! the codec can match exhaustively and nothing falls through as "probably a
//! string".

use std::fmt;
use std::hash::{Hash, Hasher};

use serde_json::Value;

use crate::error::{EmberError, Result};

use super::codec::NUMERIC_PREFIX;

/// A primitive element of a sequence or composite key
#[derive(Debug, Clone)]
pub enum KeyElement {
    Integer(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

/// A typed key, before encoding
///
/// Two keys are equal exactly when their encoded forms are equal, so
/// `Float(0.0)` and `Float(-0.0)` differ while `Float(NAN)` equals itself.
#[derive(Debug, Clone)]
pub enum Key {
    /// Signed integer key, encoded as `~num~<digits>`
    Integer(i64),

    /// Floating point key, encoded as `~num~<shortest round-trip text>`
    Float(f64),

    /// Plain string key, encoded as itself
    Text(String),

    /// Ordered sequence key, encoded as `[a, b, c]`
    Sequence(Vec<KeyElement>),

    /// Fixed-size composite (tuple-like) key, encoded as `(a, b, c)`
    Composite(Vec<KeyElement>),
}

impl Key {
    /// Build a composite key from any list of elements
    pub fn composite<I, E>(elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<KeyElement>,
    {
        Key::Composite(elements.into_iter().map(Into::into).collect())
    }

    /// Build a sequence key from any list of elements
    pub fn sequence<I, E>(elements: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<KeyElement>,
    {
        Key::Sequence(elements.into_iter().map(Into::into).collect())
    }

    /// Short name of the key kind
    pub fn kind(&self) -> &'static str {
        match self {
            Key::Integer(_) => "integer",
            Key::Float(_) => "float",
            Key::Text(_) => "string",
            Key::Sequence(_) => "sequence",
            Key::Composite(_) => "composite",
        }
    }
}

// =============================================================================
// Canonical text form
// =============================================================================

/// Floats always keep a fractional part or exponent so `3.0` never reads back
/// as the integer `3`.
pub(crate) fn float_text(f: f64) -> String {
    format!("{:?}", f)
}

/// Text elements are single-quoted with `\\`, `'`, newline, carriage return
/// and tab escaped, so no element text can be mistaken for a number, a bool
/// or a separator.
fn write_quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("'")?;
    for c in text.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("\\'")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            other => write!(f, "{}", other)?,
        }
    }
    f.write_str("'")
}

impl fmt::Display for KeyElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyElement::Integer(i) => write!(f, "{}", i),
            KeyElement::Float(x) => f.write_str(&float_text(*x)),
            KeyElement::Text(s) => write_quoted(f, s),
            KeyElement::Bool(true) => f.write_str("True"),
            KeyElement::Bool(false) => f.write_str("False"),
        }
    }
}

fn write_elements(
    f: &mut fmt::Formatter<'_>,
    open: char,
    close: char,
    elements: &[KeyElement],
) -> fmt::Result {
    write!(f, "{}", open)?;
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            f.write_str(super::codec::ELEMENT_SEPARATOR)?;
        }
        write!(f, "{}", element)?;
    }
    // One-element composites keep a trailing comma: `(1,)`
    if open == '(' && elements.len() == 1 {
        f.write_str(",")?;
    }
    write!(f, "{}", close)
}

/// Renders the encoded form without validating it.
impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Integer(i) => write!(f, "{}{}", NUMERIC_PREFIX, i),
            Key::Float(x) => write!(f, "{}{}", NUMERIC_PREFIX, float_text(*x)),
            Key::Text(s) => f.write_str(s),
            Key::Sequence(elements) => write_elements(f, '[', ']', elements),
            Key::Composite(elements) => write_elements(f, '(', ')', elements),
        }
    }
}

// =============================================================================
// Equality
// =============================================================================

impl PartialEq for KeyElement {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for KeyElement {}

impl Hash for KeyElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for Key {}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

// =============================================================================
// Static conversions
// =============================================================================

macro_rules! impl_from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for KeyElement {
                fn from(v: $t) -> Self {
                    KeyElement::Integer(v as i64)
                }
            }

            impl From<$t> for Key {
                fn from(v: $t) -> Self {
                    Key::Integer(v as i64)
                }
            }
        )*
    };
}

impl_from_integer!(i64, i32, i16, i8, u32, u16, u8);

impl From<f64> for KeyElement {
    fn from(v: f64) -> Self {
        KeyElement::Float(v)
    }
}

impl From<f32> for KeyElement {
    fn from(v: f32) -> Self {
        KeyElement::Float(v as f64)
    }
}

impl From<bool> for KeyElement {
    fn from(v: bool) -> Self {
        KeyElement::Bool(v)
    }
}

impl From<&str> for KeyElement {
    fn from(v: &str) -> Self {
        KeyElement::Text(v.to_string())
    }
}

impl From<String> for KeyElement {
    fn from(v: String) -> Self {
        KeyElement::Text(v)
    }
}

impl From<f64> for Key {
    fn from(v: f64) -> Self {
        Key::Float(v)
    }
}

impl From<f32> for Key {
    fn from(v: f32) -> Self {
        Key::Float(v as f64)
    }
}

impl From<&str> for Key {
    fn from(v: &str) -> Self {
        Key::Text(v.to_string())
    }
}

impl From<String> for Key {
    fn from(v: String) -> Self {
        Key::Text(v)
    }
}

impl From<&String> for Key {
    fn from(v: &String) -> Self {
        Key::Text(v.clone())
    }
}

impl From<&Key> for Key {
    fn from(v: &Key) -> Self {
        v.clone()
    }
}

impl<T: Into<KeyElement>> From<Vec<T>> for Key {
    fn from(v: Vec<T>) -> Self {
        Key::sequence(v)
    }
}

impl<T: Into<KeyElement> + Clone> From<&[T]> for Key {
    fn from(v: &[T]) -> Self {
        Key::sequence(v.iter().cloned())
    }
}

impl<A, B> From<(A, B)> for Key
where
    A: Into<KeyElement>,
    B: Into<KeyElement>,
{
    fn from((a, b): (A, B)) -> Self {
        Key::Composite(vec![a.into(), b.into()])
    }
}

impl<A, B, C> From<(A, B, C)> for Key
where
    A: Into<KeyElement>,
    B: Into<KeyElement>,
    C: Into<KeyElement>,
{
    fn from((a, b, c): (A, B, C)) -> Self {
        Key::Composite(vec![a.into(), b.into(), c.into()])
    }
}

impl<A, B, C, D> From<(A, B, C, D)> for Key
where
    A: Into<KeyElement>,
    B: Into<KeyElement>,
    C: Into<KeyElement>,
    D: Into<KeyElement>,
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        Key::Composite(vec![a.into(), b.into(), c.into(), d.into()])
    }
}

// =============================================================================
// Dynamic conversions
// =============================================================================

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

enum Numeric {
    Integer(i64),
    Float(f64),
}

fn classify_number(n: &serde_json::Number) -> Result<Numeric> {
    if let Some(i) = n.as_i64() {
        return Ok(Numeric::Integer(i));
    }
    // u64 above i64::MAX would silently lose precision as a float
    if n.is_u64() {
        return Err(EmberError::InvalidKeyType(format!(
            "integer {} is out of range",
            n
        )));
    }
    n.as_f64()
        .map(Numeric::Float)
        .ok_or_else(|| EmberError::InvalidKeyType(format!("number {}", n)))
}

impl TryFrom<&Value> for KeyElement {
    type Error = EmberError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => Ok(match classify_number(n)? {
                Numeric::Integer(i) => KeyElement::Integer(i),
                Numeric::Float(f) => KeyElement::Float(f),
            }),
            Value::String(s) => Ok(KeyElement::Text(s.clone())),
            Value::Bool(b) => Ok(KeyElement::Bool(*b)),
            other => Err(EmberError::InvalidKeyType(format!(
                "{} inside a sequence key",
                value_kind(other)
            ))),
        }
    }
}

/// Converts a dynamically typed value into a key.
///
/// Only numbers, strings and flat arrays of primitives are keys; everything
/// else fails with [`EmberError::InvalidKeyType`].
impl TryFrom<&Value> for Key {
    type Error = EmberError;

    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Number(n) => Ok(match classify_number(n)? {
                Numeric::Integer(i) => Key::Integer(i),
                Numeric::Float(f) => Key::Float(f),
            }),
            Value::String(s) => Ok(Key::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(KeyElement::try_from)
                .collect::<Result<Vec<_>>>()
                .map(Key::Sequence),
            other => Err(EmberError::InvalidKeyType(value_kind(other).to_string())),
        }
    }
}

impl TryFrom<Value> for Key {
    type Error = EmberError;

    fn try_from(value: Value) -> Result<Self> {
        Key::try_from(&value)
    }
}
