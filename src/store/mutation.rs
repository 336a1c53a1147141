//! Mutation operations
//!
//! Append, accumulate and sequence helpers. Each one does its
//! read-modify-write under a single write lock and releases it before
//! auto-saving. Outcomes that change nothing (absent key, kind mismatch) never
//! save.

use serde::Serialize;
use serde_json::map::Entry;
use serde_json::{Number, Value};

use crate::error::Result;
use crate::key::{encode, EncodedKey, Key};

use super::Store;

/// Outcome of [`Store::accumulate`]
#[derive(Debug, Clone, PartialEq)]
pub enum Accumulated {
    /// The sum or concatenation that is now stored
    Updated(Value),

    /// Key is absent
    NotFound,

    /// Stored value and delta are not both numbers or both strings
    NotApplicable,
}

impl Accumulated {
    pub fn is_updated(&self) -> bool {
        matches!(self, Accumulated::Updated(_))
    }

    /// The new stored value, if the operation applied
    pub fn value(&self) -> Option<&Value> {
        match self {
            Accumulated::Updated(value) => Some(value),
            _ => None,
        }
    }
}

/// View any value as a sequence: arrays as-is, anything else as `[value]`
fn into_sequence(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

fn add_numbers(a: &Number, b: &Number) -> Option<Value> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        if let Some(sum) = x.checked_add(y) {
            return Some(Value::from(sum));
        }
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        if let Some(sum) = x.checked_add(y) {
            return Some(Value::from(sum));
        }
    }
    // Mixed kinds and integer overflow fall back to floating point
    let sum = a.as_f64()? + b.as_f64()?;
    Number::from_f64(sum).map(Value::Number)
}

fn combine(current: &Value, delta: &Value) -> Option<Value> {
    match (current, delta) {
        (Value::Number(a), Value::Number(b)) => add_numbers(a, b),
        (Value::String(a), Value::String(b)) => {
            let mut joined = String::with_capacity(a.len() + b.len());
            joined.push_str(a);
            joined.push_str(b);
            Some(Value::String(joined))
        }
        _ => None,
    }
}

impl Store {
    /// Append an item to an existing key's value
    ///
    /// A non-sequence value is first wrapped into a one-element sequence.
    /// Returns `None` if the key is absent.
    pub fn append<K, V>(&self, key: K, item: V) -> Result<Option<(Key, Vec<Value>)>>
    where
        K: Into<Key>,
        V: Serialize,
    {
        let key = key.into();
        let encoded = encode(&key)?;
        let item = serde_json::to_value(item)?;
        self.extend_existing(key, encoded, vec![item])
    }

    /// Add `delta` to a stored number, or concatenate it to a stored string
    ///
    /// Returns `NotApplicable` (and changes nothing) when the kinds differ.
    pub fn accumulate<K, V>(&self, key: K, delta: V) -> Result<Accumulated>
    where
        K: Into<Key>,
        V: Serialize,
    {
        let encoded = encode(&key.into())?;
        let delta = serde_json::to_value(delta)?;

        let updated = {
            let mut data = self.data.write();
            let Some(slot) = data.get_mut(encoded.as_str()) else {
                return Ok(Accumulated::NotFound);
            };
            let Some(updated) = combine(slot, &delta) else {
                return Ok(Accumulated::NotApplicable);
            };
            *slot = updated.clone();
            updated
        };

        self.save_if_enabled()?;
        Ok(Accumulated::Updated(updated))
    }

    /// Make a key hold a sequence
    ///
    /// - absent key → `[]`
    /// - non-sequence value → `[value]`
    /// - sequence value → unchanged
    pub fn sequence_create<K: Into<Key>>(&self, key: K) -> Result<()> {
        let encoded = encode(&key.into())?;

        match self.data.write().entry(encoded.into_string()) {
            Entry::Vacant(vacant) => {
                vacant.insert(Value::Array(Vec::new()));
            }
            Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                if !slot.is_array() {
                    let single = slot.take();
                    *slot = Value::Array(vec![single]);
                }
            }
        }

        self.save_if_enabled()
    }

    /// Alias of [`Store::append`]
    pub fn sequence_append<K, V>(&self, key: K, item: V) -> Result<Option<(Key, Vec<Value>)>>
    where
        K: Into<Key>,
        V: Serialize,
    {
        self.append(key, item)
    }

    /// Get a key's value as a sequence
    ///
    /// A non-sequence value is returned as a one-element sequence without
    /// modifying the store.
    pub fn sequence_get_all<K: Into<Key>>(&self, key: K) -> Result<Option<Vec<Value>>> {
        let encoded = encode(&key.into())?;
        Ok(self
            .data
            .read()
            .get(encoded.as_str())
            .map(|value| into_sequence(value.clone())))
    }

    /// Extend an existing key's value with every item
    pub fn sequence_extend<K, I, V>(&self, key: K, items: I) -> Result<Option<(Key, Vec<Value>)>>
    where
        K: Into<Key>,
        I: IntoIterator<Item = V>,
        V: Serialize,
    {
        let key = key.into();
        let encoded = encode(&key)?;
        let items = items
            .into_iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.extend_existing(key, encoded, items)
    }

    /// Empty a sequence value
    ///
    /// Returns `false` if the key is absent or its value is not a sequence.
    pub fn sequence_clear<K: Into<Key>>(&self, key: K) -> Result<bool> {
        let encoded = encode(&key.into())?;

        let cleared = match self.data.write().get_mut(encoded.as_str()) {
            Some(Value::Array(items)) => {
                items.clear();
                true
            }
            _ => false,
        };

        if cleared {
            self.save_if_enabled()?;
        }
        Ok(cleared)
    }

    /// Shared body of append and extend
    fn extend_existing(
        &self,
        key: Key,
        encoded: EncodedKey,
        items: Vec<Value>,
    ) -> Result<Option<(Key, Vec<Value>)>> {
        let sequence = {
            let mut data = self.data.write();
            let Some(slot) = data.get_mut(encoded.as_str()) else {
                return Ok(None);
            };
            let mut sequence = into_sequence(slot.take());
            sequence.extend(items);
            *slot = Value::Array(sequence.clone());
            sequence
        };

        self.save_if_enabled()?;
        Ok(Some((key, sequence)))
    }
}
