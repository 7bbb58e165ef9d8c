//! # Binary Property Lists
//!
//! A small codec for the `bplist00` format that Cocoa's archivers write.
//!
//! A binary plist is a flat table of objects. Containers (arrays, dictionaries) refer to
//! their members by object number, and a trailer at the end of the file points at the
//! offset table and the top object. [`from_bytes`] walks that table and produces a nested
//! [`Value`]; [`to_bytes`] does the reverse.
//!
//! Keyed archives add a second layer of indirection on top of this: see
//! [`crate::archive`]. At this level a [`Value::Uid`] is just a value.

use std::collections::BTreeMap;

mod reader;
mod writer;

pub use reader::from_bytes;
pub use writer::to_bytes;

pub(crate) const MAGIC: &[u8; 6] = b"bplist";
pub(crate) const VERSION: &[u8; 2] = b"00";
pub(crate) const HEADER_LEN: usize = 8;
pub(crate) const TRAILER_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Integer(i64),
    Real(f64),
    /// Seconds since 2001-01-01T00:00:00Z.
    Date(f64),
    Data(Vec<u8>),
    String(String),
    Array(Vec<Value>),
    Dictionary(BTreeMap<String, Value>),
    /// An object number inside a keyed archive's `$objects` array.
    Uid(u64),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_uid(&self) -> Option<u64> {
        match self {
            Value::Uid(uid) => Some(*uid),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Dictionary(map) => Some(map),
            _ => None,
        }
    }

    /// Dictionary lookup; `None` for missing keys and for non-dictionaries.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dictionary().and_then(|map| map.get(key))
    }

    /// Whether the value counts as present. Empty and zero values do not; UIDs always do.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Boolean(b) => *b,
            Value::Integer(n) => *n != 0,
            Value::Real(r) | Value::Date(r) => *r != 0.0,
            Value::Data(bytes) => !bytes.is_empty(),
            Value::String(s) => !s.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Dictionary(map) => !map.is_empty(),
            Value::Uid(_) => true,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Dictionary(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_follows_emptiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Integer(0).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Array(vec![]).is_truthy());
        assert!(Value::Integer(-1).is_truthy());
        assert!(Value::from("x").is_truthy());
    }

    #[test]
    fn uid_zero_is_still_truthy() {
        assert!(Value::Uid(0).is_truthy());
    }

    #[test]
    fn get_on_non_dictionary_is_none() {
        assert_eq!(Value::from("stringValue").get("stringValue"), None);
    }

    #[test]
    fn accessors_reject_other_variants() {
        assert_eq!(Value::Integer(3).as_uid(), None);
        assert_eq!(Value::Uid(3).as_integer(), None);
        assert_eq!(Value::Uid(3).as_uid(), Some(3));
    }
}
