//! # Keyed Archives
//!
//! Clipy saves every clipboard entry with `NSKeyedArchiver`. The resulting plist is not a
//! nested tree of the archived object: it is a dictionary whose `$objects` array holds
//! every archived value once, and fields inside those values point at each other through
//! [`Value::Uid`] indices into that array.
//!
//! ```text
//! $objects[0]  "$null"                       placeholder
//! $objects[1]  { stringValue: Uid(2), ... }   root object (CPYClipData)
//! $objects[2]  "the copied text"
//! ```
//!
//! [`KeyedArchive`] is a read-only view over `$objects` with a single-hop
//! [`KeyedArchive::resolve`]. Nothing here follows more than one reference, and nothing
//! checks `$classname`: the object at index 1 is taken to be the clip data.

use crate::bplist::{self, Value};
use crate::error::DecodeError;
use tracing::debug;

pub const OBJECTS_KEY: &str = "$objects";
pub const ROOT_INDEX: usize = 1;
pub const STRING_VALUE_KEY: &str = "stringValue";

/// The `$objects` table of a decoded keyed archive.
#[derive(Debug, Clone, Copy)]
pub struct KeyedArchive<'a> {
    objects: &'a [Value],
}

impl<'a> KeyedArchive<'a> {
    /// Views a decoded container as a keyed archive. `None` unless it has an `$objects`
    /// array with at least the placeholder and a root object.
    pub fn from_container(container: &'a Value) -> Option<Self> {
        let Some(objects) = container.get(OBJECTS_KEY).and_then(Value::as_array) else {
            debug!("container has no {} array", OBJECTS_KEY);
            return None;
        };
        if objects.len() <= ROOT_INDEX {
            debug!(len = objects.len(), "{} too short for a root object", OBJECTS_KEY);
            return None;
        }
        Some(Self { objects })
    }

    /// The object a back-reference points at, if the index is in range. Index 0 is the
    /// `$null` placeholder and resolves like any other slot.
    pub fn resolve(&self, index: u64) -> Option<&'a Value> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.objects.get(i))
    }

    pub fn root(&self) -> Option<&'a Value> {
        self.objects.get(ROOT_INDEX)
    }

    /// The text the root object's `stringValue` field refers to.
    pub fn string_value(&self) -> Option<&'a str> {
        let root = self.root()?;
        if root.as_dictionary().is_none() {
            debug!("root object is not a dictionary");
            return None;
        }

        let field = root.get(STRING_VALUE_KEY).filter(|v| v.is_truthy())?;
        let index = reference_index(field)?;
        let Some(target) = self.resolve(index) else {
            debug!(index, len = self.objects.len(), "reference out of range");
            return None;
        };

        let text = target.as_str();
        if text.is_none() {
            debug!(index, "reference does not point at a string");
        }
        text
    }
}

/// The object index a field refers to. Archives normally wrap it in a UID; a bare
/// non-negative integer is accepted too. Anything else is not a reference.
fn reference_index(field: &Value) -> Option<u64> {
    if let Some(uid) = field.as_uid() {
        return Some(uid);
    }
    if let Some(n) = field.as_integer() {
        return u64::try_from(n).ok();
    }
    debug!(?field, "{} is not a reference", STRING_VALUE_KEY);
    None
}

/// Decodes a keyed-archive plist and returns the root object's `stringValue` text.
///
/// `Err` means the buffer is not a readable binary plist. Every other mismatch (missing
/// keys, wrong types, dangling references) is `Ok(None)`.
pub fn extract_string_value(buffer: &[u8]) -> Result<Option<String>, DecodeError> {
    let container = bplist::from_bytes(buffer)?;
    Ok(KeyedArchive::from_container(&container)
        .and_then(|archive| archive.string_value())
        .map(str::to_owned))
}
