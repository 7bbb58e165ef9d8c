//! Archive builders shared by unit tests and, with the `test_utils` feature, by the
//! integration tests.

use crate::archive::{OBJECTS_KEY, STRING_VALUE_KEY};
use crate::bplist::{self, Value};
use std::collections::BTreeMap;

#[cfg(test)]
pub use fixture::{set_age, HistoryFixture};

pub fn dict(entries: Vec<(&str, Value)>) -> Value {
    Value::Dictionary(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
    )
}

/// A keyed-archive plist around the given `$objects`.
pub fn archive_with(objects: Vec<Value>) -> Vec<u8> {
    let container = dict(vec![
        ("$archiver", Value::from("NSKeyedArchiver")),
        ("$version", Value::Integer(100_000)),
        ("$top", dict(vec![("root", Value::Uid(1))])),
        (OBJECTS_KEY, Value::Array(objects)),
    ]);
    bplist::to_bytes(&container)
}

/// A root object shaped like Clipy's `CPYClipData`.
pub fn clip_root(string_value: Value) -> Value {
    dict(vec![
        (STRING_VALUE_KEY, string_value),
        ("types", Value::Uid(3)),
        ("$class", Value::Uid(4)),
    ])
}

/// A complete clip archive whose text is `text`.
pub fn clip_archive(text: &str) -> Vec<u8> {
    archive_with(vec![
        Value::from("$null"),
        clip_root(Value::Uid(2)),
        Value::from(text),
        Value::Array(vec![]),
        dict(vec![("$classname", Value::from("CPYClipData"))]),
    ])
}
