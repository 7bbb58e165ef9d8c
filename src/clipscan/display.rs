//! # Report Formatting
//!
//! Turns scan results into the text the binary prints. Everything here returns strings;
//! writing them out is left to the caller.

use crate::error::ClipscanError;
use crate::history::ClipEntry;
use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::path::Path;
use std::time::SystemTime;

pub const RULE_WIDTH: usize = 80;
pub const NO_TEXT: &str = "(Could not extract text)";
const ELLIPSIS: &str = "...";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The lines printed before the first entry.
pub fn format_header(dir: &Path, count: usize) -> String {
    format!(
        "Reading clipboard history from: {}\nFound {} clipboard history files.\n\n{}",
        dir.display(),
        count,
        "=".repeat(RULE_WIDTH)
    )
}

/// One entry block. `index` is 1-based.
pub fn format_entry(index: usize, entry: &ClipEntry, preview_chars: usize) -> String {
    let mut out = format!(
        "\n[{}] {}\n    Modified: {}\n",
        index,
        entry.file_name,
        format_timestamp(entry.modified)
    );

    match entry.display_text() {
        Some(text) => {
            out.push_str(&format!(
                "    Length: {} characters\n    Content: {}\n",
                text.chars().count(),
                truncate_for_display(text, preview_chars)
            ));
        }
        None => {
            out.push_str(&format!("    Content: {}\n", NO_TEXT));
        }
    }

    out.push_str(&"-".repeat(RULE_WIDTH));
    out
}

/// The diagnostic printed ahead of an entry that could not be read.
pub fn format_read_error(entry: &ClipEntry) -> Option<String> {
    entry
        .error
        .as_ref()
        .map(|message| format!("Error reading {}: {}", entry.path.display(), message))
}

/// User-facing report for directory-level problems.
pub fn format_input_error(err: &ClipscanError, bin_name: &str, default_dir: &Path) -> String {
    match err {
        ClipscanError::DirectoryNotFound(_) => format!(
            "Error: {}\n\nUsage: {} [clipy_directory]\nDefault directory: {}",
            err,
            bin_name,
            default_dir.display()
        ),
        ClipscanError::NoDataFiles { .. } => err.to_string(),
        _ => format!("Error: {}", err),
    }
}

/// Keeps the first `max_chars` characters, marking the cut with "...".
pub fn truncate_for_display(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}{}", &text[..cut], ELLIPSIS)),
        None => Cow::Borrowed(text),
    }
}

/// Local wall-clock time, `YYYY-MM-DD HH:MM:SS`.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format(TIMESTAMP_FORMAT)
        .to_string()
}
