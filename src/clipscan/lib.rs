//! # Clipscan Architecture
//!
//! Clipscan reads the clipboard history that the Clipy clipboard manager keeps on disk and
//! lists it newest first. Like the rest of our tools it is a library with a thin CLI
//! client: the binary parses arguments and prints, everything else lives here.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs)                                     │
//! │  - Parses arguments, sets up logging, prints the report     │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  History + Display (history.rs, display.rs)                 │
//! │  - Finds `.data` files, sorts them, reads each into an entry│
//! │  - Formats entries as text                                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Decoding (archive.rs, bplist/)                             │
//! │  - bplist00 container codec                                 │
//! │  - Keyed-archive reference resolution                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Containment
//!
//! A bad history file never stops a scan. Decoding mismatches become "no text", parse and
//! read failures are kept on the entry for reporting, and only directory-level problems
//! ([`error::ClipscanError::is_input_error`]) end a run early.
//!
//! ## Module Overview
//!
//! - [`bplist`]: Binary property list values, reader and writer
//! - [`archive`]: Keyed-archive view and `stringValue` extraction
//! - [`history`]: Directory scanning and per-file entries
//! - [`display`]: Report formatting
//! - [`config`]: Configuration and default paths
//! - [`error`]: Error types

pub mod archive;
pub mod bplist;
pub mod config;
pub mod display;
pub mod error;
pub mod history;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
