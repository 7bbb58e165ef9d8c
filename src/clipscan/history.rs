//! # Clipboard History Directory
//!
//! Clipy keeps one archive per clipboard entry, as `<uuid>.data` files directly inside its
//! data directory. [`HistoryDir`] validates that directory, lists the history files in it
//! newest first, and reads each one into a [`ClipEntry`].
//!
//! Failures are contained per file: an unreadable or corrupt file still yields an entry,
//! with [`ClipEntry::error`] describing what went wrong. Only problems with the directory
//! itself are returned as errors.

use crate::archive::extract_string_value;
use crate::error::{ClipscanError, Result};
use std::cmp::Reverse;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipEntry {
    pub path: PathBuf,
    pub file_name: String,
    pub modified: SystemTime,
    /// The archived text, when the file decoded and held one.
    pub text: Option<String>,
    /// Why the file could not be read or parsed.
    pub error: Option<String>,
}

impl ClipEntry {
    /// Reads and decodes one history file. Never fails: problems land in `error`.
    pub fn read(path: &Path, modified: SystemTime) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (text, error) = match fs::read(path) {
            Ok(bytes) => match extract_string_value(&bytes) {
                Ok(text) => {
                    if text.is_none() {
                        debug!(path = %path.display(), "no stringValue in archive");
                    }
                    (text, None)
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "not a binary plist");
                    (None, Some(e.to_string()))
                }
            },
            Err(e) => {
                debug!(path = %path.display(), error = %e, "unreadable history file");
                (None, Some(e.to_string()))
            }
        };

        Self {
            path: path.to_path_buf(),
            file_name,
            modified,
            text,
            error,
        }
    }

    /// The text, unless it is missing or empty.
    pub fn display_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct HistoryDir {
    root: PathBuf,
    extension: String,
}

impl HistoryDir {
    /// Checks that `root` exists and is a directory.
    pub fn open(root: impl Into<PathBuf>, extension: &str) -> Result<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(ClipscanError::DirectoryNotFound(root));
        }
        if !root.is_dir() {
            return Err(ClipscanError::NotADirectory(root));
        }
        Ok(Self {
            root,
            extension: extension.trim_start_matches('.').to_string(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// History files directly inside the directory, newest first. Hidden files and
    /// directories are skipped. A file that cannot be stat'ed is still listed, sorted as
    /// the Unix epoch, so its read error gets reported.
    pub fn data_files(&self) -> Result<Vec<(PathBuf, SystemTime)>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            let path = entry.path();

            if entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }
            if path.extension() != Some(OsStr::new(&self.extension)) {
                continue;
            }

            if entry.file_type().is_ok_and(|t| t.is_dir()) {
                continue;
            }

            let modified = match fs::metadata(&path) {
                Ok(metadata) if metadata.is_dir() => continue,
                Ok(metadata) => metadata.modified().unwrap_or_else(|e| {
                    warn!(path = %path.display(), error = %e, "no modification time");
                    SystemTime::UNIX_EPOCH
                }),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "cannot stat history file");
                    SystemTime::UNIX_EPOCH
                }
            };
            files.push((path, modified));
        }

        files.sort_by(|(a_path, a_time), (b_path, b_time)| {
            (Reverse(a_time), a_path).cmp(&(Reverse(b_time), b_path))
        });
        debug!(count = files.len(), dir = %self.root.display(), "found history files");
        Ok(files)
    }

    /// Reads every history file, newest first.
    pub fn read_entries(&self) -> Result<Vec<ClipEntry>> {
        let files = self.data_files()?;
        if files.is_empty() {
            return Err(ClipscanError::NoDataFiles {
                dir: self.root.clone(),
                extension: self.extension.clone(),
            });
        }
        Ok(files
            .iter()
            .map(|(path, modified)| ClipEntry::read(path, *modified))
            .collect())
    }
}
