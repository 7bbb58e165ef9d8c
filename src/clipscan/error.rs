use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClipscanError {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("No .{extension} files found in {}", .dir.display())]
    NoDataFiles { dir: PathBuf, extension: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl ClipscanError {
    /// Directory-level problems that stop a run before any file is read.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            ClipscanError::DirectoryNotFound(_)
                | ClipscanError::NotADirectory(_)
                | ClipscanError::NoDataFiles { .. }
        )
    }
}

/// Failure to parse a binary property list container.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("file too short to be a binary plist ({0} bytes)")]
    TooShort(usize),

    #[error("not a binary plist (bad magic)")]
    BadMagic,

    #[error("unsupported binary plist version {0:?}")]
    UnsupportedVersion(String),

    #[error("invalid trailer: {0}")]
    InvalidTrailer(&'static str),

    #[error("object offset {offset} out of bounds")]
    OffsetOutOfBounds { offset: u64 },

    #[error("object reference {index} out of range ({count} objects)")]
    RefOutOfRange { index: u64, count: u64 },

    #[error("unexpected end of data at offset {0}")]
    UnexpectedEof(usize),

    #[error("unknown object marker 0x{marker:02x} at offset {offset}")]
    UnknownMarker { marker: u8, offset: usize },

    #[error("integer does not fit in 64 bits at offset {0}")]
    IntegerOverflow(usize),

    #[error("invalid string at offset {0}")]
    InvalidString(usize),

    #[error("dictionary key at offset {0} is not a string")]
    NonStringKey(usize),

    #[error("reference cycle through object {0}")]
    Cycle(u64),

    #[error("objects nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("shared references expand to more than {0} values")]
    ExpansionLimit(usize),
}

pub type Result<T> = std::result::Result<T, ClipscanError>;
