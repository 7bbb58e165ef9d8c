use crate::error::{ClipscanError, Result};
use directories::{BaseDirs, ProjectDirs};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_EXTENSION: &str = "data";
const DEFAULT_PREVIEW_CHARS: usize = 200;
const CLIPY_DIR_NAME: &str = "Clipy";

/// Overrides the directory `config.json` is read from.
pub const CONFIG_DIR_ENV: &str = "CLIPSCAN_CONFIG_DIR";

/// Configuration for clipscan, stored as config.json in the user's config directory
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClipscanConfig {
    /// Directory to scan when none is given on the command line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,

    /// Extension of history files, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Characters of content shown before truncating with "..."
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_preview_chars() -> usize {
    DEFAULT_PREVIEW_CHARS
}

impl Default for ClipscanConfig {
    fn default() -> Self {
        Self {
            directory: None,
            extension: default_extension(),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl ClipscanConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let mut config: ClipscanConfig = serde_json::from_str(&content)?;
        let ext = config.extension.clone();
        config.set_extension(&ext);
        if config.extension.is_empty() {
            return Err(ClipscanError::Config(format!(
                "{}: extension must not be empty",
                config_path.display()
            )));
        }
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// Set the extension (normalizes away a leading dot)
    pub fn set_extension(&mut self, ext: &str) {
        self.extension = ext.trim_start_matches('.').to_string();
    }

    /// Directory to scan: the command line wins, then the config file, then Clipy's
    /// default location.
    pub fn resolve_directory(&self, cli_dir: Option<&Path>) -> Option<PathBuf> {
        cli_dir
            .or(self.directory.as_deref())
            .map(expand_home)
            .or_else(default_clipy_dir)
    }
}

/// Where the config file lives: `$CLIPSCAN_CONFIG_DIR` or the platform config dir.
pub fn config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "clipscan", "clipscan").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Clipy's data directory: `~/Library/Application Support/Clipy` on macOS.
pub fn default_clipy_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.data_dir().join(CLIPY_DIR_NAME))
}

/// Expands a leading `~` to the home directory. Other paths pass through unchanged.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}
