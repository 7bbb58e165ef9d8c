use clap::Parser;
use clipscan::config::{self, ClipscanConfig};
use clipscan::display::{format_entry, format_header, format_input_error, format_read_error};
use clipscan::error::{ClipscanError, Result};
use clipscan::history::HistoryDir;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod args;
use args::Cli;

const BIN_NAME: &str = "clipscan";
const FALLBACK_CLIPY_DIR: &str = "~/Library/Application Support/Clipy";

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match config::config_dir() {
        Some(dir) => ClipscanConfig::load(dir)?,
        None => ClipscanConfig::default(),
    };
    let preview_chars = cli.preview_chars.unwrap_or(config.preview_chars);

    let dir = config
        .resolve_directory(cli.directory.as_deref())
        .ok_or_else(|| {
            ClipscanError::Config("cannot locate the home directory; pass a directory".into())
        })?;
    tracing::debug!(dir = %dir.display(), preview_chars, "scanning");

    match print_history(&dir, &config.extension, preview_chars) {
        Err(e) if e.is_input_error() => {
            let default_dir =
                config::default_clipy_dir().unwrap_or_else(|| PathBuf::from(FALLBACK_CLIPY_DIR));
            println!("{}", format_input_error(&e, BIN_NAME, &default_dir));
            Ok(())
        }
        other => other,
    }
}

fn print_history(dir: &Path, extension: &str, preview_chars: usize) -> Result<()> {
    let history = HistoryDir::open(dir, extension)?;
    let entries = history.read_entries()?;

    println!("{}", format_header(history.root(), entries.len()));
    for (i, entry) in entries.iter().enumerate() {
        if let Some(line) = format_read_error(entry) {
            println!("{}", line);
        }
        println!("{}", format_entry(i + 1, entry, preview_chars));
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .compact()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
