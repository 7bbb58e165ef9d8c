use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clipscan", version)]
#[command(about = "List Clipy clipboard history, newest first", long_about = None)]
pub struct Cli {
    /// Directory holding Clipy's .data files (default: Clipy's application support dir)
    pub directory: Option<PathBuf>,

    /// Characters of content to show before truncating
    #[arg(long, value_name = "N")]
    pub preview_chars: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
