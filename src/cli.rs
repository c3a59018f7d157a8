use clap::Parser;
use std::path::PathBuf;

use ytscribe::Strategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One line of JSON for programmatic callers
    Result,
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytscribe",
    about = "YouTube transcript fetcher",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL or video ID
    pub video: Option<String>,

    /// Preferred caption languages, most preferred first (default: ko en)
    pub languages: Vec<String>,

    /// How to obtain the transcript
    #[arg(short, long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Pick the first track matching the preferred languages instead of the first listed
    #[arg(short, long)]
    pub match_language: bool,

    /// Output format: result (default), text, json
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Result)]
    pub format: OutputFormat,

    /// Also save transcript_<id>.txt and transcript_<id>.json
    #[arg(long)]
    pub save: bool,

    /// Directory for saved transcripts
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Show extraction method and metadata
    #[arg(short, long)]
    pub verbose: bool,
}
