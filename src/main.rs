use std::path::PathBuf;
use std::process::ExitCode;

use eyre::Result;
use log::{debug, info, warn};

mod cli;

use cli::{Cli, OutputFormat};
use ytscribe::TranscriptResult;
use ytscribe::config::{Config, ExtractorConfig};
use ytscribe::locator::TrackSelection;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytscribe.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytscribe")
        .join("logs")
}

fn build_after_help() -> String {
    let config_path = ytscribe::config::config_path();
    let config_line = if config_path.exists() {
        format!("  \x1b[32m✅\x1b[0m {}", config_path.display())
    } else {
        format!("  \x1b[33m–\x1b[0m {} (not present, using defaults)", config_path.display())
    };

    format!(
        "\nCONFIG:\n{config_line}\n\nLogs are written to: {}",
        log_dir().join("ytscribe.log").display()
    )
}

/// File config first, then whatever the command line says
fn resolve_config(cli: &Cli) -> ExtractorConfig {
    let file = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring unreadable config: {e}");
        Config::default()
    });
    let mut config = ExtractorConfig::from_config(&file);

    if !cli.languages.is_empty() {
        config.languages = cli.languages.clone();
    }
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }
    if cli.match_language {
        config.track_selection = TrackSelection::Preferred;
    }
    if let Some(ref dir) = cli.output_dir {
        config.output_dir = dir.clone();
    }

    debug!("Resolved config: {config:?}");
    config
}

fn missing_video_line() -> String {
    serde_json::json!({
        "success": false,
        "kind": "MissingArgument",
        "error": "Video ID is required",
    })
    .to_string()
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    if let Err(e) = setup_logging() {
        eprintln!("warning: file logging disabled: {e}");
    }

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    let Some(input) = cli.video.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
        match cli.format {
            OutputFormat::Result => println!("{}", missing_video_line()),
            _ => eprintln!("error: no URL or video ID provided\n\nUsage: ytscribe <URL|ID> [LANG]..."),
        }
        return Ok(ExitCode::from(1));
    };

    let video_id = ytscribe::extract_video_id(input).unwrap_or_else(|| {
        warn!("Could not recognize a video ID in {input:?}, using it verbatim");
        input.to_string()
    });

    let config = resolve_config(&cli);
    if cli.verbose {
        eprintln!(
            "Video: {video_id}\nStrategy: {}\nLanguages: {}",
            config.strategy,
            config.languages.join(", ")
        );
    }

    let client = reqwest::Client::new();
    let result = ytscribe::source::extract_with_config(client, &config, &video_id).await;

    if let TranscriptResult::Success(ref transcript) = result {
        if cli.verbose {
            eprintln!(
                "Language: {}\nSegments: {}",
                transcript.language,
                transcript.segments.len()
            );
        }
        if cli.save {
            match ytscribe::output::save(transcript, &config.output_dir) {
                Ok(saved) => {
                    if cli.verbose {
                        eprintln!("Saved: {}\nSaved: {}", saved.text.display(), saved.json.display());
                    }
                }
                Err(e) => {
                    warn!("Saving transcript failed: {e}");
                    eprintln!("warning: could not save transcript: {e}");
                }
            }
        }
    }

    match (cli.format, &result) {
        (OutputFormat::Result, _) => {
            println!("{}", result.to_json_line());
            Ok(ExitCode::SUCCESS)
        }
        (OutputFormat::Text, TranscriptResult::Success(t)) => {
            println!("{}", ytscribe::output::render_text(t));
            Ok(ExitCode::SUCCESS)
        }
        (OutputFormat::Json, TranscriptResult::Success(t)) => {
            println!("{}", ytscribe::output::render_json(t)?);
            Ok(ExitCode::SUCCESS)
        }
        (_, TranscriptResult::Failure { kind, message }) => {
            eprintln!("error [{kind}]: {message}");
            Ok(ExitCode::from(1))
        }
    }
}
