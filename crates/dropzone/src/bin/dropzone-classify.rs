//! Classifies local files and folders as if they were dropped on a drop target.
//!
//! All paths form one drop. Folders are expanded, every file is checked against the
//! target's criteria, and the accepted/rejected partition is printed to stdout as JSON.
//!
//! Usage:
//!   dropzone-classify [--config PATH] [--accept PATTERNS] [--min-size N] [--max-size N]
//!                     [--single] [--previews] PATH...
//!
//! Environment variables:
//!   DROPZONE_CONFIG - Config file used when `--config` isn't given
//!   RUST_LOG - Log filter (default: info)

use dropzone::{DragEvent, DropTarget, DropTargetConfig, EntryHandle, LocalEntry, StaticTransfer, load_config};
use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

const USAGE: &str = "Usage: dropzone-classify [--config PATH] [--accept PATTERNS] [--min-size N] \
                     [--max-size N] [--single] [--previews] PATH...";

struct Args {
    config: DropTargetConfig,
    paths: Vec<PathBuf>,
}

fn parse_number(flag: &str, value: Option<&String>) -> Result<u64, String> {
    let value = value.ok_or_else(|| format!("{} needs a value", flag))?;
    value
        .parse()
        .map_err(|e| format!("Invalid value for {}: {:?} ({})", flag, value, e))
}

fn parse_args(args: &[String]) -> Result<Args, String> {
    // Config file first, so flags can override it
    let mut config_path = env::var("DROPZONE_CONFIG").ok().map(PathBuf::from);
    for i in 0..args.len() {
        if args[i] == "--config"
            && let Some(path) = args.get(i + 1)
        {
            config_path = Some(PathBuf::from(path));
        }
    }
    let mut config = match &config_path {
        Some(path) => load_config(path),
        None => DropTargetConfig::default(),
    };
    // Preview references die with the process, so only create them on request
    config.disable_preview = true;

    let mut paths = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                iter.next();
            }
            "--accept" => {
                config.accept = iter.next().ok_or("--accept needs a value")?.clone();
            }
            "--min-size" => config.min_size = parse_number("--min-size", iter.next())?,
            "--max-size" => config.max_size = parse_number("--max-size", iter.next())?,
            "--single" => config.multiple = false,
            "--previews" => config.disable_preview = false,
            flag if flag.starts_with("--") => return Err(format!("Unknown option {}", flag)),
            path => paths.push(PathBuf::from(path)),
        }
    }

    if paths.is_empty() {
        return Err("No paths given".to_string());
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(Args { config, paths })
}

async fn open_entries(paths: &[PathBuf]) -> Vec<EntryHandle> {
    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        match LocalEntry::open(path.as_path()).await {
            Ok(entry) => entries.push(entry.into_handle()),
            Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
        }
    }
    entries
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Args { config, paths } = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            log::error!("{}", message);
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    let target = match DropTarget::new(config) {
        Ok(target) => target,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::from(2);
        }
    };

    let entries = open_entries(&paths).await;
    log::info!("Classifying {} of {} paths", entries.len(), paths.len());
    let event = DragEvent::new(Arc::new(StaticTransfer::from_entries(entries)));
    let outcome = target.on_drop(&event).await;
    let result = outcome.result().cloned().unwrap_or_default();

    let json = match serde_json::to_string_pretty(&result) {
        Ok(json) => json,
        Err(e) => {
            log::error!("Couldn't serialize result: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut stdout = io::stdout();
    if let Err(e) = writeln!(stdout, "{}", json) {
        log::error!("Couldn't write result: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
