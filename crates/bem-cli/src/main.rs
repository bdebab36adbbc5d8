use std::path::{Path, PathBuf};

use anyhow::Context;
use bem_engine::{Engine, FileReport};
use bem_syntax::parse_sheet;
use clap::Parser;
use tracing::debug;

mod cli;
mod config;
mod output;

use cli::{CheckArgs, Cli, Commands, OutputFormat};
use output::FileOutcome;

fn main() {
    match run() {
        Ok(clean) => {
            if !clean {
                std::process::exit(1);
            }
        }
        Err(error) => {
            eprintln!("bemcheck error: {error:#}");
            std::process::exit(2);
        }
    }
}

fn run() -> anyhow::Result<bool> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Check(args) => check(&args, config),
        Commands::PrintConfig => {
            print!("{}", toml::to_string_pretty(&config)?);
            Ok(true)
        }
        Commands::Schema => {
            let schema = schemars::schema_for!(bem_engine::EngineConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(true)
        }
    }
}

fn check(args: &CheckArgs, config: bem_engine::EngineConfig) -> anyhow::Result<bool> {
    let files = collect_files(&args.paths)?;
    anyhow::ensure!(!files.is_empty(), "no .css or .scss files found");

    let engine = Engine::new(config);
    let outcomes: Vec<FileOutcome> = files
        .into_iter()
        .map(|path| lint_file(&engine, path))
        .collect::<anyhow::Result<_>>()?;

    let rendered = match args.format {
        OutputFormat::Text => output::render_text(&outcomes),
        OutputFormat::Json => output::render_json(&outcomes)?,
    };
    print!("{rendered}");

    Ok(outcomes
        .iter()
        .all(|outcome| outcome.report.violations.is_empty()))
}

fn lint_file(engine: &Engine, path: PathBuf) -> anyhow::Result<FileOutcome> {
    let source = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let report = match parse_sheet(&source) {
        Ok(sheet) => engine.check_sheet(&sheet),
        // A broken file degrades to a warning; the run continues.
        Err(error) => {
            debug!(path = %path.display(), %error, "stylesheet parse failed");
            FileReport {
                parse_degraded: Some(format!("parse failed: {error}")),
                ..FileReport::default()
            }
        }
    };
    Ok(FileOutcome { path, report })
}

/// Expand paths into the stylesheet files beneath them, sorted for stable
/// output.
fn collect_files(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        anyhow::ensure!(path.exists(), "path '{}' does not exist", path.display());
        if path.is_dir() {
            walk_dir(path, &mut files)?;
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn walk_dir(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory '{}'", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.is_dir() {
            walk_dir(&path, files)?;
        } else if is_stylesheet(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_stylesheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("css") || ext.eq_ignore_ascii_case("scss"))
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("BEMCHECK_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
