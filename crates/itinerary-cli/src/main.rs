use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use itinerary_core::{Config, Diagnostic, DiagnosticCode, OutputMode, Report, Severity};
use itinerary_engine::{Pipeline, PipelineOutput};
use itinerary_lookup::{ReferenceTable, StyleStore};

/// Input read by `--stdout` when no input path is given
const DEFAULT_INPUT: &str = "input.txt";
/// Lookup table used when neither the arguments nor the config name one
const DEFAULT_LOOKUP: &str = "airport-lookup.csv";
/// Config file picked up from the working directory
const DEFAULT_CONFIG: &str = "itinerary.toml";

const USAGE: &str = "itinerary <INPUT> <OUTPUT> <LOOKUP>
       itinerary --stdout [INPUT] [LOOKUP]";

/// Itinerary - turn airport codes and ISO timestamps into readable text
#[derive(Parser)]
#[command(name = "itinerary")]
#[command(author, version, about, long_about = None)]
#[command(override_usage = USAGE)]
struct Cli {
    /// Input itinerary, output file and airport lookup CSV
    #[arg(num_args = 0..=3)]
    paths: Vec<PathBuf>,

    /// Print the result to stdout (styled unless --plain) instead of writing a file
    #[arg(short = 'o', long)]
    stdout: bool,

    /// Wrap replacements in terminal escape sequences
    #[arg(long, conflicts_with = "plain")]
    styled: bool,

    /// Never emit escape sequences
    #[arg(long)]
    plain: bool,

    /// Style settings file (default: ./user_settings.txt)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Path to config file (default: itinerary.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a JSON report of diagnostics here
    #[arg(long)]
    report: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Where a run reads from and writes to
#[derive(Debug, PartialEq)]
struct RunPaths {
    input: PathBuf,
    /// `None` means stdout
    output: Option<PathBuf>,
    lookup: PathBuf,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = load_config(&cli)?;
    init_logging(cli.verbose, config.log_file.as_deref())?;

    let paths = match resolve_paths(&cli, &config) {
        Ok(paths) => paths,
        Err(message) => Cli::command().error(ErrorKind::WrongNumberOfValues, message).exit(),
    };

    let mode = select_mode(&cli, &config);
    if cli.verbose {
        eprintln!("{} {} mode, lookup {}", "Using".cyan(), mode, paths.lookup.display());
    }

    process(&config, &paths, mode)
}

/// Load the config file and fold command-line overrides into it
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else if Path::new(DEFAULT_CONFIG).exists() {
        Config::from_file(Path::new(DEFAULT_CONFIG))?
    } else {
        Config::default()
    };

    if let Some(settings) = &cli.settings {
        config.settings = settings.clone();
    } else {
        config.settings = config.resolve(&config.settings);
    }
    config.report = match &cli.report {
        Some(report) => Some(report.clone()),
        None => config.report.as_ref().map(|p| config.resolve(p)),
    };
    config.log_file = match &cli.log_file {
        Some(log_file) => Some(log_file.clone()),
        None => config.log_file.as_ref().map(|p| config.resolve(p)),
    };

    Ok(config)
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::sync::Mutex::new(file)).with_ansi(false))
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    }

    Ok(())
}

/// Work out input, output and lookup paths from positional arguments
fn resolve_paths(cli: &Cli, config: &Config) -> std::result::Result<RunPaths, String> {
    let configured_lookup = config.lookup.as_ref().map(|p| config.resolve(p));
    let default_lookup = || {
        configured_lookup
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOOKUP))
    };

    if cli.stdout {
        return match cli.paths.as_slice() {
            [] => Ok(RunPaths {
                input: PathBuf::from(DEFAULT_INPUT),
                output: None,
                lookup: default_lookup(),
            }),
            [input] => Ok(RunPaths {
                input: input.clone(),
                output: None,
                lookup: default_lookup(),
            }),
            [input, lookup] => Ok(RunPaths {
                input: input.clone(),
                output: None,
                lookup: lookup.clone(),
            }),
            _ => Err("--stdout takes at most an input and a lookup path".to_string()),
        };
    }

    match (cli.paths.as_slice(), configured_lookup) {
        ([input, output, lookup], _) => Ok(RunPaths {
            input: input.clone(),
            output: Some(output.clone()),
            lookup: lookup.clone(),
        }),
        ([input, output], Some(lookup)) => Ok(RunPaths {
            input: input.clone(),
            output: Some(output.clone()),
            lookup,
        }),
        _ => Err("expected <INPUT> <OUTPUT> <LOOKUP>".to_string()),
    }
}

/// `--styled`/`--plain` win, then `--stdout` implies styled, then the config
fn select_mode(cli: &Cli, config: &Config) -> OutputMode {
    if cli.styled {
        OutputMode::Styled
    } else if cli.plain {
        OutputMode::Plain
    } else if cli.stdout {
        OutputMode::Styled
    } else {
        config.mode()
    }
}

/// Run the pipeline for one document
fn process(config: &Config, paths: &RunPaths, mode: OutputMode) -> Result<()> {
    if !paths.input.exists() {
        anyhow::bail!("Input not found: {}", paths.input.display());
    }
    if !paths.lookup.exists() {
        anyhow::bail!("Airport lookup not found: {}", paths.lookup.display());
    }

    let table = match ReferenceTable::from_file(&paths.lookup) {
        Ok(table) => table,
        Err(err) => {
            tracing::error!(
                path = %paths.lookup.display(),
                error = %err,
                "airport lookup malformed"
            );
            if let Some(report_path) = &config.report {
                let report = Report::from_diagnostics(vec![err.to_diagnostic(&paths.lookup)]);
                save_report(&report, report_path)?;
            }
            return Err(err).with_context(|| {
                format!("Airport lookup malformed: {}", paths.lookup.display())
            });
        }
    };

    let mut extra = Vec::new();
    let styles = match StyleStore::try_from_file(&config.settings) {
        Ok(styles) => styles,
        Err(err) if mode.is_styled() => {
            tracing::warn!(
                path = %config.settings.display(),
                error = %err,
                "settings not found, styling disabled"
            );
            extra.push(Diagnostic::new(
                DiagnosticCode::StyleSettingsUnavailable,
                Severity::Info,
                format!("Settings not found: {} ({})", config.settings.display(), err),
            ));
            StyleStore::empty()
        }
        Err(_) => StyleStore::empty(),
    };

    let document = std::fs::read_to_string(&paths.input)
        .with_context(|| format!("Failed to read input {}", paths.input.display()))?;

    let pipeline = Pipeline::new(table, styles, mode);
    let mut output = pipeline.run(&document);
    extra.append(&mut output.diagnostics);
    output.diagnostics = extra;

    match &paths.output {
        Some(path) => {
            std::fs::write(path, &output.text)
                .with_context(|| format!("Error creating output file {}", path.display()))?;
            println!("{}", "Processing complete.".green());
        }
        None => println!("{}", output.text),
    }

    if let Some(report_path) = &config.report {
        save_report(&output.to_report(), report_path)?;
    }

    print_diagnostic_summary(&output);
    Ok(())
}

fn save_report(report: &Report, path: &Path) -> Result<()> {
    report
        .save_to_file(path)
        .with_context(|| format!("Failed to write report {}", path.display()))
}

/// Print deduplicated diagnostics to stderr
fn print_diagnostic_summary(output: &PipelineOutput) {
    if output.diagnostics.is_empty() {
        return;
    }

    eprintln!(
        "{} {} issue(s) in {} line(s); affected tokens were left unchanged",
        "warning:".yellow().bold(),
        output.diagnostics.len(),
        output.lines_processed
    );

    for diag in &output.diagnostics {
        let code = match diag.severity {
            Severity::Error => diag.code.as_str().red(),
            Severity::Warn => diag.code.as_str().yellow(),
            Severity::Info => diag.code.as_str().cyan(),
        };
        let location = diag
            .location
            .as_ref()
            .map(|l| format!(" ({})", l))
            .unwrap_or_default();
        let repeats = if diag.occurrences > 1 {
            format!(" x{}", diag.occurrences)
        } else {
            String::new()
        };

        eprintln!("  {} {}{}{}", code, diag.message, location, repeats.dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("itinerary").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn three_positionals_for_file_output() {
        let args = cli(&["in.txt", "out.txt", "airports.csv"]);
        let paths = resolve_paths(&args, &Config::default()).unwrap();
        assert_eq!(paths.input, PathBuf::from("in.txt"));
        assert_eq!(paths.output, Some(PathBuf::from("out.txt")));
        assert_eq!(paths.lookup, PathBuf::from("airports.csv"));
    }

    #[test]
    fn lookup_may_come_from_config() {
        let mut config = Config::default();
        config.project_root = PathBuf::from("/data");
        config.lookup = Some(PathBuf::from("airports.csv"));

        let paths = resolve_paths(&cli(&["in.txt", "out.txt"]), &config).unwrap();
        assert_eq!(paths.lookup, PathBuf::from("/data/airports.csv"));
    }

    #[test]
    fn missing_output_is_rejected() {
        assert!(resolve_paths(&cli(&["in.txt"]), &Config::default()).is_err());
        assert!(resolve_paths(&cli(&["in.txt", "out.txt"]), &Config::default()).is_err());
    }

    #[test]
    fn stdout_defaults() {
        let paths = resolve_paths(&cli(&["-o"]), &Config::default()).unwrap();
        assert_eq!(
            paths,
            RunPaths {
                input: PathBuf::from(DEFAULT_INPUT),
                output: None,
                lookup: PathBuf::from(DEFAULT_LOOKUP),
            }
        );

        let args = cli(&["--stdout", "trip.txt", "lookup.csv"]);
        let paths = resolve_paths(&args, &Config::default()).unwrap();
        assert_eq!(paths.input, PathBuf::from("trip.txt"));
        assert_eq!(paths.lookup, PathBuf::from("lookup.csv"));
        assert!(resolve_paths(&cli(&["-o", "a", "b", "c"]), &Config::default()).is_err());
    }

    #[test]
    fn mode_selection() {
        let config = Config::default();
        assert_eq!(select_mode(&cli(&["a", "b", "c"]), &config), OutputMode::Plain);
        assert_eq!(select_mode(&cli(&["-o"]), &config), OutputMode::Styled);
        assert_eq!(select_mode(&cli(&["-o", "--plain"]), &config), OutputMode::Plain);
        assert_eq!(select_mode(&cli(&["--styled", "a", "b", "c"]), &config), OutputMode::Styled);

        let styled_config = Config {
            styled: true,
            ..Config::default()
        };
        assert_eq!(select_mode(&cli(&["a", "b", "c"]), &styled_config), OutputMode::Styled);
    }

    #[test]
    fn styled_and_plain_conflict() {
        assert!(Cli::try_parse_from(["itinerary", "--styled", "--plain"]).is_err());
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
