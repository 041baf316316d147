mod config;
mod outline;

use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use strider_core::{Conversion, ConvertError, FileSystemProvider};
use tracing::{debug, Level};

use config::{Overrides, Settings};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Structural source-to-frame converter.
#[derive(Parser)]
#[command(
    name = "strider",
    version,
    about = "Convert Java-like source into frame-editor code elements"
)]
struct Cli {
    /// Output format (text or json); defaults per command
    #[arg(long, global = true, value_enum)]
    output: Option<OutputFormat>,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Config file (default: ./strider.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Exit with status 2 when any file produced warnings
    #[arg(long, global = true)]
    deny_warnings: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert source files and print their code elements
    Convert {
        /// Source files to convert
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Wrap documentation comments at this width
        #[arg(long)]
        comment_width: Option<usize>,
    },

    /// Convert source files and report only their warnings
    Check {
        /// Source files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let (default_format, comment_width) = match &cli.command {
        Commands::Convert { comment_width, .. } => (OutputFormat::Json, *comment_width),
        Commands::Check { .. } => (OutputFormat::Text, None),
    };
    let overrides = Overrides {
        output: cli.output,
        quiet: cli.quiet,
        verbose: cli.verbose,
        deny_warnings: cli.deny_warnings,
        comment_width,
    };
    let settings = match config::load(cli.config.as_deref())
        .and_then(|config| Settings::resolve(config, overrides, default_format))
    {
        Ok(settings) => settings,
        Err(msg) => {
            report_error(&msg, cli.output.unwrap_or(default_format), cli.quiet);
            process::exit(1);
        }
    };
    init_tracing(settings.level);

    let code = match &cli.command {
        Commands::Convert { files, .. } => cmd_convert(files, &settings),
        Commands::Check { files } => cmd_check(files, &settings),
    };
    process::exit(code);
}

fn init_tracing(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

/// One converted file in multi-file JSON output.
#[derive(Serialize)]
struct FileReport<'a> {
    file: String,
    #[serde(flatten)]
    conversion: &'a Conversion,
}

#[derive(Serialize)]
struct FileWarnings<'a> {
    file: String,
    warnings: &'a [String],
}

/// Convert every file, keeping going after failures.
fn convert_all(files: &[PathBuf], settings: &Settings) -> (Vec<(PathBuf, Conversion)>, bool) {
    let mut converted = Vec::new();
    let mut failed = false;
    for file in files {
        debug!(file = %file.display(), "converting");
        match strider_core::convert_file(file, &FileSystemProvider, &settings.options) {
            Ok(conversion) => converted.push((file.clone(), conversion)),
            Err(e) => {
                report_convert_error(file, &e, settings);
                failed = true;
            }
        }
    }
    (converted, failed)
}

fn cmd_convert(files: &[PathBuf], settings: &Settings) -> i32 {
    let (converted, failed) = convert_all(files, settings);
    match settings.format {
        OutputFormat::Json => {
            let rendered = if files.len() == 1 {
                converted
                    .first()
                    .map(|(_, conversion)| to_json(conversion, settings.pretty))
            } else {
                let reports: Vec<FileReport> = converted
                    .iter()
                    .map(|(file, conversion)| FileReport {
                        file: file.display().to_string(),
                        conversion,
                    })
                    .collect();
                Some(to_json(&reports, settings.pretty))
            };
            if let Some(text) = rendered {
                println!("{}", text);
            }
        }
        OutputFormat::Text => {
            for (file, conversion) in &converted {
                if files.len() > 1 {
                    println!("== {} ==", file.display());
                }
                print!("{}", outline::render(&conversion.elements));
                if !settings.quiet {
                    for warning in &conversion.warnings {
                        eprintln!("warning: {}: {}", file.display(), warning);
                    }
                }
            }
        }
    }
    exit_code(failed, has_warnings(&converted), settings.deny_warnings)
}

fn cmd_check(files: &[PathBuf], settings: &Settings) -> i32 {
    let (converted, failed) = convert_all(files, settings);
    match settings.format {
        OutputFormat::Json => {
            let reports: Vec<FileWarnings> = converted
                .iter()
                .map(|(file, conversion)| FileWarnings {
                    file: file.display().to_string(),
                    warnings: &conversion.warnings,
                })
                .collect();
            println!("{}", to_json(&reports, settings.pretty));
        }
        OutputFormat::Text => {
            for (file, conversion) in &converted {
                for warning in &conversion.warnings {
                    println!("{}: {}", file.display(), warning);
                }
                if conversion.warnings.is_empty() && !settings.quiet {
                    println!("{}: ok", file.display());
                }
            }
        }
    }
    exit_code(failed, has_warnings(&converted), settings.deny_warnings)
}

fn has_warnings(converted: &[(PathBuf, Conversion)]) -> bool {
    converted.iter().any(|(_, c)| !c.warnings.is_empty())
}

fn exit_code(failed: bool, warned: bool, deny_warnings: bool) -> i32 {
    if failed {
        1
    } else if warned && deny_warnings {
        2
    } else {
        0
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> String {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    result.unwrap_or_else(|e| format!("{{\"error\": \"serialization error: {}\"}}", e))
}

fn report_convert_error(file: &Path, e: &ConvertError, settings: &Settings) {
    match settings.format {
        OutputFormat::Json => {
            let mut value = e.to_json_value();
            value["file"] = serde_json::Value::String(file.display().to_string());
            eprintln!("{}", to_json(&value, settings.pretty));
        }
        OutputFormat::Text => {
            if !settings.quiet {
                eprintln!("error: {}: {}", file.display(), e);
            }
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("error: {}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
