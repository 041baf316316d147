//! `strider.toml` loading and resolution of effective settings.
//!
//! Command-line flags always win over file values, which win over the
//! built-in defaults.

use std::path::Path;

use serde::Deserialize;
use strider_core::ConvertOptions;
use tracing::Level;

use crate::OutputFormat;

/// Looked up in the working directory when `--config` is not given.
pub(crate) const DEFAULT_CONFIG: &str = "strider.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    pub convert: ConvertOptions,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub pretty: Option<bool>,
    pub deny_warnings: bool,
    pub log_level: Option<String>,
}

/// Load the explicit config file, or `strider.toml` if one exists.
pub(crate) fn load(explicit: Option<&Path>) -> Result<Config, String> {
    match explicit {
        Some(path) => read(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG);
            if path.is_file() {
                read(path)
            } else {
                Ok(Config::default())
            }
        }
    }
}

fn read(path: &Path) -> Result<Config, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read config '{}': {}", path.display(), e))?;
    parse(&text).map_err(|e| format!("invalid config '{}': {}", path.display(), e))
}

pub(crate) fn parse(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

/// Values given on the command line.
#[derive(Debug, Default)]
pub(crate) struct Overrides {
    pub output: Option<OutputFormat>,
    pub quiet: bool,
    pub verbose: u8,
    pub deny_warnings: bool,
    pub comment_width: Option<usize>,
}

/// The settings a command runs with.
#[derive(Debug)]
pub(crate) struct Settings {
    pub format: OutputFormat,
    pub pretty: bool,
    pub quiet: bool,
    pub deny_warnings: bool,
    pub level: Level,
    pub options: ConvertOptions,
}

impl Settings {
    pub(crate) fn resolve(
        config: Config,
        cli: Overrides,
        default_format: OutputFormat,
    ) -> Result<Settings, String> {
        let level = if cli.quiet {
            Level::ERROR
        } else {
            match cli.verbose {
                0 => match &config.output.log_level {
                    Some(name) => name
                        .parse::<Level>()
                        .map_err(|_| format!("invalid log_level '{}' in config", name))?,
                    None => Level::WARN,
                },
                1 => Level::DEBUG,
                _ => Level::TRACE,
            }
        };

        let mut options = config.convert;
        if cli.comment_width.is_some() {
            options.comment_width = cli.comment_width;
        }

        Ok(Settings {
            format: cli.output.or(config.output.format).unwrap_or(default_format),
            pretty: config.output.pretty.unwrap_or(true),
            quiet: cli.quiet,
            deny_warnings: cli.deny_warnings || config.output.deny_warnings,
            level,
            options,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let config = parse(
            r#"
            [convert]
            comment_width = 72

            [output]
            format = "text"
            pretty = false
            deny_warnings = true
            log_level = "debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.convert.comment_width, Some(72));
        assert_eq!(config.output.format, Some(OutputFormat::Text));
        assert_eq!(config.output.pretty, Some(false));
        assert!(config.output.deny_warnings);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(parse("[convert]\nwidth = 3\n").is_err());
        assert!(parse("[logging]\nlevel = \"x\"\n").is_err());
    }

    #[test]
    fn flags_override_file_values() {
        let config = parse("[convert]\ncomment_width = 72\n[output]\nformat = \"text\"\n").unwrap();
        let settings = Settings::resolve(
            config,
            Overrides {
                output: Some(OutputFormat::Json),
                comment_width: Some(40),
                ..Default::default()
            },
            OutputFormat::Text,
        )
        .unwrap();
        assert_eq!(settings.format, OutputFormat::Json);
        assert_eq!(settings.options.comment_width, Some(40));
        assert!(settings.pretty);
        assert_eq!(settings.level, Level::WARN);
    }

    #[test]
    fn command_default_applies_without_file_or_flag() {
        let settings =
            Settings::resolve(Config::default(), Overrides::default(), OutputFormat::Json).unwrap();
        assert_eq!(settings.format, OutputFormat::Json);
        assert!(!settings.deny_warnings);
    }

    #[test]
    fn verbosity_and_quiet_pick_the_level() {
        let level = |quiet, verbose| {
            Settings::resolve(
                Config::default(),
                Overrides {
                    quiet,
                    verbose,
                    ..Default::default()
                },
                OutputFormat::Text,
            )
            .unwrap()
            .level
        };
        assert_eq!(level(false, 1), Level::DEBUG);
        assert_eq!(level(false, 3), Level::TRACE);
        assert_eq!(level(true, 2), Level::ERROR);
    }

    #[test]
    fn bad_log_level_is_reported() {
        let config = parse("[output]\nlog_level = \"loud\"\n").unwrap();
        let err =
            Settings::resolve(config, Overrides::default(), OutputFormat::Text).unwrap_err();
        assert!(err.contains("loud"));
    }
}
