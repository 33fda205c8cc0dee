use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Lint configuration version understood by this binary.
const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Shape of the lint report written to standard output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OutputFormat {
    /// One human-readable line per record.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// Values read from a TOML lint configuration file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LintConfig {
    version: u32,
    parallel: Option<bool>,
    deny_warnings: Option<bool>,
    format: Option<OutputFormat>,
}

/// Effective settings after merging command-line flags over the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Settings {
    pub(crate) parallel: bool,
    pub(crate) deny_warnings: bool,
    pub(crate) format: OutputFormat,
}

impl LintConfig {
    /// Reads and validates the configuration at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read lint config at {}", path.display()))?;
        parse(&contents).with_context(|| format!("invalid lint config at {}", path.display()))
    }

    /// Merges flags over the file values; a flag that is set always wins.
    pub(crate) fn resolve(
        config: Option<&Self>,
        parallel: bool,
        deny_warnings: bool,
        format: Option<OutputFormat>,
    ) -> Settings {
        let file = config.cloned().unwrap_or_default();
        Settings {
            parallel: parallel || file.parallel.unwrap_or(false),
            deny_warnings: deny_warnings || file.deny_warnings.unwrap_or(false),
            format: format.or(file.format).unwrap_or_default(),
        }
    }
}

fn parse(contents: &str) -> Result<LintConfig> {
    let config: LintConfig =
        toml::from_str(contents).context("failed to parse lint config toml contents")?;
    if config.version != SUPPORTED_CONFIG_VERSION {
        bail!(
            "unsupported lint config version {}; expected {}",
            config.version,
            SUPPORTED_CONFIG_VERSION
        );
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reads_every_field() {
        let config = parse(
            r#"
            version = 1
            parallel = true
            deny_warnings = true
            format = "json"
        "#,
        )
        .expect("config should parse");

        let settings = LintConfig::resolve(Some(&config), false, false, None);
        assert_eq!(
            settings,
            Settings {
                parallel: true,
                deny_warnings: true,
                format: OutputFormat::Json,
            }
        );
    }

    #[test]
    fn parse_rejects_other_versions() {
        let result = parse("version = 2\n");
        assert!(result.is_err(), "version 2 must be rejected");
    }

    #[test]
    fn parse_rejects_unknown_keys() {
        let result = parse("version = 1\ncolour = true\n");
        assert!(result.is_err(), "unknown keys must be rejected");
    }

    #[test]
    fn parse_requires_a_version() {
        let result = parse("parallel = true\n");
        assert!(result.is_err(), "missing version must be rejected");
    }

    #[test]
    fn flags_take_precedence_over_the_file() {
        let config = parse("version = 1\nformat = \"json\"\n").expect("config should parse");

        let settings = LintConfig::resolve(Some(&config), true, false, Some(OutputFormat::Text));
        assert!(settings.parallel);
        assert!(!settings.deny_warnings);
        assert_eq!(settings.format, OutputFormat::Text);
    }

    #[test]
    fn defaults_apply_without_a_file() {
        assert_eq!(
            LintConfig::resolve(None, false, false, None),
            Settings::default()
        );
    }
}
