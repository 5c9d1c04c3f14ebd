use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ReconError;

/// Precinct value substituted into polling rows that have none.
pub const DEFAULT_MALFORMED_SENTINEL: &str = "malformed";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchConfig {
    /// State reference CSV. `None` uses the bundled table.
    #[serde(default)]
    pub states: Option<PathBuf>,
    #[serde(default = "default_sentinel")]
    pub malformed_sentinel: String,
    #[serde(default)]
    pub on_ambiguous: AmbiguityPolicy,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_sentinel() -> String {
    DEFAULT_MALFORMED_SENTINEL.into()
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            states: None,
            malformed_sentinel: default_sentinel(),
            on_ambiguous: AmbiguityPolicy::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Ambiguity
// ---------------------------------------------------------------------------

/// What to do when one voter key matches several polling places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityPolicy {
    /// Emit one output row per matching polling place.
    #[default]
    Expand,
    /// Fail the run.
    Error,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputSchema {
    /// The eleven published report columns.
    #[default]
    Standard,
    /// Standard plus `polling_state_zip` after `polling_state`.
    Extended,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub schema: OutputSchema,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_delimiter() -> char {
    ','
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            schema: OutputSchema::default(),
            delimiter: default_delimiter(),
        }
    }
}

impl MatchConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a config file. A relative `states` path is resolved
    /// against the config file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ReconError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| ReconError::ConfigParse(format!("cannot read {}: {e}", path.display())))?;
        let mut config = Self::from_toml(&input)?;
        if let Some(states) = config.states.take() {
            let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
            config.states = Some(if states.is_relative() {
                base_dir.join(states)
            } else {
                states
            });
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let sentinel = &self.malformed_sentinel;
        if sentinel.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "malformed_sentinel must not be empty".into(),
            ));
        }
        // A hyphen would let the sentinel split into a state code and precinct id.
        if sentinel.contains('-') {
            return Err(ReconError::ConfigValidation(format!(
                "malformed_sentinel must not contain '-', got \"{sentinel}\""
            )));
        }

        let delimiter = self.output.delimiter;
        if !delimiter.is_ascii() || delimiter == '"' || delimiter == '\n' || delimiter == '\r' {
            return Err(ReconError::ConfigValidation(format!(
                "output delimiter must be a single ASCII character other than quote or newline, got {delimiter:?}"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = MatchConfig::from_toml("").unwrap();
        assert!(config.states.is_none());
        assert_eq!(config.malformed_sentinel, "malformed");
        assert_eq!(config.on_ambiguous, AmbiguityPolicy::Expand);
        assert_eq!(config.output.schema, OutputSchema::Standard);
        assert_eq!(config.output.delimiter, ',');
    }

    #[test]
    fn parse_full_config() {
        let config = MatchConfig::from_toml(
            r#"
states = "ref/states.csv"
malformed_sentinel = "truncated"
on_ambiguous = "error"

[output]
schema = "extended"
delimiter = "|"
"#,
        )
        .unwrap();
        assert_eq!(config.states, Some(PathBuf::from("ref/states.csv")));
        assert_eq!(config.malformed_sentinel, "truncated");
        assert_eq!(config.on_ambiguous, AmbiguityPolicy::Error);
        assert_eq!(config.output.schema, OutputSchema::Extended);
        assert_eq!(config.output.delimiter, '|');
    }

    #[test]
    fn reject_hyphenated_sentinel() {
        let err = MatchConfig::from_toml(r#"malformed_sentinel = "malformed-malformed""#)
            .unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
        assert!(err.to_string().contains("'-'"));
    }

    #[test]
    fn reject_blank_sentinel() {
        let err = MatchConfig::from_toml(r#"malformed_sentinel = "  ""#).unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[test]
    fn reject_non_ascii_delimiter() {
        let err = MatchConfig::from_toml("[output]\ndelimiter = \"§\"\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigValidation(_)));
    }

    #[test]
    fn reject_unknown_key() {
        let err = MatchConfig::from_toml("way = 2\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn reject_unknown_schema() {
        let err = MatchConfig::from_toml("[output]\nschema = \"wide\"\n").unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }

    #[test]
    fn from_file_resolves_states_relative_to_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("match.toml");
        std::fs::write(&path, "states = \"states.csv\"\n").unwrap();

        let config = MatchConfig::from_file(&path).unwrap();
        assert_eq!(config.states, Some(dir.path().join("states.csv")));
    }

    #[test]
    fn from_file_missing_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = MatchConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
        assert!(err.to_string().contains("nope.toml"));
    }

    #[test]
    fn from_file_unreadable_is_config_error() {
        // A directory exists but cannot be read as a file.
        let dir = tempfile::tempdir().unwrap();
        let err = MatchConfig::from_file(dir.path()).unwrap_err();
        assert!(matches!(err, ReconError::ConfigParse(_)));
    }
}
