use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// Config file unreadable, or TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad sentinel, bad delimiter, etc.).
    ConfigValidation(String),
    /// Missing required column in an input table header.
    MissingColumn { table: Table, column: String },
    /// CSV reader error (bad quoting, invalid UTF-8, unreadable header).
    Csv { table: Table, message: String },
    /// A row that cannot be used at all (state reference rows only).
    InvalidRow { table: Table, line: u64, message: String },
    /// Two state reference entries resolved to the same precinct key.
    PrecinctKeyCollision { key: String, first: String, second: String },
    /// A join that must preserve row count changed it.
    RowExpansion { join: &'static str, before: usize, after: usize },
    /// A voter key matched more than one polling place and expansion is refused.
    AmbiguousMatch { state: String, precinct_id: String, candidates: usize },
    /// IO error (file read, output write).
    Io(String),
}

impl ReconError {
    /// Reference-data integrity failures. These are never recoverable per row.
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::PrecinctKeyCollision { .. } | Self::RowExpansion { .. })
    }
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { table, column } => {
                write!(f, "{table}: missing column '{column}'")
            }
            Self::Csv { table, message } => write!(f, "{table}: {message}"),
            Self::InvalidRow { table, line, message } => {
                write!(f, "{table}, line {line}: {message}")
            }
            Self::PrecinctKeyCollision { key, first, second } => write!(
                f,
                "state reference integrity: '{first}' and '{second}' both resolve to precinct key '{key}'"
            ),
            Self::RowExpansion { join, before, after } => write!(
                f,
                "integrity assertion failed: {join} join changed row count from {before} to {after}"
            ),
            Self::AmbiguousMatch { state, precinct_id, candidates } => write!(
                f,
                "voter key ({state}, {precinct_id}) matches {candidates} polling places"
            ),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}

/// The three input tables, used to label loader errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Voter,
    Polling,
    States,
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Voter => write!(f, "voter address file"),
            Self::Polling => write!(f, "polling place file"),
            Self::States => write!(f, "state reference table"),
        }
    }
}
