//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                   |
//! |------|-----------------------------------------------------------|
//! | 0    | Success                                                   |
//! | 1    | General error (unspecified)                               |
//! | 2    | Usage error (bad args, missing input file, bad config)    |
//! | 3    | Input table unreadable or missing a required column       |
//! | 4    | State reference integrity violation                       |
//! | 5    | Ambiguous voter match refused by `on_ambiguous = "error"` |
//! | 6    | Report could not be written                               |

use addrmatch_recon::ReconError;

/// Success - every voter row was emitted (matched or flagged).
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing input file, invalid config.
pub const EXIT_USAGE: u8 = 2;

/// Input CSV could not be parsed or lacks a required column.
pub const EXIT_INPUT: u8 = 3;

/// Precinct keys collide or the state join changed the polling row count.
pub const EXIT_INTEGRITY: u8 = 4;

/// A voter key matched several polling places and expansion is disabled.
pub const EXIT_AMBIGUOUS: u8 = 5;

/// Writing the CSV report or the JSON run report failed.
pub const EXIT_OUTPUT: u8 = 6;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_USAGE,
        ReconError::MissingColumn { .. }
        | ReconError::Csv { .. }
        | ReconError::InvalidRow { .. } => EXIT_INPUT,
        ReconError::PrecinctKeyCollision { .. } | ReconError::RowExpansion { .. } => EXIT_INTEGRITY,
        ReconError::AmbiguousMatch { .. } => EXIT_AMBIGUOUS,
        ReconError::Io(_) => EXIT_ERROR,
    }
}
