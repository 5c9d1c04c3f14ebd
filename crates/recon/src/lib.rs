//! `addrmatch-recon` — voter address to polling place matching engine.
//!
//! Engine crate: receives pre-loaded tables, returns matched records and a
//! run summary. The only file-system access is `MatchConfig::from_file`;
//! table loading works on in-memory CSV text.

pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod malformed;
pub mod matcher;
pub mod model;
pub mod output;
pub mod polling;
pub mod state_key;
pub mod summary;
pub mod voter;

pub use config::{AmbiguityPolicy, MatchConfig, OutputSchema};
pub use engine::run;
pub use error::{ReconError, Table};
pub use model::{MatchInput, MatchResult, MatchSummary, MatchedRecord, RunReport};
pub use output::{project, Report};
