// addrmatch - match voter addresses to polling places via precinct
// Reads two CSV files, writes the joined report to stdout.

mod exit_codes;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use addrmatch_recon::loader::{bundled_states, load_polling, load_states, load_voters};
use addrmatch_recon::summary::build_report;
use addrmatch_recon::{MatchConfig, MatchInput, MatchSummary, ReconError};

use exit_codes::{
    recon_exit_code, EXIT_ERROR, EXIT_INPUT, EXIT_OUTPUT, EXIT_SUCCESS, EXIT_USAGE,
};

const MOUNT_HINT: &str = "when running in a container the file must be exposed via a volume";

#[derive(Parser)]
#[command(name = "addrmatch")]
#[command(about = "Matches voter addresses to polling places via precinct")]
#[command(long_version = long_version())]
#[command(version)]
#[command(after_help = "\
Voter rows with no polling place after normalization are kept and flagged \
requires_investigation=true. Polling places with no voter are dropped.

Examples:
  addrmatch voters.csv polling.csv > matched.csv
  addrmatch voters.csv polling.csv --states ref/states.csv
  addrmatch voters.csv polling.csv --config match.toml --report run.json
  RUST_LOG=debug addrmatch voters.csv polling.csv -q")]
struct Cli {
    /// The path to the voter address file
    voter_address_file: PathBuf,

    /// The path to the polling place file
    polling_place_file: PathBuf,

    /// State reference CSV (abbreviation,state_name); defaults to the bundled table
    #[arg(long, env = "ADDRMATCH_STATES")]
    states: Option<PathBuf>,

    /// TOML config file
    #[arg(long, env = "ADDRMATCH_CONFIG")]
    config: Option<PathBuf>,

    /// Write a JSON run report (metadata + summary) to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Suppress the stderr summary line
    #[arg(long, short = 'q')]
    quiet: bool,
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  addrmatch-recon ", env!("CARGO_PKG_VERSION"),
        "\nbuild:   ", env!("BUILD_PROFILE"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cmd_match(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn input(msg: impl Into<String>) -> Self {
        Self { code: EXIT_INPUT, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with the matching exit code.
    pub fn recon(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::PrecinctKeyCollision { .. } | ReconError::RowExpansion { .. } => {
                Some("fix the state reference table; no report was written".to_string())
            }
            ReconError::AmbiguousMatch { .. } => {
                Some("set on_ambiguous = \"expand\" to emit one row per polling place".to_string())
            }
            ReconError::MissingColumn { .. } => Some(
                "voter file needs Street,Apt,City,State,Zip,Precinct ID; \
                 polling file needs Street,City,State/ZIP,Country,Precinct"
                    .to_string(),
            ),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        Self::recon(err)
    }
}

// ============================================================================
// match
// ============================================================================

fn cmd_match(cli: Cli) -> Result<(), CliError> {
    // Fail fast on bad paths before reading anything.
    require_file(&cli.voter_address_file, "voter_address_file")?;
    require_file(&cli.polling_place_file, "polling_place_file")?;

    let config = match &cli.config {
        Some(path) => {
            require_file(path, "--config")?;
            MatchConfig::from_file(path)?
        }
        None => MatchConfig::default(),
    };

    let (states, states_source) = match (&cli.states, &config.states) {
        (Some(path), _) => {
            require_file(path, "--states")?;
            (load_states(&read_input(path)?)?, path.display().to_string())
        }
        (None, Some(path)) => {
            require_file(path, "states (config)")?;
            (load_states(&read_input(path)?)?, path.display().to_string())
        }
        (None, None) => (bundled_states()?, "bundled".to_string()),
    };
    log::debug!("state reference: {} entries from {}", states.len(), states_source);

    let input = MatchInput {
        voters: load_voters(&read_input(&cli.voter_address_file)?)?,
        polling: load_polling(&read_input(&cli.polling_place_file)?)?,
        states,
    };

    let result = addrmatch_recon::run(&config, input)?;
    let report = addrmatch_recon::project(&result.records, config.output.schema);

    // Nothing reaches stdout until the JSON report is on disk.
    let csv = report
        .to_csv_string(config.output.delimiter as u8)
        .map_err(|e| CliError::output(format!("cannot render report: {e}")))?;

    if let Some(path) = &cli.report {
        let run_report = build_report(
            result.summary.clone(),
            &cli.voter_address_file.display().to_string(),
            &cli.polling_place_file.display().to_string(),
            &states_source,
        );
        let json = serde_json::to_string_pretty(&run_report)
            .map_err(|e| CliError {
                code: EXIT_ERROR,
                message: format!("JSON serialization error: {e}"),
                hint: None,
            })?;
        std::fs::write(path, json)
            .map_err(|e| CliError::output(format!("cannot write {}: {e}", path.display())))?;
        if !cli.quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(csv.as_bytes())
        .and_then(|()| handle.flush())
        .map_err(|e| CliError::output(format!("cannot write report: {e}")))?;

    if !cli.quiet {
        print_summary(&result.summary);
    }

    Ok(())
}

fn require_file(path: &Path, arg: &str) -> Result<(), CliError> {
    if path.exists() {
        return Ok(());
    }
    Err(CliError::usage(format!(
        "provided {arg}, \"{}\" does not seem to exist",
        path.display()
    ))
    .with_hint(MOUNT_HINT))
}

fn read_input(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::input(format!("cannot read {}: {e}", path.display())))
}

fn print_summary(s: &MatchSummary) {
    eprintln!(
        "{} voter rows: {} matched, {} require investigation; {} polling rows ({} malformed, {} unresolved state), {} discarded",
        s.voter_rows,
        s.matched,
        s.requires_investigation,
        s.polling_rows,
        s.malformed_polling_rows,
        s.unresolved_polling_states,
        s.polling_only_discarded,
    );
    if s.ambiguous_voter_keys > 0 {
        eprintln!(
            "{} voter rows matched more than one polling place ({} output rows)",
            s.ambiguous_voter_keys, s.output_rows,
        );
    }
}
