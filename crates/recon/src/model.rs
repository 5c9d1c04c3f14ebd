use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row of the voter address file. Absent cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoterRecord {
    pub street: Option<String>,
    pub apt: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    /// Raw `Precinct ID`, formatted `<state-id>-<precinct-id>`.
    pub precinct_id: Option<String>,
}

/// One row of the polling place file.
///
/// Truncated rows arrive with trailing fields missing; `precinct` is the
/// field that decides whether the row is malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollingPlaceRecord {
    pub street: Option<String>,
    pub city: Option<String>,
    /// Combined `State/ZIP`, space separated.
    pub state_zip: Option<String>,
    pub country: Option<String>,
    /// Raw `Precinct`, formatted `<state-code>-<precinct-id>`.
    pub precinct: Option<String>,
}

/// One row of the state reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMapEntry {
    pub abbreviation: String,
    pub state_name: String,
}

/// Fully loaded tables for one run.
#[derive(Debug, Clone, Default)]
pub struct MatchInput {
    pub voters: Vec<VoterRecord>,
    pub polling: Vec<PollingPlaceRecord>,
    pub states: Vec<StateMapEntry>,
}

// ---------------------------------------------------------------------------
// Stage outputs
// ---------------------------------------------------------------------------

/// Polling row after the malformation filter. `precinct` is never absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredPolling {
    pub street: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    /// State half of `State/ZIP` (well-formed rows only).
    pub state_abbreviation: Option<String>,
    /// Zip half of `State/ZIP` (well-formed rows only).
    pub zip: Option<String>,
    pub precinct: String,
    pub malformed: bool,
}

/// State reference entry with its derived precinct key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateKey {
    /// Original abbreviation as it appears in the reference table.
    pub abbreviation: String,
    pub abbreviation_lower: String,
    pub state_name: String,
    /// Lowercased, whitespace stripped.
    pub normalized_name: String,
    pub prefix3: String,
    pub prefix4: String,
    /// Resolved key: `prefix3` for the first holder, `prefix4` otherwise.
    pub precinct_key: String,
}

/// Polling row with its precinct split and its state code resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedPolling {
    pub record: FilteredPolling,
    /// Lowercased state-code fragment of `precinct`.
    pub state_code: String,
    pub precinct_id: Option<String>,
    /// Lowercased canonical abbreviation, `None` when no precinct key matched.
    pub resolved_state: Option<String>,
}

/// Voter row with its precinct split and state lowercased for joining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedVoter {
    pub record: VoterRecord,
    pub state_lower: Option<String>,
    pub state_id: Option<String>,
    pub precinct_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Which side(s) of the outer join a row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    Both,
    VoterOnly,
    PollingOnly,
}

/// A voter row joined to at most one polling row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedRecord {
    /// Voter fields, `state` restored to upper case.
    pub voter: VoterRecord,
    pub polling: Option<FilteredPolling>,
    pub polling_precinct_id: Option<String>,
    pub provenance: Provenance,
    pub requires_investigation: bool,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchSummary {
    pub voter_rows: usize,
    pub polling_rows: usize,
    pub malformed_polling_rows: usize,
    pub unresolved_polling_states: usize,
    pub matched: usize,
    pub requires_investigation: usize,
    pub polling_only_discarded: usize,
    pub ambiguous_voter_keys: usize,
    pub output_rows: usize,
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub records: Vec<MatchedRecord>,
    pub summary: MatchSummary,
}

/// Where each table of a run came from, for the JSON report.
#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub run_at: String,
    pub voter_file: String,
    pub polling_file: String,
    pub states_source: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub meta: RunMeta,
    pub summary: MatchSummary,
}
