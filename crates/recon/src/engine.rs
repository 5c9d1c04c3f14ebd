use crate::config::MatchConfig;
use crate::error::ReconError;
use crate::malformed::filter_malformed;
use crate::matcher::{flag_matches, outer_join};
use crate::model::{MatchInput, MatchResult};
use crate::polling::normalize_polling;
use crate::state_key::derive_state_keys;
use crate::summary::compute_summary;
use crate::voter::normalize_voters;

/// Run the matching pipeline over fully loaded tables.
///
/// Stages run in a fixed order; any integrity failure aborts the run with
/// no partial result.
pub fn run(config: &MatchConfig, input: MatchInput) -> Result<MatchResult, ReconError> {
    let MatchInput { voters, polling, states } = input;
    let voter_rows = voters.len();

    let filtered = filter_malformed(polling, &config.malformed_sentinel);
    let keys = derive_state_keys(&states)?;
    let polling = normalize_polling(filtered, &keys)?;
    let voters = normalize_voters(voters);

    let joined = outer_join(&voters, &polling, config.on_ambiguous)?;
    let records = flag_matches(&joined);
    let summary = compute_summary(voter_rows, &polling, &joined, &records);

    if summary.polling_only_discarded > 0 {
        log::warn!(
            "discarded {} polling place rows with no matching voter",
            summary.polling_only_discarded
        );
    }
    log::debug!(
        "matched {} voter rows, {} require investigation",
        summary.matched,
        summary.requires_investigation
    );

    Ok(MatchResult { records, summary })
}
