use std::collections::HashMap;

use crate::error::ReconError;
use crate::loader::non_empty;
use crate::model::{FilteredPolling, NormalizedPolling, StateKey};

/// Split a precinct code on its first hyphen.
///
/// `"was-0012"` -> `("was", Some("0012"))`; a code without a hyphen (the
/// malformed sentinel included) has no precinct id.
pub fn split_precinct(code: &str) -> (String, Option<String>) {
    match code.split_once('-') {
        Some((prefix, id)) => (prefix.trim().to_string(), non_empty(id)),
        None => (code.trim().to_string(), None),
    }
}

/// Split each polling precinct and left-join its state code against the
/// derived precinct keys to recover the canonical state abbreviation.
///
/// The join must be row preserving. If `keys` holds duplicate precinct keys
/// and a polling row hits one, the output would grow; that is reported as
/// `RowExpansion` and nothing is returned.
pub fn normalize_polling(
    rows: Vec<FilteredPolling>,
    keys: &[StateKey],
) -> Result<Vec<NormalizedPolling>, ReconError> {
    let mut by_key: HashMap<&str, Vec<&StateKey>> = HashMap::new();
    for key in keys {
        by_key.entry(key.precinct_key.as_str()).or_default().push(key);
    }

    let before = rows.len();
    let mut joined = Vec::with_capacity(before);
    let mut unresolved = 0usize;

    for record in rows {
        let (prefix, precinct_id) = split_precinct(&record.precinct);
        let state_code = prefix.to_lowercase();

        match by_key.get(state_code.as_str()) {
            Some(matches) => {
                for key in matches {
                    joined.push(NormalizedPolling {
                        record: record.clone(),
                        state_code: state_code.clone(),
                        precinct_id: precinct_id.clone(),
                        resolved_state: Some(key.abbreviation_lower.clone()),
                    });
                }
            }
            None => {
                if !record.malformed {
                    unresolved += 1;
                }
                joined.push(NormalizedPolling {
                    record,
                    state_code,
                    precinct_id,
                    resolved_state: None,
                });
            }
        }
    }

    if joined.len() != before {
        return Err(ReconError::RowExpansion {
            join: "polling place to state reference",
            before,
            after: joined.len(),
        });
    }

    if unresolved > 0 {
        log::warn!("{unresolved} polling place rows have a state code with no precinct key");
    }
    log::debug!("normalized {} polling place rows", joined.len());
    Ok(joined)
}
