use std::collections::HashMap;

use crate::config::AmbiguityPolicy;
use crate::error::ReconError;
use crate::model::{MatchedRecord, NormalizedPolling, NormalizedVoter, Provenance};

/// Composite join key: (lowercased state, precinct id).
type JoinKey<'a> = (&'a str, &'a str);

/// One row of the full outer join, borrowed from its inputs.
#[derive(Debug)]
pub struct JoinedRow<'a> {
    pub voter: Option<&'a NormalizedVoter>,
    pub polling: Option<&'a NormalizedPolling>,
    pub provenance: Provenance,
}

#[derive(Debug)]
pub struct OuterJoin<'a> {
    pub rows: Vec<JoinedRow<'a>>,
    /// Voter keys that matched more than one polling row.
    pub ambiguous_keys: usize,
}

fn voter_key(v: &NormalizedVoter) -> Option<JoinKey<'_>> {
    Some((v.state_lower.as_deref()?, v.precinct_id.as_deref()?))
}

fn polling_key(p: &NormalizedPolling) -> Option<JoinKey<'_>> {
    Some((p.resolved_state.as_deref()?, p.precinct_id.as_deref()?))
}

/// Full outer join of voters and polling places on (state, precinct id),
/// tagging every row with its provenance.
///
/// Rows missing either half of the key never match anything. Voter rows
/// come first in input order (a voter matching several polling rows emits
/// them in polling order), followed by the polling-only rows.
pub fn outer_join<'a>(
    voters: &'a [NormalizedVoter],
    polling: &'a [NormalizedPolling],
    on_ambiguous: AmbiguityPolicy,
) -> Result<OuterJoin<'a>, ReconError> {
    let mut index: HashMap<JoinKey<'a>, Vec<usize>> = HashMap::new();
    for (i, p) in polling.iter().enumerate() {
        if let Some(key) = polling_key(p) {
            index.entry(key).or_default().push(i);
        }
    }

    let mut used = vec![false; polling.len()];
    let mut rows = Vec::with_capacity(voters.len());
    let mut ambiguous_keys = 0usize;

    for v in voters {
        let hits = voter_key(v).and_then(|key| index.get(&key).map(|hits| (key, hits)));
        match hits {
            Some(((state, precinct_id), hits)) => {
                if hits.len() > 1 {
                    if on_ambiguous == AmbiguityPolicy::Error {
                        return Err(ReconError::AmbiguousMatch {
                            state: state.to_string(),
                            precinct_id: precinct_id.to_string(),
                            candidates: hits.len(),
                        });
                    }
                    ambiguous_keys += 1;
                }
                for &i in hits {
                    used[i] = true;
                    rows.push(JoinedRow {
                        voter: Some(v),
                        polling: Some(&polling[i]),
                        provenance: Provenance::Both,
                    });
                }
            }
            None => rows.push(JoinedRow {
                voter: Some(v),
                polling: None,
                provenance: Provenance::VoterOnly,
            }),
        }
    }

    for (i, p) in polling.iter().enumerate() {
        if !used[i] {
            rows.push(JoinedRow {
                voter: None,
                polling: Some(p),
                provenance: Provenance::PollingOnly,
            });
        }
    }

    if ambiguous_keys > 0 {
        log::warn!("{ambiguous_keys} voter rows matched more than one polling place");
    }
    Ok(OuterJoin { rows, ambiguous_keys })
}

/// Drop polling-only rows, flag voter-only rows for investigation, and
/// restore the voter state to upper case.
pub fn flag_matches(joined: &OuterJoin<'_>) -> Vec<MatchedRecord> {
    joined
        .rows
        .iter()
        .filter_map(|row| {
            let voter = row.voter?;
            let mut record = voter.record.clone();
            record.state = voter.state_lower.as_deref().map(str::to_uppercase);

            Some(MatchedRecord {
                voter: record,
                polling: row.polling.map(|p| p.record.clone()),
                polling_precinct_id: row.polling.and_then(|p| p.precinct_id.clone()),
                provenance: row.provenance,
                requires_investigation: row.provenance == Provenance::VoterOnly,
            })
        })
        .collect()
}
