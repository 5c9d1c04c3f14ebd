use crate::model::{NormalizedVoter, VoterRecord};
use crate::polling::split_precinct;

/// Split each voter `Precinct ID` on its first hyphen and lowercase the
/// free-form state for joining. Pure per-row transform.
pub fn normalize_voters(rows: Vec<VoterRecord>) -> Vec<NormalizedVoter> {
    rows.into_iter()
        .map(|record| {
            let (state_id, precinct_id) = match record.precinct_id.as_deref() {
                Some(code) => {
                    let (prefix, id) = split_precinct(code);
                    (Some(prefix).filter(|p| !p.is_empty()), id)
                }
                None => (None, None),
            };
            NormalizedVoter {
                state_lower: record.state.as_deref().map(str::to_lowercase),
                state_id,
                precinct_id,
                record,
            }
        })
        .collect()
}
