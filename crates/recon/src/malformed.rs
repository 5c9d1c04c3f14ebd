use crate::loader::non_empty;
use crate::model::{FilteredPolling, PollingPlaceRecord};

/// Substitute `sentinel` for missing or blank precincts and split `State/ZIP` on the
/// remaining rows. Row count and order are preserved.
///
/// Truncated rows are kept for auditing but rendered unmatchable: the
/// sentinel carries no hyphen, so it never yields a precinct id.
pub fn filter_malformed(rows: Vec<PollingPlaceRecord>, sentinel: &str) -> Vec<FilteredPolling> {
    let mut malformed = 0usize;

    let filtered: Vec<FilteredPolling> = rows
        .into_iter()
        .map(|row| match row.precinct {
            Some(precinct) if !precinct.trim().is_empty() => {
                let (state_abbreviation, zip) = split_state_zip(row.state_zip.as_deref());
                FilteredPolling {
                    street: row.street,
                    city: row.city,
                    country: row.country,
                    state_abbreviation,
                    zip,
                    precinct,
                    malformed: false,
                }
            }
            _ => {
                malformed += 1;
                FilteredPolling {
                    street: row.street,
                    city: row.city,
                    country: row.country,
                    state_abbreviation: None,
                    zip: None,
                    precinct: sentinel.to_string(),
                    malformed: true,
                }
            }
        })
        .collect();

    if malformed > 0 {
        log::warn!("{malformed} polling place rows have no precinct; marked \"{sentinel}\"");
    }
    filtered
}

/// Split on the first run of whitespace: `"WA 98101"` -> `("WA", "98101")`.
fn split_state_zip(value: Option<&str>) -> (Option<String>, Option<String>) {
    let Some(value) = value else {
        return (None, None);
    };
    match value.split_once(char::is_whitespace) {
        Some((state, zip)) => (non_empty(state), non_empty(zip)),
        None => (non_empty(value), None),
    }
}
