use std::collections::{HashMap, HashSet};

use crate::error::ReconError;
use crate::model::{StateKey, StateMapEntry};

/// Lowercase and strip all whitespace: `"New York"` -> `"newyork"`.
pub fn normalize_state_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

fn prefix(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Derive a precinct key for every reference entry.
///
/// Positional tie-break: the first entry (in table order) holding a given
/// 3-character prefix keeps it; every later entry with the same 3-character
/// prefix takes its 4-character prefix instead. Final keys must be unique,
/// otherwise the polling join could fan out.
pub fn derive_state_keys(entries: &[StateMapEntry]) -> Result<Vec<StateKey>, ReconError> {
    let mut seen_prefix3: HashSet<String> = HashSet::new();
    let mut owners: HashMap<String, String> = HashMap::new();
    let mut keys = Vec::with_capacity(entries.len());

    for entry in entries {
        let normalized_name = normalize_state_name(&entry.state_name);
        let prefix3 = prefix(&normalized_name, 3);
        let prefix4 = prefix(&normalized_name, 4);

        let precinct_key = if seen_prefix3.insert(prefix3.clone()) {
            prefix3.clone()
        } else {
            prefix4.clone()
        };

        if let Some(first) = owners.get(&precinct_key) {
            return Err(ReconError::PrecinctKeyCollision {
                key: precinct_key,
                first: first.clone(),
                second: entry.state_name.clone(),
            });
        }
        owners.insert(precinct_key.clone(), entry.state_name.clone());

        keys.push(StateKey {
            abbreviation: entry.abbreviation.clone(),
            abbreviation_lower: entry.abbreviation.to_lowercase(),
            state_name: entry.state_name.clone(),
            normalized_name,
            prefix3,
            prefix4,
            precinct_key,
        });
    }

    log::debug!("derived {} state precinct keys", keys.len());
    Ok(keys)
}
