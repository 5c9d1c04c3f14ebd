//! CSV loading for the three input tables.
//!
//! Column presence is checked against the header before any row is read.
//! Rows shorter than the header are accepted; their missing trailing cells
//! load as `None`.

use crate::error::{ReconError, Table};
use crate::model::{PollingPlaceRecord, StateMapEntry, VoterRecord};

/// The state reference table shipped with the engine.
pub const BUNDLED_STATES_CSV: &str = include_str!("../data/states.csv");

pub const VOTER_COLUMNS: [&str; 6] = ["Street", "Apt", "City", "State", "Zip", "Precinct ID"];
pub const POLLING_COLUMNS: [&str; 5] = ["Street", "City", "State/ZIP", "Country", "Precinct"];
pub const STATE_COLUMNS: [&str; 2] = ["abbreviation", "state_name"];

/// A parsed row projected onto the required columns, plus its source line.
struct TableRow {
    line: u64,
    cells: Vec<Option<String>>,
}

fn read_table(table: Table, csv_data: &str, required: &[&str]) -> Result<Vec<TableRow>, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Csv { table, message: e.to_string() })?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let indices = required
        .iter()
        .map(|name| {
            headers.iter().position(|h| h == name).ok_or_else(|| ReconError::MissingColumn {
                table,
                column: (*name).into(),
            })
        })
        .collect::<Result<Vec<usize>, ReconError>>()?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| ReconError::Csv { table, message: e.to_string() })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let cells = indices
            .iter()
            .map(|&i| record.get(i).and_then(non_empty))
            .collect();
        rows.push(TableRow { line, cells });
    }

    log::debug!("{table}: loaded {} rows", rows.len());
    Ok(rows)
}

/// Trimmed, non-empty text or `None`.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn load_voters(csv_data: &str) -> Result<Vec<VoterRecord>, ReconError> {
    let rows = read_table(Table::Voter, csv_data, &VOTER_COLUMNS)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let mut cells = row.cells.into_iter();
            VoterRecord {
                street: cells.next().flatten(),
                apt: cells.next().flatten(),
                city: cells.next().flatten(),
                state: cells.next().flatten(),
                zip: cells.next().flatten(),
                precinct_id: cells.next().flatten(),
            }
        })
        .collect())
}

pub fn load_polling(csv_data: &str) -> Result<Vec<PollingPlaceRecord>, ReconError> {
    let rows = read_table(Table::Polling, csv_data, &POLLING_COLUMNS)?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let mut cells = row.cells.into_iter();
            PollingPlaceRecord {
                street: cells.next().flatten(),
                city: cells.next().flatten(),
                state_zip: cells.next().flatten(),
                country: cells.next().flatten(),
                precinct: cells.next().flatten(),
            }
        })
        .collect())
}

/// Load a state reference table. Unlike the data files, every reference row
/// must be complete.
pub fn load_states(csv_data: &str) -> Result<Vec<StateMapEntry>, ReconError> {
    let rows = read_table(Table::States, csv_data, &STATE_COLUMNS)?;
    rows.into_iter()
        .map(|row| {
            let line = row.line;
            let mut cells = row.cells.into_iter();
            let abbreviation = cells.next().flatten();
            let state_name = cells.next().flatten();
            match (abbreviation, state_name) {
                (Some(abbreviation), Some(state_name)) => Ok(StateMapEntry { abbreviation, state_name }),
                (None, _) => Err(ReconError::InvalidRow {
                    table: Table::States,
                    line,
                    message: "empty abbreviation".into(),
                }),
                (_, None) => Err(ReconError::InvalidRow {
                    table: Table::States,
                    line,
                    message: "empty state_name".into(),
                }),
            }
        })
        .collect()
}

pub fn bundled_states() -> Result<Vec<StateMapEntry>, ReconError> {
    load_states(BUNDLED_STATES_CSV)
}
