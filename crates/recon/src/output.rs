//! Report projection and CSV serialization.
//!
//! The column lists below are the published report contract. Downstream
//! consumers key on these names and this order.

use std::io::Write;

use crate::config::OutputSchema;
use crate::error::ReconError;
use crate::model::MatchedRecord;

pub const STANDARD_COLUMNS: [&str; 11] = [
    "voter_street",
    "voter_apt",
    "voter_city",
    "voter_state",
    "voter_zip",
    "polling_street",
    "polling_city",
    "polling_state",
    "polling_country",
    "polling_precinct_id",
    "requires_investigation",
];

pub const EXTENDED_COLUMNS: [&str; 12] = [
    "voter_street",
    "voter_apt",
    "voter_city",
    "voter_state",
    "voter_zip",
    "polling_street",
    "polling_city",
    "polling_state",
    "polling_state_zip",
    "polling_country",
    "polling_precinct_id",
    "requires_investigation",
];

impl OutputSchema {
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Self::Standard => &STANDARD_COLUMNS,
            Self::Extended => &EXTENDED_COLUMNS,
        }
    }
}

/// One report row. Absent values serialize as empty cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow {
    pub voter_street: Option<String>,
    pub voter_apt: Option<String>,
    pub voter_city: Option<String>,
    pub voter_state: Option<String>,
    pub voter_zip: Option<String>,
    pub polling_street: Option<String>,
    pub polling_city: Option<String>,
    pub polling_state: Option<String>,
    pub polling_state_zip: Option<String>,
    pub polling_country: Option<String>,
    pub polling_precinct_id: Option<String>,
    pub requires_investigation: bool,
}

impl OutputRow {
    fn cells(&self, schema: OutputSchema) -> Vec<&str> {
        fn text(v: &Option<String>) -> &str {
            v.as_deref().unwrap_or("")
        }
        let flag = if self.requires_investigation { "true" } else { "false" };

        let mut cells = vec![
            text(&self.voter_street),
            text(&self.voter_apt),
            text(&self.voter_city),
            text(&self.voter_state),
            text(&self.voter_zip),
            text(&self.polling_street),
            text(&self.polling_city),
            text(&self.polling_state),
        ];
        if schema == OutputSchema::Extended {
            cells.push(text(&self.polling_state_zip));
        }
        cells.extend([
            text(&self.polling_country),
            text(&self.polling_precinct_id),
            flag,
        ]);
        cells
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub schema: OutputSchema,
    pub rows: Vec<OutputRow>,
}

impl Report {
    pub fn columns(&self) -> &'static [&'static str] {
        self.schema.columns()
    }

    /// Write the report as delimited text with a header row.
    pub fn write_csv<W: Write>(&self, writer: W, delimiter: u8) -> Result<(), ReconError> {
        let mut out = csv::WriterBuilder::new().delimiter(delimiter).from_writer(writer);
        out.write_record(self.columns())
            .map_err(|e| ReconError::Io(e.to_string()))?;
        for row in &self.rows {
            out.write_record(row.cells(self.schema))
                .map_err(|e| ReconError::Io(e.to_string()))?;
        }
        out.flush().map_err(|e| ReconError::Io(e.to_string()))?;
        Ok(())
    }

    pub fn to_csv_string(&self, delimiter: u8) -> Result<String, ReconError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf, delimiter)?;
        String::from_utf8(buf).map_err(|e| ReconError::Io(e.to_string()))
    }
}

/// Select and rename the report columns. No computation happens here.
pub fn project(records: &[MatchedRecord], schema: OutputSchema) -> Report {
    let rows = records
        .iter()
        .map(|r| {
            let polling = r.polling.as_ref();
            OutputRow {
                voter_street: r.voter.street.clone(),
                voter_apt: r.voter.apt.clone(),
                voter_city: r.voter.city.clone(),
                voter_state: r.voter.state.clone(),
                voter_zip: r.voter.zip.clone(),
                polling_street: polling.and_then(|p| p.street.clone()),
                polling_city: polling.and_then(|p| p.city.clone()),
                polling_state: polling
                    .and_then(|p| p.state_abbreviation.as_deref())
                    .map(str::to_uppercase),
                polling_state_zip: polling.and_then(|p| p.zip.clone()),
                polling_country: polling.and_then(|p| p.country.clone()),
                polling_precinct_id: r.polling_precinct_id.clone(),
                requires_investigation: r.requires_investigation,
            }
        })
        .collect();

    Report { schema, rows }
}
