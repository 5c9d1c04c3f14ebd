use crate::matcher::OuterJoin;
use crate::model::{
    MatchSummary, MatchedRecord, NormalizedPolling, Provenance, RunMeta, RunReport,
};

/// Compute run statistics from the intermediate and final tables.
pub fn compute_summary(
    voter_rows: usize,
    polling: &[NormalizedPolling],
    joined: &OuterJoin<'_>,
    records: &[MatchedRecord],
) -> MatchSummary {
    let mut summary = MatchSummary {
        voter_rows,
        polling_rows: polling.len(),
        ambiguous_voter_keys: joined.ambiguous_keys,
        output_rows: records.len(),
        ..Default::default()
    };

    for p in polling {
        if p.record.malformed {
            summary.malformed_polling_rows += 1;
        } else if p.resolved_state.is_none() {
            summary.unresolved_polling_states += 1;
        }
    }

    for row in &joined.rows {
        if row.provenance == Provenance::PollingOnly {
            summary.polling_only_discarded += 1;
        }
    }

    for r in records {
        if r.requires_investigation {
            summary.requires_investigation += 1;
        } else {
            summary.matched += 1;
        }
    }

    summary
}

/// Wrap a summary with run metadata for the JSON report.
pub fn build_report(
    summary: MatchSummary,
    voter_file: &str,
    polling_file: &str,
    states_source: &str,
) -> RunReport {
    RunReport {
        meta: RunMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            voter_file: voter_file.into(),
            polling_file: polling_file.into(),
            states_source: states_source.into(),
        },
        summary,
    }
}
