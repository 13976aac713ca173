//! Batch serialization - one output row per input report
//!
//! Records are serialized on the current rayon pool. Output rows keep input
//! order no matter which worker finished first.

use crate::{Result, SerializeError, Serializer};
use radgraph_core::ReportRecord;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// One serialized report, as handed to the prompting stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub id: String,
    pub serialization: String,
    /// Ground-truth report, passed through untouched
    pub original_report_text: Option<String>,
}

/// What to do when a record cannot be serialized
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first failing record (in input order)
    #[default]
    Abort,
    /// Log the failure and keep going
    Skip,
}

/// A record that was skipped
#[derive(Debug)]
pub struct RecordFailure {
    pub id: String,
    pub error: SerializeError,
}

/// Result of a batch run
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub rows: Vec<OutputRow>,
    pub failures: Vec<RecordFailure>,
}

impl Serializer {
    /// Decode and serialize a single record
    pub fn serialize_record(&self, record: &ReportRecord) -> Result<OutputRow> {
        let graph = record.parse()?;
        let serialization = self.serialize(&graph)?;
        Ok(OutputRow {
            id: record.id.clone(),
            serialization,
            original_report_text: graph.original_text().map(String::from),
        })
    }
}

/// Serialize every record, in parallel
#[instrument(skip(serializer, records), fields(strategy = %serializer.strategy(), records = records.len()))]
pub fn serialize_batch(
    serializer: &Serializer,
    records: &[ReportRecord],
    policy: FailurePolicy,
) -> Result<BatchOutcome> {
    let results: Vec<Result<OutputRow>> = records
        .par_iter()
        .map(|record| serializer.serialize_record(record))
        .collect();

    let mut outcome = BatchOutcome::default();
    for (record, result) in records.iter().zip(results) {
        match result {
            Ok(row) => outcome.rows.push(row),
            Err(error) => match policy {
                FailurePolicy::Abort => return Err(error),
                FailurePolicy::Skip => {
                    warn!(report_id = %record.id, %error, "Skipping report");
                    outcome.failures.push(RecordFailure {
                        id: record.id.clone(),
                        error,
                    });
                }
            },
        }
    }

    info!(
        "Serialized {} reports ({} skipped)",
        outcome.rows.len(),
        outcome.failures.len()
    );

    Ok(outcome)
}
