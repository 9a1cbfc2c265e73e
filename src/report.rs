//! Per-target results, printed as a summary and exported as JSON.
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::error::AppResult;

/// Width of the label column in the text summary.
const LABEL_WIDTH: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum TargetOutcome {
    Completed(f64),
    /// The benchmark did not produce a number; holds the reason.
    Failed(String),
}

impl TargetOutcome {
    #[must_use]
    pub const fn requests_per_sec(&self) -> Option<f64> {
        match self {
            TargetOutcome::Completed(value) => Some(*value),
            TargetOutcome::Failed(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetResult {
    pub label: &'static str,
    pub outcome: TargetOutcome,
}

/// Label -> requests/sec mapping, kept in run order.
#[derive(Debug, Clone)]
pub struct BenchReport {
    created_at: DateTime<Utc>,
    results: Vec<TargetResult>,
}

impl Default for BenchReport {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchReport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            results: Vec::new(),
        }
    }

    pub fn record(&mut self, label: &'static str, outcome: TargetOutcome) {
        self.results.push(TargetResult { label, outcome });
    }

    #[must_use]
    pub fn results(&self) -> &[TargetResult] {
        &self.results
    }

    #[must_use]
    pub fn outcome(&self, label: &str) -> Option<&TargetOutcome> {
        self.results
            .iter()
            .find(|result| result.label == label)
            .map(|result| &result.outcome)
    }

    #[must_use]
    pub fn requests_per_sec(&self, label: &str) -> Option<f64> {
        self.outcome(label).and_then(TargetOutcome::requests_per_sec)
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|result| matches!(result.outcome, TargetOutcome::Failed(_)))
            .count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.results.len().saturating_add(1));
        lines.push("Requests/sec by target:".to_owned());
        for result in &self.results {
            let line = match &result.outcome {
                TargetOutcome::Completed(value) => {
                    format!("  {:<width$} {:.2}", result.label, value, width = LABEL_WIDTH)
                }
                TargetOutcome::Failed(reason) => format!(
                    "  {:<width$} unavailable ({})",
                    result.label,
                    reason,
                    width = LABEL_WIDTH
                ),
            };
            lines.push(line);
        }
        lines
    }

    pub fn print_summary(&self) {
        for line in self.summary_lines() {
            println!("{}", line);
        }
    }

    /// Writes the report as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be created or written.
    pub fn write_json(&self, path: &Path) -> AppResult<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        std::io::Write::flush(&mut writer)?;
        Ok(())
    }
}

impl Serialize for BenchReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("BenchReport", 3)?;
        state.serialize_field(
            "created_at",
            &self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        )?;
        state.serialize_field("req_per_sec", &Throughputs(&self.results))?;
        state.serialize_field("errors", &Failures(&self.results))?;
        state.end()
    }
}

/// `{label: number | null}` in run order.
struct Throughputs<'report>(&'report [TargetResult]);

impl Serialize for Throughputs<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for result in self.0 {
            map.serialize_entry(result.label, &result.outcome.requests_per_sec())?;
        }
        map.end()
    }
}

/// `{label: reason}` for failed targets only.
struct Failures<'report>(&'report [TargetResult]);

impl Serialize for Failures<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for result in self.0 {
            if let TargetOutcome::Failed(reason) = &result.outcome {
                map.serialize_entry(result.label, reason)?;
            }
        }
        map.end()
    }
}
