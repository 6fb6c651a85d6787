//! Per-stage and per-run outcome reporting.
//!
//! Every stage accumulates created/updated/skipped/error counters; the
//! orchestrator aggregates them into a [`MigrationReport`] that can be
//! saved for later inspection and for comparing dry-run and execute runs.

use crate::error::CoreResult;
use crate::stage::{RunMode, Stage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use uuid::Uuid;

/// Terminal outcome for one processed row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    Created,
    Updated,
    Skipped,
    Error,
}

/// Counters for one stage run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageReport {
    /// Which stage this report covers
    pub stage: Stage,

    /// Entities newly created (or that would be, in a dry run)
    pub created: usize,

    /// Existing mapped entities whose derivable data was refreshed
    pub updated: usize,

    /// Rows skipped (missing key, duplicate, unmapped parent)
    pub skipped: usize,

    /// Rows where the create/update itself failed
    pub errors: usize,

    /// Advisory conditions logged during the stage
    pub warnings: usize,

    /// When the stage started
    pub started_at: DateTime<Utc>,

    /// When the stage finished
    pub finished_at: Option<DateTime<Utc>>,
}

impl StageReport {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            created: 0,
            updated: 0,
            skipped: 0,
            errors: 0,
            warnings: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Record a terminal row outcome
    pub fn record(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Created => self.created += 1,
            RowOutcome::Updated => self.updated += 1,
            RowOutcome::Skipped => self.skipped += 1,
            RowOutcome::Error => self.errors += 1,
        }
    }

    /// Record an advisory warning
    pub fn warn(&mut self) {
        self.warnings += 1;
    }

    /// Mark the stage as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Total rows that reached a terminal state
    pub fn total(&self) -> usize {
        self.created + self.updated + self.skipped + self.errors
    }
}

impl std::fmt::Display for StageReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} created, {} updated, {} skipped, {} errors",
            self.stage, self.created, self.updated, self.skipped, self.errors
        )?;
        if self.warnings > 0 {
            write!(f, " ({} warnings)", self.warnings)?;
        }
        Ok(())
    }
}

/// Aggregated report for a full invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Unique identifier for this run
    pub run_id: String,

    /// Mode the run executed in
    pub mode: RunMode,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// When the run finished
    pub finished_at: Option<DateTime<Utc>>,

    /// Per-stage reports in execution order
    pub stages: Vec<StageReport>,
}

impl MigrationReport {
    pub fn new(mode: RunMode) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string()[..8].to_string(),
            mode,
            started_at: Utc::now(),
            finished_at: None,
            stages: Vec::new(),
        }
    }

    /// Append a finished stage report
    pub fn push(&mut self, report: StageReport) {
        self.stages.push(report);
    }

    /// Mark the run as finished
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Whether any stage recorded row-level errors
    pub fn has_errors(&self) -> bool {
        self.stages.iter().any(|s| s.errors > 0)
    }

    /// Save the report to a file path atomically
    ///
    /// Uses write-to-temp-then-rename pattern to prevent corruption
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Load a previously saved report
    pub fn load(path: &Path) -> CoreResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        let report: MigrationReport = serde_json::from_str(&content)?;
        Ok(Some(report))
    }
}

impl std::fmt::Display for MigrationReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Migration run {} ({})", self.run_id, self.mode)?;
        for stage in &self.stages {
            writeln!(f, "  {stage}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod tests;
