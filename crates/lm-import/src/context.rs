//! Shared run context for stage importers.

use crate::error::ImportResult;
use lm_core::{Config, RowWindow, RunMode, Stage, StageReport};
use lm_dump::{DumpSource, Row};
use lm_store::{MappingStore, MigrateDb};

/// Everything a stage needs for one invocation.
///
/// Owned for the duration of a command; stages borrow it. Per-run
/// duplicate-tracking sets live on the individual importers, not here.
pub struct RunContext<'a> {
    pub db: &'a MigrateDb,
    pub source: &'a DumpSource,
    pub config: &'a Config,
    pub mode: RunMode,
    pub window: RowWindow,
    /// Addresses only: create stub businesses for unmapped references
    pub backfill: bool,
}

impl<'a> RunContext<'a> {
    pub fn new(db: &'a MigrateDb, source: &'a DumpSource, config: &'a Config) -> Self {
        Self {
            db,
            source,
            config,
            mode: RunMode::DryRun,
            window: RowWindow::default(),
            backfill: false,
        }
    }

    pub fn with_mode(mut self, mode: RunMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_window(mut self, window: RowWindow) -> Self {
        self.window = window;
        self
    }

    pub fn with_backfill(mut self, backfill: bool) -> Self {
        self.backfill = backfill;
        self
    }

    /// Mapping store handle carrying this run's mode
    pub fn mappings(&self) -> MappingStore<'a> {
        MappingStore::new(self.db, self.mode)
    }

    pub fn writes_enabled(&self) -> bool {
        self.mode.writes_enabled()
    }

    /// Load a stage's windowed row sequence, applying the advisory
    /// row-count floor from configuration.
    pub fn load_stage_rows(
        &self,
        stage: Stage,
        report: &mut StageReport,
    ) -> ImportResult<Vec<Row>> {
        let rows = self.source.load(&stage.source_file(), stage.table())?;

        if let Some(min) = self.config.min_rows_for(stage.table()) {
            if rows.len() < min {
                log::warn!(
                    "{stage}: parsed {} rows, below the expected floor of {min}",
                    rows.len()
                );
                report.warn();
            }
        }

        Ok(self.window.apply(rows))
    }
}
