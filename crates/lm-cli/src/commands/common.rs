//! Shared command plumbing: workspace loading and structured exit codes.

use crate::cli::GlobalArgs;
use anyhow::{Context, Result};
use lm_core::{Config, RowWindow, RunMode};
use lm_dump::DumpSource;
use lm_import::RunContext;
use lm_store::MigrateDb;
use std::fmt;
use std::path::Path;

/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that RAII destructors run and cleanup happens properly.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally empty: ExitCode is a control-flow mechanism, not a
        // user-facing error, and must not leak into stderr.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Everything a command needs, resolved from config plus CLI overrides
pub(crate) struct Workspace {
    pub config: Config,
    pub db: MigrateDb,
    pub source: DumpSource,
}

/// Load `loam.yml`, apply CLI overrides, and open the destination store.
pub(crate) fn open_workspace(global: &GlobalArgs) -> Result<Workspace> {
    let project_dir = Path::new(&global.project_dir);

    let mut config = match &global.config {
        Some(path) => Config::from_file(Path::new(path))
            .with_context(|| format!("loading config {path}"))?,
        None => Config::load_or_default(project_dir)?,
    };

    if let Some(dump_dir) = &global.dump_dir {
        config.dump_dir = dump_dir.clone();
    }
    if let Some(db_path) = &global.db {
        config.database.path = db_path.clone();
    }

    let db = MigrateDb::new(&config.database.path)
        .with_context(|| format!("opening database {}", config.database.path))?;
    let source = DumpSource::new(config.dump_dir_absolute(project_dir));

    Ok(Workspace { config, db, source })
}

impl Workspace {
    /// Run context carrying the global mode and row window
    pub fn context<'a>(&'a self, global: &GlobalArgs) -> RunContext<'a> {
        let mode = if global.execute {
            RunMode::Execute
        } else {
            RunMode::DryRun
        };
        RunContext::new(&self.db, &self.source, &self.config)
            .with_mode(mode)
            .with_window(RowWindow {
                offset: global.offset,
                limit: global.limit,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global_args() -> GlobalArgs {
        GlobalArgs {
            verbose: false,
            project_dir: ".".to_string(),
            config: None,
            execute: false,
            limit: None,
            offset: 0,
            dump_dir: None,
            db: None,
        }
    }

    #[test]
    fn test_overrides_apply() {
        let dir = tempfile::tempdir().unwrap();
        let mut global = global_args();
        global.project_dir = dir.path().display().to_string();
        global.dump_dir = Some("exports".to_string());
        global.db = Some(":memory:".to_string());

        let workspace = open_workspace(&global).unwrap();
        assert_eq!(workspace.config.dump_dir, "exports");
        assert_eq!(workspace.config.database.path, ":memory:");
    }

    #[test]
    fn test_context_mode_follows_execute_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut global = global_args();
        global.project_dir = dir.path().display().to_string();
        global.db = Some(":memory:".to_string());
        global.execute = true;
        global.limit = Some(5);

        let workspace = open_workspace(&global).unwrap();
        let ctx = workspace.context(&global);
        assert!(ctx.writes_enabled());
        assert_eq!(ctx.window.limit, Some(5));
    }
}
