//! Sync command implementation

use crate::cli::GlobalArgs;
use crate::commands::common::{self, ExitCode};
use anyhow::Result;

/// Refresh derivable data on already-imported businesses without
/// creating anything.
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let workspace = common::open_workspace(global)?;
    if !global.execute {
        println!("Dry run - no changes will be written (pass --execute to apply)\n");
    }

    let ctx = workspace.context(global);
    let report = lm_import::sync(&ctx)?;
    println!("{report}");

    if report.errors > 0 {
        return Err(ExitCode(1).into());
    }
    Ok(())
}
