//! Validate command implementation

use crate::cli::{GlobalArgs, ValidateArgs, ValidateTarget};
use crate::commands::common::{self, ExitCode};
use anyhow::Result;
use lm_import::{validate_migration, validate_relationships};

/// Execute the validate command. Hard findings exit with code 2.
pub(crate) fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let workspace = common::open_workspace(global)?;
    let ctx = workspace.context(global);

    let report = match args.target {
        ValidateTarget::Relationships => {
            println!("Validating legacy dump relationships\n");
            validate_relationships(&ctx)?
        }
        ValidateTarget::Migration => {
            println!("Validating migration coverage\n");
            validate_migration(&ctx)?
        }
    };

    println!("{report}");
    if !report.passed() {
        return Err(ExitCode(2).into());
    }
    Ok(())
}
