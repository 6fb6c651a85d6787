//! lm-import - stage importers for the legacy portal migration.
//!
//! Each stage consumes parsed dump rows plus the identifier mapping store
//! and materializes CMS entities, recording new mappings as it goes.
//! Stages are idempotent: a re-run detects existing mappings and only
//! refreshes safely-recomputable data. The orchestrator sequences stages
//! in dependency order; the validator is a read-only pre-flight pass.

pub mod context;
pub mod error;
pub mod orchestrator;
pub mod stages;
pub mod validate;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use context::RunContext;
pub use error::{ImportError, ImportResult};
pub use orchestrator::{run_all, run_stage, sync};
pub use validate::{validate_migration, validate_relationships, Severity, ValidationReport};
