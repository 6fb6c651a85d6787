//! lm-core - Core library for Loam
//!
//! This crate provides shared types used across all Loam components:
//! configuration parsing, the stage registry, run reports, and the
//! declarative classification rule table.

pub mod classification;
pub mod config;
pub mod error;
pub mod report;
pub mod stage;

pub use classification::{derive_classification, AssociateType, Classification, DerivedClasses};
pub use config::{Config, DatabaseConfig};
pub use error::CoreError;
pub use report::{MigrationReport, RowOutcome, StageReport};
pub use stage::{CsrType, RowWindow, RunMode, Stage};
