//! Migration stage registry.
//!
//! Stages run strictly sequentially in the order given by [`Stage::all`]
//! because later stages depend on identifier mappings written by earlier
//! ones (users before businesses, businesses before addresses and CSR).

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// One of the three legacy cost-share-reimbursement application types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsrType {
    Advertising,
    Labels,
    Lead,
}

impl CsrType {
    /// All CSR types in import order
    pub fn all() -> [CsrType; 3] {
        [CsrType::Advertising, CsrType::Labels, CsrType::Lead]
    }

    /// Parse a CSR type name; unknown names are fatal per the error taxonomy
    pub fn parse(name: &str) -> CoreResult<Self> {
        match name.to_lowercase().as_str() {
            "advertising" => Ok(CsrType::Advertising),
            "labels" => Ok(CsrType::Labels),
            "lead" => Ok(CsrType::Lead),
            _ => Err(CoreError::UnknownCsrType {
                name: name.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CsrType::Advertising => "advertising",
            CsrType::Labels => "labels",
            CsrType::Lead => "lead",
        }
    }

    /// Entity kind recorded in the identifier mapping store
    pub fn entity_kind(&self) -> &'static str {
        match self {
            CsrType::Advertising => "csr_advertising",
            CsrType::Labels => "csr_labels",
            CsrType::Lead => "csr_lead",
        }
    }

    /// Legacy source table for this application type
    pub fn table(&self) -> &'static str {
        match self {
            CsrType::Advertising => "nmda_csr_advertising",
            CsrType::Labels => "nmda_csr_labels",
            CsrType::Lead => "nmda_csr_lead",
        }
    }

    /// Primary-key column in the legacy table
    pub fn key_column(&self) -> &'static str {
        match self {
            CsrType::Advertising => "AdvertisingId",
            CsrType::Labels => "LabelsId",
            CsrType::Lead => "LeadId",
        }
    }
}

impl std::fmt::Display for CsrType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ordered phase of the migration handling one legacy table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    GroupTypes,
    Companies,
    CompanyTerms,
    Users,
    Businesses,
    Addresses,
    Csr(CsrType),
}

impl Stage {
    /// Every stage in dependency order
    pub fn all() -> Vec<Stage> {
        let mut stages = vec![
            Stage::GroupTypes,
            Stage::Companies,
            Stage::CompanyTerms,
            Stage::Users,
            Stage::Businesses,
            Stage::Addresses,
        ];
        stages.extend(CsrType::all().into_iter().map(Stage::Csr));
        stages
    }

    /// Stage name as used on the command line
    pub fn name(&self) -> String {
        match self {
            Stage::GroupTypes => "group-types".to_string(),
            Stage::Companies => "companies".to_string(),
            Stage::CompanyTerms => "company-terms".to_string(),
            Stage::Users => "users".to_string(),
            Stage::Businesses => "businesses".to_string(),
            Stage::Addresses => "addresses".to_string(),
            Stage::Csr(t) => format!("csr-{t}"),
        }
    }

    /// Legacy table this stage consumes
    pub fn table(&self) -> &'static str {
        match self {
            Stage::GroupTypes => "nmda_grouptype",
            Stage::Companies => "nmda_company",
            Stage::CompanyTerms => "nmda_companygrouptype",
            Stage::Users => "nmda_user",
            Stage::Businesses => "nmda_business",
            Stage::Addresses => "nmda_address",
            Stage::Csr(t) => t.table(),
        }
    }

    /// Dump file name for this stage's table (one file per legacy table)
    pub fn source_file(&self) -> String {
        format!("{}.sql", self.table())
    }

    /// Entity kind created by this stage, if it creates entities.
    ///
    /// CompanyTerms and Addresses write link/detail rows, not entities.
    pub fn entity_kind(&self) -> Option<&'static str> {
        match self {
            Stage::GroupTypes => Some("group_type_term"),
            Stage::Companies => Some("company"),
            Stage::CompanyTerms => None,
            Stage::Users => Some("user"),
            Stage::Businesses => Some("business"),
            Stage::Addresses => None,
            Stage::Csr(t) => Some(t.entity_kind()),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

/// Execution mode for a run.
///
/// Dry run is the default: it walks every row and increments the same
/// counters as an execute run, but all writes are suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    DryRun,
    Execute,
}

impl RunMode {
    pub fn writes_enabled(&self) -> bool {
        matches!(self, RunMode::Execute)
    }
}

impl std::fmt::Display for RunMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunMode::DryRun => write!(f, "dry-run"),
            RunMode::Execute => write!(f, "execute"),
        }
    }
}

/// Offset/limit window over a stage's parsed row sequence, for partial runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowWindow {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl RowWindow {
    /// Apply the window to a row sequence, preserving order
    pub fn apply<T>(&self, rows: Vec<T>) -> Vec<T> {
        let iter = rows.into_iter().skip(self.offset);
        match self.limit {
            Some(n) => iter.take(n).collect(),
            None => iter.collect(),
        }
    }
}
