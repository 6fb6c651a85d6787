//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use lm_core::CsrType;

/// Loam - migrate legacy portal SQL dumps into the new CMS
#[derive(Parser, Debug)]
#[command(name = "loam")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Apply changes. Without this flag every command is a dry run that
    /// reports what it would do.
    #[arg(long, global = true)]
    pub execute: bool,

    /// Process at most this many rows per stage
    #[arg(long, global = true)]
    pub limit: Option<usize>,

    /// Skip this many rows at the start of each stage
    #[arg(long, global = true, default_value_t = 0)]
    pub offset: usize,

    /// Override the dump directory from loam.yml
    #[arg(long, global = true)]
    pub dump_dir: Option<String>,

    /// Override the destination database path from loam.yml
    #[arg(long, global = true)]
    pub db: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import one stage (or all stages) from the legacy dumps
    Import(ImportArgs),

    /// Read-only validation passes
    Validate(ValidateArgs),

    /// Refresh derivable data on already-imported businesses
    Sync,
}

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    #[command(subcommand)]
    pub target: ImportTarget,
}

/// One stage, or the full dependency-ordered sequence
#[derive(Subcommand, Debug)]
pub enum ImportTarget {
    /// Group-type taxonomy terms
    GroupTypes,
    /// Company entities
    Companies,
    /// Company ↔ group-type links
    CompanyTerms,
    /// User entities and ownership links
    Users,
    /// Business entities
    Businesses,
    /// Business addresses
    Addresses(AddressArgs),
    /// Cost-share-reimbursement applications
    Csr(CsrArgs),
    /// Every stage in dependency order
    All,
}

/// Arguments for the addresses stage
#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Create stub businesses for addresses whose business was never
    /// mapped, instead of skipping them
    #[arg(long)]
    pub backfill: bool,
}

/// Arguments for the csr stage
#[derive(Args, Debug)]
pub struct CsrArgs {
    /// Which application type to import
    #[arg(long, value_enum, default_value = "all")]
    pub csr_type: CsrTypeArg,
}

/// CSR application type selector
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsrTypeArg {
    Advertising,
    Labels,
    Lead,
    All,
}

impl CsrTypeArg {
    /// The concrete types this selector covers
    pub fn types(&self) -> Vec<CsrType> {
        match self {
            CsrTypeArg::Advertising => vec![CsrType::Advertising],
            CsrTypeArg::Labels => vec![CsrType::Labels],
            CsrTypeArg::Lead => vec![CsrType::Lead],
            CsrTypeArg::All => CsrType::all().to_vec(),
        }
    }
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(subcommand)]
    pub target: ValidateTarget,
}

/// Which validation pass to run
#[derive(Subcommand, Debug)]
pub enum ValidateTarget {
    /// Pre-flight referential-integrity check over the raw dumps
    Relationships,
    /// Post-run mapping coverage check
    Migration,
}
