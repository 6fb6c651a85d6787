//! Destination store for Loam.
//!
//! Provides a DuckDB-backed store for everything the migration persists:
//! the legacy-id → internal-id mapping table (the resumability mechanism),
//! the CMS entity surface, the user–business bridge table, address rows,
//! and CSR application rows. Population is strictly sequential.

pub mod addresses;
pub mod connection;
pub mod csr;
pub mod ddl;
pub mod entities;
pub mod error;
pub mod links;
pub mod mapping;
pub mod migration;

pub use addresses::AddressRecord;
pub use connection::MigrateDb;
pub use csr::CsrApplication;
pub use entities::{NewEntity, ENTITY_KINDS};
pub use error::{StoreError, StoreResult};
pub use mapping::MappingStore;
