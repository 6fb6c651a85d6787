//! CLI command implementations

pub(crate) mod common;
pub(crate) mod import;
pub(crate) mod sync;
pub(crate) mod validate;
