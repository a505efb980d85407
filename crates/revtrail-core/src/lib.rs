//! Core engine for Revtrail: synthesizes the audit mapping (shadow entities,
//! composite identifiers, collection middle tables) from a resolved mapping
//! model, and computes per-property change flags between revisions at
//! runtime.

pub mod config;
pub mod entities;
pub mod error;
pub mod generator;
pub mod mapping;
pub mod mapper;
pub mod metadata;
pub mod revision;
pub mod trace;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_fixtures;

///
/// Prelude
///
/// Domain vocabulary only; generators, registries, and helpers are reached
/// through their modules.
///

pub mod prelude {
    pub use crate::{
        config::{AuditConfig, AuditStrategy},
        error::MappingError,
        metadata::AuditMetadata,
        revision::RevisionType,
        value::{AuditRow, EntityState, Value},
    };
}

pub use error::{Error, MappingError, ModifiedFlagError};
