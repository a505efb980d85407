//! ## Crate layout
//! - `core`: the audit metadata generator, runtime property mappers, and
//!   change tracking.
//! - `schema`: the resolved mapping model the generator consumes, plus its
//!   validation.
//!
//! The `prelude` module mirrors the surface a host persistence layer uses:
//! configure, generate, then map entity state into audit rows at flush time.

pub use revtrail_core as core;
pub use revtrail_schema as schema;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use core::{Error, MappingError, ModifiedFlagError};

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        config::{AuditConfig, AuditStrategy, ValidityStrategyConfig},
        metadata::AuditMetadata,
        revision::RevisionType,
        trace::{BootTraceEvent, BootTraceSink},
        value::{AuditRow, EntityState, Value},
    };
    pub use crate::schema::node::{Entity, MappingModel, Property};
    pub use serde::{Deserialize, Serialize};
}
