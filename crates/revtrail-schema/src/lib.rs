//! The resolved entity mapping model consumed by the audit metadata
//! generator: entities, identifier shapes, properties with resolved value
//! types, collections, secondary joins, and per-property audit options.
//!
//! The annotation/XML reader that produces this model is out of scope; the
//! model arrives fully resolved and is read-only during generation.

pub mod node;
pub mod types;
pub mod validate;

/// Maximum length for entity mapping identifiers.
pub const MAX_ENTITY_NAME_LEN: usize = 64;

/// Maximum length for property mapping identifiers.
pub const MAX_PROPERTY_NAME_LEN: usize = 64;

use thiserror::Error as ThisError;
use validate::ErrorTree;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        err,
        node::*,
        types::{
            AccessType, BasicKind, CollectionKind, Inheritance, RelationTargetAuditMode,
            RelationTargetNotFoundAction,
        },
        validate::{ErrorTree, ValidateNode},
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("mapping model validation failed: {0}")]
    Validation(ErrorTree),
}
