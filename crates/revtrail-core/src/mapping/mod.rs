//! The audit mapping model the generator produces. This is a declarative
//! description of the shadow schema (audit entities, their composite
//! identifiers, attributes and joins), decoupled from the runtime mappers
//! that read and write it.

mod attribute;
mod column;
mod entity;
mod identifier;
mod join;

pub use attribute::{Attribute, BasicAttribute, ManyToOneAttribute};
pub use column::AuditColumn;
pub use entity::{
    AuditTableData, DiscriminatorMapping, MiddleAuditEntity, PersistentEntity,
    RootPersistentEntity, SubclassKind, SubclassPersistentEntity,
};
pub use identifier::CompositeIdentifier;
pub use join::AuditJoin;
