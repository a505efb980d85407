use crate::prelude::*;
use derive_more::Display;

///
/// AccessType
///
/// How the surrounding runtime reads a property off an entity instance.
///

#[derive(
    Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd,
    Serialize,
)]
#[remain::sorted]
pub enum AccessType {
    #[default]
    Field,
    Property,
}

///
/// Inheritance
///
/// Inheritance mapping kind of an entity, as resolved by the live mapping.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum Inheritance {
    Joined,
    #[default]
    None,
    Single,
    TablePerClass,
}

///
/// BasicKind
///
/// Resolved kind of a basic (scalar) value. `Clob`/`NClob` are the
/// large-object string kinds that change equality and key-placement rules
/// for map elements.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum BasicKind {
    Blob,
    Bool,
    Clob,
    Enum,
    Float,
    Int,
    NClob,
    Text,
    Timestamp,
    Uint,
}

impl BasicKind {
    /// Whether this is a materialized CLOB/NCLOB string kind.
    #[must_use]
    pub const fn is_lob_string(self) -> bool {
        matches!(self, Self::Clob | Self::NClob)
    }
}

///
/// CollectionKind
///
/// Closed set of collection container kinds. Each carries its own
/// metadata-generation and runtime-diff strategy; matches are exhaustive so
/// adding a kind is a compile-time event.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum CollectionKind {
    Bag,
    List,
    Map,
    Set,
    SortedMap,
    SortedSet,
}

impl CollectionKind {
    /// Whether elements are addressed by an index or key.
    #[must_use]
    pub const fn is_indexed(self) -> bool {
        matches!(self, Self::List | Self::Map | Self::SortedMap)
    }

    #[must_use]
    pub const fn is_map(self) -> bool {
        matches!(self, Self::Map | Self::SortedMap)
    }

    #[must_use]
    pub const fn is_set(self) -> bool {
        matches!(self, Self::Set | Self::SortedSet)
    }

    /// Whether the container carries a comparator.
    #[must_use]
    pub const fn is_sorted(self) -> bool {
        matches!(self, Self::SortedMap | Self::SortedSet)
    }
}

///
/// RelationTargetAuditMode
///
/// Whether a relation from an audited entity may point at a not-audited
/// target. The default requires the target to be audited.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum RelationTargetAuditMode {
    #[default]
    Audited,
    NotAudited,
}

///
/// RelationTargetNotFoundAction
///
/// Per-relation behavior when the audit query layer cannot find the target
/// row. `Default` defers to the global legacy/strict switch.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum RelationTargetNotFoundAction {
    #[default]
    Default,
    Error,
    Ignore,
}
