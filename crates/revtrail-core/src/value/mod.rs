mod float;

pub use float::{Float64, FloatError};

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

///
/// EntityState
///
/// A flattened snapshot of an entity's audited properties, keyed by property
/// name, as handed to the change mappers at flush time.
///

pub type EntityState = BTreeMap<String, Value>;

///
/// AuditRow
///
/// The row written into an audit table. Nested maps appear where the mapping
/// nests them (the original-id map, embedded components).
///

pub type AuditRow = BTreeMap<String, Value>;

///
/// Value
///
/// The runtime value domain the mappers operate over. Totally ordered so
/// that values can serve as set elements and map keys; entity references
/// compare by target id, embeddables by structural value.
///

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(Float64),
    Text(String),
    Lob(String),
    Bytes(Vec<u8>),
    Enum(String),
    Timestamp(i64),
    Composite(BTreeMap<String, Value>),
    Ref(EntityRef),
    List(Vec<Value>),
    Set(BTreeSet<Value>),
    Map(BTreeMap<Value, Value>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_composite(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Composite(fields) => Some(fields),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_ref_value(&self) -> Option<&EntityRef> {
        match self {
            Self::Ref(entity_ref) => Some(entity_ref),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_set(&self) -> Option<&BTreeSet<Self>> {
        match self {
            Self::Set(elements) => Some(elements),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_list(&self) -> Option<&Vec<Self>> {
        match self {
            Self::List(elements) => Some(elements),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<Self, Self>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Convenience for building a composite from name/value pairs.
    #[must_use]
    pub fn composite<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, Self)>,
        S: Into<String>,
    {
        Self::Composite(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

///
/// EntityRef
///
/// A reference to another mapped entity, identified by entity name and
/// identifier value. Relations compare by this, never by the target's
/// remaining state.
///

#[derive(Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub struct EntityRef {
    pub entity_name: String,
    pub id: Box<Value>,
}

impl EntityRef {
    #[must_use]
    pub fn new(entity_name: &str, id: Value) -> Self {
        Self {
            entity_name: entity_name.to_string(),
            id: Box::new(id),
        }
    }
}

#[cfg(test)]
mod tests;
