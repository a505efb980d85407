//! Runtime property mappers. Generated once at bootstrap, then used at
//! flush time to project entity state into audit rows and to decide, per
//! property, whether a revision changed it.

pub mod basic;
pub mod component;
pub mod id;
pub mod multi;
pub mod relation;

pub use basic::SinglePropertyMapper;
pub use component::ComponentPropertyMapper;
pub use id::{EmbeddedIdMapper, IdMapper, IdPart, IdPartKind, MultipleIdMapper, SingleIdMapper};
pub use multi::MultiPropertyMapper;

use crate::value::{AuditRow, Value};
use serde::Serialize;

///
/// PropertyMapper
///
/// The closed set of per-property mappers. Dispatch is a match, never
/// dynamic; the generator decides the variant once, from the mapping model.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum PropertyMapper {
    Single(SinglePropertyMapper),
    Component(ComponentPropertyMapper),
    ToOne(relation::ToOneIdMapper),
    OneToOneNotOwning(relation::OneToOneNotOwningMapper),
    OneToOnePrimaryKeyJoin(relation::OneToOnePrimaryKeyJoinColumnMapper),
    Collection(relation::CollectionPropertyMapper),
}

impl PropertyMapper {
    /// Writes this property's audit-row entries from the new value and
    /// reports whether the property changed against the old value.
    ///
    /// `old` is the property value in the previous revision's state; the
    /// caller handles the insert case (no previous state) before descending
    /// here.
    pub fn map(&self, row: &mut AuditRow, new: Option<&Value>, old: Option<&Value>) -> bool {
        match self {
            Self::Single(mapper) => mapper.map(row, new, old),
            Self::Component(mapper) => mapper.map(row, new, old),
            Self::ToOne(mapper) => mapper.map(row, new, old),
            Self::OneToOneNotOwning(mapper) => mapper.changed(new, old),
            Self::OneToOnePrimaryKeyJoin(mapper) => mapper.changed(new, old),
            Self::Collection(mapper) => mapper.is_modified(new, old),
        }
    }

    #[must_use]
    pub const fn as_collection(&self) -> Option<&relation::CollectionPropertyMapper> {
        match self {
            Self::Collection(mapper) => Some(mapper),
            _ => None,
        }
    }

    /// Writes this property's audit-row entries for an insert revision.
    /// Every property counts as changed on insert, including null values.
    pub fn map_for_insert(&self, row: &mut AuditRow, new: Option<&Value>) {
        match self {
            Self::Single(mapper) => {
                mapper.map(row, new, new);
            }
            Self::Component(mapper) => {
                mapper.map(row, new, new);
            }
            Self::ToOne(mapper) => {
                mapper.map(row, new, new);
            }
            Self::OneToOneNotOwning(_) | Self::OneToOnePrimaryKeyJoin(_) | Self::Collection(_) => {}
        }
    }
}

pub(crate) fn normalized<'a>(value: Option<&'a Value>) -> &'a Value {
    value.unwrap_or(&Value::Null)
}

#[cfg(test)]
mod tests;
