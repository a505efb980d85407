use crate::{
    entities::PropertyData,
    mapper::{normalized, IdMapper},
    value::{AuditRow, Value},
};
use serde::Serialize;

///
/// ToOneIdMapper
///
/// Maps an owning to-one reference by writing the target's id under keys
/// prefixed with the property name. References compare by target id only.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ToOneIdMapper {
    pub delegate: IdMapper,
    pub property_data: PropertyData,
    pub referenced_entity: String,

    /// Set for the owner column half of a fake bidirectional relation: the
    /// value is derived from the owning collection, never inserted directly.
    pub non_insertable_fake: bool,
}

impl ToOneIdMapper {
    #[must_use]
    pub fn new(
        delegate: IdMapper,
        property_data: PropertyData,
        referenced_entity: &str,
        non_insertable_fake: bool,
    ) -> Self {
        Self {
            delegate,
            property_data,
            referenced_entity: referenced_entity.to_string(),
            non_insertable_fake,
        }
    }

    pub fn map(&self, row: &mut AuditRow, new: Option<&Value>, old: Option<&Value>) -> bool {
        let new_id = new.and_then(Value::as_ref_value).map(|r| (*r.id).clone());
        self.delegate.map_to_row_from_id(row, new_id.as_ref());

        let old_id = old.and_then(Value::as_ref_value).map(|r| (*r.id).clone());
        new_id != old_id
    }
}

///
/// OneToOneNotOwningMapper
///
/// The inverse side of a one-to-one. No columns exist on this side; the
/// mapper only answers the changed question for modified flags.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct OneToOneNotOwningMapper {
    pub property_data: PropertyData,
    pub owning_referenced_entity: String,
    pub mapped_by_property: String,
}

impl OneToOneNotOwningMapper {
    #[must_use]
    pub fn changed(&self, new: Option<&Value>, old: Option<&Value>) -> bool {
        reference_changed(new, old)
    }
}

///
/// OneToOnePrimaryKeyJoinColumnMapper
///
/// The owning side of a shared-primary-key one-to-one. The foreign key is
/// the id itself, so nothing extra lands in the row.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct OneToOnePrimaryKeyJoinColumnMapper {
    pub property_data: PropertyData,
    pub referenced_entity: String,
}

impl OneToOnePrimaryKeyJoinColumnMapper {
    #[must_use]
    pub fn changed(&self, new: Option<&Value>, old: Option<&Value>) -> bool {
        reference_changed(new, old)
    }
}

fn reference_changed(new: Option<&Value>, old: Option<&Value>) -> bool {
    let new_id = new.and_then(Value::as_ref_value).map(|r| &r.id);
    let old_id = old.and_then(Value::as_ref_value).map(|r| &r.id);
    match (new_id, old_id) {
        (Some(new_id), Some(old_id)) => new_id != old_id,
        (None, None) => normalized(new) != normalized(old),
        _ => true,
    }
}
