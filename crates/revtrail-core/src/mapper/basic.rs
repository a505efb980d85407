use crate::{
    entities::PropertyData,
    mapper::normalized,
    value::{AuditRow, Value},
};
use serde::Serialize;

///
/// SinglePropertyMapper
///
/// Maps one basic property to one audit-row entry. Missing and null values
/// are the same thing here.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SinglePropertyMapper {
    pub property_data: PropertyData,
}

impl SinglePropertyMapper {
    #[must_use]
    pub const fn new(property_data: PropertyData) -> Self {
        Self { property_data }
    }

    pub fn map(&self, row: &mut AuditRow, new: Option<&Value>, old: Option<&Value>) -> bool {
        row.insert(
            self.property_data.name.clone(),
            new.cloned().unwrap_or(Value::Null),
        );
        normalized(new) != normalized(old)
    }
}
