use crate::{
    entities::PropertyData,
    mapper::{multi::MultiPropertyMapper, normalized},
    value::{AuditRow, EntityState, Value},
};
use serde::Serialize;

///
/// ComponentPropertyMapper
///
/// Maps an embedded component as one nested row entry. The component
/// changes as a whole (structural comparison of the composite value); the
/// delegate's flag processing stays off because the component carries a
/// single modified flag of its own.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComponentPropertyMapper {
    pub property_data: PropertyData,
    pub class_name: String,
    pub delegate: MultiPropertyMapper,
}

impl ComponentPropertyMapper {
    #[must_use]
    pub const fn new(
        property_data: PropertyData,
        class_name: String,
        delegate: MultiPropertyMapper,
    ) -> Self {
        Self {
            property_data,
            class_name,
            delegate,
        }
    }

    pub fn map(&self, row: &mut AuditRow, new: Option<&Value>, old: Option<&Value>) -> bool {
        let entry = match new.and_then(Value::as_composite) {
            Some(fields) => {
                let state: EntityState =
                    fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                let mut sub_row = AuditRow::new();
                self.delegate.map(&mut sub_row, &state, None);
                Value::Composite(sub_row)
            }
            None => Value::Null,
        };
        row.insert(self.property_data.name.clone(), entry);

        normalized(new) != normalized(old)
    }
}
