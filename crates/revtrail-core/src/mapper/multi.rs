use crate::{
    entities::PropertyData,
    mapper::PropertyMapper,
    value::{AuditRow, EntityState, Value},
};
use serde::Serialize;

///
/// MultiPropertyMapper
///
/// Maps a flat list of properties, in declaration order, and writes the
/// per-property modified flags alongside the data. Component delegates run
/// with flag processing off; the component carries a single flag of its own.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MultiPropertyMapper {
    properties: Vec<(PropertyData, PropertyMapper)>,
    process_modified_flags: bool,
}

impl MultiPropertyMapper {
    #[must_use]
    pub const fn new(process_modified_flags: bool) -> Self {
        Self {
            properties: Vec::new(),
            process_modified_flags,
        }
    }

    pub fn add(&mut self, property_data: PropertyData, mapper: PropertyMapper) {
        self.properties.push((property_data, mapper));
    }

    #[must_use]
    pub fn get(&self, property_name: &str) -> Option<&PropertyMapper> {
        self.properties
            .iter()
            .find(|(pd, _)| pd.name == property_name)
            .map(|(_, mapper)| mapper)
    }

    #[must_use]
    pub fn property_data(&self, property_name: &str) -> Option<&PropertyData> {
        self.properties
            .iter()
            .find(|(pd, _)| pd.name == property_name)
            .map(|(pd, _)| pd)
    }

    pub fn properties(&self) -> impl Iterator<Item = &(PropertyData, PropertyMapper)> {
        self.properties.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Projects the new state into the row and reports whether anything
    /// changed. With no old state (an insert revision) every property is
    /// changed, null values included.
    pub fn map(
        &self,
        row: &mut AuditRow,
        new_state: &EntityState,
        old_state: Option<&EntityState>,
    ) -> bool {
        let mut any_changed = false;

        for (property_data, mapper) in &self.properties {
            let new = new_state.get(&property_data.name);

            let changed = match old_state {
                None => {
                    mapper.map_for_insert(row, new);
                    true
                }
                Some(old_state) => mapper.map(row, new, old_state.get(&property_data.name)),
            };

            if self.process_modified_flags
                && property_data.using_modified_flag
                && let Some(flag_name) = &property_data.modified_flag_name
            {
                row.insert(flag_name.clone(), Value::Bool(changed));
            }

            any_changed |= changed;
        }

        any_changed
    }
}
