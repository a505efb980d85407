use crate::error::{Error, MappingError};
use crate::generator::AuditMetadataGenerator;
use revtrail_schema::node::{
    column_names, Collection, Entity, Property, PropertyValue, Selectable,
};
use std::collections::BTreeSet;

impl AuditMetadataGenerator<'_> {
    /// Resolves the owning property on the referenced entity. An explicit
    /// audit-side redirect wins; then the live mapping's declared owner;
    /// then a structural search by foreign-key columns over the referenced
    /// entity, its superclasses, its identifier and its embedded
    /// components. Failure is fatal.
    pub(super) fn resolve_mapped_by(
        &self,
        entity: &Entity,
        property: &Property,
        collection: &Collection,
    ) -> Result<String, Error> {
        if let Some(explicit) = &property.audit.audit_mapped_by {
            return Ok(explicit.clone());
        }
        if let Some(declared) = &collection.mapped_by_property {
            return Ok(declared.clone());
        }

        let referenced_name = collection.referenced_entity().ok_or_else(|| {
            MappingError::UnresolvedMappedBy {
                property: property.name.clone(),
                referenced_class: entity.class_name.clone(),
            }
        })?;

        let key_columns: BTreeSet<&str> =
            column_names(&collection.key_selectables).into_iter().collect();

        let mut current = self.model.entity_binding(referenced_name);
        while let Some(referenced) = current {
            if let Some(found) = find_in_properties(&referenced.properties, &key_columns, "") {
                return Ok(found);
            }
            // identifier relations own columns too (id-class keys)
            for id_property in referenced.identifier.properties() {
                if let PropertyValue::ManyToOne(value) = &id_property.value
                    && columns_match(&value.selectables, &key_columns)
                {
                    return Ok(id_property.name.clone());
                }
            }
            current = self.model.superclass_of(referenced);
        }

        Err(MappingError::UnresolvedMappedBy {
            property: property.name.clone(),
            referenced_class: self
                .model
                .entity_binding(referenced_name)
                .map_or_else(|| referenced_name.to_string(), |e| e.class_name.clone()),
        }
        .into())
    }
}

fn find_in_properties(
    properties: &[Property],
    key_columns: &BTreeSet<&str>,
    path: &str,
) -> Option<String> {
    for property in properties {
        match &property.value {
            PropertyValue::ManyToOne(value) => {
                if columns_match(&value.selectables, key_columns) {
                    return Some(format!("{path}{}", property.name));
                }
            }
            PropertyValue::Component(component) => {
                // owners may hide inside embedded components
                let nested_path = format!("{path}{}.", property.name);
                if let Some(found) =
                    find_in_properties(&component.properties, key_columns, &nested_path)
                {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}

fn columns_match(selectables: &[Selectable], key_columns: &BTreeSet<&str>) -> bool {
    if key_columns.is_empty() {
        return false;
    }
    let columns: BTreeSet<&str> = column_names(selectables).into_iter().collect();
    columns == *key_columns
}
