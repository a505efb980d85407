//! Per-entity audit configuration: what the generator learns about each
//! entity in its passes, and what the runtime needs to map states and
//! answer relation questions.

use crate::{
    error::MappingError,
    mapper::{IdMapper, MultiPropertyMapper},
    mapping::{Attribute, AuditColumn},
};
use derive_more::Display;
use revtrail_schema::types::AccessType;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// PropertyData
///
/// Name, access and modified-flag facts for one audited property, shared
/// between the mapping model and the runtime mappers.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PropertyData {
    pub name: String,
    pub access: AccessType,
    pub using_modified_flag: bool,

    /// Resolved flag column name, present iff the flag is tracked.
    pub modified_flag_name: Option<String>,

    /// Added by the generator, absent from the source model.
    pub synthetic: bool,
}

impl PropertyData {
    #[must_use]
    pub fn new(name: &str, access: AccessType) -> Self {
        Self {
            name: name.to_string(),
            access,
            using_modified_flag: false,
            modified_flag_name: None,
            synthetic: false,
        }
    }

    #[must_use]
    pub fn with_modified_flag(mut self, flag_name: String) -> Self {
        self.using_modified_flag = true;
        self.modified_flag_name = Some(flag_name);
        self
    }

    /// Synthetic properties never track modified flags.
    #[must_use]
    pub fn synthetic(name: &str) -> Self {
        Self {
            name: name.to_string(),
            access: AccessType::Field,
            using_modified_flag: false,
            modified_flag_name: None,
            synthetic: true,
        }
    }
}

///
/// RelationType
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum RelationType {
    ToManyMiddle,
    ToManyMiddleNotOwning,
    ToManyNotOwning,
    ToOne,
    ToOneNotOwning,
}

///
/// RelationDescription
///
/// One relation as seen from the owning-or-not side that declared it.
/// Registered during generation so the second pass (and bidirectionality
/// detection) can look relations up by source property.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RelationDescription {
    pub from_property_name: String,
    pub relation_type: RelationType,
    pub to_entity_name: String,
    pub mapped_by_property: Option<String>,
    pub ignore_not_found: bool,
    pub insertable: bool,
    pub bidirectional: bool,
}

///
/// IdMappingData
///
/// The identifier facts of one entity: the runtime mapper plus the mapping
/// attributes, in two flavors. `attributes` describe the id inside the
/// entity's own audit table; `relation_attributes` are the template other
/// tables instantiate (with their own columns) to reference this id.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct IdMappingData {
    pub id_mapper: IdMapper,
    pub attributes: Vec<Attribute>,
    pub relation_attributes: Vec<Attribute>,
}

impl IdMappingData {
    /// Relation attributes renamed under `prefix`, with `columns`
    /// distributed across them in declaration order.
    #[must_use]
    pub fn prefixed_relation_attributes(
        &self,
        prefix: &str,
        columns: &[AuditColumn],
    ) -> Vec<Attribute> {
        let mut remaining = columns;
        self.relation_attributes
            .iter()
            .map(|attribute| {
                let want = attribute.columns().len().min(remaining.len());
                let (taken, rest) = remaining.split_at(want);
                remaining = rest;
                attribute.prefixed(prefix, taken.to_vec())
            })
            .collect()
    }

    /// The mapper and the attribute lists must agree on property names;
    /// they are built together but from two code paths.
    pub fn verify_consistent(&self, entity: &str) -> Result<(), MappingError> {
        let mapper_names = self.id_mapper.property_names();
        let attribute_names: Vec<&str> = self
            .relation_attributes
            .iter()
            .map(Attribute::name)
            .collect();

        if mapper_names.len() != attribute_names.len() {
            return Err(MappingError::InconsistentIdMapping {
                entity: entity.to_string(),
                detail: format!(
                    "mapper has {} id properties, mapping has {}",
                    mapper_names.len(),
                    attribute_names.len()
                ),
            });
        }
        for (mapper_name, attribute_name) in mapper_names.iter().zip(&attribute_names) {
            if mapper_name != attribute_name {
                return Err(MappingError::InconsistentIdMapping {
                    entity: entity.to_string(),
                    detail: format!(
                        "mapper id property `{mapper_name}` does not line up with mapping attribute `{attribute_name}`"
                    ),
                });
            }
        }
        Ok(())
    }
}

///
/// EntityConfiguration
///
/// Everything recorded about one audited entity across both passes.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntityConfiguration {
    pub audit_entity_name: String,
    pub id_mapping: IdMappingData,

    /// Taken out during the second pass while the generator mutates it,
    /// then restored. Always present between passes and at runtime.
    pub property_mapper: Option<MultiPropertyMapper>,

    pub parent_entity_name: Option<String>,
    relations: BTreeMap<String, RelationDescription>,
}

impl EntityConfiguration {
    #[must_use]
    pub fn new(
        audit_entity_name: String,
        id_mapping: IdMappingData,
        property_mapper: MultiPropertyMapper,
        parent_entity_name: Option<String>,
    ) -> Self {
        Self {
            audit_entity_name,
            id_mapping,
            property_mapper: Some(property_mapper),
            parent_entity_name,
            relations: BTreeMap::new(),
        }
    }

    pub fn add_relation(&mut self, description: RelationDescription) {
        self.relations
            .insert(description.from_property_name.clone(), description);
    }

    #[must_use]
    pub fn own_relation(&self, property_name: &str) -> Option<&RelationDescription> {
        self.relations.get(property_name)
    }

    pub fn relations(&self) -> impl Iterator<Item = &RelationDescription> {
        self.relations.values()
    }
}

///
/// NotAuditedConfiguration
///
/// A not-audited entity that audited relations may still point at (by
/// explicit opt-in). Only the identifier is kept.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct NotAuditedConfiguration {
    pub entity_name: String,
    pub id_mapping: IdMappingData,
}

///
/// EntitiesConfigurations
///
/// The registry both passes and the runtime read. Owned by the generator
/// during bootstrap and by the metadata afterwards; never global.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct EntitiesConfigurations {
    audited: BTreeMap<String, EntityConfiguration>,
    not_audited: BTreeMap<String, NotAuditedConfiguration>,
}

impl EntitiesConfigurations {
    pub fn add_audited(&mut self, entity_name: String, configuration: EntityConfiguration) {
        self.audited.insert(entity_name, configuration);
    }

    pub fn add_not_audited(&mut self, configuration: NotAuditedConfiguration) {
        self.not_audited
            .insert(configuration.entity_name.clone(), configuration);
    }

    #[must_use]
    pub fn get(&self, entity_name: &str) -> Option<&EntityConfiguration> {
        self.audited.get(entity_name)
    }

    pub fn get_mut(&mut self, entity_name: &str) -> Option<&mut EntityConfiguration> {
        self.audited.get_mut(entity_name)
    }

    #[must_use]
    pub fn is_audited(&self, entity_name: &str) -> bool {
        self.audited.contains_key(entity_name)
    }

    #[must_use]
    pub fn not_audited(&self, entity_name: &str) -> Option<&NotAuditedConfiguration> {
        self.not_audited.get(entity_name)
    }

    pub fn audited(&self) -> impl Iterator<Item = (&String, &EntityConfiguration)> {
        self.audited.iter()
    }

    /// Looks a relation up by source property, walking the parent chain the
    /// way inherited properties do.
    #[must_use]
    pub fn relation_description(
        &self,
        entity_name: &str,
        property_name: &str,
    ) -> Option<&RelationDescription> {
        let mut current = Some(entity_name);
        while let Some(name) = current {
            let configuration = self.audited.get(name)?;
            if let Some(description) = configuration.own_relation(property_name) {
                return Some(description);
            }
            current = configuration.parent_entity_name.as_deref();
        }
        None
    }
}
