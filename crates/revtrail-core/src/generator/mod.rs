//! The audit metadata generator. Two passes over the mapping model: the
//! first builds identifiers, basics and relation-free components for every
//! entity, so the second can wire to-one references and collections against
//! any other entity's already-known id mapping.

mod basic;
mod collection;
mod component;
mod id;
mod name_register;
mod query;
mod to_one;

pub use name_register::AuditEntityNameRegister;
pub use query::{QueryGeneratorBuilder, RelationQuery, RelationQueryKind};

use crate::{
    config::AuditConfig,
    entities::{
        EntitiesConfigurations, EntityConfiguration, NotAuditedConfiguration, PropertyData,
    },
    error::{Error, MappingError},
    mapper::MultiPropertyMapper,
    mapping::{
        Attribute, AuditColumn, AuditJoin, AuditTableData, BasicAttribute, CompositeIdentifier,
        DiscriminatorMapping, ManyToOneAttribute, MiddleAuditEntity, PersistentEntity,
        RootPersistentEntity, SubclassKind, SubclassPersistentEntity,
    },
    metadata::AuditMetadata,
    trace::{BootTrace, BootTraceEvent, BootTracePass},
};
use revtrail_schema::{
    node::{column_names, Component, Entity, MappingModel, Property, PropertyValue},
    types::Inheritance,
    validate::validate_model,
};
use std::collections::{BTreeMap, BTreeSet};

///
/// AuditMetadataGenerator
///
/// Owns every registry for the duration of one bootstrap; nothing here is
/// global or reused across models.
///

pub struct AuditMetadataGenerator<'a> {
    cfg: &'a AuditConfig,
    model: &'a MappingModel,
    trace: BootTrace<'a>,

    configurations: EntitiesConfigurations,
    name_register: AuditEntityNameRegister,
    audit_entities: BTreeMap<String, PersistentEntity>,
    middle_entities: BTreeMap<String, MiddleAuditEntity>,
    queries: QueryGeneratorBuilder,
}

impl<'a> AuditMetadataGenerator<'a> {
    #[must_use]
    pub fn new(cfg: &'a AuditConfig, model: &'a MappingModel, trace: BootTrace<'a>) -> Self {
        Self {
            cfg,
            model,
            trace,
            configurations: EntitiesConfigurations::default(),
            name_register: AuditEntityNameRegister::default(),
            audit_entities: BTreeMap::new(),
            middle_entities: BTreeMap::new(),
            queries: QueryGeneratorBuilder::default(),
        }
    }

    pub fn generate(mut self) -> Result<AuditMetadata, Error> {
        validate_model(self.model)
            .map_err(|e| Error::Schema(revtrail_schema::Error::Validation(e)))?;

        let model = self.model;
        let ordered = self.ordered_entity_names();

        for name in &ordered {
            if let Some(entity) = model.entity_binding(name) {
                self.trace.emit(BootTraceEvent::PassStart {
                    pass: BootTracePass::First,
                    entity: name,
                });
                self.first_pass(entity)?;
                self.trace.emit(BootTraceEvent::PassFinish {
                    pass: BootTracePass::First,
                    entity: name,
                });
            }
        }
        for name in &ordered {
            if let Some(entity) = model.entity_binding(name) {
                self.trace.emit(BootTraceEvent::PassStart {
                    pass: BootTracePass::Second,
                    entity: name,
                });
                self.second_pass(entity)?;
                self.trace.emit(BootTraceEvent::PassFinish {
                    pass: BootTracePass::Second,
                    entity: name,
                });
            }
        }

        Ok(AuditMetadata {
            configurations: self.configurations,
            audit_entities: self.audit_entities,
            middle_entities: self.middle_entities,
            relation_queries: self.queries.build(),
            revision_info_entity_name: self.cfg.revision_info_entity_name.clone(),
            original_id_prop_name: self.cfg.original_id_prop_name.clone(),
            revision_type_prop_name: self.cfg.revision_type_field_name.clone(),
            store_data_at_delete: self.cfg.store_data_at_delete,
        })
    }

    /// Entity names with every superclass ahead of its subclasses, name
    /// order otherwise.
    fn ordered_entity_names(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for name in self.model.entities.keys() {
            self.visit_ordered(name, &mut seen, &mut out);
        }
        out
    }

    fn visit_ordered(&self, name: &str, seen: &mut BTreeSet<String>, out: &mut Vec<String>) {
        if !seen.insert(name.to_string()) {
            return;
        }
        if let Some(entity) = self.model.entity_binding(name)
            && let Some(superclass) = &entity.superclass
        {
            self.visit_ordered(superclass, seen, out);
        }
        out.push(name.to_string());
    }

    // --- first pass ---

    fn first_pass(&mut self, entity: &'a Entity) -> Result<(), Error> {
        if !entity.audit.audited {
            // keep the id around so audited relations can opt into
            // referencing this entity
            if let Some(id_mapping) = id::build_id_mapping(entity)? {
                self.configurations.add_not_audited(NotAuditedConfiguration {
                    entity_name: entity.entity_name.clone(),
                    id_mapping,
                });
            }
            return Ok(());
        }

        if let Some(superclass) = self.model.superclass_of(entity)
            && !superclass.audit.audited
        {
            return Err(MappingError::SuperclassNotAudited {
                entity: entity.entity_name.clone(),
                superclass: superclass.entity_name.clone(),
            }
            .into());
        }

        let table = self.audit_table_data(entity);
        self.name_register.register(&table.audit_entity_name)?;
        self.trace.emit(BootTraceEvent::AuditEntityRegistered {
            entity: &entity.entity_name,
            audit_entity: &table.audit_entity_name,
        });

        let id_mapping = id::build_id_mapping(entity)?.ok_or_else(|| {
            MappingError::UnsupportedIdMapping {
                entity: entity.entity_name.clone(),
            }
        })?;
        id_mapping.verify_consistent(&entity.entity_name)?;

        let audit_entity_name = table.audit_entity_name.clone();
        let mut persistent = self.create_persistent_entity(entity, table, &id_mapping)?;
        let mut mapper = MultiPropertyMapper::new(true);

        for property in entity.unjoined_properties() {
            if !property.audit.audited {
                continue;
            }
            self.add_first_pass_value(entity, property, &mut persistent, &mut mapper)?;
        }
        self.add_joins(entity, &mut persistent, &mut mapper)?;

        let configuration = EntityConfiguration::new(
            audit_entity_name,
            id_mapping,
            mapper,
            entity.superclass.clone(),
        );
        self.configurations
            .add_audited(entity.entity_name.clone(), configuration);
        self.audit_entities
            .insert(entity.entity_name.clone(), persistent);

        Ok(())
    }

    fn audit_table_data(&self, entity: &Entity) -> AuditTableData {
        let table_override = entity.audit.audit_table.as_ref();
        AuditTableData {
            audit_entity_name: self.cfg.audit_entity_name(&entity.entity_name),
            audit_table_name: table_override
                .and_then(|o| o.name.clone())
                .unwrap_or_else(|| self.cfg.audit_table_name(&entity.table)),
            schema: table_override
                .and_then(|o| o.schema.clone())
                .or_else(|| entity.schema.clone()),
            catalog: table_override
                .and_then(|o| o.catalog.clone())
                .or_else(|| entity.catalog.clone()),
        }
    }

    fn create_persistent_entity(
        &self,
        entity: &Entity,
        table: AuditTableData,
        id_mapping: &crate::entities::IdMappingData,
    ) -> Result<PersistentEntity, Error> {
        let Some(superclass_name) = &entity.superclass else {
            return Ok(PersistentEntity::Root(self.create_root(entity, table, id_mapping)));
        };

        let extends = self
            .configurations
            .get(superclass_name)
            .map(|c| c.audit_entity_name.clone())
            .ok_or_else(|| MappingError::MissingEntityConfiguration {
                entity: superclass_name.clone(),
            })?;

        let mut attributes = Vec::new();
        let kind = match entity.inheritance {
            Inheritance::None | Inheritance::Single => SubclassKind::Discriminator,
            Inheritance::Joined => {
                // the audit primary key carries the revision number too
                let mut key_columns: Vec<AuditColumn> = id_mapping
                    .attributes
                    .iter()
                    .flat_map(|a| a.columns().to_vec())
                    .collect();
                key_columns.push(AuditColumn::new(&self.cfg.revision_field_name));

                if let Some(validity) = self.cfg.strategy.as_validity()
                    && validity.revision_end_timestamp
                    && validity.revision_end_timestamp_legacy_placement
                {
                    attributes.push(revision_end_timestamp_attribute(
                        &validity.revision_end_timestamp_field_name,
                    ));
                }

                SubclassKind::Joined { table, key_columns }
            }
            Inheritance::TablePerClass => SubclassKind::Union { table },
        };

        Ok(PersistentEntity::Subclass(SubclassPersistentEntity {
            audit_entity_name: self.cfg.audit_entity_name(&entity.entity_name),
            extends,
            kind,
            discriminator_value: entity.discriminator_value.clone(),
            attributes,
            joins: Vec::new(),
        }))
    }

    fn create_root(
        &self,
        entity: &Entity,
        table: AuditTableData,
        id_mapping: &crate::entities::IdMappingData,
    ) -> RootPersistentEntity {
        let mut identifier = CompositeIdentifier::new(&self.cfg.original_id_prop_name);
        for attribute in &id_mapping.attributes {
            identifier.add_attribute(attribute.clone());
        }
        identifier.add_revision_info_relation(ManyToOneAttribute::new(
            &self.cfg.revision_field_name,
            &self.cfg.revision_info_entity_name,
            vec![AuditColumn::new(&self.cfg.revision_field_name)],
        ));

        let mut attributes = vec![Attribute::Basic(BasicAttribute::new(
            &self.cfg.revision_type_field_name,
            "RevisionType",
            vec![AuditColumn::new(&self.cfg.revision_type_field_name)],
        ))];
        if let Some(validity) = self.cfg.strategy.as_validity() {
            attributes.push(Attribute::ManyToOne(ManyToOneAttribute::new(
                &validity.revision_end_field_name,
                &self.cfg.revision_info_entity_name,
                vec![AuditColumn::new(&validity.revision_end_field_name)],
            )));
            if validity.revision_end_timestamp {
                attributes.push(revision_end_timestamp_attribute(
                    &validity.revision_end_timestamp_field_name,
                ));
            }
        }

        RootPersistentEntity {
            table,
            is_abstract: entity.is_abstract,
            identifier,
            discriminator: entity.discriminator.clone().map(|d| DiscriminatorMapping {
                selectable: d.selectable,
                type_name: d.type_name,
            }),
            discriminator_value: entity.discriminator_value.clone(),
            attributes,
            joins: Vec::new(),
        }
    }

    fn add_first_pass_value(
        &self,
        entity: &Entity,
        property: &Property,
        persistent: &mut PersistentEntity,
        mapper: &mut MultiPropertyMapper,
    ) -> Result<(), Error> {
        match &property.value {
            PropertyValue::Basic(value) => {
                let mut attributes = Vec::new();
                basic::add_basic(
                    self.cfg,
                    &entity.entity_name,
                    property,
                    value,
                    &mut attributes,
                    Some(mapper),
                )?;
                for attribute in attributes {
                    persistent.add_attribute(attribute);
                }
            }
            PropertyValue::Component(value) if !component_has_relations(value) => {
                let mut attributes = Vec::new();
                component::add_component(
                    self.cfg,
                    &entity.entity_name,
                    property,
                    value,
                    &mut attributes,
                    mapper,
                )?;
                for attribute in attributes {
                    persistent.add_attribute(attribute);
                }
            }
            // relations wait for every entity's id to be known
            PropertyValue::Component(_)
            | PropertyValue::ManyToOne(_)
            | PropertyValue::OneToOne(_)
            | PropertyValue::Collection(_) => {}
        }
        Ok(())
    }

    /// Audits a secondary join only when every property mapped to it is
    /// audited; a partially audited join would version half a row.
    fn add_joins(
        &self,
        entity: &Entity,
        persistent: &mut PersistentEntity,
        mapper: &mut MultiPropertyMapper,
    ) -> Result<(), Error> {
        for join in &entity.joins {
            if join.properties.iter().any(|p| !p.audit.audited) {
                continue;
            }

            let audit_table_name = entity
                .audit
                .secondary_table_names
                .get(&join.table)
                .cloned()
                .unwrap_or_else(|| self.cfg.audit_table_name(&join.table));

            let mut audit_join = AuditJoin::new(&audit_table_name);
            audit_join.schema = join.schema.clone();
            audit_join.catalog = join.catalog.clone();
            audit_join.key_columns = column_names(&join.key_selectables)
                .iter()
                .map(|name| AuditColumn::new(name))
                .collect();
            audit_join
                .key_columns
                .push(AuditColumn::new(&self.cfg.revision_field_name));

            for property in &join.properties {
                match &property.value {
                    PropertyValue::Basic(value) => {
                        basic::add_basic(
                            self.cfg,
                            &entity.entity_name,
                            property,
                            value,
                            &mut audit_join.attributes,
                            Some(mapper),
                        )?;
                    }
                    PropertyValue::Component(value) if !component_has_relations(value) => {
                        component::add_component(
                            self.cfg,
                            &entity.entity_name,
                            property,
                            value,
                            &mut audit_join.attributes,
                            mapper,
                        )?;
                    }
                    _ => {}
                }
            }

            persistent.joins_mut().push(audit_join);
        }
        Ok(())
    }

    // --- second pass ---

    fn second_pass(&mut self, entity: &'a Entity) -> Result<(), Error> {
        if !entity.audit.audited {
            return Ok(());
        }
        let entity_name = &entity.entity_name;

        // take the entity's mapping and mapper out so the registries stay
        // freely borrowable while relations mutate them
        let mut persistent = self.audit_entities.remove(entity_name).ok_or_else(|| {
            MappingError::MissingEntityConfiguration {
                entity: entity_name.clone(),
            }
        })?;
        let mut mapper = self
            .configurations
            .get_mut(entity_name)
            .and_then(|c| c.property_mapper.take())
            .ok_or_else(|| MappingError::MissingEntityConfiguration {
                entity: entity_name.clone(),
            })?;

        let result = self.second_pass_values(entity, &mut persistent, &mut mapper);

        if let Some(configuration) = self.configurations.get_mut(entity_name) {
            configuration.property_mapper = Some(mapper);
        }
        self.audit_entities.insert(entity_name.clone(), persistent);

        result
    }

    fn second_pass_values(
        &mut self,
        entity: &'a Entity,
        persistent: &mut PersistentEntity,
        mapper: &mut MultiPropertyMapper,
    ) -> Result<(), Error> {
        let joined_properties = entity.joins.iter().flat_map(|j| j.properties.iter());
        for property in entity.unjoined_properties().iter().chain(joined_properties) {
            if !property.audit.audited {
                continue;
            }
            match &property.value {
                PropertyValue::ManyToOne(value) => {
                    self.add_many_to_one(entity, property, value, persistent, mapper)?;
                }
                PropertyValue::OneToOne(value) => {
                    self.add_one_to_one(entity, property, value, mapper)?;
                }
                PropertyValue::Collection(collection) => {
                    self.add_collection(entity, property, collection, mapper)?;
                }
                PropertyValue::Component(value) if component_has_relations(value) => {
                    self.add_component_with_relations(entity, property, value, persistent, mapper)?;
                }
                PropertyValue::Basic(_) | PropertyValue::Component(_) => {}
            }
        }
        Ok(())
    }

}

/// Modified-flag facts for one property, with synthetic properties never
/// tracking flags.
fn property_data(cfg: &AuditConfig, property: &Property) -> PropertyData {
    if property.synthetic {
        return PropertyData::synthetic(&property.name);
    }
    let with_flag = property
        .audit
        .with_modified_flag
        .unwrap_or(cfg.global_with_modified_flag);
    let data = PropertyData::new(&property.name, property.access);
    if with_flag {
        data.with_modified_flag(
            cfg.modified_flag_name(&property.name, property.audit.modified_flag_name.as_deref()),
        )
    } else {
        data
    }
}

fn revision_end_timestamp_attribute(field_name: &str) -> Attribute {
    Attribute::Basic(BasicAttribute::new(
        field_name,
        "Timestamp",
        vec![AuditColumn::new(field_name)],
    ))
}

/// Audit columns for a property's selectables. Formulas cannot be audited
/// outside of discriminators.
pub(super) fn audit_columns(
    entity: &str,
    property: &str,
    selectables: &[revtrail_schema::node::Selectable],
) -> Result<Vec<AuditColumn>, Error> {
    if selectables.iter().any(revtrail_schema::node::Selectable::is_formula) {
        return Err(MappingError::FormulaNotSupported {
            entity: entity.to_string(),
            property: property.to_string(),
        }
        .into());
    }
    Ok(column_names(selectables)
        .iter()
        .map(|name| AuditColumn::new(name))
        .collect())
}

/// Whether a component (transitively) contains a relation-valued property.
/// Such components wait for the second pass.
fn component_has_relations(component: &Component) -> bool {
    component.properties.iter().any(|p| match &p.value {
        PropertyValue::ManyToOne(_) | PropertyValue::OneToOne(_) | PropertyValue::Collection(_) => {
            true
        }
        PropertyValue::Component(inner) => component_has_relations(inner),
        PropertyValue::Basic(_) => false,
    })
}

#[cfg(test)]
mod tests;
