//! The generated audit metadata and the runtime entry points built on it:
//! audit-row projection, modified-flag lookup and collection diffing.

use crate::{
    config::AuditConfig,
    entities::{EntitiesConfigurations, EntityConfiguration},
    error::{Error, MappingError, ModifiedFlagError},
    generator::{AuditMetadataGenerator, RelationQuery},
    mapper::{relation::PersistentCollectionChangeData, IdMapper, PropertyMapper},
    mapping::{MiddleAuditEntity, PersistentEntity},
    revision::RevisionType,
    trace::{BootTrace, BootTraceSink},
    value::{AuditRow, EntityState, Value},
};
use revtrail_schema::node::MappingModel;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// AuditMetadata
///
/// Everything the two generation passes produced, owned as one value. The
/// audit entities are keyed by live entity name, the middle entities by
/// their own audit entity name.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuditMetadata {
    pub configurations: EntitiesConfigurations,
    pub audit_entities: BTreeMap<String, PersistentEntity>,
    pub middle_entities: BTreeMap<String, MiddleAuditEntity>,
    pub relation_queries: Vec<RelationQuery>,
    pub revision_info_entity_name: String,
    pub original_id_prop_name: String,
    pub revision_type_prop_name: String,

    /// Whether delete revisions keep the entity's last data in the row.
    pub store_data_at_delete: bool,
}

impl AuditMetadata {
    /// Runs both generation passes over a validated mapping model.
    pub fn generate(cfg: &AuditConfig, model: &MappingModel) -> Result<Self, Error> {
        AuditMetadataGenerator::new(cfg, model, BootTrace::disabled()).generate()
    }

    /// Same, with bootstrap events reported to the given sink.
    pub fn generate_traced(
        cfg: &AuditConfig,
        model: &MappingModel,
        sink: &dyn BootTraceSink,
    ) -> Result<Self, Error> {
        AuditMetadataGenerator::new(cfg, model, BootTrace::new(Some(sink))).generate()
    }

    #[must_use]
    pub fn is_audited(&self, entity_name: &str) -> bool {
        self.configurations.is_audited(entity_name)
    }

    #[must_use]
    pub fn audit_entity_name(&self, entity_name: &str) -> Option<&str> {
        self.configurations
            .get(entity_name)
            .map(|c| c.audit_entity_name.as_str())
    }

    #[must_use]
    pub fn audit_entity(&self, entity_name: &str) -> Option<&PersistentEntity> {
        self.audit_entities.get(entity_name)
    }

    #[must_use]
    pub fn middle_entity(&self, audit_entity_name: &str) -> Option<&MiddleAuditEntity> {
        self.middle_entities.get(audit_entity_name)
    }

    #[must_use]
    pub fn id_mapper(&self, entity_name: &str) -> Option<&IdMapper> {
        self.configurations
            .get(entity_name)
            .map(|c| &c.id_mapping.id_mapper)
    }

    pub fn relation_queries_for(
        &self,
        entity_name: &str,
    ) -> impl Iterator<Item = &RelationQuery> {
        self.relation_queries
            .iter()
            .filter(move |q| q.entity_name == entity_name)
    }

    /// The modified-flag row key tracking a property, walking inherited
    /// properties up the entity's parent chain.
    pub fn modified_flag_column(
        &self,
        entity_name: &str,
        property_name: &str,
    ) -> Result<String, ModifiedFlagError> {
        if !self.configurations.is_audited(entity_name) {
            return Err(ModifiedFlagError::NotAudited {
                entity: entity_name.to_string(),
            });
        }

        let mut current = self.configurations.get(entity_name);
        while let Some(configuration) = current {
            if let Some(mapper) = &configuration.property_mapper
                && let Some(data) = mapper.property_data(property_name)
            {
                return data.modified_flag_name.clone().ok_or_else(|| {
                    ModifiedFlagError::NotTracked {
                        entity: entity_name.to_string(),
                        property: property_name.to_string(),
                    }
                });
            }
            current = configuration
                .parent_entity_name
                .as_deref()
                .and_then(|parent| self.configurations.get(parent));
        }

        Err(ModifiedFlagError::UnknownProperty {
            entity: entity_name.to_string(),
            property: property_name.to_string(),
        })
    }

    /// Projects one revision of an entity into its audit row and reports
    /// whether any property changed.
    ///
    /// The row carries the revision type, the composite original id (the
    /// revision number itself is assigned by persistence, not here) and,
    /// when state is given, every mapped property with its modified flags.
    /// Insert revisions (no old state) mark every property changed. Delete
    /// revisions keep the row to id plus revision type, unless
    /// `store_data_at_delete` is set, in which case the last known state is
    /// mapped in.
    pub fn map_to_audit_row(
        &self,
        entity_name: &str,
        revision_type: RevisionType,
        id: Option<&Value>,
        new_state: Option<&EntityState>,
        old_state: Option<&EntityState>,
    ) -> Result<(AuditRow, bool), Error> {
        let chain = self.configuration_chain(entity_name)?;

        let state = if revision_type == RevisionType::Del && self.store_data_at_delete {
            new_state.or(old_state)
        } else {
            new_state
        };

        let mut row = AuditRow::new();
        let mut changed = old_state.is_none();
        if let Some(state) = state {
            for configuration in &chain {
                if let Some(mapper) = &configuration.property_mapper {
                    changed |= mapper.map(&mut row, state, old_state);
                }
            }
        }

        row.insert(
            self.revision_type_prop_name.clone(),
            Value::Int(i64::from(revision_type.as_i16())),
        );

        let id_mapper = &chain[0].id_mapping.id_mapper;
        let id_value = id.cloned().or_else(|| {
            new_state
                .or(old_state)
                .and_then(|state| id_mapper.map_to_id_from_row(state))
        });
        let mut original_id = AuditRow::new();
        id_mapper.map_to_row_from_id(&mut original_id, id_value.as_ref());
        row.insert(
            self.original_id_prop_name.clone(),
            Value::Composite(original_id),
        );

        Ok((row, changed))
    }

    /// Middle-table audit rows for one collection property's transition
    /// between revisions. Properties mapped without a middle entity, and
    /// non-collection properties, yield nothing.
    #[must_use]
    pub fn collection_changes(
        &self,
        entity_name: &str,
        property_name: &str,
        owner_id: &Value,
        new: Option<&Value>,
        old: Option<&Value>,
    ) -> Vec<PersistentCollectionChangeData> {
        self.property_mapper(entity_name, property_name)
            .and_then(PropertyMapper::as_collection)
            .map(|mapper| mapper.collection_changes(owner_id, new, old))
            .unwrap_or_default()
    }

    /// The mapper for one property, walking the parent chain for inherited
    /// properties.
    #[must_use]
    pub fn property_mapper(
        &self,
        entity_name: &str,
        property_name: &str,
    ) -> Option<&PropertyMapper> {
        let mut current = self.configurations.get(entity_name);
        while let Some(configuration) = current {
            if let Some(mapper) = configuration
                .property_mapper
                .as_ref()
                .and_then(|m| m.get(property_name))
            {
                return Some(mapper);
            }
            current = configuration
                .parent_entity_name
                .as_deref()
                .and_then(|parent| self.configurations.get(parent));
        }
        None
    }

    /// Configurations from the entity to its root, leaf first.
    fn configuration_chain(
        &self,
        entity_name: &str,
    ) -> Result<Vec<&EntityConfiguration>, Error> {
        let mut chain = Vec::new();
        let mut current = Some(entity_name);
        while let Some(name) = current {
            let configuration = self.configurations.get(name).ok_or_else(|| {
                MappingError::MissingEntityConfiguration {
                    entity: name.to_string(),
                }
            })?;
            chain.push(configuration);
            current = configuration.parent_entity_name.as_deref();
        }
        Ok(chain)
    }
}
