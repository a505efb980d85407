use super::{audit_columns, property_data, AuditMetadataGenerator, RelationQuery, RelationQueryKind};
use crate::{
    entities::{IdMappingData, RelationDescription, RelationType},
    error::{Error, MappingError},
    mapper::{MultiPropertyMapper, PropertyMapper},
    mapper::relation::{OneToOneNotOwningMapper, OneToOnePrimaryKeyJoinColumnMapper, ToOneIdMapper},
    mapping::{Attribute, ManyToOneAttribute, PersistentEntity},
    trace::BootTraceEvent,
};
use revtrail_schema::{
    node::{Entity, ManyToOne, OneToOne, Property},
    types::{RelationTargetAuditMode, RelationTargetNotFoundAction},
};

/// The referenced side of a relation, as resolved against the registries.
pub(super) struct ReferencedId {
    pub id_mapping: IdMappingData,
    pub audit_entity_name: Option<String>,
    pub audited: bool,
}

impl AuditMetadataGenerator<'_> {
    pub(super) fn add_many_to_one(
        &mut self,
        entity: &Entity,
        property: &Property,
        value: &ManyToOne,
        persistent: &mut PersistentEntity,
        mapper: &mut MultiPropertyMapper,
    ) -> Result<(), Error> {
        let referenced = self.referenced_id(entity, property, &value.referenced_entity)?;
        let columns = audit_columns(&entity.entity_name, &property.name, &value.selectables)?;

        let mut attribute = ManyToOneAttribute::new(
            &property.name,
            referenced
                .audit_entity_name
                .as_deref()
                .unwrap_or(&value.referenced_entity),
            columns,
        );
        attribute.insertable = value.insertable;
        persistent.add_attribute(Attribute::ManyToOne(attribute));

        let prefix = format!("{}_", property.name);
        let data = property_data(self.cfg, property);
        mapper.add(
            data.clone(),
            PropertyMapper::ToOne(ToOneIdMapper::new(
                referenced.id_mapping.id_mapper.prefixed(&prefix),
                data,
                &value.referenced_entity,
                false,
            )),
        );

        let ignore_not_found =
            self.resolve_not_found_ignored(value.ignore_not_found, property.audit.not_found_action);
        if let Some(configuration) = self.configurations.get_mut(&entity.entity_name) {
            configuration.add_relation(RelationDescription {
                from_property_name: property.name.clone(),
                relation_type: RelationType::ToOne,
                to_entity_name: value.referenced_entity.clone(),
                mapped_by_property: None,
                ignore_not_found,
                insertable: value.insertable,
                bidirectional: false,
            });
        }

        Ok(())
    }

    pub(super) fn add_one_to_one(
        &mut self,
        entity: &Entity,
        property: &Property,
        value: &OneToOne,
        mapper: &mut MultiPropertyMapper,
    ) -> Result<(), Error> {
        let referenced = self.referenced_id(entity, property, &value.referenced_entity)?;
        let data = property_data(self.cfg, property);

        let (relation_type, mapped_by) = match &value.referenced_property {
            Some(mapped_by) => {
                mapper.add(
                    data.clone(),
                    PropertyMapper::OneToOneNotOwning(OneToOneNotOwningMapper {
                        property_data: data,
                        owning_referenced_entity: value.referenced_entity.clone(),
                        mapped_by_property: mapped_by.clone(),
                    }),
                );

                // the owning side's foreign key columns carry this relation
                if let Some(audit_entity_name) = &referenced.audit_entity_name {
                    let own_id_mapper = self
                        .configurations
                        .get(&entity.entity_name)
                        .map(|c| c.id_mapping.id_mapper.clone())
                        .ok_or_else(|| MappingError::MissingEntityConfiguration {
                            entity: entity.entity_name.clone(),
                        })?;
                    let parameters = own_id_mapper
                        .prefixed(&format!("{mapped_by}_"))
                        .property_names()
                        .into_iter()
                        .map(ToString::to_string)
                        .collect();
                    self.queries.add(RelationQuery {
                        entity_name: entity.entity_name.clone(),
                        property_name: property.name.clone(),
                        kind: RelationQueryKind::OneAuditEntity {
                            audit_entity_name: audit_entity_name.clone(),
                        },
                        owner_id_parameters: parameters,
                        revision_type_in_id: false,
                        order_by: None,
                    });
                }

                (RelationType::ToOneNotOwning, Some(mapped_by.clone()))
            }
            None => {
                mapper.add(
                    data.clone(),
                    PropertyMapper::OneToOnePrimaryKeyJoin(OneToOnePrimaryKeyJoinColumnMapper {
                        property_data: data,
                        referenced_entity: value.referenced_entity.clone(),
                    }),
                );
                (RelationType::ToOne, None)
            }
        };

        if let Some(configuration) = self.configurations.get_mut(&entity.entity_name) {
            configuration.add_relation(RelationDescription {
                from_property_name: property.name.clone(),
                relation_type,
                to_entity_name: value.referenced_entity.clone(),
                mapped_by_property: mapped_by,
                ignore_not_found: false,
                insertable: true,
                bidirectional: value.referenced_property.is_some(),
            });
        }

        Ok(())
    }

    /// Resolves the referenced entity's id mapping, honoring the explicit
    /// not-audited-target opt-in.
    pub(super) fn referenced_id(
        &self,
        entity: &Entity,
        property: &Property,
        referenced_entity: &str,
    ) -> Result<ReferencedId, Error> {
        if let Some(configuration) = self.configurations.get(referenced_entity) {
            return Ok(ReferencedId {
                id_mapping: configuration.id_mapping.clone(),
                audit_entity_name: Some(configuration.audit_entity_name.clone()),
                audited: true,
            });
        }

        if property.audit.target_audit_mode == RelationTargetAuditMode::NotAudited {
            let configuration = self
                .configurations
                .not_audited(referenced_entity)
                .ok_or_else(|| MappingError::MissingEntityConfiguration {
                    entity: referenced_entity.to_string(),
                })?;
            self.trace.emit(BootTraceEvent::NotAuditedTargetIgnored {
                entity: &entity.entity_name,
                property: &property.name,
                referenced_entity,
            });
            return Ok(ReferencedId {
                id_mapping: configuration.id_mapping.clone(),
                audit_entity_name: None,
                audited: false,
            });
        }

        Err(MappingError::NotAuditedTarget {
            entity: entity.entity_name.clone(),
            property: property.name.clone(),
            referenced_entity: referenced_entity.to_string(),
            allow_not_audited_target: self.model.entity_binding(referenced_entity).is_some(),
        }
        .into())
    }

    /// Under the legacy switch the live mapping's ignore-not-found opt-in
    /// decides; otherwise only an explicit audit-side request does.
    pub(super) fn resolve_not_found_ignored(
        &self,
        mapping_ignore_not_found: bool,
        action: RelationTargetNotFoundAction,
    ) -> bool {
        match action {
            RelationTargetNotFoundAction::Ignore => true,
            RelationTargetNotFoundAction::Error => false,
            RelationTargetNotFoundAction::Default => {
                self.cfg.global_legacy_relation_target_not_found && mapping_ignore_not_found
            }
        }
    }
}
