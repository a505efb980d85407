use super::collection_mapper_kind;
use crate::{
    error::{Error, MappingError},
    generator::{property_data, AuditMetadataGenerator, RelationQuery, RelationQueryKind},
    mapper::relation::{
        CollectionPropertyMapper, CommonCollectionMapperData, MiddleComponentData,
        MiddleComponentMapper, MiddleIdData, ToOneIdMapper,
    },
    mapper::{MultiPropertyMapper, PropertyMapper, SinglePropertyMapper},
    entities::{PropertyData, RelationDescription, RelationType},
};
use revtrail_schema::node::{Collection, Entity, Property};

impl AuditMetadataGenerator<'_> {
    /// A collection whose rows live on the referenced entity's own audit
    /// table. No middle entity exists; the query keys the target's audit
    /// rows back by the owning property's foreign-key columns.
    pub(super) fn add_one_to_many_attached(
        &mut self,
        entity: &Entity,
        property: &Property,
        collection: &Collection,
        mapped_by: &str,
        mapper: &mut MultiPropertyMapper,
    ) -> Result<(), Error> {
        let referenced_name = collection.referenced_entity().ok_or_else(|| {
            MappingError::UnresolvedMappedBy {
                property: property.name.clone(),
                referenced_class: entity.class_name.clone(),
            }
        })?;
        let referenced = self.referenced_id(entity, property, referenced_name)?;
        let Some(referenced_audit_name) = referenced.audit_entity_name.clone() else {
            // attached collections cannot target a not-audited entity
            return Err(MappingError::NotAuditedTarget {
                entity: entity.entity_name.clone(),
                property: property.name.clone(),
                referenced_entity: referenced_name.to_string(),
                allow_not_audited_target: false,
            }
            .into());
        };

        let own = self
            .configurations
            .get(&entity.entity_name)
            .ok_or_else(|| MappingError::MissingEntityConfiguration {
                entity: entity.entity_name.clone(),
            })?;
        let own_audit_name = own.audit_entity_name.clone();
        let own_id_mapper = own.id_mapping.id_mapper.clone();

        let owner_prefix = format!("{mapped_by}_");
        let referencing_id_data = MiddleIdData::new(
            &own_id_mapper,
            &owner_prefix,
            &entity.entity_name,
            &own_audit_name,
            true,
        );

        // a redirect through audit-mapped-by fakes the bidirectionality on
        // the referenced side
        let fake_bidirectional = property.audit.audit_mapped_by.is_some();
        if fake_bidirectional {
            self.add_fake_bidirectional(
                entity,
                property,
                referenced_name,
                mapped_by,
                &own_id_mapper,
                &owner_prefix,
                mapper,
            );
        }

        self.queries.add(RelationQuery {
            entity_name: entity.entity_name.clone(),
            property_name: property.name.clone(),
            kind: RelationQueryKind::OneAuditEntity {
                audit_entity_name: referenced_audit_name,
            },
            owner_id_parameters: referencing_id_data
                .prefixed_mapper
                .property_names()
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            revision_type_in_id: false,
            order_by: collection.order_by.clone(),
        });

        // indexed collections read the position off the referenced entity,
        // either through the explicit redirect or the live index column
        let index = property
            .audit
            .position_mapped_by
            .as_ref()
            .map(|position| {
                MiddleComponentData::new(
                    MiddleComponentMapper::Straight {
                        property_name: position.clone(),
                    },
                    1,
                )
            })
            .or_else(|| {
                collection.kind.is_indexed().then(|| {
                    MiddleComponentData::new(
                        MiddleComponentMapper::Straight {
                            property_name: super::base::index_column_name(collection),
                        },
                        1,
                    )
                })
            });

        let data = property_data(self.cfg, property);
        mapper.add(
            data.clone(),
            PropertyMapper::Collection(CollectionPropertyMapper {
                common: CommonCollectionMapperData {
                    audit_middle_entity_name: None,
                    property_data: data,
                    referencing_id_data,
                    original_id_prop_name: self.cfg.original_id_prop_name.clone(),
                    revision_type_prop_name: self.cfg.revision_type_field_name.clone(),
                    revision_type_in_id: false,
                    ordinal_prop_name: None,
                },
                kind: collection_mapper_kind(collection),
                element: MiddleComponentData::new(
                    MiddleComponentMapper::RelatedId {
                        id_mapper: referenced.id_mapping.id_mapper.clone(),
                    },
                    0,
                ),
                index,
            }),
        );

        if let Some(configuration) = self.configurations.get_mut(&entity.entity_name) {
            configuration.add_relation(RelationDescription {
                from_property_name: property.name.clone(),
                relation_type: RelationType::ToManyNotOwning,
                to_entity_name: referenced_name.to_string(),
                mapped_by_property: Some(mapped_by.to_string()),
                ignore_not_found: false,
                insertable: true,
                bidirectional: !fake_bidirectional,
            });
        }

        Ok(())
    }

    /// Installs the owner-column mappers on the referenced entity: the
    /// foreign key and position are written from the owning collection, so
    /// their values never insert directly.
    #[allow(clippy::too_many_arguments)]
    fn add_fake_bidirectional(
        &mut self,
        entity: &Entity,
        property: &Property,
        referenced_name: &str,
        mapped_by: &str,
        own_id_mapper: &crate::mapper::IdMapper,
        owner_prefix: &str,
        own_mapper: &mut MultiPropertyMapper,
    ) {
        let fake_data = PropertyData::synthetic(mapped_by);
        let fake_mapper = PropertyMapper::ToOne(ToOneIdMapper::new(
            own_id_mapper.prefixed(owner_prefix),
            fake_data.clone(),
            &entity.entity_name,
            true,
        ));

        let position_entry = property.audit.position_mapped_by.as_ref().map(|position| {
            let position_data = PropertyData::synthetic(position);
            (
                position_data.clone(),
                PropertyMapper::Single(SinglePropertyMapper::new(position_data)),
            )
        });

        if referenced_name == entity.entity_name {
            // self-referencing collection: the referenced mapper is the one
            // currently taken out
            own_mapper.add(fake_data, fake_mapper);
            if let Some((position_data, position_mapper)) = position_entry {
                own_mapper.add(position_data, position_mapper);
            }
        } else if let Some(configuration) = self.configurations.get_mut(referenced_name)
            && let Some(referenced_mapper) = configuration.property_mapper.as_mut()
        {
            referenced_mapper.add(fake_data, fake_mapper);
            if let Some((position_data, position_mapper)) = position_entry {
                referenced_mapper.add(position_data, position_mapper);
            }
        }
    }
}
