use super::{base::MiddleColumnPositions, collection_mapper_kind, last_segment};
use crate::{
    entities::{RelationDescription, RelationType},
    error::{Error, MappingError},
    generator::{audit_columns, property_data, AuditMetadataGenerator, RelationQuery, RelationQueryKind},
    mapper::relation::{CollectionPropertyMapper, CommonCollectionMapperData, MiddleIdData},
    mapper::{MultiPropertyMapper, PropertyMapper},
    mapping::{
        Attribute, AuditColumn, BasicAttribute, CompositeIdentifier, ManyToOneAttribute,
        MiddleAuditEntity,
    },
    trace::BootTraceEvent,
};
use revtrail_schema::node::{Collection, CollectionElement, Entity, Property};

impl AuditMetadataGenerator<'_> {
    /// A collection stored through a middle audit entity: element
    /// collections, join-table associations, and owning unidirectional
    /// one-to-manys.
    pub(super) fn add_with_middle_table(
        &mut self,
        entity: &Entity,
        property: &Property,
        collection: &Collection,
        mapper: &mut MultiPropertyMapper,
    ) -> Result<(), Error> {
        let middle_table_name = self.middle_table_name(entity, property, collection)?;
        let audit_middle_table_name = self.cfg.audit_table_name(&middle_table_name);
        let audit_middle_entity_name = self
            .name_register
            .create_unique(&self.cfg.audit_entity_name(&middle_table_name));
        self.trace.emit(BootTraceEvent::MiddleEntityRegistered {
            owner: &entity.entity_name,
            property: &property.name,
            audit_middle_entity: &audit_middle_entity_name,
        });

        let own = self
            .configurations
            .get(&entity.entity_name)
            .ok_or_else(|| MappingError::MissingEntityConfiguration {
                entity: entity.entity_name.clone(),
            })?;
        let own_audit_name = own.audit_entity_name.clone();
        let own_id_mapping = own.id_mapping.clone();

        let owner_prefix = format!("{}_", last_segment(&entity.entity_name));
        let referencing_id_data = MiddleIdData::new(
            &own_id_mapping.id_mapper,
            &owner_prefix,
            &entity.entity_name,
            &own_audit_name,
            true,
        );

        let mut identifier = CompositeIdentifier::new(&self.cfg.original_id_prop_name);
        let owner_columns = self.owner_key_columns(
            entity,
            property,
            collection,
            &own_id_mapping,
            &owner_prefix,
        )?;
        for attribute in own_id_mapping.prefixed_relation_attributes(&owner_prefix, &owner_columns)
        {
            identifier.add_attribute(attribute);
        }
        identifier.add_revision_info_relation(ManyToOneAttribute::new(
            &self.cfg.revision_field_name,
            &self.cfg.revision_info_entity_name,
            vec![AuditColumn::new(&self.cfg.revision_field_name)],
        ));

        let mut positions = MiddleColumnPositions::default();
        let mut attributes = Vec::new();
        let (element, referenced_audit_entity) = self.middle_element(
            entity,
            property,
            collection,
            &mut identifier,
            &mut attributes,
            &mut positions,
        )?;
        let index =
            self.middle_index(entity, property, collection, &mut identifier, &mut positions)?;

        let revision_type_in_id =
            collection.is_embeddable_element() || collection.is_lob_map_element();
        let ordinal_prop_name = (collection.kind.is_set() && collection.is_embeddable_element())
            .then(|| self.cfg.embeddable_set_ordinal_field_name.clone());

        if let Some(ordinal) = &ordinal_prop_name {
            identifier.add_attribute(Attribute::Basic(
                BasicAttribute::new(ordinal, "Int", vec![AuditColumn::new(ordinal)]).key(),
            ));
        }

        let revision_type_attribute = Attribute::Basic(BasicAttribute::new(
            &self.cfg.revision_type_field_name,
            "RevisionType",
            vec![AuditColumn::new(&self.cfg.revision_type_field_name)],
        ));
        if revision_type_in_id {
            identifier.add_attribute(revision_type_attribute);
        } else {
            attributes.push(revision_type_attribute);
        }
        if let Some(validity) = self.cfg.strategy.as_validity() {
            attributes.push(Attribute::ManyToOne(ManyToOneAttribute::new(
                &validity.revision_end_field_name,
                &self.cfg.revision_info_entity_name,
                vec![AuditColumn::new(&validity.revision_end_field_name)],
            )));
            if validity.revision_end_timestamp {
                attributes.push(Attribute::Basic(BasicAttribute::new(
                    &validity.revision_end_timestamp_field_name,
                    "Timestamp",
                    vec![AuditColumn::new(&validity.revision_end_timestamp_field_name)],
                )));
            }
        }

        let join_table = property.audit.join_table.as_ref();
        self.middle_entities.insert(
            audit_middle_entity_name.clone(),
            MiddleAuditEntity {
                audit_entity_name: audit_middle_entity_name.clone(),
                table_name: audit_middle_table_name,
                schema: join_table
                    .and_then(|j| j.schema.clone())
                    .or_else(|| entity.schema.clone()),
                catalog: join_table
                    .and_then(|j| j.catalog.clone())
                    .or_else(|| entity.catalog.clone()),
                identifier,
                revision_type_in_id,
                attributes,
                where_fragment: collection.where_fragment.clone(),
            },
        );

        self.queries.add(RelationQuery {
            entity_name: entity.entity_name.clone(),
            property_name: property.name.clone(),
            kind: RelationQueryKind::TwoEntity {
                middle_entity_name: audit_middle_entity_name.clone(),
                referenced_audit_entity_name: referenced_audit_entity,
            },
            owner_id_parameters: referencing_id_data
                .prefixed_mapper
                .property_names()
                .into_iter()
                .map(ToString::to_string)
                .collect(),
            revision_type_in_id,
            order_by: collection.order_by.clone(),
        });

        let data = property_data(self.cfg, property);
        mapper.add(
            data.clone(),
            PropertyMapper::Collection(CollectionPropertyMapper {
                common: CommonCollectionMapperData {
                    audit_middle_entity_name: Some(audit_middle_entity_name),
                    property_data: data,
                    referencing_id_data,
                    original_id_prop_name: self.cfg.original_id_prop_name.clone(),
                    revision_type_prop_name: self.cfg.revision_type_field_name.clone(),
                    revision_type_in_id,
                    ordinal_prop_name,
                },
                kind: collection_mapper_kind(collection),
                element,
                index: Some(index),
            }),
        );

        if let Some(referenced_name) = collection.referenced_entity()
            && let Some(configuration) = self.configurations.get_mut(&entity.entity_name)
        {
            configuration.add_relation(RelationDescription {
                from_property_name: property.name.clone(),
                relation_type: if collection.inverse {
                    RelationType::ToManyMiddleNotOwning
                } else {
                    RelationType::ToManyMiddle
                },
                to_entity_name: referenced_name.to_string(),
                mapped_by_property: collection.mapped_by_property.clone(),
                ignore_not_found: false,
                insertable: !collection.inverse,
                bidirectional: collection.mapped_by_property.is_some(),
            });
        }

        Ok(())
    }

    /// The physical table the middle audit entity shadows: an explicit
    /// audit-side override, the live join table, or the owning
    /// unidirectional one-to-many's synthesized `{Owner}_{Referenced}`
    /// name.
    fn middle_table_name(
        &self,
        entity: &Entity,
        property: &Property,
        collection: &Collection,
    ) -> Result<String, Error> {
        if let Some(name) = property.audit.join_table.as_ref().and_then(|j| j.name.clone()) {
            return Ok(name);
        }
        if let Some(table) = &collection.collection_table {
            return Ok(table.clone());
        }
        if let CollectionElement::OneToMany { referenced_entity } = &collection.element {
            return Ok(format!(
                "{}_{}",
                last_segment(&entity.entity_name),
                last_segment(referenced_entity)
            ));
        }
        Err(MappingError::MissingCollectionTable {
            entity: entity.entity_name.clone(),
            property: property.name.clone(),
        }
        .into())
    }

    /// The owner's foreign-key columns in the middle table: live key
    /// columns when the mapping names them, synthesized prefixed id columns
    /// otherwise.
    fn owner_key_columns(
        &self,
        entity: &Entity,
        property: &Property,
        collection: &Collection,
        own_id_mapping: &crate::entities::IdMappingData,
        owner_prefix: &str,
    ) -> Result<Vec<AuditColumn>, Error> {
        let live = audit_columns(
            &entity.entity_name,
            &property.name,
            &collection.key_selectables,
        )?;
        if !live.is_empty() {
            return Ok(live);
        }
        Ok(own_id_mapping
            .relation_attributes
            .iter()
            .flat_map(Attribute::columns)
            .map(|column| AuditColumn::new(&format!("{owner_prefix}{}", column.name)))
            .collect())
    }
}
