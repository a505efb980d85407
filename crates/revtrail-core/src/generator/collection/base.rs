use super::last_segment;
use crate::{
    error::{Error, MappingError},
    generator::{audit_columns, component, AuditMetadataGenerator},
    mapper::relation::{MiddleComponentData, MiddleComponentMapper},
    mapping::{Attribute, AuditColumn, BasicAttribute, CompositeIdentifier},
};
use revtrail_schema::{
    node::{Collection, CollectionElement, Entity, ManyToOne, Property, PropertyValue},
    types::BasicKind,
};

///
/// MiddleColumnPositions
///
/// Running position counter for the components of one middle identifier.
///

#[derive(Debug, Default)]
pub(super) struct MiddleColumnPositions {
    next: usize,
}

impl MiddleColumnPositions {
    pub(super) fn next(&mut self) -> usize {
        let position = self.next;
        self.next += 1;
        position
    }
}

impl AuditMetadataGenerator<'_> {
    /// Adds the element slice of a middle identifier and returns its
    /// component data plus the referenced audit entity, when the element is
    /// an entity.
    pub(super) fn middle_element(
        &mut self,
        entity: &Entity,
        property: &Property,
        collection: &Collection,
        identifier: &mut CompositeIdentifier,
        attributes: &mut Vec<Attribute>,
        positions: &mut MiddleColumnPositions,
    ) -> Result<(MiddleComponentData, Option<String>), Error> {
        match &collection.element {
            CollectionElement::ManyToOne(_) | CollectionElement::OneToMany { .. } => {
                let referenced_name = collection.referenced_entity().ok_or_else(|| {
                    MappingError::UnresolvedMappedBy {
                        property: property.name.clone(),
                        referenced_class: entity.class_name.clone(),
                    }
                })?;
                let referenced = self.referenced_id(entity, property, referenced_name)?;
                let prefix = format!("{}_", last_segment(referenced_name));

                let columns = element_columns(property, &referenced, &prefix);
                for attribute in referenced
                    .id_mapping
                    .prefixed_relation_attributes(&prefix, &columns)
                {
                    identifier.add_attribute(attribute);
                }

                Ok((
                    MiddleComponentData::new(
                        MiddleComponentMapper::RelatedId {
                            id_mapper: referenced.id_mapping.id_mapper.prefixed(&prefix),
                        },
                        positions.next(),
                    ),
                    referenced.audit_entity_name,
                ))
            }
            CollectionElement::Basic(value) => {
                let columns =
                    audit_columns(&entity.entity_name, &property.name, &value.selectables)?;
                let property_name = columns
                    .first()
                    .map_or_else(|| "element".to_string(), |c| c.name.clone());
                let attribute = BasicAttribute::new(
                    &property_name,
                    &value.type_name,
                    vec![AuditColumn::new(&property_name)],
                );

                // a LOB map value cannot key the middle table; its column
                // stays outside the id and the revision type moves in
                if collection.is_lob_map_element() {
                    attributes.push(Attribute::Basic(attribute));
                    return Ok((
                        MiddleComponentData::new(
                            MiddleComponentMapper::NotKey { property_name },
                            positions.next(),
                        ),
                        None,
                    ));
                }

                identifier.add_attribute(Attribute::Basic(attribute.key()));
                Ok((
                    MiddleComponentData::new(
                        MiddleComponentMapper::Simple { property_name },
                        positions.next(),
                    ),
                    None,
                ))
            }
            CollectionElement::Component(value) => {
                let mut attributes = Vec::new();
                let delegate = component::build_delegate(
                    self.cfg,
                    &entity.entity_name,
                    &property.name,
                    value,
                    &mut attributes,
                )?;
                for attribute in attributes {
                    identifier.add_attribute(attribute);
                }

                Ok((
                    MiddleComponentData::new(
                        MiddleComponentMapper::Embeddable { delegate },
                        positions.next(),
                    ),
                    None,
                ))
            }
        }
    }

    /// Adds the index slice of a middle identifier. Indexless collections
    /// get the explicit `NoIndex` component.
    pub(super) fn middle_index(
        &mut self,
        entity: &Entity,
        property: &Property,
        collection: &Collection,
        identifier: &mut CompositeIdentifier,
        positions: &mut MiddleColumnPositions,
    ) -> Result<MiddleComponentData, Error> {
        if collection.kind.is_map() {
            return self.middle_map_key(entity, property, collection, identifier, positions);
        }

        if collection.kind.is_indexed() {
            let property_name = index_column_name(collection);
            identifier.add_attribute(Attribute::Basic(
                BasicAttribute::new(
                    &property_name,
                    "Int",
                    vec![AuditColumn::new(&property_name)],
                )
                .key(),
            ));
            return Ok(MiddleComponentData::new(
                MiddleComponentMapper::Simple { property_name },
                positions.next(),
            ));
        }

        Ok(MiddleComponentData::new(
            MiddleComponentMapper::NoIndex,
            positions.next(),
        ))
    }

    /// Map keys honor the key hint: no hint maps the key value itself,
    /// an empty hint takes the element entity's id, a named hint takes a
    /// property of the element entity (its own column only for enums).
    fn middle_map_key(
        &mut self,
        entity: &Entity,
        property: &Property,
        collection: &Collection,
        identifier: &mut CompositeIdentifier,
        positions: &mut MiddleColumnPositions,
    ) -> Result<MiddleComponentData, Error> {
        match property.audit.map_key.as_deref() {
            None => {
                if let Some(PropertyValue::ManyToOne(value)) = collection.index.as_ref() {
                    return self.middle_entity_map_key(entity, property, value, identifier, positions);
                }

                let property_name = index_column_name(collection);
                let type_name = collection
                    .index
                    .as_ref()
                    .and_then(PropertyValue::as_basic)
                    .map_or("Text", |b| b.type_name.as_str());
                identifier.add_attribute(Attribute::Basic(
                    BasicAttribute::new(
                        &property_name,
                        type_name,
                        vec![AuditColumn::new(&property_name)],
                    )
                    .key(),
                ));
                Ok(MiddleComponentData::new(
                    MiddleComponentMapper::Simple { property_name },
                    positions.next(),
                ))
            }
            Some("") => Ok(MiddleComponentData::new(
                MiddleComponentMapper::MapKeyId,
                positions.next(),
            )),
            Some(key_property) => {
                let mapper = if self.is_enum_property(collection, key_property) {
                    let property_name = key_property.to_string();
                    identifier.add_attribute(Attribute::Basic(
                        BasicAttribute::new(
                            &property_name,
                            "Enum",
                            vec![AuditColumn::new(&property_name)],
                        )
                        .key(),
                    ));
                    MiddleComponentMapper::MapKeyEnumerated {
                        property_name,
                    }
                } else {
                    MiddleComponentMapper::MapKeyProperty {
                        property_name: key_property.to_string(),
                    }
                };
                Ok(MiddleComponentData::new(mapper, positions.next()))
            }
        }
    }

    /// An entity-valued map key: the key entity's id flattens into the
    /// middle identifier under the `mapkey_` prefix, the same way entity
    /// elements do.
    fn middle_entity_map_key(
        &mut self,
        entity: &Entity,
        property: &Property,
        value: &ManyToOne,
        identifier: &mut CompositeIdentifier,
        positions: &mut MiddleColumnPositions,
    ) -> Result<MiddleComponentData, Error> {
        let referenced = self.referenced_id(entity, property, &value.referenced_entity)?;
        let prefix = "mapkey_";

        let explicit = audit_columns(&entity.entity_name, &property.name, &value.selectables)?;
        let columns = if explicit.is_empty() {
            referenced
                .id_mapping
                .relation_attributes
                .iter()
                .flat_map(Attribute::columns)
                .map(|column| AuditColumn::new(&format!("{prefix}{}", column.name)))
                .collect()
        } else {
            explicit
        };
        for attribute in referenced
            .id_mapping
            .prefixed_relation_attributes(prefix, &columns)
        {
            identifier.add_attribute(attribute);
        }

        Ok(MiddleComponentData::new(
            MiddleComponentMapper::RelatedId {
                id_mapper: referenced.id_mapping.id_mapper.prefixed(prefix),
            },
            positions.next(),
        ))
    }

    fn is_enum_property(&self, collection: &Collection, property_name: &str) -> bool {
        collection
            .referenced_entity()
            .and_then(|name| self.model.entity_binding(name))
            .and_then(|referenced| referenced.get_property(property_name))
            .and_then(|p| p.value.as_basic())
            .is_some_and(|basic| basic.kind == BasicKind::Enum)
    }
}

fn element_columns(
    property: &Property,
    referenced: &crate::generator::to_one::ReferencedId,
    prefix: &str,
) -> Vec<AuditColumn> {
    let explicit: Vec<AuditColumn> = property
        .audit
        .join_table
        .as_ref()
        .map(|j| j.inverse_join_columns.iter().map(|c| AuditColumn::new(c)).collect())
        .unwrap_or_default();
    if !explicit.is_empty() {
        return explicit;
    }

    // default inverse join columns: prefixed id columns of the target
    referenced
        .id_mapping
        .relation_attributes
        .iter()
        .flat_map(Attribute::columns)
        .map(|column| AuditColumn::new(&format!("{prefix}{}", column.name)))
        .collect()
}

pub(super) fn index_column_name(collection: &Collection) -> String {
    collection
        .index
        .as_ref()
        .map(PropertyValue::selectables)
        .and_then(|selectables| {
            selectables
                .first()
                .and_then(revtrail_schema::node::Selectable::as_column)
                .map(|c| c.name.clone())
        })
        .unwrap_or_else(|| "mapkey".to_string())
}
