use crate::{
    entities::IdMappingData,
    error::Error,
    mapper::{
        EmbeddedIdMapper, IdMapper, IdPart, MultipleIdMapper, SingleIdMapper,
    },
    mapping::{Attribute, BasicAttribute, ManyToOneAttribute},
};
use super::audit_columns;
use revtrail_schema::node::{Entity, IdShape, PropertyValue};

/// Builds the identifier mapping for an entity, or `None` when the shape is
/// one the audit schema cannot carry. Callers decide whether `None` is fatal
/// (an audited entity) or just means the entity cannot be referenced.
pub(super) fn build_id_mapping(entity: &Entity) -> Result<Option<IdMappingData>, Error> {
    match &entity.identifier {
        IdShape::Single(property) => match &property.value {
            PropertyValue::Basic(value) => {
                let columns = audit_columns(&entity.entity_name, &property.name, &value.selectables)?;
                let attribute = Attribute::Basic(
                    BasicAttribute::new(&property.name, &value.type_name, columns).key(),
                );
                Ok(Some(IdMappingData {
                    id_mapper: IdMapper::Single(SingleIdMapper::new(&property.name)),
                    attributes: vec![attribute.clone()],
                    relation_attributes: vec![attribute],
                }))
            }
            _ => Ok(None),
        },
        IdShape::Composite {
            class_name,
            id_class,
            properties,
        } => {
            let mut parts = Vec::with_capacity(properties.len());
            let mut attributes = Vec::with_capacity(properties.len());

            for property in properties {
                match &property.value {
                    PropertyValue::Basic(value) => {
                        let columns =
                            audit_columns(&entity.entity_name, &property.name, &value.selectables)?;
                        parts.push(IdPart::basic(&property.name));
                        attributes.push(Attribute::Basic(
                            BasicAttribute::new(&property.name, &value.type_name, columns).key(),
                        ));
                    }
                    PropertyValue::ManyToOne(value) => {
                        let columns =
                            audit_columns(&entity.entity_name, &property.name, &value.selectables)?;
                        parts.push(IdPart::relation(&property.name, &value.referenced_entity));
                        attributes.push(Attribute::ManyToOne(ManyToOneAttribute::new(
                            &property.name,
                            &value.referenced_entity,
                            columns,
                        )));
                    }
                    _ => return Ok(None),
                }
            }

            let id_mapper = if *id_class {
                IdMapper::Multiple(MultipleIdMapper { parts })
            } else {
                IdMapper::Embedded(EmbeddedIdMapper {
                    class_name: class_name.clone().unwrap_or_default(),
                    parts,
                })
            };

            Ok(Some(IdMappingData {
                id_mapper,
                attributes: attributes.clone(),
                relation_attributes: attributes,
            }))
        }
    }
}
