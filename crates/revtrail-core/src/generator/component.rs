use super::{audit_columns, basic, property_data, AuditMetadataGenerator};
use crate::{
    config::AuditConfig,
    error::{Error, MappingError},
    mapper::relation::ToOneIdMapper,
    mapper::{ComponentPropertyMapper, MultiPropertyMapper, PropertyMapper},
    mapping::{Attribute, ManyToOneAttribute, PersistentEntity},
};
use revtrail_schema::node::{Component, Entity, Property, PropertyValue};

/// Adds a relation-free component: its basics flatten into the audit
/// mapping under `{component}_{property}` attribute names, and the runtime
/// mapper nests them under the component's row entry. The component tracks
/// one modified flag for the whole value.
pub(super) fn add_component(
    cfg: &AuditConfig,
    entity_name: &str,
    property: &Property,
    component: &Component,
    attributes: &mut Vec<Attribute>,
    mapper: &mut MultiPropertyMapper,
) -> Result<(), Error> {
    let data = property_data(cfg, property);
    let delegate = build_delegate(cfg, entity_name, &property.name, component, attributes)?;

    mapper.add(
        data.clone(),
        PropertyMapper::Component(ComponentPropertyMapper::new(
            data,
            component.class_name.clone(),
            delegate,
        )),
    );

    Ok(())
}

/// The delegate mapper for a component's own properties. Flag processing is
/// off inside components.
pub(super) fn build_delegate(
    cfg: &AuditConfig,
    entity_name: &str,
    component_path: &str,
    component: &Component,
    attributes: &mut Vec<Attribute>,
) -> Result<MultiPropertyMapper, Error> {
    let mut delegate = MultiPropertyMapper::new(false);

    for sub_property in &component.properties {
        if !sub_property.audit.audited {
            continue;
        }
        match &sub_property.value {
            PropertyValue::Basic(value) => {
                let mut sub_attributes = Vec::new();
                basic::add_basic(
                    cfg,
                    entity_name,
                    sub_property,
                    value,
                    &mut sub_attributes,
                    Some(&mut delegate),
                )?;
                for attribute in sub_attributes {
                    let columns = attribute.columns().to_vec();
                    attributes.push(
                        attribute.prefixed(&format!("{component_path}_"), columns),
                    );
                }
            }
            PropertyValue::Component(inner) => {
                let inner_path = format!("{component_path}_{}", sub_property.name);
                let inner_delegate =
                    build_delegate(cfg, entity_name, &inner_path, inner, attributes)?;
                let data = property_data(cfg, sub_property);
                delegate.add(
                    data.clone(),
                    PropertyMapper::Component(ComponentPropertyMapper::new(
                        data,
                        inner.class_name.clone(),
                        inner_delegate,
                    )),
                );
            }
            PropertyValue::ManyToOne(_)
            | PropertyValue::OneToOne(_)
            | PropertyValue::Collection(_) => {
                // the caller routes relation-bearing components elsewhere
                return Err(MappingError::UnsupportedType {
                    entity: entity_name.to_string(),
                    property: format!("{component_path}.{}", sub_property.name),
                    type_name: component.class_name.clone(),
                }
                .into());
            }
        }
    }

    Ok(delegate)
}

impl AuditMetadataGenerator<'_> {
    /// Second-pass path for components holding to-one references alongside
    /// their basics. Collections inside components stay unsupported.
    pub(super) fn add_component_with_relations(
        &mut self,
        entity: &Entity,
        property: &Property,
        component: &Component,
        persistent: &mut PersistentEntity,
        mapper: &mut MultiPropertyMapper,
    ) -> Result<(), Error> {
        let mut delegate = MultiPropertyMapper::new(false);
        let mut attributes = Vec::new();

        for sub_property in &component.properties {
            if !sub_property.audit.audited {
                continue;
            }
            match &sub_property.value {
                PropertyValue::Basic(value) => {
                    let mut sub_attributes = Vec::new();
                    basic::add_basic(
                        self.cfg,
                        &entity.entity_name,
                        sub_property,
                        value,
                        &mut sub_attributes,
                        Some(&mut delegate),
                    )?;
                    for attribute in sub_attributes {
                        let columns = attribute.columns().to_vec();
                        attributes.push(attribute.prefixed(&format!("{}_", property.name), columns));
                    }
                }
                PropertyValue::Component(inner) => {
                    let inner_path = format!("{}_{}", property.name, sub_property.name);
                    let inner_delegate = build_delegate(
                        self.cfg,
                        &entity.entity_name,
                        &inner_path,
                        inner,
                        &mut attributes,
                    )?;
                    let data = property_data(self.cfg, sub_property);
                    delegate.add(
                        data.clone(),
                        PropertyMapper::Component(ComponentPropertyMapper::new(
                            data,
                            inner.class_name.clone(),
                            inner_delegate,
                        )),
                    );
                }
                PropertyValue::ManyToOne(value) => {
                    let referenced =
                        self.referenced_id(entity, sub_property, &value.referenced_entity)?;
                    let columns = audit_columns(
                        &entity.entity_name,
                        &sub_property.name,
                        &value.selectables,
                    )?;

                    let mut attribute = ManyToOneAttribute::new(
                        &format!("{}_{}", property.name, sub_property.name),
                        referenced
                            .audit_entity_name
                            .as_deref()
                            .unwrap_or(&value.referenced_entity),
                        columns,
                    );
                    attribute.insertable = value.insertable;
                    attributes.push(Attribute::ManyToOne(attribute));

                    let data = property_data(self.cfg, sub_property);
                    delegate.add(
                        data.clone(),
                        PropertyMapper::ToOne(ToOneIdMapper::new(
                            referenced
                                .id_mapping
                                .id_mapper
                                .prefixed(&format!("{}_", sub_property.name)),
                            data,
                            &value.referenced_entity,
                            false,
                        )),
                    );
                }
                PropertyValue::OneToOne(_) | PropertyValue::Collection(_) => {
                    return Err(MappingError::UnsupportedType {
                        entity: entity.entity_name.clone(),
                        property: format!("{}.{}", property.name, sub_property.name),
                        type_name: component.class_name.clone(),
                    }
                    .into());
                }
            }
        }

        for attribute in attributes {
            persistent.add_attribute(attribute);
        }

        let data = property_data(self.cfg, property);
        mapper.add(
            data.clone(),
            PropertyMapper::Component(ComponentPropertyMapper::new(
                data,
                component.class_name.clone(),
                delegate,
            )),
        );

        Ok(())
    }
}
