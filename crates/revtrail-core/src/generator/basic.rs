use super::{audit_columns, property_data};
use crate::{
    config::AuditConfig,
    error::Error,
    mapper::{MultiPropertyMapper, PropertyMapper, SinglePropertyMapper},
    mapping::{Attribute, BasicAttribute},
};
use revtrail_schema::node::{BasicValue, Property};

/// Adds one basic property: an attribute in the audit mapping and, when a
/// mapper is given, a value mapper with its modified-flag facts.
pub(super) fn add_basic(
    cfg: &AuditConfig,
    entity_name: &str,
    property: &Property,
    value: &BasicValue,
    attributes: &mut Vec<Attribute>,
    mapper: Option<&mut MultiPropertyMapper>,
) -> Result<(), Error> {
    let columns = audit_columns(entity_name, &property.name, &value.selectables)?;

    let mut attribute = BasicAttribute::new(&property.name, &value.type_name, columns);
    attribute.insertable = property.insertable;
    attributes.push(Attribute::Basic(attribute));

    if let Some(mapper) = mapper {
        let data = property_data(cfg, property);
        mapper.add(
            data.clone(),
            PropertyMapper::Single(SinglePropertyMapper::new(data)),
        );
    }

    Ok(())
}
