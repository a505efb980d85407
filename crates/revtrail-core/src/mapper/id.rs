use crate::value::{AuditRow, Value};
use serde::Serialize;

///
/// IdMapper
///
/// Runtime mapper between identifier values and audit-row entries. One
/// variant per identifier shape; the set is closed, an unsupported shape is
/// rejected during generation instead of surfacing here.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum IdMapper {
    /// A single basic id property.
    Single(SingleIdMapper),

    /// Multiple id properties declared directly on the entity.
    Multiple(MultipleIdMapper),

    /// An embedded id component; the id value is a composite.
    Embedded(EmbeddedIdMapper),
}

impl IdMapper {
    /// Copy of this mapper with every row key prefixed. Used when folding an
    /// owner or element id into a middle table's identifier.
    #[must_use]
    pub fn prefixed(&self, prefix: &str) -> Self {
        match self {
            Self::Single(single) => Self::Single(SingleIdMapper {
                property_name: format!("{prefix}{}", single.property_name),
            }),
            Self::Multiple(multiple) => Self::Multiple(MultipleIdMapper {
                parts: prefixed_parts(prefix, &multiple.parts),
            }),
            Self::Embedded(embedded) => Self::Embedded(EmbeddedIdMapper {
                class_name: embedded.class_name.clone(),
                parts: prefixed_parts(prefix, &embedded.parts),
            }),
        }
    }

    /// Writes the identifier value into a row under this mapper's keys.
    /// A missing id writes nulls, so delete rows keep their column set.
    pub fn map_to_row_from_id(&self, row: &mut AuditRow, id: Option<&Value>) {
        match self {
            Self::Single(single) => {
                row.insert(
                    single.property_name.clone(),
                    id.cloned().unwrap_or(Value::Null),
                );
            }
            Self::Multiple(multiple) => map_parts_to_row(row, &multiple.parts, id),
            Self::Embedded(embedded) => map_parts_to_row(row, &embedded.parts, id),
        }
    }

    /// Reads the identifier value back out of a row. `None` when any part is
    /// missing or null.
    #[must_use]
    pub fn map_to_id_from_row(&self, row: &AuditRow) -> Option<Value> {
        match self {
            Self::Single(single) => match row.get(&single.property_name) {
                None | Some(Value::Null) => None,
                Some(value) => Some(value.clone()),
            },
            Self::Multiple(multiple) => map_parts_to_id(row, &multiple.parts),
            Self::Embedded(embedded) => map_parts_to_id(row, &embedded.parts),
        }
    }

    /// Row keys this mapper owns, in part order.
    #[must_use]
    pub fn property_names(&self) -> Vec<&str> {
        match self {
            Self::Single(single) => vec![single.property_name.as_str()],
            Self::Multiple(multiple) => {
                multiple.parts.iter().map(|p| p.name.as_str()).collect()
            }
            Self::Embedded(embedded) => {
                embedded.parts.iter().map(|p| p.name.as_str()).collect()
            }
        }
    }
}

fn prefixed_parts(prefix: &str, parts: &[IdPart]) -> Vec<IdPart> {
    parts
        .iter()
        .map(|part| IdPart {
            name: format!("{prefix}{}", part.name),
            source: part.source.clone(),
            kind: part.kind.clone(),
        })
        .collect()
}

fn map_parts_to_row(row: &mut AuditRow, parts: &[IdPart], id: Option<&Value>) {
    let fields = id.and_then(Value::as_composite);
    for part in parts {
        let value = fields
            .and_then(|f| f.get(&part.source))
            .cloned()
            .unwrap_or(Value::Null);
        row.insert(part.name.clone(), value);
    }
}

fn map_parts_to_id(row: &AuditRow, parts: &[IdPart]) -> Option<Value> {
    let mut fields = std::collections::BTreeMap::new();
    for part in parts {
        match row.get(&part.name) {
            None | Some(Value::Null) => return None,
            Some(value) => {
                fields.insert(part.source.clone(), value.clone());
            }
        }
    }
    Some(Value::Composite(fields))
}

///
/// SingleIdMapper
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SingleIdMapper {
    pub property_name: String,
}

impl SingleIdMapper {
    #[must_use]
    pub fn new(property_name: &str) -> Self {
        Self {
            property_name: property_name.to_string(),
        }
    }
}

///
/// MultipleIdMapper
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MultipleIdMapper {
    pub parts: Vec<IdPart>,
}

///
/// EmbeddedIdMapper
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct EmbeddedIdMapper {
    pub class_name: String,
    pub parts: Vec<IdPart>,
}

///
/// IdPart
///
/// One property of a composite identifier. `name` is the (possibly
/// prefixed) row key; `source` is the unprefixed property name indexing
/// into the composite id value, and survives prefixing unchanged.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct IdPart {
    pub name: String,
    pub source: String,
    pub kind: IdPartKind,
}

impl IdPart {
    #[must_use]
    pub fn basic(name: &str) -> Self {
        Self {
            name: name.to_string(),
            source: name.to_string(),
            kind: IdPartKind::Basic,
        }
    }

    #[must_use]
    pub fn relation(name: &str, referenced_entity: &str) -> Self {
        Self {
            name: name.to_string(),
            source: name.to_string(),
            kind: IdPartKind::Relation {
                referenced_entity: referenced_entity.to_string(),
            },
        }
    }
}

///
/// IdPartKind
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum IdPartKind {
    Basic,
    Relation { referenced_entity: String },
}
