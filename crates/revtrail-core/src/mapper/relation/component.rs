use crate::{
    mapper::{IdMapper, MultiPropertyMapper},
    value::{AuditRow, EntityState, Value},
};
use serde::Serialize;

///
/// MiddleComponentData
///
/// One component of a middle-table identifier: the mapper plus the position
/// of its columns within the table, in declaration order.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MiddleComponentData {
    pub mapper: MiddleComponentMapper,
    pub position: usize,
}

impl MiddleComponentData {
    #[must_use]
    pub const fn new(mapper: MiddleComponentMapper, position: usize) -> Self {
        Self { mapper, position }
    }
}

///
/// MiddleComponentMapper
///
/// How one slice of a middle-table row is written from a collection element
/// or index value. The set is closed; `NoIndex` makes the "this collection
/// has no index columns" case explicit instead of leaving a hole.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum MiddleComponentMapper {
    /// The target entity's id, prefixed, as the element reference.
    RelatedId { id_mapper: IdMapper },

    /// An embeddable element, flattened through its own property mappers.
    Embeddable { delegate: MultiPropertyMapper },

    /// A basic element or index value under a single key column.
    Simple { property_name: String },

    /// A basic element too large to key on (LOB map values). The column
    /// stays outside the composite id; the revision type moves in instead.
    NotKey { property_name: String },

    /// A value stored under the property name outside the key columns.
    Straight { property_name: String },

    /// Map key taken from the element entity's identifier. No columns of
    /// its own; the element columns already determine the key.
    MapKeyId,

    /// Map key taken from a property of the element entity. No columns of
    /// its own.
    MapKeyProperty { property_name: String },

    /// Enumerated map key stored under its own column.
    MapKeyEnumerated { property_name: String },

    /// Indexless collection.
    NoIndex,
}

impl MiddleComponentMapper {
    /// Writes this component's slice of the row from the given value.
    pub fn map_to_row(&self, row: &mut AuditRow, value: Option<&Value>) {
        match self {
            Self::RelatedId { id_mapper } => {
                let id = value.and_then(Value::as_ref_value).map(|r| (*r.id).clone());
                id_mapper.map_to_row_from_id(row, id.as_ref());
            }
            Self::Embeddable { delegate } => {
                if let Some(fields) = value.and_then(Value::as_composite) {
                    let state: EntityState =
                        fields.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                    delegate.map(row, &state, None);
                }
            }
            Self::Simple { property_name }
            | Self::NotKey { property_name }
            | Self::Straight { property_name } => {
                row.insert(
                    property_name.clone(),
                    value.cloned().unwrap_or(Value::Null),
                );
            }
            Self::MapKeyEnumerated { property_name } => {
                row.insert(
                    property_name.clone(),
                    value.cloned().unwrap_or(Value::Null),
                );
            }
            // Key derivable from the element columns, nothing to write.
            Self::MapKeyId | Self::MapKeyProperty { .. } | Self::NoIndex => {}
        }
    }
}
