//! Mappers for relations: to-one references, and the middle-table component
//! mappers collections assemble their rows from.

mod collection;
mod component;
mod to_one;

pub use collection::{
    CollectionMapperKind, CollectionPropertyMapper, CommonCollectionMapperData,
    PersistentCollectionChangeData,
};
pub use component::{MiddleComponentData, MiddleComponentMapper};
pub use to_one::{OneToOneNotOwningMapper, OneToOnePrimaryKeyJoinColumnMapper, ToOneIdMapper};

use crate::mapper::IdMapper;
use serde::Serialize;

///
/// MiddleIdData
///
/// Everything a collection mapper needs to speak about one side's
/// identifier: the plain mapper for the entity itself, and a prefixed copy
/// for that id's appearance inside a middle table.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MiddleIdData {
    pub id_mapper: IdMapper,
    pub prefixed_mapper: IdMapper,
    pub entity_name: String,
    pub audit_entity_name: String,
    pub audited: bool,
}

impl MiddleIdData {
    #[must_use]
    pub fn new(
        id_mapper: &IdMapper,
        prefix: &str,
        entity_name: &str,
        audit_entity_name: &str,
        audited: bool,
    ) -> Self {
        Self {
            id_mapper: id_mapper.clone(),
            prefixed_mapper: id_mapper.prefixed(prefix),
            entity_name: entity_name.to_string(),
            audit_entity_name: audit_entity_name.to_string(),
            audited,
        }
    }
}
