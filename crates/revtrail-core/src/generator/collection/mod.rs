//! Collection generation. The owning-side shape decides everything: a
//! collection whose rows live on the referenced entity's table maps through
//! its audit table (join-column case), every other collection gets a middle
//! audit entity of its own.

mod base;
mod join_column;
mod mapped_by;
mod middle_table;

use super::AuditMetadataGenerator;
use crate::{
    error::Error,
    mapper::relation::CollectionMapperKind,
    mapper::MultiPropertyMapper,
};
use revtrail_schema::{
    node::{Collection, CollectionElement, Entity, Property},
    types::CollectionKind,
};

impl AuditMetadataGenerator<'_> {
    pub(in crate::generator) fn add_collection(
        &mut self,
        entity: &Entity,
        property: &Property,
        collection: &Collection,
        mapper: &mut MultiPropertyMapper,
    ) -> Result<(), Error> {
        if is_join_column_collection(property, collection) {
            let mapped_by = self.resolve_mapped_by(entity, property, collection)?;
            self.add_one_to_many_attached(entity, property, collection, &mapped_by, mapper)
        } else {
            self.add_with_middle_table(entity, property, collection, mapper)
        }
    }
}

/// Whether the live mapping keeps the relation on the referenced entity's
/// table: an inverse or audit-redirected one-to-many, or a many-to-one
/// element owned by the other side.
fn is_join_column_collection(property: &Property, collection: &Collection) -> bool {
    match &collection.element {
        CollectionElement::OneToMany { .. } => {
            collection.inverse || property.audit.audit_mapped_by.is_some()
        }
        CollectionElement::ManyToOne(_) => collection.mapped_by_property.is_some(),
        CollectionElement::Basic(_) | CollectionElement::Component(_) => false,
    }
}

fn collection_mapper_kind(collection: &Collection) -> CollectionMapperKind {
    match collection.kind {
        CollectionKind::Bag => CollectionMapperKind::Bag,
        CollectionKind::List => CollectionMapperKind::List,
        CollectionKind::Map => CollectionMapperKind::Map,
        CollectionKind::Set => CollectionMapperKind::Set,
        CollectionKind::SortedMap => CollectionMapperKind::SortedMap {
            comparator: collection.comparator.clone(),
        },
        CollectionKind::SortedSet => CollectionMapperKind::SortedSet {
            comparator: collection.comparator.clone(),
        },
    }
}

/// Final segment of a possibly dotted type or entity name.
fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
