//! Shared mapping-model fixtures for generator and metadata tests.

use revtrail_schema::{
    node::{
        BasicValue, Collection, CollectionElement, Component, Entity, IdShape, ManyToOne,
        MappingModel, Property, PropertyValue, Selectable,
    },
    types::{BasicKind, CollectionKind},
};

pub fn long_id() -> IdShape {
    IdShape::single(
        "id",
        PropertyValue::Basic(BasicValue::new("Long", BasicKind::Int, "id")),
    )
}

pub fn entity(name: &str, table: &str) -> Entity {
    let mut entity = Entity::new(name, long_id());
    entity.table = table.to_string();
    entity
}

pub fn text(name: &str) -> Property {
    Property::basic(name, BasicValue::new("String", BasicKind::Text, name))
}

pub fn many_to_one(name: &str, referenced: &str, column: &str) -> Property {
    Property::new(
        name,
        PropertyValue::ManyToOne(ManyToOne::new(referenced, column)),
    )
}

pub fn model(entities: impl IntoIterator<Item = Entity>) -> MappingModel {
    let mut model = MappingModel::new();
    for entity in entities {
        model.add_entity(entity);
    }
    model
}

/// A set of strings stored in its own collection table, keyed back by
/// `key_column`.
pub fn string_set(name: &str, collection_table: &str, key_column: &str) -> Property {
    let mut collection = Collection::new(
        CollectionKind::Set,
        CollectionElement::Basic(BasicValue::new("String", BasicKind::Text, "element")),
    );
    collection.collection_table = Some(collection_table.to_string());
    collection.key_selectables = vec![Selectable::column(key_column)];
    Property::new(name, PropertyValue::Collection(Box::new(collection)))
}

/// A set of embeddables with `street` and `city` parts.
pub fn address_set(name: &str, collection_table: &str, key_column: &str) -> Property {
    let component = Component {
        class_name: "Address".to_string(),
        properties: vec![text("street"), text("city")],
    };
    let mut collection = Collection::new(
        CollectionKind::Set,
        CollectionElement::Component(component),
    );
    collection.collection_table = Some(collection_table.to_string());
    collection.key_selectables = vec![Selectable::column(key_column)];
    Property::new(name, PropertyValue::Collection(Box::new(collection)))
}

/// A map of CLOB values in its own collection table: `note_key` holds the
/// map key, `notes` the large value.
pub fn clob_map(name: &str, collection_table: &str, key_column: &str) -> Property {
    let mut collection = Collection::new(
        CollectionKind::Map,
        CollectionElement::Basic(BasicValue::new("String", BasicKind::Clob, "notes")),
    );
    collection.index = Some(PropertyValue::Basic(BasicValue::new(
        "String",
        BasicKind::Text,
        "note_key",
    )));
    collection.collection_table = Some(collection_table.to_string());
    collection.key_selectables = vec![Selectable::column(key_column)];
    Property::new(name, PropertyValue::Collection(Box::new(collection)))
}

/// A map keyed by another entity through `mapkey_column`, with a basic
/// `phone` value column.
pub fn entity_keyed_map(
    name: &str,
    referenced: &str,
    collection_table: &str,
    key_column: &str,
    mapkey_column: &str,
) -> Property {
    let mut collection = Collection::new(
        CollectionKind::Map,
        CollectionElement::Basic(BasicValue::new("String", BasicKind::Text, "phone")),
    );
    collection.index = Some(PropertyValue::ManyToOne(ManyToOne::new(
        referenced,
        mapkey_column,
    )));
    collection.collection_table = Some(collection_table.to_string());
    collection.key_selectables = vec![Selectable::column(key_column)];
    Property::new(name, PropertyValue::Collection(Box::new(collection)))
}

/// The inverse side of a one-to-many that declares no owner, leaving the
/// generator to find it by the foreign-key columns.
pub fn inverse_one_to_many_by_columns(name: &str, referenced: &str, key_column: &str) -> Property {
    let mut collection = Collection::new(
        CollectionKind::Bag,
        CollectionElement::OneToMany {
            referenced_entity: referenced.to_string(),
        },
    );
    collection.inverse = true;
    collection.key_selectables = vec![Selectable::column(key_column)];
    Property::new(name, PropertyValue::Collection(Box::new(collection)))
}

/// The inverse side of a bidirectional one-to-many.
pub fn inverse_one_to_many(name: &str, referenced: &str, mapped_by: &str) -> Property {
    let mut collection = Collection::new(
        CollectionKind::Bag,
        CollectionElement::OneToMany {
            referenced_entity: referenced.to_string(),
        },
    );
    collection.inverse = true;
    collection.mapped_by_property = Some(mapped_by.to_string());
    Property::new(name, PropertyValue::Collection(Box::new(collection)))
}

/// The owning side of a unidirectional one-to-many with no join table
/// declared; the generator synthesizes the middle table name.
pub fn owning_one_to_many(name: &str, referenced: &str) -> Property {
    let collection = Collection::new(
        CollectionKind::Bag,
        CollectionElement::OneToMany {
            referenced_entity: referenced.to_string(),
        },
    );
    Property::new(name, PropertyValue::Collection(Box::new(collection)))
}
