use crate::{
    config::{AuditConfig, AuditStrategy, ValidityStrategyConfig},
    entities::RelationType,
    error::{Error, MappingError, ModifiedFlagError},
    generator::RelationQueryKind,
    mapper::relation::MiddleComponentMapper,
    mapper::PropertyMapper,
    mapping::{PersistentEntity, SubclassKind},
    metadata::AuditMetadata,
    revision::RevisionType,
    test_fixtures as fixtures,
    trace::{BootTraceEvent, BootTraceSink},
    value::{EntityRef, EntityState, Value},
};
use proptest::prelude::*;
use revtrail_schema::node::{
    BasicValue, Component, Entity, IdProperty, IdShape, ManyToOne, Property, PropertyValue,
};
use revtrail_schema::types::{BasicKind, Inheritance, RelationTargetAuditMode};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

fn generate(model: &revtrail_schema::node::MappingModel) -> AuditMetadata {
    AuditMetadata::generate(&AuditConfig::default(), model).unwrap()
}

#[test]
fn basic_entity_generates_root_audit_entity() {
    let mut customer = fixtures::entity("Customer", "customers");
    customer.properties.push(fixtures::text("name"));
    let metadata = generate(&fixtures::model([customer]));

    assert_eq!(metadata.audit_entity_name("Customer"), Some("Customer_AUD"));

    let root = metadata
        .audit_entity("Customer")
        .and_then(PersistentEntity::as_root)
        .unwrap();
    assert_eq!(root.table.audit_table_name, "customers_AUD");
    assert_eq!(root.identifier.name, "originalId");
    assert_eq!(root.identifier.attributes.len(), 1);
    assert_eq!(root.identifier.attributes[0].name(), "id");
    assert_eq!(root.identifier.revision_relation().unwrap().name, "REV");

    let names: Vec<&str> = root.attributes.iter().map(|a| a.name()).collect();
    assert_eq!(names, vec!["REVTYPE", "name"]);

    assert!(matches!(
        metadata.property_mapper("Customer", "name"),
        Some(PropertyMapper::Single(_))
    ));
}

#[test]
fn not_audited_entity_keeps_only_its_id() {
    let mut secret = fixtures::entity("Secret", "secrets");
    secret.audit.audited = false;
    let metadata = generate(&fixtures::model([secret]));

    assert!(!metadata.is_audited("Secret"));
    assert!(metadata.audit_entity("Secret").is_none());
}

#[test]
fn many_to_one_maps_by_target_id() {
    let mut address = fixtures::entity("Address", "addresses");
    address.properties.push(fixtures::text("city"));
    let mut person = fixtures::entity("Person", "persons");
    person
        .properties
        .push(fixtures::many_to_one("address", "Address", "address_id"));

    let metadata = generate(&fixtures::model([person, address]));

    let root = metadata
        .audit_entity("Person")
        .and_then(PersistentEntity::as_root)
        .unwrap();
    let attribute = root
        .attributes
        .iter()
        .find(|a| a.name() == "address")
        .unwrap();
    assert_eq!(attribute.columns()[0].name, "address_id");

    assert!(matches!(
        metadata.property_mapper("Person", "address"),
        Some(PropertyMapper::ToOne(_))
    ));
    let relation = metadata
        .configurations
        .relation_description("Person", "address")
        .unwrap();
    assert_eq!(relation.relation_type, RelationType::ToOne);
    assert_eq!(relation.to_entity_name, "Address");
}

#[test]
fn relation_to_not_audited_target_is_fatal_without_opt_in() {
    let mut legacy = fixtures::entity("Legacy", "legacy");
    legacy.audit.audited = false;
    let mut person = fixtures::entity("Person", "persons");
    person
        .properties
        .push(fixtures::many_to_one("legacy", "Legacy", "legacy_id"));

    let err = AuditMetadata::generate(
        &AuditConfig::default(),
        &fixtures::model([person, legacy]),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Mapping(MappingError::NotAuditedTarget {
            allow_not_audited_target: true,
            ..
        })
    ));
}

#[test]
fn not_audited_target_opt_in_maps_and_traces() {
    let mut legacy = fixtures::entity("Legacy", "legacy");
    legacy.audit.audited = false;
    let mut person = fixtures::entity("Person", "persons");
    let mut relation = fixtures::many_to_one("legacy", "Legacy", "legacy_id");
    relation.audit.target_audit_mode = RelationTargetAuditMode::NotAudited;
    person.properties.push(relation);

    let sink = RecordingSink::default();
    let metadata = AuditMetadata::generate_traced(
        &AuditConfig::default(),
        &fixtures::model([person, legacy]),
        &sink,
    )
    .unwrap();

    assert!(matches!(
        metadata.property_mapper("Person", "legacy"),
        Some(PropertyMapper::ToOne(_))
    ));
    assert!(sink
        .events
        .lock()
        .unwrap()
        .iter()
        .any(|e| e == "not_audited_target_ignored:Person.legacy->Legacy"));
}

#[test]
fn audited_subclass_of_not_audited_superclass_is_fatal() {
    let mut base = fixtures::entity("Base", "base");
    base.audit.audited = false;
    let mut child = fixtures::entity("Child", "children");
    child.superclass = Some("Base".to_string());
    child.inheritance = Inheritance::Joined;

    let err = AuditMetadata::generate(
        &AuditConfig::default(),
        &fixtures::model([base, child]),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Mapping(MappingError::SuperclassNotAudited { .. })
    ));
}

#[test]
fn joined_subclass_keys_on_id_and_revision() {
    let mut animal = fixtures::entity("Animal", "animals");
    animal.properties.push(fixtures::text("name"));
    let mut dog = fixtures::entity("Dog", "dogs");
    dog.superclass = Some("Animal".to_string());
    dog.inheritance = Inheritance::Joined;
    dog.properties.push(fixtures::text("breed"));

    let metadata = generate(&fixtures::model([animal, dog]));

    let Some(PersistentEntity::Subclass(subclass)) = metadata.audit_entity("Dog") else {
        panic!("expected subclass audit entity");
    };
    assert_eq!(subclass.extends, "Animal_AUD");
    let SubclassKind::Joined { table, key_columns } = &subclass.kind else {
        panic!("expected joined subclass");
    };
    assert_eq!(table.audit_table_name, "dogs_AUD");
    let names: Vec<&str> = key_columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "REV"]);

    // inherited property resolves through the parent chain
    assert!(metadata.property_mapper("Dog", "name").is_some());
}

#[test]
fn element_set_gets_middle_entity_and_query() {
    let mut person = fixtures::entity("Person", "persons");
    person
        .properties
        .push(fixtures::string_set("strings", "Person_strings", "Person_id"));

    let metadata = generate(&fixtures::model([person]));

    let middle = metadata.middle_entity("Person_strings_AUD").unwrap();
    assert_eq!(middle.table_name, "Person_strings_AUD");
    assert!(!middle.revision_type_in_id);
    let id_names: Vec<&str> = middle.identifier.attributes.iter().map(|a| a.name()).collect();
    assert_eq!(id_names, vec!["Person_id", "element"]);
    let names: Vec<&str> = middle.attributes.iter().map(|a| a.name()).collect();
    assert_eq!(names, vec!["REVTYPE"]);

    let query = metadata.relation_queries_for("Person").next().unwrap();
    assert_eq!(query.property_name, "strings");
    assert_eq!(query.owner_id_parameters, vec!["Person_id".to_string()]);
    assert!(matches!(
        &query.kind,
        RelationQueryKind::TwoEntity {
            middle_entity_name,
            referenced_audit_entity_name: None,
        } if middle_entity_name == "Person_strings_AUD"
    ));
}

#[test]
fn order_by_is_carried_onto_the_relation_query() {
    let mut person = fixtures::entity("Person", "persons");
    let mut strings = fixtures::string_set("strings", "Person_strings", "Person_id");
    if let PropertyValue::Collection(collection) = &mut strings.value {
        collection.order_by = Some("element asc".to_string());
    }
    person.properties.push(strings);

    let metadata = generate(&fixtures::model([person]));

    let query = metadata.relation_queries_for("Person").next().unwrap();
    assert_eq!(query.order_by.as_deref(), Some("element asc"));
}

#[test]
fn embeddable_set_keys_revision_type_and_ordinal() {
    let mut person = fixtures::entity("Person", "persons");
    person
        .properties
        .push(fixtures::address_set("addresses", "Person_addresses", "Person_id"));

    let metadata = generate(&fixtures::model([person]));

    let middle = metadata.middle_entity("Person_addresses_AUD").unwrap();
    assert!(middle.revision_type_in_id);
    let id_names: Vec<&str> = middle.identifier.attributes.iter().map(|a| a.name()).collect();
    assert_eq!(
        id_names,
        vec!["Person_id", "addresses_street", "addresses_city", "SETORDINAL", "REVTYPE"]
    );
    assert!(middle.attributes.is_empty());
}

#[test]
fn lob_map_value_stays_outside_the_middle_key() {
    let mut person = fixtures::entity("Person", "persons");
    person
        .properties
        .push(fixtures::clob_map("notes", "Person_notes", "Person_id"));

    let metadata = generate(&fixtures::model([person]));

    let middle = metadata.middle_entity("Person_notes_AUD").unwrap();
    assert!(middle.revision_type_in_id);
    let id_names: Vec<&str> = middle.identifier.attributes.iter().map(|a| a.name()).collect();
    assert_eq!(id_names, vec!["Person_id", "note_key", "REVTYPE"]);
    let names: Vec<&str> = middle.attributes.iter().map(|a| a.name()).collect();
    assert_eq!(names, vec!["notes"]);

    let mut map = BTreeMap::new();
    map.insert(Value::from("k"), Value::Lob("remember the milk".to_string()));
    let changes = metadata.collection_changes(
        "Person",
        "notes",
        &Value::Int(1),
        Some(&Value::Map(map)),
        None,
    );
    assert_eq!(changes.len(), 1);
    let row = &changes[0].data;
    assert_eq!(
        row.get("notes"),
        Some(&Value::Lob("remember the milk".to_string()))
    );
    let Some(Value::Composite(original_id)) = row.get("originalId") else {
        panic!("expected composite original id");
    };
    assert_eq!(original_id.get("note_key"), Some(&Value::from("k")));
    assert!(original_id.contains_key("REVTYPE"));
    assert!(!original_id.contains_key("notes"));
}

#[test]
fn entity_map_key_flattens_into_the_middle_key() {
    let contact = fixtures::entity("Contact", "contacts");
    let mut person = fixtures::entity("Person", "persons");
    person.properties.push(fixtures::entity_keyed_map(
        "phones",
        "Contact",
        "Person_phones",
        "Person_id",
        "contact_id",
    ));

    let metadata = generate(&fixtures::model([person, contact]));

    let middle = metadata.middle_entity("Person_phones_AUD").unwrap();
    let id_names: Vec<&str> = middle.identifier.attributes.iter().map(|a| a.name()).collect();
    assert_eq!(id_names, vec!["Person_id", "phone", "mapkey_id"]);

    let Some(PropertyMapper::Collection(mapper)) = metadata.property_mapper("Person", "phones")
    else {
        panic!("expected collection mapper");
    };
    assert!(matches!(
        mapper.index.as_ref().map(|i| &i.mapper),
        Some(MiddleComponentMapper::RelatedId { .. })
    ));

    let mut map = BTreeMap::new();
    map.insert(
        Value::Ref(EntityRef::new("Contact", Value::Int(5))),
        Value::from("555-0100"),
    );
    let changes = metadata.collection_changes(
        "Person",
        "phones",
        &Value::Int(1),
        Some(&Value::Map(map)),
        None,
    );
    assert_eq!(changes.len(), 1);
    let Some(Value::Composite(original_id)) = changes[0].data.get("originalId") else {
        panic!("expected composite original id");
    };
    assert_eq!(original_id.get("mapkey_id"), Some(&Value::Int(5)));
}

#[test]
fn owning_one_to_many_synthesizes_middle_table_name() {
    let asset = fixtures::entity("Asset", "assets");
    let mut person = fixtures::entity("Person", "persons");
    person
        .properties
        .push(fixtures::owning_one_to_many("assets", "Asset"));

    let metadata = generate(&fixtures::model([person, asset]));

    let middle = metadata.middle_entity("Person_Asset_AUD").unwrap();
    assert_eq!(middle.table_name, "Person_Asset_AUD");
    let id_names: Vec<&str> = middle.identifier.attributes.iter().map(|a| a.name()).collect();
    assert!(id_names.contains(&"Asset_id"));

    let relation = metadata
        .configurations
        .relation_description("Person", "assets")
        .unwrap();
    assert_eq!(relation.relation_type, RelationType::ToManyMiddle);
}

#[test]
fn inverse_one_to_many_maps_through_the_element_entity() {
    let mut car = fixtures::entity("Car", "cars");
    car.properties
        .push(fixtures::many_to_one("garage", "Garage", "garage_id"));
    let mut garage = fixtures::entity("Garage", "garages");
    garage
        .properties
        .push(fixtures::inverse_one_to_many("cars", "Car", "garage"));

    let metadata = generate(&fixtures::model([garage, car]));

    assert!(metadata.middle_entities.is_empty());
    let query = metadata.relation_queries_for("Garage").next().unwrap();
    assert!(matches!(
        &query.kind,
        RelationQueryKind::OneAuditEntity { audit_entity_name } if audit_entity_name == "Car_AUD"
    ));
    assert_eq!(query.owner_id_parameters, vec!["garage_id".to_string()]);

    let relation = metadata
        .configurations
        .relation_description("Garage", "cars")
        .unwrap();
    assert_eq!(relation.relation_type, RelationType::ToManyNotOwning);
    assert!(relation.bidirectional);

    // no middle rows; changes surface on the car's own audit table
    assert!(metadata
        .collection_changes(
            "Garage",
            "cars",
            &Value::Int(1),
            Some(&Value::List(vec![Value::Int(2)])),
            None,
        )
        .is_empty());
}

#[test]
fn audit_mapped_by_installs_owner_mapper_on_referenced_entity() {
    let note = fixtures::entity("Note", "notes");
    let mut person = fixtures::entity("Person", "persons");
    let mut notes = fixtures::owning_one_to_many("notes", "Note");
    notes.audit.audit_mapped_by = Some("owner".to_string());
    person.properties.push(notes);

    let metadata = generate(&fixtures::model([person, note]));

    assert!(metadata.middle_entities.is_empty());
    assert!(matches!(
        metadata.property_mapper("Note", "owner"),
        Some(PropertyMapper::ToOne(_))
    ));

    let relation = metadata
        .configurations
        .relation_description("Person", "notes")
        .unwrap();
    assert_eq!(relation.relation_type, RelationType::ToManyNotOwning);
    assert!(!relation.bidirectional);
}

#[test]
fn mapped_by_resolves_structurally_by_key_columns() {
    let mut car = fixtures::entity("Car", "cars");
    car.properties
        .push(fixtures::many_to_one("garage", "Garage", "garage_id"));
    let mut garage = fixtures::entity("Garage", "garages");
    garage
        .properties
        .push(fixtures::inverse_one_to_many_by_columns("cars", "Car", "garage_id"));

    let metadata = generate(&fixtures::model([garage, car]));

    let relation = metadata
        .configurations
        .relation_description("Garage", "cars")
        .unwrap();
    assert_eq!(relation.mapped_by_property.as_deref(), Some("garage"));
    let query = metadata.relation_queries_for("Garage").next().unwrap();
    assert_eq!(query.owner_id_parameters, vec!["garage_id".to_string()]);
}

#[test]
fn mapped_by_search_walks_the_referenced_superclass() {
    let mut vehicle = fixtures::entity("Vehicle", "vehicles");
    vehicle
        .properties
        .push(fixtures::many_to_one("garage", "Garage", "garage_id"));
    let mut car = fixtures::entity("Car", "cars");
    car.superclass = Some("Vehicle".to_string());
    car.inheritance = Inheritance::Joined;
    let mut garage = fixtures::entity("Garage", "garages");
    garage
        .properties
        .push(fixtures::inverse_one_to_many_by_columns("cars", "Car", "garage_id"));

    let metadata = generate(&fixtures::model([garage, vehicle, car]));

    let relation = metadata
        .configurations
        .relation_description("Garage", "cars")
        .unwrap();
    assert_eq!(relation.mapped_by_property.as_deref(), Some("garage"));
}

#[test]
fn mapped_by_search_covers_identifier_relations() {
    let car_id = IdShape::Composite {
        class_name: None,
        id_class: true,
        properties: vec![
            IdProperty::new(
                "number",
                PropertyValue::Basic(BasicValue::new("Long", BasicKind::Int, "number")),
            ),
            IdProperty::new(
                "garage",
                PropertyValue::ManyToOne(ManyToOne::new("Garage", "garage_id")),
            ),
        ],
    };
    let mut car = Entity::new("Car", car_id);
    car.table = "cars".to_string();
    let mut garage = fixtures::entity("Garage", "garages");
    garage
        .properties
        .push(fixtures::inverse_one_to_many_by_columns("cars", "Car", "garage_id"));

    let metadata = generate(&fixtures::model([garage, car]));

    let relation = metadata
        .configurations
        .relation_description("Garage", "cars")
        .unwrap();
    assert_eq!(relation.mapped_by_property.as_deref(), Some("garage"));
}

#[test]
fn mapped_by_search_descends_into_embedded_components() {
    let mut car = fixtures::entity("Car", "cars");
    car.properties.push(Property::new(
        "details",
        PropertyValue::Component(Component {
            class_name: "CarDetails".to_string(),
            properties: vec![fixtures::many_to_one("garage", "Garage", "garage_id")],
        }),
    ));
    let mut garage = fixtures::entity("Garage", "garages");
    garage
        .properties
        .push(fixtures::inverse_one_to_many_by_columns("cars", "Car", "garage_id"));

    let metadata = generate(&fixtures::model([garage, car]));

    let relation = metadata
        .configurations
        .relation_description("Garage", "cars")
        .unwrap();
    assert_eq!(relation.mapped_by_property.as_deref(), Some("details.garage"));
}

#[test]
fn explicit_audit_mapped_by_wins_over_the_declared_owner() {
    let mut car = fixtures::entity("Car", "cars");
    car.properties
        .push(fixtures::many_to_one("garage", "Garage", "garage_id"));
    let mut garage = fixtures::entity("Garage", "garages");
    let mut cars = fixtures::inverse_one_to_many("cars", "Car", "garage");
    cars.audit.audit_mapped_by = Some("owner".to_string());
    garage.properties.push(cars);

    let metadata = generate(&fixtures::model([garage, car]));

    let relation = metadata
        .configurations
        .relation_description("Garage", "cars")
        .unwrap();
    assert_eq!(relation.mapped_by_property.as_deref(), Some("owner"));
    assert!(matches!(
        metadata.property_mapper("Car", "owner"),
        Some(PropertyMapper::ToOne(_))
    ));
}

#[test]
fn unresolvable_mapped_by_is_fatal() {
    let mut car = fixtures::entity("Car", "cars");
    car.properties
        .push(fixtures::many_to_one("garage", "Garage", "garage_id"));
    let mut garage = fixtures::entity("Garage", "garages");
    garage
        .properties
        .push(fixtures::inverse_one_to_many_by_columns("cars", "Car", "warehouse_id"));

    let err = AuditMetadata::generate(&AuditConfig::default(), &fixtures::model([garage, car]))
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Mapping(MappingError::UnresolvedMappedBy { .. })
    ));
}

#[test]
fn validity_strategy_adds_end_revision_attributes() {
    let cfg = AuditConfig {
        strategy: AuditStrategy::Validity(ValidityStrategyConfig {
            revision_end_timestamp: true,
            ..ValidityStrategyConfig::default()
        }),
        ..AuditConfig::default()
    };
    let mut customer = fixtures::entity("Customer", "customers");
    customer.properties.push(fixtures::text("name"));

    let metadata = AuditMetadata::generate(&cfg, &fixtures::model([customer])).unwrap();
    let root = metadata
        .audit_entity("Customer")
        .and_then(PersistentEntity::as_root)
        .unwrap();
    let names: Vec<&str> = root.attributes.iter().map(|a| a.name()).collect();
    assert_eq!(names, vec!["REVTYPE", "REVEND", "REVEND_TSTMP", "name"]);
}

#[test]
fn modified_flag_lookup_walks_overrides_and_chain() {
    let cfg = AuditConfig {
        global_with_modified_flag: true,
        ..AuditConfig::default()
    };
    let mut customer = fixtures::entity("Customer", "customers");
    customer.properties.push(fixtures::text("name"));
    let mut untracked = fixtures::text("internal");
    untracked.audit.with_modified_flag = Some(false);
    customer.properties.push(untracked);
    let mut secret = fixtures::entity("Secret", "secrets");
    secret.audit.audited = false;

    let metadata = AuditMetadata::generate(&cfg, &fixtures::model([customer, secret])).unwrap();

    assert_eq!(
        metadata.modified_flag_column("Customer", "name").unwrap(),
        "name_MOD"
    );
    assert!(matches!(
        metadata.modified_flag_column("Customer", "internal"),
        Err(ModifiedFlagError::NotTracked { .. })
    ));
    assert!(matches!(
        metadata.modified_flag_column("Customer", "nope"),
        Err(ModifiedFlagError::UnknownProperty { .. })
    ));
    assert!(matches!(
        metadata.modified_flag_column("Secret", "name"),
        Err(ModifiedFlagError::NotAudited { .. })
    ));
}

#[test]
fn audit_row_projection_covers_insert_update_and_delete() {
    let mut customer = fixtures::entity("Customer", "customers");
    customer.properties.push(fixtures::text("name"));
    let metadata = generate(&fixtures::model([customer]));

    let mut state = EntityState::new();
    state.insert("id".to_string(), Value::Int(7));
    state.insert("name".to_string(), Value::from("ada"));

    let (row, changed) = metadata
        .map_to_audit_row("Customer", RevisionType::Add, None, Some(&state), None)
        .unwrap();
    assert!(changed);
    assert_eq!(row.get("REVTYPE"), Some(&Value::Int(0)));
    assert_eq!(row.get("name"), Some(&Value::from("ada")));
    let Some(Value::Composite(original_id)) = row.get("originalId") else {
        panic!("expected composite original id");
    };
    assert_eq!(original_id.get("id"), Some(&Value::Int(7)));

    let (_, changed) = metadata
        .map_to_audit_row(
            "Customer",
            RevisionType::Mod,
            None,
            Some(&state),
            Some(&state),
        )
        .unwrap();
    assert!(!changed);

    let (row, changed) = metadata
        .map_to_audit_row(
            "Customer",
            RevisionType::Del,
            Some(&Value::Int(7)),
            None,
            None,
        )
        .unwrap();
    assert!(changed);
    assert_eq!(row.len(), 2);
    assert_eq!(row.get("REVTYPE"), Some(&Value::Int(2)));
}

#[test]
fn delete_projection_keeps_last_state_when_configured() {
    let cfg = AuditConfig {
        store_data_at_delete: true,
        ..AuditConfig::default()
    };
    let mut customer = fixtures::entity("Customer", "customers");
    customer.properties.push(fixtures::text("name"));
    let model = fixtures::model([customer]);

    let mut state = EntityState::new();
    state.insert("id".to_string(), Value::Int(7));
    state.insert("name".to_string(), Value::from("ada"));

    let metadata = AuditMetadata::generate(&cfg, &model).unwrap();
    let (row, _) = metadata
        .map_to_audit_row("Customer", RevisionType::Del, None, None, Some(&state))
        .unwrap();
    assert_eq!(row.get("REVTYPE"), Some(&Value::Int(2)));
    assert_eq!(row.get("name"), Some(&Value::from("ada")));
    let Some(Value::Composite(original_id)) = row.get("originalId") else {
        panic!("expected composite original id");
    };
    assert_eq!(original_id.get("id"), Some(&Value::Int(7)));

    // without the switch the delete row keeps to id plus revision type
    let metadata = AuditMetadata::generate(&AuditConfig::default(), &model).unwrap();
    let (row, _) = metadata
        .map_to_audit_row("Customer", RevisionType::Del, None, None, Some(&state))
        .unwrap();
    assert!(row.get("name").is_none());
}

#[test]
fn generation_is_deterministic() {
    let mut address = fixtures::entity("Address", "addresses");
    address.properties.push(fixtures::text("city"));
    let mut person = fixtures::entity("Person", "persons");
    person
        .properties
        .push(fixtures::many_to_one("address", "Address", "address_id"));
    person
        .properties
        .push(fixtures::string_set("strings", "Person_strings", "Person_id"));
    let model = fixtures::model([person, address]);

    let first = serde_json::to_string(&generate(&model)).unwrap();
    let second = serde_json::to_string(&generate(&model)).unwrap();
    assert_eq!(first, second);
}

///
/// RecordingSink
///

#[derive(Default)]
struct RecordingSink {
    events: Mutex<Vec<String>>,
}

impl BootTraceSink for RecordingSink {
    fn on_event(&self, event: BootTraceEvent<'_>) {
        if let BootTraceEvent::NotAuditedTargetIgnored {
            entity,
            property,
            referenced_entity,
        } = event
        {
            self.events.lock().unwrap().push(format!(
                "not_audited_target_ignored:{entity}.{property}->{referenced_entity}"
            ));
        }
    }
}

fn string_set_metadata() -> AuditMetadata {
    let mut person = fixtures::entity("Person", "persons");
    person
        .properties
        .push(fixtures::string_set("strings", "Person_strings", "Person_id"));
    generate(&fixtures::model([person]))
}

fn set_value(values: &BTreeSet<String>) -> Value {
    Value::Set(values.iter().map(|v| Value::from(v.as_str())).collect())
}

proptest! {
    #[test]
    fn set_diff_matches_symmetric_difference(
        old in proptest::collection::btree_set("[a-z]{1,8}", 0..8usize),
        new in proptest::collection::btree_set("[a-z]{1,8}", 0..8usize),
    ) {
        let metadata = string_set_metadata();
        let changes = metadata.collection_changes(
            "Person",
            "strings",
            &Value::Int(1),
            Some(&set_value(&new)),
            Some(&set_value(&old)),
        );

        let adds = changes.iter().filter(|c| c.revision_type == RevisionType::Add).count();
        let dels = changes.iter().filter(|c| c.revision_type == RevisionType::Del).count();
        prop_assert_eq!(adds, new.difference(&old).count());
        prop_assert_eq!(dels, old.difference(&new).count());
    }
}
