use super::*;
use crate::{
    entities::PropertyData,
    mapper::relation::{
        CollectionMapperKind, CollectionPropertyMapper, CommonCollectionMapperData,
        MiddleComponentData, MiddleComponentMapper, MiddleIdData, ToOneIdMapper,
    },
    revision::RevisionType,
    value::{EntityRef, EntityState},
};
use revtrail_schema::types::AccessType;
use std::collections::BTreeSet;

fn flagged(name: &str) -> PropertyData {
    PropertyData::new(name, AccessType::Field).with_modified_flag(format!("{name}_MOD"))
}

fn state(pairs: &[(&str, Value)]) -> EntityState {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect()
}

#[test]
fn single_mapper_writes_value_and_detects_change() {
    let mapper = SinglePropertyMapper::new(flagged("name"));
    let mut row = AuditRow::new();

    let changed = mapper.map(&mut row, Some(&Value::from("a")), Some(&Value::from("b")));
    assert!(changed);
    assert_eq!(row.get("name"), Some(&Value::from("a")));

    let unchanged = mapper.map(&mut row, Some(&Value::from("a")), Some(&Value::from("a")));
    assert!(!unchanged);
}

#[test]
fn null_and_missing_are_the_same_value() {
    let mapper = SinglePropertyMapper::new(flagged("name"));
    let mut row = AuditRow::new();

    assert!(!mapper.map(&mut row, None, Some(&Value::Null)));
    assert_eq!(row.get("name"), Some(&Value::Null));
}

#[test]
fn insert_revision_marks_every_property_changed() {
    let mut multi = MultiPropertyMapper::new(true);
    multi.add(
        flagged("name"),
        PropertyMapper::Single(SinglePropertyMapper::new(flagged("name"))),
    );
    multi.add(
        flagged("nickname"),
        PropertyMapper::Single(SinglePropertyMapper::new(flagged("nickname"))),
    );

    let mut row = AuditRow::new();
    let new_state = state(&[("name", Value::from("a")), ("nickname", Value::Null)]);
    let changed = multi.map(&mut row, &new_state, None);

    assert!(changed);
    // even the null property is changed on insert
    assert_eq!(row.get("name_MOD"), Some(&Value::Bool(true)));
    assert_eq!(row.get("nickname_MOD"), Some(&Value::Bool(true)));
}

#[test]
fn update_revision_flags_only_what_changed() {
    let mut multi = MultiPropertyMapper::new(true);
    multi.add(
        flagged("name"),
        PropertyMapper::Single(SinglePropertyMapper::new(flagged("name"))),
    );
    multi.add(
        flagged("nickname"),
        PropertyMapper::Single(SinglePropertyMapper::new(flagged("nickname"))),
    );

    let mut row = AuditRow::new();
    let new_state = state(&[("name", Value::from("a")), ("nickname", Value::from("n"))]);
    let old_state = state(&[("name", Value::from("b")), ("nickname", Value::from("n"))]);
    let changed = multi.map(&mut row, &new_state, Some(&old_state));

    assert!(changed);
    assert_eq!(row.get("name_MOD"), Some(&Value::Bool(true)));
    assert_eq!(row.get("nickname_MOD"), Some(&Value::Bool(false)));
}

#[test]
fn to_one_mapper_compares_by_target_id() {
    let mapper = ToOneIdMapper::new(
        IdMapper::Single(SingleIdMapper::new("owner_id")),
        flagged("owner"),
        "Owner",
        false,
    );

    let mut row = AuditRow::new();
    let new = Value::Ref(EntityRef::new("Owner", Value::Int(1)));
    let old = Value::Ref(EntityRef::new("Owner", Value::Int(1)));
    assert!(!mapper.map(&mut row, Some(&new), Some(&old)));
    assert_eq!(row.get("owner_id"), Some(&Value::Int(1)));

    let other = Value::Ref(EntityRef::new("Owner", Value::Int(2)));
    assert!(mapper.map(&mut row, Some(&other), Some(&old)));

    // dropping the reference writes null id columns
    assert!(mapper.map(&mut row, None, Some(&old)));
    assert_eq!(row.get("owner_id"), Some(&Value::Null));
}

fn string_set_mapper() -> CollectionPropertyMapper {
    let owner_id_mapper = IdMapper::Single(SingleIdMapper::new("id"));
    CollectionPropertyMapper {
        common: CommonCollectionMapperData {
            audit_middle_entity_name: Some("StringSetEntity_strings_AUD".to_string()),
            property_data: flagged("strings"),
            referencing_id_data: MiddleIdData::new(
                &owner_id_mapper,
                "StringSetEntity_",
                "StringSetEntity",
                "StringSetEntity_AUD",
                true,
            ),
            original_id_prop_name: "originalId".to_string(),
            revision_type_prop_name: "REVTYPE".to_string(),
            revision_type_in_id: false,
            ordinal_prop_name: None,
        },
        kind: CollectionMapperKind::Set,
        element: MiddleComponentData::new(
            MiddleComponentMapper::Simple {
                property_name: "element".to_string(),
            },
            1,
        ),
        index: None,
    }
}

fn string_set(values: &[&str]) -> Value {
    Value::Set(values.iter().map(|v| Value::from(*v)).collect())
}

#[test]
fn set_diff_produces_add_and_del_rows() {
    let mapper = string_set_mapper();
    let owner_id = Value::Int(7);

    let old = string_set(&["x", "y"]);
    let new = string_set(&["y", "z"]);
    let changes = mapper.collection_changes(&owner_id, Some(&new), Some(&old));

    assert_eq!(changes.len(), 2);
    let added: Vec<_> = changes
        .iter()
        .filter(|c| c.revision_type == RevisionType::Add)
        .collect();
    let removed: Vec<_> = changes
        .iter()
        .filter(|c| c.revision_type == RevisionType::Del)
        .collect();
    assert_eq!(added.len(), 1);
    assert_eq!(removed.len(), 1);

    let added_id = added[0].data.get("originalId").unwrap().as_composite().unwrap();
    assert_eq!(added_id.get("StringSetEntity_id"), Some(&Value::Int(7)));
    assert_eq!(added_id.get("element"), Some(&Value::from("z")));
    assert_eq!(added[0].data.get("REVTYPE"), Some(&Value::Int(0)));

    let removed_id = removed[0].data.get("originalId").unwrap().as_composite().unwrap();
    assert_eq!(removed_id.get("element"), Some(&Value::from("x")));
}

#[test]
fn unchanged_set_produces_no_rows() {
    let mapper = string_set_mapper();
    let owner_id = Value::Int(7);
    let same = string_set(&["x", "y"]);

    let changes = mapper.collection_changes(&owner_id, Some(&same), Some(&same.clone()));
    assert!(changes.is_empty());
    assert!(!mapper.is_modified(Some(&same), Some(&same.clone())));
}

#[test]
fn null_and_empty_collections_are_distinct_but_diff_as_empty() {
    let mapper = string_set_mapper();
    let empty = Value::Set(BTreeSet::new());

    assert!(mapper.is_modified(Some(&empty), Some(&Value::Null)));
    assert!(mapper
        .collection_changes(&Value::Int(1), Some(&empty), Some(&Value::Null))
        .is_empty());
}

#[test]
fn list_diff_tracks_element_and_position() {
    let mut mapper = string_set_mapper();
    mapper.kind = CollectionMapperKind::List;
    mapper.index = Some(MiddleComponentData::new(
        MiddleComponentMapper::Simple {
            property_name: "idx".to_string(),
        },
        2,
    ));

    let old = Value::List(vec![Value::from("a"), Value::from("b")]);
    let new = Value::List(vec![Value::from("b"), Value::from("a")]);
    let changes = mapper.collection_changes(&Value::Int(1), Some(&new), Some(&old));

    // a swap rewrites both positions: two adds, two dels
    assert_eq!(changes.len(), 4);
    assert_eq!(
        changes
            .iter()
            .filter(|c| c.revision_type == RevisionType::Add)
            .count(),
        2
    );
}

#[test]
fn map_diff_tracks_entries() {
    let mut mapper = string_set_mapper();
    mapper.kind = CollectionMapperKind::Map;
    mapper.index = Some(MiddleComponentData::new(
        MiddleComponentMapper::Simple {
            property_name: "mapkey".to_string(),
        },
        2,
    ));

    let mut old = std::collections::BTreeMap::new();
    old.insert(Value::from("k1"), Value::from("v1"));
    let mut new = std::collections::BTreeMap::new();
    new.insert(Value::from("k1"), Value::from("v2"));

    let changes =
        mapper.collection_changes(&Value::Int(1), Some(&Value::Map(new)), Some(&Value::Map(old)));

    // a changed value at the same key is an add plus a del
    assert_eq!(changes.len(), 2);
    let add = changes
        .iter()
        .find(|c| c.revision_type == RevisionType::Add)
        .unwrap();
    let id = add.data.get("originalId").unwrap().as_composite().unwrap();
    assert_eq!(id.get("mapkey"), Some(&Value::from("k1")));
}

#[test]
fn join_column_collections_emit_no_middle_rows() {
    let mut mapper = string_set_mapper();
    mapper.common.audit_middle_entity_name = None;

    let old = string_set(&["x"]);
    let new = string_set(&["y"]);
    assert!(mapper
        .collection_changes(&Value::Int(1), Some(&new), Some(&old))
        .is_empty());
    // modification is still visible to the flag machinery
    assert!(mapper.is_modified(Some(&new), Some(&old)));
}

#[test]
fn embeddable_set_adds_carry_ordinals_and_revtype_in_id() {
    let owner_id_mapper = IdMapper::Single(SingleIdMapper::new("id"));
    let mut delegate = MultiPropertyMapper::new(false);
    delegate.add(
        PropertyData::new("city", AccessType::Field),
        PropertyMapper::Single(SinglePropertyMapper::new(PropertyData::new(
            "city",
            AccessType::Field,
        ))),
    );

    let mapper = CollectionPropertyMapper {
        common: CommonCollectionMapperData {
            audit_middle_entity_name: Some("Owner_addresses_AUD".to_string()),
            property_data: flagged("addresses"),
            referencing_id_data: MiddleIdData::new(
                &owner_id_mapper,
                "Owner_",
                "Owner",
                "Owner_AUD",
                true,
            ),
            original_id_prop_name: "originalId".to_string(),
            revision_type_prop_name: "REVTYPE".to_string(),
            revision_type_in_id: true,
            ordinal_prop_name: Some("SETORDINAL".to_string()),
        },
        kind: CollectionMapperKind::Set,
        element: MiddleComponentData::new(
            MiddleComponentMapper::Embeddable { delegate },
            1,
        ),
        index: None,
    };

    let old = Value::Set(BTreeSet::new());
    let new = Value::Set(
        [Value::composite([("city", Value::from("Kyiv"))])]
            .into_iter()
            .collect(),
    );

    let changes = mapper.collection_changes(&Value::Int(3), Some(&new), Some(&old));
    assert_eq!(changes.len(), 1);

    let id = changes[0].data.get("originalId").unwrap().as_composite().unwrap();
    assert_eq!(id.get("city"), Some(&Value::from("Kyiv")));
    assert_eq!(id.get("SETORDINAL"), Some(&Value::Int(0)));
    // structural elements carry the revision type inside the id
    assert_eq!(id.get("REVTYPE"), Some(&Value::Int(0)));
}
