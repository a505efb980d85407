use crate::{
    entities::PropertyData,
    mapper::{
        normalized,
        relation::{MiddleComponentData, MiddleComponentMapper, MiddleIdData},
    },
    revision::RevisionType,
    value::{AuditRow, Value},
};
use serde::Serialize;
use std::collections::BTreeMap;

///
/// CommonCollectionMapperData
///
/// The per-collection facts every collection mapper shares, resolved once
/// during generation.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommonCollectionMapperData {
    /// Audit entity name the change rows target. `None` for join-column
    /// collections, whose changes surface on the element entity instead.
    pub audit_middle_entity_name: Option<String>,

    pub property_data: PropertyData,

    /// The owning entity's id, plus its prefixed form inside middle rows.
    pub referencing_id_data: MiddleIdData,

    pub original_id_prop_name: String,
    pub revision_type_prop_name: String,

    /// Whether the revision type participates in the middle table's id.
    /// True exactly when element equality is structural (embeddables, LOB
    /// map values).
    pub revision_type_in_id: bool,

    /// Synthetic ordinal key column for embeddable set elements.
    pub ordinal_prop_name: Option<String>,
}

///
/// CollectionMapperKind
///
/// Closed tag for the collection semantics a mapper diffs under.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum CollectionMapperKind {
    Bag,
    List,
    Map,
    Set,
    SortedMap { comparator: Option<String> },
    SortedSet { comparator: Option<String> },
}

///
/// PersistentCollectionChangeData
///
/// One middle-table audit row produced by a collection diff.
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PersistentCollectionChangeData {
    pub entity_name: String,
    pub data: AuditRow,
    pub revision_type: RevisionType,
}

///
/// CollectionPropertyMapper
///

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CollectionPropertyMapper {
    pub common: CommonCollectionMapperData,
    pub kind: CollectionMapperKind,
    pub element: MiddleComponentData,
    pub index: Option<MiddleComponentData>,
}

impl CollectionPropertyMapper {
    /// Whether the collection differs between revisions. Null and empty are
    /// distinct states.
    #[must_use]
    pub fn is_modified(&self, new: Option<&Value>, old: Option<&Value>) -> bool {
        normalized(new) != normalized(old)
    }

    /// Diffs the old and new collection values into middle-table audit
    /// rows: one `Add` row per added element, one `Del` row per removed
    /// element. An unchanged element produces nothing. Null collections
    /// diff as empty.
    #[must_use]
    pub fn collection_changes(
        &self,
        owner_id: &Value,
        new: Option<&Value>,
        old: Option<&Value>,
    ) -> Vec<PersistentCollectionChangeData> {
        let Some(entity_name) = self.common.audit_middle_entity_name.clone() else {
            return Vec::new();
        };

        let mut changes = Vec::new();
        match &self.kind {
            CollectionMapperKind::Set | CollectionMapperKind::SortedSet { .. } => {
                self.set_changes(&entity_name, owner_id, new, old, &mut changes);
            }
            CollectionMapperKind::Bag => {
                self.bag_changes(&entity_name, owner_id, new, old, &mut changes);
            }
            CollectionMapperKind::List => {
                self.list_changes(&entity_name, owner_id, new, old, &mut changes);
            }
            CollectionMapperKind::Map | CollectionMapperKind::SortedMap { .. } => {
                self.map_changes(&entity_name, owner_id, new, old, &mut changes);
            }
        }
        changes
    }

    fn set_changes(
        &self,
        entity_name: &str,
        owner_id: &Value,
        new: Option<&Value>,
        old: Option<&Value>,
        changes: &mut Vec<PersistentCollectionChangeData>,
    ) {
        let empty = std::collections::BTreeSet::new();
        let new_set = new.and_then(Value::as_set).unwrap_or(&empty);
        let old_set = old.and_then(Value::as_set).unwrap_or(&empty);

        for (ordinal, element) in new_set.iter().enumerate() {
            if !old_set.contains(element) {
                changes.push(self.change_row(
                    entity_name,
                    owner_id,
                    element,
                    None,
                    Some(ordinal),
                    RevisionType::Add,
                ));
            }
        }
        for element in old_set {
            if !new_set.contains(element) {
                changes.push(self.change_row(
                    entity_name,
                    owner_id,
                    element,
                    None,
                    Some(0),
                    RevisionType::Del,
                ));
            }
        }
    }

    fn bag_changes(
        &self,
        entity_name: &str,
        owner_id: &Value,
        new: Option<&Value>,
        old: Option<&Value>,
        changes: &mut Vec<PersistentCollectionChangeData>,
    ) {
        let empty = Vec::new();
        let new_list = new.and_then(Value::as_list).unwrap_or(&empty);
        let old_list = old.and_then(Value::as_list).unwrap_or(&empty);

        let mut counts: BTreeMap<&Value, i64> = BTreeMap::new();
        for element in new_list {
            *counts.entry(element).or_insert(0) += 1;
        }
        for element in old_list {
            *counts.entry(element).or_insert(0) -= 1;
        }

        for (element, delta) in counts {
            let (revision_type, repeats) = if delta > 0 {
                (RevisionType::Add, delta)
            } else if delta < 0 {
                (RevisionType::Del, -delta)
            } else {
                continue;
            };
            for _ in 0..repeats {
                changes.push(self.change_row(
                    entity_name,
                    owner_id,
                    element,
                    None,
                    None,
                    revision_type,
                ));
            }
        }
    }

    fn list_changes(
        &self,
        entity_name: &str,
        owner_id: &Value,
        new: Option<&Value>,
        old: Option<&Value>,
        changes: &mut Vec<PersistentCollectionChangeData>,
    ) {
        let empty = Vec::new();
        let new_list = new.and_then(Value::as_list).unwrap_or(&empty);
        let old_list = old.and_then(Value::as_list).unwrap_or(&empty);

        // Elements diff as (value, index) pairs, so a moved element is a
        // removal at the old position plus an addition at the new one.
        for (index, element) in new_list.iter().enumerate() {
            if old_list.get(index) != Some(element) {
                let index_value = Value::Int(to_index(index));
                changes.push(self.change_row(
                    entity_name,
                    owner_id,
                    element,
                    Some(&index_value),
                    None,
                    RevisionType::Add,
                ));
            }
        }
        for (index, element) in old_list.iter().enumerate() {
            if new_list.get(index) != Some(element) {
                let index_value = Value::Int(to_index(index));
                changes.push(self.change_row(
                    entity_name,
                    owner_id,
                    element,
                    Some(&index_value),
                    None,
                    RevisionType::Del,
                ));
            }
        }
    }

    fn map_changes(
        &self,
        entity_name: &str,
        owner_id: &Value,
        new: Option<&Value>,
        old: Option<&Value>,
        changes: &mut Vec<PersistentCollectionChangeData>,
    ) {
        let empty = BTreeMap::new();
        let new_map = new.and_then(Value::as_map).unwrap_or(&empty);
        let old_map = old.and_then(Value::as_map).unwrap_or(&empty);

        for (key, value) in new_map {
            if old_map.get(key) != Some(value) {
                changes.push(self.change_row(
                    entity_name,
                    owner_id,
                    value,
                    Some(key),
                    None,
                    RevisionType::Add,
                ));
            }
        }
        for (key, value) in old_map {
            if new_map.get(key) != Some(value) {
                changes.push(self.change_row(
                    entity_name,
                    owner_id,
                    value,
                    Some(key),
                    None,
                    RevisionType::Del,
                ));
            }
        }
    }

    fn change_row(
        &self,
        entity_name: &str,
        owner_id: &Value,
        element: &Value,
        index: Option<&Value>,
        ordinal: Option<usize>,
        revision_type: RevisionType,
    ) -> PersistentCollectionChangeData {
        let mut original_id = AuditRow::new();
        self.common
            .referencing_id_data
            .prefixed_mapper
            .map_to_row_from_id(&mut original_id, Some(owner_id));
        // not-key elements live outside the composite id
        let mut not_key = AuditRow::new();
        if let MiddleComponentMapper::NotKey { .. } = &self.element.mapper {
            self.element.mapper.map_to_row(&mut not_key, Some(element));
        } else {
            self.element.mapper.map_to_row(&mut original_id, Some(element));
        }
        if let Some(index_data) = &self.index {
            index_data.mapper.map_to_row(&mut original_id, index);
        }
        if let (Some(ordinal_prop), Some(ordinal)) = (&self.common.ordinal_prop_name, ordinal) {
            original_id.insert(ordinal_prop.clone(), Value::Int(to_index(ordinal)));
        }

        let revision_type_value = Value::Int(i64::from(revision_type.as_i16()));
        if self.common.revision_type_in_id {
            original_id.insert(
                self.common.revision_type_prop_name.clone(),
                revision_type_value.clone(),
            );
        }

        let mut data = not_key;
        data.insert(
            self.common.revision_type_prop_name.clone(),
            revision_type_value,
        );
        data.insert(
            self.common.original_id_prop_name.clone(),
            Value::Composite(original_id),
        );

        PersistentCollectionChangeData {
            entity_name: entity_name.to_string(),
            data,
            revision_type,
        }
    }
}

#[allow(clippy::cast_possible_wrap)]
const fn to_index(index: usize) -> i64 {
    index as i64
}
