use crate::prelude::*;

///
/// Collection
///
/// A many-valued property as resolved by the live mapping. The audit
/// generator replicates, exactly, the live mapping's decision of whether a
/// physical join table exists; the flags here carry everything that
/// decision needs.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Collection {
    pub kind: CollectionKind,
    pub element: CollectionElement,

    /// Index/key value for indexed collections (`List`, `Map`, `SortedMap`).
    pub index: Option<PropertyValue>,

    /// Whether this side is the inverse (non-owning) side.
    pub inverse: bool,

    /// Live-schema `mappedBy`, when the mapping declares one.
    pub mapped_by_property: Option<String>,

    /// Foreign-key columns joining rows back to the owning entity.
    pub key_selectables: Vec<Selectable>,

    /// Physical join table, when the live mapping uses one.
    pub collection_table: Option<String>,

    pub where_fragment: Option<String>,
    pub order_by: Option<String>,

    /// Comparator type name for sorted containers.
    pub comparator: Option<String>,
}

impl Collection {
    #[must_use]
    pub fn new(kind: CollectionKind, element: CollectionElement) -> Self {
        Self {
            kind,
            element,
            index: None,
            inverse: false,
            mapped_by_property: None,
            key_selectables: Vec::new(),
            collection_table: None,
            where_fragment: None,
            order_by: None,
            comparator: None,
        }
    }

    /// Entity name of the element, if the element is a relation.
    #[must_use]
    pub fn referenced_entity(&self) -> Option<&str> {
        match &self.element {
            CollectionElement::ManyToOne(many_to_one) => Some(&many_to_one.referenced_entity),
            CollectionElement::OneToMany { referenced_entity } => Some(referenced_entity),
            CollectionElement::Basic(_) | CollectionElement::Component(_) => None,
        }
    }

    #[must_use]
    pub const fn is_embeddable_element(&self) -> bool {
        matches!(self.element, CollectionElement::Component(_))
    }

    /// Whether this is a map whose element is a materialized CLOB/NCLOB.
    #[must_use]
    pub const fn is_lob_map_element(&self) -> bool {
        if !self.kind.is_map() {
            return false;
        }
        match &self.element {
            CollectionElement::Basic(basic) => basic.kind.is_lob_string(),
            _ => false,
        }
    }
}

///
/// CollectionElement
///
/// What one element of the collection is. `OneToMany` is the
/// foreign-key-on-the-referenced-table case; `ManyToOne` elements appear
/// for join-table associations.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum CollectionElement {
    Basic(BasicValue),
    Component(Component),
    ManyToOne(ManyToOne),
    OneToMany { referenced_entity: String },
}
