use crate::prelude::*;

///
/// PropertyValue
///
/// Resolved value of a mapped property. This is the closed set the
/// property-type classifier dispatches on; anything the generator meets
/// outside these variants is a mapping-model construction bug, not a
/// runtime condition.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PropertyValue {
    Basic(BasicValue),
    Component(Component),
    ManyToOne(ManyToOne),
    OneToOne(OneToOne),
    Collection(Box<Collection>),
}

impl PropertyValue {
    #[must_use]
    pub const fn as_basic(&self) -> Option<&BasicValue> {
        match self {
            Self::Basic(basic) => Some(basic),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_component(&self) -> Option<&Component> {
        match self {
            Self::Component(component) => Some(component),
            _ => None,
        }
    }

    /// Entity name referenced by this value, for reference-valued properties.
    #[must_use]
    pub fn referenced_entity(&self) -> Option<&str> {
        match self {
            Self::ManyToOne(many_to_one) => Some(&many_to_one.referenced_entity),
            Self::OneToOne(one_to_one) => Some(&one_to_one.referenced_entity),
            Self::Collection(collection) => collection.referenced_entity(),
            Self::Basic(_) | Self::Component(_) => None,
        }
    }

    /// Selectables of this value, where the value maps columns directly.
    #[must_use]
    pub fn selectables(&self) -> &[Selectable] {
        match self {
            Self::Basic(basic) => &basic.selectables,
            Self::ManyToOne(many_to_one) => &many_to_one.selectables,
            Self::Component(_) | Self::OneToOne(_) | Self::Collection(_) => &[],
        }
    }
}

///
/// BasicValue
///
/// A scalar value: resolved kind plus the custom type name (relevant for
/// enums and other user types) and its columns.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct BasicValue {
    pub type_name: String,
    pub kind: BasicKind,
    pub selectables: Vec<Selectable>,
}

impl BasicValue {
    pub fn new(type_name: impl Into<String>, kind: BasicKind, column: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            kind,
            selectables: vec![Selectable::column(column)],
        }
    }
}

///
/// Component
///
/// An embeddable: a named class whose properties are flattened into the
/// owning table.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Component {
    pub class_name: String,
    pub properties: Vec<Property>,
}

impl Component {
    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }
}

///
/// ManyToOne
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ManyToOne {
    pub referenced_entity: String,
    pub selectables: Vec<Selectable>,

    /// False when the inverse side owns the column. The generator may still
    /// force-insert the audit columns when audit-mapped-by redirects
    /// ownership to this side.
    pub insertable: bool,

    /// Legacy ignore-not-found opt-in carried by the live mapping.
    pub ignore_not_found: bool,
}

impl ManyToOne {
    pub fn new(referenced_entity: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            referenced_entity: referenced_entity.into(),
            selectables: vec![Selectable::column(column)],
            insertable: true,
            ignore_not_found: false,
        }
    }
}

///
/// OneToOne
///
/// `referenced_property` present means the non-owning side of a
/// bidirectional one-to-one; absent means a shared-primary-key mapping.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OneToOne {
    pub referenced_entity: String,
    pub referenced_property: Option<String>,
}
