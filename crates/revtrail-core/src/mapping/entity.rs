use crate::mapping::{Attribute, AuditColumn, AuditJoin, CompositeIdentifier};
use serde::Serialize;

///
/// AuditTableData
///
/// Naming of one audit table, resolved from configuration plus any
/// per-entity override.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AuditTableData {
    pub audit_entity_name: String,
    pub audit_table_name: String,
    pub schema: Option<String>,
    pub catalog: Option<String>,
}

///
/// PersistentEntity
///
/// One audit entity in the generated schema. Roots own the table and the
/// composite identifier; subclasses extend a previously generated audit
/// entity the way their live counterparts extend theirs.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum PersistentEntity {
    Root(RootPersistentEntity),
    Subclass(SubclassPersistentEntity),
}

impl PersistentEntity {
    #[must_use]
    pub fn audit_entity_name(&self) -> &str {
        match self {
            Self::Root(root) => &root.table.audit_entity_name,
            Self::Subclass(subclass) => &subclass.audit_entity_name,
        }
    }

    /// The audit entity name this one extends, when a subclass.
    #[must_use]
    pub fn extends(&self) -> Option<&str> {
        match self {
            Self::Root(_) => None,
            Self::Subclass(subclass) => Some(&subclass.extends),
        }
    }

    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Self::Root(root) => &root.attributes,
            Self::Subclass(subclass) => &subclass.attributes,
        }
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        match self {
            Self::Root(root) => root.attributes.push(attribute),
            Self::Subclass(subclass) => subclass.attributes.push(attribute),
        }
    }

    #[must_use]
    pub fn joins(&self) -> &[AuditJoin] {
        match self {
            Self::Root(root) => &root.joins,
            Self::Subclass(subclass) => &subclass.joins,
        }
    }

    pub fn joins_mut(&mut self) -> &mut Vec<AuditJoin> {
        match self {
            Self::Root(root) => &mut root.joins,
            Self::Subclass(subclass) => &mut subclass.joins,
        }
    }

    #[must_use]
    pub const fn as_root(&self) -> Option<&RootPersistentEntity> {
        match self {
            Self::Root(root) => Some(root),
            Self::Subclass(_) => None,
        }
    }
}

///
/// RootPersistentEntity
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RootPersistentEntity {
    pub table: AuditTableData,
    pub is_abstract: bool,
    pub identifier: CompositeIdentifier,
    pub discriminator: Option<DiscriminatorMapping>,
    pub discriminator_value: Option<String>,
    pub attributes: Vec<Attribute>,
    pub joins: Vec<AuditJoin>,
}

///
/// DiscriminatorMapping
///
/// The only place a formula survives into the audit schema.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DiscriminatorMapping {
    pub selectable: revtrail_schema::node::Selectable,
    pub type_name: String,
}

///
/// SubclassPersistentEntity
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SubclassPersistentEntity {
    pub audit_entity_name: String,
    pub extends: String,
    pub kind: SubclassKind,
    pub discriminator_value: Option<String>,
    pub attributes: Vec<Attribute>,
    pub joins: Vec<AuditJoin>,
}

///
/// SubclassKind
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum SubclassKind {
    /// Shares the root's audit table, selected by discriminator value.
    Discriminator,

    /// Own audit table joined to the parent's by the composite id columns.
    Joined {
        table: AuditTableData,
        key_columns: Vec<AuditColumn>,
    },

    /// Own audit table holding the full set of inherited columns.
    Union { table: AuditTableData },
}

///
/// MiddleAuditEntity
///
/// The audit counterpart of a collection middle table. Its identifier packs
/// the owner id, the revision relation, the element reference and any index
/// columns; the revision type joins the id only when element equality is
/// structural.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MiddleAuditEntity {
    pub audit_entity_name: String,
    pub table_name: String,
    pub schema: Option<String>,
    pub catalog: Option<String>,
    pub identifier: CompositeIdentifier,
    pub revision_type_in_id: bool,
    pub attributes: Vec<Attribute>,
    pub where_fragment: Option<String>,
}
