use crate::mapping::AuditColumn;
use serde::Serialize;

///
/// Attribute
///
/// A single mapped attribute of an audit entity. Only the shapes the audit
/// schema actually needs exist here; components are flattened into their
/// leaf basics before reaching this model.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub enum Attribute {
    Basic(BasicAttribute),
    ManyToOne(ManyToOneAttribute),
}

impl Attribute {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Basic(basic) => &basic.name,
            Self::ManyToOne(to_one) => &to_one.name,
        }
    }

    #[must_use]
    pub fn columns(&self) -> &[AuditColumn] {
        match self {
            Self::Basic(basic) => &basic.columns,
            Self::ManyToOne(to_one) => &to_one.columns,
        }
    }

    /// Copy of this attribute with the name prefixed and the columns
    /// replaced. Used when folding relation identifiers into composite ids.
    #[must_use]
    pub fn prefixed(&self, prefix: &str, columns: Vec<AuditColumn>) -> Self {
        match self {
            Self::Basic(basic) => Self::Basic(BasicAttribute {
                name: format!("{prefix}{}", basic.name),
                columns,
                ..basic.clone()
            }),
            Self::ManyToOne(to_one) => Self::ManyToOne(ManyToOneAttribute {
                name: format!("{prefix}{}", to_one.name),
                columns,
                ..to_one.clone()
            }),
        }
    }
}

///
/// BasicAttribute
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BasicAttribute {
    pub name: String,
    pub type_name: String,
    pub columns: Vec<AuditColumn>,

    /// Part of the enclosing composite identifier.
    pub key: bool,

    pub insertable: bool,
}

impl BasicAttribute {
    #[must_use]
    pub fn new(name: &str, type_name: &str, columns: Vec<AuditColumn>) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            columns,
            key: false,
            insertable: true,
        }
    }

    #[must_use]
    pub fn key(mut self) -> Self {
        self.key = true;
        self
    }
}

///
/// ManyToOneAttribute
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ManyToOneAttribute {
    pub name: String,
    pub referenced_entity: String,
    pub columns: Vec<AuditColumn>,
    pub insertable: bool,
}

impl ManyToOneAttribute {
    #[must_use]
    pub fn new(name: &str, referenced_entity: &str, columns: Vec<AuditColumn>) -> Self {
        Self {
            name: name.to_string(),
            referenced_entity: referenced_entity.to_string(),
            columns,
            insertable: true,
        }
    }
}
