use crate::prelude::*;

///
/// IdShape
///
/// Identifier shape of an entity: a single basic property, or a composite
/// (embedded id or id-class). Composite parts may themselves be relations
/// (many-to-one used as id); those are resolved during the generator's
/// second pass.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum IdShape {
    Single(IdProperty),
    Composite {
        class_name: Option<String>,

        /// True for id-class mappings, false for embedded ids.
        id_class: bool,

        properties: Vec<IdProperty>,
    },
}

impl IdShape {
    #[must_use]
    pub fn single(name: impl Into<String>, value: PropertyValue) -> Self {
        Self::Single(IdProperty {
            name: name.into(),
            access: AccessType::default(),
            value,
        })
    }

    pub fn properties(&self) -> impl Iterator<Item = &IdProperty> {
        match self {
            Self::Single(property) => std::slice::from_ref(property).iter(),
            Self::Composite { properties, .. } => properties.iter(),
        }
    }

    /// Whether any part of the identifier is a relation to another entity.
    #[must_use]
    pub fn has_relation_part(&self) -> bool {
        self.properties()
            .any(|p| matches!(p.value, PropertyValue::ManyToOne(_)))
    }
}

impl ValidateNode for IdShape {
    fn validate(&self) -> Result<(), ErrorTree> {
        let mut errs = ErrorTree::new();

        match self {
            Self::Single(_) => {}
            Self::Composite { properties, .. } => {
                if properties.is_empty() {
                    err!(errs, "composite identifier has no properties");
                }
            }
        }

        errs.result()
    }
}

///
/// IdProperty
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct IdProperty {
    pub name: String,
    pub access: AccessType,
    pub value: PropertyValue,
}

impl IdProperty {
    #[must_use]
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            access: AccessType::default(),
            value,
        }
    }
}
