use crate::prelude::*;

///
/// Property
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Property {
    pub name: String,
    pub access: AccessType,
    pub value: PropertyValue,
    pub insertable: bool,

    /// Synthetic order-column style property created by the live mapping,
    /// not declared on the class.
    pub synthetic: bool,

    pub audit: AuditOptions,
}

impl Property {
    #[must_use]
    pub fn new(name: impl Into<String>, value: PropertyValue) -> Self {
        Self {
            name: name.into(),
            access: AccessType::default(),
            value,
            insertable: true,
            synthetic: false,
            audit: AuditOptions::default(),
        }
    }

    #[must_use]
    pub fn basic(name: impl Into<String>, basic: BasicValue) -> Self {
        Self::new(name, PropertyValue::Basic(basic))
    }
}

impl ValidateNode for Property {
    fn validate(&self) -> Result<(), ErrorTree> {
        let mut errs = ErrorTree::new();

        if self.name.is_empty() {
            err!(errs, "property name is empty");
        }
        if self.name.len() > crate::MAX_PROPERTY_NAME_LEN {
            err!(errs, "property name '{}' is too long", self.name);
        }

        errs.result()
    }
}
