use crate::prelude::*;

///
/// Entity
///
/// One entity of the live mapping model: identifier shape, ordered property
/// list with resolved value types, inheritance kind, secondary joins, and
/// entity-level audit options.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Entity {
    pub entity_name: String,
    pub class_name: String,
    pub table: String,
    pub schema: Option<String>,
    pub catalog: Option<String>,
    pub is_abstract: bool,
    pub inheritance: Inheritance,
    pub superclass: Option<String>,
    pub discriminator: Option<Discriminator>,
    pub discriminator_value: Option<String>,
    pub identifier: IdShape,
    pub properties: Vec<Property>,
    pub joins: Vec<SecondaryJoin>,
    pub audit: EntityAuditOptions,
}

impl Entity {
    #[must_use]
    pub fn new(entity_name: impl Into<String>, identifier: IdShape) -> Self {
        let entity_name = entity_name.into();

        Self {
            class_name: entity_name.clone(),
            entity_name,
            table: String::new(),
            schema: None,
            catalog: None,
            is_abstract: false,
            inheritance: Inheritance::default(),
            superclass: None,
            discriminator: None,
            discriminator_value: None,
            identifier,
            properties: Vec::new(),
            joins: Vec::new(),
            audit: EntityAuditOptions::default(),
        }
    }

    #[must_use]
    pub fn get_property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Properties mapped to the primary table (not to a secondary join).
    #[must_use]
    pub fn unjoined_properties(&self) -> &[Property] {
        &self.properties
    }
}

impl ValidateNode for Entity {
    fn validate(&self) -> Result<(), ErrorTree> {
        let mut errs = ErrorTree::new();

        if self.entity_name.is_empty() {
            err!(errs, "entity name is empty");
        }
        if self.entity_name.len() > crate::MAX_ENTITY_NAME_LEN {
            err!(errs, "entity name '{}' is too long", self.entity_name);
        }
        if let Err(e) = self.identifier.validate() {
            errs.add_child("identifier", e);
        }

        let mut seen = std::collections::BTreeSet::new();
        for property in &self.properties {
            if !seen.insert(property.name.as_str()) {
                err!(errs, "duplicate property name '{}'", property.name);
            }
            if let Err(e) = property.validate() {
                errs.add_child(&property.name, e);
            }
        }

        errs.result()
    }
}

///
/// Discriminator
///
/// Discriminator column or formula; the only place a formula is auditable.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Discriminator {
    pub selectable: Selectable,
    pub type_name: String,
}
