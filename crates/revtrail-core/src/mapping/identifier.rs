use crate::mapping::{Attribute, ManyToOneAttribute};
use serde::Serialize;

///
/// CompositeIdentifier
///
/// The synthetic composite identifier of an audit entity: the original
/// entity's id attributes plus exactly one relation to the revision-info
/// entity.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct CompositeIdentifier {
    pub name: String,
    pub attributes: Vec<Attribute>,
    revision_relation: Option<ManyToOneAttribute>,
}

impl CompositeIdentifier {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            revision_relation: None,
        }
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }

    /// Installs the relation to the revision-info entity. Called exactly
    /// once per identifier, after all original-id attributes are in place.
    pub fn add_revision_info_relation(&mut self, relation: ManyToOneAttribute) {
        debug_assert!(
            self.revision_relation.is_none(),
            "revision-info relation installed twice"
        );
        self.revision_relation = Some(relation);
    }

    #[must_use]
    pub const fn revision_relation(&self) -> Option<&ManyToOneAttribute> {
        self.revision_relation.as_ref()
    }
}
