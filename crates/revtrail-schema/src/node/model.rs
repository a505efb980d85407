use crate::prelude::*;
use std::collections::BTreeMap;

///
/// MappingModel
///
/// Root of the live mapping model, keyed by entity name. Cross-entity
/// lookups during generation go through this registry by name, never by
/// direct object reference.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct MappingModel {
    pub entities: BTreeMap<String, Entity>,
}

impl MappingModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entity(&mut self, entity: Entity) {
        self.entities.insert(entity.entity_name.clone(), entity);
    }

    #[must_use]
    pub fn entity_binding(&self, entity_name: &str) -> Option<&Entity> {
        self.entities.get(entity_name)
    }

    #[must_use]
    pub fn superclass_of(&self, entity: &Entity) -> Option<&Entity> {
        entity
            .superclass
            .as_deref()
            .and_then(|name| self.entities.get(name))
    }

    /// Entities in deterministic name order.
    pub fn entities_ordered(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }
}

impl ValidateNode for MappingModel {
    fn validate(&self) -> Result<(), ErrorTree> {
        let mut errs = ErrorTree::new();

        for (name, entity) in &self.entities {
            if let Err(e) = entity.validate() {
                errs.add_child(name, e);
            }
            if let Some(superclass) = &entity.superclass
                && !self.entities.contains_key(superclass)
            {
                err!(errs, "entity '{name}' extends unknown entity '{superclass}'");
            }
        }

        errs.result()
    }
}
