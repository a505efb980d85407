use crate::{err, node::MappingModel, validate::ErrorTree};
use std::collections::BTreeMap;

// Characters allowed in entity and table identifiers.
fn is_valid_ident(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '$')
}

/// Entity names must be unique per table and use a storable identifier
/// charset; the audit name register depends on both.
pub fn validate_entity_naming(model: &MappingModel, errs: &mut ErrorTree) {
    let mut by_table: BTreeMap<&str, &str> = BTreeMap::new();

    for (name, entity) in &model.entities {
        if !is_valid_ident(name) {
            err!(errs, "entity name '{name}' contains invalid characters");
        }
        if !entity.table.is_empty()
            && let Some(prev) = by_table.insert(entity.table.as_str(), name)
        {
            // Joined subclasses legitimately share the root table only when
            // related through the hierarchy.
            let related = entity.superclass.as_deref() == Some(prev)
                || model
                    .entities
                    .get(prev)
                    .is_some_and(|p| p.superclass.as_deref() == Some(name.as_str()));
            if !related {
                err!(
                    errs,
                    "entities '{prev}' and '{name}' both map table '{}'",
                    entity.table
                );
            }
        }
    }
}
