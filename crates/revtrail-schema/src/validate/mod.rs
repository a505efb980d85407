//! Mapping-model validation: structural and local invariants checked before
//! the model is handed to the audit generator.

pub mod naming;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::node::MappingModel;

/// Push a formatted error onto an [`ErrorTree`].
#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {
        $errs.add(format!($($arg)*))
    };
}

/// Run full model validation in a deterministic order.
pub fn validate_model(model: &MappingModel) -> Result<(), ErrorTree> {
    let mut errs = ErrorTree::new();

    if let Err(e) = model.validate() {
        errs.merge(e);
    }
    naming::validate_entity_naming(model, &mut errs);

    errs.result()
}

///
/// ValidateNode
///

pub trait ValidateNode {
    fn validate(&self) -> Result<(), ErrorTree> {
        Ok(())
    }
}

///
/// ErrorTree
///
/// Aggregates validation errors with route-aware nesting, so one bootstrap
/// failure reports every problem found.
///

#[derive(Clone, Debug, Default, Serialize)]
pub struct ErrorTree {
    errors: Vec<String>,
    children: BTreeMap<String, ErrorTree>,
}

impl ErrorTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn add_child(&mut self, key: &str, child: Self) {
        if !child.is_empty() {
            self.children
                .entry(key.to_string())
                .or_default()
                .merge(child);
        }
    }

    pub fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
        for (key, child) in other.children {
            self.children.entry(key).or_default().merge(child);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.children.is_empty()
    }

    /// Total number of errors, including nested ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len() + self.children.values().map(Self::len).sum::<usize>()
    }

    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, route: &str) -> fmt::Result {
        for error in &self.errors {
            if route.is_empty() {
                writeln!(f, "{error}")?;
            } else {
                writeln!(f, "{route}: {error}")?;
            }
        }
        for (key, child) in &self.children {
            let route = if route.is_empty() {
                key.clone()
            } else {
                format!("{route}.{key}")
            };
            child.fmt_nested(f, &route)?;
        }

        Ok(())
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_nested(f, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{BasicValue, Entity, IdShape, MappingModel, Property, PropertyValue};
    use crate::types::BasicKind;

    fn id() -> IdShape {
        IdShape::single(
            "id",
            PropertyValue::Basic(BasicValue::new("long", BasicKind::Int, "id")),
        )
    }

    #[test]
    fn empty_tree_is_ok() {
        assert!(ErrorTree::new().result().is_ok());
    }

    #[test]
    fn nested_errors_render_routes() {
        let mut errs = ErrorTree::new();
        let mut child = ErrorTree::new();
        err!(child, "bad column");
        errs.add_child("Customer", child);

        let rendered = errs.to_string();
        assert!(rendered.contains("Customer: bad column"));
        assert_eq!(errs.len(), 1);
    }

    #[test]
    fn duplicate_property_names_rejected() {
        let mut entity = Entity::new("Customer", id());
        entity.properties.push(Property::basic(
            "name",
            BasicValue::new("string", BasicKind::Text, "name"),
        ));
        entity.properties.push(Property::basic(
            "name",
            BasicValue::new("string", BasicKind::Text, "name2"),
        ));

        let mut model = MappingModel::new();
        model.add_entity(entity);

        let err = validate_model(&model).unwrap_err();
        assert!(err.to_string().contains("duplicate property name 'name'"));
    }

    #[test]
    fn unknown_superclass_rejected() {
        let mut entity = Entity::new("Dog", id());
        entity.superclass = Some("Animal".to_string());

        let mut model = MappingModel::new();
        model.add_entity(entity);

        let err = validate_model(&model).unwrap_err();
        assert!(err.to_string().contains("unknown entity 'Animal'"));
    }
}
