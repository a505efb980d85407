use crate::prelude::*;

///
/// Column
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

///
/// Selectable
///
/// A mapped column or a SQL formula. Formulas cannot be audited (outside of
/// discriminator formulas) and are rejected by the generator when
/// encountered on a regular property.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Selectable {
    Column(Column),
    Formula(String),
}

impl Selectable {
    pub fn column(name: impl Into<String>) -> Self {
        Self::Column(Column::new(name))
    }

    #[must_use]
    pub const fn as_column(&self) -> Option<&Column> {
        match self {
            Self::Column(column) => Some(column),
            Self::Formula(_) => None,
        }
    }

    #[must_use]
    pub const fn is_formula(&self) -> bool {
        matches!(self, Self::Formula(_))
    }
}

/// Column names of the given selectables, skipping formulas.
#[must_use]
pub fn column_names(selectables: &[Selectable]) -> Vec<&str> {
    selectables
        .iter()
        .filter_map(|s| s.as_column().map(|c| c.name.as_str()))
        .collect()
}
