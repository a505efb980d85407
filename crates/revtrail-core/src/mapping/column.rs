use serde::Serialize;

///
/// AuditColumn
///
/// A column in an audit table. Formulas never reach this model; they are
/// rejected during generation.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AuditColumn {
    pub name: String,
}

impl AuditColumn {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    #[must_use]
    pub fn many(names: &[&str]) -> Vec<Self> {
        names.iter().map(|name| Self::new(name)).collect()
    }
}
