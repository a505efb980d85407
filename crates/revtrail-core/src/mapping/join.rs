use crate::mapping::{Attribute, AuditColumn};
use serde::Serialize;

///
/// AuditJoin
///
/// An audited secondary table. The key columns are the audit entity's full
/// composite id columns, so joined rows are versioned in lockstep with the
/// main audit row.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct AuditJoin {
    pub table_name: String,
    pub schema: Option<String>,
    pub catalog: Option<String>,
    pub key_columns: Vec<AuditColumn>,
    pub attributes: Vec<Attribute>,
}

impl AuditJoin {
    #[must_use]
    pub fn new(table_name: &str) -> Self {
        Self {
            table_name: table_name.to_string(),
            schema: None,
            catalog: None,
            key_columns: Vec::new(),
            attributes: Vec::new(),
        }
    }
}
