use crate::prelude::*;

///
/// SecondaryJoin
///
/// A secondary table of an entity. The generator versions a join only when
/// every property mapped to it is audited.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct SecondaryJoin {
    pub table: String,
    pub schema: Option<String>,
    pub catalog: Option<String>,
    pub key_selectables: Vec<Selectable>,
    pub properties: Vec<Property>,
    pub optional: bool,
    pub inverse: bool,
}

impl SecondaryJoin {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            schema: None,
            catalog: None,
            key_selectables: Vec::new(),
            properties: Vec::new(),
            optional: false,
            inverse: false,
        }
    }
}
