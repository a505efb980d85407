use serde::Serialize;

///
/// RelationQuery
///
/// A declarative description of how a relation's audit rows are fetched.
/// The engine stores descriptors, not statements; a query backend renders
/// them against its own dialect.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RelationQuery {
    pub entity_name: String,
    pub property_name: String,
    pub kind: RelationQueryKind,

    /// Row keys holding the owner's id inside the queried rows.
    pub owner_id_parameters: Vec<String>,

    /// Whether deletions must be filtered by revision type inside the id.
    pub revision_type_in_id: bool,

    /// Ordering declared on the live collection, applied by the backend
    /// after the revision filters.
    pub order_by: Option<String>,
}

///
/// RelationQueryKind
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[remain::sorted]
pub enum RelationQueryKind {
    /// Rows live in the related entity's own audit table, keyed back by the
    /// owner's id columns.
    OneAuditEntity { audit_entity_name: String },

    /// Rows live in a middle audit table; entity elements additionally join
    /// the referenced entity's audit table.
    TwoEntity {
        middle_entity_name: String,
        referenced_audit_entity_name: Option<String>,
    },
}

///
/// QueryGeneratorBuilder
///
/// Collects the relation queries produced while one collection is mapped.
///

#[derive(Debug, Default)]
pub struct QueryGeneratorBuilder {
    queries: Vec<RelationQuery>,
}

impl QueryGeneratorBuilder {
    pub fn add(&mut self, query: RelationQuery) {
        self.queries.push(query);
    }

    #[must_use]
    pub fn build(self) -> Vec<RelationQuery> {
        self.queries
    }
}
