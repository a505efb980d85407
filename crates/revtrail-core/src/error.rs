use thiserror::Error as ThisError;

///
/// Error
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error(transparent)]
    ModifiedFlag(#[from] ModifiedFlagError),

    #[error(transparent)]
    Schema(#[from] revtrail_schema::Error),
}

///
/// MappingError
///
/// Bootstrap-time mapping errors. All fatal: a half-built audit schema is
/// unusable, so no partial-mapping recovery is attempted.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MappingError {
    #[error("type not supported for auditing: {type_name}, on entity {entity}, property '{property}'")]
    UnsupportedType {
        entity: String,
        property: String,
        type_name: String,
    },

    #[error("unable to read the mapped-by attribute for {property} in {referenced_class}")]
    UnresolvedMappedBy {
        property: String,
        referenced_class: String,
    },

    #[error("{}", not_audited_target_message(.entity, .property, .referenced_entity, *.allow_not_audited_target))]
    NotAuditedTarget {
        entity: String,
        property: String,
        referenced_entity: String,
        allow_not_audited_target: bool,
    },

    #[error("audit entity name '{name}' is already registered")]
    DuplicateAuditEntityName { name: String },

    #[error("formula mappings (except discriminators) are not supported: entity {entity}, property '{property}'")]
    FormulaNotSupported { entity: String, property: String },

    #[error("unable to read auditing configuration for {entity}; first pass has not run")]
    MissingEntityConfiguration { entity: String },

    #[error("entity '{entity}' is audited, but its superclass '{superclass}' is not")]
    SuperclassNotAudited { entity: String, superclass: String },

    #[error("unsupported identifier mapping on audited entity {entity}")]
    UnsupportedIdMapping { entity: String },

    #[error("collection {entity}.{property} requires a middle table, but the mapping declares none")]
    MissingCollectionTable { entity: String, property: String },

    #[error("identifier mapper and identifier model disagree for entity {entity}: {detail}")]
    InconsistentIdMapping { entity: String, detail: String },
}

fn not_audited_target_message(
    entity: &str,
    property: &str,
    referenced_entity: &str,
    allow_not_audited_target: bool,
) -> String {
    let hint = if allow_not_audited_target {
        " - such a mapping is possible, but has to be explicitly defined with \
         relation target audit mode NOT_AUDITED"
    } else {
        ""
    };

    format!("an audited relation from {entity}.{property} to a not audited entity {referenced_entity}{hint}")
}

///
/// ModifiedFlagError
///
/// User errors raised at audit-query build time, never during flush.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ModifiedFlagError {
    #[error("property '{property}' of entity {entity} does not track modification flags")]
    NotTracked { entity: String, property: String },

    #[error("entity {entity} has no audited property '{property}'")]
    UnknownProperty { entity: String, property: String },

    #[error("entity {entity} is not audited")]
    NotAudited { entity: String },
}
