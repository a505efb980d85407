use serde::{Deserialize, Serialize};

///
/// AuditConfig
///
/// The configuration surface the generator consumes. One value per
/// bootstrap; handed by reference through every generator call, never held
/// in process-global state.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AuditConfig {
    /// Prefix for synthesized audit entity/table names.
    pub audit_table_prefix: String,

    /// Suffix for synthesized audit entity/table names.
    pub audit_table_suffix: String,

    /// Name of the composite-id property holding the original entity id.
    pub original_id_prop_name: String,

    /// Revision-number field/column name.
    pub revision_field_name: String,

    /// Revision-type field/column name.
    pub revision_type_field_name: String,

    /// Suffix appended to a property name to derive its modified-flag
    /// column, unless an explicit per-property name is configured.
    pub modified_flag_suffix: String,

    /// Whether properties track modified flags unless overridden.
    pub global_with_modified_flag: bool,

    /// Whether deleted rows keep their full data in the audit table.
    pub store_data_at_delete: bool,

    /// Synthetic ordinal column distinguishing structurally-equal embeddable
    /// set elements inside a middle table's key.
    pub embeddable_set_ordinal_field_name: String,

    /// Legacy relation-target-not-found behavior switch. In legacy mode the
    /// live mapping's ignore-not-found opt-in decides; in non-legacy mode a
    /// missing target errors unless the property explicitly requests ignore.
    pub global_legacy_relation_target_not_found: bool,

    /// Entity name of the revision-info entity every audit identifier
    /// references.
    pub revision_info_entity_name: String,

    pub strategy: AuditStrategy,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            audit_table_prefix: String::new(),
            audit_table_suffix: "_AUD".to_string(),
            original_id_prop_name: "originalId".to_string(),
            revision_field_name: "REV".to_string(),
            revision_type_field_name: "REVTYPE".to_string(),
            modified_flag_suffix: "_MOD".to_string(),
            global_with_modified_flag: false,
            store_data_at_delete: false,
            embeddable_set_ordinal_field_name: "SETORDINAL".to_string(),
            global_legacy_relation_target_not_found: true,
            revision_info_entity_name: "RevisionInfo".to_string(),
            strategy: AuditStrategy::default(),
        }
    }
}

impl AuditConfig {
    /// Audit entity name for a live entity name.
    #[must_use]
    pub fn audit_entity_name(&self, entity_name: &str) -> String {
        format!(
            "{}{entity_name}{}",
            self.audit_table_prefix, self.audit_table_suffix
        )
    }

    /// Audit table name for a live table name.
    #[must_use]
    pub fn audit_table_name(&self, table_name: &str) -> String {
        format!(
            "{}{table_name}{}",
            self.audit_table_prefix, self.audit_table_suffix
        )
    }

    /// Modified-flag column name for a property, honoring the explicit
    /// override.
    #[must_use]
    pub fn modified_flag_name(&self, property_name: &str, explicit: Option<&str>) -> String {
        explicit.map_or_else(
            || format!("{property_name}{}", self.modified_flag_suffix),
            ToString::to_string,
        )
    }
}

///
/// AuditStrategy
///
/// How revision validity is persisted. The default strategy stores only the
/// start revision; the validity strategy adds an end-revision relation and
/// optionally an end timestamp.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AuditStrategy {
    #[default]
    Default,
    Validity(ValidityStrategyConfig),
}

impl AuditStrategy {
    #[must_use]
    pub const fn as_validity(&self) -> Option<&ValidityStrategyConfig> {
        match self {
            Self::Default => None,
            Self::Validity(validity) => Some(validity),
        }
    }
}

///
/// ValidityStrategyConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ValidityStrategyConfig {
    pub revision_end_field_name: String,

    /// Whether an end-revision timestamp column is also kept.
    pub revision_end_timestamp: bool,

    pub revision_end_timestamp_field_name: String,

    /// Legacy placement keeps the timestamp on the audited entity itself;
    /// the new placement puts it only on the root of a joined hierarchy.
    pub revision_end_timestamp_legacy_placement: bool,
}

impl Default for ValidityStrategyConfig {
    fn default() -> Self {
        Self {
            revision_end_field_name: "REVEND".to_string(),
            revision_end_timestamp: false,
            revision_end_timestamp_field_name: "REVEND_TSTMP".to_string(),
            revision_end_timestamp_legacy_placement: true,
        }
    }
}
