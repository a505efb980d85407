use crate::prelude::*;
use std::collections::BTreeMap;

///
/// AuditOptions
///
/// Per-property auditing data, resolved once when the mapping is read and
/// shared read-only between first and second pass.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct AuditOptions {
    pub audited: bool,
    pub target_audit_mode: RelationTargetAuditMode,
    pub not_found_action: RelationTargetNotFoundAction,

    /// Per-property modified-flag override; `None` falls back to the global
    /// switch.
    pub with_modified_flag: Option<bool>,

    /// Explicit modified-flag column name; `None` derives name + suffix.
    pub modified_flag_name: Option<String>,

    /// Fake-bidirectional owner property on the referenced entity.
    pub audit_mapped_by: Option<String>,

    /// Property on the referenced entity holding the element position, for
    /// fake-bidirectional indexed collections.
    pub position_mapped_by: Option<String>,

    /// Map-key hint: `None` means no hint (the key value itself is mapped),
    /// empty string means the key is the referenced entity's id, any other
    /// value names a property of the referenced entity.
    pub map_key: Option<String>,

    pub join_table: Option<JoinTableOverride>,
}

impl Default for AuditOptions {
    fn default() -> Self {
        Self {
            audited: true,
            target_audit_mode: RelationTargetAuditMode::default(),
            not_found_action: RelationTargetNotFoundAction::default(),
            with_modified_flag: None,
            modified_flag_name: None,
            audit_mapped_by: None,
            position_mapped_by: None,
            map_key: None,
            join_table: None,
        }
    }
}

///
/// JoinTableOverride
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct JoinTableOverride {
    pub name: Option<String>,
    pub schema: Option<String>,
    pub catalog: Option<String>,
    pub inverse_join_columns: Vec<String>,
}

///
/// EntityAuditOptions
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct EntityAuditOptions {
    pub audited: bool,
    pub audit_table: Option<AuditTableOverride>,

    /// Secondary table name -> audit table name overrides.
    pub secondary_table_names: BTreeMap<String, String>,
}

impl Default for EntityAuditOptions {
    fn default() -> Self {
        Self {
            audited: true,
            audit_table: None,
            secondary_table_names: BTreeMap::new(),
        }
    }
}

///
/// AuditTableOverride
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct AuditTableOverride {
    pub name: Option<String>,
    pub schema: Option<String>,
    pub catalog: Option<String>,
}
