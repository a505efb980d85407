use crate::error::MappingError;
use std::collections::BTreeSet;

///
/// AuditEntityNameRegister
///
/// Write-once registry of audit entity names, owned by the generator for
/// the duration of one bootstrap. Registration is fatal on collision;
/// middle entities ask for a uniquified name instead.
///

#[derive(Debug, Default)]
pub struct AuditEntityNameRegister {
    names: BTreeSet<String>,
}

impl AuditEntityNameRegister {
    pub fn register(&mut self, name: &str) -> Result<(), MappingError> {
        if self.names.insert(name.to_string()) {
            Ok(())
        } else {
            Err(MappingError::DuplicateAuditEntityName {
                name: name.to_string(),
            })
        }
    }

    /// Registers and returns `base`, or the first `base{n}` that is free.
    pub fn create_unique(&mut self, base: &str) -> String {
        if self.names.insert(base.to_string()) {
            return base.to_string();
        }
        let mut counter = 1u32;
        loop {
            let candidate = format!("{base}{counter}");
            if self.names.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_rejects_duplicates() {
        let mut register = AuditEntityNameRegister::default();
        assert!(register.register("Customer_AUD").is_ok());
        assert!(matches!(
            register.register("Customer_AUD"),
            Err(MappingError::DuplicateAuditEntityName { .. })
        ));
    }

    #[test]
    fn create_unique_appends_counters() {
        let mut register = AuditEntityNameRegister::default();
        assert_eq!(register.create_unique("Cart_items_AUD"), "Cart_items_AUD");
        assert_eq!(register.create_unique("Cart_items_AUD"), "Cart_items_AUD1");
        assert_eq!(register.create_unique("Cart_items_AUD"), "Cart_items_AUD2");
        assert!(register.contains("Cart_items_AUD1"));
    }
}
