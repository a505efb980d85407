use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// RevisionType
///
/// What happened to the audited row at a given revision.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Ord, PartialEq, PartialOrd, Serialize)]
#[remain::sorted]
pub enum RevisionType {
    Add,
    Del,
    Mod,
}

impl RevisionType {
    /// Stable numeric representation persisted in the revision-type column.
    #[must_use]
    pub const fn as_i16(self) -> i16 {
        match self {
            Self::Add => 0,
            Self::Mod => 1,
            Self::Del => 2,
        }
    }

    #[must_use]
    pub const fn from_i16(value: i16) -> Option<Self> {
        match value {
            0 => Some(Self::Add),
            1 => Some(Self::Mod),
            2 => Some(Self::Del),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_representation_round_trips() {
        for rt in [RevisionType::Add, RevisionType::Mod, RevisionType::Del] {
            assert_eq!(RevisionType::from_i16(rt.as_i16()), Some(rt));
        }
        assert_eq!(RevisionType::from_i16(3), None);
    }
}
