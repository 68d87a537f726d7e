use serde::{Deserialize, Serialize};

use super::transaction::EntryKind;

/// Categorises ledger activity for reporting. Names are unique across both kinds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub kind: EntryKind,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}
