use serde::{Deserialize, Serialize};

/// A concrete grade in the school's vocabulary. `sort_order` orders Kindergarten (0)
/// through 11th (11) and is the only ordering the Grade Parser trusts (§4.1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub name: String,
    pub sort_order: u8,
}
