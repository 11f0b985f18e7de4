use serde::{Deserialize, Serialize};

/// Merchant filter applied to every compiled query unless configured otherwise.
pub const DEFAULT_MERCHANT_ID: &str = "68468c7bbffca9a0a6b2a413";

/// Column every compiled query selects, groups and joins on.
pub const DEFAULT_KEY_COLUMN: &str = "user_id";

/// Minimum summed points for the expiring-points sub-query. Not derived from the condition.
pub const EXPIRING_POINTS_THRESHOLD: u64 = 1000;

/// Settings for [`QueryAssembler`](super::QueryAssembler).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Value of the trailing `merchant_id` filter.
    pub merchant_id: String,
    /// Output, grouping and join column.
    pub key_column: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            merchant_id: DEFAULT_MERCHANT_ID.to_string(),
            key_column: DEFAULT_KEY_COLUMN.to_string(),
        }
    }
}
