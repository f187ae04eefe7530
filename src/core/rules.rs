use serde::{Deserialize, Serialize};

/// Thresholds shared by the validator and the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTable {
    /// Ages at or below this value are rejected.
    pub min_age_exclusive: i64,
    /// Ages above this value are rejected.
    pub max_age: i64,
    /// First age of the middle bucket.
    pub middle_from: i64,
    /// Last age of the middle bucket.
    pub middle_to: i64,
}

impl Default for RuleTable {
    fn default() -> Self {
        Self {
            min_age_exclusive: 0,
            max_age: 110,
            middle_from: 25,
            middle_to: 35,
        }
    }
}
