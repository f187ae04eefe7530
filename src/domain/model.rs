use crate::core::aggregate::ValidationErrors;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One `<user>` element as it arrives from the XML payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawUser {
    #[serde(rename = "@id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, deserialize_with = "age_from_text")]
    pub age: i64,
}

/// An empty `<age>` element reads as 0 and fails validation for that record
/// alone; non-numeric text is still a parse error.
fn age_from_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let text = String::deserialize(deserializer)?;
    let text = text.trim();
    if text.is_empty() {
        return Ok(0);
    }
    text.parse().map_err(serde::de::Error::custom)
}

/// A `RawUser` with its string fields trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// Age bucket. The serialized labels are consumed by the downstream collector
/// and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "до 25")]
    Young,
    #[serde(rename = "от 25 до 35")]
    Middle,
    #[serde(rename = "старше 35")]
    Old,
}

impl AgeGroup {
    pub const YOUNG_LABEL: &'static str = "до 25";
    pub const MIDDLE_LABEL: &'static str = "от 25 до 35";
    pub const OLD_LABEL: &'static str = "старше 35";

    pub fn label(&self) -> &'static str {
        match self {
            AgeGroup::Young => Self::YOUNG_LABEL,
            AgeGroup::Middle => Self::MIDDLE_LABEL,
            AgeGroup::Old => Self::OLD_LABEL,
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// JSON shape posted to the collector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputUser {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub age_group: AgeGroup,
}

/// Outcome of converting one batch.
///
/// `outputs` keeps the input order of the records that passed validation;
/// `errors` holds one entry per record that did not.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub outputs: Vec<OutputUser>,
    pub errors: Option<ValidationErrors>,
}

impl BatchResult {
    pub fn failure_count(&self) -> usize {
        self.errors.as_ref().map(ValidationErrors::len).unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.outputs.len() + self.failure_count()
    }

    pub fn all_failed(&self) -> bool {
        self.outputs.is_empty() && self.errors.is_some()
    }
}

/// What the delivery side reports back after a successful hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub destination: String,
    pub status: Option<u16>,
    pub body: String,
}
