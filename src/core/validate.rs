use crate::core::aggregate::{FailureReason, ValidationFailure};
use crate::core::rules::RuleTable;
use crate::domain::model::NormalizedUser;

/// Checks a normalized record. Rules run in a fixed order and the first one
/// that fails decides the reason: id, name, email, then age.
pub fn validate(
    index: usize,
    user: NormalizedUser,
    rules: &RuleTable,
) -> std::result::Result<NormalizedUser, ValidationFailure> {
    let reason = if user.id.is_empty() {
        Some(FailureReason::EmptyId)
    } else if user.name.is_empty() {
        Some(FailureReason::EmptyName)
    } else if user.email.is_empty() {
        Some(FailureReason::EmptyEmail)
    } else if user.age <= rules.min_age_exclusive || user.age > rules.max_age {
        Some(FailureReason::InvalidAge)
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ValidationFailure {
            index,
            record_id: user.id,
            reason,
        }),
        None => Ok(user),
    }
}
