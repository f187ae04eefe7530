use crate::core::rules::RuleTable;
use crate::domain::model::AgeGroup;

/// Maps an age to its bucket. Total: anything below the middle bucket is
/// `Young`, including values the validator would have rejected.
pub fn classify(age: i64, rules: &RuleTable) -> AgeGroup {
    if age < rules.middle_from {
        AgeGroup::Young
    } else if age <= rules.middle_to {
        AgeGroup::Middle
    } else {
        AgeGroup::Old
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_boundaries() {
        let rules = RuleTable::default();
        let cases = [
            (0, AgeGroup::Young),
            (1, AgeGroup::Young),
            (24, AgeGroup::Young),
            (25, AgeGroup::Middle),
            (30, AgeGroup::Middle),
            (35, AgeGroup::Middle),
            (36, AgeGroup::Old),
            (100, AgeGroup::Old),
            (1000, AgeGroup::Old),
        ];

        for (age, expected) in cases {
            assert_eq!(classify(age, &rules), expected, "age {}", age);
        }
    }

    #[test]
    fn test_classify_negative_age_is_young() {
        assert_eq!(classify(-10, &RuleTable::default()), AgeGroup::Young);
    }

    #[test]
    fn test_classify_is_stable() {
        let rules = RuleTable::default();
        for age in [24, 25, 35, 36] {
            assert_eq!(classify(age, &rules), classify(age, &rules));
        }
    }

    #[test]
    fn test_labels_round_trip_through_json() {
        for group in [AgeGroup::Young, AgeGroup::Middle, AgeGroup::Old] {
            let json = serde_json::to_string(&group).unwrap();
            assert_eq!(json, format!("\"{}\"", group.label()));
            let back: AgeGroup = serde_json::from_str(&json).unwrap();
            assert_eq!(back, group);
        }
        assert_eq!(AgeGroup::Young.label(), "до 25");
        assert_eq!(AgeGroup::Middle.label(), "от 25 до 35");
        assert_eq!(AgeGroup::Old.label(), "старше 35");
    }
}
