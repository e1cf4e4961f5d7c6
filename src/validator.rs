//! Submission correctness.
//!
//! Validators are looked up by activity type. Unknown types fall back to the
//! `"transformations"` entry instead of failing the submission.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::DEFAULT_ACTIVITY_TYPE;
use crate::geometry::Point;
use crate::session::ActivitySession;

pub const CORRECT_MESSAGE: &str = "Correct! The transformation is accurate.";
pub const INCORRECT_MESSAGE: &str = "That graph is not correct. Try again.";
pub const NO_VALIDATOR_MESSAGE: &str = "No validator registered.";

pub fn count_message(expected: usize) -> String {
    format!("You must plot exactly {expected} points.")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerdictDetails {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub is_correct: bool,
    pub details: VerdictDetails,
}

impl Verdict {
    pub fn correct(message: impl Into<String>) -> Self {
        Self {
            is_correct: true,
            details: VerdictDetails {
                message: message.into(),
            },
        }
    }

    pub fn incorrect(message: impl Into<String>) -> Self {
        Self {
            is_correct: false,
            details: VerdictDetails {
                message: message.into(),
            },
        }
    }

    pub fn message(&self) -> &str {
        &self.details.message
    }
}

/// Judges a session's current student points.
pub trait Validator {
    fn validate(&self, session: &ActivitySession) -> Verdict;
}

impl<F> Validator for F
where
    F: Fn(&ActivitySession) -> Verdict,
{
    fn validate(&self, session: &ActivitySession) -> Verdict {
        self(session)
    }
}

/// Every expected point, taken in expected order, must claim a distinct
/// student point anywhere in the click sequence. Click order is irrelevant.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SetMatchValidator {
    pub tolerance: f64,
}

impl SetMatchValidator {
    pub fn check(&self, student: &[Point], expected: &[Point]) -> Verdict {
        if student.len() != expected.len() {
            return Verdict::incorrect(count_message(expected.len()));
        }

        let mut unmatched = student.to_vec();
        for exp in expected {
            match unmatched.iter().position(|stu| exp.within(stu, self.tolerance)) {
                Some(idx) => {
                    unmatched.remove(idx);
                }
                None => return Verdict::incorrect(INCORRECT_MESSAGE),
            }
        }
        Verdict::correct(CORRECT_MESSAGE)
    }
}

impl Validator for SetMatchValidator {
    fn validate(&self, session: &ActivitySession) -> Verdict {
        self.check(session.student_points(), session.expected_points())
    }
}

/// The i-th click must be the i-th expected point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionalValidator {
    pub tolerance: f64,
}

impl PositionalValidator {
    pub fn check(&self, student: &[Point], expected: &[Point]) -> Verdict {
        if student.len() != expected.len() {
            return Verdict::incorrect(count_message(expected.len()));
        }
        if student
            .iter()
            .zip(expected)
            .all(|(stu, exp)| exp.within(stu, self.tolerance))
        {
            Verdict::correct(CORRECT_MESSAGE)
        } else {
            Verdict::incorrect(INCORRECT_MESSAGE)
        }
    }
}

impl Validator for PositionalValidator {
    fn validate(&self, session: &ActivitySession) -> Verdict {
        self.check(session.student_points(), session.expected_points())
    }
}

/// Default submission check: exact count, then exact set matching.
pub fn validate(student: &[Point], expected: &[Point]) -> Verdict {
    SetMatchValidator::default().check(student, expected)
}

/// Activity type -> validator.
pub struct ValidatorRegistry {
    validators: HashMap<String, Box<dyn Validator>>,
}

impl ValidatorRegistry {
    /// A registry with nothing in it, not even the default entry.
    pub fn empty() -> Self {
        Self {
            validators: HashMap::new(),
        }
    }

    pub fn register(&mut self, activity_type: impl Into<String>, validator: impl Validator + 'static) {
        let activity_type = activity_type.into();
        debug!(%activity_type, "registering validator");
        self.validators.insert(activity_type, Box::new(validator));
    }

    pub fn get(&self, activity_type: &str) -> Option<&dyn Validator> {
        let found = self.validators.get(activity_type).or_else(|| {
            warn!(%activity_type, "no validator registered, using default");
            self.validators.get(DEFAULT_ACTIVITY_TYPE)
        });
        found.map(|v| &**v)
    }

    pub fn validate(&self, activity_type: &str, session: &ActivitySession) -> Verdict {
        match self.get(activity_type) {
            Some(validator) => validator.validate(session),
            None => Verdict::incorrect(NO_VALIDATOR_MESSAGE),
        }
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(DEFAULT_ACTIVITY_TYPE, SetMatchValidator::default());
        registry
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.validators.keys().collect();
        keys.sort();
        f.debug_struct("ValidatorRegistry")
            .field("activity_types", &keys)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn test_count_gate_message() {
        let expected = pts(&[(1.0, 2.0), (3.0, 4.0)]);
        let v = validate(&pts(&[(1.0, 2.0)]), &expected);
        assert!(!v.is_correct);
        assert_eq!(v.message(), "You must plot exactly 2 points.");

        let v = PositionalValidator::default().check(&[], &expected);
        assert_eq!(v.message(), "You must plot exactly 2 points.");
    }

    #[test]
    fn test_exact_match_is_correct_for_both_validators() {
        let expected = pts(&[(1.0, 2.0), (3.0, 4.0)]);
        let student = expected.clone();
        assert!(validate(&student, &expected).is_correct);
        assert!(PositionalValidator::default().check(&student, &expected).is_correct);
        assert_eq!(validate(&student, &expected).message(), CORRECT_MESSAGE);
    }

    // Reversed clicks: set matching ignores click order, positional does not.
    #[test]
    fn test_reversed_clicks_split_the_validators() {
        let expected = pts(&[(1.0, 2.0), (3.0, 4.0)]);
        let student = pts(&[(3.0, 4.0), (1.0, 2.0)]);

        assert!(validate(&student, &expected).is_correct);

        let positional = PositionalValidator::default().check(&student, &expected);
        assert!(!positional.is_correct);
        assert_eq!(positional.message(), INCORRECT_MESSAGE);
    }

    #[test]
    fn test_wrong_point_fails_set_match() {
        let expected = pts(&[(1.0, 2.0), (3.0, 4.0)]);
        let v = validate(&pts(&[(1.0, 2.0), (3.0, 5.0)]), &expected);
        assert!(!v.is_correct);
        assert_eq!(v.message(), INCORRECT_MESSAGE);
    }

    #[test]
    fn test_set_match_consumes_student_points() {
        let expected = pts(&[(1.0, 1.0), (1.0, 1.0)]);
        let student = pts(&[(1.0, 1.0), (2.0, 2.0)]);
        assert!(!validate(&student, &expected).is_correct);
    }

    #[test]
    fn test_tolerance_widens_match() {
        let expected = pts(&[(1.0, 1.0)]);
        let student = pts(&[(1.25, 0.75)]);
        assert!(!validate(&student, &expected).is_correct);
        assert!(SetMatchValidator { tolerance: 0.25 }
            .check(&student, &expected)
            .is_correct);
    }

    #[test]
    fn test_verdict_wire_shape() {
        let json = serde_json::to_value(Verdict::correct("ok")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "isCorrect": true, "details": { "message": "ok" } })
        );
    }

    #[test]
    fn test_registry_falls_back_to_default() {
        let registry = ValidatorRegistry::default();
        assert!(registry.get(DEFAULT_ACTIVITY_TYPE).is_some());
        assert!(registry.get("graphing").is_some());
    }

    #[test]
    fn test_empty_registry_reports_missing_validator() {
        let registry = ValidatorRegistry::empty();
        assert!(registry.get(DEFAULT_ACTIVITY_TYPE).is_none());
    }
}
