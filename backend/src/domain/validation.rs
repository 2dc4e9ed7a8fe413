//! Field-level request validation.
//!
//! A rule is a plain function over a request that returns a
//! [`ValidationFailure`] when the request breaks it. Every rule of a request
//! runs; the failures are collected and surfaced together as one
//! `invalid_request` error before any handler executes.

use serde::Serialize;
use serde_json::json;

use super::Error;

/// One broken rule, naming the rule and the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    /// Machine-readable rule name, e.g. `not_blank`.
    pub rule: &'static str,
    /// Request field in camelCase, e.g. `body`.
    pub field: &'static str,
}

impl ValidationFailure {
    /// Construct a failure.
    #[must_use]
    pub const fn new(rule: &'static str, field: &'static str) -> Self {
        Self { rule, field }
    }
}

/// Pure predicate over a request.
pub type Rule<R> = fn(&R) -> Option<ValidationFailure>;

/// Run every rule against `request`, collecting failures in rule order.
pub fn check<R>(request: &R, rules: &[Rule<R>]) -> Vec<ValidationFailure> {
    rules.iter().filter_map(|rule| rule(request)).collect()
}

/// Run `rules` and convert any failures into an `invalid_request` error.
///
/// # Examples
/// ```
/// use notes_backend::domain::validation::{self, not_blank, Rule};
///
/// struct Rename { name: String }
///
/// let rules: [Rule<Rename>; 1] = [|r| not_blank("name", &r.name)];
/// let err = validation::validate(&Rename { name: " ".into() }, &rules)
///     .expect_err("blank name is rejected");
/// assert_eq!(err.message(), "request validation failed");
/// ```
pub fn validate<R>(request: &R, rules: &[Rule<R>]) -> Result<(), Error> {
    let failures = check(request, rules);
    if failures.is_empty() {
        return Ok(());
    }
    Err(failures_to_error(&failures))
}

fn failures_to_error(failures: &[ValidationFailure]) -> Error {
    Error::invalid_request("request validation failed").with_details(json!({
        "failures": failures,
    }))
}

/// Fails with `not_blank` when `value` is empty once trimmed.
#[must_use]
pub fn not_blank(field: &'static str, value: &str) -> Option<ValidationFailure> {
    value
        .trim()
        .is_empty()
        .then(|| ValidationFailure::new("not_blank", field))
}

/// Fails with `max_length` when `value` has more than `max` characters.
#[must_use]
pub fn max_length(field: &'static str, value: &str, max: usize) -> Option<ValidationFailure> {
    (value.trim().chars().count() > max).then(|| ValidationFailure::new("max_length", field))
}

/// Fails with `not_nil` when `is_nil` is set; used for identifiers.
#[must_use]
pub fn not_nil(field: &'static str, is_nil: bool) -> Option<ValidationFailure> {
    is_nil.then(|| ValidationFailure::new("not_nil", field))
}

/// Fails with `matches` when `value` differs from `expected`.
#[must_use]
pub fn matches(field: &'static str, value: &str, expected: &str) -> Option<ValidationFailure> {
    (value != expected).then(|| ValidationFailure::new("matches", field))
}

/// Fails with `valid_slug` when `value` is not a well-formed slug.
#[must_use]
pub fn valid_slug(field: &'static str, value: &str) -> Option<ValidationFailure> {
    (!super::slug::is_valid_slug(value)).then(|| ValidationFailure::new("valid_slug", field))
}

/// Fails with `has_slug` when `title` would derive an empty slug.
#[must_use]
pub fn has_slug(field: &'static str, title: &str) -> Option<ValidationFailure> {
    (!super::slug::title_has_slug(title)).then(|| ValidationFailure::new("has_slug", field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    struct Sample {
        title: String,
        body: String,
    }

    const RULES: [Rule<Sample>; 3] = [
        |r| not_blank("title", &r.title),
        |r| max_length("title", &r.title, 5),
        |r| not_blank("body", &r.body),
    ];

    #[rstest]
    fn valid_requests_pass() {
        let request = Sample {
            title: "ok".into(),
            body: "text".into(),
        };
        assert!(validate(&request, &RULES).is_ok());
    }

    #[rstest]
    fn every_failure_is_reported() {
        let request = Sample {
            title: "too long title".into(),
            body: "   ".into(),
        };
        let failures = check(&request, &RULES);
        assert_eq!(
            failures,
            vec![
                ValidationFailure::new("max_length", "title"),
                ValidationFailure::new("not_blank", "body"),
            ]
        );
    }

    #[rstest]
    fn error_lists_failures_in_details() {
        let request = Sample {
            title: String::new(),
            body: "x".into(),
        };
        let error = validate(&request, &RULES).expect_err("blank title fails");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({ "failures": [{ "rule": "not_blank", "field": "title" }] }))
        );
    }

    #[rstest]
    #[case("a", "a", None)]
    #[case("a", "b", Some(ValidationFailure::new("matches", "confirm")))]
    fn matches_compares_values(
        #[case] value: &str,
        #[case] expected: &str,
        #[case] outcome: Option<ValidationFailure>,
    ) {
        assert_eq!(matches("confirm", value, expected), outcome);
    }

    #[rstest]
    #[case("hello-world", None)]
    #[case("Hello", Some(ValidationFailure::new("valid_slug", "slug")))]
    fn valid_slug_checks_shape(#[case] value: &str, #[case] outcome: Option<ValidationFailure>) {
        assert_eq!(valid_slug("slug", value), outcome);
    }
}
