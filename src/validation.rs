//! Declarative field validation for request payloads and stored records.
//!
//! A payload lists its fields and the rules each one must satisfy. The
//! validator walks fields in declaration order and stops at the first
//! violated rule, so error messages are stable across runs.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::tz;

/// A single constraint on a string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLen(usize),
    MaxLen(usize),
    Alphanumeric,
    /// Value must contain at least one of the given characters.
    ContainsAny(&'static str),
    /// Value must differ from the named sibling field.
    NotEqualField(&'static str),
    /// Value must equal the named sibling field.
    EqualField(&'static str),
    /// Value must name a known IANA timezone.
    Timezone,
}

/// The ordered rules for one field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRules {
    pub field: &'static str,
    pub rules: &'static [Rule],
}

/// First rule violation found on a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Implemented by anything that can be checked by a [`Validator`].
pub trait Validate {
    fn rules(&self) -> &'static [FieldRules];

    /// Current value of a field by name. Unknown names yield `None`.
    fn field(&self, name: &str) -> Option<&str>;
}

pub trait Validator: Send + Sync {
    fn validate(&self, payload: &dyn Validate) -> Result<(), ValidationError>;
}

/// Validator that applies the payload's own rule table.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleValidator;

impl Validator for RuleValidator {
    fn validate(&self, payload: &dyn Validate) -> Result<(), ValidationError> {
        for entry in payload.rules() {
            let value = payload.field(entry.field).unwrap_or_default();
            for rule in entry.rules {
                check(payload, entry.field, value, *rule)?;
            }
        }
        Ok(())
    }
}

fn is_alphanumeric(value: &str) -> bool {
    lazy_static! {
        static ref ALNUM_RE: Regex = Regex::new(r"^[A-Za-z0-9]+$").unwrap();
    }
    ALNUM_RE.is_match(value)
}

fn check(
    payload: &dyn Validate,
    field: &'static str,
    value: &str,
    rule: Rule,
) -> Result<(), ValidationError> {
    let ok = match rule {
        Rule::Required => !value.is_empty(),
        Rule::MinLen(n) => value.chars().count() >= n,
        Rule::MaxLen(n) => value.chars().count() <= n,
        Rule::Alphanumeric => is_alphanumeric(value),
        Rule::ContainsAny(set) => value.chars().any(|c| set.contains(c)),
        Rule::NotEqualField(other) => value != payload.field(other).unwrap_or_default(),
        Rule::EqualField(other) => value == payload.field(other).unwrap_or_default(),
        Rule::Timezone => tz::parse(value).is_ok(),
    };
    if ok {
        return Ok(());
    }

    let message = match rule {
        Rule::Required => format!("{field} is a required field"),
        Rule::MinLen(n) => format!("{field} must be minimum of {n} in length"),
        Rule::MaxLen(n) => format!("{field} must be maximum of {n} in length"),
        Rule::Alphanumeric => format!("{field} must contain only alphanumeric characters"),
        Rule::ContainsAny(set) => {
            format!("{field} must contain at least one of {set} characters")
        }
        Rule::NotEqualField(other) => format!("{field} must differ from {other}"),
        Rule::EqualField(other) => format!("{field} must be equal to {other}"),
        Rule::Timezone => format!("{field} must be a valid IANA timezone"),
    };
    Err(ValidationError::new(field, message))
}
