//! Declarative per-field request validation.
//!
//! A [`Validator`] is a list of [`Field`]s, each carrying one or more [`Rule`]s.
//! Validation runs against the decoded JSON body before any database access
//! and reports every violation it finds, in declaration order.
//!
//! ```rust
//! use orderdesk::validate::{Field, Rule, Validator};
//! use serde_json::json;
//!
//! let rules = Validator::new()
//!     .field(Field::required("ord_no").rule(Rule::Numeric))
//!     .field(Field::optional("purch_amt").rule(Rule::Float));
//!
//! let body = json!({ "ord_no": "x1" });
//! let violations = rules.validate(body.as_object().unwrap()).unwrap_err();
//! assert_eq!(violations[0].field, "ord_no");
//! ```

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use serde_json::{Map, Value};

/// A single format check applied to one field value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Rule {
    /// A JSON integer, or a string of an optional sign followed by digits.
    Numeric,
    /// A finite JSON number, or a string that parses as one.
    Float,
    /// An ISO-8601 calendar date or date-time string.
    IsoDate,
    /// A JSON string with at least one character.
    NonEmpty,
}

impl Rule {
    pub fn check(self, value: &Value) -> bool {
        match self {
            Self::Numeric => integer(value).is_some(),
            Self::Float => float(value).is_some(),
            Self::IsoDate => value.as_str().is_some_and(is_iso_date),
            Self::NonEmpty => value.as_str().is_some_and(|s| !s.is_empty()),
        }
    }

    fn describe(self) -> &'static str {
        match self {
            Self::Numeric => "must be numeric",
            Self::Float => "must be a number",
            Self::IsoDate => "must be an ISO-8601 date",
            Self::NonEmpty => "must be a non-empty string",
        }
    }
}

/// A named field and the rules it must satisfy.
#[derive(Clone, Debug)]
pub struct Field {
    name: &'static str,
    rules: Vec<Rule>,
    optional: bool,
}

impl Field {
    /// The field must be present; an absent field is one violation.
    pub fn required(name: &'static str) -> Self {
        Self { name, rules: Vec::new(), optional: false }
    }

    /// Rules apply only when the field is present.
    pub fn optional(name: &'static str) -> Self {
        Self { name, rules: Vec::new(), optional: true }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// One failed check, reported back to the client.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// An ordered set of field rules.
#[derive(Clone, Debug, Default)]
pub struct Validator {
    fields: Vec<Field>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Checks `input` against every field. On failure the list is never empty.
    pub fn validate<'a>(&self, input: &'a Map<String, Value>) -> Result<Valid<'a>, Vec<Violation>> {
        let mut violations = Vec::new();

        for field in &self.fields {
            match input.get(field.name) {
                None if field.optional => {}
                None => violations.push(Violation::new(field.name, format!("{} is required", field.name))),
                Some(value) => {
                    violations.extend(
                        field.rules.iter()
                            .filter(|rule| !rule.check(value))
                            .map(|rule| Violation::new(field.name, format!("{} {}", field.name, rule.describe()))),
                    );
                }
            }
        }

        if violations.is_empty() {
            Ok(Valid { input })
        } else {
            Err(violations)
        }
    }
}

/// Input that passed validation, with typed accessors.
///
/// Accessors return `None` for an absent field or one whose value does not fit
/// the requested type, which cannot happen for a field whose rule passed.
#[derive(Clone, Copy, Debug)]
pub struct Valid<'a> {
    input: &'a Map<String, Value>,
}

impl<'a> Valid<'a> {
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.input.get(name).and_then(integer)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.input.get(name).and_then(float)
    }

    pub fn text(&self, name: &str) -> Option<&'a str> {
        self.input.get(name).and_then(Value::as_str)
    }
}

/// Reads an integer from a JSON number or a numeric string.
pub fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => parse_integer(s),
        _ => None,
    }
}

/// Reads a finite float from a JSON number or a numeric string.
pub fn float(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Parses a path segment or string field as an integer identifier.
pub fn parse_integer(s: &str) -> Option<i64> {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn is_iso_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}
