//! # Parameter Validator
//!
//! Schemas are data: a [`Schema`] is an ordered list of field names, each with a
//! [`FieldRule`] made of tagged [`Constraint`]s. [`validate`] is a small
//! interpreter over those constraints. It knows nothing about users or
//! addresses, so every action of every service is checked the same way.
//!
//! Rules can be built in code or parsed from the compact descriptor form:
//!
//! ```rust
//! use action_framework::validator::{FieldRule, Schema};
//!
//! let schema = Schema::new()
//!     .field("name", FieldRule::string().non_empty())
//!     .field("password", FieldRule::parse("string|min:6|optional").unwrap());
//! assert_eq!(schema.len(), 2);
//! ```

use crate::error::{Rule, ValidationError, ValidationErrors};
use crate::params::{Params, ValidatedParams};
use regex::Regex;
use serde_json::{Number, Value};
use std::sync::LazyLock;

/// Shape check only; full RFC 5322 is out of scope.
static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// The value type a field must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Email,
    /// Accepts JSON numbers and numeric strings.
    Number,
    /// Accepts JSON booleans and `"true"`/`"false"`/`"1"`/`"0"`.
    Boolean,
    Any,
}

/// One tagged constraint on a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Required,
    Optional,
    Type(FieldType),
    NonEmpty,
    MinLength(usize),
    MaxLength(usize),
}

/// Errors in a schema definition itself (not in client input).
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum SchemaError {
    #[error("Unknown field type: {0}")]
    UnknownType(String),
    #[error("Unknown rule modifier: {0}")]
    UnknownModifier(String),
    #[error("Invalid argument for '{modifier}': {arg}")]
    InvalidArgument { modifier: String, arg: String },
}

/// The constraints attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    constraints: Vec<Constraint>,
}

impl FieldRule {
    fn of(field_type: FieldType) -> Self {
        Self {
            constraints: vec![Constraint::Required, Constraint::Type(field_type)],
        }
    }

    pub fn string() -> Self {
        Self::of(FieldType::String)
    }

    pub fn email() -> Self {
        Self::of(FieldType::Email)
    }

    pub fn number() -> Self {
        Self::of(FieldType::Number)
    }

    pub fn boolean() -> Self {
        Self::of(FieldType::Boolean)
    }

    pub fn any() -> Self {
        Self::of(FieldType::Any)
    }

    pub fn optional(mut self) -> Self {
        self.constraints.retain(|c| *c != Constraint::Required);
        if !self.is_optional() {
            self.constraints.insert(0, Constraint::Optional);
        }
        self
    }

    pub fn non_empty(self) -> Self {
        self.with(Constraint::NonEmpty)
    }

    pub fn min(self, len: usize) -> Self {
        self.with(Constraint::MinLength(len))
    }

    pub fn max(self, len: usize) -> Self {
        self.with(Constraint::MaxLength(len))
    }

    fn with(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn is_optional(&self) -> bool {
        self.constraints.contains(&Constraint::Optional)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    fn field_type(&self) -> FieldType {
        self.constraints
            .iter()
            .find_map(|c| match c {
                Constraint::Type(t) => Some(*t),
                _ => None,
            })
            .unwrap_or(FieldType::Any)
    }

    /// Parses a `type|modifier:arg|optional` descriptor, e.g. `"string|min:6|optional"`.
    pub fn parse(descriptor: &str) -> Result<Self, SchemaError> {
        let mut tokens = descriptor.split('|').map(str::trim);
        let type_name = tokens.next().unwrap_or_default();
        let mut rule = match type_name {
            "string" => Self::string(),
            "email" => Self::email(),
            "number" => Self::number(),
            "boolean" => Self::boolean(),
            "any" => Self::any(),
            other => return Err(SchemaError::UnknownType(other.to_string())),
        };

        for token in tokens {
            let (modifier, arg) = match token.split_once(':') {
                Some((m, a)) => (m, Some(a)),
                None => (token, None),
            };
            rule = match (modifier, arg) {
                ("optional", None) => rule.optional(),
                ("empty", Some("false")) => rule.non_empty(),
                ("empty", Some("true")) => rule,
                ("min", Some(n)) => rule.min(parse_len(modifier, n)?),
                ("max", Some(n)) => rule.max(parse_len(modifier, n)?),
                ("empty" | "min" | "max", Some(a)) => {
                    return Err(SchemaError::InvalidArgument {
                        modifier: modifier.to_string(),
                        arg: a.to_string(),
                    })
                }
                _ => return Err(SchemaError::UnknownModifier(token.to_string())),
            };
        }
        Ok(rule)
    }
}

fn parse_len(modifier: &str, arg: &str) -> Result<usize, SchemaError> {
    arg.parse().map_err(|_| SchemaError::InvalidArgument {
        modifier: modifier.to_string(),
        arg: arg.to_string(),
    })
}

/// An ordered mapping of field name to [`FieldRule`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<(String, FieldRule)>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a field.
    pub fn field(mut self, name: impl Into<String>, rule: FieldRule) -> Self {
        let name = name.into();
        self.fields.retain(|(n, _)| *n != name);
        self.fields.push((name, rule));
        self
    }

    /// Builds a schema from descriptor strings.
    pub fn parse(fields: &[(&str, &str)]) -> Result<Self, SchemaError> {
        fields
            .iter()
            .try_fold(Self::new(), |schema, (name, descriptor)| {
                Ok(schema.field(*name, FieldRule::parse(descriptor)?))
            })
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.fields.iter().map(|(n, r)| (n.as_str(), r))
    }

    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Checks `raw` against `schema`.
///
/// All violations are collected. Fields not declared in the schema are ignored
/// and do not reach the validated bag. `null` counts as absent.
pub fn validate(schema: &Schema, raw: &Params) -> Result<ValidatedParams, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut accepted = Params::new();

    for (name, rule) in schema.fields() {
        match raw.get(name).filter(|v| !v.is_null()) {
            None if rule.is_optional() => {}
            None => errors.push(ValidationError::new(
                name,
                Rule::Required,
                format!("{name} is required"),
            )),
            Some(value) => match check_field(name, rule, value) {
                Ok(value) => {
                    accepted.insert(name.to_string(), value);
                }
                Err(violations) => violations.into_iter().for_each(|e| errors.push(e)),
            },
        }
    }

    if errors.is_empty() {
        Ok(ValidatedParams::new(accepted))
    } else {
        Err(errors)
    }
}

fn check_field(name: &str, rule: &FieldRule, value: &Value) -> Result<Value, Vec<ValidationError>> {
    let value = coerce(name, rule.field_type(), value).map_err(|e| vec![e])?;

    let mut violations = Vec::new();
    if let Value::String(text) = &value {
        let len = text.chars().count();
        for constraint in rule.constraints() {
            match constraint {
                Constraint::NonEmpty if text.is_empty() => violations.push(ValidationError::new(
                    name,
                    Rule::Empty,
                    format!("{name} must not be empty"),
                )),
                Constraint::MinLength(min) if len < *min => violations.push(ValidationError::new(
                    name,
                    Rule::MinLength,
                    format!("{name} must be at least {min} characters long"),
                )),
                Constraint::MaxLength(max) if len > *max => violations.push(ValidationError::new(
                    name,
                    Rule::MaxLength,
                    format!("{name} must be at most {max} characters long"),
                )),
                _ => {}
            }
        }
    }

    if violations.is_empty() {
        Ok(value)
    } else {
        Err(violations)
    }
}

fn coerce(name: &str, field_type: FieldType, value: &Value) -> Result<Value, ValidationError> {
    match (field_type, value) {
        (FieldType::Any, v) => Ok(v.clone()),
        (FieldType::String, Value::String(_)) => Ok(value.clone()),
        (FieldType::String, _) => Err(mismatch(name, Rule::String, "a string")),
        (FieldType::Email, Value::String(s)) if EMAIL_SHAPE.is_match(s) => Ok(value.clone()),
        (FieldType::Email, _) => Err(ValidationError::new(
            name,
            Rule::Email,
            format!("{name} must be a valid email address"),
        )),
        (FieldType::Number, Value::Number(_)) => Ok(value.clone()),
        (FieldType::Number, Value::String(s)) => parse_number(s.trim())
            .map(Value::Number)
            .ok_or_else(|| mismatch(name, Rule::Number, "a number")),
        (FieldType::Number, _) => Err(mismatch(name, Rule::Number, "a number")),
        (FieldType::Boolean, Value::Bool(_)) => Ok(value.clone()),
        (FieldType::Boolean, Value::String(s)) => match s.as_str() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            _ => Err(mismatch(name, Rule::Boolean, "a boolean")),
        },
        (FieldType::Boolean, _) => Err(mismatch(name, Rule::Boolean, "a boolean")),
    }
}

fn mismatch(name: &str, rule: Rule, expected: &str) -> ValidationError {
    ValidationError::new(name, rule, format!("{name} must be {expected}"))
}

fn parse_number(text: &str) -> Option<Number> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Number::from(n));
    }
    text.parse::<f64>().ok().and_then(Number::from_f64)
}
