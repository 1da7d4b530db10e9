//! Validation engine for filled-in forms.
//!
//! [`validate`] is a pure function of a field list and a value map. The
//! result holds an entry only for fields that failed; an empty map means the
//! form can be submitted.
//!
//! Rules, per field in order:
//! - a required field whose value is empty fails with `"<label> is required"`
//!   and gets no further checks;
//! - a non-empty value of a `text` field is checked against its input type
//!   (`email`, `number`, `url`; other types accept anything).
//!
//! Empty means absent, a blank string, an empty list or `false`.

use crate::{FieldDefinition, FieldId, FieldKind, InputType};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Single `@`, no whitespace, a dot in the domain.
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const INVALID_NUMBER: &str = "Please enter a valid number";
pub const INVALID_URL: &str = "Please enter a valid URL";

/// A submitted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A single checkbox.
    Bool(bool),
    /// Text inputs, textareas, selects and radios.
    Text(String),
    /// A checkbox group, in selection order.
    Many(Vec<String>),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Bool(checked) => !checked,
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Many(values) => values.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(checked: bool) -> Self {
        FieldValue::Bool(checked)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Many(values)
    }
}

/// Submitted values by field id.
pub type FormValues = BTreeMap<FieldId, FieldValue>;

/// Error messages by field id; only failing fields appear.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<FieldId, String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field_id: &str) -> Option<&str> {
        self.errors.get(field_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldId, &String)> {
        self.errors.iter()
    }

    fn insert(&mut self, field_id: &str, message: String) {
        self.errors.insert(field_id.to_string(), message);
    }
}

/// Check `values` against `fields`.
pub fn validate(fields: &[FieldDefinition], values: &FormValues) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for field in fields {
        if let Some(message) = check_field(field, values.get(field.id())) {
            errors.insert(field.id(), message);
        }
    }
    tracing::trace!(fields = fields.len(), failed = errors.len(), "form validated");
    errors
}

/// Check one field; `None` when it passes.
pub fn check_field(field: &FieldDefinition, value: Option<&FieldValue>) -> Option<String> {
    let value = value.filter(|v| !v.is_empty());
    let Some(value) = value else {
        return field
            .is_required()
            .then(|| format!("{} is required", field.label()));
    };

    match field.kind() {
        FieldKind::Text { input_type } => check_format(*input_type, value).map(str::to_string),
        _ => None,
    }
}

fn check_format(input_type: InputType, value: &FieldValue) -> Option<&'static str> {
    let (message, valid): (&'static str, fn(&str) -> bool) = match input_type {
        InputType::Email => (INVALID_EMAIL, is_email),
        InputType::Number => (INVALID_NUMBER, is_number),
        InputType::Url => (INVALID_URL, is_url),
        InputType::Text | InputType::Password | InputType::Tel => return None,
    };
    match value.as_text() {
        Some(text) if valid(text) => None,
        _ => Some(message),
    }
}

fn is_email(s: &str) -> bool {
    EMAIL_RE.is_match(s)
}

/// Decimal and exponent notation after trimming. Hex literals are rejected;
/// the infinity spellings `f64` parses are accepted.
fn is_number(s: &str) -> bool {
    s.trim().parse::<f64>().is_ok_and(|n| !n.is_nan())
}

fn is_url(s: &str) -> bool {
    url::Url::parse(s).is_ok()
}
