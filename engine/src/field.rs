//! Field definitions - the schema of a single form control.
//!
//! The type-specific attributes of a field live in [`FieldKind`], so a
//! `select` always carries options and a `text` field never does. On the wire
//! a field is one flat camelCase object:
//!
//! ```json
//! {"id": "f1", "type": "text", "label": "Email", "required": true,
//!  "placeholder": "", "inputType": "email"}
//! ```

use crate::{drag::CANVAS_DROP_ID, error::Result, new_id, Error, FieldId, OptionId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Smallest number of visible rows a textarea may have.
pub const MIN_TEXTAREA_ROWS: u8 = 2;
/// Largest number of visible rows a textarea may have.
pub const MAX_TEXTAREA_ROWS: u8 = 10;
/// Rows given to a freshly created textarea.
pub const DEFAULT_TEXTAREA_ROWS: u8 = 3;

/// The closed set of field types offered by the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Select,
    Radio,
    Checkbox,
}

impl FieldType {
    /// Every field type, in palette order.
    pub const ALL: [FieldType; 5] = [
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Select,
        FieldType::Checkbox,
        FieldType::Radio,
    ];

    /// The lowercase wire name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::UnknownFieldType(s.to_string()))
    }
}

/// HTML input flavour of a `text` field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    #[default]
    Text,
    Email,
    Number,
    Password,
    Tel,
    Url,
}

/// Whether a checkbox field is a lone checkbox or a group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckboxMode {
    #[default]
    Single,
    Multiple,
}

/// One choice of a `select`, `radio` or multiple-checkbox field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub id: OptionId,
    pub label: String,
    pub value: String,
}

impl FieldOption {
    /// Create an option with an explicit id.
    pub fn new(
        id: impl Into<OptionId>,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            value: value.into(),
        }
    }

    /// The `n`-th default option: "Option n" / "optionn", fresh id.
    pub fn numbered(n: usize) -> Self {
        Self::new(new_id(), format!("Option {n}"), format!("option{n}"))
    }
}

/// Partial update of a single option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Payload of a checkbox field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "checkboxType", rename_all = "lowercase")]
pub enum CheckboxKind {
    Single,
    Multiple { options: Vec<FieldOption> },
}

impl CheckboxKind {
    pub fn mode(&self) -> CheckboxMode {
        match self {
            CheckboxKind::Single => CheckboxMode::Single,
            CheckboxKind::Multiple { .. } => CheckboxMode::Multiple,
        }
    }
}

/// Type-specific attributes, tagged by the field `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldKind {
    Text {
        #[serde(rename = "inputType", default)]
        input_type: InputType,
    },
    Textarea {
        #[serde(default = "default_rows")]
        rows: u8,
    },
    Select {
        options: Vec<FieldOption>,
    },
    Radio {
        options: Vec<FieldOption>,
    },
    Checkbox {
        #[serde(flatten)]
        mode: CheckboxKind,
    },
}

impl FieldKind {
    /// Default payload for a field type.
    pub fn default_for(field_type: FieldType) -> Self {
        match field_type {
            FieldType::Text => FieldKind::Text {
                input_type: InputType::Text,
            },
            FieldType::Textarea => FieldKind::Textarea {
                rows: DEFAULT_TEXTAREA_ROWS,
            },
            FieldType::Select => FieldKind::Select {
                options: default_options(),
            },
            FieldType::Radio => FieldKind::Radio {
                options: default_options(),
            },
            FieldType::Checkbox => FieldKind::Checkbox {
                mode: CheckboxKind::Single,
            },
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            FieldKind::Text { .. } => FieldType::Text,
            FieldKind::Textarea { .. } => FieldType::Textarea,
            FieldKind::Select { .. } => FieldType::Select,
            FieldKind::Radio { .. } => FieldType::Radio,
            FieldKind::Checkbox { .. } => FieldType::Checkbox,
        }
    }

    fn options(&self) -> Option<&[FieldOption]> {
        match self {
            FieldKind::Select { options }
            | FieldKind::Radio { options }
            | FieldKind::Checkbox {
                mode: CheckboxKind::Multiple { options },
            } => Some(options),
            _ => None,
        }
    }

    fn options_mut(&mut self) -> Option<&mut Vec<FieldOption>> {
        match self {
            FieldKind::Select { options }
            | FieldKind::Radio { options }
            | FieldKind::Checkbox {
                mode: CheckboxKind::Multiple { options },
            } => Some(options),
            _ => None,
        }
    }

    /// Enforce the per-type rules on a payload read from outside: rows are
    /// clamped, option lists must be non-empty and free of repeated ids.
    fn checked(self) -> std::result::Result<Self, &'static str> {
        Ok(match self {
            FieldKind::Text { input_type } => FieldKind::Text { input_type },
            FieldKind::Textarea { rows } => FieldKind::Textarea {
                rows: clamp_rows(i64::from(rows)),
            },
            FieldKind::Select { options } => FieldKind::Select {
                options: checked_options(options)?,
            },
            FieldKind::Radio { options } => FieldKind::Radio {
                options: checked_options(options)?,
            },
            FieldKind::Checkbox {
                mode: CheckboxKind::Multiple { options },
            } => FieldKind::Checkbox {
                mode: CheckboxKind::Multiple {
                    options: checked_options(options)?,
                },
            },
            FieldKind::Checkbox {
                mode: CheckboxKind::Single,
            } => FieldKind::Checkbox {
                mode: CheckboxKind::Single,
            },
        })
    }

    /// Merge the type-specific part of a patch. Keys foreign to this type
    /// are dropped.
    fn patched(self, patch: &FieldPatch) -> Self {
        match self {
            FieldKind::Text { input_type } => FieldKind::Text {
                input_type: patch.input_type.unwrap_or(input_type),
            },
            FieldKind::Textarea { rows } => FieldKind::Textarea {
                rows: patch.rows.map(clamp_rows).unwrap_or(rows),
            },
            FieldKind::Select { options } => FieldKind::Select {
                options: patched_options(options, patch),
            },
            FieldKind::Radio { options } => FieldKind::Radio {
                options: patched_options(options, patch),
            },
            FieldKind::Checkbox { mode } => {
                let wanted = patch.checkbox_type.unwrap_or(mode.mode());
                let mode = match (mode, wanted) {
                    (_, CheckboxMode::Single) => CheckboxKind::Single,
                    (CheckboxKind::Multiple { options }, CheckboxMode::Multiple) => {
                        CheckboxKind::Multiple {
                            options: patched_options(options, patch),
                        }
                    }
                    (CheckboxKind::Single, CheckboxMode::Multiple) => CheckboxKind::Multiple {
                        options: patched_options(default_options(), patch),
                    },
                };
                FieldKind::Checkbox { mode }
            }
        }
    }
}

fn default_options() -> Vec<FieldOption> {
    vec![FieldOption::numbered(1)]
}

fn default_rows() -> u8 {
    DEFAULT_TEXTAREA_ROWS
}

fn clamp_rows(rows: i64) -> u8 {
    rows.clamp(MIN_TEXTAREA_ROWS as i64, MAX_TEXTAREA_ROWS as i64) as u8
}

/// Replace the option list when the patch carries a non-empty one.
fn patched_options(current: Vec<FieldOption>, patch: &FieldPatch) -> Vec<FieldOption> {
    match &patch.options {
        Some(options) if !options.is_empty() => unique_options(options.clone()),
        _ => current,
    }
}

/// Repeated option ids keep their first occurrence.
fn unique_options(options: Vec<FieldOption>) -> Vec<FieldOption> {
    let mut seen = HashSet::new();
    options
        .into_iter()
        .filter(|o| seen.insert(o.id.clone()))
        .collect()
}

/// Options read from outside must be non-empty; duplicates are dropped.
fn checked_options(
    options: Vec<FieldOption>,
) -> std::result::Result<Vec<FieldOption>, &'static str> {
    if options.is_empty() {
        return Err("option list must not be empty");
    }
    Ok(unique_options(options))
}

/// How a field type uses its `placeholder` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderRole {
    /// Hint shown inside an empty input.
    Hint,
    /// Text of the empty first choice of a select.
    DefaultOption,
    /// Caption next to a single checkbox.
    Caption,
    Unused,
}

/// Partial update of a field, keyed by attribute name.
///
/// `id` and `type` are not part of the patch: a wire patch that carries them
/// still deserializes and those keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_type: Option<InputType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<FieldOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkbox_type: Option<CheckboxMode>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn input_type(mut self, input_type: InputType) -> Self {
        self.input_type = Some(input_type);
        self
    }

    pub fn rows(mut self, rows: i64) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn checkbox_type(mut self, mode: CheckboxMode) -> Self {
        self.checkbox_type = Some(mode);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// One configurable form control.
///
/// Fields read from JSON go through the same per-type rules as fields built
/// in memory; a field that breaks them fails to deserialize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "FieldRecord")]
pub struct FieldDefinition {
    id: FieldId,
    label: String,
    required: bool,
    placeholder: String,
    #[serde(flatten)]
    kind: FieldKind,
}

/// Wire shape of a field before its invariants are checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FieldRecord {
    id: FieldId,
    #[serde(default)]
    label: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    placeholder: String,
    #[serde(flatten)]
    kind: FieldKind,
}

impl TryFrom<FieldRecord> for FieldDefinition {
    type Error = Error;

    fn try_from(record: FieldRecord) -> Result<Self> {
        if record.id == CANVAS_DROP_ID {
            return Err(Error::InvalidField(format!(
                "field id {:?} is reserved for the canvas",
                record.id
            )));
        }
        let kind = record
            .kind
            .checked()
            .map_err(|reason| Error::InvalidField(format!("{}: {}", record.id, reason)))?;
        Ok(Self {
            id: record.id,
            label: record.label,
            required: record.required,
            placeholder: record.placeholder,
            kind,
        })
    }
}

impl FieldDefinition {
    /// Create a field with the defaults of its type and a fresh id.
    pub fn new(field_type: FieldType) -> Self {
        Self::with_id(new_id(), field_type)
    }

    /// Create a field with the defaults of its type and the given id.
    ///
    /// The id `"canvas"` names the drop container; a field using it cannot be
    /// a reorder target and is refused when a state is loaded from JSON.
    pub fn with_id(id: impl Into<FieldId>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: format!("{field_type} field"),
            required: false,
            placeholder: String::new(),
            kind: FieldKind::default_for(field_type),
        }
    }

    /// Create a default field from a type name, rejecting unknown names.
    pub fn from_type_name(name: &str) -> Result<Self> {
        Ok(Self::new(name.parse()?))
    }

    pub fn id(&self) -> &FieldId {
        &self.id
    }

    pub fn field_type(&self) -> FieldType {
        self.kind.field_type()
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Input flavour, for `text` fields only.
    pub fn input_type(&self) -> Option<InputType> {
        match self.kind {
            FieldKind::Text { input_type } => Some(input_type),
            _ => None,
        }
    }

    /// Visible rows, for `textarea` fields only.
    pub fn rows(&self) -> Option<u8> {
        match self.kind {
            FieldKind::Textarea { rows } => Some(rows),
            _ => None,
        }
    }

    /// Checkbox flavour, for `checkbox` fields only.
    pub fn checkbox_mode(&self) -> Option<CheckboxMode> {
        match &self.kind {
            FieldKind::Checkbox { mode } => Some(mode.mode()),
            _ => None,
        }
    }

    /// The choices of the field, if its type has any.
    pub fn options(&self) -> Option<&[FieldOption]> {
        self.kind.options()
    }

    /// Whether the filler answers with a list of values.
    pub fn is_multi_valued(&self) -> bool {
        self.checkbox_mode() == Some(CheckboxMode::Multiple)
    }

    pub fn placeholder_role(&self) -> PlaceholderRole {
        match &self.kind {
            FieldKind::Text { .. } | FieldKind::Textarea { .. } => PlaceholderRole::Hint,
            FieldKind::Select { .. } => PlaceholderRole::DefaultOption,
            FieldKind::Checkbox {
                mode: CheckboxKind::Single,
            } => PlaceholderRole::Caption,
            FieldKind::Radio { .. } | FieldKind::Checkbox { .. } => PlaceholderRole::Unused,
        }
    }

    /// Merge `patch` onto a copy of this field. `id` and `type` never change.
    pub fn apply_update(&self, patch: &FieldPatch) -> FieldDefinition {
        let mut next = self.clone();
        if let Some(label) = &patch.label {
            next.label = label.clone();
        }
        if let Some(required) = patch.required {
            next.required = required;
        }
        if let Some(placeholder) = &patch.placeholder {
            next.placeholder = placeholder.clone();
        }
        next.kind = next.kind.patched(patch);
        next
    }

    /// Append the next numbered default option.
    pub fn add_option(&self) -> FieldDefinition {
        let mut next = self.clone();
        if let Some(options) = next.kind.options_mut() {
            let n = options.len() + 1;
            options.push(FieldOption::numbered(n));
        }
        next
    }

    /// Change the label and/or value of one option.
    pub fn update_option(&self, option_id: &str, patch: &OptionPatch) -> Result<FieldDefinition> {
        let mut next = self.clone();
        let Some(options) = next.kind.options_mut() else {
            return Ok(next);
        };
        let option = options
            .iter_mut()
            .find(|o| o.id == option_id)
            .ok_or_else(|| Error::OptionNotFound(option_id.to_string()))?;
        if let Some(label) = &patch.label {
            option.label = label.clone();
        }
        if let Some(value) = &patch.value {
            option.value = value.clone();
        }
        Ok(next)
    }

    /// Remove one option. The last remaining option is kept.
    pub fn remove_option(&self, option_id: &str) -> Result<FieldDefinition> {
        let mut next = self.clone();
        let Some(options) = next.kind.options_mut() else {
            return Ok(next);
        };
        let index = options
            .iter()
            .position(|o| o.id == option_id)
            .ok_or_else(|| Error::OptionNotFound(option_id.to_string()))?;
        if options.len() > 1 {
            options.remove(index);
        }
        Ok(next)
    }

    /// Append a copy of one option under a fresh id.
    pub fn duplicate_option(&self, option_id: &str) -> Result<FieldDefinition> {
        let mut next = self.clone();
        let Some(options) = next.kind.options_mut() else {
            return Ok(next);
        };
        let source = options
            .iter()
            .find(|o| o.id == option_id)
            .ok_or_else(|| Error::OptionNotFound(option_id.to_string()))?;
        let copy = FieldOption::new(
            new_id(),
            format!("{} (Copy)", source.label),
            format!("{}_copy", source.value),
        );
        options.push(copy);
        Ok(next)
    }
}
