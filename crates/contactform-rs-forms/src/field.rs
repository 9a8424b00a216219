//! Form field declarations and their mutable submission state.
//!
//! A [`FieldSpec`] is what callers write when declaring a form; a [`Field`]
//! is what the form owns once that declaration has been resolved. Resolution
//! normalizes the name and id, derives default labels and placeholders,
//! and enforces that every non-button field ends up with a name.

use std::fmt;

use serde::{Deserialize, Serialize};

use contactform_rs_core::{FormsError, FormsResult};

/// The kind of a form control.
///
/// The kind decides how a field renders and which rules validate it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// `<input type="text">`.
    Text,
    /// `<input type="email">`, validated as an email address.
    Email,
    /// `<input type="password">`.
    Password,
    /// `<input type="hidden">`, exempt from validation.
    Hidden,
    /// `<button type="button">`.
    Button,
    /// `<button type="submit">`, removed once a form is terminal.
    Submit,
    /// `<button type="reset">`.
    Reset,
    /// `<textarea>`.
    Textarea,
}

impl FieldKind {
    /// Returns the HTML type name of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Hidden => "hidden",
            Self::Button => "button",
            Self::Submit => "submit",
            Self::Reset => "reset",
            Self::Textarea => "textarea",
        }
    }

    /// Returns `true` for the button kinds, which may be unnamed.
    pub const fn is_button(self) -> bool {
        matches!(self, Self::Button | Self::Submit | Self::Reset)
    }

    /// Returns `true` for the single-line text-like inputs.
    pub const fn is_input(self) -> bool {
        matches!(self, Self::Text | Self::Email | Self::Password)
    }

    /// Returns `true` if this kind renders a `<label>` element.
    pub const fn has_label(self) -> bool {
        !matches!(
            self,
            Self::Button | Self::Submit | Self::Reset | Self::Hidden
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default number of rows for a textarea.
pub const DEFAULT_ROWS: u32 = 4;

/// The declared shape of a field, before resolution.
///
/// `label` and `placeholder` distinguish absence from the empty string:
/// `None` suppresses the element entirely, `Some("")` asks for a default
/// derived from the field's name or kind. Both default to `Some("")`.
///
/// # Examples
///
/// ```
/// use contactform_rs_forms::field::{FieldKind, FieldSpec};
///
/// let spec = FieldSpec::new(FieldKind::Text)
///     .name("Phone Number")
///     .required(true)
///     .max_length(20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// The field kind.
    pub kind: FieldKind,
    /// Explicit name.
    pub name: Option<String>,
    /// Label text; see the type docs for `None` vs `Some("")`.
    pub label: Option<String>,
    /// Explicit HTML id.
    pub id: Option<String>,
    /// Initial value.
    pub value: Option<String>,
    /// Placeholder text; see the type docs for `None` vs `Some("")`.
    pub placeholder: Option<String>,
    /// The `autocomplete` attribute.
    pub autocomplete: Option<String>,
    /// Whether an empty value is an error.
    pub required: bool,
    /// Whether the field starts disabled.
    pub disabled: bool,
    /// Textarea rows.
    pub rows: u32,
    /// Minimum length in characters.
    pub min_length: Option<usize>,
    /// Maximum length in characters.
    pub max_length: Option<usize>,
}

impl FieldSpec {
    /// Creates a spec of the given kind with default presentation.
    pub const fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            name: None,
            label: Some(String::new()),
            id: None,
            value: None,
            placeholder: Some(String::new()),
            autocomplete: None,
            required: false,
            disabled: false,
            rows: DEFAULT_ROWS,
            min_length: None,
            max_length: None,
        }
    }

    /// A text input for a person's name: label "Name", autocomplete "name".
    pub fn person_name() -> Self {
        Self::new(FieldKind::Text)
            .label("Name")
            .autocomplete("name")
    }

    /// An email input: label "Email", autocomplete "email".
    pub fn email_address() -> Self {
        Self::new(FieldKind::Email)
            .label("Email")
            .autocomplete("email")
    }

    /// A message textarea labelled "Message".
    pub fn message() -> Self {
        Self::new(FieldKind::Textarea).label("Message")
    }

    /// Sets the name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Suppresses the label entirely.
    #[must_use]
    pub fn without_label(mut self) -> Self {
        self.label = None;
        self
    }

    /// Sets the HTML id.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets the initial value.
    #[must_use]
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Sets the placeholder.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Suppresses the placeholder entirely.
    #[must_use]
    pub fn without_placeholder(mut self) -> Self {
        self.placeholder = None;
        self
    }

    /// Sets the `autocomplete` attribute.
    #[must_use]
    pub fn autocomplete(mut self, autocomplete: impl Into<String>) -> Self {
        self.autocomplete = Some(autocomplete.into());
        self
    }

    /// Sets whether the field is required.
    #[must_use]
    pub const fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets whether the field starts disabled.
    #[must_use]
    pub const fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Sets the textarea rows.
    #[must_use]
    pub const fn rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }

    /// Sets the minimum length.
    #[must_use]
    pub const fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// Sets the maximum length.
    #[must_use]
    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }
}

/// A resolved field owned by a [`Form`](crate::form::Form).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    kind: FieldKind,
    name: Option<String>,
    id: Option<String>,
    label: Option<String>,
    placeholder: Option<String>,
    autocomplete: Option<String>,
    required: bool,
    rows: u32,
    min_length: Option<usize>,
    max_length: Option<usize>,
    value: Option<String>,
    disabled: bool,
    error: Option<String>,
}

impl Field {
    /// Resolves a spec into a field.
    ///
    /// The name is the first non-empty of the explicit name, the label, and
    /// the id; buttons only ever use an explicit name. Names and ids are
    /// lower-cased with spaces turned into underscores.
    ///
    /// # Errors
    ///
    /// Returns [`FormsError::MissingName`] when a non-button field resolves
    /// no name.
    pub fn new(spec: FieldSpec) -> FormsResult<Self> {
        let FieldSpec {
            kind,
            name,
            label,
            id,
            value,
            placeholder,
            autocomplete,
            required,
            disabled,
            rows,
            min_length,
            max_length,
        } = spec;

        let candidate = if kind.is_button() {
            non_empty(name.as_deref())
        } else {
            non_empty(name.as_deref())
                .or_else(|| non_empty(label.as_deref()))
                .or_else(|| non_empty(id.as_deref()))
        };
        let name = candidate.map(normalize);
        if name.is_none() && !kind.is_button() {
            return Err(FormsError::MissingName(kind.to_string()));
        }

        let id = non_empty(id.as_deref()).map(normalize).or_else(|| name.clone());

        let placeholder = match placeholder {
            Some(text) if !text.is_empty() => Some(text),
            Some(_) if label.is_none() && kind.is_input() => name.clone(),
            _ => None,
        };

        let label = match label {
            None => None,
            Some(text) if text.is_empty() => Some(if kind.is_button() {
                value.clone().unwrap_or_else(|| kind.to_string())
            } else {
                name.clone().unwrap_or_else(|| "label".to_string())
            }),
            Some(text) => Some(text),
        };

        Ok(Self {
            kind,
            name,
            id,
            label,
            placeholder,
            autocomplete,
            required,
            rows,
            min_length,
            max_length,
            value,
            disabled,
            error: None,
        })
    }

    /// A hidden field with a fixed name, bypassing name resolution.
    pub fn hidden(name: impl Into<String>, value: Option<String>) -> Self {
        let name = name.into();
        Self {
            kind: FieldKind::Hidden,
            id: Some(name.clone()),
            name: Some(name),
            label: None,
            placeholder: None,
            autocomplete: None,
            required: false,
            rows: DEFAULT_ROWS,
            min_length: None,
            max_length: None,
            value,
            disabled: false,
            error: None,
        }
    }

    /// Returns the field kind.
    pub const fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Returns the normalized name; `None` only for unnamed buttons.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the HTML id.
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Returns the resolved label, if one is shown.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the resolved placeholder.
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Returns the `autocomplete` attribute.
    pub fn autocomplete(&self) -> Option<&str> {
        self.autocomplete.as_deref()
    }

    /// Returns whether the field is required.
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Returns the textarea rows.
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the minimum length.
    pub const fn min_length(&self) -> Option<usize> {
        self.min_length
    }

    /// Returns the maximum length.
    pub const fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    /// Returns the current value.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Replaces the current value.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = Some(value.into());
    }

    /// Returns whether the field is disabled.
    pub const fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Disables the field. There is no way back.
    pub fn disable(&mut self) {
        self.disabled = true;
    }

    /// Returns the current validation error.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns `true` if the field carries an error.
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub(crate) fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// The label used in error messages: label, else name, else id, capitalized.
    pub fn display_label(&self) -> String {
        let text = self
            .label
            .as_deref()
            .or(self.name.as_deref())
            .or(self.id.as_deref())
            .unwrap_or_default();
        capitalize(text)
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn normalize(s: &str) -> String {
    s.to_lowercase().replace(' ', "_")
}

/// Upper-cases the first character.
pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
