//! HTML rendering for fields and forms.
//!
//! Each field kind has its own render function; there is no generic
//! attribute bag. All text and attribute values are escaped. Output is
//! deterministic: attributes always appear in the same order.
//!
//! The markup carries the hooks a client-side helper needs:
//! `data-form` on the form, `data-input-error="<name>"` on every error
//! slot (including the form-level `"form"` slot), and `data-form-success`
//! on the success notice.

use std::fmt::Write;

use crate::field::{capitalize, Field, FieldKind};
use crate::form::Form;
use crate::validation::FORM_KEY;

/// Escapes `& < > " '` for use in HTML text and attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// An ordered, escaped attribute list.
#[derive(Debug, Default)]
struct Attrs(String);

impl Attrs {
    fn set(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            let _ = write!(self.0, r#" {key}="{}""#, escape_html(value));
        }
        self
    }

    fn flag(mut self, key: &str, on: bool) -> Self {
        if on {
            self.0.push(' ');
            self.0.push_str(key);
        }
        self
    }

    fn number(self, key: &str, value: Option<usize>) -> Self {
        let value = value.map(|n| n.to_string());
        self.set(key, value.as_deref())
    }
}

/// Renders `<input type=.. />` for text, email, password, and hidden fields.
pub fn render_input(field: &Field) -> String {
    let attrs = Attrs::default()
        .set("type", Some(field.kind().as_str()))
        .set("name", field.name())
        .set("id", field.id())
        .set("value", field.value())
        .set("placeholder", field.placeholder())
        .set("autocomplete", field.autocomplete())
        .number("minlength", field.min_length())
        .number("maxlength", field.max_length())
        .flag("required", field.is_required())
        .flag("disabled", field.is_disabled());
    format!("<input{} />", attrs.0)
}

/// Renders a `<textarea>` with its value as escaped content.
pub fn render_textarea(field: &Field) -> String {
    let rows = field.rows().to_string();
    let attrs = Attrs::default()
        .set("rows", Some(rows.as_str()))
        .set("name", field.name())
        .set("id", field.id())
        .set("placeholder", field.placeholder())
        .number("minlength", field.min_length())
        .number("maxlength", field.max_length())
        .flag("required", field.is_required())
        .flag("disabled", field.is_disabled());
    format!(
        "<textarea{}>{}</textarea>",
        attrs.0,
        escape_html(field.value().unwrap_or_default())
    )
}

/// Renders a `<button>`; the label is the button text.
pub fn render_button(field: &Field) -> String {
    let attrs = Attrs::default()
        .set("type", Some(field.kind().as_str()))
        .set("name", field.name())
        .set("id", field.id())
        .set("value", field.value())
        .flag("disabled", field.is_disabled());
    format!(
        "<button{}>{}</button>",
        attrs.0,
        escape_html(field.label().unwrap_or_default())
    )
}

/// Renders the `<label>`, with a marker for required fields.
///
/// Returns an empty string for kinds without labels or a suppressed label.
pub fn render_label(field: &Field) -> String {
    let Some(label) = field.label().filter(|_| field.kind().has_label()) else {
        return String::new();
    };
    let attrs = Attrs::default().set("for", field.id());
    let marker = if field.is_required() {
        r#"<sup class="required">*</sup>"#
    } else {
        ""
    };
    format!(
        "<label{}>{}{marker}</label>",
        attrs.0,
        escape_html(&capitalize(label))
    )
}

/// Renders the error slot for a named field. Empty when there is no error.
pub fn render_error(field: &Field) -> String {
    if field.kind().is_button() || field.kind() == FieldKind::Hidden {
        return String::new();
    }
    let Some(name) = field.name() else {
        return String::new();
    };
    error_slot(name, field.error().unwrap_or_default())
}

fn error_slot(key: &str, message: &str) -> String {
    format!(
        r#"<span data-input-error="{}">{}</span>"#,
        escape_html(key),
        escape_html(message)
    )
}

/// Renders label, control, and error slot for one field.
pub fn render_field(field: &Field) -> String {
    let control = match field.kind() {
        FieldKind::Text | FieldKind::Email | FieldKind::Password | FieldKind::Hidden => {
            render_input(field)
        }
        FieldKind::Textarea => render_textarea(field),
        FieldKind::Button | FieldKind::Submit | FieldKind::Reset => render_button(field),
    };
    format!("{}{control}{}", render_label(field), render_error(field))
}

/// Renders a whole form: opening tag, fields in order, the form-level
/// error slot, the success notice once sent, and the closing tag.
pub fn render_form(form: &Form) -> String {
    let attrs = Attrs::default()
        .set("method", Some(form.method().as_str()))
        .set("action", Some(form.action_url()).filter(|a| !a.is_empty()));

    let mut html = format!("<form{} data-form>", attrs.0);
    for field in form.fields() {
        html.push_str(&render_field(field));
    }
    let _ = write!(
        html,
        r#"<div data-input-error="{FORM_KEY}">{}</div>"#,
        escape_html(&form.error_message())
    );
    if let Some(success) = form.success_message() {
        let _ = write!(
            html,
            "<div data-form-success>{}</div>",
            escape_html(success)
        );
    }
    html.push_str("</form>");
    html
}
