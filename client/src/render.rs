use promcon_core::schema::{FieldDescriptor, FieldType, FormSchema};

use crate::validate::{ValidationRule, build_rules};

/// Field names hard-excluded from autocomplete/auto-registration even when
/// the schema flags them `available_for_registration`. These are
/// unique-per-record identifiers, addresses, external URLs, or free-form
/// notes — not reusable vocabulary. Matching is exact; where the source
/// schemas have shipped casing variants, both are listed.
pub const EXCLUDED_FIELDS: &[&str] = &[
    "id",
    "service_id",
    "name",
    "service_name",
    "display_name",
    "address",
    "instance",
    "url",
    "URL",
    "external_url",
    "notes",
];

/// Fields that identify a record and therefore become read-only once the
/// record exists.
const IDENTIFIER_FIELDS: &[&str] = &["id", "service_id", "name"];

pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_FIELDS.contains(&name)
}

/// The widget a field resolves to. A closed set: unknown schema types fall
/// through to `TextInput` so the form degrades instead of breaking when the
/// backend schema evolves ahead of this client.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldWidget {
    /// Single-value autocomplete backed by the value registry namespace
    /// named by `registry_field`
    Autocomplete { registry_field: String },
    /// Closed-choice selector populated from the schema's options, not the
    /// registry
    Select { options: Vec<String> },
    /// Multi-line free text, no autocomplete
    TextArea,
    Number { min: Option<f64> },
    TextInput { url: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// A fully configured form field: widget choice plus assembled validation
/// rules, ready for whatever actually draws it.
#[derive(Debug)]
pub struct RenderedField {
    pub name: String,
    pub display_name: String,
    pub widget: FieldWidget,
    pub rules: Vec<ValidationRule>,
    pub required: bool,
    /// Identifier fields are immutable once a service exists
    pub read_only: bool,
    pub placeholder: Option<String>,
    pub help: Option<String>,
}

/// Resolve one field descriptor into a configured field. Decision order,
/// first match wins:
/// 1. registrable string outside the exclusion list → autocomplete
/// 2. select with non-empty options → closed select
/// 3. text → textarea
/// 4. number → numeric input (non-negative by convention)
/// 5. everything else, including url and unrecognized types → plain text
///    input (url adds a format rule via the validator)
pub fn render_field(field: &FieldDescriptor, mode: FormMode) -> RenderedField {
    let widget = if field.available_for_registration
        && field.field_type == FieldType::String
        && !is_excluded(&field.name)
    {
        FieldWidget::Autocomplete {
            registry_field: field.name.clone(),
        }
    } else if field.field_type == FieldType::Select && !field.options.is_empty() {
        FieldWidget::Select {
            options: field.options.clone(),
        }
    } else if field.field_type == FieldType::Text {
        FieldWidget::TextArea
    } else if field.field_type == FieldType::Number {
        FieldWidget::Number { min: Some(0.0) }
    } else {
        FieldWidget::TextInput {
            url: field.field_type == FieldType::Url,
        }
    };

    RenderedField {
        name: field.name.clone(),
        display_name: field.display_name.clone(),
        widget,
        rules: build_rules(field),
        required: field.required,
        read_only: mode == FormMode::Edit && IDENTIFIER_FIELDS.contains(&field.name.as_str()),
        placeholder: field.placeholder.clone(),
        help: field.description.clone(),
    }
}

/// Render every field of a schema, preserving schema order.
pub fn render_form(schema: &FormSchema, mode: FormMode) -> Vec<RenderedField> {
    schema.fields.iter().map(|f| render_field(f, mode)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use promcon_core::schema::FieldValidation;

    fn descriptor(name: &str, field_type: FieldType) -> FieldDescriptor {
        FieldDescriptor::new(name, name.to_uppercase(), field_type)
    }

    #[test]
    fn registrable_string_gets_an_autocomplete() {
        let mut f = descriptor("company", FieldType::String);
        f.available_for_registration = true;
        let rendered = render_field(&f, FormMode::Create);
        assert_eq!(
            rendered.widget,
            FieldWidget::Autocomplete {
                registry_field: "company".to_string()
            }
        );
    }

    #[test]
    fn excluded_fields_fall_through_to_plain_text() {
        let mut f = descriptor("address", FieldType::String);
        f.available_for_registration = true;
        let rendered = render_field(&f, FormMode::Create);
        assert_eq!(rendered.widget, FieldWidget::TextInput { url: false });
    }

    #[test]
    fn non_registrable_string_is_plain_text() {
        let f = descriptor("comment_line", FieldType::String);
        let rendered = render_field(&f, FormMode::Create);
        assert_eq!(rendered.widget, FieldWidget::TextInput { url: false });
    }

    #[test]
    fn select_needs_non_empty_options() {
        let mut f = descriptor("environment", FieldType::Select);
        f.options = vec!["prod".to_string(), "staging".to_string()];
        let rendered = render_field(&f, FormMode::Create);
        assert_eq!(
            rendered.widget,
            FieldWidget::Select {
                options: vec!["prod".to_string(), "staging".to_string()]
            }
        );

        // Empty options: nothing to choose from, degrade to free text
        let f = descriptor("environment", FieldType::Select);
        let rendered = render_field(&f, FormMode::Create);
        assert_eq!(rendered.widget, FieldWidget::TextInput { url: false });
    }

    #[test]
    fn text_number_and_url_map_to_their_widgets() {
        assert_eq!(
            render_field(&descriptor("notes_long", FieldType::Text), FormMode::Create).widget,
            FieldWidget::TextArea
        );
        assert_eq!(
            render_field(&descriptor("port", FieldType::Number), FormMode::Create).widget,
            FieldWidget::Number { min: Some(0.0) }
        );
        let rendered = render_field(&descriptor("dashboard", FieldType::Url), FormMode::Create);
        assert_eq!(rendered.widget, FieldWidget::TextInput { url: true });
        assert_eq!(rendered.rules.len(), 1); // the URL format rule
    }

    #[test]
    fn unknown_type_never_refuses_to_render() {
        let f = descriptor("fancy", FieldType::Other("ip_address".to_string()));
        let rendered = render_field(&f, FormMode::Create);
        assert_eq!(rendered.widget, FieldWidget::TextInput { url: false });
    }

    #[test]
    fn registration_flag_beats_the_select_branch() {
        // available_for_registration is evaluated before the kind switch,
        // but only for string fields — a registrable select stays a select.
        let mut f = descriptor("environment", FieldType::Select);
        f.available_for_registration = true;
        f.options = vec!["prod".to_string()];
        let rendered = render_field(&f, FormMode::Create);
        assert!(matches!(rendered.widget, FieldWidget::Select { .. }));
    }

    #[test]
    fn identifier_fields_are_read_only_in_edit_mode() {
        let f = descriptor("name", FieldType::String);
        assert!(!render_field(&f, FormMode::Create).read_only);
        assert!(render_field(&f, FormMode::Edit).read_only);
        let f = descriptor("company", FieldType::String);
        assert!(!render_field(&f, FormMode::Edit).read_only);
    }

    #[test]
    fn rules_are_attached_regardless_of_branch() {
        let mut f = descriptor("company", FieldType::String);
        f.available_for_registration = true;
        f.required = true;
        f.validation = Some(FieldValidation {
            min_length: Some(2),
            max_length: Some(40),
            ..FieldValidation::default()
        });
        let rendered = render_field(&f, FormMode::Create);
        assert!(matches!(rendered.widget, FieldWidget::Autocomplete { .. }));
        assert_eq!(rendered.rules.len(), 2);
    }

    #[test]
    fn form_render_preserves_field_order() {
        let schema = FormSchema {
            title: None,
            fields: vec![
                descriptor("b_field", FieldType::String),
                descriptor("a_field", FieldType::Number),
            ],
        };
        let rendered = render_form(&schema, FormMode::Create);
        assert_eq!(rendered[0].name, "b_field");
        assert_eq!(rendered[1].name, "a_field");
    }
}
