use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// The closed set of field kinds the renderer dispatches over. Schema
/// evolution can ship types this client has never seen; those deserialize
/// into `Other` and fall through to the default text-input branch instead of
/// failing the whole form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Select,
    Text,
    Number,
    Url,
    Boolean,
    /// Unrecognized type string, preserved verbatim
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::String => "string",
            FieldType::Select => "select",
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Url => "url",
            FieldType::Boolean => "boolean",
            FieldType::Other(s) => s,
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "string" => FieldType::String,
            "select" => FieldType::Select,
            "text" => FieldType::Text,
            "number" => FieldType::Number,
            "url" => FieldType::Url,
            "boolean" => FieldType::Boolean,
            other => FieldType::Other(other.to_string()),
        }
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(FieldType::parse(&s))
    }
}

impl Default for FieldType {
    fn default() -> Self {
        FieldType::String
    }
}

/// Optional validation constraints attached to a field descriptor.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldValidation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regex the value must match, compiled client-side into a pattern rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_regex: Option<String>,
    /// Schema-provided message for the presence rule; a default referencing
    /// the display name is generated when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_message: Option<String>,
}

/// Server-supplied abstract description of one form field. Read-only from
/// the client's perspective; reloaded per rendering context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldDescriptor {
    /// Unique key within its schema; also the reference-value namespace for
    /// registrable string fields
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    /// Closed choices for `select` fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Inline help shown next to the field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Eligible for the value registry (autocomplete + auto-registration),
    /// subject to the renderer's exclusion list
    #[serde(default)]
    pub available_for_registration: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

impl FieldDescriptor {
    /// Minimal descriptor, mainly for tests and fixtures.
    pub fn new(name: impl Into<String>, display_name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            field_type,
            required: false,
            options: Vec::new(),
            placeholder: None,
            description: None,
            available_for_registration: false,
            validation: None,
        }
    }
}

/// A complete form's worth of field descriptors, consumed generically by the
/// renderer — no per-field hardcoding anywhere downstream.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FormSchema {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_field_types_round_trip() {
        for raw in ["string", "select", "text", "number", "url", "boolean"] {
            let ft: FieldType = serde_json::from_value(serde_json::json!(raw)).unwrap();
            assert_eq!(serde_json::to_value(&ft).unwrap(), serde_json::json!(raw));
        }
    }

    #[test]
    fn unknown_field_type_is_preserved_not_rejected() {
        let ft: FieldType = serde_json::from_value(serde_json::json!("ip_address")).unwrap();
        assert_eq!(ft, FieldType::Other("ip_address".to_string()));
        assert_eq!(ft.as_str(), "ip_address");
    }

    #[test]
    fn descriptor_defaults_are_permissive() {
        let field: FieldDescriptor = serde_json::from_value(serde_json::json!({
            "name": "company",
            "display_name": "Company"
        }))
        .unwrap();
        assert_eq!(field.field_type, FieldType::String);
        assert!(!field.required);
        assert!(!field.available_for_registration);
        assert!(field.options.is_empty());
    }
}
