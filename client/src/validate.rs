use regex::Regex;
use serde_json::{Value, json};

use promcon_core::schema::{FieldDescriptor, FieldType};

/// Bound defaults when the schema names only one side of a length range.
pub const DEFAULT_MIN_LENGTH: usize = 0;
pub const DEFAULT_MAX_LENGTH: usize = 200;

/// One client-side validation rule. Rules other than `Required` skip empty
/// values — presence is exclusively the `Required` rule's concern, so an
/// optional field left blank never trips its format rules.
#[derive(Debug, Clone)]
pub enum ValidationRule {
    Required { message: String },
    Length { min: usize, max: usize, message: String },
    Pattern { regex: Regex, message: String },
    Url { message: String },
}

impl ValidationRule {
    pub fn message(&self) -> &str {
        match self {
            ValidationRule::Required { message }
            | ValidationRule::Length { message, .. }
            | ValidationRule::Pattern { message, .. }
            | ValidationRule::Url { message } => message,
        }
    }

    /// True when `value` satisfies this rule.
    pub fn check(&self, value: &str) -> bool {
        let trimmed = value.trim();
        match self {
            ValidationRule::Required { .. } => !trimmed.is_empty(),
            ValidationRule::Length { min, max, .. } => {
                if trimmed.is_empty() {
                    return true;
                }
                let len = trimmed.chars().count();
                len >= *min && len <= *max
            }
            ValidationRule::Pattern { regex, .. } => {
                trimmed.is_empty() || regex.is_match(trimmed)
            }
            ValidationRule::Url { .. } => {
                trimmed.is_empty() || url::Url::parse(trimmed).is_ok()
            }
        }
    }

    /// JSON description for render-plan previews.
    pub fn describe(&self) -> Value {
        match self {
            ValidationRule::Required { message } => {
                json!({"rule": "required", "message": message})
            }
            ValidationRule::Length { min, max, message } => {
                json!({"rule": "length", "min": min, "max": max, "message": message})
            }
            ValidationRule::Pattern { regex, message } => {
                json!({"rule": "pattern", "regex": regex.as_str(), "message": message})
            }
            ValidationRule::Url { message } => json!({"rule": "url", "message": message}),
        }
    }
}

/// Assemble the rule set for one field descriptor, in a fixed order:
/// presence, length, pattern, then the unconditional URL rule for url-typed
/// fields. A regex that fails to compile is skipped with a warning rather
/// than refusing the field.
pub fn build_rules(field: &FieldDescriptor) -> Vec<ValidationRule> {
    let mut rules = Vec::new();

    if field.required {
        let message = field
            .validation
            .as_ref()
            .and_then(|v| v.required_message.clone())
            .unwrap_or_else(|| format!("{} is required", field.display_name));
        rules.push(ValidationRule::Required { message });
    }

    if let Some(validation) = &field.validation {
        if validation.min_length.is_some() || validation.max_length.is_some() {
            let min = validation.min_length.unwrap_or(DEFAULT_MIN_LENGTH);
            let max = validation.max_length.unwrap_or(DEFAULT_MAX_LENGTH);
            rules.push(ValidationRule::Length {
                min,
                max,
                message: format!(
                    "{} must be between {min} and {max} characters",
                    field.display_name
                ),
            });
        }

        if let Some(pattern) = &validation.validation_regex {
            match Regex::new(pattern) {
                Ok(regex) => rules.push(ValidationRule::Pattern {
                    regex,
                    message: format!("{} has an invalid format", field.display_name),
                }),
                Err(e) => {
                    tracing::warn!(field = %field.name, pattern, error = %e, "skipping uncompilable validation regex");
                }
            }
        }
    }

    if field.field_type == FieldType::Url {
        rules.push(ValidationRule::Url {
            message: format!("{} must be a valid URL", field.display_name),
        });
    }

    rules
}

/// Run every rule; returns the messages of the rules that failed (empty
/// means the value is acceptable).
pub fn validate(rules: &[ValidationRule], value: &str) -> Vec<String> {
    rules
        .iter()
        .filter(|r| !r.check(value))
        .map(|r| r.message().to_string())
        .collect()
}
