use serde::{Deserialize, Serialize};

use crate::schema::FormSchema;

/// A classification rule mapping raw backend-reported attributes (job names,
/// blackbox modules, exporter types) onto one logical monitoring type.
/// Several vendor-specific strings can map to the same type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeMatcher {
    /// Which raw attribute the matcher inspects, e.g. `job` or `module`
    pub field: String,
    /// Raw strings that classify as this type
    #[serde(default)]
    pub values: Vec<String>,
}

impl TypeMatcher {
    pub fn matches(&self, raw: &str) -> bool {
        self.values.iter().any(|v| v == raw)
    }
}

/// Compact type reference inside a category listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitoringTypeSummary {
    pub id: String,
    pub display_name: String,
}

/// One monitoring type's full definition: how raw services are classified
/// into it, and the form/table schemas used to create and display them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitoringType {
    pub id: String,
    pub display_name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub matchers: Vec<TypeMatcher>,
    #[serde(default)]
    pub form_schema: FormSchema,
    /// Column layout for list views; opaque to the core
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_schema: Option<serde_json::Value>,
}

impl MonitoringType {
    /// True when every matcher whose `field` appears in `attrs` accepts the
    /// corresponding raw value, and at least one matcher matched. Matchers
    /// for attributes the service does not report are ignored.
    pub fn classifies(&self, attrs: &[(&str, &str)]) -> bool {
        let mut hit = false;
        for matcher in &self.matchers {
            if let Some((_, raw)) = attrs.iter().find(|(k, _)| *k == matcher.field) {
                if !matcher.matches(raw) {
                    return false;
                }
                hit = true;
            }
        }
        hit
    }
}

/// One category of monitoring types, from `GET /monitoring-types` or
/// `GET /monitoring-types/{category}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonitoringCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub types: Vec<MonitoringTypeSummary>,
}

/// Payload of `GET /monitoring-types`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesPayload {
    #[serde(default)]
    pub categories: Vec<MonitoringCategory>,
}

/// Payload of `GET /monitoring-types/{category}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryPayload {
    pub category: MonitoringCategory,
}

/// Payload of `GET /monitoring-types/{category}/{type_id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TypePayload {
    pub monitoring_type: MonitoringType,
}
