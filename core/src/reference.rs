use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One canonical string value registered for a named field (e.g. field
/// `company`, value `"Acme Corp"`). Within a field namespace, values are
/// unique after normalization — the backend resolves case-insensitive
/// collisions to a single canonical entry and clients must treat the stored
/// form as authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReferenceValue {
    /// Canonical, normalized (title-cased) form of the value
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    /// How many live records currently reference this value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,
    /// Free-form metadata attached at registration time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl ReferenceValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            created_at: None,
            created_by: None,
            usage_count: None,
            last_used_at: None,
            metadata: None,
        }
    }
}

/// Request body for `POST /reference-values/ensure` and one element of the
/// `POST /reference-values/batch-ensure` array.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnsureRequest {
    pub field_name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Outcome of a single ensure/create call. `value` carries the canonical
/// stored form, which may differ in casing from what was submitted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnsureOutcome {
    pub success: bool,
    /// True only when this call created the value; false when it already
    /// existed (idempotent hit) or when the call failed
    #[serde(default)]
    pub created: bool,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EnsureOutcome {
    /// Deterministic failure result for inputs rejected before any network
    /// call (empty field name or value).
    pub fn rejected(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            created: false,
            value: value.into(),
            message: Some(message.into()),
        }
    }

    pub fn failed(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::rejected(value, message)
    }
}

/// One result of a batch ensure, in submission order. Per-entry failures are
/// reported here and never abort the rest of the batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnsureResult {
    pub field_name: String,
    pub value: String,
    pub success: bool,
    #[serde(default)]
    pub created: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Payload of `GET /reference-values/{field}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ValuesPayload {
    #[serde(default)]
    pub values: Vec<ReferenceValue>,
}

/// Payload of `POST /reference-values/batch-ensure`.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchEnsurePayload {
    #[serde(default)]
    pub results: Vec<EnsureResult>,
}

/// One field namespace that supports reference values, from
/// `GET /reference-values/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryField {
    pub field_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_count: Option<u64>,
}

/// Payload of `GET /reference-values/`.
#[derive(Debug, Clone, Deserialize)]
pub struct FieldsPayload {
    #[serde(default)]
    pub fields: Vec<RegistryField>,
}

/// A grouping of registry fields for the admin UI, from
/// `GET /reference-values/categories`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub fields: Vec<String>,
}

/// Payload of `GET /reference-values/categories`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesPayload {
    #[serde(default)]
    pub categories: Vec<FieldCategory>,
}
