use serde::{Deserialize, Serialize};

/// Error body shape the backend uses for `success:false` responses and HTTP
/// 4xx/5xx. All fields are optional because different backend layers fill
/// different subsets; [`ErrorBody::human_message`] picks the best available
/// string in priority order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Machine-readable code, e.g. `value_in_use`, `not_found`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Structured detail string (FastAPI-style backends)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Best human-readable message: structured detail first, then message,
    /// then the raw error code. None when the body carries nothing usable.
    pub fn human_message(&self) -> Option<&str> {
        self.detail
            .as_deref()
            .or(self.message.as_deref())
            .or(self.error.as_deref())
            .filter(|s| !s.is_empty())
    }
}

/// Error codes the backend reports and the client dispatches on.
pub mod codes {
    /// Deletion blocked because the value is still referenced
    pub const VALUE_IN_USE: &str = "value_in_use";
    pub const NOT_FOUND: &str = "not_found";
    pub const VALIDATION_FAILED: &str = "validation_failed";
    pub const INTERNAL_ERROR: &str = "internal_error";
}
