use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde_json::{Value, json};

use promcon_core::error::codes;
use promcon_core::reference::{
    CategoriesPayload, EnsureOutcome, FieldCategory, FieldsPayload, ReferenceValue, RegistryField,
    ValuesPayload,
};

use crate::error::ClientError;
use crate::transport::{Transport, encode_segment, payload};

/// Result of [`ValueRegistryClient::load_values`]. Loading never fails past
/// this boundary: on a network error the last cached list comes back with a
/// non-fatal warning attached.
#[derive(Debug, Clone, Default)]
pub struct LoadedValues {
    pub values: Vec<ReferenceValue>,
    /// Human-readable explanation when the backend could not be reached and
    /// the list is served from cache (or is empty)
    pub warning: Option<String>,
    pub from_cache: bool,
}

/// Client for the reference-value registry.
///
/// The per-field cache is read-through and write-invalidate: every mutation
/// that changes backend state triggers at most one full list reload instead
/// of patching the cached list locally, so the backend's normalized form is
/// always what callers eventually see. The cache is per process and only
/// eventually consistent — a reload started by one call is not guaranteed to
/// finish before an unrelated call reads the list.
pub struct ValueRegistryClient {
    transport: Arc<dyn Transport>,
    cache: RwLock<HashMap<String, Vec<ReferenceValue>>>,
}

impl ValueRegistryClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Known values for `field`. `include_stats` asks the backend to attach
    /// usage counters. Never returns an error: a failed fetch falls back to
    /// the cached list (possibly empty) plus a warning string.
    pub async fn load_values(&self, field: &str, include_stats: bool) -> LoadedValues {
        let field = field.trim();
        if field.is_empty() {
            return LoadedValues {
                warning: Some("field name is required".to_string()),
                ..LoadedValues::default()
            };
        }

        let query = [(
            "include_stats".to_string(),
            include_stats.to_string(),
        )];
        let path = format!("/reference-values/{}", encode_segment(field));
        match self.transport.get(&path, &query).await {
            Ok(body) => match payload::<ValuesPayload>(body) {
                Ok(p) => {
                    self.store(field, p.values.clone());
                    LoadedValues {
                        values: p.values,
                        warning: None,
                        from_cache: false,
                    }
                }
                Err(e) => self.fallback(field, e),
            },
            Err(e) => self.fallback(field, e),
        }
    }

    /// Idempotent ensure: registers `value` under `field` if absent, returns
    /// the existing canonical entry otherwise. The returned `value` is the
    /// backend's authoritative (title-cased) form and callers must substitute
    /// it for whatever the user typed. A `created:true` response triggers
    /// exactly one cache reload so freshly registered values show up in the
    /// next autocomplete without a page reload.
    ///
    /// Failures are folded into the outcome (`success:false`), never raised —
    /// registering a value is a best-effort side effect of saving a form.
    pub async fn ensure_value(
        &self,
        field: &str,
        value: &str,
        metadata: Option<Value>,
    ) -> EnsureOutcome {
        let field = field.trim();
        let typed = value.trim();
        if field.is_empty() || typed.is_empty() {
            return EnsureOutcome::rejected(value, "field name and value are required");
        }

        let mut body = json!({"field_name": field, "value": typed});
        if let Some(m) = metadata {
            body["metadata"] = m;
        }

        match self.transport.post("/reference-values/ensure", body).await {
            Ok(resp) => match payload::<EnsureOutcome>(resp) {
                Ok(outcome) => {
                    if outcome.created {
                        self.reload(field).await;
                    }
                    outcome
                }
                Err(e) => EnsureOutcome::failed(typed, e.to_string()),
            },
            Err(e) => {
                tracing::warn!(field, value = typed, error = %e, "ensure_value failed");
                EnsureOutcome::failed(typed, e.to_string())
            }
        }
    }

    /// Explicit administrative creation (the dedicated admin page). Unlike
    /// ensure, an already-existing value is a failure, not a no-op. Reloads
    /// the cache on success.
    pub async fn create_value(
        &self,
        field: &str,
        value: &str,
        metadata: Option<Value>,
    ) -> EnsureOutcome {
        let field = field.trim();
        let typed = value.trim();
        if field.is_empty() || typed.is_empty() {
            return EnsureOutcome::rejected(value, "field name and value are required");
        }

        let mut body = json!({"field_name": field, "value": typed});
        if let Some(m) = metadata {
            body["metadata"] = m;
        }

        match self.transport.post("/reference-values/", body).await {
            Ok(resp) => match payload::<EnsureOutcome>(resp) {
                Ok(outcome) => {
                    if outcome.success {
                        self.reload(field).await;
                    }
                    outcome
                }
                Err(e) => EnsureOutcome::failed(typed, e.to_string()),
            },
            Err(e) => {
                tracing::warn!(field, value = typed, error = %e, "create_value failed");
                EnsureOutcome::failed(typed, e.to_string())
            }
        }
    }

    /// Delete a registered value. The one raising operation in this client:
    /// deletion failure must interrupt a confirmation-dialog flow, not be
    /// silently absorbed. A value still referenced by live records is
    /// refused unless `force` is set, surfaced as
    /// [`ClientError::ValueInUse`]. Reloads the cache on success.
    pub async fn delete_value(
        &self,
        field: &str,
        value: &str,
        force: bool,
    ) -> Result<(), ClientError> {
        let field = field.trim();
        let value = value.trim();
        if field.is_empty() || value.is_empty() {
            return Err(ClientError::InvalidInput(
                "field name and value are required".to_string(),
            ));
        }

        let path = format!(
            "/reference-values/{}/{}",
            encode_segment(field),
            encode_segment(value)
        );
        let query = [("force".to_string(), force.to_string())];
        match self.transport.delete(&path, &query).await {
            Ok(_) => {
                self.reload(field).await;
                Ok(())
            }
            Err(ClientError::Api { code, .. }) if code.as_deref() == Some(codes::VALUE_IN_USE) => {
                Err(ClientError::ValueInUse {
                    value: value.to_string(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// All field namespaces that support reference values.
    pub async fn list_fields(&self) -> Result<Vec<RegistryField>, ClientError> {
        let body = self.transport.get("/reference-values/", &[]).await?;
        Ok(payload::<FieldsPayload>(body)?.fields)
    }

    /// Field categories for the admin grouping UI.
    pub async fn list_categories(&self) -> Result<Vec<FieldCategory>, ClientError> {
        let body = self.transport.get("/reference-values/categories", &[]).await?;
        Ok(payload::<CategoriesPayload>(body)?.categories)
    }

    /// Snapshot of the cached list for `field`, if any.
    pub fn cached(&self, field: &str) -> Option<Vec<ReferenceValue>> {
        self.read_cache().get(field).cloned()
    }

    /// Refresh the cached list after a mutation. A failed reload keeps the
    /// stale list; the next load will retry.
    async fn reload(&self, field: &str) {
        let path = format!("/reference-values/{}", encode_segment(field));
        match self.transport.get(&path, &[]).await {
            Ok(body) => match payload::<ValuesPayload>(body) {
                Ok(p) => self.store(field, p.values),
                Err(e) => tracing::debug!(field, error = %e, "cache reload decode failed"),
            },
            Err(e) => tracing::debug!(field, error = %e, "cache reload failed"),
        }
    }

    fn fallback(&self, field: &str, err: ClientError) -> LoadedValues {
        tracing::warn!(field, error = %err, "load_values failed, serving cache");
        let cached = self.cached(field);
        LoadedValues {
            from_cache: cached.is_some(),
            values: cached.unwrap_or_default(),
            warning: Some(err.to_string()),
        }
    }

    fn store(&self, field: &str, values: Vec<ReferenceValue>) {
        self.write_cache().insert(field.to_string(), values);
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Vec<ReferenceValue>>> {
        self.cache.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Vec<ReferenceValue>>> {
        self.cache.write().unwrap_or_else(|e| e.into_inner())
    }
}
