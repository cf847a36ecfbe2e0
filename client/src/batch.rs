use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use promcon_core::reference::{BatchEnsurePayload, EnsureResult};

use crate::error::ClientError;
use crate::transport::{Transport, payload};

/// An in-memory, transient (field, value) pair the user typed but which has
/// not been confirmed registered yet. Lives for one form fill-and-submit
/// cycle: converted into a registry call on submit, discarded on cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingEnsureEntry {
    pub field_name: String,
    pub value: String,
    pub metadata: Option<Value>,
}

/// Aggregates pending ensure entries collected while a form is being filled
/// and submits them as one `batch-ensure` request when the form is saved,
/// amortizing the round trip across all auto-registerable fields.
///
/// Delivery contract: at-most-once, with no transactional guarantee across
/// the batch. When the request is delivered, the backend processes each
/// entry independently and one entry's failure never blocks the others —
/// callers get one [`EnsureResult`] per entry, in submission order. When the
/// request fails at the transport level the caller must assume none of the
/// entries were registered; the pending set is kept so a later submit can
/// retry. If the request reached the backend but the response was lost,
/// some entries may already be registered — the ensure operation is
/// idempotent, so the retry is harmless.
pub struct BatchEnsureCoordinator {
    transport: Arc<dyn Transport>,
    pending: Mutex<Vec<PendingEnsureEntry>>,
}

impl BatchEnsureCoordinator {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Queue a value for registration at submit time. Blank inputs and
    /// (field, value) pairs already queued are ignored; returns whether the
    /// entry was actually added.
    pub fn add(&self, field_name: &str, value: &str, metadata: Option<Value>) -> bool {
        let field_name = field_name.trim();
        let value = value.trim();
        if field_name.is_empty() || value.is_empty() {
            return false;
        }
        let mut pending = self.lock_pending();
        if pending
            .iter()
            .any(|e| e.field_name == field_name && e.value == value)
        {
            return false;
        }
        pending.push(PendingEnsureEntry {
            field_name: field_name.to_string(),
            value: value.to_string(),
            metadata,
        });
        true
    }

    pub fn len(&self) -> usize {
        self.lock_pending().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_pending().is_empty()
    }

    /// Snapshot of the queued entries.
    pub fn pending(&self) -> Vec<PendingEnsureEntry> {
        self.lock_pending().clone()
    }

    /// Discard everything — the form was cancelled.
    pub fn clear(&self) {
        self.lock_pending().clear();
    }

    /// Submit all pending entries in a single request. See the type-level
    /// delivery contract. An empty queue is a no-op that issues no request.
    pub async fn drain(&self) -> Result<Vec<EnsureResult>, ClientError> {
        let entries = std::mem::take(&mut *self.lock_pending());
        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let body: Vec<Value> = entries
            .iter()
            .map(|e| {
                let mut v = json!({"field_name": e.field_name, "value": e.value});
                if let Some(m) = &e.metadata {
                    v["metadata"] = m.clone();
                }
                v
            })
            .collect();

        match self
            .transport
            .post("/reference-values/batch-ensure", Value::Array(body))
            .await
        {
            Ok(resp) => {
                let results = payload::<BatchEnsurePayload>(resp)?.results;
                let failed = results.iter().filter(|r| !r.success).count();
                if failed > 0 {
                    tracing::warn!(
                        failed,
                        total = results.len(),
                        "batch ensure completed with per-entry failures"
                    );
                }
                Ok(results)
            }
            Err(e) => {
                // Assume nothing was registered; keep the entries for retry.
                let mut pending = self.lock_pending();
                let mut restored = entries;
                restored.extend(pending.drain(..));
                *pending = restored;
                Err(e)
            }
        }
    }

    fn lock_pending(&self) -> std::sync::MutexGuard<'_, Vec<PendingEnsureEntry>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}
