use std::sync::{Arc, RwLock};

use serde_json::{Value, json};

use promcon_core::reference::{BatchEnsurePayload, EnsureOutcome, EnsureResult, ValuesPayload};
use promcon_core::tags::{SERVICE_TAG_FIELD, TagCollection, UniqueTagsPayload};

use crate::error::ClientError;
use crate::transport::{Transport, payload};

/// Result of [`TagClient::load_tags`]. Like value loading, this never fails
/// past its boundary; per-source failures become warnings and whatever did
/// load is still applied.
#[derive(Debug, Clone, Default)]
pub struct LoadedTags {
    pub tags: TagCollection,
    pub warnings: Vec<String>,
    pub from_cache: bool,
}

/// Client for the service-tag vocabulary. The known-tag set is the union of
/// tags attached to live service records and tags registered in the value
/// registry under the reserved `service_tag` field; both sources are fetched
/// concurrently and applied partially — one source failing does not discard
/// the other.
pub struct TagClient {
    transport: Arc<dyn Transport>,
    cache: RwLock<Option<TagCollection>>,
}

impl TagClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: RwLock::new(None),
        }
    }

    /// Fetch and union both tag sources. Only when both sources fail is the
    /// cached collection served instead.
    pub async fn load_tags(&self) -> LoadedTags {
        let live = self.transport.get("/service-tags/unique", &[]);
        let registry_path = format!("/reference-values/{SERVICE_TAG_FIELD}");
        let registry = self.transport.get(&registry_path, &[]);
        let (live, registry) = tokio::join!(live, registry);

        let mut warnings = Vec::new();
        let live_tags = match live.and_then(payload::<UniqueTagsPayload>) {
            Ok(p) => Some(p.tags),
            Err(e) => {
                tracing::warn!(error = %e, "live service-tag load failed");
                warnings.push(format!("service tags unavailable: {e}"));
                None
            }
        };
        let registry_tags = match registry.and_then(payload::<ValuesPayload>) {
            Ok(p) => Some(p.values.into_iter().map(|v| v.value).collect::<Vec<_>>()),
            Err(e) => {
                tracing::warn!(error = %e, "registry service-tag load failed");
                warnings.push(format!("registered tags unavailable: {e}"));
                None
            }
        };

        if live_tags.is_none() && registry_tags.is_none() {
            let cached = self.cached();
            return LoadedTags {
                from_cache: cached.is_some(),
                tags: cached.unwrap_or_default(),
                warnings,
            };
        }

        let tags = TagCollection::from_sources(
            live_tags.unwrap_or_default(),
            registry_tags.unwrap_or_default(),
        );
        *self.write_cache() = Some(tags.clone());
        LoadedTags {
            tags,
            warnings,
            from_cache: false,
        }
    }

    /// Idempotent tag registration. The returned `value` is the canonical
    /// form; a `created:true` response refreshes the cached collection.
    pub async fn ensure_tag(&self, tag: &str, metadata: Option<Value>) -> EnsureOutcome {
        let tag = tag.trim();
        if tag.is_empty() {
            return EnsureOutcome::rejected(tag, "tag is required");
        }

        let mut body = json!({"tag": tag});
        if let Some(m) = metadata {
            body["metadata"] = m;
        }

        match self.transport.post("/service-tags/ensure", body).await {
            Ok(resp) => match payload::<EnsureOutcome>(resp) {
                Ok(outcome) => {
                    if outcome.created {
                        let _ = self.load_tags().await;
                    }
                    outcome
                }
                Err(e) => EnsureOutcome::failed(tag, e.to_string()),
            },
            Err(e) => {
                tracing::warn!(tag, error = %e, "ensure_tag failed");
                EnsureOutcome::failed(tag, e.to_string())
            }
        }
    }

    /// Register several tags in one request, one result per tag in order.
    /// Blank tags are dropped before submission; an empty list issues no
    /// request.
    pub async fn batch_ensure_tags(
        &self,
        tags: &[String],
        metadata: Option<Value>,
    ) -> Result<Vec<EnsureResult>, ClientError> {
        let tags: Vec<&str> = tags
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        if tags.is_empty() {
            return Ok(Vec::new());
        }

        let mut body = json!({"tags": tags});
        if let Some(m) = metadata {
            body["metadata"] = m;
        }

        let resp = self.transport.post("/service-tags/batch-ensure", body).await?;
        let results = payload::<BatchEnsurePayload>(resp)?.results;
        if results.iter().any(|r| r.created) {
            let _ = self.load_tags().await;
        }
        Ok(results)
    }

    pub fn cached(&self) -> Option<TagCollection> {
        self.cache.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, Option<TagCollection>> {
        self.cache.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeBackend;

    #[tokio::test]
    async fn union_is_deduplicated_and_sorted() {
        let backend = Arc::new(FakeBackend::new());
        backend.seed_live_tags(&["linux", "prod"]);
        backend.seed("service_tag", &["prod", "db"]);

        let client = TagClient::new(backend);
        let loaded = client.load_tags().await;
        assert_eq!(loaded.tags.as_slice(), ["db", "linux", "prod"]);
        assert!(loaded.warnings.is_empty());
    }

    #[tokio::test]
    async fn one_failed_source_still_applies_the_other() {
        let backend = Arc::new(FakeBackend::new());
        backend.seed_live_tags(&["linux"]);
        backend.seed("service_tag", &["db"]);
        backend.fail_path("/service-tags/unique");

        let client = TagClient::new(backend);
        let loaded = client.load_tags().await;
        assert_eq!(loaded.tags.as_slice(), ["db"]);
        assert_eq!(loaded.warnings.len(), 1);
        assert!(!loaded.from_cache);
    }

    #[tokio::test]
    async fn total_failure_serves_the_cached_collection() {
        let backend = Arc::new(FakeBackend::new());
        backend.seed_live_tags(&["linux"]);

        let client = TagClient::new(backend.clone());
        client.load_tags().await;

        backend.set_offline(true);
        let loaded = client.load_tags().await;
        assert!(loaded.from_cache);
        assert_eq!(loaded.tags.as_slice(), ["linux"]);
        assert_eq!(loaded.warnings.len(), 2);
    }

    #[tokio::test]
    async fn ensured_tags_show_up_in_the_next_load() {
        let backend = Arc::new(FakeBackend::new());
        let client = TagClient::new(backend);

        let outcome = client.ensure_tag("db", None).await;
        assert!(outcome.success && outcome.created);
        assert_eq!(outcome.value, "Db");

        let loaded = client.load_tags().await;
        assert!(loaded.tags.contains("Db"));
    }

    #[tokio::test]
    async fn blank_tags_are_rejected_locally() {
        let backend = Arc::new(FakeBackend::new());
        let client = TagClient::new(backend.clone());

        let outcome = client.ensure_tag("  ", None).await;
        assert!(!outcome.success);
        assert_eq!(backend.request_count(), 0);

        let results = client.batch_ensure_tags(&[], None).await.unwrap();
        assert!(results.is_empty());
        assert_eq!(backend.request_count(), 0);
    }
}
