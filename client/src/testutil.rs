//! In-memory fake backend for tests. Implements the same semantics the real
//! backend guarantees: title-case normalization, case-insensitive idempotent
//! ensure, delete guarded by usage counts, and per-entry batch results.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};

use promcon_core::error::codes;

use crate::error::ClientError;
use crate::transport::Transport;

#[derive(Debug, Clone)]
struct StoredValue {
    value: String,
    usage_count: u64,
}

#[derive(Default)]
pub struct FakeBackend {
    values: Mutex<HashMap<String, Vec<StoredValue>>>,
    live_tags: Mutex<Vec<String>>,
    calls: Mutex<Vec<(Method, String)>>,
    offline: AtomicBool,
    fail_paths: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, field: &str, values: &[&str]) {
        let mut store = self.values.lock().unwrap();
        let entry = store.entry(field.to_string()).or_default();
        for v in values {
            entry.push(StoredValue {
                value: v.to_string(),
                usage_count: 0,
            });
        }
    }

    pub fn seed_with_usage(&self, field: &str, value: &str, usage_count: u64) {
        self.values
            .lock()
            .unwrap()
            .entry(field.to_string())
            .or_default()
            .push(StoredValue {
                value: value.to_string(),
                usage_count,
            });
    }

    pub fn seed_live_tags(&self, tags: &[&str]) {
        self.live_tags
            .lock()
            .unwrap()
            .extend(tags.iter().map(|t| t.to_string()));
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Make one exact path return an application error.
    pub fn fail_path(&self, path: &str) {
        self.fail_paths.lock().unwrap().push(path.to_string());
    }

    pub fn stored_values(&self, field: &str) -> Vec<String> {
        self.values
            .lock()
            .unwrap()
            .get(field)
            .map(|vs| vs.iter().map(|v| v.value.clone()).collect())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_count(&self, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, p)| *m == Method::GET && p == path)
            .count()
    }

    fn ensure_one(&self, field: &str, value: &str) -> (bool, String) {
        let mut store = self.values.lock().unwrap();
        let entry = store.entry(field.to_string()).or_default();
        if let Some(existing) = entry
            .iter()
            .find(|v| v.value.eq_ignore_ascii_case(value.trim()))
        {
            return (false, existing.value.clone());
        }
        let canonical = title_case(value.trim());
        entry.push(StoredValue {
            value: canonical.clone(),
            usage_count: 0,
        });
        (true, canonical)
    }

    fn values_body(&self, field: &str) -> Value {
        let store = self.values.lock().unwrap();
        let values: Vec<Value> = store
            .get(field)
            .map(|vs| {
                vs.iter()
                    .map(|v| json!({"value": v.value, "usage_count": v.usage_count}))
                    .collect()
            })
            .unwrap_or_default();
        json!({"success": true, "values": values})
    }
}

/// Backend-style normalization: every word title-cased.
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl Transport for FakeBackend {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<Value, ClientError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(ClientError::Connection("connection refused".to_string()));
        }
        self.calls.lock().unwrap().push((method.clone(), path.to_string()));
        if self.fail_paths.lock().unwrap().iter().any(|p| p == path) {
            return Err(ClientError::Api {
                code: Some(codes::INTERNAL_ERROR.to_string()),
                message: format!("simulated failure for {path}"),
            });
        }

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match (method.as_str(), segments.as_slice()) {
            ("GET", ["reference-values"]) => Ok(json!({
                "success": true,
                "fields": [
                    {"field_name": "company", "display_name": "Company"},
                    {"field_name": "service_tag", "display_name": "Service Tag"}
                ]
            })),
            ("GET", ["reference-values", "categories"]) => Ok(json!({
                "success": true,
                "categories": [{"name": "general", "fields": ["company", "location"]}]
            })),
            ("GET", ["reference-values", field]) => {
                let field = urlencoding::decode(field)
                    .map(|f| f.into_owned())
                    .unwrap_or_else(|_| field.to_string());
                Ok(self.values_body(&field))
            }
            ("POST", ["reference-values", "ensure"]) => {
                let body = body.unwrap_or_default();
                let field = body["field_name"].as_str().unwrap_or_default().to_string();
                let value = body["value"].as_str().unwrap_or_default().to_string();
                if value == "boom" {
                    return Err(ClientError::Api {
                        code: Some(codes::INTERNAL_ERROR.to_string()),
                        message: "simulated ensure failure".to_string(),
                    });
                }
                let (created, canonical) = self.ensure_one(&field, &value);
                Ok(json!({"success": true, "created": created, "value": canonical}))
            }
            ("POST", ["reference-values", "batch-ensure"]) => {
                let entries = body
                    .as_ref()
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();
                let results: Vec<Value> = entries
                    .iter()
                    .map(|e| {
                        let field = e["field_name"].as_str().unwrap_or_default();
                        let value = e["value"].as_str().unwrap_or_default();
                        if value == "boom" {
                            json!({
                                "field_name": field,
                                "value": value,
                                "success": false,
                                "created": false,
                                "message": "simulated entry failure"
                            })
                        } else {
                            let (created, canonical) = self.ensure_one(field, value);
                            json!({
                                "field_name": field,
                                "value": canonical,
                                "success": true,
                                "created": created
                            })
                        }
                    })
                    .collect();
                Ok(json!({"success": true, "results": results}))
            }
            ("POST", ["reference-values"]) => {
                let body = body.unwrap_or_default();
                let field = body["field_name"].as_str().unwrap_or_default().to_string();
                let value = body["value"].as_str().unwrap_or_default().to_string();
                let (created, canonical) = self.ensure_one(&field, &value);
                if !created {
                    return Err(ClientError::Api {
                        code: Some("conflict".to_string()),
                        message: format!("'{canonical}' already exists"),
                    });
                }
                Ok(json!({"success": true, "created": true, "value": canonical}))
            }
            ("DELETE", ["reference-values", field, value]) => {
                let field = urlencoding::decode(field)
                    .map(|f| f.into_owned())
                    .unwrap_or_else(|_| field.to_string());
                let value = urlencoding::decode(value)
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| value.to_string());
                let force = query
                    .iter()
                    .any(|(k, v)| k == "force" && v == "true");
                let mut store = self.values.lock().unwrap();
                let entry = store.entry(field).or_default();
                let Some(pos) = entry
                    .iter()
                    .position(|v| v.value.eq_ignore_ascii_case(&value))
                else {
                    return Err(ClientError::Api {
                        code: Some(codes::NOT_FOUND.to_string()),
                        message: format!("'{value}' not found"),
                    });
                };
                if entry[pos].usage_count > 0 && !force {
                    return Err(ClientError::Api {
                        code: Some(codes::VALUE_IN_USE.to_string()),
                        message: format!("'{value}' is still referenced"),
                    });
                }
                entry.remove(pos);
                Ok(json!({"success": true}))
            }
            ("GET", ["service-tags", "unique"]) => {
                let tags = self.live_tags.lock().unwrap().clone();
                Ok(json!({"success": true, "tags": tags}))
            }
            ("POST", ["service-tags", "ensure"]) => {
                let body = body.unwrap_or_default();
                let tag = body["tag"].as_str().unwrap_or_default().to_string();
                let (created, canonical) = self.ensure_one("service_tag", &tag);
                Ok(json!({"success": true, "created": created, "value": canonical}))
            }
            ("POST", ["service-tags", "batch-ensure"]) => {
                let tags = body
                    .as_ref()
                    .and_then(|b| b["tags"].as_array())
                    .cloned()
                    .unwrap_or_default();
                let results: Vec<Value> = tags
                    .iter()
                    .map(|t| {
                        let tag = t.as_str().unwrap_or_default();
                        let (created, canonical) = self.ensure_one("service_tag", tag);
                        json!({
                            "field_name": "service_tag",
                            "value": canonical,
                            "success": true,
                            "created": created
                        })
                    })
                    .collect();
                Ok(json!({"success": true, "results": results}))
            }
            ("GET", ["monitoring-types"]) => Ok(json!({
                "success": true,
                "categories": [{
                    "name": "blackbox",
                    "display_name": "Blackbox",
                    "types": [{"id": "http", "display_name": "HTTP Check"}]
                }]
            })),
            ("GET", ["monitoring-types", category]) => Ok(json!({
                "success": true,
                "category": {
                    "name": category,
                    "display_name": "Blackbox",
                    "types": [{"id": "http", "display_name": "HTTP Check"}]
                }
            })),
            ("GET", ["monitoring-types", category, type_id]) => Ok(json!({
                "success": true,
                "monitoring_type": {
                    "id": type_id,
                    "display_name": "HTTP Check",
                    "category": category,
                    "matchers": [{"field": "module", "values": ["http_2xx"]}],
                    "form_schema": {
                        "title": "HTTP Check",
                        "fields": [
                            {
                                "name": "company",
                                "display_name": "Company",
                                "field_type": "string",
                                "available_for_registration": true
                            },
                            {
                                "name": "address",
                                "display_name": "Address",
                                "field_type": "string",
                                "required": true,
                                "available_for_registration": true
                            }
                        ]
                    }
                }
            })),
            (method, segments) => Err(ClientError::Api {
                code: Some(codes::NOT_FOUND.to_string()),
                message: format!("no fake route for {method} /{}", segments.join("/")),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_normalizes_every_word() {
        assert_eq!(title_case("NEW COMPANY"), "New Company");
        assert_eq!(title_case("acme corp"), "Acme Corp");
        assert_eq!(title_case("  spaced   out "), "Spaced Out");
    }
}
