use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, RwLock};

use promcon_core::monitoring::{
    CategoriesPayload, CategoryPayload, MonitoringCategory, MonitoringType, TypePayload,
};
use promcon_core::schema::FormSchema;

use crate::error::ClientError;
use crate::transport::{Transport, encode_segment, payload};

/// The loader state machine: `idle → loading → loaded | error`. A `reload`
/// always runs the machine again from `loading` and fully replaces the prior
/// state; there is no merging.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    /// Human-readable message: the backend's structured detail when it sent
    /// one, otherwise the transport error, otherwise a generic fallback
    Error(String),
}

// Manual impl: the derive would demand `T: Default` even though `Idle`
// carries no value.
impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_idle(&self) -> bool {
        matches!(self, LoadState::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Display message for a failed load. [`ClientError::Api`] already carries
/// the backend's own wording (detail → message → code, with a generic
/// fallback), so its text is used verbatim; transport errors render their
/// own description.
fn error_message(err: &ClientError) -> String {
    let msg = err.to_string();
    if msg.is_empty() {
        "failed to load data from the backend".to_string()
    } else {
        msg
    }
}

/// Prevents duplicate concurrent loads of the same resource, e.g. from a
/// component that mounts and unmounts rapidly. The second caller simply
/// observes the `Loading` state the first one set.
#[derive(Default)]
struct InflightGuard {
    keys: Mutex<HashSet<String>>,
}

impl InflightGuard {
    /// True when the caller acquired the slot and should issue the request.
    fn begin(&self, key: &str) -> bool {
        self.lock().insert(key.to_string())
    }

    fn end(&self, key: &str) {
        self.lock().remove(key);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<String>> {
        self.keys.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Loads the form schema for one rendering context (a monitoring type's
/// create/edit form) and caches it for the owning component tree's lifetime.
pub struct FormSchemaLoader {
    transport: Arc<dyn Transport>,
    category: String,
    type_id: String,
    state: RwLock<LoadState<FormSchema>>,
    inflight: InflightGuard,
}

impl FormSchemaLoader {
    pub fn new(
        transport: Arc<dyn Transport>,
        category: impl Into<String>,
        type_id: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            category: category.into(),
            type_id: type_id.into(),
            state: RwLock::new(LoadState::Idle),
            inflight: InflightGuard::default(),
        }
    }

    pub fn state(&self) -> LoadState<FormSchema> {
        self.read_state().clone()
    }

    /// Mount-time load: fetches unless a schema is already loaded or a load
    /// is in flight.
    pub async fn load(&self) {
        if self.state().loaded().is_some() {
            return;
        }
        self.reload().await;
    }

    /// Refetch unconditionally, replacing whatever state was there before.
    pub async fn reload(&self) {
        let key = format!("{}/{}", self.category, self.type_id);
        if !self.inflight.begin(&key) {
            tracing::debug!(key, "form schema load already in flight");
            return;
        }

        *self.write_state() = LoadState::Loading;
        let path = format!(
            "/monitoring-types/{}/{}",
            encode_segment(&self.category),
            encode_segment(&self.type_id)
        );
        let next = match self.transport.get(&path, &[]).await {
            Ok(body) => match payload::<TypePayload>(body) {
                Ok(p) => LoadState::Loaded(p.monitoring_type.form_schema),
                Err(e) => LoadState::Error(error_message(&e)),
            },
            Err(e) => LoadState::Error(error_message(&e)),
        };
        *self.write_state() = next;
        self.inflight.end(&key);
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, LoadState<FormSchema>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, LoadState<FormSchema>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

/// Loads monitoring category/type definitions. Each resource (the full
/// category list, one category, one type) is its own state machine with its
/// own cache slot; loading one never implicitly loads another.
pub struct MonitoringTypeLoader {
    transport: Arc<dyn Transport>,
    all: RwLock<LoadState<Vec<MonitoringCategory>>>,
    categories: RwLock<HashMap<String, LoadState<MonitoringCategory>>>,
    types: RwLock<HashMap<String, LoadState<MonitoringType>>>,
    inflight: InflightGuard,
}

impl MonitoringTypeLoader {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            all: RwLock::new(LoadState::Idle),
            categories: RwLock::new(HashMap::new()),
            types: RwLock::new(HashMap::new()),
            inflight: InflightGuard::default(),
        }
    }

    pub fn all_state(&self) -> LoadState<Vec<MonitoringCategory>> {
        self.all.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn category_state(&self, name: &str) -> LoadState<MonitoringCategory> {
        self.categories
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn type_state(&self, category: &str, type_id: &str) -> LoadState<MonitoringType> {
        self.types
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&type_key(category, type_id))
            .cloned()
            .unwrap_or_default()
    }

    /// Load every category (a distinct, separately cached resource from the
    /// per-category loads).
    pub async fn load_all_categories(&self) {
        if !self.inflight.begin("all") {
            return;
        }
        *self.all.write().unwrap_or_else(|e| e.into_inner()) = LoadState::Loading;
        let next = match self.transport.get("/monitoring-types", &[]).await {
            Ok(body) => match payload::<CategoriesPayload>(body) {
                Ok(p) => LoadState::Loaded(p.categories),
                Err(e) => LoadState::Error(error_message(&e)),
            },
            Err(e) => LoadState::Error(error_message(&e)),
        };
        *self.all.write().unwrap_or_else(|e| e.into_inner()) = next;
        self.inflight.end("all");
    }

    pub async fn load_category(&self, name: &str) {
        let key = format!("category/{name}");
        if !self.inflight.begin(&key) {
            return;
        }
        self.set_category(name, LoadState::Loading);
        let path = format!("/monitoring-types/{}", encode_segment(name));
        let next = match self.transport.get(&path, &[]).await {
            Ok(body) => match payload::<CategoryPayload>(body) {
                Ok(p) => LoadState::Loaded(p.category),
                Err(e) => LoadState::Error(error_message(&e)),
            },
            Err(e) => LoadState::Error(error_message(&e)),
        };
        self.set_category(name, next);
        self.inflight.end(&key);
    }

    /// Load one type's full schema (matchers, form schema, table schema).
    pub async fn load_type(&self, category: &str, type_id: &str) {
        let key = format!("type/{}", type_key(category, type_id));
        if !self.inflight.begin(&key) {
            return;
        }
        self.set_type(category, type_id, LoadState::Loading);
        let path = format!(
            "/monitoring-types/{}/{}",
            encode_segment(category),
            encode_segment(type_id)
        );
        let next = match self.transport.get(&path, &[]).await {
            Ok(body) => match payload::<TypePayload>(body) {
                Ok(p) => LoadState::Loaded(p.monitoring_type),
                Err(e) => LoadState::Error(error_message(&e)),
            },
            Err(e) => LoadState::Error(error_message(&e)),
        };
        self.set_type(category, type_id, next);
        self.inflight.end(&key);
    }

    fn set_category(&self, name: &str, state: LoadState<MonitoringCategory>) {
        self.categories
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(name.to_string(), state);
    }

    fn set_type(&self, category: &str, type_id: &str, state: LoadState<MonitoringType>) {
        self.types
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(type_key(category, type_id), state);
    }
}

fn type_key(category: &str, type_id: &str) -> String {
    format!("{category}/{type_id}")
}
