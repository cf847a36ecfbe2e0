use promcon_core::reference::EnsureOutcome;

use crate::registry::ValueRegistryClient;

/// UI-free state for the single-value autocomplete control: a list of known
/// (registered) options, the current value, and the auto-ensure switch.
///
/// By default `auto_ensure_on_change` is off — the recommended setup: typed
/// values stay in local form state and are registered later, in one batch,
/// when the form is saved. With it on, committing a change immediately
/// ensures the value and silently adopts the backend's normalized form.
#[derive(Debug, Clone)]
pub struct AutocompleteInput {
    field_name: String,
    known: Vec<String>,
    value: String,
    auto_ensure_on_change: bool,
}

impl AutocompleteInput {
    pub fn new(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            known: Vec::new(),
            value: String::new(),
            auto_ensure_on_change: false,
        }
    }

    pub fn with_known_values(mut self, known: Vec<String>) -> Self {
        self.known = known;
        self
    }

    pub fn with_auto_ensure(mut self, enabled: bool) -> Self {
        self.auto_ensure_on_change = enabled;
        self
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Selectable options, i.e. the known registered values.
    pub fn options(&self) -> &[String] {
        &self.known
    }

    pub fn set_known_values(&mut self, known: Vec<String>) {
        self.known = known;
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether the current value deserves the "new value" badge: non-empty
    /// and not in the known list. Comparison ignores case because the
    /// backend folds case-insensitive duplicates into one canonical entry.
    pub fn is_new_value(&self) -> bool {
        let v = self.value.trim();
        !v.is_empty() && !self.known.iter().any(|k| k.eq_ignore_ascii_case(v))
    }

    /// Keystroke-level update: local state only, never a network call.
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    /// Commit a changed value. With auto-ensure off this is identical to
    /// [`Self::set_value`] and returns `None`. With it on, a new value is
    /// ensured immediately and the field silently adopts the normalized
    /// canonical form (no clearing, no refocus); known values skip the call.
    pub async fn change(
        &mut self,
        value: &str,
        registry: &ValueRegistryClient,
    ) -> Option<EnsureOutcome> {
        self.set_value(value);
        if !self.auto_ensure_on_change || !self.is_new_value() {
            return None;
        }

        let outcome = registry.ensure_value(&self.field_name, value, None).await;
        if outcome.success {
            self.value = outcome.value.clone();
            if !self
                .known
                .iter()
                .any(|k| k.eq_ignore_ascii_case(&outcome.value))
            {
                self.known.push(outcome.value.clone());
            }
        }
        Some(outcome)
    }
}

/// One rendered tag chip; `known` drives the visual distinction between
/// registered tags and freshly typed ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChip {
    pub value: String,
    pub known: bool,
}

/// UI-free state for the multi-value tag control. The value is a set of
/// strings; every mutation reports the full resulting array, never a delta.
#[derive(Debug, Clone, Default)]
pub struct TagInput {
    known: Vec<String>,
    tags: Vec<String>,
    max_tags: Option<usize>,
}

impl TagInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_known_tags(mut self, known: Vec<String>) -> Self {
        self.known = known;
        self
    }

    /// Cap on the number of tags; additions beyond it are truncated.
    pub fn with_max_tags(mut self, max: usize) -> Self {
        self.max_tags = Some(max);
        self
    }

    pub fn set_known_tags(&mut self, known: Vec<String>) {
        self.known = known;
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Add one tag. Blanks and duplicates are ignored; the cap truncates.
    /// Returns the full resulting tag array.
    pub fn add(&mut self, tag: &str) -> &[String] {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return &self.tags;
        }
        if self
            .max_tags
            .is_some_and(|max| self.tags.len() >= max)
        {
            return &self.tags;
        }
        self.tags.push(tag.to_string());
        &self.tags
    }

    /// Remove one tag; returns the full resulting array.
    pub fn remove(&mut self, tag: &str) -> &[String] {
        self.tags.retain(|t| t != tag);
        &self.tags
    }

    /// Replace the whole set (e.g. loading an existing record), applying the
    /// same trimming, dedup and cap as incremental adds.
    pub fn set(&mut self, tags: Vec<String>) -> &[String] {
        self.tags.clear();
        for tag in tags {
            self.add(&tag);
        }
        &self.tags
    }

    /// Chips for display, each flagged known/new.
    pub fn chips(&self) -> Vec<TagChip> {
        self.tags
            .iter()
            .map(|t| TagChip {
                value: t.clone(),
                known: self.known.iter().any(|k| k == t),
            })
            .collect()
    }
}
