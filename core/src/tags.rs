use serde::{Deserialize, Serialize};

/// Reserved registry field name under which service tags are registered.
pub const SERVICE_TAG_FIELD: &str = "service_tag";

/// The set of all known service tags: the union of tags attached to live
/// service records and tags registered in the value registry under
/// [`SERVICE_TAG_FIELD`]. Always deduplicated and alphabetically sorted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TagCollection {
    tags: Vec<String>,
}

impl TagCollection {
    /// Build the collection from both sources, dropping duplicates and empty
    /// strings and sorting the result.
    pub fn from_sources<I, J>(service_tags: I, registry_tags: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        let mut tags: Vec<String> = service_tags
            .into_iter()
            .chain(registry_tags)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort();
        tags.dedup();
        Self { tags }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.binary_search_by(|t| t.as_str().cmp(tag)).is_ok()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }
}

/// Payload of `GET /service-tags/unique`.
#[derive(Debug, Clone, Deserialize)]
pub struct UniqueTagsPayload {
    #[serde(default)]
    pub tags: Vec<String>,
}
