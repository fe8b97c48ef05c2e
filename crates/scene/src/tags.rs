use std::collections::HashSet;

use formats::FeatureCollection;

/// Union of every feature's tags, in first-seen order.
///
/// Derived from the unfiltered collection; changing the filter never changes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagVocabulary {
    tags: Vec<String>,
}

impl TagVocabulary {
    pub fn derive(collection: &FeatureCollection) -> Self {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut tags: Vec<String> = Vec::new();
        for feature in &collection.features {
            for tag in feature.tags() {
                if !tag.is_empty() && seen.insert(tag) {
                    tags.push(tag.to_string());
                }
            }
        }
        Self { tags }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
