use serde::{Deserialize, Serialize};

use crate::model::{ChecklistItemKey, ItemSlot};

/// A syllabus unit: a name, its ordered readings and optional prerequisite items.
///
/// Topics are identified by their position in the [`Catalog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub name: String,
    pub readings: Vec<String>,
    #[serde(rename = "mm_prereqs", default, skip_serializing_if = "Vec::is_empty")]
    pub prerequisites: Vec<String>,
}

impl Topic {
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, readings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            readings: readings.into_iter().map(Into::into).collect(),
            prerequisites: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn reading_count(&self) -> usize {
        self.readings.len()
    }

    #[must_use]
    pub fn prerequisite_count(&self) -> usize {
        self.prerequisites.len()
    }
}

/// Ordered, read-only syllabus. Loaded once and treated as immutable for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    topics: Vec<Topic>,
}

impl Catalog {
    #[must_use]
    pub fn new(topics: Vec<Topic>) -> Self {
        Self { topics }
    }

    #[must_use]
    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    #[must_use]
    pub fn topic(&self, index: usize) -> Option<&Topic> {
        self.topics.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Sum of reading counts across all topics. Prerequisites are not included.
    #[must_use]
    pub fn total_readings(&self) -> usize {
        self.topics.iter().map(Topic::reading_count).sum()
    }

    /// Whether the key points at a real slot in this catalog.
    #[must_use]
    pub fn resolves(&self, key: &ChecklistItemKey) -> bool {
        let Some(topic) = self.topic(key.topic_index()) else {
            return false;
        };
        match key.slot() {
            ItemSlot::Reading(r) => r < topic.reading_count(),
            ItemSlot::Prerequisite(p) => p < topic.prerequisite_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Topic::new("Quant", ["Rates", "TVM"]).with_prerequisites(["Prerequisites"]),
            Topic::new("Ethics", ["Code"]),
        ])
    }

    #[test]
    fn total_readings_excludes_prerequisites() {
        assert_eq!(catalog().total_readings(), 3);
    }

    #[test]
    fn resolves_only_real_slots() {
        let catalog = catalog();
        assert!(catalog.resolves(&ChecklistItemKey::reading(0, 1)));
        assert!(catalog.resolves(&ChecklistItemKey::prerequisite(0, 0)));
        assert!(!catalog.resolves(&ChecklistItemKey::prerequisite(1, 0)));
        assert!(!catalog.resolves(&ChecklistItemKey::reading(1, 1)));
        assert!(!catalog.resolves(&ChecklistItemKey::reading(5, 0)));
    }

    #[test]
    fn prerequisites_are_optional_on_the_wire() {
        let topic: Topic =
            serde_json::from_str(r#"{"name":"Derivatives","readings":["Options"]}"#).unwrap();
        assert!(topic.prerequisites.is_empty());

        let topic: Topic = serde_json::from_str(
            r#"{"name":"Economics","readings":[],"mm_prereqs":["Prerequisites"]}"#,
        )
        .unwrap();
        assert_eq!(topic.prerequisite_count(), 1);
    }
}
