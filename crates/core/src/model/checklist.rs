use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// One of the three independent completion tracks applied to every reading.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Video lectures.
    #[default]
    Videos,
    /// Prep-provider reading.
    Kaplan,
    /// Curriculum practice questions.
    Cfai,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Videos, Category::Kaplan, Category::Cfai];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Videos => "videos",
            Category::Kaplan => "kaplan",
            Category::Cfai => "cfai",
        }
    }

    /// Human-readable label used by progress bars.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Videos => "MM Videos",
            Category::Kaplan => "Kaplan Read",
            Category::Cfai => "CFAI Questions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "videos" => Ok(Category::Videos),
            "kaplan" => Ok(Category::Kaplan),
            "cfai" => Ok(Category::Cfai),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

//
// ─── ITEM KEY ──────────────────────────────────────────────────────────────────
//

/// Position of a checklist item within its topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ItemSlot {
    Reading(usize),
    Prerequisite(usize),
}

const PREREQ_MARKER: &str = "prereq_";

/// Composite `(topic, slot)` key into checklist progress.
///
/// Serialized as `"<topic>_<reading>"` or `"<topic>_prereq_<n>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChecklistItemKey {
    topic: usize,
    slot: ItemSlot,
}

impl ChecklistItemKey {
    #[must_use]
    pub fn new(topic: usize, slot: ItemSlot) -> Self {
        Self { topic, slot }
    }

    #[must_use]
    pub fn reading(topic: usize, reading: usize) -> Self {
        Self::new(topic, ItemSlot::Reading(reading))
    }

    #[must_use]
    pub fn prerequisite(topic: usize, prerequisite: usize) -> Self {
        Self::new(topic, ItemSlot::Prerequisite(prerequisite))
    }

    #[must_use]
    pub fn topic_index(&self) -> usize {
        self.topic
    }

    #[must_use]
    pub fn slot(&self) -> ItemSlot {
        self.slot
    }
}

impl fmt::Display for ChecklistItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.slot {
            ItemSlot::Reading(r) => write!(f, "{}_{r}", self.topic),
            ItemSlot::Prerequisite(p) => write!(f, "{}_{PREREQ_MARKER}{p}", self.topic),
        }
    }
}

impl FromStr for ChecklistItemKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidItemKey(s.to_string());
        let (topic, rest) = s.split_once('_').ok_or_else(invalid)?;
        let topic = parse_index(topic).ok_or_else(invalid)?;
        let slot = match rest.strip_prefix(PREREQ_MARKER) {
            Some(p) => ItemSlot::Prerequisite(parse_index(p).ok_or_else(invalid)?),
            None => ItemSlot::Reading(parse_index(rest).ok_or_else(invalid)?),
        };
        Ok(Self { topic, slot })
    }
}

// Digits only: `usize::from_str` would also accept a leading `+`.
fn parse_index(raw: &str) -> Option<usize> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

impl TryFrom<String> for ChecklistItemKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChecklistItemKey> for String {
    fn from(key: ChecklistItemKey) -> Self {
        key.to_string()
    }
}

//
// ─── ENTRY ─────────────────────────────────────────────────────────────────────
//

/// Completion flags for one checklist item. Absent flags default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    #[serde(default)]
    pub videos: bool,
    #[serde(default)]
    pub kaplan: bool,
    #[serde(default)]
    pub cfai: bool,
}

impl ChecklistEntry {
    #[must_use]
    pub fn get(&self, category: Category) -> bool {
        match category {
            Category::Videos => self.videos,
            Category::Kaplan => self.kaplan,
            Category::Cfai => self.cfai,
        }
    }

    pub fn set(&mut self, category: Category, value: bool) {
        match category {
            Category::Videos => self.videos = value,
            Category::Kaplan => self.kaplan = value,
            Category::Cfai => self.cfai = value,
        }
    }

    /// Number of categories marked done (0..=3).
    #[must_use]
    pub fn done_count(&self) -> usize {
        Category::ALL.iter().filter(|c| self.get(**c)).count()
    }
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Sparse checklist progress. A missing key means "not started", never an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistState {
    entries: HashMap<ChecklistItemKey, ChecklistEntry>,
}

impl ChecklistState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build state from the wire map, skipping keys that do not parse.
    ///
    /// Returns the state together with the rejected raw keys.
    #[must_use]
    pub fn from_wire(raw: HashMap<String, ChecklistEntry>) -> (Self, Vec<String>) {
        let mut rejected = Vec::new();
        let mut entries = HashMap::with_capacity(raw.len());
        for (key, entry) in raw {
            match key.parse::<ChecklistItemKey>() {
                Ok(parsed) => {
                    entries.insert(parsed, entry);
                }
                Err(_) => rejected.push(key),
            }
        }
        rejected.sort();
        (Self { entries }, rejected)
    }

    #[must_use]
    pub fn to_wire(&self) -> HashMap<String, ChecklistEntry> {
        self.entries
            .iter()
            .map(|(key, entry)| (key.to_string(), *entry))
            .collect()
    }

    /// Flags for `key`, all-false when the key was never written.
    #[must_use]
    pub fn get(&self, key: &ChecklistItemKey) -> ChecklistEntry {
        self.entries.get(key).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_done(&self, key: &ChecklistItemKey, category: Category) -> bool {
        self.get(key).get(category)
    }

    /// Mutable access that creates the all-false record on first write.
    pub fn entry_mut(&mut self, key: ChecklistItemKey) -> &mut ChecklistEntry {
        self.entries.entry(key).or_default()
    }

    pub fn set(&mut self, key: ChecklistItemKey, category: Category, value: bool) {
        self.entry_mut(key).set(category, value);
    }

    /// Flip the flag and return the resulting value.
    pub fn toggle(&mut self, key: ChecklistItemKey, category: Category) -> bool {
        let entry = self.entry_mut(key);
        let value = !entry.get(category);
        entry.set(category, value);
        value
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChecklistItemKey, &ChecklistEntry)> {
        self.entries.iter()
    }
}
