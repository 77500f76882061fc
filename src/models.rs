//! Data structures shared by the synonym dictionary.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle to a node in the stem tree's arena.
///
/// A node keeps its handle for its whole lifetime, no matter how often the
/// tree rotates around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena slot index
    pub fn index(self) -> usize {
        self.0
    }
}

/// Identifier of a synonym group (an index into the group table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub usize);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for GroupId {
    fn from(index: usize) -> Self {
        GroupId(index)
    }
}

/// A stem with its inflected forms and synonym group memberships.
#[derive(Debug, Clone)]
pub struct StemNode {
    pub stem: String,
    pub inflections: Vec<String>, // Insertion order, no duplicates
    pub groups: Vec<GroupId>,     // One entry per sense, no duplicates
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) height: i32, // -1 = empty subtree, 0 = leaf
}

impl StemNode {
    /// Create a detached leaf.
    pub fn new(stem: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            inflections: Vec::new(),
            groups: Vec::new(),
            left: None,
            right: None,
            height: 0,
        }
    }

    pub fn left(&self) -> Option<NodeId> {
        self.left
    }

    pub fn right(&self) -> Option<NodeId> {
        self.right
    }

    /// Cached height of the subtree rooted here
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn has_inflection(&self, word: &str) -> bool {
        self.inflections.iter().any(|f| f == word)
    }

    pub fn is_member_of(&self, group: GroupId) -> bool {
        self.groups.contains(&group)
    }
}

/// Loader parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadParams {
    pub section_marker: String, // Line that opens the synonym section
    pub strict: bool, // Abort on the first rejected line
    pub show_progress: bool,
}

impl Default for LoadParams {
    fn default() -> Self {
        Self {
            section_marker: "$".to_string(),
            strict: true,
            show_progress: false,
        }
    }
}

/// One sense of a stem: the group it belongs to and the other members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenseReport {
    pub group: GroupId,
    pub synonyms: Vec<String>,
}

/// Everything the dictionary knows about a stem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StemReport {
    pub stem: String,
    pub inflections: Vec<String>,
    pub senses: Vec<SenseReport>,
}

/// Dictionary-wide counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictionarySummary {
    pub stem_count: usize,
    pub group_count: usize,
    pub inflection_count: usize,
    pub tree_height: i32,
}
