//! The synonym dictionary: public operations over the stem tree and the
//! synonym group table.
//!
//! Every operation validates before it mutates. The only nested mutation is
//! `add_synonym` creating a missing synonym stem, which happens after all other
//! checks have passed.

use crate::groups::{GroupError, SynonymGroupTable};
use crate::loader::{load_from_path, LoadError};
use crate::models::{
    DictionarySummary, GroupId, LoadParams, NodeId, SenseReport, StemNode, StemReport,
};
use crate::similarity::{resolve_stem_from_inflection, ResolveError};
use crate::tree::{StemTree, TreeError};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DictError {
    #[error("Stem must not be empty")]
    EmptyStem,
    #[error("Stem already in dictionary: {0}")]
    DuplicateStem(String),
    #[error("Stem not in dictionary: {0}")]
    StemNotFound(String),
    #[error("{word} is already an inflection of {stem}")]
    DuplicateInflection { stem: String, word: String },
    #[error("{word} is not an inflection of {stem}")]
    InflectionNotFound { stem: String, word: String },
    #[error("Invalid synonym group: {0}")]
    InvalidGroup(GroupId),
    #[error("{stem} is already in synonym group {group}")]
    AlreadyInGroup { stem: String, group: GroupId },
    #[error("{stem} is not in synonym group {group}")]
    NotInGroup { stem: String, group: GroupId },
    #[error("{0} cannot be its own synonym")]
    SelfSynonym(String),
    #[error("Dictionary is empty")]
    EmptyDictionary,
    #[error("{word} is not an inflection of its closest stem {closest}")]
    NoMatchingInflection { word: String, closest: String },
    #[error("{stem} has no sense at position {position}")]
    SenseOutOfRange { stem: String, position: usize },
    #[error("Synonym group {group} has no member other than {stem}")]
    NoSynonym { stem: String, group: GroupId },
    #[error("Inconsistent dictionary: {0}")]
    Inconsistent(String),
}

impl From<TreeError> for DictError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::DuplicateKey(stem) => DictError::DuplicateStem(stem),
            TreeError::NotFound(stem) => DictError::StemNotFound(stem),
            TreeError::Invariant(msg) => DictError::Inconsistent(msg),
        }
    }
}

impl From<GroupError> for DictError {
    fn from(err: GroupError) -> Self {
        match err {
            GroupError::InvalidGroup(group) => DictError::InvalidGroup(group),
            GroupError::AlreadyMember { stem, group } => DictError::AlreadyInGroup { stem, group },
            GroupError::NotInGroup { stem, group } => DictError::NotInGroup { stem, group },
        }
    }
}

impl From<ResolveError> for DictError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::EmptyTree => DictError::EmptyDictionary,
            ResolveError::NoInflection { word, closest } => {
                DictError::NoMatchingInflection { word, closest }
            }
        }
    }
}

/// Stems with their inflections, cross-referenced by synonym groups.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    tree: StemTree,
    groups: SynonymGroupTable,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a dictionary file in the stem / inflections / `$` / synonyms format.
    pub fn from_path(path: &Path, params: &LoadParams) -> Result<Self, LoadError> {
        load_from_path(path, params)
    }

    pub fn tree(&self) -> &StemTree {
        &self.tree
    }

    pub fn groups(&self) -> &SynonymGroupTable {
        &self.groups
    }

    fn lookup(&self, stem: &str) -> Result<NodeId, DictError> {
        self.tree
            .find(stem)
            .ok_or_else(|| DictError::StemNotFound(stem.to_string()))
    }

    fn node(&self, stem: &str) -> Result<&StemNode, DictError> {
        let id = self.lookup(stem)?;
        self.tree
            .get(id)
            .ok_or_else(|| DictError::StemNotFound(stem.to_string()))
    }

    fn node_mut(&mut self, stem: &str) -> Result<&mut StemNode, DictError> {
        let id = self.lookup(stem)?;
        self.tree
            .get_mut(id)
            .ok_or_else(|| DictError::StemNotFound(stem.to_string()))
    }

    fn stem_of(&self, id: NodeId) -> &str {
        self.tree.stem(id).unwrap_or_default()
    }

    pub fn add_stem(&mut self, stem: &str) -> Result<(), DictError> {
        if stem.is_empty() {
            return Err(DictError::EmptyStem);
        }
        self.tree.insert(stem)?;
        Ok(())
    }

    pub fn add_inflection(&mut self, stem: &str, word: &str) -> Result<(), DictError> {
        let node = self.node_mut(stem)?;
        if node.has_inflection(word) {
            return Err(DictError::DuplicateInflection {
                stem: stem.to_string(),
                word: word.to_string(),
            });
        }
        node.inflections.push(word.to_string());
        Ok(())
    }

    /// Link `stem` and `synonym` in one sense.
    ///
    /// With `group == None` a new group is created; otherwise both stems join
    /// the given group (`stem` only if it is not already a member). A missing
    /// `synonym` is added to the dictionary first. Returns the group used.
    pub fn add_synonym(
        &mut self,
        stem: &str,
        synonym: &str,
        group: Option<GroupId>,
    ) -> Result<GroupId, DictError> {
        if let Some(group) = group {
            if !self.groups.is_valid(group) {
                return Err(DictError::InvalidGroup(group));
            }
        }
        let a = self.lookup(stem)?;
        if stem == synonym {
            return Err(DictError::SelfSynonym(stem.to_string()));
        }
        if synonym.is_empty() {
            return Err(DictError::EmptyStem);
        }

        let existing = self.tree.find(synonym);
        if let (Some(group), Some(b)) = (group, existing) {
            if self.groups.contains(group, b)? {
                return Err(DictError::AlreadyInGroup {
                    stem: synonym.to_string(),
                    group,
                });
            }
        }

        let b = match existing {
            Some(b) => b,
            None => {
                debug!(stem = synonym, "adding missing synonym stem");
                self.tree.insert(synonym)?
            }
        };

        let group = match group {
            None => self.groups.create_group(&mut self.tree, a, b),
            Some(group) => {
                if !self.groups.contains(group, a)? {
                    self.groups.add_to_group(&mut self.tree, group, a)?;
                }
                self.groups.add_to_group(&mut self.tree, group, b)?;
                group
            }
        };

        Ok(group)
    }

    /// Remove a stem, dropping it from every synonym group first.
    pub fn remove_stem(&mut self, stem: &str) -> Result<(), DictError> {
        if self.is_empty() {
            return Err(DictError::EmptyDictionary);
        }
        let id = self.lookup(stem)?;

        let left = self.groups.purge(&mut self.tree, id);
        self.tree.remove(stem)?;

        debug!(stem, groups = ?left, "removed stem from dictionary");
        Ok(())
    }

    pub fn remove_inflection(&mut self, stem: &str, word: &str) -> Result<(), DictError> {
        if self.is_empty() {
            return Err(DictError::EmptyDictionary);
        }
        let node = self.node_mut(stem)?;
        let pos = node
            .inflections
            .iter()
            .position(|f| f == word)
            .ok_or_else(|| DictError::InflectionNotFound {
                stem: stem.to_string(),
                word: word.to_string(),
            })?;
        node.inflections.remove(pos);
        Ok(())
    }

    /// Take `synonym` out of `group`. `stem` must itself belong to the group.
    pub fn remove_synonym(
        &mut self,
        stem: &str,
        synonym: &str,
        group: GroupId,
    ) -> Result<(), DictError> {
        let a = self.lookup(stem)?;
        let b = self.lookup(synonym)?;

        if !self.groups.contains(group, a)? {
            return Err(DictError::NotInGroup {
                stem: stem.to_string(),
                group,
            });
        }
        self.groups.remove_from_group(&mut self.tree, group, b)?;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn stem_count(&self) -> usize {
        self.tree.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn contains_stem(&self, stem: &str) -> bool {
        self.tree.contains(stem)
    }

    /// Find the stem `word` is an inflection of.
    pub fn resolve_stem(&self, word: &str) -> Result<String, DictError> {
        if self.is_empty() {
            return Err(DictError::EmptyDictionary);
        }
        let id = resolve_stem_from_inflection(&self.tree, word)?;
        Ok(self.stem_of(id).to_string())
    }

    /// Number of senses (group memberships) of `stem`.
    pub fn sense_count(&self, stem: &str) -> Result<usize, DictError> {
        Ok(self.node(stem)?.groups.len())
    }

    fn sense_group(&self, stem: &str, position: usize) -> Result<GroupId, DictError> {
        self.node(stem)?
            .groups
            .get(position)
            .copied()
            .ok_or_else(|| DictError::SenseOutOfRange {
                stem: stem.to_string(),
                position,
            })
    }

    /// A representative synonym for one sense: the group's first member if it
    /// is not `stem`, otherwise the second.
    pub fn sense(&self, stem: &str, position: usize) -> Result<String, DictError> {
        let group = self.sense_group(stem, position)?;
        let members = self.groups.members(group)?;

        let pick = match members.first() {
            Some(&first) if self.stem_of(first) != stem => Some(first),
            _ => members.get(1).copied(),
        };

        pick.map(|id| self.stem_of(id).to_string())
            .ok_or_else(|| DictError::NoSynonym {
                stem: stem.to_string(),
                group,
            })
    }

    /// All other members of the group behind one sense of `stem`.
    pub fn synonyms_of(&self, stem: &str, position: usize) -> Result<Vec<String>, DictError> {
        let group = self.sense_group(stem, position)?;
        Ok(self
            .groups
            .members(group)?
            .iter()
            .map(|&id| self.stem_of(id))
            .filter(|&other| other != stem)
            .map(str::to_string)
            .collect())
    }

    pub fn inflections_of(&self, stem: &str) -> Result<Vec<String>, DictError> {
        Ok(self.node(stem)?.inflections.clone())
    }

    /// All stems in lexicographic order.
    pub fn stems(&self) -> Vec<String> {
        self.tree.stems().into_iter().map(str::to_string).collect()
    }

    pub fn report(&self, stem: &str) -> Result<StemReport, DictError> {
        let node = self.node(stem)?;
        let senses = (0..node.groups.len())
            .map(|position| {
                Ok(SenseReport {
                    group: node.groups[position],
                    synonyms: self.synonyms_of(stem, position)?,
                })
            })
            .collect::<Result<Vec<_>, DictError>>()?;

        Ok(StemReport {
            stem: node.stem.clone(),
            inflections: node.inflections.clone(),
            senses,
        })
    }

    pub fn summary(&self) -> DictionarySummary {
        let inflection_count = self
            .tree
            .in_order()
            .into_iter()
            .filter_map(|id| self.tree.get(id))
            .map(|node| node.inflections.len())
            .sum();

        DictionarySummary {
            stem_count: self.stem_count(),
            group_count: self.group_count(),
            inflection_count,
            tree_height: self.tree.height(),
        }
    }

    /// Check the tree invariants and that group membership is mirrored
    /// exactly between the group table and the nodes.
    pub fn check_consistency(&self) -> Result<(), DictError> {
        self.tree.check_invariants()?;

        for (group, members) in self.groups.iter() {
            for (i, &id) in members.iter().enumerate() {
                let node = self.tree.get(id).ok_or_else(|| {
                    DictError::Inconsistent(format!("group {} holds a freed node", group))
                })?;
                if !node.is_member_of(group) {
                    return Err(DictError::Inconsistent(format!(
                        "{} is in group {} but does not record it",
                        node.stem, group
                    )));
                }
                if members[..i].contains(&id) {
                    return Err(DictError::Inconsistent(format!(
                        "{} appears twice in group {}",
                        node.stem, group
                    )));
                }
            }
        }

        for id in self.tree.in_order() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            for (i, &group) in node.groups.iter().enumerate() {
                if !self.groups.contains(group, id).unwrap_or(false) {
                    return Err(DictError::Inconsistent(format!(
                        "{} records group {} but is not a member",
                        node.stem, group
                    )));
                }
                if node.groups[..i].contains(&group) {
                    return Err(DictError::Inconsistent(format!(
                        "{} records group {} twice",
                        node.stem, group
                    )));
                }
            }
        }

        Ok(())
    }
}
