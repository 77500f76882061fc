//! Synonym group table.
//!
//! A group is an insertion-ordered, set-like list of node handles into the
//! stem tree. Membership is mirrored on the nodes (`StemNode::groups`) and
//! every mutation here updates both sides. Groups are never removed, so a
//! `GroupId` stays valid for the life of the table even once the group empties.

use crate::models::{GroupId, NodeId};
use crate::tree::StemTree;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    #[error("Invalid synonym group: {0}")]
    InvalidGroup(GroupId),
    #[error("{stem} is already in synonym group {group}")]
    AlreadyMember { stem: String, group: GroupId },
    #[error("{stem} is not in synonym group {group}")]
    NotInGroup { stem: String, group: GroupId },
}

#[derive(Debug, Clone, Default)]
pub struct SynonymGroupTable {
    groups: Vec<Vec<NodeId>>,
}

impl SynonymGroupTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of groups ever created (emptied groups included)
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn is_valid(&self, group: GroupId) -> bool {
        group.0 < self.groups.len()
    }

    pub fn members(&self, group: GroupId) -> Result<&[NodeId], GroupError> {
        self.groups
            .get(group.0)
            .map(Vec::as_slice)
            .ok_or(GroupError::InvalidGroup(group))
    }

    pub fn contains(&self, group: GroupId, node: NodeId) -> Result<bool, GroupError> {
        Ok(self.members(group)?.contains(&node))
    }

    /// Iterate over all groups with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &[NodeId])> {
        self.groups
            .iter()
            .enumerate()
            .map(|(i, members)| (GroupId(i), members.as_slice()))
    }

    /// Append a new group holding `a` and `b`.
    pub fn create_group(&mut self, tree: &mut StemTree, a: NodeId, b: NodeId) -> GroupId {
        let group = GroupId(self.groups.len());
        let members = if a == b { vec![a] } else { vec![a, b] };
        self.groups.push(members);

        record_membership(tree, a, group);
        record_membership(tree, b, group);

        debug!(group = group.0, a = ?tree.stem(a), b = ?tree.stem(b), "created synonym group");
        group
    }

    pub fn add_to_group(
        &mut self,
        tree: &mut StemTree,
        group: GroupId,
        node: NodeId,
    ) -> Result<(), GroupError> {
        let members = self
            .groups
            .get_mut(group.0)
            .ok_or(GroupError::InvalidGroup(group))?;

        if members.contains(&node) {
            return Err(GroupError::AlreadyMember {
                stem: stem_name(tree, node),
                group,
            });
        }

        members.push(node);
        record_membership(tree, node, group);
        Ok(())
    }

    pub fn remove_from_group(
        &mut self,
        tree: &mut StemTree,
        group: GroupId,
        node: NodeId,
    ) -> Result<(), GroupError> {
        let members = self
            .groups
            .get_mut(group.0)
            .ok_or(GroupError::InvalidGroup(group))?;

        let Some(pos) = members.iter().position(|&m| m == node) else {
            return Err(GroupError::NotInGroup {
                stem: stem_name(tree, node),
                group,
            });
        };

        members.remove(pos);
        if let Some(n) = tree.get_mut(node) {
            n.groups.retain(|&g| g != group);
        }
        Ok(())
    }

    /// Drop `node` from every group it belongs to.
    /// Returns the groups it was removed from.
    pub fn purge(&mut self, tree: &mut StemTree, node: NodeId) -> Vec<GroupId> {
        let memberships = tree
            .get_mut(node)
            .map(|n| std::mem::take(&mut n.groups))
            .unwrap_or_default();

        for group in &memberships {
            if let Some(members) = self.groups.get_mut(group.0) {
                members.retain(|&m| m != node);
            }
        }
        memberships
    }
}

fn record_membership(tree: &mut StemTree, node: NodeId, group: GroupId) {
    if let Some(n) = tree.get_mut(node) {
        if !n.groups.contains(&group) {
            n.groups.push(group);
        }
    }
}

fn stem_name(tree: &StemTree, node: NodeId) -> String {
    tree.stem(node).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(stems: &[&str]) -> (StemTree, Vec<NodeId>) {
        let mut tree = StemTree::new();
        let ids = stems.iter().map(|s| tree.insert(s).unwrap()).collect();
        (tree, ids)
    }

    #[test]
    fn test_create_group_records_both_sides() {
        let (mut tree, ids) = setup(&["happy", "glad"]);
        let mut table = SynonymGroupTable::new();

        let group = table.create_group(&mut tree, ids[0], ids[1]);
        assert_eq!(group, GroupId(0));
        assert_eq!(table.members(group).unwrap(), &[ids[0], ids[1]]);
        assert_eq!(tree.get(ids[0]).unwrap().groups, vec![group]);
        assert_eq!(tree.get(ids[1]).unwrap().groups, vec![group]);
    }

    #[test]
    fn test_add_to_group() {
        let (mut tree, ids) = setup(&["happy", "glad", "joyful"]);
        let mut table = SynonymGroupTable::new();
        let group = table.create_group(&mut tree, ids[0], ids[1]);

        table.add_to_group(&mut tree, group, ids[2]).unwrap();
        assert_eq!(table.members(group).unwrap().len(), 3);
        assert!(tree.get(ids[2]).unwrap().is_member_of(group));

        assert_eq!(
            table.add_to_group(&mut tree, group, ids[2]),
            Err(GroupError::AlreadyMember {
                stem: "joyful".to_string(),
                group
            })
        );
        assert_eq!(
            table.add_to_group(&mut tree, GroupId(7), ids[2]),
            Err(GroupError::InvalidGroup(GroupId(7)))
        );
    }

    #[test]
    fn test_remove_from_group() {
        let (mut tree, ids) = setup(&["happy", "glad", "sad"]);
        let mut table = SynonymGroupTable::new();
        let group = table.create_group(&mut tree, ids[0], ids[1]);

        table.remove_from_group(&mut tree, group, ids[1]).unwrap();
        assert_eq!(table.members(group).unwrap(), &[ids[0]]);
        assert!(tree.get(ids[1]).unwrap().groups.is_empty());

        assert!(matches!(
            table.remove_from_group(&mut tree, group, ids[2]),
            Err(GroupError::NotInGroup { .. })
        ));
    }

    #[test]
    fn test_purge_leaves_other_groups_intact() {
        let (mut tree, ids) = setup(&["a", "b", "c"]);
        let mut table = SynonymGroupTable::new();
        let g0 = table.create_group(&mut tree, ids[0], ids[1]);
        let g1 = table.create_group(&mut tree, ids[1], ids[2]);
        let g2 = table.create_group(&mut tree, ids[0], ids[2]);

        let removed = table.purge(&mut tree, ids[1]);
        assert_eq!(removed, vec![g0, g1]);
        assert_eq!(table.members(g0).unwrap(), &[ids[0]]);
        assert_eq!(table.members(g1).unwrap(), &[ids[2]]);
        assert_eq!(table.members(g2).unwrap(), &[ids[0], ids[2]]);
        assert!(tree.get(ids[1]).unwrap().groups.is_empty());

        // Emptied or not, group ids stay valid
        assert_eq!(table.len(), 3);
    }
}
