//! Owned tree produced from a flat, parent-linked collection.

use std::collections::BTreeMap;
use std::fmt;

use termtree::Tree;

use crate::domain::entities::HierarchicalRecord;

/// Capabilities the tree builder needs from a record.
pub trait Hierarchical {
    type SortKey: Ord;

    fn id(&self) -> &str;

    /// Parent id; `None` or an empty string means top level.
    fn parent_id(&self) -> Option<&str>;

    fn sort_key(&self) -> &Self::SortKey;

    /// Display text, passed through untouched.
    fn label(&self) -> &str;
}

impl Hierarchical for HierarchicalRecord {
    type SortKey = i64;

    fn id(&self) -> &str {
        &self.id
    }

    fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    fn sort_key(&self) -> &i64 {
        &self.sort_key
    }

    fn label(&self) -> &str {
        &self.label
    }
}

/// Payload of a tree node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData<T> {
    /// Synthetic "no parent" placeholder; never persisted
    Root { label: String },
    Record(T),
}

impl<T: Hierarchical> NodeData<T> {
    pub fn label(&self) -> &str {
        match self {
            NodeData::Root { label } => label,
            NodeData::Record(r) => r.label(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            NodeData::Root { .. } => None,
            NodeData::Record(r) => Some(r.id()),
        }
    }

    pub fn record(&self) -> Option<&T> {
        match self {
            NodeData::Root { .. } => None,
            NodeData::Record(r) => Some(r),
        }
    }
}

impl<T: Hierarchical> fmt::Display for NodeData<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Node owning its children in sibling order.
///
/// Clone, equality and drop walk the tree with an explicit stack, so deep
/// chains do not exhaust the call stack.
#[derive(Debug)]
pub struct TreeNode<T> {
    pub data: NodeData<T>,
    pub children: Vec<TreeNode<T>>,
}

impl<T> TreeNode<T> {
    /// Post-order fold: `f` receives each node with the folded values of its
    /// children, left to right.
    pub fn fold<B>(&self, mut f: impl FnMut(&TreeNode<T>, Vec<B>) -> B) -> B {
        let mut stack: Vec<(&TreeNode<T>, Vec<B>)> = vec![(self, Vec::new())];
        while let Some((node, folded)) = stack.pop() {
            if let Some(child) = node.children.get(folded.len()) {
                stack.push((node, folded));
                stack.push((child, Vec::new()));
                continue;
            }
            let value = f(node, folded);
            match stack.last_mut() {
                Some((_, siblings)) => siblings.push(value),
                None => return value,
            }
        }
        unreachable!("the root is folded before the stack empties")
    }
}

impl<T: Clone> Clone for TreeNode<T> {
    fn clone(&self) -> Self {
        self.fold(|node, children| TreeNode {
            data: node.data.clone(),
            children,
        })
    }
}

impl<T: PartialEq> PartialEq for TreeNode<T> {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.data != b.data || a.children.len() != b.children.len() {
                return false;
            }
            stack.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl<T: Eq> Eq for TreeNode<T> {}

impl<T> Drop for TreeNode<T> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl<T: Hierarchical> TreeNode<T> {
    pub fn root(label: impl Into<String>) -> Self {
        Self {
            data: NodeData::Root {
                label: label.into(),
            },
            children: Vec::new(),
        }
    }

    pub fn leaf(record: T) -> Self {
        Self {
            data: NodeData::Record(record),
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels, counting this node.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children.iter().map(|c| (c, level + 1)));
        }
        deepest
    }

    /// Number of record nodes below and including this one; the synthetic
    /// root is not counted.
    pub fn len(&self) -> usize {
        self.iter().filter(|n| n.data.record().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record nodes without children, left to right.
    pub fn leaves(&self) -> Vec<&T> {
        self.iter()
            .filter(|n| n.is_leaf())
            .filter_map(|n| n.data.record())
            .collect()
    }

    pub fn find(&self, id: &str) -> Option<&TreeNode<T>> {
        self.iter().find(|n| n.data.id() == Some(id))
    }

    /// Ids of every record strictly below the node `id`, in pre-order.
    pub fn descendant_ids(&self, id: &str) -> Vec<String> {
        self.find(id)
            .map(|node| {
                node.iter()
                    .skip(1)
                    .filter_map(|n| n.data.id().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Full label path of every record, e.g. `School/ALBUM/Teaching`.
    ///
    /// The synthetic root does not contribute a segment.
    pub fn materialized_paths(&self, separator: &str) -> BTreeMap<String, String> {
        let mut paths = BTreeMap::new();
        let mut stack: Vec<(&TreeNode<T>, String)> = vec![(self, String::new())];

        while let Some((node, prefix)) = stack.pop() {
            let current = match &node.data {
                NodeData::Root { .. } => prefix,
                NodeData::Record(r) => {
                    let path = if prefix.is_empty() {
                        r.label().to_string()
                    } else {
                        format!("{}{}{}", prefix, separator, r.label())
                    };
                    paths.insert(r.id().to_string(), path.clone());
                    path
                }
            };
            for child in node.children.iter().rev() {
                stack.push((child, current.clone()));
            }
        }
        paths
    }

    /// Pre-order traversal, siblings left to right.
    pub fn iter(&self) -> TreeIterator<'_, T> {
        TreeIterator { stack: vec![self] }
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_, T> {
        PostOrderIterator {
            stack: vec![(self, false)],
        }
    }

    pub fn to_tree_string(&self) -> Tree<String> {
        self.fold(|node, leaves| Tree::new(node.data.label().to_string()).with_leaves(leaves))
    }
}

pub struct TreeIterator<'a, T> {
    stack: Vec<&'a TreeNode<T>>,
}

impl<'a, T> Iterator for TreeIterator<'a, T> {
    type Item = &'a TreeNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

pub struct PostOrderIterator<'a, T> {
    stack: Vec<(&'a TreeNode<T>, bool)>,
}

impl<'a, T> Iterator for PostOrderIterator<'a, T> {
    type Item = &'a TreeNode<T>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, visited)) = self.stack.pop() {
            if visited {
                return Some(node);
            }
            self.stack.push((node, true));
            for child in node.children.iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(id: &str, label: &str) -> HierarchicalRecord {
        HierarchicalRecord::new(id, None, 0, label)
    }

    fn sample() -> TreeNode<HierarchicalRecord> {
        let mut root = TreeNode::root("(root)");
        let mut a = TreeNode::leaf(rec("a", "School"));
        let mut b = TreeNode::leaf(rec("b", "ALBUM"));
        b.children.push(TreeNode::leaf(rec("c", "Teaching")));
        a.children.push(b);
        a.children.push(TreeNode::leaf(rec("d", "Sports")));
        root.children.push(a);
        root.children.push(TreeNode::leaf(rec("e", "Misc")));
        root
    }

    #[test]
    fn given_tree_when_iterating_preorder_then_parents_before_children() {
        let root = sample();
        let ids: Vec<_> = root.iter().filter_map(|n| n.data.id()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn given_tree_when_iterating_postorder_then_children_before_parents() {
        let root = sample();
        let ids: Vec<_> = root.iter_postorder().filter_map(|n| n.data.id()).collect();
        assert_eq!(ids, vec!["c", "b", "d", "a", "e"]);
    }

    #[test]
    fn given_tree_when_querying_shape_then_counts_records_only() {
        let root = sample();
        assert_eq!(root.depth(), 4);
        assert_eq!(root.len(), 5);
        let leaves: Vec<_> = root.leaves().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(leaves, vec!["c", "d", "e"]);
    }

    #[test]
    fn given_tree_when_materializing_paths_then_joins_labels() {
        let paths = sample().materialized_paths("/");
        assert_eq!(paths["c"], "School/ALBUM/Teaching");
        assert_eq!(paths["e"], "Misc");
    }

    #[test]
    fn given_node_when_listing_descendants_then_excludes_node_itself() {
        assert_eq!(sample().descendant_ids("a"), vec!["b", "c", "d"]);
        assert!(sample().descendant_ids("missing").is_empty());
    }

    #[test]
    fn given_tree_when_folding_then_children_arrive_in_order() {
        let labels = sample().fold(|node, children: Vec<String>| {
            if children.is_empty() {
                node.data.label().to_string()
            } else {
                format!("{}({})", node.data.label(), children.join(","))
            }
        });
        assert_eq!(labels, "(root)(School(ALBUM(Teaching),Sports),Misc)");
    }

    #[test]
    fn given_tree_when_cloning_then_equal_but_independent() {
        let original = sample();
        let mut copy = original.clone();
        assert_eq!(copy, original);

        copy.children.pop();
        assert_ne!(copy, original);
    }

    #[test]
    fn given_tree_when_rendering_then_contains_labels() {
        let rendered = sample().to_tree_string().to_string();
        assert!(rendered.starts_with("(root)"));
        assert!(rendered.contains("Teaching"));
    }
}
