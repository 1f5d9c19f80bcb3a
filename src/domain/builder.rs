//! Tree builder for materializing parent-linked records into an ordered tree.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, warn};

use crate::domain::error::DomainError;
use crate::domain::tree::{Hierarchical, TreeNode};

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, DomainError>;

/// Constructs a tree under a synthetic root from a flat record snapshot.
///
/// Siblings are ordered by sort key; records with equal keys keep their
/// input order. A record whose parent is not in the snapshot is placed at
/// the top level.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    root_label: String,
}

impl TreeBuilder {
    pub fn new(root_label: impl Into<String>) -> Self {
        Self {
            root_label: root_label.into(),
        }
    }

    pub fn root_label(&self) -> &str {
        &self.root_label
    }

    #[instrument(level = "debug", skip(self, records), fields(count = records.len()))]
    pub fn build<T>(&self, records: &[T]) -> TreeResult<TreeNode<T>>
    where
        T: Hierarchical + Clone,
    {
        let index = index_ids(records)?;

        // Group by effective parent, None being the synthetic root
        let mut relationship_cache: HashMap<Option<&str>, Vec<usize>> = HashMap::new();
        for (i, record) in records.iter().enumerate() {
            let parent = match effective_parent(record) {
                Some(p) if index.contains_key(p) => Some(p),
                Some(p) => {
                    debug!("orphan {} -> missing parent {}, placing at top level", record.id(), p);
                    None
                }
                None => None,
            };
            relationship_cache.entry(parent).or_default().push(i);
        }
        for siblings in relationship_cache.values_mut() {
            siblings.sort_by(|&a, &b| records[a].sort_key().cmp(records[b].sort_key()));
        }

        let mut walk = Walk {
            records,
            relationship_cache: &relationship_cache,
            placed: vec![false; records.len()],
        };
        let root = walk.attach(TreeNode::root(self.root_label.clone()))?;

        // Records never reached hang off a parent loop
        if let Some(start) = walk.placed.iter().position(|placed| !placed) {
            let id = find_cycle(records, &index, start);
            warn!("records unreachable from root, cycle at {}", id);
            return Err(DomainError::CyclicHierarchy { id });
        }

        debug!("built tree: {} records, depth {}", records.len(), root.depth());
        Ok(root)
    }
}

/// Build a tree under a synthetic root labelled `virtual_root_label`.
pub fn build_tree<T>(records: &[T], virtual_root_label: &str) -> TreeResult<TreeNode<T>>
where
    T: Hierarchical + Clone,
{
    TreeBuilder::new(virtual_root_label).build(records)
}

/// Reject moving `id` under `new_parent` when that would make it its own
/// ancestor.
#[instrument(level = "debug", skip(records))]
pub fn validate_reparent<T: Hierarchical>(
    records: &[T],
    id: &str,
    new_parent: Option<&str>,
) -> TreeResult<()> {
    let index = index_ids(records)?;
    let mut visited_ids: HashSet<&str> = HashSet::new();
    let mut current = new_parent.filter(|p| !p.is_empty());

    while let Some(ancestor) = current {
        if ancestor == id {
            return Err(DomainError::CyclicHierarchy { id: id.to_string() });
        }
        if !visited_ids.insert(ancestor) {
            return Err(DomainError::CyclicHierarchy {
                id: ancestor.to_string(),
            });
        }
        current = index
            .get(ancestor)
            .and_then(|&i| effective_parent(&records[i]));
    }
    Ok(())
}

struct Walk<'a, T> {
    records: &'a [T],
    relationship_cache: &'a HashMap<Option<&'a str>, Vec<usize>>,
    placed: Vec<bool>,
}

/// Node under construction and the sibling-ordered children still to visit.
struct Frame<'a, T> {
    node: TreeNode<T>,
    id: Option<&'a str>,
    pending: std::slice::Iter<'a, usize>,
}

impl<'a, T: Hierarchical + Clone> Walk<'a, T> {
    fn children_of(&self, parent: Option<&'a str>) -> std::slice::Iter<'a, usize> {
        let cache = self.relationship_cache;
        cache.get(&parent).map(|c| c.iter()).unwrap_or_default()
    }

    /// Depth-first attach with an explicit stack; a node joins its parent
    /// once all of its own children are attached.
    fn attach(&mut self, root: TreeNode<T>) -> TreeResult<TreeNode<T>> {
        let records = self.records;
        // ids of the ancestors of the node being attached
        let mut path: HashSet<&'a str> = HashSet::new();
        let mut stack = vec![Frame {
            node: root,
            id: None,
            pending: self.children_of(None),
        }];

        while let Some(frame) = stack.last_mut() {
            if let Some(&i) = frame.pending.next() {
                let record = &records[i];
                let id = record.id();
                if !path.insert(id) {
                    return Err(DomainError::CyclicHierarchy { id: id.to_string() });
                }
                self.placed[i] = true;
                let pending = self.children_of(Some(id));
                stack.push(Frame {
                    node: TreeNode::leaf(record.clone()),
                    id: Some(id),
                    pending,
                });
                continue;
            }

            let Some(done) = stack.pop() else { break };
            if let Some(id) = done.id {
                path.remove(id);
            }
            match stack.last_mut() {
                Some(parent) => parent.node.children.push(done.node),
                None => return Ok(done.node),
            }
        }
        unreachable!("the root frame is returned before the stack empties")
    }
}

fn effective_parent<T: Hierarchical>(record: &T) -> Option<&str> {
    record.parent_id().filter(|p| !p.is_empty())
}

fn index_ids<T: Hierarchical>(records: &[T]) -> TreeResult<HashMap<&str, usize>> {
    let mut index = HashMap::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        if index.insert(record.id(), i).is_some() {
            return Err(DomainError::DuplicateId {
                id: record.id().to_string(),
            });
        }
    }
    Ok(index)
}

/// Follow parents from `start` until an id repeats; that id lies on the loop.
fn find_cycle<T: Hierarchical>(records: &[T], index: &HashMap<&str, usize>, start: usize) -> String {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut current = Some(start);

    while let Some(i) = current {
        let id = records[i].id();
        if !seen.insert(id) {
            return id.to_string();
        }
        current = effective_parent(&records[i]).and_then(|p| index.get(p).copied());
    }
    // Unreachable for an unplaced record; report the start as a fallback
    records[start].id().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::HierarchicalRecord;

    fn rec(id: &str, parent: Option<&str>, sort: i64) -> HierarchicalRecord {
        HierarchicalRecord::new(id, parent, sort, id)
    }

    #[test]
    fn given_two_node_loop_when_finding_cycle_then_reports_loop_member() {
        let records = vec![rec("A", Some("B"), 0), rec("B", Some("A"), 0)];
        let index = index_ids(&records).unwrap();
        assert_eq!(find_cycle(&records, &index, 0), "A");
    }

    #[test]
    fn given_tail_into_loop_when_finding_cycle_then_skips_tail() {
        let records = vec![
            rec("D", Some("A"), 0),
            rec("A", Some("B"), 0),
            rec("B", Some("A"), 0),
        ];
        let index = index_ids(&records).unwrap();
        assert_eq!(find_cycle(&records, &index, 0), "A");
    }

    #[test]
    fn given_empty_parent_string_when_resolving_then_top_level() {
        let record = rec("A", Some(""), 0);
        assert_eq!(effective_parent(&record), None);
    }
}
