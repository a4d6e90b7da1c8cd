//! In-memory view of the parent-child statistic edge set.
//!
//! The graph is a flat edge arena with a natural-key index and per-node
//! adjacency lists, not stat objects holding child references. That keeps
//! the structure serializable, avoids reference cycles, and makes the
//! DFS-based cycle and orphan checks straightforward.

use std::collections::{HashMap, HashSet};

use chrono::Utc;

use super::relationships_errors::RelationshipError;
use super::relationships_model::{relation_key, Relation};

/// Result of an orphan-cascade analysis rooted at one statistic.
#[derive(Debug, Clone, Default)]
pub struct OrphanCascade {
    /// Statistics that would have no remaining parent and must be deleted.
    /// Always contains the root.
    pub to_delete: Vec<String>,
    /// Edges whose child survives through another parent; only the edge is
    /// removed.
    pub to_unlink: Vec<Relation>,
}

/// Flat, independently-addressable edge list over statistic ids.
#[derive(Debug, Default)]
pub struct RelationshipGraph {
    edges: Vec<Relation>,
    by_key: HashMap<String, usize>,
    outgoing: HashMap<String, Vec<usize>>,
    incoming: HashMap<String, Vec<usize>>,
}

impl RelationshipGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from stored relations. Duplicate keys collapse to the
    /// first occurrence; pre-existing cycles are tolerated (the traversals
    /// carry visited sets) but never extended.
    pub fn from_relations(relations: Vec<Relation>) -> Self {
        let mut graph = Self::new();
        for relation in relations {
            graph.insert_unchecked(relation);
        }
        graph
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Live edges in insertion order. Slots whose edge was removed are
    /// skipped.
    pub fn edges(&self) -> Vec<&Relation> {
        let mut indices: Vec<usize> = self.by_key.values().copied().collect();
        indices.sort_unstable();
        indices.into_iter().map(|i| &self.edges[i]).collect()
    }

    pub fn get(&self, natural_key: &str) -> Option<&Relation> {
        self.by_key.get(natural_key).map(|&i| &self.edges[i])
    }

    pub fn contains_key(&self, natural_key: &str) -> bool {
        self.by_key.contains_key(natural_key)
    }

    /// Outgoing edges of `parent_id`, in insertion order.
    pub fn children_of(&self, parent_id: &str) -> Vec<&Relation> {
        self.outgoing
            .get(parent_id)
            .map(|indices| indices.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    /// Incoming edges of `child_id`, in insertion order.
    pub fn parents_of(&self, child_id: &str) -> Vec<&Relation> {
        self.incoming
            .get(child_id)
            .map(|indices| indices.iter().map(|&i| &self.edges[i]).collect())
            .unwrap_or_default()
    }

    /// Every edge that names `stat_id` as parent or child.
    pub fn edges_touching(&self, stat_id: &str) -> Vec<&Relation> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();
        for indices in [self.outgoing.get(stat_id), self.incoming.get(stat_id)]
            .into_iter()
            .flatten()
        {
            for &i in indices {
                if seen.insert(i) {
                    result.push(&self.edges[i]);
                }
            }
        }
        result
    }

    /// Add a parent→child edge.
    ///
    /// Fails with [`RelationshipError::Cycle`] when `child_id` is already an
    /// ancestor of `parent_id`. A natural-key collision with an existing
    /// edge is an idempotent no-op; the stored edge wins and `false` is
    /// returned.
    pub fn add_edge(
        &mut self,
        parent_id: &str,
        child_id: &str,
        attribute: Option<&str>,
        sort_order: i32,
    ) -> Result<bool, RelationshipError> {
        let key = relation_key(parent_id, child_id, attribute);
        if self.by_key.contains_key(&key) {
            return Ok(false);
        }
        if parent_id == child_id || self.has_descendant(child_id, parent_id) {
            return Err(RelationshipError::Cycle {
                parent_id: parent_id.to_string(),
                child_id: child_id.to_string(),
            });
        }

        self.insert_unchecked(Relation::new(
            parent_id,
            child_id,
            attribute.map(str::to_string),
            sort_order,
        ));
        Ok(true)
    }

    /// True iff `target_id` is reachable from `ancestor_id` over outgoing
    /// edges. The visited set tolerates malformed pre-existing cycles.
    pub fn has_descendant(&self, ancestor_id: &str, target_id: &str) -> bool {
        let mut visited = HashSet::new();
        let mut stack = vec![ancestor_id];
        while let Some(node) = stack.pop() {
            if !visited.insert(node) {
                continue;
            }
            for edge in self.children_of(node) {
                if edge.child_id == target_id {
                    return true;
                }
                stack.push(edge.child_id.as_str());
            }
        }
        false
    }

    /// Determine which descendants of `root_id` would be left without a
    /// parent if `root_id` were deleted.
    ///
    /// A visited node joins `to_delete`. For each of its outgoing edges, the
    /// child either keeps a parent outside `to_delete` (edge goes to
    /// `to_unlink`, child survives) or is absorbed recursively.
    pub fn collect_orphaned_descendants(&self, root_id: &str) -> OrphanCascade {
        let mut cascade = OrphanCascade::default();
        let mut deleted = HashSet::new();
        self.collect_orphans_inner(root_id, &mut deleted, &mut cascade);
        // A child spared early in the walk can lose its last surviving
        // parent to a later absorption (diamond shapes). Its edges are then
        // part of the deletion, not unlinks.
        cascade
            .to_unlink
            .retain(|edge| !deleted.contains(edge.child_id.as_str()));
        cascade
    }

    fn collect_orphans_inner(
        &self,
        node: &str,
        deleted: &mut HashSet<String>,
        cascade: &mut OrphanCascade,
    ) {
        if !deleted.insert(node.to_string()) {
            return;
        }
        cascade.to_delete.push(node.to_string());

        for edge in self.children_of(node) {
            let child = edge.child_id.as_str();
            if deleted.contains(child) {
                continue;
            }
            let has_surviving_parent = self
                .parents_of(child)
                .iter()
                .any(|parent_edge| !deleted.contains(parent_edge.parent_id.as_str()));
            if has_surviving_parent {
                cascade.to_unlink.push(edge.clone());
            } else {
                self.collect_orphans_inner(child, deleted, cascade);
            }
        }
    }

    /// Rewrite every edge under `parent_id` carrying `old_attribute` to
    /// `new_attribute`, all-or-nothing.
    ///
    /// Fails with [`RelationshipError::Conflict`] listing the colliding
    /// children when any rewritten key already exists outside the set being
    /// renamed. On success returns the rewritten relations (old key order
    /// preserved) for persistence.
    pub fn rename_attribute(
        &mut self,
        parent_id: &str,
        old_attribute: &str,
        new_attribute: &str,
    ) -> Result<Vec<Relation>, RelationshipError> {
        let rename_set: Vec<usize> = self
            .outgoing
            .get(parent_id)
            .map(|indices| {
                indices
                    .iter()
                    .copied()
                    .filter(|&i| self.edges[i].attribute_or_sentinel() == old_attribute)
                    .collect()
            })
            .unwrap_or_default();

        let old_keys: HashSet<String> = rename_set
            .iter()
            .map(|&i| self.edges[i].natural_key())
            .collect();

        let colliding_children: Vec<String> = rename_set
            .iter()
            .filter_map(|&i| {
                let edge = &self.edges[i];
                let new_key = relation_key(parent_id, &edge.child_id, Some(new_attribute));
                if self.by_key.contains_key(&new_key) && !old_keys.contains(&new_key) {
                    Some(edge.child_id.clone())
                } else {
                    None
                }
            })
            .collect();

        if !colliding_children.is_empty() {
            return Err(RelationshipError::Conflict {
                old_attribute: old_attribute.to_string(),
                new_attribute: new_attribute.to_string(),
                colliding_children,
            });
        }

        let now = Utc::now();
        let mut renamed = Vec::with_capacity(rename_set.len());
        for &i in &rename_set {
            let old_key = self.edges[i].natural_key();
            self.by_key.remove(&old_key);

            let edge = &mut self.edges[i];
            edge.attribute = Some(new_attribute.to_string());
            edge.updated_at = now;

            self.by_key.insert(edge.natural_key(), i);
            renamed.push(edge.clone());
        }
        Ok(renamed)
    }

    /// Remove an edge by natural key. Returns the removed relation, if any.
    pub fn remove_edge(&mut self, natural_key: &str) -> Option<Relation> {
        let index = self.by_key.remove(natural_key)?;
        let removed = self.edges[index].clone();

        if let Some(indices) = self.outgoing.get_mut(&removed.parent_id) {
            indices.retain(|&i| i != index);
        }
        if let Some(indices) = self.incoming.get_mut(&removed.child_id) {
            indices.retain(|&i| i != index);
        }
        // Arena slot stays allocated; adjacency and key indexes no longer
        // reference it.
        Some(removed)
    }

    fn insert_unchecked(&mut self, relation: Relation) {
        let key = relation.natural_key();
        if self.by_key.contains_key(&key) {
            return;
        }
        let index = self.edges.len();
        self.outgoing
            .entry(relation.parent_id.clone())
            .or_default()
            .push(index);
        self.incoming
            .entry(relation.child_id.clone())
            .or_default()
            .push(index);
        self.by_key.insert(key, index);
        self.edges.push(relation);
    }
}
