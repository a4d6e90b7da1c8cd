//! Error types for relationship graph operations.

use thiserror::Error;

/// Structural errors raised by the relationship graph.
///
/// Both variants are rejected before any write: the graph and the stored
/// edge set are unchanged when one of these is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelationshipError {
    /// Adding the edge would make `child` an ancestor of itself.
    #[error("Linking {parent_id} -> {child_id} would create a cycle")]
    Cycle { parent_id: String, child_id: String },

    /// Renaming an attribute would collide with existing relation keys.
    #[error("Renaming attribute '{old_attribute}' to '{new_attribute}' collides for children: {}", colliding_children.join(", "))]
    Conflict {
        old_attribute: String,
        new_attribute: String,
        colliding_children: Vec<String>,
    },
}
