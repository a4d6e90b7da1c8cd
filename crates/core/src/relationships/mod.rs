//! Relationships module - the parent/child statistic graph.

mod relationships_errors;
mod relationships_graph;
mod relationships_model;
mod relationships_service;
mod relationships_traits;

#[cfg(test)]
mod relationships_service_tests;

pub use relationships_errors::RelationshipError;
pub use relationships_graph::{OrphanCascade, RelationshipGraph};
pub use relationships_model::{relation_key, Relation};
pub use relationships_service::RelationshipService;
pub use relationships_traits::{RelationRepositoryTrait, RelationshipServiceTrait};
