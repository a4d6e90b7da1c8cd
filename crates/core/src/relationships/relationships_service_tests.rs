#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::errors::Error;
    use crate::relationships::{
        Relation, RelationshipError, RelationshipService, RelationshipServiceTrait,
    };
    use crate::store::TransactionBatcher;
    use crate::test_support::MemoryStore;

    fn service(store: &Arc<MemoryStore>) -> RelationshipService {
        RelationshipService::new(store.clone(), Arc::new(TransactionBatcher::new(store.clone())))
    }

    #[tokio::test]
    async fn test_link_persists_new_edge() {
        let store = Arc::new(MemoryStore::new());
        let service = service(&store);

        let relation = service
            .link("parent", "child", Some("percent"), 0)
            .await
            .unwrap()
            .expect("new edge should be returned");

        assert_eq!(relation.natural_key(), "parent::child::percent");
        assert!(store
            .relations
            .lock()
            .unwrap()
            .contains_key("parent::child::percent"));
    }

    #[tokio::test]
    async fn test_link_existing_key_is_noop_without_write() {
        let store = Arc::new(MemoryStore::new());
        store.insert_relation(Relation::new("parent", "child", None, 0));
        let service = service(&store);

        let result = service.link("parent", "child", None, 5).await.unwrap();

        assert!(result.is_none());
        assert!(store.batch_sizes.lock().unwrap().is_empty());
        // The stored edge keeps its original sort order.
        assert_eq!(
            store.relations.lock().unwrap()["parent::child::undefined"].sort_order,
            0
        );
    }

    #[tokio::test]
    async fn test_link_rejects_cycle_before_any_write() {
        let store = Arc::new(MemoryStore::new());
        store.insert_relation(Relation::new("a", "b", None, 0));
        store.insert_relation(Relation::new("b", "c", None, 0));
        let service = service(&store);

        match service.link("c", "a", None, 0).await {
            Err(Error::Relationship(RelationshipError::Cycle { .. })) => {}
            other => panic!("expected cycle rejection, got {other:?}"),
        }
        assert_eq!(store.relations.lock().unwrap().len(), 2);
        assert!(store.batch_sizes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unlink_removes_edge_and_returns_it() {
        let store = Arc::new(MemoryStore::new());
        store.insert_relation(Relation::new("a", "b", None, 0));
        let service = service(&store);

        let removed = service.unlink("a::b::undefined").await.unwrap();
        assert_eq!(removed.unwrap().child_id, "b");
        assert!(store.relations.lock().unwrap().is_empty());

        assert!(service.unlink("a::b::undefined").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_rename_attribute_replaces_old_keys_in_store() {
        let store = Arc::new(MemoryStore::new());
        store.insert_relation(Relation::new("p", "c1", Some("old".to_string()), 0));
        store.insert_relation(Relation::new("p", "c2", Some("old".to_string()), 1));
        store.insert_relation(Relation::new("p", "c3", Some("other".to_string()), 2));
        let service = service(&store);

        let renamed = service.rename_attribute("p", "old", "new").await.unwrap();
        assert_eq!(renamed.len(), 2);

        let relations = store.relations.lock().unwrap();
        assert!(relations.contains_key("p::c1::new"));
        assert!(relations.contains_key("p::c2::new"));
        // The old records are deleted in the same batch, not left behind.
        assert!(!relations.contains_key("p::c1::old"));
        assert!(!relations.contains_key("p::c2::old"));
        assert!(relations.contains_key("p::c3::other"));
    }

    #[tokio::test]
    async fn test_rename_attribute_conflict_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        store.insert_relation(Relation::new("p", "c1", Some("old".to_string()), 0));
        store.insert_relation(Relation::new("p", "c1", Some("new".to_string()), 1));
        let service = service(&store);

        assert!(service.rename_attribute("p", "old", "new").await.is_err());
        let relations = store.relations.lock().unwrap();
        assert!(relations.contains_key("p::c1::old"));
        assert!(relations.contains_key("p::c1::new"));
        assert!(store.batch_sizes.lock().unwrap().is_empty());
    }
}
