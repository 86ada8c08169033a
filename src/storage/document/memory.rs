//! In-process document store. Data lives only as long as the process.

use super::{Collection, DocumentStore};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryDocumentStore {
    // Insertion order is kept per collection so listings are stable.
    collections: RwLock<HashMap<Collection, Vec<(Uuid, JsonValue)>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: Collection, id: Uuid, doc: JsonValue) -> Result<()> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection).or_default();
        if docs.iter().any(|(existing, _)| *existing == id) {
            anyhow::bail!("duplicate id {} in collection {}", id, collection.as_str());
        }
        docs.push((id, doc));
        Ok(())
    }

    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<JsonValue>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|docs| docs.iter().find(|(existing, _)| *existing == id))
            .map(|(_, doc)| doc.clone()))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<JsonValue>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| docs.iter().map(|(_, doc)| doc.clone()).collect())
            .unwrap_or_default())
    }

    async fn get_many(&self, collection: Collection, ids: &[Uuid]) -> Result<Vec<JsonValue>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(id, _)| ids.contains(id))
                    .map(|(_, doc)| doc.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<Option<JsonValue>> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(&collection) else {
            return Ok(None);
        };
        Ok(docs
            .iter()
            .position(|(existing, _)| *existing == id)
            .map(|idx| docs.remove(idx).1))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_get_delete() {
        let store = MemoryDocumentStore::new();
        let id = Uuid::new_v4();
        store
            .insert(Collection::Categories, id, json!({"id": id, "name": "Tools"}))
            .await
            .unwrap();

        assert_eq!(
            store.get(Collection::Categories, id).await.unwrap().unwrap()["name"],
            "Tools"
        );
        // Collections are independent.
        assert!(store.get(Collection::Products, id).await.unwrap().is_none());

        let removed = store.delete(Collection::Categories, id).await.unwrap();
        assert_eq!(removed.unwrap()["name"], "Tools");
        assert!(store.delete(Collection::Categories, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_keeps_insertion_order_and_get_many_skips_unknown() {
        let store = MemoryDocumentStore::new();
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for (n, id) in ids.iter().enumerate() {
            store
                .insert(Collection::Products, *id, json!({"n": n}))
                .await
                .unwrap();
        }

        let listed = store.list(Collection::Products).await.unwrap();
        assert_eq!(listed, vec![json!({"n": 0}), json!({"n": 1}), json!({"n": 2})]);

        let some = store
            .get_many(Collection::Products, &[ids[2], Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(some, vec![json!({"n": 2})]);
    }

    #[tokio::test]
    async fn duplicate_ids_are_rejected() {
        let store = MemoryDocumentStore::new();
        let id = Uuid::new_v4();
        store.insert(Collection::Products, id, json!({})).await.unwrap();
        assert!(store.insert(Collection::Products, id, json!({})).await.is_err());
    }
}
