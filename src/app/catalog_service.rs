//! The catalog data service: products and categories kept as documents.

use crate::domain::model::{
    CatalogProduct, CatalogProductView, Category, NewCatalogProduct, NewCategory,
};
use crate::domain::{ServiceError, ServiceResult};
use crate::storage::document::{Collection, DocumentStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn DocumentStore>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub async fn create_product(&self, input: NewCatalogProduct) -> ServiceResult<CatalogProduct> {
        let product = input.into_document(Uuid::new_v4());
        self.store
            .insert(Collection::Products, product.id, encode(&product)?)
            .await?;
        Ok(product)
    }

    /// Every product, each with its category ids replaced by the full category records.
    /// Ids that point at no category are dropped from that product's list.
    pub async fn list_products(&self) -> ServiceResult<Vec<CatalogProductView>> {
        let products: Vec<CatalogProduct> = self
            .store
            .list(Collection::Products)
            .await?
            .into_iter()
            .map(decode)
            .collect::<ServiceResult<_>>()?;

        let wanted: Vec<Uuid> = products
            .iter()
            .flat_map(|p| p.categories.iter().copied())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        let categories: HashMap<Uuid, Category> = self
            .store
            .get_many(Collection::Categories, &wanted)
            .await?
            .into_iter()
            .map(decode::<Category>)
            .map(|c| c.map(|c| (c.id, c)))
            .collect::<ServiceResult<_>>()?;

        Ok(products
            .into_iter()
            .map(|p| CatalogProductView {
                categories: p
                    .categories
                    .iter()
                    .filter_map(|id| categories.get(id).cloned())
                    .collect(),
                id: p.id,
                name: p.name,
                description: p.description,
                price: p.price,
            })
            .collect())
    }

    pub async fn get_product(&self, id: Uuid) -> ServiceResult<CatalogProduct> {
        match self.store.get(Collection::Products, id).await? {
            Some(doc) => decode(doc),
            None => Err(ServiceError::NotFound("product")),
        }
    }

    pub async fn delete_product(&self, id: Uuid) -> ServiceResult<CatalogProduct> {
        match self.store.delete(Collection::Products, id).await? {
            Some(doc) => decode(doc),
            None => Err(ServiceError::NotFound("product")),
        }
    }

    pub async fn create_category(&self, input: NewCategory) -> ServiceResult<Category> {
        let category = input.into_document(Uuid::new_v4());
        self.store
            .insert(Collection::Categories, category.id, encode(&category)?)
            .await?;
        Ok(category)
    }

    pub async fn list_categories(&self) -> ServiceResult<Vec<Category>> {
        self.store
            .list(Collection::Categories)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    pub async fn get_category(&self, id: Uuid) -> ServiceResult<Category> {
        match self.store.get(Collection::Categories, id).await? {
            Some(doc) => decode(doc),
            None => Err(ServiceError::NotFound("category")),
        }
    }

    /// Products that reference the category keep the (now dangling) id.
    pub async fn delete_category(&self, id: Uuid) -> ServiceResult<Category> {
        match self.store.delete(Collection::Categories, id).await? {
            Some(doc) => decode(doc),
            None => Err(ServiceError::NotFound("category")),
        }
    }
}

fn encode<T: Serialize>(value: &T) -> ServiceResult<JsonValue> {
    serde_json::to_value(value).map_err(|e| ServiceError::Datastore(e.into()))
}

// A stored document that no longer matches its type is a datastore fault, not a client one.
fn decode<T: DeserializeOwned>(doc: JsonValue) -> ServiceResult<T> {
    serde_json::from_value(doc)
        .map_err(|e| ServiceError::Datastore(anyhow::anyhow!("corrupt document: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::document::MemoryDocumentStore;
    use rust_decimal::Decimal;

    fn service() -> CatalogService {
        CatalogService::new(Arc::new(MemoryDocumentStore::new()))
    }

    async fn category(service: &CatalogService, name: &str) -> Category {
        service
            .create_category(NewCategory { name: name.to_string() })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn listing_joins_categories_in_product_order() {
        let service = service();
        let tools = category(&service, "Tools").await;
        let garden = category(&service, "Garden").await;
        let dangling = Uuid::new_v4();

        service
            .create_product(NewCatalogProduct {
                name: "Rake".to_string(),
                description: "Leaf rake".to_string(),
                price: Decimal::new(1250, 2),
                categories: vec![garden.id, dangling, tools.id],
            })
            .await
            .unwrap();

        let listed = service.list_products().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].categories, vec![garden, tools]);
    }

    #[tokio::test]
    async fn deleting_a_category_leaves_products_untouched() {
        let service = service();
        let tools = category(&service, "Tools").await;
        let product = service
            .create_product(NewCatalogProduct {
                name: "Hammer".to_string(),
                description: "Claw hammer".to_string(),
                price: Decimal::new(999, 2),
                categories: vec![tools.id],
            })
            .await
            .unwrap();

        assert_eq!(service.delete_category(tools.id).await.unwrap(), tools);
        assert_eq!(service.get_product(product.id).await.unwrap().categories, vec![tools.id]);
        assert!(service.list_products().await.unwrap()[0].categories.is_empty());
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let service = service();
        let id = Uuid::new_v4();
        assert!(matches!(
            service.get_product(id).await,
            Err(ServiceError::NotFound("product"))
        ));
        assert!(matches!(
            service.delete_category(id).await,
            Err(ServiceError::NotFound("category"))
        ));
    }
}
