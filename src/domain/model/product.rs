use crate::domain::schema::{positive_amount, Schema};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// A product row in the relational store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Free-form description.
    pub about: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewProduct {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub about: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "positive_amount"))]
    pub price: Decimal,
}

impl Schema for NewProduct {
    const REQUIRED: &'static [&'static str] = &["name", "about", "price"];
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct ProductPatch {
    #[serde(default)]
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: Option<String>,
    #[serde(default)]
    pub about: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom(function = "positive_amount"))]
    pub price: Option<Decimal>,
}

impl Schema for ProductPatch {
    const REQUIRED: &'static [&'static str] = &[];
}

/// Optional equality filters for `GET /products`. Present filters are AND-ed.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub about: Option<String>,
    pub price: Option<Decimal>,
}

/// A product document in the catalog (document store).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Category ids; not checked against the categories collection.
    #[serde(default)]
    pub categories: Vec<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCatalogProduct {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom(function = "positive_amount"))]
    pub price: Decimal,
    pub categories: Vec<Uuid>,
}

impl Schema for NewCatalogProduct {
    const REQUIRED: &'static [&'static str] = &["name", "description", "price", "categories"];
}

impl NewCatalogProduct {
    pub fn into_document(self, id: Uuid) -> CatalogProduct {
        CatalogProduct {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            categories: self.categories,
        }
    }
}

/// A catalog product with its category ids replaced by the category records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogProductView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub categories: Vec<super::Category>,
}
