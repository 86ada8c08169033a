//! The relational data service.
//!
//! Owns the PostgreSQL pool behind the store API and exposes one method per
//! (resource, operation). Every method is a single validated statement, except order
//! writes, which read the product price and write the order inside one transaction.

use crate::crypto::password::hash_password;
use crate::domain::model::{
    order_total, NewOrder, NewProduct, NewUser, Order, OrderPatch, Product, ProductFilter,
    ProductPatch, User, UserPatch,
};
use crate::domain::{ServiceError, ServiceResult};
use crate::storage::sql::{insert_returning, select_filtered, update_returning, FieldSet};
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgConnection, PgPool};

const PRODUCT_COLUMNS: &str = "id, name, about, price";
// `password` is never selected: hashes stay in the database.
const USER_COLUMNS: &str = "id, name, email";
const ORDER_COLUMNS: &str = "id, user_id, product_id, quantity, total, created_at, updated_at";

const CREATE_TABLES: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS products (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        about TEXT NOT NULL,
        price NUMERIC NOT NULL CHECK (price > 0)
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        password TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL,
        product_id BIGINT NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity > 0),
        total NUMERIC NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
];

/// The main service that manages database interaction for the store API.
#[derive(Clone)]
pub struct DatabaseService {
    pool: PgPool,
}

impl DatabaseService {
    /// Connects to the database and creates any missing tables.
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Self::from_pool(pool).await
    }

    pub async fn from_pool(pool: PgPool) -> anyhow::Result<Self> {
        for statement in CREATE_TABLES {
            sqlx::query(statement).execute(&pool).await?;
        }
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn ping(&self) -> ServiceResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    // --- products ---

    pub async fn create_product(&self, input: NewProduct) -> ServiceResult<Product> {
        let mut values = FieldSet::new();
        values
            .set("name", input.name)
            .set("about", input.about)
            .set("price", input.price);
        let product = insert_returning("products", values, PRODUCT_COLUMNS)?
            .build_query_as::<Product>()
            .fetch_one(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn list_products(&self, filter: ProductFilter) -> ServiceResult<Vec<Product>> {
        let mut filters = FieldSet::new();
        filters
            .set_opt("name", filter.name)
            .set_opt("about", filter.about)
            .set_opt("price", filter.price);
        let products = select_filtered("products", PRODUCT_COLUMNS, filters, "id")
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    pub async fn get_product(&self, id: i64) -> ServiceResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("product"))
    }

    pub async fn update_product(&self, id: i64, patch: ProductPatch) -> ServiceResult<Product> {
        let mut fields = FieldSet::new();
        fields
            .set_opt("name", patch.name)
            .set_opt("about", patch.about)
            .set_opt("price", patch.price);
        update_returning("products", fields, ("id", id.into()), PRODUCT_COLUMNS)?
            .build_query_as::<Product>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ServiceError::NotFound("product"))
    }

    /// Deletes a product and returns it as it was. Orders referencing it are left alone.
    pub async fn delete_product(&self, id: i64) -> ServiceResult<Product> {
        sqlx::query_as::<_, Product>(&format!(
            "DELETE FROM products WHERE id = $1 RETURNING {}",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("product"))
    }

    // --- users ---

    pub async fn create_user(&self, input: NewUser) -> ServiceResult<User> {
        let password = hash_off_thread(input.password).await?;
        let mut values = FieldSet::new();
        values
            .set("name", input.name)
            .set("email", input.email)
            .set("password", password);
        let user = insert_returning("users", values, USER_COLUMNS)?
            .build_query_as::<User>()
            .fetch_one(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn list_users(&self) -> ServiceResult<Vec<User>> {
        let users = select_filtered("users", USER_COLUMNS, FieldSet::new(), "id")
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn get_user(&self, id: i64) -> ServiceResult<User> {
        sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ServiceError::NotFound("user"))
    }

    /// Applies the present fields of `patch`. A new password is hashed before storage.
    pub async fn update_user(&self, id: i64, patch: UserPatch) -> ServiceResult<User> {
        let mut fields = FieldSet::new();
        fields.set_opt("name", patch.name).set_opt("email", patch.email);
        // Reject empty patches before paying for a hash.
        if fields.is_empty() && patch.password.is_none() {
            return Err(crate::domain::ValidationError::empty_update().into());
        }
        if let Some(password) = patch.password {
            fields.set("password", hash_off_thread(password).await?);
        }
        update_returning("users", fields, ("id", id.into()), USER_COLUMNS)?
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ServiceError::NotFound("user"))
    }

    pub async fn delete_user(&self, id: i64) -> ServiceResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "DELETE FROM users WHERE id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("user"))
    }

    // --- orders ---

    /// Looks up the product, derives the total and inserts the order.
    ///
    /// The product row is share-locked until the insert commits, so the price used for the
    /// total cannot change or disappear in between.
    pub async fn create_order(&self, input: NewOrder) -> ServiceResult<Order> {
        let mut tx = self.pool.begin().await?;
        let price = product_price_locked(&mut tx, input.product_id).await?;

        let now = Utc::now();
        let mut values = FieldSet::new();
        values
            .set("user_id", input.user_id)
            .set("product_id", input.product_id)
            .set("quantity", input.quantity)
            .set("total", order_total(price, input.quantity)?)
            .set("created_at", now)
            .set("updated_at", now);
        let order = insert_returning("orders", values, ORDER_COLUMNS)?
            .build_query_as::<Order>()
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(order)
    }

    pub async fn list_orders(&self) -> ServiceResult<Vec<Order>> {
        let orders = select_filtered("orders", ORDER_COLUMNS, FieldSet::new(), "id")
            .build_query_as::<Order>()
            .fetch_all(&self.pool)
            .await?;
        Ok(orders)
    }

    pub async fn get_order(&self, id: i64) -> ServiceResult<Order> {
        sqlx::query_as::<_, Order>(&format!("SELECT {} FROM orders WHERE id = $1", ORDER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ServiceError::NotFound("order"))
    }

    /// Applies the present fields of `patch`. When the product or quantity changes, the
    /// total is recomputed from the (possibly new) product's current price.
    pub async fn update_order(&self, id: i64, patch: OrderPatch) -> ServiceResult<Order> {
        let affects_total = patch.affects_total();
        let mut fields = FieldSet::new();
        fields
            .set_opt("user_id", patch.user_id)
            .set_opt("product_id", patch.product_id)
            .set_opt("quantity", patch.quantity);
        fields.ensure_not_empty()?;

        let mut tx = self.pool.begin().await?;
        if affects_total {
            let current: Option<(i64, i32)> =
                sqlx::query_as("SELECT product_id, quantity FROM orders WHERE id = $1 FOR UPDATE")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;
            let (current_product, current_quantity) =
                current.ok_or(ServiceError::NotFound("order"))?;

            let product_id = patch.product_id.unwrap_or(current_product);
            let quantity = patch.quantity.unwrap_or(current_quantity);
            let price = product_price_locked(&mut tx, product_id).await?;
            fields.set("total", order_total(price, quantity)?);
        }
        fields.set("updated_at", Utc::now());

        let order = update_returning("orders", fields, ("id", id.into()), ORDER_COLUMNS)?
            .build_query_as::<Order>()
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(ServiceError::NotFound("order"))?;
        tx.commit().await?;
        Ok(order)
    }

    pub async fn delete_order(&self, id: i64) -> ServiceResult<Order> {
        sqlx::query_as::<_, Order>(&format!(
            "DELETE FROM orders WHERE id = $1 RETURNING {}",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ServiceError::NotFound("order"))
    }
}

async fn product_price_locked(conn: &mut PgConnection, product_id: i64) -> ServiceResult<Decimal> {
    sqlx::query_scalar::<_, Decimal>("SELECT price FROM products WHERE id = $1 FOR SHARE")
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(ServiceError::NotFound("product"))
}

/// Argon2 hashing is CPU-bound; run it on the blocking pool.
async fn hash_off_thread(password: String) -> ServiceResult<String> {
    let hashed = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(anyhow::Error::from)??;
    Ok(hashed)
}
