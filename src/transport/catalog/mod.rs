//! HTTP surface of the catalog service (document store + chat).

pub mod chat;
pub mod handlers {
    pub mod categories;
    pub mod chat;
    pub mod health;
    pub mod products;
}

use crate::app::CatalogService;
use axum::routing::get;
use axum::Router;
use chat::ChatHub;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct CatalogState {
    pub catalog: CatalogService,
    pub chat: ChatHub,
}

pub fn create_router(state: CatalogState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::healthcheck_handler))
        .route(
            "/products",
            get(handlers::products::list_products_handler)
                .post(handlers::products::create_product_handler),
        )
        .route(
            "/products/:id",
            get(handlers::products::get_product_handler)
                .delete(handlers::products::delete_product_handler),
        )
        .route(
            "/categories",
            get(handlers::categories::list_categories_handler)
                .post(handlers::categories::create_category_handler),
        )
        .route(
            "/categories/:id",
            get(handlers::categories::get_category_handler)
                .delete(handlers::categories::delete_category_handler),
        )
        .route("/chat", get(handlers::chat::chat_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
