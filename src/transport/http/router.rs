use crate::domain::model::{
    NewOrder, NewProduct, NewUser, Order, OrderPatch, Product, ProductPatch, User, UserPatch,
};
use crate::domain::FieldError;
use crate::transport::http::handlers::{health, orders, products, users};
use crate::transport::http::types::{ApiResponse, AppState};
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        products::create_product_handler,
        products::list_products_handler,
        products::get_product_handler,
        products::patch_product_handler,
        products::delete_product_handler,
        users::list_users_handler,
        users::get_user_handler,
        users::create_user_handler,
        users::put_user_handler,
        users::patch_user_handler,
        users::delete_user_handler,
        orders::create_order_handler,
        orders::list_orders_handler,
        orders::get_order_handler,
        orders::patch_order_handler,
        orders::delete_order_handler
    ),
    components(schemas(
        ApiResponse,
        FieldError,
        Product,
        NewProduct,
        ProductPatch,
        User,
        NewUser,
        UserPatch,
        Order,
        NewOrder,
        OrderPatch
    )),
    tags(
        (name = "health", description = "Datastore reachability"),
        (name = "products", description = "Products with filtered listing"),
        (name = "users", description = "Users; passwords are stored hashed and never returned"),
        (name = "orders", description = "Orders; totals are derived server-side")
    )
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route(
            "/products/:id",
            get(products::get_product_handler)
                .patch(products::patch_product_handler)
                .delete(products::delete_product_handler),
        )
        .route(
            "/users",
            get(users::list_users_handler).post(users::create_user_handler),
        )
        .route(
            "/users/:id",
            get(users::get_user_handler)
                .put(users::put_user_handler)
                .patch(users::patch_user_handler)
                .delete(users::delete_user_handler),
        )
        .route(
            "/orders",
            get(orders::list_orders_handler).post(orders::create_order_handler),
        )
        .route(
            "/orders/:id",
            get(orders::get_order_handler)
                .patch(orders::patch_order_handler)
                .delete(orders::delete_order_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/health",
            "/products",
            "/products/{id}",
            "/users",
            "/users/{id}",
            "/orders",
            "/orders/{id}",
        ] {
            assert!(paths.iter().any(|p| *p == expected), "missing {}", expected);
        }
    }
}
