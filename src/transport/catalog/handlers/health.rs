use crate::domain::ServiceResult;
use crate::transport::catalog::CatalogState;
use crate::transport::http::handlers::health::health_report;
use axum::extract::State;
use axum::response::Response;
use serde_json::json;

pub async fn healthcheck_handler(State(state): State<CatalogState>) -> Response {
    let ping: ServiceResult<()> = state.catalog.store().ping().await.map_err(Into::into);
    health_report(
        ping,
        json!({
            "datastore": "documents",
            "chat_connections": state.chat.connections()
        }),
    )
}
