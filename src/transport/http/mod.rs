pub mod router;
pub mod types;
pub mod handlers {
    pub mod common;
    pub mod health;
    pub mod orders;
    pub mod products;
    pub mod users;
}

pub use router::{create_router, ApiDoc};
pub use types::{ApiResponse, AppState};
