use axum::routing::post;
use axum::Router;

use crate::ServiceState;

pub mod create;
pub mod delete;
pub mod list;

// Re-export for convenience
pub use create::CreateRequest;
pub use delete::DeleteRequest;
pub use list::ListRequest;

pub fn router(state: ServiceState) -> Router {
    Router::new()
        .route("/", post(create::handler))
        .route("/list", post(list::handler))
        .route("/delete", post(delete::handler))
        .with_state(state)
}
