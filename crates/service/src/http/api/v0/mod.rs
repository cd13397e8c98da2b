use axum::Router;

pub mod node;
pub mod root;
pub mod storage;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router {
    Router::new()
        .nest("/node", node::router(state.clone()))
        .nest("/root", root::router(state.clone()))
        .nest("/storage", storage::router(state))
}
