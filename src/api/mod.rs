//! API module
//!
//! HTTP API endpoints and middleware.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::WalletHandler;
use crate::store::ScopeProvider;

pub use routes::create_router;

/// Build the application with all middleware applied
pub fn build_app<P: ScopeProvider>(handler: Arc<WalletHandler<P>>) -> Router {
    // Note: Axum layers are applied in reverse order (last added = first executed)
    // Order: request id -> trace -> context -> logging -> handler
    create_router::<P>()
        .layer(axum::middleware::from_fn(middleware::logging_middleware))
        .layer(axum::middleware::from_fn(middleware::context_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(handler)
}
