use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{auth, handlers, handlers::AppState};

/// Create the main application router with all API endpoints
pub fn create_router(state: AppState) -> Router {
    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Every financial route sits behind the bearer-token gate; only the
    // health check stays open.
    let api = Router::new()
        .route("/data", get(handlers::get_data))
        .route("/debts", post(handlers::upsert_debt))
        .route("/debts/import", post(handlers::import_debts))
        .route("/debts/:id", delete(handlers::delete_debt))
        .route("/debts/:id/payments", post(handlers::mark_installments))
        .route("/salary", post(handlers::update_salary))
        .route("/savings", post(handlers::update_savings))
        .route("/months", post(handlers::upsert_month))
        .route("/quick-actions", post(handlers::sync_quick_actions))
        .route("/quick-actions/order", post(handlers::reorder_quick_actions))
        .route("/quick-actions/:route", delete(handlers::remove_quick_action))
        .route("/preferences", post(handlers::update_preferences))
        .route("/profile", post(handlers::update_profile))
        .route("/cache/invalidate", post(handlers::invalidate_cache))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_bearer,
        ));

    // Build the router
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api)
        // Add shared state
        .with_state(state)
        // Add middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
