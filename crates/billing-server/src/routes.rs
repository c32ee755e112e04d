//! Router

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::handlers::{
    checkout_link, customer_portal, health_check, list_organizations, list_products,
    list_subscriptions,
};
use crate::state::AppState;

/// Build the application router
pub fn app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    
    let static_files = ServeDir::new(&state.config.static_dir);
    
    Router::new()
        // Health & info
        .route("/health", get(health_check))
        
        // Catalog and account
        .route("/api/v2/stripe/products/", get(list_products))
        .route("/api/v2/stripe/subscriptions/", get(list_subscriptions))
        .route("/api/v2/organizations/", get(list_organizations))
        
        // Hosted payment flows
        .route("/api/v2/stripe/checkout-link", post(checkout_link))
        .route("/api/v2/stripe/customer-portal", post(customer_portal))
        
        // Static files (WASM frontend)
        .fallback_service(static_files)
        
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
