//! plan-desk HTTP Server
//!
//! Axum-based server providing the billing API consumed by the plan page
//! and serving the WASM frontend.

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use billing_payments::{
    BillingBackend, MemoryOrganizationStore, OrganizationRecord, OrganizationStore, StripeBilling,
};

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    // Seed the organization served by this instance
    let organizations = MemoryOrganizationStore::new();
    let mut record = OrganizationRecord::new(&config.organization_uid, &config.organization_name);
    record.customer_id = config.customer_id.clone();
    organizations.save(&record)?;
    
    tracing::info!("Organization {} ({})", config.organization_name, config.organization_uid);
    if config.customer_id.is_none() {
        tracing::warn!("No STRIPE_CUSTOMER_ID - subscriptions and portal unavailable");
    }

    // Initialize payments
    let billing = match StripeBilling::from_env() {
        Ok(billing) => {
            tracing::info!("Stripe configured");
            Some(Arc::new(billing) as Arc<dyn BillingBackend>)
        }
        Err(e) => {
            tracing::warn!("Stripe not configured - payments disabled ({})", e);
            tracing::warn!("  Set STRIPE_SECRET_KEY in .env");
            None
        }
    };

    // Build application state
    let state = AppState {
        config: Arc::new(config.clone()),
        organizations: Arc::new(organizations),
        billing,
    };

    let app = routes::app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    
    tracing::info!("plan-desk server running on http://{}", config.bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                        - Health check");
    tracing::info!("  GET  /api/v2/stripe/products/       - Plan catalog");
    tracing::info!("  GET  /api/v2/organizations/         - Organizations");
    tracing::info!("  GET  /api/v2/stripe/subscriptions/  - Active subscriptions");
    tracing::info!("  POST /api/v2/stripe/checkout-link   - Create Stripe checkout");
    tracing::info!("  POST /api/v2/stripe/customer-portal - Open billing portal");
    
    axum::serve(listener, app).await?;
    
    Ok(())
}
