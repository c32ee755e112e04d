//! Application State

use std::sync::Arc;

use billing_payments::{BillingBackend, OrganizationStore};

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration
    pub config: Arc<ServerConfig>,
    
    /// Organizations and their billing customers
    pub organizations: Arc<dyn OrganizationStore>,
    
    /// Billing provider (optional - None if Stripe is not configured)
    pub billing: Option<Arc<dyn BillingBackend>>,
}
