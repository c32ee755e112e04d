//! Server Configuration
//!
//! Read from the environment (after `.env` is loaded).

use billing_payments::generate_uid;

/// Runtime configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address (`BIND_ADDR`)
    pub bind_addr: String,
    
    /// Public origin used to build redirect URLs (`PUBLIC_URL`)
    pub public_url: String,
    
    /// Directory holding the WASM frontend (`STATIC_DIR`)
    pub static_dir: String,
    
    /// Uid of the organization served by this instance (`ORGANIZATION_UID`)
    pub organization_uid: String,
    
    /// Display name of that organization (`ORGANIZATION_NAME`)
    pub organization_name: String,
    
    /// Stripe customer paying for it (`STRIPE_CUSTOMER_ID`)
    pub customer_id: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            public_url: "http://localhost:3000".into(),
            static_dir: "static".into(),
            organization_uid: generate_uid(),
            organization_name: "My organization".into(),
            customer_id: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        
        Self {
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            public_url: var("PUBLIC_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_url),
            static_dir: var("STATIC_DIR").unwrap_or(defaults.static_dir),
            organization_uid: var("ORGANIZATION_UID").unwrap_or(defaults.organization_uid),
            organization_name: var("ORGANIZATION_NAME").unwrap_or(defaults.organization_name),
            customer_id: var("STRIPE_CUSTOMER_ID"),
        }
    }
    
    /// Where Stripe Checkout sends the user after paying for `price_id`
    pub fn checkout_success_url(&self, price_id: &str) -> String {
        format!("{}/plans?checkout={}", self.public_url, price_id)
    }
    
    /// Plan page URL, used for cancel and portal return
    pub fn plans_url(&self) -> String {
        format!("{}/plans", self.public_url)
    }
}
