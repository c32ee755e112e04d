//! Stripe Integration
//!
//! Catalog and subscription listing plus the two hosted flows the plan page
//! redirects into: Stripe Checkout for upgrades and the customer billing
//! portal for managing an existing plan.

use async_trait::async_trait;
use billing_core::{BaseSubscription, Product};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use stripe::{
    BillingPortalSession, CheckoutSession as StripeCheckoutSession, CheckoutSessionMode, Client,
    CreateBillingPortalSession, CreateCheckoutSession, CreateCheckoutSessionLineItems, CustomerId,
    ListPrices, ListProducts, ListSubscriptions, Price, Product as StripeProduct, Subscription,
};

use crate::catalog::{build_catalog, project_subscription};
use crate::error::{PaymentError, Result};

/// Page size used for catalog listing
const LIST_LIMIT: u64 = 100;

/// Billing provider used by the server
#[async_trait]
pub trait BillingBackend: Send + Sync {
    /// Active products with their active prices
    async fn list_products(&self) -> Result<Vec<Product>>;
    
    /// Subscriptions of a customer (canceled ones excluded)
    async fn list_subscriptions(&self, customer_id: &str) -> Result<Vec<BaseSubscription>>;
    
    /// Hosted checkout for a catalog price
    async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSession>;
    
    /// Customer billing portal session
    async fn create_portal_session(&self, customer_id: &str, return_url: &str) -> Result<PortalSession>;
}

/// Request to create a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// Catalog price to subscribe to
    pub price_id: String,
    
    /// Organization paying for the plan
    pub organization_uid: String,
    
    /// Existing Stripe customer of the organization
    #[serde(default)]
    pub customer_id: Option<String>,
    
    /// URL to redirect after successful payment
    pub success_url: String,
    
    /// URL to redirect if checkout is cancelled
    pub cancel_url: String,
}

/// Result of creating a checkout session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Stripe session ID
    pub id: String,
    
    /// URL to redirect user to
    pub checkout_url: String,
}

/// Result of creating a billing portal session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PortalSession {
    pub id: String,
    pub url: String,
}

/// Stripe client wrapper
pub struct StripeBilling {
    client: Client,
}

impl StripeBilling {
    /// Create a new Stripe client
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }
    
    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        let secret_key = std::env::var("STRIPE_SECRET_KEY")
            .map_err(|_| PaymentError::Config("STRIPE_SECRET_KEY not set".into()))?;
        
        Ok(Self::new(&secret_key))
    }
    
    async fn raw_products(&self) -> Result<Vec<Value>> {
        let mut params = ListProducts::new();
        params.active = Some(true);
        params.limit = Some(LIST_LIMIT);
        
        let products = StripeProduct::list(&self.client, &params).await?;
        to_values(&products.data)
    }
    
    async fn raw_prices(&self) -> Result<Vec<Value>> {
        let mut params = ListPrices::new();
        params.active = Some(true);
        params.limit = Some(LIST_LIMIT);
        
        let prices = Price::list(&self.client, &params).await?;
        to_values(&prices.data)
    }
}

fn to_values<T: Serialize>(items: &[T]) -> Result<Vec<Value>> {
    items
        .iter()
        .map(|item| serde_json::to_value(item).map_err(PaymentError::from))
        .collect()
}

fn parse_customer(customer_id: &str) -> Result<CustomerId> {
    customer_id
        .parse::<CustomerId>()
        .map_err(|e| PaymentError::InvalidId(format!("{customer_id}: {e}")))
}

#[async_trait]
impl BillingBackend for StripeBilling {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let products = self.raw_products().await?;
        let prices = self.raw_prices().await?;
        
        let catalog = build_catalog(&products, &prices)?;
        tracing::debug!("Loaded {} catalog products", catalog.len());
        Ok(catalog)
    }
    
    async fn list_subscriptions(&self, customer_id: &str) -> Result<Vec<BaseSubscription>> {
        let mut params = ListSubscriptions::new();
        params.customer = Some(parse_customer(customer_id)?);
        
        let subscriptions = Subscription::list(&self.client, &params).await?;
        
        let product_names: HashMap<String, String> = self
            .raw_products()
            .await?
            .iter()
            .filter_map(|p| Some((p["id"].as_str()?.to_string(), p["name"].as_str()?.to_string())))
            .collect();
        
        to_values(&subscriptions.data)?
            .iter()
            .map(|value| project_subscription(value, &product_names))
            .collect()
    }
    
    async fn create_checkout_session(&self, request: CheckoutRequest) -> Result<CheckoutSession> {
        if !request.price_id.starts_with("price_") {
            return Err(PaymentError::InvalidId(request.price_id));
        }
        let customer = request.customer_id.as_deref().map(parse_customer).transpose()?;
        if customer.is_none() {
            tracing::warn!(
                "Organization {} has no Stripe customer, checkout will create one",
                request.organization_uid
            );
        }
        
        let mut params = CreateCheckoutSession::new();
        params.success_url = Some(&request.success_url);
        params.cancel_url = Some(&request.cancel_url);
        params.mode = Some(CheckoutSessionMode::Subscription);
        params.customer = customer;
        params.client_reference_id = Some(&request.organization_uid);
        
        // Metadata for tracking
        let mut metadata = HashMap::new();
        metadata.insert("organization_uid".to_string(), request.organization_uid.clone());
        metadata.insert("price_id".to_string(), request.price_id.clone());
        params.metadata = Some(metadata);
        
        params.line_items = Some(vec![CreateCheckoutSessionLineItems {
            price: Some(request.price_id.clone()),
            quantity: Some(1),
            ..Default::default()
        }]);
        
        let session = StripeCheckoutSession::create(&self.client, params).await?;
        
        let checkout_url = session.url.ok_or_else(|| {
            PaymentError::Stripe("No checkout URL returned".into())
        })?;
        
        tracing::info!(
            "Created checkout session {} for {} ({})",
            session.id,
            request.organization_uid,
            request.price_id
        );
        
        Ok(CheckoutSession {
            id: session.id.to_string(),
            checkout_url,
        })
    }
    
    async fn create_portal_session(&self, customer_id: &str, return_url: &str) -> Result<PortalSession> {
        let mut params = CreateBillingPortalSession::new(parse_customer(customer_id)?);
        params.return_url = Some(return_url);
        
        let session = BillingPortalSession::create(&self.client, params).await?;
        
        Ok(PortalSession {
            id: session.id.to_string(),
            url: session.url,
        })
    }
}
