//! API Client

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use billing_core::{
    BaseSubscription, BillingApi, BillingError, ListResponse, Navigator, Organization, Product,
    RedirectResponse, Result,
};

/// Error body returned by the billing server
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

fn window_origin() -> String {
    web_sys::window()
        .and_then(|w| w.location().origin().ok())
        .unwrap_or_else(|| "http://localhost:3000".into())
}

/// `BillingApi` over HTTP against the billing server
pub struct HttpBillingApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBillingApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
    
    /// Client for the origin the page was served from
    pub fn from_window() -> Self {
        Self::new(window_origin())
    }
    
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .send()
            .await
            .map_err(|e| BillingError::Network(e.to_string()))?;
        
        read_json(response).await
    }
    
    async fn post_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .query(query)
            .send()
            .await
            .map_err(|e| BillingError::Network(e.to_string()))?;
        
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        response
            .json()
            .await
            .map_err(|e| BillingError::Decode(e.to_string()))
    } else {
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.error)
            .unwrap_or_else(|_| "Request failed".into());
        Err(BillingError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait(?Send)]
impl BillingApi for HttpBillingApi {
    async fn get_products(&self) -> Result<ListResponse<Product>> {
        self.get_json("/api/v2/stripe/products/").await
    }
    
    async fn get_organization(&self) -> Result<ListResponse<Organization>> {
        self.get_json("/api/v2/organizations/").await
    }
    
    async fn get_subscription(&self) -> Result<ListResponse<BaseSubscription>> {
        self.get_json("/api/v2/stripe/subscriptions/").await
    }
    
    async fn post_checkout(&self, price_id: &str, organization_id: &str) -> Result<RedirectResponse> {
        self.post_json(
            "/api/v2/stripe/checkout-link",
            &[("price_id", price_id), ("organization_uid", organization_id)],
        )
        .await
    }
    
    async fn post_customer_portal(&self, organization_id: &str) -> Result<RedirectResponse> {
        self.post_json(
            "/api/v2/stripe/customer-portal",
            &[("organization_uid", organization_id)],
        )
        .await
    }
}

/// Navigation through `window.location` and `window.alert`
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn redirect(&self, url: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.location().assign(url);
        }
    }
    
    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}
