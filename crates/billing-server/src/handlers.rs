//! HTTP Handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use billing_core::{BaseSubscription, ListResponse, Organization, Product, RedirectResponse};
use billing_payments::{
    BillingBackend, CheckoutRequest, OrganizationRecord, OrganizationStore, PaymentError,
};

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub stripe_configured: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl Into<String>, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

fn payment_error(err: &PaymentError) -> ApiError {
    let (status, code) = match err {
        PaymentError::OrganizationNotFound(_) => (StatusCode::NOT_FOUND, "ORGANIZATION_NOT_FOUND"),
        PaymentError::NoCustomer(_) => (StatusCode::BAD_REQUEST, "NO_CUSTOMER"),
        PaymentError::InvalidId(_) => (StatusCode::BAD_REQUEST, "INVALID_ID"),
        PaymentError::Config(_) => (StatusCode::SERVICE_UNAVAILABLE, "PAYMENTS_DISABLED"),
        PaymentError::Stripe(_) | PaymentError::Payload(_) => (StatusCode::BAD_GATEWAY, "STRIPE_ERROR"),
        PaymentError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
    };
    api_error(status, err.user_message(), code)
}

fn require_billing(state: &AppState) -> Result<&Arc<dyn BillingBackend>, ApiError> {
    state.billing.as_ref().ok_or_else(|| {
        api_error(StatusCode::SERVICE_UNAVAILABLE, "Payments not configured", "PAYMENTS_DISABLED")
    })
}

fn require_organization(state: &AppState, uid: &str) -> Result<OrganizationRecord, ApiError> {
    state.organizations.require(uid).map_err(|e| {
        tracing::warn!("Organization lookup failed: {}", e);
        payment_error(&e)
    })
}

#[derive(Debug, Deserialize)]
pub struct CheckoutQuery {
    #[serde(default)]
    pub price_id: String,
    #[serde(default)]
    pub organization_uid: String,
}

#[derive(Debug, Deserialize)]
pub struct PortalQuery {
    #[serde(default)]
    pub organization_uid: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        stripe_configured: state.billing.is_some(),
    })
}

/// Catalog products with their prices
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Product>>, ApiError> {
    let Some(billing) = state.billing.as_ref() else {
        tracing::debug!("Stripe not configured, serving an empty catalog");
        return Ok(Json(ListResponse::new(Vec::new())));
    };
    
    let products = billing.list_products().await.map_err(|e| {
        tracing::error!("Product listing failed: {}", e);
        payment_error(&e)
    })?;
    
    Ok(Json(ListResponse::new(products)))
}

/// Organizations of the current user
pub async fn list_organizations(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<Organization>>, ApiError> {
    let records = state.organizations.list().map_err(|e| payment_error(&e))?;
    let organizations = records.into_iter().map(|record| record.organization).collect();
    Ok(Json(ListResponse::new(organizations)))
}

/// Subscriptions of the current (first) organization
pub async fn list_subscriptions(
    State(state): State<AppState>,
) -> Result<Json<ListResponse<BaseSubscription>>, ApiError> {
    let Some(billing) = state.billing.as_ref() else {
        return Ok(Json(ListResponse::new(Vec::new())));
    };
    
    let records = state.organizations.list().map_err(|e| payment_error(&e))?;
    let Some(customer_id) = records.first().and_then(|record| record.customer_id.clone()) else {
        return Ok(Json(ListResponse::new(Vec::new())));
    };
    
    let subscriptions = billing.list_subscriptions(&customer_id).await.map_err(|e| {
        tracing::error!("Subscription listing failed: {}", e);
        payment_error(&e)
    })?;
    
    Ok(Json(ListResponse::new(subscriptions)))
}

/// Create a Stripe checkout session for a catalog price
pub async fn checkout_link(
    State(state): State<AppState>,
    Query(query): Query<CheckoutQuery>,
) -> Result<Json<RedirectResponse>, ApiError> {
    let billing = require_billing(&state)?;
    
    if query.price_id.is_empty() || query.organization_uid.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "price_id and organization_uid are required",
            "MISSING_PARAMETER",
        ));
    }
    let record = require_organization(&state, &query.organization_uid)?;
    
    let request = CheckoutRequest {
        success_url: state.config.checkout_success_url(&query.price_id),
        cancel_url: state.config.plans_url(),
        price_id: query.price_id,
        organization_uid: record.organization.id,
        customer_id: record.customer_id,
    };
    
    let session = billing.create_checkout_session(request).await.map_err(|e| {
        tracing::error!("Checkout error: {}", e);
        payment_error(&e)
    })?;
    
    Ok(Json(RedirectResponse {
        url: Some(session.checkout_url),
    }))
}

/// Create a customer billing portal session
pub async fn customer_portal(
    State(state): State<AppState>,
    Query(query): Query<PortalQuery>,
) -> Result<Json<RedirectResponse>, ApiError> {
    let billing = require_billing(&state)?;
    
    if query.organization_uid.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "organization_uid is required",
            "MISSING_PARAMETER",
        ));
    }
    let record = require_organization(&state, &query.organization_uid)?;
    let customer_id = record.require_customer().map_err(|e| payment_error(&e))?;
    
    let session = billing
        .create_portal_session(customer_id, &state.config.plans_url())
        .await
        .map_err(|e| {
            tracing::error!("Customer portal error: {}", e);
            payment_error(&e)
        })?;
    
    Ok(Json(RedirectResponse { url: Some(session.url) }))
}
