//! # billing-payments
//!
//! Stripe-backed billing for plan-desk: the product catalog, organization
//! subscriptions, and the hosted checkout and customer portal flows.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐  checkout-link   ┌─────────────────┐  success_url   ┌─────────────────────┐
//! │  Plan page  │─────────────────▶│ Stripe Checkout │───────────────▶│ /plans?checkout=ID  │
//! │  (/plans)   │                  │  (hosted page)  │                │ (thank-you notice)  │
//! └─────────────┘                  └─────────────────┘                └─────────────────────┘
//!        │ customer-portal          ┌─────────────────┐  return_url
//!        └─────────────────────────▶│ Billing portal  │──────────────▶ /plans
//!                                   └─────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use billing_payments::{BillingBackend, CheckoutRequest, StripeBilling};
//!
//! let billing = StripeBilling::new("sk_test_xxx");
//!
//! let session = billing.create_checkout_session(CheckoutRequest {
//!     price_id: "price_123".into(),
//!     organization_uid: "orgABC".into(),
//!     customer_id: Some("cus_123".into()),
//!     success_url: "https://yoursite.com/plans?checkout=price_123".into(),
//!     cancel_url: "https://yoursite.com/plans".into(),
//! }).await?;
//!
//! // Redirect user to: session.checkout_url
//! ```

mod catalog;
mod checkout;
mod error;
mod organization;

pub use catalog::{build_catalog, format_price, project_price, project_product, project_subscription};
pub use checkout::{BillingBackend, CheckoutRequest, CheckoutSession, PortalSession, StripeBilling};
pub use error::{PaymentError, Result};
pub use organization::{MemoryOrganizationStore, OrganizationRecord, OrganizationStore, generate_uid};
