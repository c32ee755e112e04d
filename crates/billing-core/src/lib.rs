//! # billing-core
//!
//! Plan catalog model, view state and checkout actions for the plan page.
//!
//! ## Data Flow
//!
//! ```text
//! ┌──────────────┐  PlanAction   ┌───────────┐  filter_prices  ┌─────────────┐
//! │  BillingApi  │──────────────▶│ PlanState │────────────────▶│ PlanOffer[] │
//! │  (3 fetches) │               │ (reducer) │   + interval    │  (cards)    │
//! └──────────────┘               └───────────┘                 └─────────────┘
//!         ▲                                                           │
//!         │ upgrade / manage_plan                                     │ features
//!         └───────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is target-independent: the WASM frontend supplies the
//! HTTP client, navigation and button state through the traits in
//! [`actions`].

pub mod actions;
pub mod catalog;
pub mod error;
pub mod features;
pub mod model;
pub mod notice;
pub mod state;

#[cfg(test)]
mod fixtures;

pub use actions::{ActionGuard, ActionOutcome, BillingApi, Navigator, manage_plan, upgrade};
pub use catalog::{filter_prices, is_subscribed_product};
pub use error::{BillingError, Result};
pub use features::{FeatureItem, FeatureSection, feature_items};
pub use model::{
    BasePrice, BaseSubscription, Interval, ListResponse, Metadata, Organization, PlanOffer,
    Product, RedirectResponse,
};
pub use notice::{CheckoutNotice, CheckoutWatcher};
pub use state::{PlanAction, PlanState};
