//! Catalog Models
//!
//! Wire types shared by the billing backend and the plan page. The shapes
//! follow the `/api/v2/stripe/*` and `/api/v2/organizations/` endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Free-form key/value metadata attached to catalog entries
pub type Metadata = BTreeMap<String, String>;

/// Billing interval used to filter the catalog
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Month,
    #[default]
    Year,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Month => "month",
            Interval::Year => "year",
        }
    }
    
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "month" => Some(Interval::Month),
            "year" => Some(Interval::Year),
            _ => None,
        }
    }
}

/// Recurrence of a price
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurring {
    /// Raw interval name (`day`, `week`, `month`, `year`)
    pub interval: String,
    
    #[serde(default = "default_interval_count")]
    pub interval_count: u64,
}

fn default_interval_count() -> u64 {
    1
}

/// One price variant of a product
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasePrice {
    pub id: String,
    
    #[serde(default)]
    pub nickname: Option<String>,
    
    #[serde(default)]
    pub currency: String,
    
    /// Amount in the currency's minor unit
    #[serde(default)]
    pub unit_amount: i64,
    
    /// Display string such as `$150.00/year`
    #[serde(default)]
    pub human_readable_price: String,
    
    #[serde(default)]
    pub recurring: Option<Recurring>,
    
    #[serde(default)]
    pub metadata: Metadata,
}

impl BasePrice {
    /// Billing interval of this price.
    ///
    /// Prefers the structured `recurring` block and falls back to the segment
    /// after `/` in the human readable price.
    pub fn interval(&self) -> Option<Interval> {
        if let Some(recurring) = &self.recurring {
            return Interval::parse(&recurring.interval);
        }
        self.human_readable_price
            .split('/')
            .nth(1)
            .and_then(Interval::parse)
    }
    
    pub fn is_free(&self) -> bool {
        self.unit_amount == 0
    }
}

/// A catalog product with all of its prices
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    
    pub name: String,
    
    #[serde(default)]
    pub description: Option<String>,
    
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    
    #[serde(default)]
    pub prices: Vec<BasePrice>,
    
    /// Marketing feature text, see [`crate::features`]
    #[serde(default)]
    pub metadata: Metadata,
}

/// A product narrowed to the single price shown for the current interval
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOffer {
    pub id: String,
    pub name: String,
    pub price: BasePrice,
    pub metadata: Metadata,
}

impl PlanOffer {
    pub fn new(product: &Product, price: BasePrice) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price,
            metadata: product.metadata.clone(),
        }
    }
}

/// The organization the current user acts for
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization uid (e.g. `orgABC123`)
    pub id: String,
    
    pub name: String,
    
    #[serde(default = "default_true")]
    pub is_active: bool,
    
    pub created: DateTime<Utc>,
    
    pub modified: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Product reference inside a subscription item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemProduct {
    pub id: String,
    
    #[serde(default)]
    pub name: String,
}

/// Price reference inside a subscription item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPrice {
    pub id: String,
    pub product: ItemProduct,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionItem {
    pub id: String,
    pub price: ItemPrice,
}

/// An active subscription of the organization
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseSubscription {
    pub id: String,
    
    #[serde(default)]
    pub status: String,
    
    #[serde(default)]
    pub items: Vec<SubscriptionItem>,
}

impl BaseSubscription {
    /// Whether any line item references the given price
    pub fn has_price(&self, price_id: &str) -> bool {
        self.items.iter().any(|item| item.price.id == price_id)
    }
    
    /// Name of the product on the first line item
    pub fn product_name(&self) -> Option<&str> {
        self.items.first().map(|item| item.price.product.name.as_str())
    }
}

/// Paginated list envelope
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default)]
    pub count: usize,
    
    #[serde(default)]
    pub next: Option<String>,
    
    #[serde(default)]
    pub previous: Option<String>,
    
    pub results: Vec<T>,
}

impl<T> ListResponse<T> {
    /// Single-page envelope
    pub fn new(results: Vec<T>) -> Self {
        Self {
            count: results.len(),
            next: None,
            previous: None,
            results,
        }
    }
}

/// Response of the checkout and customer portal endpoints
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectResponse {
    #[serde(default)]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_human_readable_price() {
        let price = BasePrice {
            id: "price_1".into(),
            nickname: None,
            currency: "usd".into(),
            unit_amount: 15000,
            human_readable_price: "$150.00/year".into(),
            recurring: None,
            metadata: Metadata::new(),
        };
        assert_eq!(price.interval(), Some(Interval::Year));
        assert!(!price.is_free());
    }

    #[test]
    fn test_product_deserializes_backend_shape() {
        let json = r#"{
            "id": "prod_1",
            "name": "Professional plan",
            "type": "service",
            "prices": [{
                "id": "price_m",
                "currency": "usd",
                "unit_amount": 1500,
                "human_readable_price": "$15.00/month",
                "recurring": {"interval": "month", "interval_count": 1}
            }],
            "metadata": {"feature_list_1": "Unlimited forms"}
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.kind.as_deref(), Some("service"));
        assert_eq!(product.prices[0].interval(), Some(Interval::Month));
        assert_eq!(product.metadata["feature_list_1"], "Unlimited forms");
    }

    #[test]
    fn test_subscription_price_lookup() {
        let sub = BaseSubscription {
            id: "sub_1".into(),
            status: "active".into(),
            items: vec![SubscriptionItem {
                id: "si_1".into(),
                price: ItemPrice {
                    id: "price_y".into(),
                    product: ItemProduct { id: "prod_1".into(), name: "Professional plan".into() },
                },
            }],
        };
        assert!(sub.has_price("price_y"));
        assert!(!sub.has_price("price_m"));
        assert_eq!(sub.product_name(), Some("Professional plan"));
    }
}
