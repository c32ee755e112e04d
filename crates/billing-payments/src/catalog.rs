//! Catalog Projection
//!
//! Turns Stripe products, prices and subscriptions into the wire model the
//! plan page consumes. Projection works on the JSON form of Stripe objects,
//! so it does not depend on which fields a given API version leaves out.

use billing_core::model::{ItemPrice, ItemProduct, Recurring, SubscriptionItem};
use billing_core::{BasePrice, BaseSubscription, Metadata, Product};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;

use crate::error::{PaymentError, Result};

/// Currencies without a minor unit
const ZERO_DECIMAL_CURRENCIES: [&str; 6] = ["jpy", "krw", "vnd", "clp", "pyg", "xof"];

/// Display string for a price, e.g. `$150.00/year`
pub fn format_price(unit_amount: i64, currency: &str, interval: Option<&str>) -> String {
    let currency = currency.to_lowercase();
    let (amount, decimals): (Decimal, usize) = if ZERO_DECIMAL_CURRENCIES.contains(&currency.as_str()) {
        (Decimal::new(unit_amount, 0), 0)
    } else {
        (Decimal::new(unit_amount, 2), 2)
    };
    
    let symbol = match currency.as_str() {
        "usd" | "cad" | "aud" => "$".to_string(),
        "eur" => "€".to_string(),
        "gbp" => "£".to_string(),
        "jpy" => "¥".to_string(),
        other => format!("{} ", other.to_uppercase()),
    };
    
    let mut text = format!("{symbol}{amount:.decimals$}");
    if let Some(interval) = interval {
        text.push('/');
        text.push_str(interval);
    }
    text
}

fn str_field(value: &Value, key: &str) -> Result<String> {
    value[key]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| PaymentError::Payload(format!("missing `{key}`")))
}

fn metadata(value: &Value) -> Metadata {
    value["metadata"]
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

/// Id of an expandable reference (plain id or expanded object)
fn reference_id(value: &Value) -> Option<String> {
    match value {
        Value::String(id) => Some(id.clone()),
        Value::Object(_) => value["id"].as_str().map(str::to_string),
        _ => None,
    }
}

/// Project a Stripe price. Returns the owning product id alongside.
pub fn project_price(value: &Value) -> Result<(String, BasePrice)> {
    let id = str_field(value, "id")?;
    let product_id = reference_id(&value["product"])
        .ok_or_else(|| PaymentError::Payload(format!("price {id} has no product")))?;
    
    let currency = value["currency"].as_str().unwrap_or("usd").to_string();
    let unit_amount = value["unit_amount"].as_i64().unwrap_or(0);
    let recurring = value["recurring"]["interval"].as_str().map(|interval| Recurring {
        interval: interval.to_string(),
        interval_count: value["recurring"]["interval_count"].as_u64().unwrap_or(1),
    });
    let human_readable_price = format_price(
        unit_amount,
        &currency,
        recurring.as_ref().map(|r| r.interval.as_str()),
    );
    
    Ok((
        product_id,
        BasePrice {
            id,
            nickname: value["nickname"].as_str().map(str::to_string),
            currency,
            unit_amount,
            human_readable_price,
            recurring,
            metadata: metadata(value),
        },
    ))
}

/// Project a Stripe product with the prices that belong to it
pub fn project_product(value: &Value, prices: Vec<BasePrice>) -> Result<Product> {
    Ok(Product {
        id: str_field(value, "id")?,
        name: str_field(value, "name")?,
        description: value["description"].as_str().map(str::to_string),
        kind: value["type"].as_str().map(str::to_string),
        prices,
        metadata: metadata(value),
    })
}

/// Join products and prices into the catalog.
///
/// Prices are sorted cheapest first, products by their cheapest price so
/// the free tier comes first. Products without prices are left out.
pub fn build_catalog(products: &[Value], prices: &[Value]) -> Result<Vec<Product>> {
    let mut by_product: HashMap<String, Vec<BasePrice>> = HashMap::new();
    for value in prices {
        let (product_id, price) = project_price(value)?;
        by_product.entry(product_id).or_default().push(price);
    }
    
    let mut catalog = Vec::with_capacity(products.len());
    for value in products {
        let id = str_field(value, "id")?;
        let Some(mut prices) = by_product.remove(&id) else {
            tracing::debug!("Skipping product {} without active prices", id);
            continue;
        };
        prices.sort_by_key(|price| price.unit_amount);
        catalog.push(project_product(value, prices)?);
    }
    
    catalog.sort_by_key(|product| product.prices.first().map_or(i64::MAX, |p| p.unit_amount));
    Ok(catalog)
}

/// Project a Stripe subscription.
///
/// Product names come from the expanded product when present, otherwise
/// from `product_names` (product id to name).
pub fn project_subscription(value: &Value, product_names: &HashMap<String, String>) -> Result<BaseSubscription> {
    let id = str_field(value, "id")?;
    
    let mut items = Vec::new();
    for item in value["items"]["data"].as_array().into_iter().flatten() {
        let price = &item["price"];
        let product = &price["product"];
        let product_id = reference_id(product)
            .ok_or_else(|| PaymentError::Payload(format!("subscription {id} item without product")))?;
        let name = product["name"]
            .as_str()
            .map(str::to_string)
            .or_else(|| product_names.get(&product_id).cloned())
            .unwrap_or_default();
        
        items.push(SubscriptionItem {
            id: str_field(item, "id")?,
            price: ItemPrice {
                id: str_field(price, "id")?,
                product: ItemProduct { id: product_id, name },
            },
        });
    }
    
    Ok(BaseSubscription {
        id,
        status: value["status"].as_str().unwrap_or_default().to_string(),
        items,
    })
}
