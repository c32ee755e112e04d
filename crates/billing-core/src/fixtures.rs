//! Shared test catalog

use chrono::{TimeZone, Utc};

use crate::model::{
    BasePrice, BaseSubscription, ItemPrice, ItemProduct, Metadata, Organization, Product,
    Recurring, SubscriptionItem,
};

fn metadata(pairs: &[(&str, &str)]) -> Metadata {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

pub fn price(id: &str, unit_amount: i64, readable: &str, interval: &str) -> BasePrice {
    BasePrice {
        id: id.into(),
        nickname: None,
        currency: "usd".into(),
        unit_amount,
        human_readable_price: readable.into(),
        recurring: Some(Recurring {
            interval: interval.into(),
            interval_count: 1,
        }),
        metadata: Metadata::new(),
    }
}

pub fn community() -> Product {
    Product {
        id: "prod_community".into(),
        name: "Community plan".into(),
        description: None,
        kind: Some("service".into()),
        prices: vec![price("price_free", 0, "$0.00/month", "month")],
        metadata: metadata(&[
            ("feature_list_1", "5,000 submissions per month"),
            ("feature_support_title", "Support"),
            ("feature_support_1", "Community forum"),
            ("feature_support_check_1", "true"),
            ("feature_support_2", "Email support"),
            ("feature_support_check_2", "false"),
        ]),
    }
}

pub fn professional() -> Product {
    Product {
        id: "prod_professional".into(),
        name: "Professional plan".into(),
        description: None,
        kind: Some("service".into()),
        prices: vec![
            price("price_pro_month", 1500, "$15.00/month", "month"),
            price("price_pro_year", 15000, "$150.00/year", "year"),
        ],
        metadata: metadata(&[
            ("feature_list_1", "Unlimited submissions"),
            ("feature_list_2", "10 GB of storage"),
            ("feature_support_title", "Support"),
            ("feature_support_1", "Community forum"),
            ("feature_support_check_1", "true"),
            ("feature_support_2", "Email support"),
            ("feature_support_check_2", "true"),
            ("feature_advanced_title", "Advanced"),
            ("feature_advanced_1", "Custom domains"),
            ("feature_advanced_check_1", "true"),
            ("feature_addons_1", "Extra storage"),
        ]),
    }
}

pub fn organization() -> Organization {
    let at = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    Organization {
        id: "orgTEST123".into(),
        name: "Test organization".into(),
        is_active: true,
        created: at,
        modified: at,
    }
}

pub fn subscription_to(price_id: &str, product_name: &str) -> BaseSubscription {
    BaseSubscription {
        id: "sub_1".into(),
        status: "active".into(),
        items: vec![SubscriptionItem {
            id: "si_1".into(),
            price: ItemPrice {
                id: price_id.into(),
                product: ItemProduct {
                    id: "prod_x".into(),
                    name: product_name.into(),
                },
            },
        }],
    }
}
