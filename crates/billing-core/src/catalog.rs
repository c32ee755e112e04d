//! Plan Catalog
//!
//! Derives the plan cards shown for the selected interval from the raw
//! product catalog, and decides which of them is the current plan.

use crate::model::{BaseSubscription, Interval, Organization, PlanOffer, Product};

/// Name of the free tier, which has nothing to manage in the portal
pub const COMMUNITY_PLAN: &str = "Community plan";

/// Name of the plan rendered with highlighted check marks
pub const PROFESSIONAL_PLAN: &str = "Professional plan";

/// Narrow every product to the price shown for `interval`.
///
/// The first price that either bills on `interval` or costs nothing wins.
/// Products without such a price are dropped.
pub fn filter_prices(products: &[Product], interval: Interval) -> Vec<PlanOffer> {
    products
        .iter()
        .filter_map(|product| {
            product
                .prices
                .iter()
                .find(|price| price.interval() == Some(interval) || price.is_free())
                .map(|price| PlanOffer::new(product, price.clone()))
        })
        .collect()
}

/// Whether `offer` is the organization's current plan.
///
/// Without any subscription the free plan is current. Otherwise plans are
/// matched on the subscribed product's name, not its id.
pub fn is_subscribed_product(offer: &PlanOffer, subscriptions: &[BaseSubscription]) -> bool {
    if offer.price.is_free() && subscriptions.is_empty() {
        return true;
    }
    subscriptions
        .first()
        .and_then(BaseSubscription::product_name)
        .is_some_and(|name| name == offer.name)
}

/// Column of the "your plan" marker
pub fn current_plan_index(offers: &[PlanOffer], subscriptions: &[BaseSubscription]) -> Option<usize> {
    offers
        .iter()
        .position(|offer| is_subscribed_product(offer, subscriptions))
}

/// Headline price of a plan card
pub fn price_title(offer: &PlanOffer) -> String {
    let readable = &offer.price.human_readable_price;
    if readable.contains("$0.00") {
        "Free".to_string()
    } else {
        readable.clone()
    }
}

/// Whether the card offers the "Manage" button
pub fn can_manage(
    offer: &PlanOffer,
    subscriptions: &[BaseSubscription],
    organization: Option<&Organization>,
) -> bool {
    is_subscribed_product(offer, subscriptions)
        && organization.is_some_and(|org| !org.id.is_empty())
        && offer.name != COMMUNITY_PLAN
}

/// Colour of the check marks on a plan card
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckStyle {
    Highlight,
    Standard,
}

impl CheckStyle {
    pub fn for_plan(name: &str) -> Self {
        if name == PROFESSIONAL_PLAN {
            CheckStyle::Highlight
        } else {
            CheckStyle::Standard
        }
    }
    
    pub fn css_class(&self) -> &'static str {
        match self {
            CheckStyle::Highlight => "check-teal",
            CheckStyle::Standard => "check-storm",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{community, organization, professional, subscription_to};
    use crate::state::{PlanAction, PlanState};

    #[test]
    fn test_filter_keeps_matching_and_free_prices() {
        let products = vec![community(), professional()];
        
        let yearly = filter_prices(&products, Interval::Year);
        assert_eq!(yearly.len(), 2);
        assert_eq!(yearly[0].price.id, "price_free");
        assert_eq!(yearly[1].price.id, "price_pro_year");
        
        let monthly = filter_prices(&products, Interval::Month);
        assert_eq!(monthly[1].price.id, "price_pro_month");
        
        for offer in yearly.iter().chain(monthly.iter()) {
            assert!(offer.price.is_free() || offer.price.interval().is_some());
        }
    }

    #[test]
    fn test_filter_never_returns_foreign_interval() {
        let products = vec![community(), professional()];
        for interval in [Interval::Month, Interval::Year] {
            for offer in filter_prices(&products, interval) {
                assert!(offer.price.is_free() || offer.price.interval() == Some(interval));
            }
        }
    }

    #[test]
    fn test_filter_drops_products_without_match() {
        let mut monthly_only = professional();
        monthly_only.prices.retain(|p| p.interval() == Some(Interval::Month));
        
        let offers = filter_prices(&[monthly_only], Interval::Year);
        assert!(offers.is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_offers() {
        let start = PlanState::new().reduce(PlanAction::LoadProducts(vec![community(), professional()]));
        let before = filter_prices(&start.products, start.interval);
        
        let monthly = start.clone().reduce(PlanAction::ShowMonthly);
        assert_ne!(filter_prices(&monthly.products, monthly.interval), before);
        
        let back = monthly.reduce(PlanAction::ShowYearly);
        assert_eq!(filter_prices(&back.products, back.interval), before);
        assert_eq!(back.filter_toggle, start.filter_toggle);
        assert_eq!(back.interval, start.interval);
    }

    #[test]
    fn test_free_plan_is_current_without_subscription() {
        let offers = filter_prices(&[community(), professional()], Interval::Year);
        assert!(is_subscribed_product(&offers[0], &[]));
        assert!(!is_subscribed_product(&offers[1], &[]));
        assert_eq!(current_plan_index(&offers, &[]), Some(0));
    }

    #[test]
    fn test_subscription_matches_by_name() {
        let offers = filter_prices(&[community(), professional()], Interval::Year);
        // Different price id, same product name: still current.
        let subs = vec![subscription_to("price_pro_month", "Professional plan")];
        
        assert!(!is_subscribed_product(&offers[0], &subs));
        assert!(is_subscribed_product(&offers[1], &subs));
        assert_eq!(current_plan_index(&offers, &subs), Some(1));
    }

    #[test]
    fn test_price_title() {
        let offers = filter_prices(&[community(), professional()], Interval::Year);
        assert_eq!(price_title(&offers[0]), "Free");
        assert_eq!(price_title(&offers[1]), "$150.00/year");
    }

    #[test]
    fn test_manage_requires_paid_subscription_and_organization() {
        let offers = filter_prices(&[community(), professional()], Interval::Year);
        let org = organization();
        
        // Community plan is current but never manageable
        assert!(!can_manage(&offers[0], &[], Some(&org)));
        
        let subs = vec![subscription_to("price_pro_year", "Professional plan")];
        assert!(can_manage(&offers[1], &subs, Some(&org)));
        assert!(!can_manage(&offers[1], &subs, None));
    }

    #[test]
    fn test_check_style() {
        assert_eq!(CheckStyle::for_plan(PROFESSIONAL_PLAN), CheckStyle::Highlight);
        assert_eq!(CheckStyle::for_plan(COMMUNITY_PLAN).css_class(), "check-storm");
    }
}
