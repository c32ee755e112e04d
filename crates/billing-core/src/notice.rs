//! Post-checkout Notice
//!
//! After a successful checkout the payment provider sends the user back to
//! `/plans?checkout=<price_id>`. Once the subscriptions have been refetched
//! the page thanks the user, with wording that depends on whether the new
//! price already shows up.

use crate::model::BaseSubscription;

/// Query parameter carrying the purchased price id
pub const CHECKOUT_PARAM: &str = "checkout";

/// Success notice shown after returning from checkout
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckoutNotice {
    /// Subscriptions already contain the purchased price
    Confirmed,
    /// Webhook has not caught up yet
    Pending,
}

impl CheckoutNotice {
    pub fn message(&self) -> &'static str {
        match self {
            CheckoutNotice::Confirmed => {
                "Thanks for your upgrade! We appreciate your continued support. Reach out to our billing team if you have any questions about your plan."
            }
            CheckoutNotice::Pending => {
                "Thanks for your upgrade! We appreciate your continued support. If your account is not immediately updated, wait a few minutes and refresh the page."
            }
        }
    }
}

/// Pick the notice for a returned checkout of `price_id`
pub fn checkout_notice(price_id: &str, subscriptions: &[BaseSubscription]) -> CheckoutNotice {
    if subscriptions.iter().any(|sub| sub.has_price(price_id)) {
        CheckoutNotice::Confirmed
    } else {
        CheckoutNotice::Pending
    }
}

/// Watches subscription updates and emits a notice for returned checkouts.
///
/// The first observation happens on mount, before anything was fetched, and
/// never produces a notice.
#[derive(Debug, Default)]
pub struct CheckoutWatcher {
    mounted: bool,
}

impl CheckoutWatcher {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Feed the current `checkout` query value and subscriptions
    pub fn observe(&mut self, checkout: Option<&str>, subscriptions: &[BaseSubscription]) -> Option<CheckoutNotice> {
        if !self.mounted {
            self.mounted = true;
            return None;
        }
        let price_id = checkout.filter(|id| !id.is_empty())?;
        let notice = checkout_notice(price_id, subscriptions);
        tracing::debug!("Returned from checkout of {}: {:?}", price_id, notice);
        Some(notice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::subscription_to;

    #[test]
    fn test_notice_wording_depends_on_subscriptions() {
        let subs = vec![subscription_to("price_pro_year", "Professional plan")];
        assert_eq!(checkout_notice("price_pro_year", &subs), CheckoutNotice::Confirmed);
        assert_eq!(checkout_notice("price_pro_month", &subs), CheckoutNotice::Pending);
        assert_eq!(checkout_notice("price_pro_year", &[]), CheckoutNotice::Pending);
        assert!(CheckoutNotice::Confirmed.message().contains("billing team"));
    }

    #[test]
    fn test_watcher_skips_mount() {
        let mut watcher = CheckoutWatcher::new();
        assert_eq!(watcher.observe(Some("price_pro_year"), &[]), None);
        assert_eq!(watcher.observe(Some("price_pro_year"), &[]), Some(CheckoutNotice::Pending));
        
        let subs = vec![subscription_to("price_pro_year", "Professional plan")];
        assert_eq!(watcher.observe(Some("price_pro_year"), &subs), Some(CheckoutNotice::Confirmed));
    }

    #[test]
    fn test_watcher_ignores_plain_visits() {
        let mut watcher = CheckoutWatcher::new();
        watcher.observe(None, &[]);
        assert_eq!(watcher.observe(None, &[]), None);
        assert_eq!(watcher.observe(Some(""), &[]), None);
    }
}
