//! Plan Actions
//!
//! Fetching plan data and the two outbound actions of the page: starting a
//! checkout for an upgrade and opening the customer billing portal. Both
//! actions end in a full-page redirect.
//!
//! The browser specifics sit behind [`BillingApi`], [`Navigator`] and
//! [`ActionGuard`] so the flow can run against fakes in tests.

use async_trait::async_trait;
use std::cell::Cell;

use crate::error::{BillingError, Result};
use crate::model::{
    BaseSubscription, ListResponse, Organization, Product, RedirectResponse,
};
use crate::state::PlanAction;

/// Shown when the backend answers without a redirect URL
pub const REDIRECT_FAILED_MESSAGE: &str = "There has been an issue, please try again later.";

/// Billing backend consumed by the plan page
#[async_trait(?Send)]
pub trait BillingApi {
    /// Catalog products with their prices
    async fn get_products(&self) -> Result<ListResponse<Product>>;
    
    /// Organizations of the current user
    async fn get_organization(&self) -> Result<ListResponse<Organization>>;
    
    /// Active subscriptions of the current organization
    async fn get_subscription(&self) -> Result<ListResponse<BaseSubscription>>;
    
    /// Create a checkout session for `price_id`
    async fn post_checkout(&self, price_id: &str, organization_id: &str) -> Result<RedirectResponse>;
    
    /// Create a customer portal session
    async fn post_customer_portal(&self, organization_id: &str) -> Result<RedirectResponse>;
}

/// Browser navigation
pub trait Navigator {
    /// Full-page navigation to `url`
    fn redirect(&self, url: &str);
    
    /// Blocking alert
    fn alert(&self, message: &str);
}

/// Disabled flag shared by the action buttons
pub trait ActionGuard {
    fn is_disabled(&self) -> bool;
    fn set_disabled(&self, disabled: bool);
}

impl ActionGuard for Cell<bool> {
    fn is_disabled(&self) -> bool {
        self.get()
    }
    
    fn set_disabled(&self, disabled: bool) {
        self.set(disabled);
    }
}

/// What an action ended up doing
#[derive(Debug)]
pub enum ActionOutcome {
    /// Missing input or another action in flight
    Skipped,
    /// Browser sent to the returned URL
    Redirected(String),
    /// Backend returned no URL, user was alerted
    Alerted,
    /// Request failed
    Failed(BillingError),
}

/// Start a checkout for `price_id`.
///
/// No-op without a price id or while the buttons are disabled. The disabled
/// flag is toggled once the request settles.
pub async fn upgrade<A, N, G>(
    api: &A,
    navigator: &N,
    guard: &G,
    price_id: Option<&str>,
    organization: Option<&Organization>,
) -> ActionOutcome
where
    A: BillingApi + ?Sized,
    N: Navigator + ?Sized,
    G: ActionGuard + ?Sized,
{
    let Some(price_id) = price_id.filter(|id| !id.is_empty()) else {
        return ActionOutcome::Skipped;
    };
    if guard.is_disabled() {
        return ActionOutcome::Skipped;
    }
    guard.set_disabled(true);
    
    let outcome = match organization {
        Some(org) => {
            tracing::info!("Starting checkout for {} ({})", price_id, org.id);
            settle(api.post_checkout(price_id, &org.id).await, navigator)
        }
        None => ActionOutcome::Failed(BillingError::MissingOrganization),
    };
    
    // TODO: clear the flag instead of toggling once interleaved actions are ruled out
    guard.set_disabled(!guard.is_disabled());
    outcome
}

/// Open the customer billing portal.
///
/// Same contract as [`upgrade`], skipped when no organization is loaded.
pub async fn manage_plan<A, N, G>(
    api: &A,
    navigator: &N,
    guard: &G,
    organization: Option<&Organization>,
) -> ActionOutcome
where
    A: BillingApi + ?Sized,
    N: Navigator + ?Sized,
    G: ActionGuard + ?Sized,
{
    let Some(org) = organization.filter(|org| !org.id.is_empty()) else {
        return ActionOutcome::Skipped;
    };
    if guard.is_disabled() {
        return ActionOutcome::Skipped;
    }
    guard.set_disabled(true);
    
    tracing::info!("Opening customer portal for {}", org.id);
    let outcome = settle(api.post_customer_portal(&org.id).await, navigator);
    
    guard.set_disabled(!guard.is_disabled());
    outcome
}

fn settle<N: Navigator + ?Sized>(response: Result<RedirectResponse>, navigator: &N) -> ActionOutcome {
    match response {
        Ok(RedirectResponse { url: Some(url) }) if !url.is_empty() => {
            navigator.redirect(&url);
            ActionOutcome::Redirected(url)
        }
        Ok(_) => {
            tracing::warn!("Billing backend returned no redirect URL");
            navigator.alert(REDIRECT_FAILED_MESSAGE);
            ActionOutcome::Alerted
        }
        Err(e) => {
            tracing::error!("Billing request failed: {}", e);
            ActionOutcome::Failed(e)
        }
    }
}

/// Fetch the catalog
pub async fn load_products<A: BillingApi + ?Sized>(api: &A) -> Result<PlanAction> {
    let response = api.get_products().await?;
    Ok(PlanAction::LoadProducts(response.results))
}

/// Fetch the organization (first result)
pub async fn load_organization<A: BillingApi + ?Sized>(api: &A) -> Result<PlanAction> {
    let response = api.get_organization().await?;
    Ok(PlanAction::LoadOrganization(response.results.into_iter().next()))
}

/// Fetch the subscriptions
pub async fn load_subscriptions<A: BillingApi + ?Sized>(api: &A) -> Result<PlanAction> {
    let response = api.get_subscription().await?;
    Ok(PlanAction::LoadSubscriptions(response.results))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{filter_prices, is_subscribed_product, price_title};
    use crate::fixtures::{community, organization, professional};
    use crate::model::Interval;
    use crate::state::PlanState;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Canned backend recording the posts it receives
    #[derive(Default)]
    struct FakeBilling {
        products: Vec<Product>,
        organizations: Vec<Organization>,
        subscriptions: Vec<BaseSubscription>,
        redirect: Option<String>,
        fail_subscriptions: bool,
        reset_during_post: Option<Rc<Cell<bool>>>,
        posts: RefCell<Vec<String>>,
    }

    #[async_trait(?Send)]
    impl BillingApi for FakeBilling {
        async fn get_products(&self) -> Result<ListResponse<Product>> {
            Ok(ListResponse::new(self.products.clone()))
        }
        
        async fn get_organization(&self) -> Result<ListResponse<Organization>> {
            Ok(ListResponse::new(self.organizations.clone()))
        }
        
        async fn get_subscription(&self) -> Result<ListResponse<BaseSubscription>> {
            if self.fail_subscriptions {
                return Err(BillingError::Status { status: 500, message: "boom".into() });
            }
            Ok(ListResponse::new(self.subscriptions.clone()))
        }
        
        async fn post_checkout(&self, price_id: &str, organization_id: &str) -> Result<RedirectResponse> {
            self.posts.borrow_mut().push(format!("checkout:{price_id}:{organization_id}"));
            if let Some(flag) = &self.reset_during_post {
                flag.set(false);
            }
            Ok(RedirectResponse { url: self.redirect.clone() })
        }
        
        async fn post_customer_portal(&self, organization_id: &str) -> Result<RedirectResponse> {
            self.posts.borrow_mut().push(format!("portal:{organization_id}"));
            Ok(RedirectResponse { url: self.redirect.clone() })
        }
    }

    #[derive(Default)]
    struct FakeNavigator {
        redirects: RefCell<Vec<String>>,
        alerts: RefCell<Vec<String>>,
    }

    impl Navigator for FakeNavigator {
        fn redirect(&self, url: &str) {
            self.redirects.borrow_mut().push(url.to_string());
        }
        
        fn alert(&self, message: &str) {
            self.alerts.borrow_mut().push(message.to_string());
        }
    }

    /// Run all three fetches and keep the ones that succeeded
    async fn load_plan_data<A: BillingApi + ?Sized>(api: &A) -> Vec<PlanAction> {
        let results = [
            load_products(api).await,
            load_organization(api).await,
            load_subscriptions(api).await,
        ];
        results.into_iter().filter_map(|result| result.ok()).collect()
    }

    fn backend() -> FakeBilling {
        FakeBilling {
            products: vec![community(), professional()],
            organizations: vec![organization()],
            redirect: Some("https://checkout.stripe.com/c/pay/cs_test".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_upgrade_redirects() {
        let api = backend();
        let nav = FakeNavigator::default();
        let guard = Cell::new(false);
        let org = organization();
        
        let outcome = upgrade(&api, &nav, &guard, Some("price_pro_year"), Some(&org)).await;
        
        assert!(matches!(outcome, ActionOutcome::Redirected(ref url) if url.contains("cs_test")));
        assert_eq!(api.posts.borrow().as_slice(), ["checkout:price_pro_year:orgTEST123"]);
        assert_eq!(nav.redirects.borrow().len(), 1);
        assert!(!guard.get());
    }

    #[tokio::test]
    async fn test_upgrade_without_price_is_noop() {
        let api = backend();
        let nav = FakeNavigator::default();
        let guard = Cell::new(false);
        let org = organization();
        
        assert!(matches!(upgrade(&api, &nav, &guard, None, Some(&org)).await, ActionOutcome::Skipped));
        assert!(matches!(upgrade(&api, &nav, &guard, Some(""), Some(&org)).await, ActionOutcome::Skipped));
        assert!(api.posts.borrow().is_empty());
        assert!(!guard.get());
    }

    #[tokio::test]
    async fn test_disabled_buttons_block_actions() {
        let api = backend();
        let nav = FakeNavigator::default();
        let guard = Cell::new(true);
        let org = organization();
        
        assert!(matches!(
            upgrade(&api, &nav, &guard, Some("price_pro_year"), Some(&org)).await,
            ActionOutcome::Skipped
        ));
        assert!(matches!(manage_plan(&api, &nav, &guard, Some(&org)).await, ActionOutcome::Skipped));
        assert!(api.posts.borrow().is_empty());
        assert!(guard.get());
    }

    #[tokio::test]
    async fn test_missing_url_alerts() {
        let api = FakeBilling { redirect: None, ..backend() };
        let nav = FakeNavigator::default();
        let guard = Cell::new(false);
        let org = organization();
        
        let outcome = manage_plan(&api, &nav, &guard, Some(&org)).await;
        
        assert!(matches!(outcome, ActionOutcome::Alerted));
        assert_eq!(nav.alerts.borrow().as_slice(), [REDIRECT_FAILED_MESSAGE]);
        assert!(nav.redirects.borrow().is_empty());
        assert_eq!(api.posts.borrow().as_slice(), ["portal:orgTEST123"]);
    }

    #[tokio::test]
    async fn test_guard_is_toggled_not_cleared() {
        let guard = Rc::new(Cell::new(false));
        let api = FakeBilling { reset_during_post: Some(guard.clone()), ..backend() };
        let nav = FakeNavigator::default();
        let org = organization();
        
        upgrade(&api, &nav, &*guard, Some("price_pro_year"), Some(&org)).await;
        
        // Flag was cleared while the request was in flight, so the toggle
        // leaves the buttons disabled.
        assert!(guard.get());
    }

    #[tokio::test]
    async fn test_upgrade_without_organization_fails() {
        let api = backend();
        let nav = FakeNavigator::default();
        let guard = Cell::new(false);
        
        let outcome = upgrade(&api, &nav, &guard, Some("price_pro_year"), None).await;
        
        assert!(matches!(outcome, ActionOutcome::Failed(BillingError::MissingOrganization)));
        assert!(api.posts.borrow().is_empty());
        assert!(nav.redirects.borrow().is_empty());
        assert!(nav.alerts.borrow().is_empty());
        assert!(!guard.get());
    }

    #[tokio::test]
    async fn test_manage_without_organization_is_noop() {
        let api = backend();
        let nav = FakeNavigator::default();
        let guard = Cell::new(false);
        
        assert!(matches!(manage_plan(&api, &nav, &guard, None).await, ActionOutcome::Skipped));
        assert!(api.posts.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_state() {
        let api = FakeBilling { fail_subscriptions: true, ..backend() };
        
        let actions = load_plan_data(&api).await;
        assert_eq!(actions.len(), 2);
        
        let state = actions.into_iter().fold(PlanState::new(), PlanState::reduce);
        assert!(state.is_loaded());
        assert_eq!(state.organization_id(), Some("orgTEST123"));
        assert!(state.subscriptions.is_empty());
    }

    #[tokio::test]
    async fn test_free_and_paid_plans_end_to_end() {
        let api = FakeBilling { redirect: None, ..backend() };
        let nav = FakeNavigator::default();
        let guard = Cell::new(false);
        
        let state = load_plan_data(&api)
            .await
            .into_iter()
            .fold(PlanState::new(), PlanState::reduce);
        assert_eq!(state.interval, Interval::Year);
        
        let offers = filter_prices(&state.products, state.interval);
        assert_eq!(offers.len(), 2);
        assert_eq!(price_title(&offers[0]), "Free");
        assert!(is_subscribed_product(&offers[0], &state.subscriptions));
        // Paid plan is not current, so its card shows "Upgrade"
        assert!(!is_subscribed_product(&offers[1], &state.subscriptions));
        
        let outcome = upgrade(&api, &nav, &guard, None, state.organization.as_ref()).await;
        assert!(matches!(outcome, ActionOutcome::Skipped));
        assert!(api.posts.borrow().is_empty());
        assert!(nav.alerts.borrow().is_empty());
    }
}
