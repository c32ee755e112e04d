//! Plan View State
//!
//! The page keeps one [`PlanState`] value and mutates it only through
//! [`PlanAction`] transitions.

use crate::model::{BaseSubscription, Interval, Organization, Product};

/// State of the plan page
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlanState {
    /// Raw catalog, empty until the first fetch resolves
    pub products: Vec<Product>,
    
    /// Organization the user acts for
    pub organization: Option<Organization>,
    
    /// Active subscriptions of the organization
    pub subscriptions: Vec<BaseSubscription>,
    
    /// Interval used to filter prices (starts on `year`)
    pub interval: Interval,
    
    /// Display toggle, flipped on every interval switch.
    /// `false` checks the "Annual" radio, `true` checks "Monthly".
    pub filter_toggle: bool,
}

/// Transitions of [`PlanState`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlanAction {
    LoadProducts(Vec<Product>),
    LoadOrganization(Option<Organization>),
    LoadSubscriptions(Vec<BaseSubscription>),
    ShowMonthly,
    ShowYearly,
}

impl PlanState {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Apply an action in place
    pub fn apply(&mut self, action: PlanAction) {
        match action {
            PlanAction::LoadProducts(products) => self.products = products,
            PlanAction::LoadOrganization(organization) => self.organization = organization,
            PlanAction::LoadSubscriptions(subscriptions) => self.subscriptions = subscriptions,
            PlanAction::ShowMonthly => self.switch_interval(Interval::Month),
            PlanAction::ShowYearly => self.switch_interval(Interval::Year),
        }
    }
    
    /// Consuming variant of [`PlanState::apply`]
    #[must_use]
    pub fn reduce(mut self, action: PlanAction) -> Self {
        self.apply(action);
        self
    }
    
    /// Whether the page has anything to render
    pub fn is_loaded(&self) -> bool {
        !self.products.is_empty()
    }
    
    /// Uid of the loaded organization
    pub fn organization_id(&self) -> Option<&str> {
        self.organization.as_ref().map(|org| org.id.as_str())
    }
    
    fn switch_interval(&mut self, interval: Interval) {
        self.interval = interval;
        self.filter_toggle = !self.filter_toggle;
    }
}
