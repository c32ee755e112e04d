//! Plan Page
//!
//! Lists the catalog for the selected billing interval, marks the current
//! plan and offers upgrade / manage actions.

use leptos::logging;
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use billing_core::actions::{self, ActionGuard};
use billing_core::catalog::{can_manage, current_plan_index, is_subscribed_product, price_title, CheckStyle};
use billing_core::features::{headline_features, shows_comparison, FeatureSection};
use billing_core::notice::CHECKOUT_PARAM;
use billing_core::{
    filter_prices, ActionOutcome, CheckoutNotice, CheckoutWatcher, Interval, PlanAction, PlanOffer,
    PlanState,
};

use crate::api::{BrowserNavigator, HttpBillingApi};
use crate::components::{EnterprisePlan, FeatureIcon, FeatureSectionList, Toast};

/// Button disabled flag backed by a signal
#[derive(Clone, Copy)]
struct SignalGuard(RwSignal<bool>);

impl ActionGuard for SignalGuard {
    fn is_disabled(&self) -> bool {
        self.0.get_untracked()
    }
    
    fn set_disabled(&self, disabled: bool) {
        self.0.set(disabled);
    }
}

/// Surface failed actions in the browser console
fn report(action: &str, outcome: &ActionOutcome) {
    match outcome {
        ActionOutcome::Failed(e) => logging::error!("{} failed: {}", action, e),
        ActionOutcome::Alerted => logging::warn!("{} returned no redirect URL", action),
        ActionOutcome::Skipped | ActionOutcome::Redirected(_) => {}
    }
}

#[component]
pub fn PlanPage() -> impl IntoView {
    let state = RwSignal::new(PlanState::new());
    let subscriptions_loaded = RwSignal::new(0_u32);
    let buttons_disabled = RwSignal::new(false);
    let expand_comparison = RwSignal::new(false);
    let show_expand = RwSignal::new(false);
    let notice = RwSignal::new(None::<CheckoutNotice>);
    let watcher = StoredValue::new(CheckoutWatcher::new());
    let query = use_query_map();

    // Three independent fetches; each slice renders as soon as it arrives
    leptos::task::spawn_local(async move {
        match actions::load_products(&HttpBillingApi::from_window()).await {
            Ok(action) => state.update(|s| s.apply(action)),
            Err(e) => logging::warn!("Failed to load products: {}", e),
        }
    });
    leptos::task::spawn_local(async move {
        match actions::load_organization(&HttpBillingApi::from_window()).await {
            Ok(action) => state.update(|s| s.apply(action)),
            Err(e) => logging::warn!("Failed to load organization: {}", e),
        }
    });
    leptos::task::spawn_local(async move {
        match actions::load_subscriptions(&HttpBillingApi::from_window()).await {
            Ok(action) => {
                state.update(|s| s.apply(action));
                subscriptions_loaded.update(|n| *n += 1);
            }
            Err(e) => logging::warn!("Failed to load subscriptions: {}", e),
        }
    });

    let products = Memo::new(move |_| state.with(|s| s.products.clone()));
    let offers = Memo::new(move |_| state.with(|s| filter_prices(&s.products, s.interval)));

    // Expand control follows the catalog only, not the interval
    Effect::new(move |_| {
        let products = products.get();
        if products.is_empty() {
            return;
        }
        let interval = state.with_untracked(|s| s.interval);
        show_expand.set(shows_comparison(&filter_prices(&products, interval)));
    });

    // Thank-you notice when coming back from checkout
    Effect::new(move |_| {
        subscriptions_loaded.track();
        let checkout = query.with_untracked(|q| q.get(CHECKOUT_PARAM));
        let subscriptions = state.with_untracked(|s| s.subscriptions.clone());
        let next = watcher
            .try_update_value(|w| w.observe(checkout.as_deref(), &subscriptions))
            .flatten();
        if next.is_some() {
            notice.set(next);
        }
    });

    let on_upgrade = Callback::new(move |price_id: String| {
        let organization = state.with_untracked(|s| s.organization.clone());
        leptos::task::spawn_local(async move {
            let api = HttpBillingApi::from_window();
            let outcome = actions::upgrade(
                &api,
                &BrowserNavigator,
                &SignalGuard(buttons_disabled),
                Some(&price_id),
                organization.as_ref(),
            )
            .await;
            report("Checkout", &outcome);
        });
    });

    let on_manage = Callback::new(move |()| {
        let organization = state.with_untracked(|s| s.organization.clone());
        leptos::task::spawn_local(async move {
            let api = HttpBillingApi::from_window();
            let outcome =
                actions::manage_plan(&api, &BrowserNavigator, &SignalGuard(buttons_disabled), organization.as_ref())
                    .await;
            report("Customer portal", &outcome);
        });
    });

    let current_index = move || {
        state.with(|s| offers.with(|offers| current_plan_index(offers, &s.subscriptions)))
    };

    view! {
        <Toast notice=notice />
        <Show when=move || state.with(PlanState::is_loaded)>
            <div class="account-plan">
                <div class="plans-section">
                    <form class="interval-toggle">
                        <input
                            type="radio"
                            id="switch_left"
                            name="switchToggle"
                            value=Interval::Year.as_str()
                            on:change=move |_| state.update(|s| s.apply(PlanAction::ShowYearly))
                            prop:checked=move || !state.with(|s| s.filter_toggle)
                        />
                        <label for="switch_left">"Annual"</label>

                        <input
                            type="radio"
                            id="switch_right"
                            name="switchToggle"
                            value=Interval::Month.as_str()
                            on:change=move |_| state.update(|s| s.apply(PlanAction::ShowMonthly))
                            prop:checked=move || state.with(|s| s.filter_toggle)
                        />
                        <label for="switch_right">"Monthly"</label>
                    </form>

                    <div
                        class="current-plan"
                        style:grid-row="0"
                        style:grid-column=move || {
                            current_index().map(|i| (i + 1).to_string()).unwrap_or_default()
                        }
                        style:display=move || if current_index().is_some() { "" } else { "none" }
                    >
                        "your plan"
                    </div>

                    <For
                        each=move || offers.get()
                        key=|offer| offer.price.id.clone()
                        children=move |offer| {
                            view! {
                                <PlanCard
                                    offer=offer
                                    offers=offers
                                    state=state
                                    buttons_disabled=buttons_disabled
                                    expand_comparison=expand_comparison
                                    on_upgrade=on_upgrade
                                    on_manage=on_manage
                                />
                            }
                        }
                    />

                    <EnterprisePlan />
                </div>

                <Show when=move || show_expand.get()>
                    <div
                        class="expand-btn"
                        role="button"
                        on:click=move |_| expand_comparison.update(|open| *open = !*open)
                    >
                        {move || {
                            if expand_comparison.get() { "Collapse" } else { "Display full comparison" }
                        }}
                    </div>
                </Show>
            </div>
        </Show>
    }
}

/// Card of a single plan
#[component]
fn PlanCard(
    offer: PlanOffer,
    offers: Memo<Vec<PlanOffer>>,
    state: RwSignal<PlanState>,
    buttons_disabled: RwSignal<bool>,
    expand_comparison: RwSignal<bool>,
    on_upgrade: Callback<String>,
    on_manage: Callback<()>,
) -> impl IntoView {
    let style = CheckStyle::for_plan(&offer.name);
    let headline = headline_features(&offer);
    let title = price_title(&offer);
    let name = offer.name.clone();
    let price_id = offer.price.id.clone();
    let offer = StoredValue::new(offer);

    let subscribed = move || {
        state.with(|s| offer.with_value(|o| is_subscribed_product(o, &s.subscriptions)))
    };
    let manageable = move || {
        state.with(|s| offer.with_value(|o| can_manage(o, &s.subscriptions, s.organization.as_ref())))
    };

    view! {
        <div class="plan-container">
            <h1 class="price-name">{name.clone()}</h1>
            <div class="price-title">{title}</div>

            <ul>
                {headline
                    .into_iter()
                    .map(|label| {
                        view! {
                            <li>
                                <FeatureIcon included=true style=style />
                                {label}
                            </li>
                        }
                    })
                    .collect_view()}
            </ul>

            <Show when=move || !subscribed()>
                {
                    let price_id = price_id.clone();
                    let label = format!("upgrade to {}", offer.with_value(|o| o.name.clone()));
                    view! {
                        <button
                            class="reset-button upgrade-btn"
                            on:click=move |_| on_upgrade.run(price_id.clone())
                            aria-label=label
                            disabled=move || buttons_disabled.get()
                            aria-disabled=move || buttons_disabled.get().to_string()
                        >
                            "Upgrade"
                        </button>
                    }
                }
            </Show>

            <Show when=manageable>
                <button
                    class="reset-button manage-btn"
                    on:click=move |_| on_manage.run(())
                    disabled=move || buttons_disabled.get()
                    aria-disabled=move || buttons_disabled.get().to_string()
                    aria-label=move || offer.with_value(|o| format!("manage your {} subscription", o.name))
                >
                    "Manage"
                </button>
            </Show>

            <Show when=move || expand_comparison.get()>
                <div>
                    <div class="line"></div>
                    {FeatureSection::COMPARISON
                        .into_iter()
                        .map(|section| {
                            view! {
                                <FeatureSectionList
                                    section=section
                                    offer=offer.get_value()
                                    offers=offers
                                />
                            }
                        })
                        .collect_view()}
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billing_core::BillingError;

    #[test]
    fn test_report_covers_every_outcome() {
        report("Checkout", &ActionOutcome::Failed(BillingError::MissingOrganization));
        report("Checkout", &ActionOutcome::Alerted);
        report("Checkout", &ActionOutcome::Skipped);
        report("Customer portal", &ActionOutcome::Redirected("https://billing.stripe.com".into()));
    }
}
