//! UI Components

use leptos::prelude::*;

use billing_core::catalog::CheckStyle;
use billing_core::features::{feature_items, section_title, FeatureSection};
use billing_core::{CheckoutNotice, PlanOffer};

/// Check or cross in front of a feature line
#[component]
pub fn FeatureIcon(included: bool, style: CheckStyle) -> impl IntoView {
    let class = if included {
        format!("icon icon-check {}", style.css_class())
    } else {
        "icon icon-close close-red".to_string()
    };
    
    view! {
        <div class="icon-container">
            <span class=class></span>
        </div>
    }
}

/// One collapsible comparison section of a plan card.
/// Renders nothing when the plan has no features in the section.
#[component]
pub fn FeatureSectionList(
    section: FeatureSection,
    offer: PlanOffer,
    offers: Memo<Vec<PlanOffer>>,
) -> impl IntoView {
    let style = CheckStyle::for_plan(&offer.name);
    let title = section_title(&offer, section).unwrap_or_default().to_string();
    let name = offer.name.clone();
    
    move || {
        let items = offers.with(|offers| feature_items(section, &name, offers));
        (!items.is_empty()).then(|| {
            let title = title.clone();
            view! {
                <ul>
                    <li class="list-title">{title}</li>
                    {items
                        .into_iter()
                        .map(|item| {
                            view! {
                                <li>
                                    <FeatureIcon included=item.included style=style />
                                    {item.label}
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
            }
        })
    }
}

/// Upsell block after the plan cards
#[component]
pub fn EnterprisePlan() -> impl IntoView {
    view! {
        <div class="enterprise-plan">
            <h1 class="enterprise-title">"Need More?"</h1>
            <p class="enterprise-details">
                "We offer add-on options to increase your limits or the capacity of certain features for a period of time. Scroll down to learn more and purchase add-ons."
            </p>
            <p class="enterprise-details">
                "If your organization has larger or more specific needs, contact our team to learn about our enterprise options."
            </p>
            <div class="enterprise-link">
                <a href="/contact" target="_blank">"Get in touch for Enterprise options"</a>
            </div>
        </div>
    }
}

/// Dismissable success notification
#[component]
pub fn Toast(notice: RwSignal<Option<CheckoutNotice>>) -> impl IntoView {
    move || {
        notice.get().map(|current| {
            view! {
                <div class="toast toast-success" role="status">
                    <span>{current.message()}</span>
                    <button class="toast-close" on:click=move |_| notice.set(None)>"×"</button>
                </div>
            }
        })
    }
}
