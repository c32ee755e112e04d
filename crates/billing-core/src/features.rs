//! Metadata Feature Lists
//!
//! Plan features are not typed fields: they are encoded in product metadata
//! by naming convention.
//!
//! ```text
//! feature_<section>_<id>        = "Label shown to the user"
//! feature_<section>_check_<id>  = "true" | "false"
//! feature_<section>_title       = "Section heading"
//! ```
//!
//! A feature without its `check` key is not shown at all.

use serde::{Deserialize, Serialize};

use crate::model::PlanOffer;

/// Feature section of a plan card
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSection {
    /// Always-visible bullet list
    List,
    Support,
    Advanced,
    Addons,
}

impl FeatureSection {
    /// Sections of the collapsible comparison, in display order
    pub const COMPARISON: [FeatureSection; 3] = [
        FeatureSection::Support,
        FeatureSection::Advanced,
        FeatureSection::Addons,
    ];
    
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureSection::List => "list",
            FeatureSection::Support => "support",
            FeatureSection::Advanced => "advanced",
            FeatureSection::Addons => "addons",
        }
    }
    
    fn prefix(self) -> String {
        format!("feature_{}_", self.as_str())
    }
    
    fn check_prefix(self) -> String {
        format!("feature_{}_check", self.as_str())
    }
}

/// One line of a feature section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureItem {
    /// Check mark (`true`) or cross (`false`)
    pub included: bool,
    
    pub label: String,
}

/// Sort key of a feature `<id>`: numeric ids first, in numeric order, then
/// the rest in string order.
fn id_order(id: &str) -> (bool, u64, &str) {
    match id.parse::<u64>() {
        Ok(n) => (false, n, id),
        Err(_) => (true, 0, id),
    }
}

fn feature_id(key: &str) -> &str {
    key.rsplit('_').next().unwrap_or_default()
}

/// Collect the features of `section` for the plan named `plan_name`.
///
/// Features of one plan are ordered by `<id>` (`_2` before `_10`).
pub fn feature_items(section: FeatureSection, plan_name: &str, offers: &[PlanOffer]) -> Vec<FeatureItem> {
    let prefix = section.prefix();
    let check_prefix = section.check_prefix();
    
    let mut items = Vec::new();
    for offer in offers.iter().filter(|offer| offer.name == plan_name) {
        let mut found = Vec::new();
        for key in offer.metadata.keys() {
            if !key.starts_with(&prefix) || key.starts_with(&check_prefix) {
                continue;
            }
            let id = feature_id(key);
            
            let Some(label) = offer.metadata.get(&format!("{prefix}{id}")) else {
                continue;
            };
            let Some(check) = offer.metadata.get(&format!("{check_prefix}_{id}")) else {
                continue;
            };
            
            found.push((
                id,
                FeatureItem {
                    included: parse_check(key, check),
                    label: label.clone(),
                },
            ));
        }
        found.sort_by(|(a, _), (b, _)| id_order(a).cmp(&id_order(b)));
        items.extend(found.into_iter().map(|(_, item)| item));
    }
    items
}

fn parse_check(key: &str, value: &str) -> bool {
    match serde_json::from_str::<bool>(value.trim()) {
        Ok(included) => included,
        Err(e) => {
            tracing::warn!("Invalid check flag for {}: {:?} ({})", key, value, e);
            false
        }
    }
}

/// Labels of the always-visible `feature_list_*` bullets, ordered by `<id>`
pub fn headline_features(offer: &PlanOffer) -> Vec<String> {
    let prefix = FeatureSection::List.prefix();
    let mut bullets: Vec<_> = offer
        .metadata
        .iter()
        .filter(|(key, _)| key.starts_with(&prefix))
        .map(|(key, label)| (feature_id(key), label))
        .collect();
    bullets.sort_by(|(a, _), (b, _)| id_order(a).cmp(&id_order(b)));
    bullets.into_iter().map(|(_, label)| label.clone()).collect()
}

/// Heading of a comparison section (`feature_<section>_title`)
pub fn section_title(offer: &PlanOffer, section: FeatureSection) -> Option<&str> {
    offer
        .metadata
        .get(&format!("{}title", section.prefix()))
        .map(String::as_str)
}

fn is_comparison_key(key: &str) -> bool {
    ["feature_support_", "feature_advanced_", "feature_addon_", "feature_addons_"]
        .iter()
        .any(|prefix| key.contains(prefix))
}

/// Whether the "Display full comparison" control is shown.
///
/// Every scanned metadata key overwrites the decision, so only the last key
/// of the last offer counts.
pub fn shows_comparison(offers: &[PlanOffer]) -> bool {
    let mut show = false;
    for offer in offers {
        for key in offer.metadata.keys() {
            show = is_comparison_key(key);
        }
    }
    show
}
