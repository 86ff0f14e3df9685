//! Deterministic risk scoring: a pure function from a component's flag set
//! (plus its model name) to a bounded score and severity band.
//!
//! Must run strictly after every flag-mutation pass; scoring earlier
//! silently under-counts.

use crate::model::{AIComponent, RiskAssessment, Severity};
use crate::taxonomy::flags::{self, flag_info};
use crate::taxonomy::patterns::is_deprecated_model;

/// Score a component from its accumulated flags.
///
/// Each distinct flag present in the registry contributes its weight once;
/// unknown flags contribute zero and are silently ignored. A model name in
/// the deprecated set adds the `deprecated_model` weight again, independent
/// of whether the flag is also set — this double count matches the long-
/// standing observed behavior and is kept deliberately.
pub fn score(component: &AIComponent) -> RiskAssessment {
    let mut total: u32 = 0;
    let mut factors = Vec::new();
    let mut owasp: Vec<String> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();

    for flag in &component.flags {
        if seen.iter().any(|s| s == flag) {
            continue;
        }
        seen.push(flag);

        let Some(info) = flag_info(flag) else {
            continue;
        };
        total = total.saturating_add(info.weight);
        factors.push(format!("{} (+{})", info.description, info.weight));
        for category in info.owasp_categories {
            if !owasp.iter().any(|c| c == category) {
                owasp.push((*category).to_string());
            }
        }
    }

    if !component.model_name.is_empty() && is_deprecated_model(&component.model_name) {
        if let Some(info) = flag_info(flags::DEPRECATED_MODEL) {
            total = total.saturating_add(info.weight);
            factors.push(format!(
                "Deprecated model '{}' (+{})",
                component.model_name, info.weight
            ));
            for category in info.owasp_categories {
                if !owasp.iter().any(|c| c == category) {
                    owasp.push((*category).to_string());
                }
            }
        }
    }

    let score = total.min(100);
    RiskAssessment {
        score,
        severity: Severity::from_score(score),
        factors,
        owasp_categories: owasp,
    }
}

/// Score every component in place. Call once, after all analysis passes.
pub fn score_all(components: &mut [AIComponent]) {
    for component in components.iter_mut() {
        component.risk = score(component);
    }
}
