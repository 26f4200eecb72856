//! Category-to-activity mapping.
//!
//! Pure functions turning a product-category code or name into ranked
//! search terms, a business domain, and a confidence score. No I/O: the
//! tables live in [`tables`].
//!
//! Precedence everywhere: exact code match, then exact name match, then
//! substring name match, then defaults.

pub mod tables;

use serde::{Deserialize, Serialize};
use tables::{CODE_MAPPINGS, CodeMapping, DEFAULT_ACTIVITIES, NAME_MAPPINGS, NameMapping, contextual_terms};

/// Business domain of a product category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BusinessDomain {
    Food,
    Retail,
    Services,
    Health,
    Education,
    Other,
}

/// Full mapping result for a category.
#[derive(Debug, Clone, Serialize)]
pub struct SmartMapping {
    /// Ranked activities from the direct mapping.
    pub primary_activities: Vec<String>,
    pub business_domain: BusinessDomain,
    /// Primary activities plus contextual expansion.
    pub all_suggestions: Vec<String>,
    /// Mapping confidence in [0, 1].
    pub confidence: f32,
}

fn find_code(code: Option<&str>) -> Option<&'static CodeMapping> {
    let code = code?.trim().to_uppercase();
    CODE_MAPPINGS.iter().find(|m| m.code == code)
}

/// Name lookup; the bool is true for an exact match.
fn find_name(name: Option<&str>) -> Option<(&'static NameMapping, bool)> {
    let name = name?.trim().to_lowercase();
    if name.is_empty() {
        return None;
    }

    if let Some(mapping) = NAME_MAPPINGS.iter().find(|m| m.name == name) {
        return Some((mapping, true));
    }

    NAME_MAPPINGS
        .iter()
        .find(|m| name.contains(m.name) || m.name.contains(name.as_str()))
        .map(|m| (m, false))
}

/// Ranked search activities for a category code and/or name.
pub fn map_category(code: Option<&str>, name: Option<&str>) -> Vec<String> {
    if let Some(mapping) = find_code(code) {
        return mapping.activities.iter().map(|a| a.to_string()).collect();
    }
    if let Some((mapping, _)) = find_name(name) {
        return mapping.activities.iter().map(|a| a.to_string()).collect();
    }
    DEFAULT_ACTIVITIES.iter().map(|a| a.to_string()).collect()
}

/// Business domain for a category, with keyword heuristics on the name
/// when no table entry matches.
pub fn classify_domain(code: Option<&str>, name: Option<&str>) -> BusinessDomain {
    if let Some(mapping) = find_code(code) {
        return mapping.domain;
    }
    if let Some((mapping, _)) = find_name(name) {
        return mapping.domain;
    }

    let name = name.unwrap_or("").to_lowercase();
    if name.contains("comida") || name.contains("café") || name.contains("cafe") {
        BusinessDomain::Food
    } else if name.contains("salud") || name.contains("farmacia") {
        BusinessDomain::Health
    } else if name.contains("educación") || name.contains("educacion") || name.contains("libro") {
        BusinessDomain::Education
    } else if name.contains("servicio") || name.contains("belleza") {
        BusinessDomain::Services
    } else {
        BusinessDomain::Retail
    }
}

/// Append up to five domain terms to `primary`, skipping duplicates.
pub fn expand_contextual(primary: &[String], domain: BusinessDomain) -> Vec<String> {
    let mut all: Vec<String> = primary.to_vec();
    for term in contextual_terms(domain).iter().take(5) {
        if !all.iter().any(|a| a == term) {
            all.push(term.to_string());
        }
    }
    all
}

/// Full mapping: activities, domain, expanded suggestions, confidence.
///
/// Confidence: the table value on an exact code hit; 0.8 on an exact name
/// hit; 0.6 when the fallback still produced more than one activity; 0.5
/// otherwise.
pub fn smart_mapping(code: Option<&str>, name: Option<&str>) -> SmartMapping {
    let primary = map_category(code, name);
    let domain = classify_domain(code, name);
    let all = expand_contextual(&primary, domain);

    let confidence = if let Some(mapping) = find_code(code) {
        mapping.confidence
    } else if matches!(find_name(name), Some((_, true))) {
        0.8
    } else if primary.len() > 1 {
        0.6
    } else {
        0.5
    };

    SmartMapping { primary_activities: primary, business_domain: domain, all_suggestions: all, confidence }
}
