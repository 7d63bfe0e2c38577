//! Property vocabularies: property types, amenities, and highlights.
//!
//! Stored as TEXT / TEXT[] columns holding the canonical names listed here.
//! User input goes through [`normalize_amenity`] / [`normalize_highlight`],
//! which fold case, strip separators, and resolve common synonyms.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Canonical vocabularies
// ---------------------------------------------------------------------------

/// Valid `property_type` values.
pub const PROPERTY_TYPES: &[&str] = &[
    "Rooms",
    "Tinyhouse",
    "Apartment",
    "Villa",
    "Townhouse",
    "Cottage",
];

/// Valid amenity names.
pub const AMENITIES: &[&str] = &[
    "WasherDryer",
    "AirConditioning",
    "Dishwasher",
    "HighSpeedInternet",
    "HardwoodFloors",
    "WalkInClosets",
    "Microwave",
    "Refrigerator",
    "Pool",
    "Gym",
    "Parking",
    "PetsAllowed",
    "WiFi",
];

/// Valid highlight names.
pub const HIGHLIGHTS: &[&str] = &[
    "HighSpeedInternetAccess",
    "WasherDryer",
    "AirConditioning",
    "Heating",
    "SmokeFree",
    "CableReady",
    "SatelliteTV",
    "DoubleVanities",
    "TubShower",
    "Intercom",
    "SprinklerSystem",
    "RecentlyRenovated",
    "CloseToTransit",
    "GreatView",
    "QuietNeighborhood",
];

/// Folded input token -> canonical amenity.
const AMENITY_SYNONYMS: &[(&str, &str)] = &[
    ("wifi", "WiFi"),
    ("wireless", "WiFi"),
    ("ac", "AirConditioning"),
    ("aircon", "AirConditioning"),
    ("airconditioning", "AirConditioning"),
    ("airconditioner", "AirConditioning"),
    ("washer", "WasherDryer"),
    ("dryer", "WasherDryer"),
    ("laundry", "WasherDryer"),
    ("internet", "HighSpeedInternet"),
    ("broadband", "HighSpeedInternet"),
    ("hardwood", "HardwoodFloors"),
    ("closets", "WalkInClosets"),
    ("fridge", "Refrigerator"),
    ("swimmingpool", "Pool"),
    ("fitness", "Gym"),
    ("garage", "Parking"),
    ("pets", "PetsAllowed"),
    ("petfriendly", "PetsAllowed"),
];

/// Folded input token -> canonical highlight.
const HIGHLIGHT_SYNONYMS: &[(&str, &str)] = &[
    ("internet", "HighSpeedInternetAccess"),
    ("wifi", "HighSpeedInternetAccess"),
    ("ac", "AirConditioning"),
    ("airconditioning", "AirConditioning"),
    ("washer", "WasherDryer"),
    ("nosmoking", "SmokeFree"),
    ("renovated", "RecentlyRenovated"),
    ("transit", "CloseToTransit"),
    ("view", "GreatView"),
    ("quiet", "QuietNeighborhood"),
];

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// Lower-case a token and drop whitespace, `-` and `_`.
fn fold(token: &str) -> String {
    token
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

fn normalize_with(
    token: &str,
    canonical: &'static [&'static str],
    synonyms: &[(&str, &'static str)],
) -> Option<&'static str> {
    let folded = fold(token);
    if folded.is_empty() {
        return None;
    }
    synonyms
        .iter()
        .find(|(alias, _)| *alias == folded)
        .map(|(_, name)| *name)
        .or_else(|| canonical.iter().copied().find(|name| fold(name) == folded))
}

/// Resolve a user-supplied amenity token to its canonical name.
///
/// Returns `None` for tokens that match neither a synonym nor a canonical name.
pub fn normalize_amenity(token: &str) -> Option<&'static str> {
    normalize_with(token, AMENITIES, AMENITY_SYNONYMS)
}

/// Resolve a user-supplied highlight token to its canonical name.
pub fn normalize_highlight(token: &str) -> Option<&'static str> {
    normalize_with(token, HIGHLIGHTS, HIGHLIGHT_SYNONYMS)
}

/// Map a comma-separated amenity filter into match terms.
///
/// Known tokens become canonical names; unknown tokens pass through trimmed
/// but otherwise untouched, so they only match a literally stored value.
/// Duplicates are removed while preserving first-seen order.
pub fn amenity_search_terms(raw: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let term = normalize_amenity(token)
            .map(str::to_string)
            .unwrap_or_else(|| token.to_string());
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}

// ---------------------------------------------------------------------------
// Validation (property creation)
// ---------------------------------------------------------------------------

/// Validate a property type, accepting any casing of a canonical name.
pub fn validate_property_type(value: &str) -> Result<&'static str, CoreError> {
    let folded = fold(value);
    PROPERTY_TYPES
        .iter()
        .copied()
        .find(|name| fold(name) == folded)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Invalid property type '{value}'. Must be one of: {}",
                PROPERTY_TYPES.join(", ")
            ))
        })
}

/// Canonicalise a list of amenities, rejecting unknown ones.
pub fn validate_amenities(values: &[String]) -> Result<Vec<String>, CoreError> {
    canonicalize_all(values, "amenity", normalize_amenity)
}

/// Canonicalise a list of highlights, rejecting unknown ones.
pub fn validate_highlights(values: &[String]) -> Result<Vec<String>, CoreError> {
    canonicalize_all(values, "highlight", normalize_highlight)
}

fn canonicalize_all(
    values: &[String],
    kind: &str,
    normalize: fn(&str) -> Option<&'static str>,
) -> Result<Vec<String>, CoreError> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values.iter().map(|v| v.trim()).filter(|v| !v.is_empty()) {
        let name = normalize(value)
            .ok_or_else(|| CoreError::Validation(format!("Unknown {kind} '{value}'")))?;
        if !out.iter().any(|existing| existing == name) {
            out.push(name.to_string());
        }
    }
    Ok(out)
}
