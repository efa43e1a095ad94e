//! Matriculation number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Faculty prefix, session year, serial: e.g. ENG/2019/043 or CSC/19/1204
static MATRIC_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{2,5}/\d{2,4}/\d{2,6}$").unwrap()
});

/// Normalize a matriculation number for lookup: trim whitespace and uppercase
pub fn normalize_matric(input: &str) -> String {
    input.trim().to_uppercase()
}

/// Check whether a string looks like a matriculation number
pub fn is_valid_matric(input: &str) -> bool {
    MATRIC_REGEX.is_match(&normalize_matric(input))
}

/// Mask a matriculation number for display in logs (e.g. ENG/****/043)
pub fn mask_matric(input: &str) -> String {
    let normalized = normalize_matric(input);
    let parts: Vec<&str> = normalized.split('/').collect();
    if parts.len() == 3 {
        format!("{}/****/{}", parts[0], parts[2])
    } else {
        "****".to_string()
    }
}
