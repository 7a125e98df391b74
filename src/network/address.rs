use once_cell::sync::Lazy;
use regex::Regex;

// Four dot-separated groups of one to three digits. No octet range check.
static DOTTED_QUAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").expect("valid dotted-quad regex")
});

/// Syntactic check for a router address.
///
/// Only the shape is checked, so `"999.999.999.999"` is accepted while
/// `"10.0.0"`, `" 10.0.0.1"` or IPv6 literals are not.
pub fn is_valid_address(address: &str) -> bool {
    DOTTED_QUAD.is_match(address)
}
