//! Masking of sensitive configuration values for display.

/// Substrings that mark a key as sensitive (matched case-insensitively).
pub const SENSITIVE_MARKERS: &[&str] = &["password", "secret", "key", "token"];
/// Replacement for short sensitive values.
pub const SHORT_MASK: &str = "****";
/// Character used for the masked interior of long values.
pub const MASK_CHAR: char = '*';
/// Number of characters kept visible at each end of a long value.
const VISIBLE_EDGE: usize = 4;

/// Returns true if `key` names a sensitive value.
pub fn is_sensitive_key(key: &str) -> bool {
    let lowered = key.to_lowercase();
    SENSITIVE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// Mask a value, keeping the first and last four characters of values longer than eight.
pub fn mask_value(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= VISIBLE_EDGE * 2 {
        return SHORT_MASK.to_string();
    }

    let hidden = chars.len() - VISIBLE_EDGE * 2;
    let mut masked = String::with_capacity(value.len());
    masked.extend(&chars[..VISIBLE_EDGE]);
    masked.extend(std::iter::repeat(MASK_CHAR).take(hidden));
    masked.extend(&chars[chars.len() - VISIBLE_EDGE..]);
    masked
}

/// Value as it should be displayed for `key`.
pub fn display_value(key: &str, value: &str) -> String {
    if is_sensitive_key(key) {
        mask_value(value)
    } else {
        value.to_string()
    }
}
