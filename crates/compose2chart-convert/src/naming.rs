//! Kubernetes resource name sanitizing

/// Name used when nothing usable is left of a service key
pub const FALLBACK_NAME: &str = "app";

/// DNS-1123 label length limit
pub const MAX_NAME_LENGTH: usize = 63;

/// Normalize a free-form compose service key into a valid Kubernetes
/// object and label name.
///
/// Letters are lowercased, anything outside `[a-z0-9-]` becomes `-`, hyphen
/// runs collapse into one, and leading/trailing hyphens are trimmed. The
/// result is at most [`MAX_NAME_LENGTH`] characters and never empty.
pub fn sanitize_name(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len());

    for ch in raw.chars() {
        let ch = ch.to_ascii_lowercase();
        let ch = if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            ch
        } else {
            '-'
        };

        if ch == '-' && (name.is_empty() || name.ends_with('-')) {
            continue;
        }
        name.push(ch);
    }

    // Only ASCII remains, so byte truncation is safe
    name.truncate(MAX_NAME_LENGTH);

    let name = name.trim_end_matches('-');
    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Check whether `name` already satisfies the DNS-1123 label rules
pub fn is_dns_label(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LENGTH
        && !name.starts_with('-')
        && !name.ends_with('-')
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
