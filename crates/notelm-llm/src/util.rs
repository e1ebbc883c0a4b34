//! Shared utilities for provider clients

/// Mask an API key for logging
///
/// Shows first 4 and last 4 characters for keys longer than 8 chars,
/// otherwise returns "****".
///
/// # Examples
///
/// ```
/// use notelm_llm::util::mask_api_key;
///
/// assert_eq!(mask_api_key("sk-1234567890abcdef"), "sk-1...cdef");
/// assert_eq!(mask_api_key("short"), "****");
/// ```
#[must_use]
pub fn mask_api_key(key: &str) -> String {
    if key.len() <= 8 {
        "****".to_string()
    } else {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    }
}

/// Truncate a string at a character boundary at or below `max_len` bytes
#[must_use]
pub fn truncate_safe(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Sanitize an upstream API error message before it reaches callers
///
/// Credential and quota failures collapse to generic hints so raw upstream
/// bodies never echo key material. Anything else is truncated.
#[must_use]
pub fn sanitize_api_error(error: &str) -> String {
    let lower = error.to_lowercase();

    if lower.contains("api key")
        || lower.contains("apikey")
        || lower.contains("invalid key")
        || lower.contains("unauthorized")
        || lower.contains("authentication")
    {
        return "API authentication error. Please check your API key configuration.".to_string();
    }

    if lower.contains("rate limit") || lower.contains("quota") {
        return "API rate limit exceeded. Please try again later.".to_string();
    }

    if error.len() > 300 {
        format!("{}...(truncated)", truncate_safe(error, 300))
    } else {
        error.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_short_key() {
        assert_eq!(mask_api_key(""), "****");
        assert_eq!(mask_api_key("12345678"), "****");
    }

    #[test]
    fn test_mask_long_key() {
        assert_eq!(mask_api_key("sk-or-v1-abcdef123456"), "sk-o...3456");
    }

    #[test]
    fn test_truncate_safe_ascii() {
        assert_eq!(truncate_safe("hello world", 5), "hello");
        assert_eq!(truncate_safe("hi", 5), "hi");
    }

    #[test]
    fn test_truncate_safe_multibyte() {
        // 3-byte chars; cutting at 4 must back up to the boundary at 3
        let s = "日本語";
        assert_eq!(truncate_safe(s, 4), "日");
        assert_eq!(truncate_safe(s, 9), "日本語");
    }

    #[test]
    fn test_sanitize_auth_error() {
        let out = sanitize_api_error("Invalid API key provided: sk-or-v1-secret");
        assert!(!out.contains("sk-or-v1"));
        assert!(out.contains("authentication"));
    }

    #[test]
    fn test_sanitize_rate_limit() {
        let out = sanitize_api_error("Rate limit exceeded for this account");
        assert_eq!(out, "API rate limit exceeded. Please try again later.");
        let out = sanitize_api_error("Quota exhausted");
        assert_eq!(out, "API rate limit exceeded. Please try again later.");
    }

    #[test]
    fn test_sanitize_truncates_long_bodies() {
        let long = "x".repeat(500);
        let out = sanitize_api_error(&long);
        assert!(out.ends_with("...(truncated)"));
        assert!(out.len() < 400);
    }

    #[test]
    fn test_sanitize_passes_short_messages() {
        assert_eq!(sanitize_api_error("model not found"), "model not found");
    }
}
