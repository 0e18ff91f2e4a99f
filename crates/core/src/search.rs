//! Helpers shared by the list/search endpoints.

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 100;

/// Largest page size a client may request.
pub const MAX_LIMIT: i64 = 1000;

/// Clamp a user-provided limit to valid bounds.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Build an `ILIKE` pattern matching `term` anywhere, with `%`, `_` and `\`
/// in the term escaped. Blank terms yield `None`.
pub fn contains_pattern(term: Option<&str>) -> Option<String> {
    escape_like(term?).map(|t| format!("%{t}%"))
}

/// Build an `ILIKE` pattern matching values starting with `term`.
pub fn prefix_pattern(term: Option<&str>) -> Option<String> {
    escape_like(term?).map(|t| format!("{t}%"))
}

fn escape_like(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    Some(escaped)
}

/// Trim an optional exact-match filter, treating blanks as absent.
pub fn exact_filter(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_limit_uses_default_when_none() {
        assert_eq!(clamp_limit(None, DEFAULT_LIMIT, MAX_LIMIT), DEFAULT_LIMIT);
    }

    #[test]
    fn clamp_limit_respects_bounds() {
        assert_eq!(clamp_limit(Some(5000), DEFAULT_LIMIT, MAX_LIMIT), MAX_LIMIT);
        assert_eq!(clamp_limit(Some(0), DEFAULT_LIMIT, MAX_LIMIT), 1);
        assert_eq!(clamp_limit(Some(25), DEFAULT_LIMIT, MAX_LIMIT), 25);
    }

    #[test]
    fn clamp_offset_floors_at_zero() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-3)), 0);
        assert_eq!(clamp_offset(Some(40)), 40);
    }

    #[test]
    fn like_patterns_escape_wildcards() {
        assert_eq!(contains_pattern(Some(" city ")), Some("%city%".into()));
        assert_eq!(contains_pattern(Some("50%_off")), Some("%50\\%\\_off%".into()));
        assert_eq!(prefix_pattern(Some("4110")), Some("4110%".into()));
        assert_eq!(contains_pattern(Some("   ")), None);
        assert_eq!(prefix_pattern(None), None);
    }

    #[test]
    fn exact_filter_drops_blanks() {
        assert_eq!(exact_filter(Some(" MH ")), Some("MH".into()));
        assert_eq!(exact_filter(Some("")), None);
    }
}
