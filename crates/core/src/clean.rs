//! Cell value cleaning applied to every imported field.

/// Control characters that spreadsheet exports leak into text cells.
/// Tab, line feed and carriage return are kept.
fn is_stray_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}')
}

/// Trim a cell, drop stray control characters, and map blanks to `None`.
pub fn clean_text(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    let cleaned: String = trimmed.chars().filter(|c| !is_stray_control(*c)).collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

/// Parse an integer cell, falling back to `default`.
///
/// Float text such as `"1197.0"` is truncated. Blank, missing and
/// unparseable cells all yield `default`.
pub fn clean_int(raw: Option<&str>, default: i32) -> i32 {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return default;
    };
    if let Ok(n) = value.parse::<i32>() {
        return n;
    }
    match value.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= i32::MIN as f64 && f <= i32::MAX as f64 => f.trunc() as i32,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_none() {
        assert_eq!(clean_text(None), None);
        assert_eq!(clean_text(Some("   ")), None);
        assert_eq!(clean_text(Some("\u{13}")), None);
    }

    #[test]
    fn strips_control_characters_but_keeps_whitespace_controls() {
        assert_eq!(
            clean_text(Some("  HON\u{13}DA\u{0}  ")),
            Some("HONDA".to_string())
        );
        assert_eq!(
            clean_text(Some("line1\nline2\tend")),
            Some("line1\nline2\tend".to_string())
        );
    }

    #[test]
    fn int_parsing_with_defaults() {
        assert_eq!(clean_int(Some("1197"), 0), 1197);
        assert_eq!(clean_int(Some(" 1197.9 "), 0), 1197);
        assert_eq!(clean_int(Some(""), 5), 5);
        assert_eq!(clean_int(None, 4), 4);
        assert_eq!(clean_int(Some("n/a"), 2), 2);
        assert_eq!(clean_int(Some("1e40"), 7), 7);
    }
}
