//! Numeric parsing and rendering shared by the source, the sink and the stages.

/// Parses a string as a finite f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Formats a number in its shortest form: `30`, `12.5`, never `30.0`.
pub fn format_numeric(v: f64) -> String {
    // `-0.0` would otherwise render as "-0".
    if v == 0.0 {
        return "0".to_string();
    }
    v.to_string()
}
