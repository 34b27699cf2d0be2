//! Small helpers.

/// Trimmed asset label; empty input falls back to `default`.
pub fn sanitize_label(label: &str, default: &str) -> String {
    let l = label.trim();
    if l.is_empty() {
        default.to_string()
    } else {
        l.to_string()
    }
}

/// Lenient numeric field parsing: anything unparseable or non-finite is 0.
pub fn parse_number(s: &str) -> f64 {
    // Accept "1,000" and "$150" as typed into a price box.
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$' && *c != '%')
        .collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// `+$497.50` / `-$101.90` style signed money.
pub fn fmt_signed_money(v: f64, decimals: usize) -> String {
    let sign = if v >= 0.0 { "+" } else { "-" };
    format!("{}${:.*}", sign, decimals, v.abs())
}

pub fn fmt_money(v: f64, decimals: usize) -> String {
    if v.is_finite() {
        format!("${:.*}", decimals, v)
    } else {
        // inf / NaN from a degenerate fee rate
        format!("${}", v)
    }
}
