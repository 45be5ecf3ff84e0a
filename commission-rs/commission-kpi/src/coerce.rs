//! Best-effort numeric coercion for exported report cells.
//!
//! Power BI exports format money as `$30,000.00` and rates as `60.5%`.
//! Anything that does not parse to a finite number becomes `None`; a bad
//! cell never fails the whole evaluation.

/// Parse a currency cell, stripping `$` and thousands separators.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '$' | ',')).collect();
    parse_number(&cleaned)
}

/// Parse a percentage cell, stripping the `%` sign. `60%` becomes `60.0`.
pub fn parse_percent(raw: &str) -> Option<f64> {
    parse_number(&raw.replace('%', ""))
}

/// Parse a plain count cell.
pub fn parse_count(raw: &str) -> Option<f64> {
    parse_number(raw)
}

fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    // "nan" and "inf" parse as f64 but are not usable values.
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
