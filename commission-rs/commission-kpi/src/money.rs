//! Dollar formatting shared by the terminal report and settlement documents.

/// The single currency symbol used everywhere.
pub const CURRENCY_SYMBOL: &str = "$";

/// Format an amount as `$9,000.00`, or `-$1,800.50` when negative.
///
/// Rounds the amount itself to cents, so `2.675` (stored just below
/// 2.675) shows as `$2.67`. Non-finite amounts show as `$0.00`.
pub fn format_currency(amount: f64) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    // A value that rounds to zero never carries a sign.
    let negative = amount < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
    format!(
        "{}{}{}.{}",
        if negative { "-" } else { "" },
        CURRENCY_SYMBOL,
        group_thousands(whole),
        cents
    )
}

/// Format a cutoff as `$25,000`, keeping cents only when present.
pub fn format_whole_dollars(amount: f64) -> String {
    if amount.fract() == 0.0 {
        let whole = amount as i64;
        let sign = if whole < 0 { "-" } else { "" };
        format!(
            "{}{}{}",
            sign,
            CURRENCY_SYMBOL,
            group_thousands(&whole.unsigned_abs().to_string())
        )
    } else {
        format_currency(amount)
    }
}

/// Format a rate fraction as a percentage: `0.30` → `30%`, `0.275` → `27.5%`.
pub fn format_rate(rate: f64) -> String {
    let fixed = format!("{:.2}", rate * 100.0);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", trimmed)
}

/// Insert comma thousands separators into a run of digits.
fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}
