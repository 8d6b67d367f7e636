//! Human-readable formatting for monetary amounts
//!
//! KPI cards and ranking rows show funding totals as `$1.23B` / `$45.00M`
//! style strings rather than raw dollar counts.

/// Formats a dollar amount with a B/M/K suffix.
///
/// # Behavior
/// - `>= 1e9`  -> `$X.XXB`
/// - `>= 1e6`  -> `$X.XXM`
/// - `>= 1e3`  -> `$X.XXK`
/// - otherwise -> `$X.XX`
///
/// Negative amounts keep the sign in front of the dollar symbol.
pub fn human_usd(amount: f64) -> String {
    let (sign, abs) = if amount < 0.0 {
        ("-", -amount)
    } else {
        ("", amount)
    };

    if abs >= 1e9 {
        format!("{}${:.2}B", sign, abs / 1e9)
    } else if abs >= 1e6 {
        format!("{}${:.2}M", sign, abs / 1e6)
    } else if abs >= 1e3 {
        format!("{}${:.2}K", sign, abs / 1e3)
    } else {
        format!("{}${:.2}", sign, abs)
    }
}

/// Formats an integer count with thousands separators (`41,845`).
pub fn grouped_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
