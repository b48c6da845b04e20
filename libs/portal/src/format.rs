//! Small display helpers shared by the pages.

/// Cut `text` to `max` characters, appending `...` when anything was cut.
pub fn truncate(text: &str, max: usize) -> String {
    ideas::form::abbreviate(text, max)
}

/// Whole dollars with thousands separators: `1234567` → `$1,234,567`.
pub fn format_currency(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Percentage of `target` reached, clamped to `0..=100`.
pub fn calculate_progress(current: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (current / target * 100.0).clamp(0.0, 100.0)
}
