/// Group separator used between thousands (no-break space).
pub const GROUP_SEPARATOR: char = '\u{a0}';

/// Rounds `value` to an integer and groups thousands, e.g. `1234567.4` →
/// `"1 234 567"`.
#[must_use]
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let negative = rounded < 0.0;

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (position, digit) in digits.chars().enumerate() {
        if position > 0 && (digits.len() - position) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(digit);
    }
    grouped
}
