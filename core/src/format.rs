//! Display formatting for metric cards, ranked lists and tooltips.

/// Insert `,` every three digits of an unsigned digit string.
fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1234567` → `1,234,567`.
pub fn grouped(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    if n < 0 {
        format!("-{}", group_digits(&digits))
    } else {
        group_digits(&digits)
    }
}

/// Monetary value, whole units, grouped, with the currency symbol.
/// `1234567.6` with `₹` → `₹1,234,568`.
pub fn currency(amount: f64, symbol: &str) -> String {
    if !amount.is_finite() {
        return format!("{symbol}0");
    }
    let rounded = format!("{:.0}", amount.abs());
    let sign = if amount < 0.0 && rounded != "0" { "-" } else { "" };
    format!("{sign}{symbol}{}", group_digits(&rounded))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_thousands() {
        assert_eq!(grouped(0), "0");
        assert_eq!(grouped(999), "999");
        assert_eq!(grouped(1000), "1,000");
        assert_eq!(grouped(1234567), "1,234,567");
        assert_eq!(grouped(-45210), "-45,210");
    }

    #[test]
    fn currency_rounds_to_whole_units() {
        assert_eq!(currency(1234567.6, "₹"), "₹1,234,568");
        assert_eq!(currency(0.4, "₹"), "₹0");
        assert_eq!(currency(100.0, "$"), "$100");
        assert_eq!(currency(f64::NAN, "₹"), "₹0");
    }

    #[test]
    fn currency_handles_amounts_beyond_i64() {
        assert_eq!(currency(1e20, "₹"), "₹100,000,000,000,000,000,000");
    }
}
