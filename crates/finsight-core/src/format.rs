//! Amount formatting for insight messages

/// Format an amount as `<currency> <grouped integer>`, e.g. `IDR 1,250,000`.
///
/// Amounts are rounded to whole currency units.
pub fn format_amount(currency: &str, amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{} {}{}", currency, sign, group_thousands(rounded.abs() as u64))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
