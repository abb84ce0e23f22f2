//! Rupee formatting with lakh (L) and crore (Cr) abbreviations.

const LAKH: f64 = 1_00_000.0;
const CRORE: f64 = 1_00_00_000.0;

/// `₹1.25 Cr`, `₹3.40 L`, `₹12,345.60`; negatives get a leading `-`.
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹0.00".to_string();
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    let amount = amount.abs();
    if amount >= CRORE {
        format!("{sign}₹{:.2} Cr", amount / CRORE)
    } else if amount >= LAKH {
        format!("{sign}₹{:.2} L", amount / LAKH)
    } else {
        format!("{sign}₹{}", group_thousands(amount))
    }
}

fn group_thousands(amount: f64) -> String {
    let fixed = format!("{amount:.2}");
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let digits = int_part.as_bytes();
    let mut out = String::with_capacity(fixed.len() + digits.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*d as char);
    }
    out.push('.');
    out.push_str(frac);
    out
}
