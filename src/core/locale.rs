//! pt-BR number handling: decimal comma, thousands dot, BRL currency.
//!
//! Parsing is forgiving on purpose. Text that does not contain a number reads
//! as zero instead of failing, so a half-filled form still projects.

pub const UNAVAILABLE: &str = "—";

const CURRENCY_PREFIX: &str = "R$\u{a0}";

/// Reads a localized amount such as `R$ 1.234,56` or `30`.
///
/// Every character except digits, `,`, `.` and `-` is dropped, every `.` is
/// treated as a thousands separator and the first `,` becomes the decimal
/// point. The longest numeric prefix of what remains is parsed; no prefix
/// means zero.
pub fn parse_number(text: &str) -> f64 {
    let kept: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '-'))
        .collect();
    let normalized = kept.replacen(',', ".", 1);
    leading_number(&normalized).unwrap_or(0.0)
}

fn leading_number(text: &str) -> Option<f64> {
    let bytes = text.as_bytes();
    let mut end = usize::from(bytes.first() == Some(&b'-'));

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }
    text[..end].parse::<f64>().ok().filter(|v| !v.is_nan())
}

pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return UNAVAILABLE.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!(
        "{sign}{CURRENCY_PREFIX}{},{frac_part}",
        group_thousands(int_part)
    )
}

pub fn format_integer(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Horizon in years with at most one fraction digit, e.g. `2,5 anos`.
pub fn format_years(months: u32) -> String {
    let tenths = (f64::from(months) / 12.0 * 10.0).round() as u64;
    let whole = format_integer(tenths / 10);
    match tenths % 10 {
        0 => format!("{whole} anos"),
        frac => format!("{whole},{frac} anos"),
    }
}

/// Rate as a percentage with two decimals and a decimal comma, e.g. `1,17`.
pub fn format_percent(rate: f64) -> String {
    format!("{:.2}", rate * 100.0).replace('.', ",")
}

/// Currency input mask: the digits typed so far are read as cents.
pub fn mask_currency(text: &str) -> String {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    let cents = digits.parse::<f64>().unwrap_or(0.0);
    format_currency(cents / 100.0)
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
