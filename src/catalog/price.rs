//! Price formatting
//!
//! Prices are shown with exactly two decimals. Rounding is half-up on the
//! shortest decimal representation of the value, so `1.005` becomes `1.01`
//! even though its binary value is slightly below the midpoint.

/// Format a price with exactly two decimal places
///
/// # Examples
/// ```
/// use productos::catalog::format_price;
/// assert_eq!(format_price(19.5), "19.50");
/// assert_eq!(format_price(19.999), "20.00");
/// ```
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return price.to_string();
    }

    let repr = price.abs().to_string();
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let mut digits: Vec<char> = int_part
        .chars()
        .chain(frac_part.chars().chain(std::iter::repeat('0')).take(2))
        .collect();

    if frac_part.chars().nth(2).is_some_and(|d| d >= '5') {
        increment(&mut digits);
    }

    let negative = price.is_sign_negative() && digits.iter().any(|&d| d != '0');
    let split = digits.len() - 2;

    let mut out = String::with_capacity(digits.len() + 2);
    if negative {
        out.push('-');
    }
    out.extend(&digits[..split]);
    out.push('.');
    out.extend(&digits[split..]);
    out
}

/// Add one unit in the last place to a run of decimal digits
#[allow(clippy::cast_possible_truncation)]
fn increment(digits: &mut Vec<char>) {
    for d in digits.iter_mut().rev() {
        if *d == '9' {
            *d = '0';
        } else {
            *d = char::from(*d as u8 + 1);
            return;
        }
    }
    digits.insert(0, '1');
}
