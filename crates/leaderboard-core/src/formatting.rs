/// Fractional digits needed to print any finite `f64` without rounding.
const EXACT_FRACTION_DIGITS: usize = 1074;

/// Format `value` with exactly `decimals` fractional digits.
///
/// Rounding works on the exact binary value: a value stored just below a
/// half rounds down, and exact halves round away from zero. This matches
/// how spreadsheet front ends print percentages.
///
/// # Examples
///
/// ```
/// use leaderboard_core::formatting::format_fixed;
///
/// assert_eq!(format_fixed(90.0, 2), "90.00");
/// assert_eq!(format_fixed(12.125, 2), "12.13");
/// assert_eq!(format_fixed(0.015, 2), "0.01");
/// assert_eq!(format_fixed(2.5, 0), "3");
/// assert_eq!(format_fixed(-2.5, 0), "-3");
/// ```
pub fn format_fixed(value: f64, decimals: u32) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let exact = format!("{:.*}", EXACT_FRACTION_DIGITS, value.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));
    let decimals = decimals as usize;

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(decimals))
        .map(|b| b - b'0')
        .collect();
    let mut int_len = int_part.len();

    let round_up = frac_part
        .as_bytes()
        .get(decimals)
        .is_some_and(|&next| next >= b'5');
    if round_up {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
            int_len += 1;
        }
    }

    let mut out = String::with_capacity(digits.len() + 2);
    if value < 0.0 {
        out.push('-');
    }
    for (idx, digit) in digits.iter().enumerate() {
        if idx == int_len {
            out.push('.');
        }
        out.push(char::from(b'0' + digit));
    }
    out
}

/// Format a 0–100 value as a percentage label with two decimals.
///
/// # Examples
///
/// ```
/// use leaderboard_core::formatting::format_percentage;
///
/// assert_eq!(format_percentage(87.5), "87.50%");
/// assert_eq!(format_percentage(0.0), "0.00%");
/// ```
pub fn format_percentage(value: f64) -> String {
    format!("{}%", format_fixed(value, 2))
}

/// Rescale a 0–1 fraction to 0–100.
pub fn fraction_to_percentage(fraction: f64) -> f64 {
    fraction * 100.0
}

// ── Tests ─────────────────────────────────────────────────────────────────────
