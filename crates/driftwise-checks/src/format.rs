//! Human-readable number formatting for condition names and details.

/// Formats a score with two decimals, trailing zeros stripped.
///
/// Magnitudes below `0.01` switch to scientific notation with a two-decimal
/// mantissa so that small scores do not collapse to `0`.
///
/// # Examples
///
/// ```
/// use driftwise_checks::format::format_number;
///
/// assert_eq!(format_number(0.2397), "0.24");
/// assert_eq!(format_number(0.2), "0.2");
/// assert_eq!(format_number(1.0), "1");
/// assert_eq!(format_number(0.003_367_8), "3.37E-3");
/// assert_eq!(format_number(12_345.678), "12,345.68");
/// ```
#[must_use]
pub fn format_number(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_owned();
    }
    if x != 0.0 && x.abs() < 0.01 {
        return format!("{x:.2E}");
    }
    strip_trailing_zeros(&add_commas(&format!("{x:.2}")))
}

/// Formats a ratio as a percentage.
///
/// # Examples
///
/// ```
/// use driftwise_checks::format::format_percent;
///
/// assert_eq!(format_percent(0.0), "0%");
/// assert_eq!(format_percent(1.0), "100%");
/// assert_eq!(format_percent(0.1), "10%");
/// assert_eq!(format_percent(0.1085), "10.85%");
/// assert_eq!(format_percent(0.101), "10.1%");
/// assert_eq!(format_percent(0.000_012), "0.0012%");
/// ```
#[must_use]
pub fn format_percent(ratio: f64) -> String {
    if ratio.is_nan() {
        return "nan%".to_owned();
    }
    if ratio.fract() == 0.0 {
        return format!("{}%", ratio * 100.0);
    }

    let percent = ratio * 100.0;
    let magnitude = percent.abs();
    let formatted = if magnitude < 0.01 {
        if magnitude < 1e-4 {
            return format!("{percent:.2E}%");
        }
        strip_trailing_zeros(&format!("{percent:.4}"))
    } else {
        let rounded = strip_trailing_zeros(&format!("{percent:.2}"));
        // A ratio just below one must not read as a full 100%
        if rounded == "100" && ratio < 1.0 {
            "99.99".to_owned()
        } else {
            rounded
        }
    };
    format!("{formatted}%")
}

fn strip_trailing_zeros(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_owned()
    } else {
        s.to_owned()
    }
}

fn add_commas(s: &str) -> String {
    let (sign, unsigned) = s.strip_prefix('-').map_or(("", s), |rest| ("-", rest));
    let (integer, fraction) = unsigned
        .split_once('.')
        .map_or((unsigned, None), |(i, f)| (i, Some(f)));
    if !integer.bytes().all(|b| b.is_ascii_digit()) {
        return s.to_owned();
    }

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, ch) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match fraction {
        Some(fraction) => format!("{sign}{grouped}.{fraction}"),
        None => format!("{sign}{grouped}"),
    }
}
