//! Number-to-text layout.
//!
//! Produces the shortest decimal digits that round-trip, laid out the way a
//! JavaScript engine prints numbers: plain notation for magnitudes in
//! `[1e-6, 1e21)`, exponent notation (`1e+21`, `1.5e-7`) outside it.

/// Formats `n` as text. Non-finite values become `NaN`, `Infinity` or `-Infinity`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if n == 0.0 {
        // Covers -0 as well.
        return "0".to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    let scientific = format!("{:e}", n.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return format!("{sign}{scientific}");
    };
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the start of `digits`.
    let point = exponent.parse::<i32>().unwrap_or(0) + 1;

    let body = if k <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat((-point) as usize))
    } else {
        let e = point - 1;
        let e_sign = if e < 0 { '-' } else { '+' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{lead}e{e_sign}{}", e.abs())
        } else {
            format!("{lead}.{rest}e{e_sign}{}", e.abs())
        }
    };
    format!("{sign}{body}")
}

/// Writes `n` as a JSON number literal. JSON has no `NaN` or infinities, so
/// those are written as `null`.
pub(crate) fn write_json_number(n: f64, out: &mut String) {
    if n.is_finite() {
        out.push_str(&format_number(n));
    } else {
        out.push_str("null");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_have_no_fraction() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(-123.0), "-123");
        assert_eq!(format_number(9007199254740992.0), "9007199254740992");
        assert_eq!(format_number(1e20), "100000000000000000000");
    }

    #[test]
    fn fractions_use_shortest_digits() {
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(-0.25), "-0.25");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(0.000001), "0.000001");
    }

    #[test]
    fn large_and_small_magnitudes_use_exponent() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e300), "1.5e+300");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(1.23e-18), "1.23e-18");
        assert_eq!(format_number(f64::MIN_POSITIVE), "2.2250738585072014e-308");
    }

    #[test]
    fn zero_and_non_finite() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");

        let mut out = String::new();
        write_json_number(f64::INFINITY, &mut out);
        assert_eq!(out, "null");
    }
}
