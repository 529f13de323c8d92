//! Exact resource quantities with Kubernetes-style unit suffixes.
//!
//! A [`Quantity`] is an immutable decimal value such as `500m`, `2`,
//! `1600Mi`, or `3e2`. Arithmetic is exact — values are held as
//! rationals, never floats — so quantities are safe to use in quota
//! decisions where truncation errors are unacceptable.

use num_rational::Ratio;
use num_traits::{Signed, Zero};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuantityError {
    #[error("cannot parse quantity {0:?}")]
    Format(String),
    #[error("quantity {0:?} is out of range")]
    OutOfRange(String),
}

/// How a quantity was written, remembered so formatting stays in the
/// same unit family the author used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    /// Decimal SI suffixes: n, u, m, (none), k, M, G, T, P, E
    DecimalSi,
    /// Binary suffixes: Ki, Mi, Gi, Ti, Pi, Ei
    BinarySi,
    /// Scientific notation, e.g. `3e2`
    DecimalExponent,
}

/// Decimal SI ladder as powers of ten, largest first.
const DECIMAL_LADDER: [(&str, i32); 10] = [
    ("E", 18),
    ("P", 15),
    ("T", 12),
    ("G", 9),
    ("M", 6),
    ("k", 3),
    ("", 0),
    ("m", -3),
    ("u", -6),
    ("n", -9),
];

/// Binary ladder as powers of two, largest first.
const BINARY_LADDER: [(&str, u32); 6] = [
    ("Ei", 60),
    ("Pi", 50),
    ("Ti", 40),
    ("Gi", 30),
    ("Mi", 20),
    ("Ki", 10),
];

/// An exact decimal value with a unit suffix.
///
/// Quantities are value types: cloning is cheap, there is no shared
/// state, and equality/ordering compare the numeric value regardless of
/// how it was spelled (`1500m == 1.5`).
#[derive(Debug, Clone, Copy)]
pub struct Quantity {
    value: Ratio<i128>,
    format: Format,
}

impl Quantity {
    /// The zero quantity. A fresh value every call, not a shared constant.
    pub fn zero() -> Quantity {
        Quantity::from_integer(0)
    }

    pub fn from_integer(n: i64) -> Quantity {
        Quantity {
            value: Ratio::from_integer(n as i128),
            format: Format::DecimalSi,
        }
    }

    /// Parse a quantity from its textual form.
    ///
    /// Accepts a decimal mantissa followed by an optional suffix from the
    /// decimal SI family (`n u m k M G T P E`), the binary family
    /// (`Ki Mi Gi Ti Pi Ei`), or a scientific exponent (`e3`, `E-2`).
    ///
    /// Values are bounded: a magnitude beyond 10^24 or precision finer
    /// than 10^-18 yields [`QuantityError::OutOfRange`].
    pub fn parse(text: &str) -> Result<Quantity, QuantityError> {
        let bytes = text.as_bytes();
        if bytes.is_empty() {
            return Err(QuantityError::Format(text.to_string()));
        }
        let mut pos = 0;
        let negative = match bytes[0] {
            b'+' => {
                pos += 1;
                false
            }
            b'-' => {
                pos += 1;
                true
            }
            _ => false,
        };

        let int_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        let int_digits = &text[int_start..pos];

        let mut frac_digits = "";
        if pos < bytes.len() && bytes[pos] == b'.' {
            pos += 1;
            let frac_start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            frac_digits = &text[frac_start..pos];
        }
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(QuantityError::Format(text.to_string()));
        }

        let digits = format!("{}{}", int_digits, frac_digits);
        let mantissa: i128 = digits
            .parse()
            .map_err(|_| QuantityError::OutOfRange(text.to_string()))?;
        let denom = 10i128
            .checked_pow(frac_digits.len() as u32)
            .ok_or_else(|| QuantityError::OutOfRange(text.to_string()))?;
        let mut value = Ratio::new(mantissa, denom);
        if negative {
            value = -value;
        }

        let suffix = &text[pos..];
        let (factor, format) = match suffix {
            "" => (Ratio::from_integer(1), Format::DecimalSi),
            "n" => (Ratio::new(1, 1_000_000_000), Format::DecimalSi),
            "u" => (Ratio::new(1, 1_000_000), Format::DecimalSi),
            "m" => (Ratio::new(1, 1_000), Format::DecimalSi),
            "k" => (Ratio::from_integer(1_000), Format::DecimalSi),
            "M" => (Ratio::from_integer(1_000_000), Format::DecimalSi),
            "G" => (Ratio::from_integer(1_000_000_000), Format::DecimalSi),
            "T" => (Ratio::from_integer(10i128.pow(12)), Format::DecimalSi),
            "P" => (Ratio::from_integer(10i128.pow(15)), Format::DecimalSi),
            "E" => (Ratio::from_integer(10i128.pow(18)), Format::DecimalSi),
            "Ki" => (Ratio::from_integer(1 << 10), Format::BinarySi),
            "Mi" => (Ratio::from_integer(1 << 20), Format::BinarySi),
            "Gi" => (Ratio::from_integer(1 << 30), Format::BinarySi),
            "Ti" => (Ratio::from_integer(1i128 << 40), Format::BinarySi),
            "Pi" => (Ratio::from_integer(1i128 << 50), Format::BinarySi),
            "Ei" => (Ratio::from_integer(1i128 << 60), Format::BinarySi),
            s if s.starts_with('e') || s.starts_with('E') => {
                let exp: i32 = s[1..]
                    .parse()
                    .map_err(|_| QuantityError::Format(text.to_string()))?;
                if exp.unsigned_abs() > 30 {
                    return Err(QuantityError::OutOfRange(text.to_string()));
                }
                (pow10(exp), Format::DecimalExponent)
            }
            _ => return Err(QuantityError::Format(text.to_string())),
        };

        let value = checked_mul(&value, &factor)
            .filter(|v| v.abs() <= magnitude_cap() && *v.denom() <= MAX_DENOMINATOR)
            .ok_or_else(|| QuantityError::OutOfRange(text.to_string()))?;

        Ok(Quantity { value, format })
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Exact sum. The result keeps this quantity's unit family unless it
    /// is zero, in which case the addend's family is adopted — so a
    /// running total started at zero formats the way its inputs did.
    pub fn add(&self, other: &Quantity) -> Quantity {
        let format = if self.value.is_zero() {
            other.format
        } else {
            self.format
        };
        Quantity {
            value: self.value + other.value,
            format,
        }
    }

    /// Exact multiplication by a replica count. Never rounds.
    pub fn scale(&self, count: u64) -> Quantity {
        Quantity {
            value: self.value * Ratio::from_integer(count as i128),
            format: self.format,
        }
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quantity::parse(s)
    }
}

impl fmt::Display for Quantity {
    /// Canonical compact form: the largest suffix in the quantity's unit
    /// family for which the coefficient is a whole number.
    /// `1.5` prints as `1500m`, `3 * 1600Mi` as `4800Mi`, zero as `0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_zero() {
            return write!(f, "0");
        }
        if self.format == Format::BinarySi {
            for (name, exp) in BINARY_LADDER {
                if let Some(scaled) = checked_mul(&self.value, &Ratio::new(1, 1i128 << exp)) {
                    if scaled.is_integer() {
                        return write!(f, "{}{}", scaled.to_integer(), name);
                    }
                }
            }
            // e.g. 0.5Ki — fall back to the decimal ladder
        }
        for (name, exp) in DECIMAL_LADDER {
            if let Some(scaled) = checked_mul(&self.value, &pow10(-exp)) {
                if scaled.is_integer() {
                    return write!(f, "{}{}", scaled.to_integer(), name);
                }
            }
        }
        write!(f, "{}", decimal_string(&self.value))
    }
}

/// Largest magnitude [`Quantity::parse`] accepts, 10^24. The biggest
/// suffix times a multi-digit coefficient stays well under this, and
/// the remaining i128 headroom keeps replica scaling and summation
/// exact.
fn magnitude_cap() -> Ratio<i128> {
    Ratio::from_integer(10i128.pow(24))
}

/// Finest precision retained: reduced denominators stop at 10^18.
const MAX_DENOMINATOR: i128 = 1_000_000_000_000_000_000;

fn pow10(exp: i32) -> Ratio<i128> {
    if exp >= 0 {
        Ratio::from_integer(10i128.pow(exp as u32))
    } else {
        Ratio::new(1, 10i128.pow((-exp) as u32))
    }
}

fn checked_pow10(exp: u32) -> Option<Ratio<i128>> {
    10i128.checked_pow(exp).map(Ratio::from_integer)
}

/// Multiply with cross-reduction first, refusing to wrap on overflow.
fn checked_mul(a: &Ratio<i128>, b: &Ratio<i128>) -> Option<Ratio<i128>> {
    let g1 = gcd(*a.numer(), *b.denom());
    let g2 = gcd(*b.numer(), *a.denom());
    let numer = (a.numer() / g1).checked_mul(b.numer() / g2)?;
    let denom = (a.denom() / g2).checked_mul(b.denom() / g1)?;
    Some(Ratio::new(numer, denom))
}

fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}

/// Terminating decimal expansion of a rational whose denominator is of
/// the form 2^a * 5^b — which is every value [`Quantity::parse`] can
/// produce, since parse denominators are powers of ten and of two.
fn decimal_string(value: &Ratio<i128>) -> String {
    let mut denom = *value.denom();
    let mut twos = 0u32;
    let mut fives = 0u32;
    while denom % 2 == 0 {
        denom /= 2;
        twos += 1;
    }
    while denom % 5 == 0 {
        denom /= 5;
        fives += 1;
    }
    if denom != 1 {
        // non-terminating; unreachable via parse/add/scale
        return value.to_string();
    }
    let places = twos.max(fives);
    let scaled = match checked_pow10(places).and_then(|p| checked_mul(value, &p)) {
        Some(scaled) => scaled.to_integer(),
        None => return value.to_string(),
    };
    let body = scaled.unsigned_abs().to_string();
    let places = places as usize;
    let (int_part, frac_part) = if body.len() > places {
        (&body[..body.len() - places], &body[body.len() - places..])
    } else {
        ("", &body[..])
    };
    let mut out = String::new();
    if value.is_negative() {
        out.push('-');
    }
    if int_part.is_empty() {
        out.push('0');
    } else {
        out.push_str(int_part);
    }
    let frac = format!("{:0>width$}", frac_part, width = places);
    let frac = frac.trim_end_matches('0');
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(text: &str) -> Quantity {
        Quantity::parse(text).unwrap()
    }

    #[test]
    fn parse_plain_and_suffixed() {
        assert_eq!(q("2"), Quantity::from_integer(2));
        assert_eq!(q("500m"), q("0.5"));
        assert_eq!(q("1500m"), q("1.5"));
        assert_eq!(q("1Ki"), q("1024"));
        assert_eq!(q("2Mi"), Quantity::from_integer(2 * 1024 * 1024));
        assert_eq!(q("3e2"), q("300"));
        assert_eq!(q("1e-3"), q("1m"));
        assert_eq!(q("2k"), q("2000"));
    }

    #[test]
    fn parse_rejects_bad_input() {
        for bad in ["", "abc", "1.2.3", "100xi", "1K", "12e", " 5", "5 "] {
            assert!(Quantity::parse(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn parse_rejects_values_past_the_magnitude_bound() {
        for huge in [
            "200000000000000000000E",
            "99999999999e30",
            "1e25",
            "-1e25",
            "123456789012345678901234567890123456789",
        ] {
            assert!(
                matches!(Quantity::parse(huge), Err(QuantityError::OutOfRange(_))),
                "accepted {:?}",
                huge
            );
        }
        // the bound itself is representable
        assert!(Quantity::parse("1e24").is_ok());
        assert!(Quantity::parse("1000000E").is_ok());
    }

    #[test]
    fn parse_rejects_precision_finer_than_atto() {
        assert!(Quantity::parse("0.000000000000000001").is_ok());
        assert!(matches!(
            Quantity::parse("0.0000000000000000001"),
            Err(QuantityError::OutOfRange(_))
        ));
    }

    #[test]
    fn format_error_names_the_text() {
        let err = Quantity::parse("12wrong").unwrap_err();
        assert!(err.to_string().contains("12wrong"));
    }

    #[test]
    fn zero_is_zero() {
        assert!(Quantity::zero().is_zero());
        assert!(q("0").is_zero());
        assert!(q("0.000").is_zero());
        assert!(!q("1m").is_zero());
    }

    #[test]
    fn add_and_scale_are_exact() {
        let sum = q("500m").add(&q("250m"));
        assert_eq!(sum, q("750m"));
        assert_eq!(q("500m").scale(3), q("1500m"));
        assert_eq!(q("1600Mi").scale(3), q("4800Mi"));
        // scaling by a replica count introduces no rounding
        assert_eq!(q("0.1").scale(10), Quantity::from_integer(1));
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(q("250m") < q("0.5"));
        assert!(q("1.9") < q("2"));
        assert!(q("2.1") > q("2"));
        assert_eq!(q("1024").cmp(&q("1Ki")), Ordering::Equal);
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(q("1500m").to_string(), "1500m");
        assert_eq!(q("1.5").to_string(), "1500m");
        assert_eq!(q("2").to_string(), "2");
        assert_eq!(q("0").to_string(), "0");
        assert_eq!(q("4800Mi").to_string(), "4800Mi");
        assert_eq!(q("12000").to_string(), "12k");
        assert_eq!(q("0.5Ki").to_string(), "512");
        assert_eq!(q("1600Mi").scale(3).to_string(), "4800Mi");
    }

    #[test]
    fn zero_total_adopts_addend_family() {
        let total = Quantity::zero().add(&q("1600Mi"));
        assert_eq!(total.to_string(), "1600Mi");
    }

    #[test]
    fn round_trip_across_unit_classes() {
        for text in [
            "0", "1", "2", "150", "500m", "1500m", "250m", "1n", "2u", "3k", "4M", "1Ki",
            "1600Mi", "4800Mi", "3Gi", "2Ti", "1.5", "0.25",
        ] {
            let parsed = q(text);
            assert_eq!(
                Quantity::parse(&parsed.to_string()).unwrap(),
                parsed,
                "round trip failed for {:?}",
                text
            );
        }
    }
}
