//! Exact decimal coordinates for location metadata.
//!
//! Latitude, longitude and elevation travel as text so the caller controls their
//! precision. [`Coordinate`] is the typed form of that text: an exact decimal
//! (sign, digits and scale) that renders back without losing or inventing digits.
//!
//! A coordinate equal to zero means "absent" when a [`Data`](crate::Data) reading
//! is built from coordinates, so an explicit `0` latitude, longitude or elevation
//! can never be sent that way. Callers who need one must set the text field
//! directly.

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// An exact decimal number.
///
/// # Examples
///
/// ```
/// use aio_http::Coordinate;
///
/// let lat: Coordinate = "42.026944".parse().unwrap();
/// assert_eq!(lat.round(2).to_string(), "42.03");
///
/// let ele = Coordinate::try_from(900.5).unwrap();
/// assert_eq!(ele.to_string(), "900.5");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    negative: bool,
    /// Decimal digits, most significant first. Always holds at least one
    /// integer digit, and no leading zeros beyond that one.
    digits: Vec<u8>,
    /// How many of `digits` sit after the decimal point.
    scale: usize,
}

impl Coordinate {
    /// Returns `true` if every digit is zero.
    pub fn is_zero(&self) -> bool {
        self.digits.iter().all(|d| *d == 0)
    }

    /// Number of fractional digits.
    pub fn scale(&self) -> usize {
        self.scale
    }

    /// Rounds half away from zero to at most `places` fractional digits.
    ///
    /// Values that already have `places` or fewer fractional digits come back
    /// unchanged; a carry keeps the requested scale (`9.995` to two places is
    /// `10.00`).
    ///
    /// ```
    /// use aio_http::Coordinate;
    ///
    /// let c: Coordinate = "3.145".parse().unwrap();
    /// assert_eq!(c.round(2).to_string(), "3.15");
    ///
    /// let c: Coordinate = "-3.145".parse().unwrap();
    /// assert_eq!(c.round(2).to_string(), "-3.15");
    /// ```
    pub fn round(&self, places: u32) -> Coordinate {
        let places = places as usize;
        if places >= self.scale {
            return self.clone();
        }

        let cut = self.digits.len() - (self.scale - places);
        let mut digits = self.digits[..cut].to_vec();

        if self.digits[cut] >= 5 {
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
            }
        }

        Coordinate::from_parts(self.negative, digits, places)
    }

    fn from_parts(negative: bool, mut digits: Vec<u8>, scale: usize) -> Coordinate {
        while digits.len() > scale + 1 && digits[0] == 0 {
            digits.remove(0);
        }
        while digits.len() < scale + 1 {
            digits.insert(0, 0);
        }
        let negative = negative && digits.iter().any(|d| *d != 0);

        Coordinate {
            negative,
            digits,
            scale,
        }
    }
}

impl FromStr for Coordinate {
    type Err = Error;

    /// Parses a plain decimal: optional sign, digits, at most one decimal point.
    ///
    /// Surrounding whitespace is ignored. Exponents and group separators are rejected.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidCoordinate(format!("not a decimal number: {:?}", s));

        let trimmed = s.trim();
        let (negative, unsigned) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };

        let (integer, fraction) = match unsigned.split_once('.') {
            Some((integer, fraction)) => (integer, fraction),
            None => (unsigned, ""),
        };

        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !integer
            .bytes()
            .chain(fraction.bytes())
            .all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let digits = integer
            .bytes()
            .chain(fraction.bytes())
            .map(|b| b - b'0')
            .collect();

        Ok(Coordinate::from_parts(negative, digits, fraction.len()))
    }
}

impl TryFrom<f64> for Coordinate {
    type Error = Error;

    /// Converts through the shortest decimal text that round-trips the float.
    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidCoordinate(format!(
                "not a finite number: {}",
                value
            )));
        }
        // `Display` for f64 never switches to exponent notation
        value.to_string().parse()
    }
}

impl From<i64> for Coordinate {
    fn from(value: i64) -> Self {
        let digits = value
            .unsigned_abs()
            .to_string()
            .bytes()
            .map(|b| b - b'0')
            .collect();
        Coordinate::from_parts(value < 0, digits, 0)
    }
}

impl From<i32> for Coordinate {
    fn from(value: i32) -> Self {
        Coordinate::from(i64::from(value))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let split = self.digits.len() - self.scale;
        let render = |digits: &[u8]| -> String {
            digits.iter().map(|d| char::from(b'0' + d)).collect()
        };

        if self.negative {
            f.write_str("-")?;
        }
        f.write_str(&render(&self.digits[..split]))?;
        if self.scale > 0 {
            write!(f, ".{}", render(&self.digits[split..]))?;
        }
        Ok(())
    }
}

/// Rounds decimal text to `places` fractional digits.
///
/// Absent or unparsable input yields `None` rather than an error.
///
/// ```
/// use aio_http::coordinate::round_text;
///
/// assert_eq!(round_text(Some("3.14159"), 2).as_deref(), Some("3.14"));
/// assert_eq!(round_text(Some("not-a-number"), 2), None);
/// assert_eq!(round_text(None, 2), None);
/// ```
pub fn round_text(number: Option<&str>, places: u32) -> Option<String> {
    let coordinate: Coordinate = number?.parse().ok()?;
    Some(coordinate.round(places).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Coordinate {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_keeps_caller_precision() {
        assert_eq!(parse("42.500").to_string(), "42.500");
        assert_eq!(parse("  -0093.10 ").to_string(), "-93.10");
        assert_eq!(parse("+7").to_string(), "7");
        assert_eq!(parse(".5").to_string(), "0.5");
        assert_eq!(parse("5.").to_string(), "5");
        assert_eq!(parse("-0.000").to_string(), "0.000");
    }

    #[test]
    fn test_parse_rejects_non_decimals() {
        for input in ["", "-", ".", "1e5", "1,000", "4.2.1", "abc", "NaN", "--1"] {
            assert!(
                matches!(input.parse::<Coordinate>(), Err(Error::InvalidCoordinate(_))),
                "{:?} should be rejected",
                input
            );
        }
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(parse("3.14159").round(2).to_string(), "3.14");
        assert_eq!(parse("3.145").round(2).to_string(), "3.15");
        assert_eq!(parse("-3.145").round(2).to_string(), "-3.15");
        assert_eq!(parse("2.5").round(0).to_string(), "3");
        assert_eq!(parse("0.125").round(2).to_string(), "0.13");
    }

    #[test]
    fn test_round_carries_into_integer_part() {
        assert_eq!(parse("9.995").round(2).to_string(), "10.00");
        assert_eq!(parse("-99.96").round(1).to_string(), "-100.0");
    }

    #[test]
    fn test_round_never_pads() {
        assert_eq!(parse("3.1").round(4).to_string(), "3.1");
        assert_eq!(parse("900").round(2).to_string(), "900");
    }

    #[test]
    fn test_round_to_zero_drops_sign() {
        assert_eq!(parse("-0.001").round(2).to_string(), "0.00");
        assert!(parse("-0.001").round(2).is_zero());
    }

    #[test]
    fn test_from_float() {
        assert_eq!(Coordinate::try_from(42.026944).unwrap().to_string(), "42.026944");
        assert_eq!(Coordinate::try_from(-93.5).unwrap().to_string(), "-93.5");
        assert_eq!(Coordinate::try_from(900.0).unwrap().to_string(), "900");
        assert!(Coordinate::try_from(0.0).unwrap().is_zero());
        assert!(Coordinate::try_from(-0.0).unwrap().is_zero());
        assert!(Coordinate::try_from(f64::NAN).is_err());
        assert!(Coordinate::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn test_from_integers() {
        assert_eq!(Coordinate::from(900).to_string(), "900");
        assert_eq!(Coordinate::from(-15i64).to_string(), "-15");
        assert_eq!(Coordinate::from(i64::MIN).to_string(), i64::MIN.to_string());
        assert!(Coordinate::from(0).is_zero());
    }

    #[test]
    fn test_round_text() {
        assert_eq!(round_text(Some("3.14159"), 2).as_deref(), Some("3.14"));
        assert_eq!(round_text(Some("3.145"), 2).as_deref(), Some("3.15"));
        assert_eq!(round_text(Some("not-a-number"), 2), None);
        assert_eq!(round_text(None, 2), None);
    }
}
