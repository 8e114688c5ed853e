//! Scientific-value text format.
//!
//! A quantity is rendered as `"{value} {prefix}{unit}"` with the SI prefix that
//! brings the magnitude into `[1, 1000)`, e.g. `1.5e-6 s` → `"1.5 us"`. Parsing is
//! the exact inverse for every string the formatter produces, which is what the
//! archive format and the fitting-range arguments rely on.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::quantity::PhysicalQuantity;
use crate::error::AppError;

/// SI prefixes from quetta (10^30) down to quecto (10^-30).
const PREFIX: [char; 21] = [
    'Q', 'R', 'Y', 'Z', 'E', 'P', 'T', 'G', 'M', 'k', '\0', 'm', 'u', 'n', 'p', 'f', 'a', 'z', 'y', 'r',
    'q',
];
const CENTER: i32 = 10;
const MAX_STEPS: i32 = 10;
const DECIMALS: f64 = 1e6;

/// Static unit metadata bound to a quantity type.
pub trait UnitDescriptor {
    /// Unit symbol (without prefix).
    const UNIT: &'static str;
    /// Whether the unit is written with SI prefixes.
    const ACCEPTS_SI_PREFIX: bool;
    /// Value returned by `ScientificValue::default_value()`.
    const DEFAULT_VALUE: f64;
}

/// A physical quantity paired with its human-readable representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScientificValue<T> {
    value: T,
}

impl<T: PhysicalQuantity> ScientificValue<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// Parse a scientific-value string such as `"1.5 us"` or `"532 nm"`.
    pub fn parse(text: &str) -> Result<Self, AppError> {
        let text = text.trim();
        let Some((number, unit)) = text.split_once(' ') else {
            return Err(AppError::format(format!(
                "Invalid scientific value '{text}': expected '<value> <prefix>{}'.",
                T::UNIT
            )));
        };

        let v: f64 = number
            .trim()
            .parse()
            .map_err(|e| AppError::format(format!("Invalid number in '{text}': {e}")))?;
        if !v.is_finite() {
            return Err(AppError::format(format!("Non-finite number in '{text}'.")));
        }

        let unit = unit.trim();
        let Some(prefix) = unit.strip_suffix(T::UNIT) else {
            return Err(AppError::format(format!(
                "Invalid unit in '{text}': expected '{}'.",
                T::UNIT
            )));
        };

        let n = parse_prefix::<T>(prefix)
            .ok_or_else(|| AppError::format(format!("Unknown SI prefix '{prefix}' in '{text}'.")))?;

        let scaled = if n >= 0 {
            v * 1000f64.powi(n)
        } else {
            v / 1000f64.powi(-n)
        };
        Ok(Self::new(T::from_f64(scaled)?))
    }

    /// The descriptor's default value for `T`.
    pub fn default_value() -> Result<Self, AppError> {
        Ok(Self::new(T::from_f64(T::DEFAULT_VALUE)?))
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn value_f64(&self) -> f64 {
        self.value.value()
    }

    /// The formatted representation.
    pub fn text(&self) -> String {
        let (norm, steps) = normalize::<T>(self.value.value());
        let prefix = prefix_symbol(steps);
        format!("{norm} {prefix}{}", T::UNIT)
    }
}

impl<T: PhysicalQuantity> From<T> for ScientificValue<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: PhysicalQuantity> std::fmt::Display for ScientificValue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

impl<T: PhysicalQuantity> FromStr for ScientificValue<T> {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<T: PhysicalQuantity> Serialize for ScientificValue<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text())
    }
}

impl<'de, T: PhysicalQuantity> Deserialize<'de> for ScientificValue<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Format a quantity without building a `ScientificValue`.
pub fn format_quantity<T: PhysicalQuantity>(value: T) -> String {
    ScientificValue::new(value).text()
}

/// Parse a quantity from scientific-value text.
pub fn parse_quantity<T: PhysicalQuantity>(text: &str) -> Result<T, AppError> {
    Ok(ScientificValue::<T>::parse(text)?.value())
}

/// Scale `value` into `[1, 1000)` and round to six decimals.
///
/// Returns the normalized number and the number of thousand-steps taken
/// (positive = larger prefix).
fn normalize<T: PhysicalQuantity>(value: f64) -> (f64, i32) {
    if !T::ACCEPTS_SI_PREFIX || value == 0.0 || !value.is_finite() {
        return (round_decimals(value), 0);
    }

    let mut n = 0;
    let mut probe = value.abs();
    while probe >= 1000.0 && n < MAX_STEPS {
        probe /= 1000.0;
        n += 1;
    }
    while probe < 1.0 && n > -MAX_STEPS {
        probe *= 1000.0;
        n -= 1;
    }

    let mut norm = round_decimals(scale_down(value, n));
    // Rounding can push 999.9999996 up to 1000; move to the next prefix so the
    // text stays a fixed point of format(parse(text)).
    if norm.abs() >= 1000.0 && n < MAX_STEPS {
        n += 1;
        norm = round_decimals(scale_down(value, n));
    }
    // Below the smallest prefix a value can still round away entirely.
    if norm == 0.0 {
        return (0.0, 0);
    }
    (norm, n)
}

fn scale_down(value: f64, n: i32) -> f64 {
    if n >= 0 {
        value / 1000f64.powi(n)
    } else {
        value * 1000f64.powi(-n)
    }
}

fn round_decimals(value: f64) -> f64 {
    let r = (value * DECIMALS).round() / DECIMALS;
    // Avoid rendering "-0".
    if r == 0.0 { 0.0 } else { r }
}

fn prefix_symbol(steps: i32) -> String {
    let c = PREFIX[(CENTER - steps) as usize];
    if c == '\0' { String::new() } else { c.to_string() }
}

fn parse_prefix<T: PhysicalQuantity>(prefix: &str) -> Option<i32> {
    if prefix.is_empty() {
        return Some(0);
    }
    if !T::ACCEPTS_SI_PREFIX {
        return None;
    }

    let mut chars = prefix.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    let c = match c {
        'µ' | 'μ' => 'u',
        other => other,
    };
    let idx = PREFIX.iter().position(|&p| p == c && p != '\0')?;
    Some(CENTER - idx as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Signal, Time, Wavelength};
    use crate::error::ErrorKind;

    #[test]
    fn formats_with_si_prefix() {
        assert_eq!(format_quantity(Time::new(1.5e-6)), "1.5 us");
        assert_eq!(format_quantity(Time::new(2.0)), "2 s");
        assert_eq!(format_quantity(Time::new(-250e-9)), "-250 ns");
        assert_eq!(format_quantity(Time::new(1500.0)), "1.5 ks");
        assert_eq!(format_quantity(Signal::new(0.0123)), "12.3 mOD");
        assert_eq!(format_quantity(Time::ZERO), "0 s");
    }

    #[test]
    fn wavelength_has_no_prefix() {
        let wl = Wavelength::new(1500.0).unwrap();
        assert_eq!(format_quantity(wl), "1500 nm");
        assert!(ScientificValue::<Wavelength>::parse("1.5 knm").is_err());
        assert_eq!(parse_quantity::<Wavelength>("532 nm").unwrap().nanometers(), 532.0);
    }

    #[test]
    fn parses_formatter_output() {
        let v = ScientificValue::<Time>::parse("1.5 us").unwrap();
        assert!((v.value_f64() - 1.5e-6).abs() < 1e-20);
        assert_eq!(v.text(), "1.5 us");

        let mu = ScientificValue::<Time>::parse("1.5 µs").unwrap();
        assert_eq!(mu.value(), v.value());
    }

    #[test]
    fn text_round_trip_is_stable() {
        for &x in &[1.5e-6, -3.25e-9, 123.456789e-3, 0.999_999_999_7e-6, 42.0, 7.1e-12] {
            let text = format_quantity(Time::new(x));
            let again = ScientificValue::<Time>::parse(&text).unwrap().text();
            assert_eq!(text, again, "round trip failed for {x}");
        }
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!(ScientificValue::<Time>::parse("1.5").unwrap_err().kind(), ErrorKind::Format);
        assert!(ScientificValue::<Time>::parse("abc us").is_err());
        assert!(ScientificValue::<Time>::parse("1 xs").is_err());
        assert!(ScientificValue::<Time>::parse("1 um").is_err());
        assert!(ScientificValue::<Wavelength>::parse("-5 nm").is_err());
        for text in ["NaN s", "inf us", "-inf s"] {
            assert_eq!(ScientificValue::<Time>::parse(text).unwrap_err().kind(), ErrorKind::Format, "{text}");
        }
    }

    #[test]
    fn vanishing_values_render_as_zero() {
        assert_eq!(format_quantity(Time::new(1e-40)), "0 s");
        assert_eq!(format_quantity(Time::new(-4e-37)), "0 s");
        assert_eq!(format_quantity(Time::new(3e-30)), "3 qs");
    }

    #[test]
    fn default_uses_descriptor_value() {
        assert_eq!(ScientificValue::<Wavelength>::default_value().unwrap().value_f64(), 532.0);
        assert_eq!(ScientificValue::<Time>::default_value().unwrap().value(), Time::ZERO);
    }

    #[test]
    fn serde_uses_text() {
        let v = ScientificValue::new(Time::new(2.5e-3));
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "\"2.5 ms\"");
        let back: ScientificValue<Time> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.value(), v.value());
    }
}
