//! Value ranges and their text forms.
//!
//! Two textual encodings exist:
//!
//! - persisted ranges: a `{ "start": "...", "end": "..." }` pair of
//!   scientific-value strings (`ValueRange<T>` via serde)
//! - range arguments: `"<start>-<end>"` with either bound optional, as typed by
//!   a user (`parse_bounds`)

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::quantity::PhysicalQuantity;
use crate::domain::scientific::ScientificValue;
use crate::error::AppError;

/// An inclusive `[start, end]` range of a physical quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueRange<T> {
    pub start: T,
    pub end: T,
}

impl<T: PhysicalQuantity> ValueRange<T> {
    pub fn new(start: T, end: T) -> Self {
        Self { start, end }
    }

    /// Parse a `"<start>-<end>"` argument where both bounds are required.
    pub fn parse(text: &str) -> Result<Self, AppError> {
        match parse_bounds::<T>(text)? {
            (Some(start), Some(end)) => Ok(Self { start, end }),
            _ => Err(AppError::format(format!(
                "Range '{text}' must have both a start and an end."
            ))),
        }
    }

    /// Human-readable label, e.g. `"1 us - 5 us"`.
    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            ScientificValue::new(self.start),
            ScientificValue::new(self.end)
        )
    }
}

#[derive(Serialize, Deserialize)]
#[serde(bound = "")]
struct RangeText<T: PhysicalQuantity> {
    start: ScientificValue<T>,
    end: ScientificValue<T>,
}

impl<T: PhysicalQuantity> Serialize for ValueRange<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        RangeText {
            start: ScientificValue::new(self.start),
            end: ScientificValue::new(self.end),
        }
        .serialize(serializer)
    }
}

impl<'de, T: PhysicalQuantity> Deserialize<'de> for ValueRange<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = RangeText::<T>::deserialize(deserializer)?;
        Ok(Self {
            start: text.start.value(),
            end: text.end.value(),
        })
    }
}

/// Parse `"<start>-<end>"` where each bound is scientific-value text and may be
/// omitted (`"1 us-"`, `"-10 us"`, `"-"`).
///
/// Bounds can be negative themselves (`"-1 us-5 us"`), so the separator is the
/// first `-` for which both sides parse.
pub fn parse_bounds<T: PhysicalQuantity>(text: &str) -> Result<(Option<T>, Option<T>), AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok((None, None));
    }

    for (idx, c) in text.char_indices() {
        if c != '-' {
            continue;
        }
        let (left, right) = (text[..idx].trim(), text[idx + 1..].trim());
        let Ok(start) = parse_optional::<T>(left) else {
            continue;
        };
        let Ok(end) = parse_optional::<T>(right) else {
            continue;
        };
        return Ok((start, end));
    }

    Err(AppError::format(format!(
        "Invalid range '{text}': expected '<start>-<end>' (e.g. '1 us-10 us')."
    )))
}

fn parse_optional<T: PhysicalQuantity>(text: &str) -> Result<Option<T>, AppError> {
    if text.is_empty() {
        return Ok(None);
    }
    Ok(Some(ScientificValue::<T>::parse(text)?.value()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Time, Wavelength};

    #[test]
    fn parses_open_and_closed_bounds() {
        let (s, e) = parse_bounds::<Time>("1 us-10 us").unwrap();
        assert_eq!(s, Some(Time::new(1e-6)));
        assert_eq!(e, Some(Time::new(10e-6)));

        let (s, e) = parse_bounds::<Time>("1 us-").unwrap();
        assert_eq!((s, e), (Some(Time::new(1e-6)), None));

        let (s, e) = parse_bounds::<Time>("-10 us").unwrap();
        assert_eq!((s, e), (None, Some(Time::new(10e-6))));

        assert_eq!(parse_bounds::<Time>("").unwrap(), (None, None));
        assert_eq!(parse_bounds::<Time>("-").unwrap(), (None, None));
    }

    #[test]
    fn negative_start_bound() {
        let (s, e) = parse_bounds::<Time>("-1 us-5 us").unwrap();
        assert_eq!(s, Some(Time::new(-1e-6)));
        assert_eq!(e, Some(Time::new(5e-6)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_bounds::<Time>("soon-later").is_err());
        assert!(ValueRange::<Time>::parse("1 us-").is_err());
    }

    #[test]
    fn wavelength_band() {
        let r = ValueRange::<Wavelength>::parse("500 nm-600 nm").unwrap();
        assert_eq!(r.start.nanometers(), 500.0);
        assert_eq!(r.label(), "500 nm - 600 nm");
    }

    #[test]
    fn serializes_as_scientific_text() {
        let r = ValueRange::new(Time::new(1e-6), Time::new(2.5e-6));
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"start":"1 us","end":"2.5 us"}"#);
        let back: ValueRange<Time> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
