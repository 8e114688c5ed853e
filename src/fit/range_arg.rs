//! Fitting-range argument: `"<start>-<end>"` with optional bounds.

use crate::domain::{ScientificValue, Time, parse_bounds};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FitRange {
    pub start: Option<Time>,
    pub end: Option<Time>,
}

impl FitRange {
    /// `None` or an empty string means "all samples".
    pub fn parse(args: Option<&str>) -> Result<Self, AppError> {
        let Some(text) = args else {
            return Ok(Self::default());
        };
        let (start, end) = parse_bounds::<Time>(text)?;
        Ok(Self { start, end })
    }

    /// Drop leading samples below `start`, then keep samples up to `end`.
    ///
    /// `y` is trimmed by the same counts as `x`; it is not checked against `x`
    /// here so callers can report a length mismatch on the trimmed data.
    pub fn apply(&self, x: &[f64], y: &[f64]) -> (Vec<f64>, Vec<f64>) {
        let skip = match self.start {
            Some(s) => x.iter().take_while(|&&v| Time::new(v) < s).count(),
            None => 0,
        };
        let x = &x[skip..];
        let y = y.get(skip..).unwrap_or(&[]);

        let keep = match self.end {
            Some(e) => x.iter().take_while(|&&v| Time::new(v) <= e).count(),
            None => x.len(),
        };
        let x = x[..keep].to_vec();
        let y = match self.end {
            Some(_) => y[..keep.min(y.len())].to_vec(),
            None => y.to_vec(),
        };
        (x, y)
    }

    pub fn label(&self) -> String {
        let bound = |b: Option<Time>| b.map(|t| ScientificValue::new(t).text()).unwrap_or_default();
        format!("{}-{}", bound(self.start), bound(self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_optional_bounds() {
        assert_eq!(FitRange::parse(None).unwrap(), FitRange::default());
        let r = FitRange::parse(Some("1 us-")).unwrap();
        assert_eq!(r.start, Some(Time::new(1e-6)));
        assert_eq!(r.end, None);
        assert!(FitRange::parse(Some("1 us to 2 us")).is_err());
    }

    #[test]
    fn trims_samples() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = [10.0, 11.0, 12.0, 13.0, 14.0];
        let r = FitRange {
            start: Some(Time::new(1.0)),
            end: Some(Time::new(3.0)),
        };
        let (xs, ys) = r.apply(&x, &y);
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
        assert_eq!(ys, vec![11.0, 12.0, 13.0]);
    }

    #[test]
    fn open_end_keeps_tail() {
        let r = FitRange::parse(Some("2 s-")).unwrap();
        let (xs, ys) = r.apply(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(xs, vec![2.0, 3.0]);
        assert_eq!(ys, vec![2.0, 3.0]);
        assert_eq!(r.label(), "2 s-");
    }
}
