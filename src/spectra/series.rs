//! Signal series over a sorted physical axis.
//!
//! [`Spectrum`](super::Spectrum) (signal vs. wavelength) and
//! [`Decay`](super::Decay) (signal vs. time) are the same structure on different
//! axes, so both are aliases of `Series<X>`:
//!
//! - the axis is strictly ascending (no duplicates within tolerance)
//! - `axis.len() == signals.len()`
//! - binary arithmetic requires identical axes

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::domain::{PhysicalQuantity, Signal};
use crate::error::AppError;
use crate::math::{Averageable, SearchOption, average, find_nearest_index};

#[derive(Debug, Clone, PartialEq)]
pub struct Series<X> {
    axis: Vec<X>,
    signals: Vec<Signal>,
}

impl<X: PhysicalQuantity> Series<X> {
    pub fn new(axis: Vec<X>, signals: Vec<Signal>) -> Result<Self, AppError> {
        if axis.len() != signals.len() {
            return Err(AppError::argument_mismatch(format!(
                "Axis has {} points but there are {} signals.",
                axis.len(),
                signals.len()
            )));
        }
        if let Some(i) = axis.windows(2).position(|w| w[0] >= w[1]) {
            return Err(AppError::invalid_value(format!(
                "Axis must be strictly ascending: {:?} is followed by {:?}.",
                axis[i],
                axis[i + 1]
            )));
        }
        Ok(Self { axis, signals })
    }

    /// Build from unsorted `(x, signal)` pairs.
    pub fn from_pairs(mut pairs: Vec<(X, Signal)>) -> Result<Self, AppError> {
        pairs.sort_by(|a, b| a.0.cmp(&b.0));
        let (axis, signals) = pairs.into_iter().unzip();
        Self::new(axis, signals)
    }

    pub fn len(&self) -> usize {
        self.axis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    pub fn axis(&self) -> &[X] {
        &self.axis
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn iter(&self) -> impl Iterator<Item = (X, Signal)> + '_ {
        self.axis.iter().copied().zip(self.signals.iter().copied())
    }

    /// Signal at the axis point nearest to `x`.
    pub fn signal_at(&self, x: X) -> Result<Signal, AppError> {
        let i = find_nearest_index(&self.axis, x, SearchOption::Nearest)?;
        Ok(self.signals[i])
    }

    /// Mean signal over the axis points inside `[min, max]`.
    ///
    /// A range that contains no axis point (it lies between two neighbours)
    /// falls back to the signal nearest to `min`.
    pub fn signal_between(&self, min: X, max: X) -> Result<Signal, AppError> {
        if min > max {
            return Err(AppError::invalid_range(format!(
                "Range minimum {min:?} is greater than maximum {max:?}."
            )));
        }
        if min == max {
            return self.signal_at(min);
        }

        let first = find_nearest_index(&self.axis, min, SearchOption::EqualOrGreater)?;
        let last = find_nearest_index(&self.axis, max, SearchOption::EqualOrLess)?;
        if last <= first {
            return self.signal_at(min);
        }
        average(&self.signals, first, last)
    }

    pub fn checked_add(&self, rhs: &Self) -> Result<Self, AppError> {
        self.zip_with(rhs, |a, b| a + b)
    }

    pub fn checked_sub(&self, rhs: &Self) -> Result<Self, AppError> {
        self.zip_with(rhs, |a, b| a - b)
    }

    pub fn scale(&self, factor: f64) -> Self {
        self.map(|s| s * factor)
    }

    /// Every signal divided by the largest absolute signal.
    pub fn normalized(&self) -> Self {
        let (lo, hi) = self
            .signals
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
                (lo.min(s.od()), hi.max(s.od()))
            });
        let peak = hi.abs().max(lo.abs());
        self.map(|s| s / peak)
    }

    pub fn absolute(&self) -> Self {
        self.map(Signal::absolute)
    }

    fn map(&self, f: impl Fn(Signal) -> Signal) -> Self {
        Self {
            axis: self.axis.clone(),
            signals: self.signals.iter().map(|&s| f(s)).collect(),
        }
    }

    fn zip_with(&self, rhs: &Self, f: impl Fn(Signal, Signal) -> Signal) -> Result<Self, AppError> {
        if self.axis != rhs.axis {
            return Err(AppError::incompatible_range(format!(
                "Axes differ ({} vs {} points); operands must share an identical axis.",
                self.len(),
                rhs.len()
            )));
        }
        Ok(Self {
            axis: self.axis.clone(),
            signals: self
                .signals
                .iter()
                .zip(&rhs.signals)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        })
    }
}

impl<X: PhysicalQuantity> Add for &Series<X> {
    type Output = Result<Series<X>, AppError>;

    fn add(self, rhs: Self) -> Self::Output {
        self.checked_add(rhs)
    }
}

impl<X: PhysicalQuantity> Sub for &Series<X> {
    type Output = Result<Series<X>, AppError>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.checked_sub(rhs)
    }
}

impl<X: PhysicalQuantity> Neg for &Series<X> {
    type Output = Series<X>;

    fn neg(self) -> Series<X> {
        self.map(|s| -s)
    }
}

impl<X: PhysicalQuantity> Mul<f64> for &Series<X> {
    type Output = Series<X>;

    fn mul(self, rhs: f64) -> Series<X> {
        self.scale(rhs)
    }
}

impl<X: PhysicalQuantity> Div<f64> for &Series<X> {
    type Output = Series<X>;

    fn div(self, rhs: f64) -> Series<X> {
        self.map(|s| s / rhs)
    }
}

impl<X: PhysicalQuantity> Averageable for Series<X> {
    fn accumulate(&self, other: &Self) -> Result<Self, AppError> {
        self.checked_add(other)
    }

    fn divide(&self, count: usize) -> Self {
        self / count as f64
    }
}
