//! Inclusive index-range averaging.

use crate::domain::{Signal, Time};
use crate::error::AppError;

/// Values that can be summed and divided by a count.
///
/// Addition is fallible because composite values (spectra) only add on
/// identical axes.
pub trait Averageable: Clone {
    fn accumulate(&self, other: &Self) -> Result<Self, AppError>;
    fn divide(&self, count: usize) -> Self;
}

impl Averageable for Signal {
    fn accumulate(&self, other: &Self) -> Result<Self, AppError> {
        Ok(*self + *other)
    }

    fn divide(&self, count: usize) -> Self {
        *self / count as f64
    }
}

impl Averageable for Time {
    fn accumulate(&self, other: &Self) -> Result<Self, AppError> {
        Ok(*self + *other)
    }

    fn divide(&self, count: usize) -> Self {
        *self / count as f64
    }
}

/// Mean of `values[first..=last]`.
///
/// `first == last` returns the element itself without a division.
pub fn average<T: Averageable>(values: &[T], first: usize, last: usize) -> Result<T, AppError> {
    if first > last {
        return Err(AppError::invalid_range(format!(
            "Average range is reversed: first={first}, last={last}."
        )));
    }
    if last >= values.len() {
        return Err(AppError::invalid_range(format!(
            "Average range [{first}, {last}] is out of bounds for {} values.",
            values.len()
        )));
    }

    let mut sum = values[first].clone();
    if first == last {
        return Ok(sum);
    }
    for v in &values[first + 1..=last] {
        sum = sum.accumulate(v)?;
    }
    Ok(sum.divide(last - first + 1))
}
