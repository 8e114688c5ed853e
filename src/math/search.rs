//! Nearest / directional index search over quantity arrays.
//!
//! The slice does not need to be sorted. Candidates are filtered with the
//! quantity's own (tolerance-based) ordering, so a value that compares equal to
//! the search value always qualifies for both directional options.

use crate::domain::PhysicalQuantity;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOption {
    /// Minimum absolute difference; first index wins ties.
    Nearest,
    /// Smallest element `>= value`.
    EqualOrGreater,
    /// Largest element `<= value`.
    EqualOrLess,
}

/// Index of the element of `values` that best matches `target` under `option`.
pub fn find_nearest_index<T: PhysicalQuantity>(
    values: &[T],
    target: T,
    option: SearchOption,
) -> Result<usize, AppError> {
    let qualifies = |v: &T| match option {
        SearchOption::Nearest => true,
        SearchOption::EqualOrGreater => *v >= target,
        SearchOption::EqualOrLess => *v <= target,
    };

    let mut best: Option<(usize, f64)> = None;
    for (idx, v) in values.iter().enumerate().filter(|(_, v)| qualifies(*v)) {
        let diff = v.value() - target.value();
        let better = match (option, best) {
            (_, None) => true,
            (SearchOption::Nearest, Some((_, d))) => diff.abs() < d.abs(),
            (SearchOption::EqualOrGreater, Some((_, d))) => diff < d,
            // Later indices win ties so the last of several equal values is used.
            (SearchOption::EqualOrLess, Some((_, d))) => diff >= d,
        };
        if better {
            best = Some((idx, diff));
        }
    }

    best.map(|(idx, _)| idx).ok_or_else(|| {
        AppError::empty_search(format!(
            "No element satisfies {option:?} for {:?} among {} values.",
            target,
            values.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Time;

    fn times(v: &[f64]) -> Vec<Time> {
        v.iter().map(|&x| Time::new(x)).collect()
    }

    #[test]
    fn nearest_picks_minimum_distance() {
        let t = times(&[1.0, 5.0, 10.0]);
        assert_eq!(find_nearest_index(&t, Time::new(4.0), SearchOption::Nearest).unwrap(), 1);
        assert_eq!(find_nearest_index(&t, Time::new(-3.0), SearchOption::Nearest).unwrap(), 0);
        // 3 is equidistant from 1 and 5
        assert_eq!(find_nearest_index(&t, Time::new(3.0), SearchOption::Nearest).unwrap(), 0);
    }

    #[test]
    fn directional_options() {
        let t = times(&[1.0, 5.0, 10.0]);
        assert_eq!(find_nearest_index(&t, Time::new(4.0), SearchOption::EqualOrGreater).unwrap(), 1);
        assert_eq!(find_nearest_index(&t, Time::new(4.0), SearchOption::EqualOrLess).unwrap(), 0);
        assert_eq!(find_nearest_index(&t, Time::new(5.0), SearchOption::EqualOrGreater).unwrap(), 1);
        assert_eq!(find_nearest_index(&t, Time::new(5.0), SearchOption::EqualOrLess).unwrap(), 1);
    }

    #[test]
    fn unsorted_input() {
        let t = times(&[10.0, 1.0, 5.0]);
        assert_eq!(find_nearest_index(&t, Time::new(2.0), SearchOption::EqualOrGreater).unwrap(), 2);
        assert_eq!(find_nearest_index(&t, Time::new(7.0), SearchOption::EqualOrLess).unwrap(), 2);
    }

    #[test]
    fn empty_result_is_an_error() {
        let t = times(&[1.0, 5.0, 10.0]);
        let err = find_nearest_index(&t, Time::new(11.0), SearchOption::EqualOrGreater).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::EmptySearchResult);
        assert!(find_nearest_index(&t, Time::new(0.5), SearchOption::EqualOrLess).is_err());
        assert!(find_nearest_index::<Time>(&[], Time::ZERO, SearchOption::Nearest).is_err());
    }
}
