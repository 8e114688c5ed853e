//! Signal vs. delay time.

use crate::domain::Time;
use crate::spectra::Series;

/// One kinetic trace, ascending in time.
pub type Decay = Series<Time>;

impl Series<Time> {
    pub fn times(&self) -> &[Time] {
        self.axis()
    }

    /// Index of the first sample at or after `t`, if any.
    pub fn first_index_from(&self, t: Time) -> Option<usize> {
        self.times().iter().position(|&x| x >= t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Signal;

    #[test]
    fn first_index_from_time() {
        let d = Decay::new(
            vec![Time::new(-1e-6), Time::ZERO, Time::new(1e-6)],
            vec![Signal::ZERO; 3],
        )
        .unwrap();
        assert_eq!(d.first_index_from(Time::ZERO), Some(1));
        assert_eq!(d.first_index_from(Time::new(5e-6)), None);
        assert_eq!(d.times().len(), 3);
    }
}
