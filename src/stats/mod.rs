//! Statistics used for t0 detection: moments, Student's t and Grubbs' test.

pub mod dist;
pub mod outlier;

pub use dist::*;
pub use outlier::*;
