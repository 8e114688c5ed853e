//! Numerical helpers: index search, range averaging and least squares.

pub mod average;
pub mod ols;
pub mod search;

pub use average::*;
pub use ols::*;
pub use search::*;
