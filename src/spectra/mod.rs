//! Spectra, decays and their range queries.

pub mod collection;
pub mod decay;
pub mod series;
pub mod spectrum;

pub use collection::*;
pub use decay::*;
pub use series::*;
pub use spectrum::*;
