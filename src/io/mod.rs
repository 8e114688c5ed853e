//! Input/output helpers.
//!
//! - two-column CSV ingest (`ingest`)
//! - spectra CSV export (`export`)
//! - `.tas` dataset archives (`archive`)

pub mod archive;
pub mod export;
pub mod ingest;

pub use archive::*;
pub use export::*;
pub use ingest::*;
