//! Dataset loading and assembly.
//!
//! - raw measurement tree (`raw`)
//! - loading configuration (`config`)
//! - metadata/analysis documents (`documents`)
//! - µs-TAS assembly (`ustas`)
//! - synthetic measurements (`synthetic`)

pub mod config;
pub mod documents;
pub mod raw;
pub mod synthetic;
pub mod ustas;

pub use config::*;
pub use documents::*;
pub use raw::RawData;
pub use synthetic::*;
pub use ustas::*;
