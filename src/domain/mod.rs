//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - the physical quantities (`Time`, `Wavelength`, `Signal`)
//! - the scientific-value text format (`ScientificValue`)
//! - persisted value ranges (`ValueRange`)

pub mod quantity;
pub mod range;
pub mod scientific;

pub use quantity::*;
pub use range::*;
pub use scientific::*;
