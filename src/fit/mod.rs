//! Decay fitting.
//!
//! Responsibilities:
//!
//! - the `DecayFunction` / `DecayFunctionModel` seam and `ExponentialsDecay`
//! - single- and double-exponential models
//! - the model registry
//! - fitting-range arguments and `fit_decay` (decay → fitted function)

pub mod analysis;
pub mod double;
pub mod model;
pub mod range_arg;
pub mod registry;
pub mod single;
pub mod tau_grid;

pub use analysis::*;
pub use double::*;
pub use model::*;
pub use range_arg::*;
pub use registry::*;
pub use single::*;
pub use tau_grid::*;
