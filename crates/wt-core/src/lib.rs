//! wt-core: stable foundation for wtsim.
//!
//! Contains:
//! - units (uom SI types, tank geometry constructors, standard gravity)
//! - numeric (Real + tolerances + float helpers)
//! - ids (compact arena indices for components and pipes)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod units;

pub use error::{WtError, WtResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
