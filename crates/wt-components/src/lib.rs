//! wt-components: hydraulic and state models for network elements.
//!
//! Provides:
//! - Pipe resistance selection (Hazen-Williams, Darcy-Weisbach, linear
//!   fallback) and the flow/head-loss relations
//! - Pump head curves and the operating-point bisection
//! - Valve position commands
//! - Tank cross-section, level and temperature relaxation
//!
//! Every function is a deterministic function of component parameters, so
//! the simulation loop can evaluate them in any order it chooses.
//!
//! # Example
//!
//! ```
//! use wt_components::HydraulicLink;
//! use wt_network::Pipe;
//!
//! let pipe = Pipe::new("a", "b").with_hazen_k(4.0, 1.852);
//! let q = pipe.flow_from_head(2.0);
//! assert!((q - (0.5f64).powf(1.0 / 1.852)).abs() < 1e-12);
//! assert!((pipe.head_loss(q) - 2.0).abs() < 1e-9);
//! ```

pub mod common;
pub mod error;
pub mod pipe;
pub mod pump;
pub mod tank;
pub mod traits;
pub mod valve;

pub use error::{ComponentError, ComponentResult};
pub use pipe::{Resistance, check_pipe, hazen_k};
pub use pump::{PumpCircuit, capacity, check_pump, pump_head};
pub use tank::{check_tank, cross_section_area, level_for, relax_temperature};
pub use traits::HydraulicLink;
pub use valve::{ValveCommand, check_valve, set_valve_flow};
