//! Discrete-time simulation of water-treatment networks.
//!
//! Provides:
//! - Pump transfers solved for the operating point against static head and
//!   pipe losses
//! - Passive head-driven flow through pipes, junctions and open valves
//! - Tank level, temperature and water-quality kinetics per tick
//! - Scheduled controls, conditional rules and attacks applied before the
//!   hydraulics of each tick
//! - Flat per-tick records, with poisoned readings reported alongside the
//!   true values

pub mod error;
pub mod record;
pub mod sim;
pub mod tanks;
pub mod transfers;

pub use error::{SimError, SimResult};
pub use record::{StepRecord, record_step};
pub use sim::{SimOptions, SimOutput, SimProgress, Stepper, run, run_scenario, run_with_progress};
pub use tanks::{apply_tank_kinetics, update_tanks};
pub use transfers::{apply_passive_flows, apply_pump_transfers};
