//! wt-quality: water-quality state and chemistry for wtsim tanks.
//!
//! Provides:
//! - Tracked dissolved species with physical bounds
//! - The `WaterQuality` carrier shared by tanks and sources, with
//!   volume-weighted mixing
//! - Per-tank decay rates and the reaction profile with its defaults
//! - First-order decay and the coupled BOD/O2/CO2/nitrate/pH reaction step

pub mod error;
pub mod kinetics;
pub mod profile;
pub mod quality;
pub mod species;

pub use error::{QualityError, QualityResult};
pub use kinetics::apply_kinetics;
pub use profile::{ChemistryProfile, DecayRates, ReactionParams};
pub use quality::WaterQuality;
pub use species::Species;

/// pH scale limits.
pub const PH_MIN: f64 = 0.0;
pub const PH_MAX: f64 = 14.0;
