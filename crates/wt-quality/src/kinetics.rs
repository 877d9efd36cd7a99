//! Per-tick water-quality kinetics.

use crate::profile::{ChemistryProfile, DecayRates, ReactionParams};
use crate::quality::WaterQuality;
use crate::species::Species;
use crate::{PH_MAX, PH_MIN};

/// Fraction of denitrified nitrate released as CO2.
const DENITRIFICATION_CO2_YIELD: f64 = 0.2;

/// Advance the chemistry of one tank by `dt` seconds.
///
/// Without an enabled reaction profile each configured species decays
/// independently. With reactions, BODn decay drives O2 consumption, CO2
/// production and denitrification, followed by re-aeration, degassing and
/// pH relaxation toward a CO2/O2 dependent target.
pub fn apply_kinetics(
    water: &mut WaterQuality,
    rates: Option<&DecayRates>,
    profile: Option<&ChemistryProfile>,
    dt: f64,
) {
    let dt = dt.max(0.0);
    if dt == 0.0 {
        return;
    }
    let rates = rates.copied().unwrap_or_default();

    match profile {
        Some(profile) if profile.enable_reactions => react(water, &profile.resolve(&rates), dt),
        _ => decay_only(water, &rates, dt),
    }
}

fn decay_only(water: &mut WaterQuality, rates: &DecayRates, dt: f64) {
    for s in Species::ALL {
        if let (Some(k), Some(c)) = (rates.rate(s), water.species(s)) {
            *water.species_mut(s) = Some(c * (-k.max(0.0) * dt).exp());
        }
    }
    water.clamp_species();
}

fn relax_toward(value: f64, target: f64, rate: f64, dt: f64) -> f64 {
    value + (target - value) * (1.0 - (-rate * dt).exp())
}

fn react(water: &mut WaterQuality, p: &ReactionParams, dt: f64) {
    let initial_bodn = water.bodn.unwrap_or(0.0);
    let bodn = Species::Bodn.clamp(initial_bodn * (-p.bodn_decay * dt).exp());
    let bodn_loss = (initial_bodn - bodn).max(0.0);

    let mut o2 = water.o2.unwrap_or(0.0);
    let mut nitrate = water.nitrate.unwrap_or(0.0);
    let mut co2 = water.co2.unwrap_or(0.0);

    if p.o2_decay > 0.0 {
        o2 *= (-p.o2_decay * dt).exp();
    }
    if p.nitrate_decay > 0.0 {
        nitrate *= (-p.nitrate_decay * dt).exp();
    }
    if p.co2_decay > 0.0 {
        co2 *= (-p.co2_decay * dt).exp();
    }

    if bodn_loss > 0.0 {
        if p.bodn_o2_factor > 0.0 {
            o2 = (o2 - bodn_loss * p.bodn_o2_factor).max(0.0);
        }
        if p.bodn_co2_factor != 0.0 {
            co2 = (co2 + bodn_loss * p.bodn_co2_factor).max(0.0);
        }
        if p.denitrification_factor > 0.0 {
            let reduction = nitrate.min(bodn_loss * p.denitrification_factor);
            nitrate = (nitrate - reduction).max(0.0);
            if reduction > 0.0 {
                co2 = (co2 + reduction * DENITRIFICATION_CO2_YIELD).max(0.0);
            }
        }
    }

    if p.reaeration_rate > 0.0 {
        o2 = relax_toward(o2, p.ambient_o2, p.reaeration_rate, dt);
    }
    if p.degas_rate > 0.0 {
        co2 = relax_toward(co2, p.ambient_co2, p.degas_rate, dt);
    }

    let o2 = Species::O2.clamp(o2);
    let nitrate = Species::Nitrate.clamp(nitrate);
    let co2 = Species::Co2.clamp(co2);
    water.bodn = Some(bodn);
    water.o2 = Some(o2);
    water.nitrate = Some(nitrate);
    water.co2 = Some(co2);

    if let Some(ph) = water.ph {
        let target = p.neutral_ph - p.ph_co2_sensitivity * (co2 - p.ambient_co2)
            + p.ph_o2_sensitivity * (o2 - p.ambient_o2);
        let delta = target - ph;
        let relaxed = if p.ph_relax_rate > 0.0 {
            ph + delta * (1.0 - (-p.ph_relax_rate * dt).exp())
        } else {
            ph + delta
        };
        water.ph = Some(wt_core::clamp_or_low(relaxed, PH_MIN, PH_MAX));
    }
}
