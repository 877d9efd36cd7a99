//! Per-tank bookkeeping after transfers: level, temperature and kinetics.

use uom::si::length::meter;
use wt_components::{level_for, relax_temperature};
use wt_network::{ComponentKind, Network, Tank};
use wt_quality::apply_kinetics;

fn tanks_mut(network: &mut Network) -> impl Iterator<Item = &mut Tank> {
    network.components.iter_mut().filter_map(|c| match &mut c.kind {
        ComponentKind::Tank(t) => Some(t),
        _ => None,
    })
}

/// Floor volumes at zero, derive levels and relax temperatures toward
/// `ambient` over `dt` seconds. With `dt == 0` only levels are refreshed.
pub fn update_tanks(network: &mut Network, ambient: f64, dt: f64) {
    for tank in tanks_mut(network) {
        tank.water_amount = tank.water_amount.max(0.0);
        tank.water_level = level_for(tank).get::<meter>();
        let current = tank.water.temperature.unwrap_or(ambient);
        tank.water.temperature = Some(relax_temperature(current, ambient, dt));
    }
}

/// Advance every tank's chemistry by `dt` seconds.
pub fn apply_tank_kinetics(network: &mut Network, dt: f64) {
    for tank in tanks_mut(network) {
        apply_kinetics(
            &mut tank.water,
            tank.decay_rates.as_ref(),
            tank.chemistry.as_ref(),
            dt,
        );
    }
}

/// Saved tank volumes, rolled back between relaxation passes. Quality and
/// temperature mixed in by a pass are kept.
#[derive(Debug, Clone)]
pub(crate) struct TankSnapshot(Vec<(usize, f64)>);

impl TankSnapshot {
    pub(crate) fn take(network: &Network) -> Self {
        Self(
            network
                .components
                .iter()
                .enumerate()
                .filter_map(|(i, c)| c.as_tank().map(|t| (i, t.water_amount)))
                .collect(),
        )
    }

    pub(crate) fn restore(&self, network: &mut Network) {
        for &(i, amount) in &self.0 {
            if let Some(tank) = network.components.get_mut(i).and_then(|c| c.as_tank_mut()) {
                tank.water_amount = amount;
            }
        }
    }

    /// Largest absolute volume change against the current network.
    pub(crate) fn max_volume_change(&self, network: &Network) -> f64 {
        self.0
            .iter()
            .filter_map(|&(i, amount)| {
                let now = network.components.get(i)?.as_tank()?;
                Some((now.water_amount - amount).abs())
            })
            .fold(0.0, f64::max)
    }
}
