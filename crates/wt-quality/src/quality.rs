//! Intensive water properties carried by tanks and sources.

use serde::{Deserialize, Serialize};

use crate::species::Species;

/// Temperature, pH and dissolved species of a body of water.
///
/// Every field is optional: an absent value is "not tracked", which matters
/// for mixing (an untracked receiver adopts the supply value only while empty).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterQuality {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bodn: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nitrate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2: Option<f64>,
}

impl WaterQuality {
    pub fn species(&self, s: Species) -> Option<f64> {
        match s {
            Species::O2 => self.o2,
            Species::Bodn => self.bodn,
            Species::Nitrate => self.nitrate,
            Species::Co2 => self.co2,
        }
    }

    pub fn species_mut(&mut self, s: Species) -> &mut Option<f64> {
        match s {
            Species::O2 => &mut self.o2,
            Species::Bodn => &mut self.bodn,
            Species::Nitrate => &mut self.nitrate,
            Species::Co2 => &mut self.co2,
        }
    }

    /// Named values in mixing order, for recording and sensor reads.
    pub fn fields(&self) -> [(&'static str, Option<f64>); 6] {
        [
            ("temperature", self.temperature),
            ("ph", self.ph),
            ("o2", self.o2),
            ("bodn", self.bodn),
            ("nitrate", self.nitrate),
            ("co2", self.co2),
        ]
    }

    /// Look up a field by its serialized name.
    pub fn field(&self, key: &str) -> Option<f64> {
        self.fields()
            .into_iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v)
    }

    fn slots_mut(&mut self) -> [&mut Option<f64>; 6] {
        [
            &mut self.temperature,
            &mut self.ph,
            &mut self.o2,
            &mut self.bodn,
            &mut self.nitrate,
            &mut self.co2,
        ]
    }

    /// Blend `volume` of `supply` into `existing` volume of this water.
    ///
    /// Returns the new total volume, or `None` when nothing was mixed
    /// (non-positive volume or non-positive total).
    pub fn mix_from(&mut self, existing: f64, supply: &WaterQuality, volume: f64) -> Option<f64> {
        if volume <= 0.0 {
            return None;
        }
        let total = existing + volume;
        if total <= 0.0 {
            return None;
        }

        let incoming = supply.fields();
        for (slot, (_, supply_value)) in self.slots_mut().into_iter().zip(incoming) {
            match (*slot, supply_value) {
                (Some(own), Some(theirs)) => {
                    *slot = Some((own * existing + theirs * volume) / total);
                }
                (None, Some(theirs)) if existing == 0.0 => *slot = Some(theirs),
                _ => {}
            }
        }
        Some(total)
    }

    /// Clamp every tracked species to its bound.
    pub fn clamp_species(&mut self) {
        for s in Species::ALL {
            let slot = self.species_mut(s);
            if let Some(v) = *slot {
                *slot = Some(s.clamp(v));
            }
        }
    }
}
