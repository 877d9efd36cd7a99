//! Per-tank decay rates and reaction profile.

use serde::{Deserialize, Serialize};

use crate::error::{QualityError, QualityResult};
use crate::species::Species;

/// Independent first-order decay constants (1/s) per species.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DecayRates {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bodn: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nitrate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2: Option<f64>,
}

impl DecayRates {
    pub fn rate(&self, s: Species) -> Option<f64> {
        match s {
            Species::O2 => self.o2,
            Species::Bodn => self.bodn,
            Species::Nitrate => self.nitrate,
            Species::Co2 => self.co2,
        }
    }

    pub fn validate(&self) -> QualityResult<()> {
        for s in Species::ALL {
            check_rate(self.rate(s), s.key())?;
        }
        Ok(())
    }
}

/// Reaction toggles and rates for a tank.
///
/// Absent values fall back to the defaults in [`ReactionParams::default`].
/// The older spellings `reaerationRate` and `co2PhSensitivity` are kept as
/// their own fields and take precedence when a file carries both names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChemistryProfile {
    #[serde(default)]
    pub enable_reactions: bool,
    #[serde(default, rename = "ambientO2", skip_serializing_if = "Option::is_none")]
    pub ambient_o2: Option<f64>,
    #[serde(default, rename = "ambientCO2", skip_serializing_if = "Option::is_none")]
    pub ambient_co2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bodn_decay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o2_reaeration_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaeration_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_degas_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bodn_o2_factor: Option<f64>,
    #[serde(default, rename = "bodnCO2Factor", skip_serializing_if = "Option::is_none")]
    pub bodn_co2_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub denitrification_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nitrate_decay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub o2_decay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_decay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral_ph: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph_co2_sensitivity: Option<f64>,
    #[serde(default, rename = "co2PhSensitivity", skip_serializing_if = "Option::is_none")]
    pub co2_ph_sensitivity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph_o2_sensitivity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ph_relax_rate: Option<f64>,
}

/// Fully resolved reaction parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReactionParams {
    pub ambient_o2: f64,
    pub ambient_co2: f64,
    pub bodn_decay: f64,
    pub nitrate_decay: f64,
    pub o2_decay: f64,
    pub co2_decay: f64,
    pub reaeration_rate: f64,
    pub degas_rate: f64,
    pub bodn_o2_factor: f64,
    pub bodn_co2_factor: f64,
    pub denitrification_factor: f64,
    pub neutral_ph: f64,
    pub ph_co2_sensitivity: f64,
    pub ph_o2_sensitivity: f64,
    pub ph_relax_rate: f64,
}

impl Default for ReactionParams {
    fn default() -> Self {
        Self {
            ambient_o2: 8.0,
            ambient_co2: 5.0,
            bodn_decay: 0.01,
            nitrate_decay: 0.001,
            o2_decay: 0.0,
            co2_decay: 0.0,
            reaeration_rate: 0.003,
            degas_rate: 0.001,
            bodn_o2_factor: 1.5,
            bodn_co2_factor: 0.6,
            denitrification_factor: 0.05,
            neutral_ph: 7.0,
            ph_co2_sensitivity: 0.08,
            ph_o2_sensitivity: 0.02,
            ph_relax_rate: 0.2,
        }
    }
}

impl ChemistryProfile {
    /// Resolve rates: per-tank decay rate, then profile value, then default.
    /// Rates are floored at zero.
    pub fn resolve(&self, rates: &DecayRates) -> ReactionParams {
        let d = ReactionParams::default();
        let rate = |tank: Option<f64>, profile: Option<f64>, default: f64| {
            tank.or(profile).unwrap_or(default).max(0.0)
        };
        ReactionParams {
            ambient_o2: self.ambient_o2.unwrap_or(d.ambient_o2),
            ambient_co2: self.ambient_co2.unwrap_or(d.ambient_co2),
            bodn_decay: rate(rates.bodn, self.bodn_decay, d.bodn_decay),
            nitrate_decay: rate(rates.nitrate, self.nitrate_decay, d.nitrate_decay),
            o2_decay: rate(rates.o2, self.o2_decay, d.o2_decay),
            co2_decay: rate(rates.co2, self.co2_decay, d.co2_decay),
            reaeration_rate: rate(
                self.reaeration_rate,
                self.o2_reaeration_rate,
                d.reaeration_rate,
            ),
            degas_rate: rate(None, self.co2_degas_rate, d.degas_rate),
            bodn_o2_factor: self.bodn_o2_factor.unwrap_or(d.bodn_o2_factor),
            bodn_co2_factor: self.bodn_co2_factor.unwrap_or(d.bodn_co2_factor),
            denitrification_factor: self
                .denitrification_factor
                .unwrap_or(d.denitrification_factor),
            neutral_ph: self.neutral_ph.unwrap_or(d.neutral_ph),
            ph_co2_sensitivity: self
                .co2_ph_sensitivity
                .or(self.ph_co2_sensitivity)
                .unwrap_or(d.ph_co2_sensitivity),
            ph_o2_sensitivity: self.ph_o2_sensitivity.unwrap_or(d.ph_o2_sensitivity),
            ph_relax_rate: rate(None, self.ph_relax_rate, d.ph_relax_rate),
        }
    }

    pub fn validate(&self) -> QualityResult<()> {
        for (what, v) in [
            ("bodnDecay", self.bodn_decay),
            ("o2ReaerationRate", self.o2_reaeration_rate),
            ("reaerationRate", self.reaeration_rate),
            ("co2DegasRate", self.co2_degas_rate),
            ("nitrateDecay", self.nitrate_decay),
            ("o2Decay", self.o2_decay),
            ("co2Decay", self.co2_decay),
            ("phRelaxRate", self.ph_relax_rate),
        ] {
            check_rate(v, what)?;
        }
        for (what, v) in [
            ("ambientO2", self.ambient_o2),
            ("ambientCO2", self.ambient_co2),
            ("bodnO2Factor", self.bodn_o2_factor),
            ("bodnCO2Factor", self.bodn_co2_factor),
            ("denitrificationFactor", self.denitrification_factor),
            ("neutralPh", self.neutral_ph),
            ("phCo2Sensitivity", self.ph_co2_sensitivity),
            ("co2PhSensitivity", self.co2_ph_sensitivity),
            ("phO2Sensitivity", self.ph_o2_sensitivity),
        ] {
            if let Some(v) = v
                && !v.is_finite()
            {
                return Err(QualityError::NonFinite { what });
            }
        }
        Ok(())
    }
}

fn check_rate(v: Option<f64>, what: &'static str) -> QualityResult<()> {
    match v {
        Some(v) if !v.is_finite() => Err(QualityError::NonFinite { what }),
        Some(v) if v < 0.0 => Err(QualityError::NegativeRate { what, value: v }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        let p = ChemistryProfile::default().resolve(&DecayRates::default());
        assert_eq!(p, ReactionParams::default());
    }

    #[test]
    fn tank_rate_beats_profile_rate() {
        let profile = ChemistryProfile {
            bodn_decay: Some(0.5),
            ..Default::default()
        };
        let rates = DecayRates {
            bodn: Some(0.2),
            ..Default::default()
        };
        assert_eq!(profile.resolve(&rates).bodn_decay, 0.2);
        assert_eq!(profile.resolve(&DecayRates::default()).bodn_decay, 0.5);
    }

    #[test]
    fn negative_rates_floor_at_zero() {
        let rates = DecayRates {
            o2: Some(-1.0),
            ..Default::default()
        };
        assert_eq!(ChemistryProfile::default().resolve(&rates).o2_decay, 0.0);
        assert!(rates.validate().is_err());
    }

    #[test]
    fn legacy_key_names() {
        let p: ChemistryProfile = serde_json::from_str(
            r#"{"enableReactions": true, "reaerationRate": 0.01, "co2PhSensitivity": 0.1, "ambientCO2": 4}"#,
        )
        .unwrap();
        let r = p.resolve(&DecayRates::default());
        assert_eq!(r.reaeration_rate, 0.01);
        assert_eq!(r.ph_co2_sensitivity, 0.1);
        assert_eq!(r.ambient_co2, 4.0);
        assert!(p.enable_reactions);
    }

    #[test]
    fn older_spelling_wins_when_both_present() {
        let p: ChemistryProfile = serde_json::from_str(
            r#"{"o2ReaerationRate": 0.02, "reaerationRate": 0.01,
                "phCo2Sensitivity": 0.3, "co2PhSensitivity": 0.1}"#,
        )
        .unwrap();
        let r = p.resolve(&DecayRates::default());
        assert_eq!(r.reaeration_rate, 0.01);
        assert_eq!(r.ph_co2_sensitivity, 0.1);

        let back: ChemistryProfile = serde_json::from_str(&serde_json::to_string(&p).unwrap()).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn current_spelling_alone_is_used() {
        let p: ChemistryProfile =
            serde_json::from_str(r#"{"o2ReaerationRate": 0.02, "phCo2Sensitivity": 0.3}"#).unwrap();
        let r = p.resolve(&DecayRates::default());
        assert_eq!(r.reaeration_rate, 0.02);
        assert_eq!(r.ph_co2_sensitivity, 0.3);
    }
}
