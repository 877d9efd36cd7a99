//! Scenario validation, run once after load and migration.

use tracing::warn;
use wt_components::{ComponentError, check_pipe, check_pump, check_tank, check_valve};
use wt_controls::{ControlError, validate_schedules};
use wt_network::{Component, ComponentKind, NetworkError, dangling_pipes, validate_network};

use crate::schema::Scenario;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported feature: {feature} - {reason}")]
    Unsupported { feature: String, reason: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

impl From<NetworkError> for ValidationError {
    fn from(e: NetworkError) -> Self {
        match e {
            NetworkError::DuplicateId { id } => ValidationError::DuplicateId {
                id,
                context: "network.components".to_string(),
            },
            NetworkError::EmptyId { position } => ValidationError::InvalidValue {
                field: format!("network.components[{position}].id"),
                value: String::new(),
                reason: "id must not be empty".to_string(),
            },
            NetworkError::UnknownComponent { id } => ValidationError::MissingReference {
                id,
                context: "network".to_string(),
            },
        }
    }
}

impl From<ControlError> for ValidationError {
    fn from(e: ControlError) -> Self {
        let reason = e.to_string();
        match e {
            ControlError::UnknownComponent { id, context } => {
                ValidationError::MissingReference { id, context }
            }
            ControlError::WrongKind {
                context, expected, ..
            } => ValidationError::Unsupported {
                feature: context,
                reason: format!("{reason} (needs a {expected})"),
            },
            ControlError::InvalidParam {
                context,
                param,
                value,
            } => ValidationError::InvalidValue {
                field: format!("{context}.{param}"),
                value,
                reason,
            },
            ControlError::InvalidAttack { context, what } => ValidationError::InvalidValue {
                field: context,
                value: String::new(),
                reason: what,
            },
            ControlError::InvalidArg { what } => ValidationError::InvalidValue {
                field: "schedules".to_string(),
                value: String::new(),
                reason: what.to_string(),
            },
        }
    }
}

fn component_error(comp: &Component, e: ComponentError) -> ValidationError {
    let reason = e.to_string();
    let what = match e {
        ComponentError::NonPhysical { what } | ComponentError::InvalidArg { what } => what,
    };
    ValidationError::InvalidValue {
        field: format!("{}.{what}", comp.id),
        value: String::new(),
        reason,
    }
}

fn validate_component(comp: &Component) -> Result<(), ValidationError> {
    let mut non_finite = None;
    comp.for_each_numeric(|key, v| {
        if non_finite.is_none() && !v.is_finite() {
            non_finite = Some((key.to_string(), v));
        }
    });
    if let Some((key, v)) = non_finite {
        return Err(ValidationError::InvalidValue {
            field: format!("{}.{key}", comp.id),
            value: v.to_string(),
            reason: "must be finite".to_string(),
        });
    }

    let quality = |e: wt_quality::QualityError| ValidationError::InvalidValue {
        field: format!("{}.chemistry", comp.id),
        value: String::new(),
        reason: e.to_string(),
    };
    match &comp.kind {
        ComponentKind::Tank(t) => {
            check_tank(t).map_err(|e| component_error(comp, e))?;
            if let Some(rates) = &t.decay_rates {
                rates.validate().map_err(quality)?;
            }
            if let Some(profile) = &t.chemistry {
                profile.validate().map_err(quality)?;
            }
            Ok(())
        }
        ComponentKind::Pump(p) => check_pump(p).map_err(|e| component_error(comp, e)),
        ComponentKind::Valve(v) => check_valve(v).map_err(|e| component_error(comp, e)),
        _ => Ok(()),
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    let network = &scenario.network;
    validate_network(network)?;
    for comp in &network.components {
        validate_component(comp)?;
    }
    for (i, pipe) in network.pipes.iter().enumerate() {
        check_pipe(pipe).map_err(|e| ValidationError::InvalidValue {
            field: format!("network.pipes[{i}] ({})", pipe.label()),
            value: String::new(),
            reason: e.to_string(),
        })?;
    }
    for pipe in dangling_pipes(network) {
        warn!(pipe = %pipe.label(), "pipe references a missing component and will carry no flow");
    }

    let settings = &scenario.simulation_settings;
    settings.validate().map_err(|e| ValidationError::InvalidValue {
        field: "simulationSettings".to_string(),
        value: format!(
            "duration={}, timeStep={}, ambientTemp={}",
            settings.duration, settings.time_step, settings.ambient_temp
        ),
        reason: e.to_string(),
    })?;

    validate_schedules(network, &scenario.schedules)?;
    Ok(())
}
