//! Query helpers for extracting data from loaded runs.

use wt_network::Network;
use wt_results::StepRecord;

use crate::error::{AppError, AppResult};

/// Summary of a run's time range and data.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub time_range: (f64, f64),
    pub row_count: usize,
    /// Components with at least one recorded value, in network order
    pub component_ids: Vec<String>,
    /// Rows on which an attack fired
    pub attack_row_count: usize,
}

/// Get run summary from stored rows and the network they came from.
pub fn get_run_summary(rows: &[StepRecord], network: &Network) -> AppResult<RunSummary> {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Err(AppError::InvalidInput("No rows in run".to_string()));
    };

    let component_ids = network
        .components
        .iter()
        .filter(|c| {
            let prefix = format!("{}_", c.id);
            first.values.keys().any(|k| k.starts_with(&prefix))
        })
        .map(|c| c.id.clone())
        .collect();

    Ok(RunSummary {
        time_range: (first.time, last.time),
        row_count: rows.len(),
        component_ids,
        attack_row_count: rows.iter().filter(|r| !r.active_attacks.is_empty()).count(),
    })
}

/// Extract the `(time, value)` series of `<component_id>_<field>`.
///
/// With `reported`, poisoned readings replace the true values while they
/// are active.
pub fn extract_series(
    rows: &[StepRecord],
    component_id: &str,
    field: &str,
    reported: bool,
) -> AppResult<Vec<(f64, f64)>> {
    let key = format!("{component_id}_{field}");
    let series: Vec<(f64, f64)> = rows
        .iter()
        .filter_map(|row| {
            let value = if reported {
                row.reported(&key)
            } else {
                row.value(&key)
            };
            value.map(|v| (row.time, v))
        })
        .collect();

    if series.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "No recorded values for {}",
            key
        )));
    }
    Ok(series)
}

/// Times and labels of the rows on which attacks fired.
pub fn attack_events(rows: &[StepRecord]) -> Vec<(f64, &str)> {
    rows.iter()
        .filter(|r| !r.active_attacks.is_empty())
        .map(|r| (r.time, r.active_attacks.as_str()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use wt_network::{Component, Tank};

    fn row(time: f64, values: &[(&str, f64)], attacks: &str) -> StepRecord {
        StepRecord {
            time,
            values: values
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
            active_attacks: attacks.to_string(),
        }
    }

    fn rows() -> Vec<StepRecord> {
        vec![
            row(0.0, &[("t1_waterLevel", 2.0)], ""),
            row(
                1.0,
                &[("t1_waterLevel", 1.8), ("t1_waterLevel_reported", 5.0)],
                "data_poisoning:t1[waterLevel]",
            ),
            row(2.0, &[("t1_waterLevel", 1.6)], ""),
        ]
    }

    #[test]
    fn summary_reports_range_and_components() {
        let network = Network {
            components: vec![
                Component::tank("t1", Tank::default()),
                Component::junction("j1"),
            ],
            pipes: vec![],
        };
        let summary = get_run_summary(&rows(), &network).expect("summary");
        assert_eq!(summary.time_range, (0.0, 2.0));
        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.component_ids, vec!["t1"]);
        assert_eq!(summary.attack_row_count, 1);

        assert!(get_run_summary(&[], &network).is_err());
    }

    #[test]
    fn reported_series_prefers_poisoned_values() {
        let truth = extract_series(&rows(), "t1", "waterLevel", false).expect("series");
        assert_eq!(truth, vec![(0.0, 2.0), (1.0, 1.8), (2.0, 1.6)]);

        let seen = extract_series(&rows(), "t1", "waterLevel", true).expect("series");
        assert_eq!(seen, vec![(0.0, 2.0), (1.0, 5.0), (2.0, 1.6)]);
    }

    #[test]
    fn unknown_series_is_an_error() {
        assert!(matches!(
            extract_series(&rows(), "t1", "ph", false),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn attack_events_list_fired_rows() {
        let rows = rows();
        assert_eq!(
            attack_events(&rows),
            vec![(1.0, "data_poisoning:t1[waterLevel]")]
        );
    }
}
