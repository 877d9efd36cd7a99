//! CSV rendering of run rows and extracted series.

use std::collections::BTreeSet;

use crate::types::StepRecord;

/// Quote a cell when it holds a separator, quote or line break.
fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Header `time,<sorted value keys>,active_attacks`, one line per row.
/// Keys missing from a row leave the cell empty.
pub fn rows_to_csv(rows: &[StepRecord]) -> String {
    let keys: BTreeSet<&str> = rows
        .iter()
        .flat_map(|r| r.values.keys().map(String::as_str))
        .collect();

    let mut out = String::from("time");
    for key in &keys {
        out.push(',');
        out.push_str(&escape(key));
    }
    out.push_str(",active_attacks\n");

    for row in rows {
        out.push_str(&row.time.to_string());
        for key in &keys {
            out.push(',');
            if let Some(v) = row.value(key) {
                out.push_str(&v.to_string());
            }
        }
        out.push(',');
        out.push_str(&escape(&row.active_attacks));
        out.push('\n');
    }
    out
}

/// Two-column CSV of `(time, value)` points under a `time,<column>` header.
pub fn series_to_csv(column: &str, points: &[(f64, f64)]) -> String {
    let mut out = format!("time,{}\n", escape(column));
    for (t, v) in points {
        out.push_str(&format!("{t},{v}\n"));
    }
    out
}
