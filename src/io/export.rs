//! Export fit results.
//!
//! The trajectory CSV is meant to be easy to consume in spreadsheets or plotting
//! scripts; the JSON summary is for scripting against `adm fit --json`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{FitSummary, StepRecord};
use crate::error::AppError;

/// Write recorded trajectory steps to a CSV file.
pub fn write_trajectory_csv(path: &Path, records: &[StepRecord]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create trajectory CSV '{}': {e}", path.display()))
    })?;
    write_trajectory(&mut file, records)
}

fn write_trajectory<W: Write>(out: &mut W, records: &[StepRecord]) -> Result<(), AppError> {
    writeln!(out, "step,components,weight_sum,residual_norm")
        .map_err(|e| AppError::new(2, format!("Failed to write trajectory CSV header: {e}")))?;

    for r in records {
        writeln!(
            out,
            "{},{},{:.10},{:.10}",
            r.step, r.components, r.weight_sum, r.residual_norm
        )
        .map_err(|e| AppError::new(2, format!("Failed to write trajectory CSV row: {e}")))?;
    }

    Ok(())
}

/// Render a run summary as pretty-printed JSON.
pub fn summary_json(summary: &FitSummary) -> Result<String, AppError> {
    serde_json::to_string_pretty(summary)
        .map_err(|e| AppError::new(4, format!("Failed to serialize fit summary: {e}")))
}
