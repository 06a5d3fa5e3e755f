//! The load -> select -> average -> export workflow shared by `run` and `demo`.

use tracing::{info, warn};

use crate::analysis::{average_window, select_window};
use crate::domain::{DatasetStats, PrecondConfig, Record, SummaryFile};
use crate::error::AppError;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub stats: DatasetStats,
    /// Records inside the window, in time order.
    pub window: Vec<Record>,
    pub summary: SummaryFile,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run_precond(config: &PrecondConfig) -> Result<RunOutput, AppError> {
    // 1) Load and validate the file.
    let dataset = crate::io::load(&config.data_path)?;

    // 2) Select the complete window before onset.
    let window = select_window(&dataset, config.onset, &config.window)?;

    // 3) Average.
    let result = average_window(&window);

    let headline = [("b", &result.b), ("clock_angle", &result.clock_angle), ("pressure", &result.pressure)];
    for (name, stats) in headline {
        if !stats.has_data() {
            warn!(field = name, "no valid values in window");
        }
    }
    info!(
        onset = %config.onset,
        records = window.len(),
        b = ?result.b.mean,
        clock = ?result.clock_angle.mean,
        pressure = ?result.pressure.mean,
        "computed window averages"
    );

    let summary = SummaryFile {
        tool: "precond".to_string(),
        data_file: config.data_path.display().to_string(),
        onset: window.onset(),
        window_start: window.start(),
        window_end: window.end(),
        window: window.spec(),
        n_records: window.len(),
        result,
    };

    // 4) Optional exports.
    if let Some(path) = &config.export_window {
        crate::io::write_window_csv(path, window.records())?;
        info!(path = %path.display(), "wrote window CSV");
    }
    if let Some(path) = &config.export_summary {
        crate::io::write_summary_json(path, &summary)?;
        info!(path = %path.display(), "wrote summary JSON");
    }

    Ok(RunOutput {
        stats: dataset.stats(),
        window: window.records().to_vec(),
        summary,
    })
}
