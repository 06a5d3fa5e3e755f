//! Formatted terminal output for a run or a saved summary.

use crate::domain::{DatasetStats, Field, FieldStats, SummaryFile, WindowConvention};

/// Format the full run summary (dataset stats + window + per-field table).
pub fn format_run_summary(stats: &DatasetStats, summary: &SummaryFile) -> String {
    let mut out = String::new();

    out.push_str("=== precond - solar wind preconditioning ===\n");
    out.push_str(&format!("Data: {}\n", summary.data_file));
    out.push_str(&format!(
        "Records: n={} | {} .. {} | missing hours={}\n",
        stats.n_records,
        fmt_time(&stats.first),
        fmt_time(&stats.last),
        stats.missing_hours,
    ));
    out.push_str(&format_summary(summary));

    out
}

/// Format a summary (onset, window, per-field table).
pub fn format_summary(summary: &SummaryFile) -> String {
    let mut out = String::new();

    out.push_str(&format!("Onset: {} UT\n", fmt_time(&summary.onset)));
    out.push_str(&format!(
        "Window: {} .. {} UT ({} records, {}h, {})\n",
        fmt_time(&summary.window_start),
        fmt_time(&summary.window_end),
        summary.n_records,
        summary.window.span_hours,
        convention_label(summary.window.convention),
    ));

    out.push_str("\nAverage values leading up to storm:\n");
    out.push_str(&format!(
        "  {:<8} {:>10} {:>10} {:>6} {:>8}\n",
        "field", "mean", "median", "valid", "unit"
    ));
    out.push_str(&format!(
        "  {:-<8} {:-<10} {:-<10} {:-<6} {:-<8}\n",
        "", "", "", "", ""
    ));
    for field in Field::ALL {
        out.push_str(&format_row(field, summary.result.get(field)));
    }

    out
}

fn format_row(field: Field, stats: &FieldStats) -> String {
    format!(
        "  {:<8} {:>10} {:>10} {:>6} {:>8}\n",
        field.label(),
        fmt_opt(stats.mean),
        fmt_opt(stats.median),
        stats.n_valid,
        field.unit(),
    )
}

fn convention_label(convention: WindowConvention) -> &'static str {
    match convention {
        WindowConvention::Preceding => "onset hour excluded",
        WindowConvention::Closed => "onset hour included",
    }
}

fn fmt_time(t: &chrono::NaiveDateTime) -> String {
    t.format("%Y-%m-%d %H:%M").to_string()
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(v) => format!("{v:.2}"),
        None => "no data".to_string(),
    }
}
