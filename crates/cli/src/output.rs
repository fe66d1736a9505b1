use crate::error::CliError;
use engine_config::report::summary::SummaryReport;
use engine_runtime::batch::runner::BatchReport;
use std::path::Path;

pub const STDOUT_TARGET: &str = "-";

fn summary_report(report: &BatchReport) -> SummaryReport {
    SummaryReport::new(
        report.run_id.clone(),
        report.transform,
        report.started_at,
        report.summary.clone(),
        report.metrics,
    )
}

/// Writes the JSON summary to `target`, or prints it when `target` is `-`.
pub async fn emit_report(report: &BatchReport, target: &str) -> Result<(), CliError> {
    let summary = summary_report(report);
    if target == STDOUT_TARGET {
        println!("{}", summary.to_json()?);
    } else {
        summary.write(Path::new(target)).await?;
    }
    Ok(())
}
