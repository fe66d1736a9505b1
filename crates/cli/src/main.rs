use crate::{
    commands::{Commands, RunArgs},
    error::CliError,
    exit::ExitStatus,
    terminal::{BarLogWriter, TerminalDisplay, TerminalNotifier},
};
use clap::Parser;
use engine_config::settings::Settings;
use engine_core::{
    context::batch::BatchContext, notify::StatusNotifier, transform::ItemTransform,
};
use engine_runtime::{batch::executor, error::RunnerError};
use indicatif::ProgressBar;
use model::execution::{item::InputItem, params::FailurePolicy};
use tracing::error;
use tracing_subscriber::EnvFilter;
use transforms::{
    csv::export::RowExport, error::FileError, pdf::cleaner::MetadataRewrite,
    transcode::ffmpeg::Transcoder,
};

mod commands;
mod error;
mod exit;
mod output;
mod prepare;
mod terminal;

#[derive(Parser)]
#[command(name = "filekit", version = "0.1.0", about = "Batch file-processing toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let bar = terminal::progress_bar();
    init_logging(cli.command.run_args().quiet, BarLogWriter::new(bar.clone()));

    let notifier = TerminalNotifier::new(bar.clone());
    let status = match run(cli.command, &notifier, &bar).await {
        Ok(status) => status,
        Err(err) => {
            error!(error = %err, "filekit failed");
            if let CliError::Input(FileError::InvalidFormat(detail)) = &err {
                notifier.warning("Invalid input", detail);
            } else {
                notifier.error("filekit failed", &err.to_string());
            }
            err.exit_status()
        }
    };
    status.into()
}

fn init_logging(quiet: bool, writer: BarLogWriter) {
    let default = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .init();
}

async fn run(
    command: Commands,
    notifier: &TerminalNotifier,
    bar: &ProgressBar,
) -> Result<ExitStatus, CliError> {
    let settings = Settings::from_env()?;

    match command {
        Commands::CsvToText {
            input,
            output_dir,
            run,
        } => {
            let batch = prepare::csv_batch(input.as_deref(), output_dir)?;
            run_batch(RowExport::default(), batch.items, batch.params, &run, &settings, notifier, bar).await
        }
        Commands::PdfClean {
            inputs,
            output_dir,
            prefix,
            metadata,
            run,
        } => {
            let batch = prepare::pdf_batch(
                &inputs,
                output_dir,
                prefix.as_deref(),
                metadata.as_deref(),
                &settings,
            )?;
            run_batch(MetadataRewrite::default(), batch.items, batch.params, &run, &settings, notifier, bar).await
        }
        Commands::Transcode {
            inputs,
            preset,
            extensions,
            overwrite,
            ffmpeg,
            run,
        } => {
            let batch = prepare::transcode_batch(
                &inputs,
                preset,
                &extensions,
                overwrite,
                ffmpeg,
                &settings,
            )?;
            run_batch(Transcoder::default(), batch.items, batch.params, &run, &settings, notifier, bar).await
        }
    }
}

async fn run_batch<T: ItemTransform>(
    transform: T,
    items: Vec<InputItem>,
    params: T::Params,
    args: &RunArgs,
    settings: &Settings,
    notifier: &TerminalNotifier,
    bar: &ProgressBar,
) -> Result<ExitStatus, CliError> {
    let policy = if args.stop_on_error {
        FailurePolicy::StopOnError
    } else {
        settings.policy
    };
    let builder = BatchContext::builder(items, params).policy(policy);
    let display = TerminalDisplay::new(bar.clone(), args.quiet);

    let report =
        match executor::execute(transform, builder, display, notifier, settings.poll_interval).await
        {
            Ok(report) => report,
            // Already reported to the user by the executor.
            Err(RunnerError::EmptySelection) => return Ok(ExitStatus::Usage),
            Err(err) => return Err(err.into()),
        };

    if let Some(target) = &args.report {
        output::emit_report(&report, target).await?;
    }

    Ok(if report.summary.is_clean() {
        ExitStatus::Success
    } else {
        ExitStatus::Failure
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::execution::params::QualityPreset;

    #[test]
    fn parses_transcode_flags() {
        let cli = Cli::try_parse_from([
            "filekit",
            "transcode",
            "clips/",
            "--preset",
            "quality",
            "--ext",
            "mkv",
            "--overwrite",
            "--stop-on-error",
            "--report",
            "-",
        ])
        .unwrap();

        match cli.command {
            Commands::Transcode {
                inputs,
                preset,
                extensions,
                overwrite,
                run,
                ..
            } => {
                assert_eq!(inputs.len(), 1);
                assert_eq!(preset, QualityPreset::Quality);
                assert_eq!(extensions, vec!["mkv"]);
                assert!(overwrite);
                assert!(run.stop_on_error);
                assert_eq!(run.report.as_deref(), Some("-"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn unknown_preset_is_a_usage_error() {
        let result = Cli::try_parse_from(["filekit", "transcode", "a.mov", "--preset", "ultra"]);
        assert!(result.is_err());
    }

    #[test]
    fn pdf_clean_without_inputs_parses() {
        let cli = Cli::try_parse_from(["filekit", "pdf-clean", "--prefix", "007"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::PdfClean { ref inputs, ref prefix, .. } if inputs.is_empty() && prefix.as_deref() == Some("007")
        ));
    }
}
