use clap::{Args, Subcommand};
use model::execution::params::QualityPreset;
use std::{path::PathBuf, str::FromStr};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write one text file of answers per CSV row
    CsvToText {
        #[arg(help = "Questionnaire CSV export; the first row holds the questions")]
        input: Option<PathBuf>,

        #[arg(long, help = "Folder for the answer files (default: next to the CSV)")]
        output_dir: Option<PathBuf>,

        #[command(flatten)]
        run: RunArgs,
    },
    /// Copy PDFs and replace their document metadata
    PdfClean {
        #[arg(help = "PDF files or folders holding them")]
        inputs: Vec<PathBuf>,

        #[arg(
            long,
            help = "Base folder; copies go to <base>/<prefix>/ (default: folder of the first file)"
        )]
        output_dir: Option<PathBuf>,

        #[arg(long, help = "Three-digit prefix for the copies; anything else falls back to 000")]
        prefix: Option<String>,

        #[arg(long, help = "Text file with one metadata value per line")]
        metadata: Option<PathBuf>,

        #[command(flatten)]
        run: RunArgs,
    },
    /// Convert videos to MP4 with the external transcoder
    Transcode {
        #[arg(help = "Video files or folders holding them")]
        inputs: Vec<PathBuf>,

        #[arg(long, default_value = "balanced", value_parser = QualityPreset::from_str)]
        preset: QualityPreset,

        #[arg(long = "ext", help = "Extra input extension to accept besides mov")]
        extensions: Vec<String>,

        #[arg(long, help = "Replace existing .mp4 outputs")]
        overwrite: bool,

        #[arg(long, help = "Transcoder executable (overrides FILEKIT_FFMPEG)")]
        ffmpeg: Option<PathBuf>,

        #[command(flatten)]
        run: RunArgs,
    },
}

/// Flags shared by every batch subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[arg(long, help = "Stop the batch at the first failed item")]
    pub stop_on_error: bool,

    #[arg(
        long,
        help = "Write the JSON summary to this file, or '-' for stdout"
    )]
    pub report: Option<String>,

    #[arg(short, long, help = "Hide the progress bar and informational logs")]
    pub quiet: bool,
}

impl Commands {
    pub fn run_args(&self) -> &RunArgs {
        match self {
            Commands::CsvToText { run, .. }
            | Commands::PdfClean { run, .. }
            | Commands::Transcode { run, .. } => run,
        }
    }
}
