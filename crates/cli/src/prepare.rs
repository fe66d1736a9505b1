use crate::error::CliError;
use engine_config::settings::Settings;
use model::execution::{
    item::InputItem,
    params::{Prefix, QualityPreset},
};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use transforms::{
    csv::{export::CsvExportParams, source::CsvDocument},
    file::scan::expand_inputs,
    pdf::{
        cleaner::PdfCleanParams,
        metadata::{load_metadata_file, placeholder_metadata},
    },
    transcode::ffmpeg::TranscodeParams,
};

/// Items and shared parameters for one batch, ready for the executor.
#[derive(Debug)]
pub struct Prepared<P> {
    pub items: Vec<InputItem>,
    pub params: P,
}

pub fn csv_batch(
    input: Option<&Path>,
    output_dir: Option<PathBuf>,
) -> Result<Prepared<CsvExportParams>, CliError> {
    let Some(input) = input else {
        return Ok(Prepared {
            items: Vec::new(),
            params: CsvExportParams {
                output_dir: output_dir.unwrap_or_default(),
                questions: Vec::new(),
            },
        });
    };

    let document = CsvDocument::load(input)?;
    let output_dir = output_dir.unwrap_or_else(|| parent_dir(input));
    ensure_dir(&output_dir)?;

    let (questions, items) = document.into_items();
    info!(rows = items.len(), output_dir = %output_dir.display(), "CSV loaded");
    Ok(Prepared {
        items,
        params: CsvExportParams {
            output_dir,
            questions,
        },
    })
}

pub fn pdf_batch(
    inputs: &[PathBuf],
    output_dir: Option<PathBuf>,
    prefix: Option<&str>,
    metadata: Option<&Path>,
    settings: &Settings,
) -> Result<Prepared<PdfCleanParams>, CliError> {
    let files = expand_inputs(inputs, &["pdf"])?;

    let prefix = match prefix {
        Some(raw) => Prefix::parse(raw).unwrap_or_else(|| {
            warn!(value = %raw, "Prefix must be exactly three digits, using {}", Prefix::DEFAULT);
            Prefix::default()
        }),
        None => settings.default_prefix.clone(),
    };
    let metadata = match metadata {
        Some(path) => load_metadata_file(path),
        None => placeholder_metadata(),
    };

    let base = output_dir
        .or_else(|| files.first().map(|f| parent_dir(f)))
        .unwrap_or_default();
    let output_dir = PdfCleanParams::output_dir_for(&base, &prefix);
    if !files.is_empty() {
        ensure_dir(&output_dir)?;
    }

    Ok(Prepared {
        items: files.into_iter().map(InputItem::file).collect(),
        params: PdfCleanParams {
            output_dir,
            prefix,
            metadata,
        },
    })
}

pub fn transcode_batch(
    inputs: &[PathBuf],
    preset: QualityPreset,
    extra_extensions: &[String],
    overwrite: bool,
    ffmpeg: Option<PathBuf>,
    settings: &Settings,
) -> Result<Prepared<TranscodeParams>, CliError> {
    let mut params = TranscodeParams::new(
        ffmpeg.unwrap_or_else(|| settings.ffmpeg_path.clone()),
        preset,
    );
    params.overwrite = overwrite;
    for ext in extra_extensions {
        let ext = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        if !ext.is_empty() && !params.extensions.contains(&ext) {
            params.extensions.push(ext);
        }
    }

    let accepted: Vec<&str> = params.extensions.iter().map(String::as_str).collect();
    let files = expand_inputs(inputs, &accepted)?;

    Ok(Prepared {
        items: files.into_iter().map(InputItem::file).collect(),
        params,
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn ensure_dir(dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(dir).map_err(|source| CliError::OutputDir {
        path: dir.display().to_string(),
        source,
    })
}
