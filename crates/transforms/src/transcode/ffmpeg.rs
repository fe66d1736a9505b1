use crate::file::names::OutputNames;
use async_trait::async_trait;
use engine_core::{error::TransformError, transform::ItemTransform};
use model::{
    core::utils::extension_lowercase,
    execution::{item::InputItem, params::QualityPreset},
};
use std::{
    ffi::OsString,
    io::ErrorKind,
    path::{Path, PathBuf},
    process::Stdio,
};
use tokio::process::Command;
use tracing::{debug, info};

pub const OUTPUT_EXTENSION: &str = "mp4";
const STDERR_TAIL_LINES: usize = 5;

#[derive(Debug, Clone)]
pub struct TranscodeParams {
    /// Transcoder executable.
    pub tool: PathBuf,
    pub preset: QualityPreset,
    /// Replace an existing output instead of failing the item.
    pub overwrite: bool,
    /// Accepted input extensions, lower-case and without the dot.
    pub extensions: Vec<String>,
}

impl TranscodeParams {
    pub fn new(tool: impl Into<PathBuf>, preset: QualityPreset) -> Self {
        TranscodeParams {
            tool: tool.into(),
            preset,
            overwrite: false,
            extensions: vec!["mov".to_string()],
        }
    }

    pub fn accepts(&self, path: &Path) -> bool {
        extension_lowercase(path).is_some_and(|ext| self.extensions.iter().any(|e| *e == ext))
    }
}

/// Converts videos to MP4 by running the external transcoder once per item.
#[derive(Debug, Default)]
pub struct Transcoder {
    names: OutputNames,
}

#[async_trait]
impl ItemTransform for Transcoder {
    type Params = TranscodeParams;

    fn name(&self) -> &'static str {
        "transcode"
    }

    fn skip_reason(&self, item: &InputItem, params: &TranscodeParams) -> Option<String> {
        (!params.accepts(item.path())).then(|| {
            format!(
                "{} is not one of: {}",
                item.file_name(),
                params
                    .extensions
                    .iter()
                    .map(|e| format!(".{e}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }

    fn describe(&self, item: &InputItem) -> String {
        format!("Converting: {}", item.label())
    }

    async fn apply(
        &self,
        item: &InputItem,
        params: &TranscodeParams,
    ) -> Result<PathBuf, TransformError> {
        let input = item.path();
        let output = input.with_extension(OUTPUT_EXTENSION);
        if output == input {
            return Err(TransformError::Failed(format!(
                "{} is already an .{OUTPUT_EXTENSION} file",
                item.file_name()
            )));
        }
        let output = self.names.reserve(output);

        let args = build_args(input, &output, params.preset, params.overwrite);
        let tool = params.tool.display().to_string();
        debug!(tool = %tool, ?args, "Spawning transcoder");

        let result = Command::new(&params.tool)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;

        let out = match result {
            Ok(out) => out,
            Err(err) if matches!(err.kind(), ErrorKind::NotFound | ErrorKind::PermissionDenied) => {
                return Err(TransformError::ToolMissing {
                    tool,
                    detail: err.to_string(),
                });
            }
            Err(err) => return Err(TransformError::Io(err)),
        };

        if !out.status.success() {
            return Err(TransformError::ToolFailed {
                tool,
                status: out.status.to_string(),
                stderr: stderr_tail(&out.stderr),
            });
        }

        info!(output = %output.display(), preset = %params.preset, "Converted");
        Ok(output)
    }
}

/// Argument list for one conversion: input, fixed container/codec flags and
/// the preset's quality flags, then the output path.
pub fn build_args(
    input: &Path,
    output: &Path,
    preset: QualityPreset,
    overwrite: bool,
) -> Vec<OsString> {
    let enc = preset.encoder();
    let crf = enc.crf.to_string();
    let mut args: Vec<OsString> = vec![if overwrite { "-y" } else { "-n" }.into()];
    args.push("-i".into());
    args.push(input.as_os_str().to_owned());
    for flag in [
        "-vcodec",
        enc.video_codec,
        "-crf",
        crf.as_str(),
        "-preset",
        enc.speed,
        "-acodec",
        enc.audio_codec,
        "-b:a",
        enc.audio_bitrate,
    ] {
        args.push(flag.into());
    }
    args.push(output.as_os_str().to_owned());
    args
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    if lines.is_empty() {
        return "(no stderr output)".to_string();
    }
    lines[lines.len().saturating_sub(STDERR_TAIL_LINES)..].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strs(args: &[OsString]) -> Vec<String> {
        args.iter().map(|a| a.to_string_lossy().into_owned()).collect()
    }

    #[test]
    fn balanced_args_match_classic_command() {
        let args = build_args(
            Path::new("/v/clip.mov"),
            Path::new("/v/clip.mp4"),
            QualityPreset::Balanced,
            false,
        );
        assert_eq!(
            strs(&args),
            vec![
                "-n", "-i", "/v/clip.mov", "-vcodec", "libx264", "-crf", "23", "-preset",
                "medium", "-acodec", "aac", "-b:a", "128k", "/v/clip.mp4",
            ]
        );
    }

    #[test]
    fn overwrite_and_preset_change_flags() {
        let args = strs(&build_args(
            Path::new("a.mov"),
            Path::new("a.mp4"),
            QualityPreset::Quality,
            true,
        ));
        assert_eq!(args[0], "-y");
        assert!(args.windows(2).any(|w| w[0] == "-crf" && w[1] == "18"));
        assert!(args.windows(2).any(|w| w[0] == "-preset" && w[1] == "slow"));
    }

    #[test]
    fn only_accepted_extensions_are_processed() {
        let params = TranscodeParams::new("ffmpeg", QualityPreset::Fast);
        assert!(Transcoder::default().skip_reason(&InputItem::file("/v/a.MOV"), &params).is_none());
        assert_eq!(
            Transcoder::default().skip_reason(&InputItem::file("/v/a.avi"), &params).as_deref(),
            Some("a.avi is not one of: .mov")
        );
    }

    #[test]
    fn stderr_tail_keeps_last_lines() {
        let text = b"l1\nl2\n\nl3\nl4\nl5\nl6\n";
        assert_eq!(stderr_tail(text), "l2\nl3\nl4\nl5\nl6");
        assert_eq!(stderr_tail(b""), "(no stderr output)");
    }

    #[tokio::test]
    async fn missing_tool_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("clip.mov");
        std::fs::write(&input, b"not really a movie").unwrap();
        let params = TranscodeParams::new(dir.path().join("no-such-ffmpeg"), QualityPreset::Fast);

        let err = Transcoder::default()
            .apply(&InputItem::file(&input), &params)
            .await
            .unwrap_err();

        assert!(err.is_fatal(), "unexpected error: {err}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_an_item_failure() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let tool = dir.path().join("fake-ffmpeg");
        std::fs::write(&tool, "#!/bin/sh\necho 'Invalid data found' >&2\nexit 3\n").unwrap();
        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        let input = dir.path().join("clip.mov");
        std::fs::write(&input, b"x").unwrap();

        let err = Transcoder::default()
            .apply(&InputItem::file(&input), &TranscodeParams::new(&tool, QualityPreset::Fast))
            .await
            .unwrap_err();

        match err {
            TransformError::ToolFailed { stderr, .. } => assert_eq!(stderr, "Invalid data found"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
