use crate::error::ModelError;
use serde::Serialize;
use std::{collections::BTreeMap, fmt, str::FromStr};

/// Three-digit label prefix for cleaned files and their output folder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Prefix(String);

impl Prefix {
    pub const DEFAULT: &'static str = "000";
    pub const LEN: usize = 3;

    /// Accepts exactly three ASCII digits (after trimming), returns `None`
    /// for anything else.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        (raw.len() == Self::LEN && raw.chars().all(|c| c.is_ascii_digit()))
            .then(|| Prefix(raw.to_string()))
    }

    /// Validates `raw`, substituting [`Prefix::DEFAULT`] when it is missing or
    /// not a three-digit string.
    pub fn parse_or_default(raw: Option<&str>) -> Self {
        raw.and_then(Self::parse).unwrap_or_default()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Prefix {
    fn default() -> Self {
        Prefix(Self::DEFAULT.to_string())
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encoder settings handed to the external transcoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EncoderSettings {
    pub video_codec: &'static str,
    pub speed: &'static str,
    pub crf: u8,
    pub audio_codec: &'static str,
    pub audio_bitrate: &'static str,
}

/// Named speed/size trade-offs for video conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityPreset {
    Fast,
    #[default]
    Balanced,
    Quality,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 3] = [
        QualityPreset::Fast,
        QualityPreset::Balanced,
        QualityPreset::Quality,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Fast => "fast",
            QualityPreset::Balanced => "balanced",
            QualityPreset::Quality => "quality",
        }
    }

    pub fn encoder(&self) -> EncoderSettings {
        match self {
            QualityPreset::Fast => EncoderSettings {
                video_codec: "libx264",
                speed: "veryfast",
                crf: 28,
                audio_codec: "aac",
                audio_bitrate: "128k",
            },
            QualityPreset::Balanced => EncoderSettings {
                video_codec: "libx264",
                speed: "medium",
                crf: 23,
                audio_codec: "aac",
                audio_bitrate: "128k",
            },
            QualityPreset::Quality => EncoderSettings {
                video_codec: "libx264",
                speed: "slow",
                crf: 18,
                audio_codec: "aac",
                audio_bitrate: "192k",
            },
        }
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QualityPreset {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fast" => Ok(QualityPreset::Fast),
            "balanced" | "medium" => Ok(QualityPreset::Balanced),
            "quality" | "high" => Ok(QualityPreset::Quality),
            other => Err(ModelError::UnknownPreset(other.to_string())),
        }
    }
}

/// Document metadata written into cleaned files, keyed without the leading `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetadataMap(BTreeMap<String, String>);

impl MetadataMap {
    pub fn new() -> Self {
        MetadataMap(BTreeMap::new())
    }

    /// Inserts an entry. A leading `/` on the key is dropped; keys must be
    /// non-empty and free of whitespace and PDF delimiter characters.
    pub fn insert(
        &mut self,
        key: impl AsRef<str>,
        value: impl Into<String>,
    ) -> Result<(), ModelError> {
        let raw = key.as_ref();
        let key = raw.strip_prefix('/').unwrap_or(raw);
        let valid = !key.is_empty()
            && key.chars().all(|c| {
                c.is_ascii_graphic() && !matches!(c, '/' | '(' | ')' | '<' | '>' | '[' | ']' | '{' | '}' | '%')
            });
        if !valid {
            return Err(ModelError::InvalidMetadataKey(raw.to_string()));
        }
        self.0.insert(key.to_string(), value.into());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// What the runner does after a recoverable per-item failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    #[default]
    Continue,
    StopOnError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_prefixes_fall_back_to_default() {
        for raw in ["12", "abc", "1234", "", "  ", "1a3", "١٢٣"] {
            assert_eq!(Prefix::parse_or_default(Some(raw)).as_str(), "000", "{raw:?}");
        }
        assert_eq!(Prefix::parse_or_default(None).as_str(), "000");
    }

    #[test]
    fn valid_prefix_is_kept() {
        assert_eq!(Prefix::parse_or_default(Some("042")).as_str(), "042");
        assert_eq!(Prefix::parse_or_default(Some(" 777 ")).as_str(), "777");
    }

    #[test]
    fn presets_parse_by_name() {
        for preset in QualityPreset::ALL {
            assert_eq!(preset.as_str().parse::<QualityPreset>().unwrap(), preset);
        }
        assert_eq!(
            "ultra".parse::<QualityPreset>(),
            Err(ModelError::UnknownPreset("ultra".into()))
        );
    }

    #[test]
    fn balanced_preset_matches_classic_settings() {
        let enc = QualityPreset::Balanced.encoder();
        assert_eq!(enc.crf, 23);
        assert_eq!(enc.speed, "medium");
        assert_eq!(enc.audio_bitrate, "128k");
    }

    #[test]
    fn metadata_keys_drop_leading_slash() {
        let mut meta = MetadataMap::new();
        meta.insert("/Title", "Report").unwrap();
        meta.insert("Author", "Nobody").unwrap();
        assert_eq!(meta.get("Title"), Some("Report"));
        assert_eq!(meta.len(), 2);
        assert!(meta.insert("bad key", "x").is_err());
        assert!(meta.insert("/", "x").is_err());
    }
}
