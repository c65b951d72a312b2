//! Video geometry probe backed by ffprobe

use async_trait::async_trait;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

use crate::error::ProcessingError;
use crate::tool::{run_tool, validate_tool_path};

/// Frame size of the first video stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Reads stream geometry from a local media file without decoding it.
#[async_trait]
pub trait MediaInspector: Send + Sync {
    async fn probe(&self, path: &Path) -> Result<Dimensions, ProcessingError>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
}

/// Parse `ffprobe -print_format json -show_streams` output.
pub(crate) fn parse_probe_output(stdout: &[u8]) -> Result<Dimensions, ProcessingError> {
    let output: ProbeOutput = serde_json::from_slice(stdout).map_err(|e| {
        ProcessingError::ProbeFailed(format!("Failed to parse ffprobe output: {}", e))
    })?;

    if output.streams.is_empty() {
        return Err(ProcessingError::ProbeFailed(
            "No video stream found".to_string(),
        ));
    }

    let (width, height) = output
        .streams
        .iter()
        .find_map(|s| s.width.zip(s.height))
        .ok_or_else(|| {
            ProcessingError::ProbeFailed("Video stream has no dimensions".to_string())
        })?;

    if width == 0 || height == 0 {
        return Err(ProcessingError::ProbeFailed(format!(
            "Invalid video dimensions {}x{}",
            width, height
        )));
    }

    Ok(Dimensions { width, height })
}

pub struct FfprobeInspector {
    ffprobe_path: String,
    timeout: Duration,
}

impl FfprobeInspector {
    pub fn new(ffprobe_path: String, timeout: Duration) -> Result<Self, ProcessingError> {
        validate_tool_path(&ffprobe_path)?;
        Ok(Self {
            ffprobe_path,
            timeout,
        })
    }
}

#[async_trait]
impl MediaInspector for FfprobeInspector {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path,
        ffmpeg.operation = "probe"
    ))]
    async fn probe(&self, path: &Path) -> Result<Dimensions, ProcessingError> {
        let start = std::time::Instant::now();

        let output = run_tool(
            &self.ffprobe_path,
            [
                OsStr::new("-v"),
                OsStr::new("error"),
                OsStr::new("-print_format"),
                OsStr::new("json"),
                OsStr::new("-show_streams"),
                OsStr::new("-select_streams"),
                OsStr::new("v:0"),
                path.as_os_str(),
            ],
            self.timeout,
        )
        .await
        .map_err(ProcessingError::probe)?;

        let dimensions = parse_probe_output(&output.stdout)?;

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            width = dimensions.width,
            height = dimensions.height,
            "Video probe completed"
        );

        Ok(dimensions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_landscape_stream() {
        let json = br#"{
            "streams": [
                {"index": 0, "codec_name": "h264", "codec_type": "video", "width": 1920, "height": 1080}
            ]
        }"#;
        assert_eq!(
            parse_probe_output(json).unwrap(),
            Dimensions {
                width: 1920,
                height: 1080
            }
        );
    }

    #[test]
    fn test_parse_skips_streams_without_dimensions() {
        let json = br#"{
            "streams": [
                {"index": 0, "codec_type": "data"},
                {"index": 1, "codec_type": "video", "width": 1080, "height": 1920}
            ]
        }"#;
        assert_eq!(parse_probe_output(json).unwrap().height, 1920);
    }

    #[test]
    fn test_parse_zero_streams() {
        assert!(matches!(
            parse_probe_output(br#"{"streams": []}"#),
            Err(ProcessingError::ProbeFailed(_))
        ));
        assert!(matches!(
            parse_probe_output(br#"{}"#),
            Err(ProcessingError::ProbeFailed(_))
        ));
    }

    #[test]
    fn test_parse_missing_or_zero_dimensions() {
        assert!(parse_probe_output(br#"{"streams": [{"codec_type": "audio"}]}"#).is_err());
        assert!(parse_probe_output(br#"{"streams": [{"width": 0, "height": 720}]}"#).is_err());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_probe_output(b"moov atom not found").is_err());
        assert!(parse_probe_output(b"").is_err());
    }

    #[test]
    fn test_rejects_unsafe_tool_path() {
        assert!(FfprobeInspector::new("ffprobe && curl".to_string(), Duration::from_secs(1)).is_err());
        assert!(FfprobeInspector::new("/usr/bin/ffprobe".to_string(), Duration::from_secs(1)).is_ok());
    }

    #[tokio::test]
    async fn test_missing_ffprobe_is_probe_failure() {
        let inspector = FfprobeInspector::new(
            "tubely-missing-ffprobe".to_string(),
            Duration::from_secs(5),
        )
        .unwrap();
        let result = inspector.probe(Path::new("/tmp/does-not-matter.mp4")).await;
        assert!(matches!(result, Err(ProcessingError::ProbeFailed(_))));
    }
}
