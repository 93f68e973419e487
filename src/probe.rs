/*!
 * Audio stream probing.
 *
 * Wraps `ffprobe` to list the audio streams of a media file together with
 * their title tags. Anything else able to produce the same
 * `(index, optional title)` shape can implement [`AudioProber`].
 */

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;

use crate::app_config::ProbeConfig;
use crate::errors::ProbeError;

/// One audio stream of a media file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamRecord {
    /// Stream index as assigned by the prober
    pub index: usize,
    /// Value of the stream's title tag, if any
    pub title: Option<String>,
}

impl StreamRecord {
    pub fn new(index: usize, title: Option<&str>) -> Self {
        Self {
            index,
            title: title.map(|t| t.to_string()),
        }
    }

    /// Title text, empty when the stream has no title tag
    pub fn title_text(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

/// Source of per-stream audio metadata
#[async_trait]
pub trait AudioProber: Send + Sync + Debug {
    /// List the audio streams of a media file in probe order
    async fn audio_streams(&self, path: &Path) -> Result<Vec<StreamRecord>, ProbeError>;
}

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    index: Option<usize>,
    #[serde(default)]
    tags: HashMap<String, String>,
}

impl FfprobeStream {
    fn title(&self) -> Option<&str> {
        self.tags
            .get("title")
            .or_else(|| {
                self.tags
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case("title"))
                    .map(|(_, value)| value)
            })
            .map(|title| title.as_str())
    }
}

/// Parse the JSON printed by `ffprobe -of json`
///
/// Empty output means no audio streams. Streams without an index get their
/// position in the list.
pub fn parse_ffprobe_output(path: &Path, stdout: &str) -> Result<Vec<StreamRecord>, ProbeError> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    let output: FfprobeOutput =
        serde_json::from_str(stdout).map_err(|e| ProbeError::MalformedOutput {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(output
        .streams
        .iter()
        .enumerate()
        .map(|(position, stream)| StreamRecord::new(stream.index.unwrap_or(position), stream.title()))
        .collect())
}

/// Prober running the `ffprobe` executable
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    program: PathBuf,
    timeout: Duration,
}

impl FfprobeProber {
    pub fn new<P: Into<PathBuf>>(program: P, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(&config.ffprobe_path, Duration::from_secs(config.timeout_secs))
    }

    fn tool_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }
}

#[async_trait]
impl AudioProber for FfprobeProber {
    async fn audio_streams(&self, path: &Path) -> Result<Vec<StreamRecord>, ProbeError> {
        let tool = self.tool_name();

        let ffprobe_future = Command::new(&self.program)
            .args([
                "-v", "error",
                "-select_streams", "a",
                "-show_entries", "stream=index:stream_tags=title",
                "-of", "json",
            ])
            .arg(path)
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, ffprobe_future).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(ProbeError::ToolUnavailable { tool });
            }
            Ok(Err(e)) => {
                return Err(ProbeError::InvocationFailed {
                    tool,
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
            Err(_) => {
                return Err(ProbeError::TimedOut {
                    tool,
                    path: path.to_path_buf(),
                    secs: self.timeout.as_secs(),
                });
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProbeError::InvocationFailed {
                tool,
                path: path.to_path_buf(),
                message: format!("{} {}", output.status, stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let streams = parse_ffprobe_output(path, &stdout)?;
        debug!("{} audio stream(s) in {:?}", streams.len(), path);
        Ok(streams)
    }
}
