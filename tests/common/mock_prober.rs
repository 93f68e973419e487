/*!
 * Mock prober for testing
 *
 * Returns predetermined audio streams per file name so that tests never
 * depend on an installed ffprobe.
 */

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use langtagger::errors::ProbeError;
use langtagger::probe::{AudioProber, StreamRecord};

/// Type of failure to simulate
#[derive(Debug, Clone, Copy)]
pub enum MockFailure {
    /// ffprobe is not installed
    ToolUnavailable,
    /// ffprobe exits with an error
    InvocationFailed,
    /// ffprobe prints garbage
    MalformedOutput,
}

/// Prober answering from a table keyed by file name
#[derive(Debug, Default)]
pub struct MockProber {
    streams: HashMap<String, Vec<StreamRecord>>,
    failure: Option<MockFailure>,
    calls: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockProber {
    /// Prober that knows no streams for any file
    pub fn new() -> Self {
        Self::default()
    }

    /// Prober failing every call
    pub fn failing(failure: MockFailure) -> Self {
        Self {
            failure: Some(failure),
            ..Self::default()
        }
    }

    /// Register the audio streams of a file
    pub fn with_streams(mut self, file_name: &str, streams: &[(usize, Option<&str>)]) -> Self {
        let records = streams
            .iter()
            .map(|(index, title)| StreamRecord::new(*index, *title))
            .collect();
        self.streams.insert(file_name.to_string(), records);
        self
    }

    /// Paths probed so far
    pub fn calls(&self) -> Arc<Mutex<Vec<PathBuf>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl AudioProber for MockProber {
    async fn audio_streams(&self, path: &Path) -> Result<Vec<StreamRecord>, ProbeError> {
        self.calls.lock().unwrap().push(path.to_path_buf());

        if let Some(failure) = self.failure {
            return Err(match failure {
                MockFailure::ToolUnavailable => ProbeError::ToolUnavailable {
                    tool: "ffprobe".to_string(),
                },
                MockFailure::InvocationFailed => ProbeError::InvocationFailed {
                    tool: "ffprobe".to_string(),
                    path: path.to_path_buf(),
                    message: "exit status: 1".to_string(),
                },
                MockFailure::MalformedOutput => ProbeError::MalformedOutput {
                    path: path.to_path_buf(),
                    message: "expected value at line 1 column 1".to_string(),
                },
            });
        }

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(self.streams.get(&file_name).cloned().unwrap_or_default())
    }
}
