use std::fmt;

use crate::app_config::LanguageProfile;
use crate::probe::StreamRecord;

// @module: Language classification of media files

/// Where a profile pattern was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    /// Title tag of an audio stream
    StreamTitle { index: usize, title: String },
    /// Name of the media file
    FileName(String),
    /// Name of the directory holding the media file
    FolderName(String),
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Evidence::StreamTitle { title, .. } => write!(f, "audio track title: '{}'", title),
            Evidence::FileName(name) => write!(f, "file name: '{}'", name),
            Evidence::FolderName(name) => write!(f, "folder name: '{}'", name),
        }
    }
}

/// Outcome of classifying one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    /// Every source that contained a pattern, in check order
    pub evidence: Vec<Evidence>,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        !self.evidence.is_empty()
    }
}

/// Decides whether a file belongs to a language profile
pub struct LanguageClassifier<'a> {
    profile: &'a LanguageProfile,
}

impl<'a> LanguageClassifier<'a> {
    pub fn new(profile: &'a LanguageProfile) -> Self {
        Self { profile }
    }

    /// Case-sensitive substring check against every pattern of the profile
    pub fn contains_pattern(&self, text: &str) -> bool {
        self.profile
            .patterns
            .iter()
            .any(|pattern| text.contains(pattern.as_str()))
    }

    /// Check stream titles, the file name and the folder name
    ///
    /// All sources are checked so the result lists every piece of evidence.
    pub fn classify(&self, streams: &[StreamRecord], file_name: &str, folder_name: &str) -> MatchResult {
        let mut evidence = Vec::new();

        for stream in streams {
            let title = stream.title_text();
            if self.contains_pattern(title) {
                evidence.push(Evidence::StreamTitle {
                    index: stream.index,
                    title: title.to_string(),
                });
            }
        }

        if self.contains_pattern(file_name) {
            evidence.push(Evidence::FileName(file_name.to_string()));
        }

        if self.contains_pattern(folder_name) {
            evidence.push(Evidence::FolderName(folder_name.to_string()));
        }

        MatchResult { evidence }
    }
}
