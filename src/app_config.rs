use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::language_utils::{get_language_name, validate_language_code};

// Application configuration module
// This module handles the application configuration including loading,
// validating and saving configuration settings.

/// Configuration file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "langtagger.json";

/// Key of the profile used when the requested one does not exist
pub const DEFAULT_LANGUAGE: &str = "de";

// @const: Built-in language profiles
static BUILTIN_LANGUAGES: Lazy<BTreeMap<String, LanguageProfile>> = Lazy::new(|| {
    let mut languages = BTreeMap::new();
    languages.insert(
        DEFAULT_LANGUAGE.to_string(),
        LanguageProfile::new(
            "German",
            &["German", "Deutsch", "DE", "De "],
            &["German", "Deutsch"],
        ),
    );
    languages
});

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Key of the language profile driving classification
    #[serde(default = "default_language")]
    pub language: String,

    /// Language profiles by key
    #[serde(default = "default_languages")]
    pub languages: BTreeMap<String, LanguageProfile>,

    /// Extensions (with leading dot) of the files treated as videos
    #[serde(default = "default_video_extensions")]
    pub video_extensions: Vec<String>,

    /// Sidecar file settings
    #[serde(default)]
    pub sidecar: SidecarConfig,

    /// Media prober settings
    #[serde(default)]
    pub probe: ProbeConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Use ANSI colors for status lines
    #[serde(default = "default_true")]
    pub colored_output: bool,

    /// Show a progress bar while scanning
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

/// Classification profile for one language
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct LanguageProfile {
    /// Human-readable language name used in status lines
    #[serde(default)]
    pub name: String,

    /// Substrings searched in track titles, file names and folder names
    pub patterns: Vec<String>,

    /// Tags written to the sidecar when a file matches
    pub tags: Vec<String>,
}

impl LanguageProfile {
    pub fn new(name: &str, patterns: &[&str], tags: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Sidecar (NFO) file settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SidecarConfig {
    /// File name of the sidecar inside each media directory
    #[serde(default = "default_sidecar_file_name")]
    pub file_name: String,

    /// Root element of freshly created documents
    #[serde(default = "default_root_element")]
    pub root_element: String,
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            file_name: default_sidecar_file_name(),
            root_element: default_root_element(),
        }
    }
}

/// Media prober settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProbeConfig {
    /// Path or name of the ffprobe executable
    #[serde(default = "default_ffprobe_path")]
    pub ffprobe_path: String,

    /// Seconds before a probe is abandoned
    #[serde(default = "default_probe_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: default_ffprobe_path(),
            timeout_secs: default_probe_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_languages() -> BTreeMap<String, LanguageProfile> {
    BUILTIN_LANGUAGES.clone()
}

fn default_video_extensions() -> Vec<String> {
    [".mkv", ".mp4", ".avi", ".mov", ".wmv", ".flv", ".mpeg", ".mpg"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_sidecar_file_name() -> String {
    "movie.nfo".to_string()
}

fn default_root_element() -> String {
    "movie".to_string()
}

fn default_ffprobe_path() -> String {
    "ffprobe".to_string()
}

fn default_probe_timeout_secs() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

/// Check that a string can be used as an XML element name
fn is_valid_element_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

impl Config {
    /// Load the configuration from a JSON file
    ///
    /// A missing file is an error only when the path was given explicitly;
    /// otherwise the defaults are used. Profiles from the file are merged over
    /// the built-in ones.
    pub fn load(path: &Path, explicit: bool) -> Result<Self> {
        if !path.exists() {
            if explicit {
                return Err(anyhow!("Config file not found: {:?}", path));
            }
            debug!("No config file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {:?}", path))?;
        let reader = BufReader::new(file);
        let mut config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        for (key, profile) in BUILTIN_LANGUAGES.iter() {
            config
                .languages
                .entry(key.clone())
                .or_insert_with(|| profile.clone());
        }

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Write this configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.language.trim().is_empty() {
            return Err(anyhow!("Language key must not be empty"));
        }

        for (key, profile) in &self.languages {
            if validate_language_code(key).is_err() {
                // Custom keys are allowed, they only lose the ISO display name
                warn!("Language profile '{}' is not an ISO 639 code", key);
            }
            if profile.patterns.is_empty() {
                return Err(anyhow!("Language profile '{}' has no search patterns", key));
            }
            if profile.patterns.iter().any(|p| p.is_empty()) {
                // An empty pattern would match every file
                return Err(anyhow!("Language profile '{}' contains an empty search pattern", key));
            }
            if profile.tags.is_empty() {
                return Err(anyhow!("Language profile '{}' has no tags to add", key));
            }
            if profile.tags.iter().any(|t| t.is_empty()) {
                return Err(anyhow!("Language profile '{}' contains an empty tag", key));
            }
        }

        if !self.languages.contains_key(DEFAULT_LANGUAGE) {
            return Err(anyhow!("Fallback language profile '{}' is missing", DEFAULT_LANGUAGE));
        }

        if self.video_extensions.is_empty() {
            return Err(anyhow!("At least one video extension is required"));
        }

        let file_name = &self.sidecar.file_name;
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name == "." || file_name == ".." {
            return Err(anyhow!("Invalid sidecar file name: '{}'", file_name));
        }

        if !is_valid_element_name(&self.sidecar.root_element) {
            return Err(anyhow!("Invalid sidecar root element: '{}'", self.sidecar.root_element));
        }

        if self.probe.ffprobe_path.trim().is_empty() {
            return Err(anyhow!("ffprobe path must not be empty"));
        }

        if self.probe.timeout_secs == 0 {
            return Err(anyhow!("Probe timeout must be at least one second"));
        }

        Ok(())
    }

    /// Get the profile for a language key
    ///
    /// Unknown keys fall back to the default profile with a warning.
    pub fn profile(&self, key: &str) -> Result<LanguageProfile> {
        let (key, profile) = match self.languages.get(key) {
            Some(profile) => (key, profile),
            None => {
                warn!(
                    "Unknown language '{}', falling back to '{}'. Available: {}",
                    key,
                    DEFAULT_LANGUAGE,
                    self.languages.keys().cloned().collect::<Vec<_>>().join(", ")
                );
                let profile = self
                    .languages
                    .get(DEFAULT_LANGUAGE)
                    .ok_or_else(|| anyhow!("Fallback language profile '{}' is missing", DEFAULT_LANGUAGE))?;
                (DEFAULT_LANGUAGE, profile)
            }
        };

        let mut profile = profile.clone();
        if profile.name.trim().is_empty() {
            profile.name = get_language_name(key)
                .unwrap_or_else(|_| key.to_string());
        }
        Ok(profile)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            languages: default_languages(),
            video_extensions: default_video_extensions(),
            sidecar: SidecarConfig::default(),
            probe: ProbeConfig::default(),
            log_level: LogLevel::default(),
            colored_output: true,
            show_progress: true,
        }
    }
}
