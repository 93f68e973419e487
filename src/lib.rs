/*!
 * # langtagger - language tags for video libraries
 *
 * A Rust library that scans a media tree and writes language tags into the
 * NFO sidecar files read by media servers such as Kodi or Jellyfin.
 *
 * ## Features
 *
 * - Probe audio track titles with ffprobe
 * - Match configurable language patterns against track titles, file names
 *   and folder names
 * - Merge `<tag>` entries into existing `movie.nfo` files without touching
 *   unrelated metadata, idempotently
 * - Dry-run mode reporting every intended change
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration and language profiles
 * - `probe`: Audio stream probing (ffprobe)
 * - `classifier`: Pattern matching across stream titles, file and folder names
 * - `sidecar`: NFO document model and tag updater
 * - `app_controller`: Traversal and the per-file pipeline
 * - `console`: Colored status lines and progress
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod classifier;
pub mod console;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod probe;
pub mod sidecar;

// Re-export main types for easier usage
pub use app_config::{Config, LanguageProfile};
pub use app_controller::{Controller, RunOptions};
pub use classifier::{Evidence, LanguageClassifier, MatchResult};
pub use errors::{AppError, ProbeError, SidecarError};
pub use probe::{AudioProber, FfprobeProber, StreamRecord};
pub use sidecar::{NfoDocument, SidecarUpdater, TagOutcome};
