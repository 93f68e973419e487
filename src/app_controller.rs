use log::{debug, error, info};
use std::path::{Path, PathBuf};

use crate::app_config::{Config, LanguageProfile};
use crate::classifier::{LanguageClassifier, MatchResult};
use crate::console::{Reporter, RunSummary};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::probe::{AudioProber, FfprobeProber, StreamRecord};
use crate::sidecar::{SidecarUpdater, TagOutcome};

// @module: Application controller for media tagging

/// Run options coming from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Report intended sidecar changes without writing them
    pub dry_run: bool,
    /// Print per-file matching evidence
    pub debug: bool,
}

/// Result of processing a single media file
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub sidecar: Option<PathBuf>,
    pub result: MatchResult,
    pub probe_failed: bool,
    pub tags: Vec<(String, TagOutcome)>,
    pub sidecar_failures: usize,
}

/// Main application controller: probe, classify and tag every video file
pub struct Controller {
    // @field: App configuration
    config: Config,
    profile: LanguageProfile,
    prober: Box<dyn AudioProber>,
    updater: SidecarUpdater,
    reporter: Reporter,
    options: RunOptions,
}

impl Controller {
    // @method: Create a controller probing with ffprobe
    pub fn with_config(config: Config, options: RunOptions) -> Result<Self, AppError> {
        let prober = Box::new(FfprobeProber::from_config(&config.probe));
        let reporter = Reporter::new(config.colored_output, options.debug, config.show_progress);
        Self::with_parts(config, options, prober, reporter)
    }

    // @method: Create a controller from explicit collaborators
    pub fn with_parts(
        config: Config,
        options: RunOptions,
        prober: Box<dyn AudioProber>,
        reporter: Reporter,
    ) -> Result<Self, AppError> {
        config.validate().map_err(|e| AppError::Config(e.to_string()))?;
        let profile = config
            .profile(&config.language)
            .map_err(|e| AppError::Config(e.to_string()))?;
        let updater = SidecarUpdater::from_config(&config.sidecar, options.dry_run);

        Ok(Self {
            config,
            profile,
            prober,
            updater,
            reporter,
            options,
        })
    }

    pub fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    /// Process a video file or every video file below a directory
    pub async fn run(&self, input: &Path) -> Result<RunSummary, AppError> {
        let files = if FileManager::file_exists(input) {
            vec![input.to_path_buf()]
        } else if FileManager::dir_exists(input) {
            FileManager::find_video_files(input, &self.config.video_extensions)
        } else {
            return Err(AppError::File(format!("Input path does not exist: {:?}", input)));
        };

        self.reporter.banner(self.options.dry_run, &self.config.sidecar.file_name);
        info!("Found {} video file(s) in {:?}", files.len(), input);

        let mut summary = RunSummary::default();
        self.reporter.start_progress(files.len());

        for path in &files {
            let report = self.process_file(path).await;
            self.reporter.advance(path);

            summary.files_scanned += 1;
            if report.result.is_match() {
                summary.matched += 1;
            } else {
                summary.unmatched += 1;
            }
            if report.probe_failed {
                summary.probe_failures += 1;
            }
            summary.tags_added += report.tags.iter().filter(|(_, o)| o.inserted()).count();
            summary.tags_present += report
                .tags
                .iter()
                .filter(|(_, o)| *o == TagOutcome::AlreadyPresent)
                .count();
            summary.sidecar_failures += report.sidecar_failures;
        }

        self.reporter.finish_progress();
        self.reporter.summary(&summary, self.options.dry_run);

        Ok(summary)
    }

    /// Probe, classify and, on a match, tag one file
    ///
    /// Never fails: probe and sidecar errors are reported and counted.
    pub async fn process_file(&self, path: &Path) -> FileReport {
        let (streams, probe_failed) = self.probe(path).await;

        for stream in &streams {
            self.reporter.track(path, stream);
        }

        let (file_name, folder_name) = FileManager::file_and_folder_names(path);
        let result = LanguageClassifier::new(&self.profile).classify(&streams, &file_name, &folder_name);

        for evidence in &result.evidence {
            self.reporter.evidence(evidence);
        }

        let mut report = FileReport {
            path: path.to_path_buf(),
            sidecar: None,
            result,
            probe_failed,
            tags: Vec::new(),
            sidecar_failures: 0,
        };

        if !report.result.is_match() {
            self.reporter.file_result(&self.profile.name, path, false);
            return report;
        }

        let dir = FileManager::containing_dir(path);
        let sidecar = self.updater.sidecar_path(&dir);

        for tag in &self.profile.tags {
            match self.updater.add_tag(&dir, tag) {
                Ok(outcome) => {
                    match outcome {
                        TagOutcome::Added => self.reporter.updated(&sidecar, tag),
                        TagOutcome::WouldAdd => self.reporter.would_update(&sidecar, tag),
                        TagOutcome::AlreadyPresent => self.reporter.tag_present(&sidecar, tag),
                    }
                    report.tags.push((tag.clone(), outcome));
                }
                Err(e) => {
                    error!("{}", e);
                    report.sidecar_failures += 1;
                }
            }
        }

        self.reporter.file_result(&self.profile.name, path, true);
        report.sidecar = Some(sidecar);
        report
    }

    /// Audio streams of a file, empty when probing failed
    async fn probe(&self, path: &Path) -> (Vec<StreamRecord>, bool) {
        match self.prober.audio_streams(path).await {
            Ok(streams) => (streams, false),
            Err(e) => {
                error!("{}", e);
                debug!("Continuing without audio track evidence for {:?}", path);
                (Vec::new(), true)
            }
        }
    }
}
