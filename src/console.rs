/*!
 * Console status lines.
 *
 * Per-file results go to stdout through a [`Reporter`], which applies the
 * colors of [`Palette`] (unless disabled) and keeps the progress bar intact
 * while printing.
 */

use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;

use crate::classifier::Evidence;
use crate::probe::StreamRecord;

/// ANSI color codes used for status lines
pub struct Palette;

impl Palette {
    pub const GREEN: &'static str = "\x1B[32m";
    pub const RED: &'static str = "\x1B[31m";
    pub const ORANGE: &'static str = "\x1B[38;5;208m";
    pub const RESET: &'static str = "\x1B[0m";
}

/// Counters for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_scanned: usize,
    pub matched: usize,
    pub unmatched: usize,
    /// Tags written, or that would be written in a dry run
    pub tags_added: usize,
    pub tags_present: usize,
    pub probe_failures: usize,
    pub sidecar_failures: usize,
}

/// Prints status lines, optionally colored, around a progress bar
pub struct Reporter {
    colored: bool,
    verbose: bool,
    progress: ProgressBar,
}

impl Reporter {
    pub fn new(colored: bool, verbose: bool, show_progress: bool) -> Self {
        let progress = if show_progress {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar());
            bar.set_style(style.progress_chars("█▓▒░"));
            bar
        } else {
            ProgressBar::hidden()
        };

        Self {
            colored,
            verbose,
            progress,
        }
    }

    /// Reporter without colors or progress bar
    pub fn plain(verbose: bool) -> Self {
        Self::new(false, verbose, false)
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Wrap text in a color unless colors are disabled
    pub fn paint(&self, color: &str, text: &str) -> String {
        if self.colored {
            format!("{}{}{}", color, text, Palette::RESET)
        } else {
            text.to_string()
        }
    }

    fn emit(&self, line: &str) {
        self.progress.suspend(|| println!("{}", line));
    }

    pub fn start_progress(&self, total: usize) {
        self.progress.set_length(total as u64);
        self.progress.set_position(0);
    }

    pub fn advance(&self, path: &Path) {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        self.progress.set_message(name);
        self.progress.inc(1);
    }

    pub fn finish_progress(&self) {
        self.progress.finish_and_clear();
    }

    pub fn banner_line(&self, dry_run: bool, file_name: &str) -> String {
        let text = if dry_run {
            "===== Dry-Run, this will not write anything. =====".to_string()
        } else {
            format!("===== Hot-Run, this will write tags to {} files. =====", file_name)
        };
        self.paint(Palette::ORANGE, &text)
    }

    pub fn banner(&self, dry_run: bool, file_name: &str) {
        self.emit(&self.banner_line(dry_run, file_name));
    }

    pub fn match_line(&self, language: &str, path: &Path, matched: bool) -> String {
        if matched {
            self.paint(Palette::GREEN, &format!("{} media found in {}", language, path.display()))
        } else {
            self.paint(Palette::RED, &format!("No {} media found in {}", language, path.display()))
        }
    }

    pub fn file_result(&self, language: &str, path: &Path, matched: bool) {
        self.emit(&self.match_line(language, path, matched));
    }

    /// Diagnostic: one probed audio track
    pub fn track(&self, path: &Path, stream: &StreamRecord) {
        if self.verbose {
            self.emit(&format!(
                "File: {} - Audio Track {}, Title: '{}'",
                path.display(),
                stream.index,
                stream.title_text()
            ));
        }
    }

    /// Diagnostic: one matching source
    pub fn evidence(&self, evidence: &Evidence) {
        if self.verbose {
            self.emit(&self.paint(Palette::GREEN, &format!("Found pattern in {}", evidence)));
        }
    }

    /// Diagnostic: tag already in the sidecar
    pub fn tag_present(&self, sidecar: &Path, tag: &str) {
        if self.verbose {
            self.emit(&self.paint(
                Palette::GREEN,
                &format!("Tag '{}' already exists in {}", tag, sidecar.display()),
            ));
        }
    }

    pub fn would_update_line(&self, sidecar: &Path, tag: &str) -> String {
        format!(
            "{} {}",
            self.paint(Palette::ORANGE, "[DRY-RUN]"),
            self.paint(
                Palette::GREEN,
                &format!("Would update {} with tag: {}", sidecar.display(), tag)
            )
        )
    }

    pub fn would_update(&self, sidecar: &Path, tag: &str) {
        self.emit(&self.would_update_line(sidecar, tag));
    }

    pub fn updated(&self, sidecar: &Path, tag: &str) {
        self.emit(&self.paint(
            Palette::GREEN,
            &format!("Updated {} with tag: {}", sidecar.display(), tag),
        ));
    }

    pub fn summary_line(&self, summary: &RunSummary, dry_run: bool) -> String {
        let added = if dry_run { "tags to add" } else { "tags added" };
        format!(
            "Scanned {} file(s): {} matched, {} unmatched, {} {}, {} already present, {} probe failure(s), {} sidecar failure(s)",
            summary.files_scanned,
            summary.matched,
            summary.unmatched,
            summary.tags_added,
            added,
            summary.tags_present,
            summary.probe_failures,
            summary.sidecar_failures
        )
    }

    pub fn summary(&self, summary: &RunSummary, dry_run: bool) {
        self.emit(&self.paint(Palette::ORANGE, &self.summary_line(summary, dry_run)));
    }
}
