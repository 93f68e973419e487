// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::{Path, PathBuf};

use langtagger::app_config::{self, Config, DEFAULT_CONFIG_FILE};
use langtagger::{Controller, RunOptions};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for langtagger
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Destination of the configuration file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

/// langtagger - tag video libraries by audio language
///
/// Recursively tags video media whose audio track titles, file name or folder
/// name contain the patterns of a language profile, by adding <tag> entries to
/// the movie.nfo file next to the video.
#[derive(Parser, Debug)]
#[command(name = "langtagger")]
#[command(version)]
#[command(about = "Tag video media by audio language in movie.nfo sidecars")]
#[command(long_about = "langtagger inspects audio track titles (via ffprobe), file names and folder names
of every video below a directory and adds language tags to the movie.nfo sidecar
of matching videos.

EXAMPLES:
    langtagger                              # Tag German media below the current directory
    langtagger /movies --dry-run            # Show what would be written
    langtagger /movies --debug              # Print the evidence for every file
    langtagger -l de -c my-profiles.json    # Use a custom configuration
    langtagger init-config                  # Write langtagger.json with the defaults
    langtagger completions bash > langtagger.bash

CONFIGURATION:
    langtagger.json in the working directory is used when present. Language
    profiles defined there are merged with the built-in 'de' profile.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Root media folder path
    #[arg(value_name = "PATH", default_value = ".")]
    path: PathBuf,

    /// Do not write changes, only show what would be updated
    #[arg(long)]
    dry_run: bool,

    /// Print debug information about audio tracks, file name and folder name
    #[arg(long)]
    debug: bool,

    /// Language configuration to use (e.g. 'de')
    #[arg(short, long)]
    language: Option<String>,

    /// Configuration file path
    #[arg(short, long, env = "LANGTAGGER_CONFIG")]
    config: Option<PathBuf>,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Disable colored status lines (also disabled by the NO_COLOR variable)
    #[arg(long)]
    no_color: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,
}

// @struct: Custom logger implementation
struct CustomLogger;

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Label and ANSI color for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "\x1B[1;31m"),
            Level::Warn => ("WARN ", "\x1B[1;33m"),
            Level::Info => ("INFO ", "\x1B[1;32m"),
            Level::Debug => ("DEBUG", "\x1B[1;36m"),
            Level::Trace => ("TRACE", "\x1B[1;35m"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // The max level is adjusted after the config is read
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (label, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize the logger once; the level is updated after loading the config
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    match &cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(*shell, &mut cmd, "langtagger", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::InitConfig { output, force }) => {
            return init_config(output, *force);
        }
        None => {}
    }

    run_tagging(cli).await
}

fn init_config(output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        return Err(anyhow!(
            "Config file already exists: {:?}. Use --force to overwrite.",
            output
        ));
    }

    Config::default().save(output)?;
    info!("Default configuration written to {:?}", output);
    Ok(())
}

async fn run_tagging(options: CommandLineOptions) -> Result<()> {
    let (config_path, explicit) = match &options.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };
    let mut config = Config::load(&config_path, explicit)?;

    // Override config with CLI options if provided
    if let Some(language) = &options.language {
        config.language = language.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else if options.debug {
        config.log_level = app_config::LogLevel::Debug;
    }
    if options.no_color || std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()) {
        config.colored_output = false;
    }
    if options.no_progress {
        config.show_progress = false;
    }

    log::set_max_level(config.log_level.to_level_filter());

    config.validate().context("Configuration validation failed")?;

    let run_options = RunOptions {
        dry_run: options.dry_run,
        debug: options.debug,
    };
    let controller = Controller::with_config(config, run_options)?;

    // Per-file failures are reported by the controller and never abort the run
    controller.run(&options.path).await?;

    Ok(())
}
