//! Command line interface for penpath
//!
//! Handles parsing command line arguments and provides
//! validation for user inputs. Many CLI options are documented with
//! examples to help users understand the expected format.

use clap::Parser;
use std::path::PathBuf;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Penpath CLI arguments
///
/// Examples:
///   penpath --script draw.json                 # Replay events, print shapes
///   penpath --script draw.json --json          # Print shapes as JSON
///   penpath --script draw.json --svg out.svg   # Also export an SVG
///   penpath --script draw.json --log-level debug
///   penpath --new-config                       # Write default settings
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "penpath",
    version,
    about = "Interactive Bézier path editing engine",
    long_about = "Penpath replays recorded pointer and keyboard events through its path tool and reports the resulting shapes. It is the headless host for the path editing engine."
)]
pub struct CliArgs {
    /// Event script to replay
    ///
    /// A JSON array of input events, e.g.
    /// `{"type": "pointerDown", "pointer": {"point": {"x": 0, "y": 0}}}`.
    #[clap(
        long = "script",
        short = 's',
        help = "JSON event script to replay",
        long_help = "Path to a JSON file holding an array of input events (pointerDown, pointerMove, pointerUp, keyDown, handleDrag, tick). Events are replayed in order through the path tool."
    )]
    pub script: Option<PathBuf>,

    /// Settings file overriding the user config
    #[clap(
        long = "config",
        short = 'c',
        help = "Settings file to use instead of the user config",
        long_help = "Path to a settings.json file. When given, it replaces ~/.config/penpath/settings.json for this run. Fields left out keep their defaults."
    )]
    pub config: Option<PathBuf>,

    #[clap(
        long = "svg",
        help = "Write the resulting shapes to an SVG file",
        long_help = "Write every shape left on the page after the replay into one SVG document, positioned in page coordinates."
    )]
    pub svg: Option<PathBuf>,

    #[clap(
        long = "json",
        help = "Print shapes as JSON",
        long_help = "Print the resulting shapes as a JSON array in the same format hosts exchange with the engine, instead of one summary line per shape."
    )]
    pub json: bool,

    #[clap(
        long = "log-level",
        short = 'l',
        help = "Log level (error, warn, info, debug, trace)",
        long_help = "Log level for engine output on stderr. RUST_LOG, when set, takes precedence. Defaults to the log_level from the settings file, or warn."
    )]
    pub log_level: Option<String>,

    #[clap(
        long = "log-file",
        help = "Also write logs to the config logs directory",
        long_help = "Also write logs to ~/.config/penpath/logs/penpath-YYYY-MM-DD.log."
    )]
    pub log_file: bool,

    /// Initialize user configuration directory with settings
    ///
    /// This creates the ~/.config/penpath directory with:
    /// - settings.json: every engine threshold at its default
    /// - logs/: destination for --log-file
    #[clap(
        long = "new-config",
        help = "Initialize user config directory with default settings",
        long_help = "Initialize the ~/.config/penpath directory with a settings.json file listing every engine setting at its default, plus a logs directory."
    )]
    pub new_config: bool,
}

impl CliArgs {
    /// Validate the CLI arguments after parsing
    ///
    /// This ensures that all paths exist and are valid before the replay starts,
    /// providing clear error messages for common mistakes.
    pub fn validate(&self) -> Result<(), String> {
        if self.new_config {
            return Ok(());
        }

        match &self.script {
            None => {
                return Err(
                    "No event script given.\nPass one with --script <events.json>.".to_string(),
                )
            }
            Some(path) if !path.is_file() => {
                return Err(format!(
                    "Event script does not exist: {}\nMake sure the path is correct and the file exists.",
                    path.display()
                ));
            }
            Some(_) => {}
        }

        if let Some(path) = &self.config {
            if !path.is_file() {
                return Err(format!("Settings file does not exist: {}", path.display()));
            }
        }

        if let Some(level) = &self.log_level {
            if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
                return Err(format!(
                    "Unknown log level: {}\nAvailable levels: {}",
                    level,
                    LOG_LEVELS.join(", ")
                ));
            }
        }

        Ok(())
    }
}
