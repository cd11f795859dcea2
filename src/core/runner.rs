//! Application runner logic
//!
//! Replays an event script through the path tool against an in-memory
//! document and reports the resulting shapes.

use crate::core::config::{CliArgs, ConfigFile, EditorSettings};
use crate::core::document::Document;
use crate::logging;
use crate::tools::{InputEvent, PathTool};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Read a JSON array of input events
pub fn load_script(path: &Path) -> Result<Vec<InputEvent>> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("reading script {}", path.display()))?;
    let events = serde_json::from_str(&contents)
        .with_context(|| format!("parsing script {}", path.display()))?;
    Ok(events)
}

/// Settings layered as defaults, then the settings file
pub fn resolve_settings(cli_args: &CliArgs) -> Result<ConfigFile> {
    match &cli_args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("reading settings {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parsing settings {}", path.display()))
        }
        None => Ok(ConfigFile::load().unwrap_or_default()),
    }
}

/// Feed every event to the tool, applying effects to `document`
///
/// Pointer-downs without a target are resolved against the document,
/// and ticks the tool schedules are delivered once script time reaches
/// them.
pub fn replay(events: &[InputEvent], tool: &mut PathTool, document: &mut Document) {
    let mut now_ms = 0;
    for event in events {
        let time_ms = event.time_ms().unwrap_or(now_ms);
        deliver_due_tick(tool, document, Some(time_ms));
        now_ms = now_ms.max(time_ms);

        let event = match event {
            InputEvent::PointerDown {
                pointer,
                target: None,
            } => InputEvent::PointerDown {
                pointer: *pointer,
                target: document
                    .shape_at(pointer.point, pointer.zoom, &tool.settings.hit_test)
                    .cloned(),
            },
            other => other.clone(),
        };

        let effects = tool.handle(&event);
        debug!("{:?} -> {} effect(s)", event, effects.len());
        document.apply(&effects, now_ms);
    }
    deliver_due_tick(tool, document, None);
}

/// Send the scheduled tick if it is due by `time_ms`, or unconditionally
/// at the end of the script
fn deliver_due_tick(tool: &mut PathTool, document: &mut Document, time_ms: Option<u64>) {
    let Some(deadline) = document.scheduled_tick else {
        return;
    };
    if time_ms.is_some_and(|t| t < deadline) {
        return;
    }
    document.scheduled_tick = None;
    let effects = tool.handle(&InputEvent::Tick { time_ms: deadline });
    document.apply(&effects, deadline);
}

/// One summary line per shape
pub fn summarize(document: &Document) -> String {
    document
        .shapes()
        .map(|shape| {
            format!(
                "{}  at ({:.3}, {:.3})  {:.3} x {:.3}  {}  {}",
                shape.id,
                shape.x,
                shape.y,
                shape.w,
                shape.h,
                if shape.is_closed { "closed" } else { "open" },
                shape.path_data()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Create and run the application with the given CLI arguments.
/// Handles special CLI flags and delegates to the replay.
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    // Handle --new-config flag specially
    if cli_args.new_config {
        return ConfigFile::initialize_config_directory()
            .context("Failed to initialize config directory");
    }

    cli_args.validate().map_err(|e| anyhow::anyhow!(e))?;

    let config = resolve_settings(&cli_args)?;
    let level = cli_args
        .log_level
        .clone()
        .or_else(|| config.log_level.clone())
        .unwrap_or_else(|| "warn".to_string());
    let _guard = logging::init_logging(&level, cli_args.log_file)?;

    let settings: EditorSettings = config.editor_settings();
    let Some(script) = &cli_args.script else {
        anyhow::bail!("no event script given");
    };
    let events = load_script(script)?;
    info!("Replaying {} events from {}", events.len(), script.display());

    let mut tool = PathTool::new(settings);
    let mut document = Document::new();
    replay(&events, &mut tool, &mut document);

    if cli_args.json {
        let shapes: Vec<_> = document.shapes().collect();
        println!("{}", serde_json::to_string_pretty(&shapes)?);
    } else {
        println!("{}", summarize(&document));
    }

    if let Some(path) = &cli_args.svg {
        fs::write(path, document.to_svg(1.0))
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote {}", path.display());
    }

    Ok(())
}
