//! LED matrix platformer runner (default binary).
//!
//! Runs the tick loop against the configured channel and mirrors every frame
//! in the terminal with half-block glyphs. Set `MATRIX_LOG_PATH` to keep log
//! output off the preview screen.

use anyhow::{Context, Result};
use tracing::info;

use matrix_platformer::engine::{Config, Orchestrator};
use matrix_platformer::input::KeyboardInput;
use matrix_platformer::logging;
use matrix_platformer::term::{status_line, MatrixPreview};

fn main() -> Result<()> {
    logging::init()?;

    let cfg = Config::from_env().context("loading configuration")?;
    info!(channel = %cfg.channel.describe(), fps = cfg.frame_rate_hz, "starting");
    let mut orchestrator = Orchestrator::from_config(cfg).context("starting orchestrator")?;

    let mut preview = MatrixPreview::new();
    preview.enter()?;

    let mut input = KeyboardInput::default();
    let result = orchestrator.run_with(&mut input, |o| {
        preview.draw(o.frame(), &status_line(&o.snapshot()))
    });

    // Always try to restore terminal state.
    let _ = preview.exit();

    let reason = orchestrator.stop_reason();
    let stats = orchestrator.shutdown();
    info!(
        ?reason,
        sent = stats.frames_sent,
        dropped = stats.frames_dropped,
        errors = stats.write_errors,
        "stopped"
    );
    result
}
