//! Sends the rainbow test pattern to the matrix once.
//!
//! `test-pattern --list` prints the serial ports found instead.

use anyhow::{bail, Context, Result};
use tracing::info;

use matrix_platformer::engine::Config;
use matrix_platformer::logging;
use matrix_platformer::render::rainbow;
use matrix_platformer::transport::{list_ports, open_channel, SendOutcome, Transport};
use matrix_platformer::types::{MATRIX_HEIGHT, MATRIX_WIDTH};

fn main() -> Result<()> {
    logging::init()?;

    if std::env::args().skip(1).any(|a| a == "--list") {
        let ports = list_ports().context("listing serial ports")?;
        if ports.is_empty() {
            println!("no serial ports found");
        }
        for port in ports {
            println!("{port}");
        }
        return Ok(());
    }

    let cfg = Config::from_env().context("loading configuration")?;
    let channel = open_channel(&cfg.channel)
        .with_context(|| format!("opening {}", cfg.channel.describe()))?;
    let transport = Transport::start(channel, cfg.transport_config())?;

    let frame = rainbow(MATRIX_WIDTH, MATRIX_HEIGHT);
    if transport.send(&frame)? == SendOutcome::Dropped {
        bail!("transport busy; test pattern dropped");
    }
    transport.wait_idle(cfg.shutdown_timeout());

    let stats = transport.shutdown(cfg.shutdown_timeout());
    if stats.frames_sent == 0 {
        bail!("test pattern was not delivered ({} write errors)", stats.write_errors);
    }
    info!(channel = %cfg.channel.describe(), "test pattern sent");
    Ok(())
}
