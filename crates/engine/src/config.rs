//! Runtime configuration.
//!
//! Built once at startup from an optional JSON file plus environment
//! overrides, validated, then passed by reference. The only later change goes
//! through [`Orchestrator::apply_reconfigure`](crate::Orchestrator::apply_reconfigure).
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `MATRIX_CONFIG` | path to a JSON config file |
//! | `MATRIX_LEVEL` | path to an ASCII level file |
//! | `MATRIX_FPS` | frame rate, 1-60 |
//! | `MATRIX_CHANNEL` | `serial` or `mock` |
//! | `MATRIX_SERIAL_PORT` | serial device path |
//! | `MATRIX_BAUD` | serial baud rate |
//! | `MATRIX_FAILURE_THRESHOLD` | consecutive failures before escalation |
//! | `MATRIX_FAILURE_POLICY` | `pause` or `abort` |
//! | `MATRIX_HUD` | draw score and lives (`1`/`0`) |
//! | `MATRIX_DEBUG_OVERLAY` | draw bounding boxes (`1`/`0`) |

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{Level, LevelError, PhysicsConfig, PhysicsError};
use crate::render::{Palette, PaletteOverrides, RenderOptions};
use crate::transport::{ChannelConfig, FaultPlan, SerialSettings, TransportConfig};
use crate::types::{
    DEFAULT_FAILURE_THRESHOLD, DEFAULT_FRAME_RATE_HZ, MAX_FRAME_RATE_HZ, MIN_FRAME_RATE_HZ,
};

/// What to do when the transport escalates a channel failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Pause the loop; the user can resume after reconnecting
    #[default]
    Pause,
    /// Stop the loop
    Abort,
}

impl FailurePolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pause" => Some(FailurePolicy::Pause),
            "abort" | "stop" => Some(FailurePolicy::Abort),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid level {path}")]
    Level {
        path: PathBuf,
        #[source]
        source: LevelError,
    },
    #[error("{key}={value:?}: {reason}")]
    Env {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
    #[error("frame rate {0} Hz is outside 1-60")]
    FrameRate(u32),
    #[error("baud rate must be non-zero")]
    BaudRate,
    #[error("serial port name is empty")]
    EmptyPort,
    #[error("failure threshold must be at least 1")]
    FailureThreshold,
    #[error("shutdown timeout must be non-zero")]
    ShutdownTimeout,
    #[error("rate window must be non-zero")]
    RateWindow,
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub frame_rate_hz: u32,
    pub channel: ChannelConfig,
    pub palette: PaletteOverrides,
    pub physics: PhysicsConfig,
    pub failure_threshold: u32,
    pub failure_policy: FailurePolicy,
    pub show_hud: bool,
    pub debug_overlay: bool,
    pub shutdown_timeout_ms: u64,
    pub rate_window_ms: u64,
    /// ASCII level file; the built-in level when unset
    pub level_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
            channel: ChannelConfig::default(),
            palette: PaletteOverrides::new(),
            physics: PhysicsConfig::default(),
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            failure_policy: FailurePolicy::default(),
            show_hud: true,
            debug_overlay: false,
            shutdown_timeout_ms: 500,
            rate_window_ms: 1000,
            level_path: None,
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read `key` through `lookup`, ignoring blank values.
fn var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    parse: impl Fn(&str) -> Option<T>,
    reason: &'static str,
) -> Result<Option<T>, ConfigError> {
    match var(lookup, key) {
        None => Ok(None),
        Some(value) => match parse(&value) {
            Some(v) => Ok(Some(v)),
            None => Err(ConfigError::Env { key, value, reason }),
        },
    }
}

impl Config {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = match var(&lookup, "MATRIX_CONFIG") {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };

        if let Some(path) = var(&lookup, "MATRIX_LEVEL") {
            cfg.level_path = Some(PathBuf::from(path));
        }
        let fps = parse_var(&lookup, "MATRIX_FPS", |s| s.parse().ok(), "expected an integer")?;
        if let Some(fps) = fps {
            cfg.frame_rate_hz = fps;
        }
        if let Some(kind) = var(&lookup, "MATRIX_CHANNEL") {
            match kind.to_lowercase().as_str() {
                "serial" => {
                    if !matches!(cfg.channel, ChannelConfig::Serial(_)) {
                        cfg.channel = ChannelConfig::Serial(SerialSettings::default());
                    }
                }
                "mock" => {
                    if !matches!(cfg.channel, ChannelConfig::Mock(_)) {
                        cfg.channel = ChannelConfig::Mock(FaultPlan::default());
                    }
                }
                _ => {
                    return Err(ConfigError::Env {
                        key: "MATRIX_CHANNEL",
                        value: kind,
                        reason: "expected `serial` or `mock`",
                    })
                }
            }
        }
        let port = var(&lookup, "MATRIX_SERIAL_PORT");
        let baud = parse_var(&lookup, "MATRIX_BAUD", |s| s.parse().ok(), "expected an integer")?;
        if let ChannelConfig::Serial(serial) = &mut cfg.channel {
            if let Some(port) = port {
                serial.port = port;
            }
            if let Some(baud) = baud {
                serial.baud_rate = baud;
            }
        }
        if let Some(n) = parse_var(
            &lookup,
            "MATRIX_FAILURE_THRESHOLD",
            |s| s.parse().ok(),
            "expected an integer",
        )? {
            cfg.failure_threshold = n;
        }
        if let Some(policy) = parse_var(
            &lookup,
            "MATRIX_FAILURE_POLICY",
            FailurePolicy::from_str,
            "expected `pause` or `abort`",
        )? {
            cfg.failure_policy = policy;
        }
        if let Some(on) = parse_var(&lookup, "MATRIX_HUD", parse_bool, "expected a boolean")? {
            cfg.show_hud = on;
        }
        let overlay = parse_var(&lookup, "MATRIX_DEBUG_OVERLAY", parse_bool, "expected a boolean")?;
        if let Some(on) = overlay {
            cfg.debug_overlay = on;
        }
        Ok(cfg)
    }

    pub fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_FRAME_RATE_HZ..=MAX_FRAME_RATE_HZ).contains(&self.frame_rate_hz) {
            return Err(ConfigError::FrameRate(self.frame_rate_hz));
        }
        if let ChannelConfig::Serial(serial) = &self.channel {
            if serial.port.trim().is_empty() {
                return Err(ConfigError::EmptyPort);
            }
            if serial.baud_rate == 0 {
                return Err(ConfigError::BaudRate);
            }
        }
        if self.failure_threshold == 0 {
            return Err(ConfigError::FailureThreshold);
        }
        if self.shutdown_timeout_ms == 0 {
            return Err(ConfigError::ShutdownTimeout);
        }
        if self.rate_window_ms == 0 {
            return Err(ConfigError::RateWindow);
        }
        self.physics.validate()?;
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate_hz.max(1) as f64)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_millis(self.shutdown_timeout_ms)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            hud: self.show_hud,
            debug_overlay: self.debug_overlay,
        }
    }

    pub fn palette(&self) -> Palette {
        Palette::with_overrides(&self.palette)
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            failure_threshold: self.failure_threshold,
            rate_window: Duration::from_millis(self.rate_window_ms),
        }
    }

    /// The configured level file, or the built-in level.
    pub fn load_level(&self) -> Result<Level, ConfigError> {
        let Some(path) = &self.level_path else {
            return Ok(Level::default_level());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Level::parse(&text).map_err(|source| ConfigError::Level {
            path: path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.frame_interval(), Duration::from_secs_f64(1.0 / 30.0));
    }

    #[test]
    fn env_overrides_apply() {
        let cfg = Config::from_lookup(lookup(&[
            ("MATRIX_FPS", "20"),
            ("MATRIX_SERIAL_PORT", "/dev/ttyACM1"),
            ("MATRIX_BAUD", "57600"),
            ("MATRIX_FAILURE_POLICY", "abort"),
            ("MATRIX_HUD", "off"),
            ("MATRIX_DEBUG_OVERLAY", "1"),
        ]))
        .unwrap();
        assert_eq!(cfg.frame_rate_hz, 20);
        assert_eq!(
            cfg.channel,
            ChannelConfig::Serial(SerialSettings {
                port: "/dev/ttyACM1".to_string(),
                baud_rate: 57600,
                ..SerialSettings::default()
            })
        );
        assert_eq!(cfg.failure_policy, FailurePolicy::Abort);
        assert!(!cfg.show_hud);
        assert!(cfg.debug_overlay);
    }

    #[test]
    fn unparseable_env_is_an_error() {
        let err = Config::from_lookup(lookup(&[("MATRIX_FPS", "fast")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: "MATRIX_FPS", .. }));
        let err = Config::from_lookup(lookup(&[("MATRIX_CHANNEL", "usb")])).unwrap_err();
        assert!(matches!(err, ConfigError::Env { key: "MATRIX_CHANNEL", .. }));
    }

    #[test]
    fn mock_channel_from_env() {
        let cfg = Config::from_lookup(lookup(&[("MATRIX_CHANNEL", "mock")])).unwrap();
        assert_eq!(cfg.channel, ChannelConfig::Mock(FaultPlan::default()));
        cfg.validate().unwrap();
    }

    #[test]
    fn validation_rejects_bad_values() {
        let bad = [
            Config {
                frame_rate_hz: 0,
                ..Config::default()
            },
            Config {
                frame_rate_hz: 61,
                ..Config::default()
            },
            Config {
                channel: ChannelConfig::Serial(SerialSettings {
                    port: " ".to_string(),
                    ..SerialSettings::default()
                }),
                ..Config::default()
            },
            Config {
                channel: ChannelConfig::Serial(SerialSettings {
                    baud_rate: 0,
                    ..SerialSettings::default()
                }),
                ..Config::default()
            },
            Config {
                failure_threshold: 0,
                ..Config::default()
            },
            Config {
                shutdown_timeout_ms: 0,
                ..Config::default()
            },
            Config {
                physics: PhysicsConfig {
                    gravity: -1.0,
                    ..PhysicsConfig::default()
                },
                ..Config::default()
            },
        ];
        for cfg in bad {
            assert!(cfg.validate().is_err(), "{cfg:?}");
        }
    }

    #[test]
    fn json_fills_missing_fields_with_defaults() {
        let cfg: Config = serde_json::from_str(
            r#"{
                "frame_rate_hz": 15,
                "channel": {"kind": "mock", "fail_every": 3},
                "palette": {"sky": [0, 0, 0]},
                "physics": {"gravity": 40.0}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.frame_rate_hz, 15);
        assert_eq!(cfg.physics.gravity, 40.0);
        assert_eq!(cfg.physics.jump_power, PhysicsConfig::default().jump_power);
        assert_eq!(cfg.failure_threshold, DEFAULT_FAILURE_THRESHOLD);
        cfg.validate().unwrap();
    }

    #[test]
    fn missing_level_file_is_reported() {
        let cfg = Config {
            level_path: Some(PathBuf::from("/nonexistent/level.txt")),
            ..Config::default()
        };
        assert!(matches!(cfg.load_level(), Err(ConfigError::Read { .. })));
        assert!(Config::default().load_level().is_ok());
    }
}
