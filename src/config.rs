use crate::api::ApiConfig;
use crate::rehearsal::{RehearsalConfig, GRACE_SECS, MAX_RECORDING_SECS};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    #[serde(default)]
    pub rehearsal: RehearsalDefaults,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub sessions: SessionsConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

/// Tunable rehearsal settings
///
/// The 30s grace period and the 600s recording ceiling are fixed and cannot
/// be set from a config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RehearsalDefaults {
    pub target_minutes: u32,
    pub pulse_spacing_ms: u64,
    pub tick_interval_ms: u64,
}

impl Default for RehearsalDefaults {
    fn default() -> Self {
        let base = RehearsalConfig::default();
        Self {
            target_minutes: base.target_minutes,
            pulse_spacing_ms: base.pulse_spacing.as_millis() as u64,
            tick_interval_ms: base.tick_interval.as_millis() as u64,
        }
    }
}

impl RehearsalDefaults {
    /// Session configuration, optionally overriding the target
    pub fn session_config(&self, target_minutes: Option<u32>) -> RehearsalConfig {
        RehearsalConfig {
            target_minutes: target_minutes.unwrap_or(self.target_minutes),
            grace_secs: GRACE_SECS,
            max_recording_secs: MAX_RECORDING_SECS,
            pulse_spacing: Duration::from_millis(self.pulse_spacing_ms),
            tick_interval: Duration::from_millis(self.tick_interval_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Simulated analysis delay of the mock scorer
    pub delay_ms: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self { delay_ms: 3000 }
    }
}

/// Eviction of rehearsals nobody is using any more
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Idle time after which a rehearsal that is not recording or analyzing is dropped
    pub idle_ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            idle_ttl_secs: 1800,
            sweep_interval_secs: 60,
        }
    }
}

impl SessionsConfig {
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.idle_ttl_secs)
    }

    /// Never zero, since it drives a `tokio::time::interval`
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()
            .with_context(|| format!("Failed to load config from {}", path))?;

        let cfg: Self = settings.try_deserialize()?;
        cfg.rehearsal
            .session_config(None)
            .validate()
            .context("Invalid rehearsal defaults")?;

        Ok(cfg)
    }
}
