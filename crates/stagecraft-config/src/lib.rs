//! Stagecraft configuration system
//!
//! This crate loads animation, state machine and demo settings from
//! `stagecraft.toml`, with environment variables taking precedence.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILE: &str = "stagecraft.toml";

/// Error loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Main configuration structure for Stagecraft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StagecraftConfig {
    /// Default timing of screen animations
    pub animation: AnimationConfig,
    /// State machine behaviour
    pub state_machine: StateMachineConfig,
    /// Headless demo settings
    pub demo: DemoConfig,
}

/// Default timing of screen animations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Duration of each property animation in seconds
    pub duration: f32,
    /// Easing curve name (e.g. `out_quad`, `out_back`, `ease_in_out`)
    pub easing: String,
    /// Delay before a step starts when a sequence plays forward
    pub forward_delay: f32,
    /// Delay before a step starts when a sequence plays in reverse
    pub reverse_delay: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: 0.5,
            easing: "out_quad".to_string(),
            forward_delay: 0.2,
            reverse_delay: 0.2,
        }
    }
}

/// State machine behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateMachineConfig {
    /// What a state change does while another one is in flight: `reject` or `supersede`
    pub transition_policy: String,
}

impl Default for StateMachineConfig {
    fn default() -> Self {
        Self {
            transition_policy: "reject".to_string(),
        }
    }
}

/// Headless demo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Simulated frames per second
    pub frame_rate: u32,
    /// Seconds without input before returning to the entry screen
    pub idle_timeout: f32,
    /// Stop after this many frames
    pub max_frames: u32,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frame_rate: 60,
            idle_timeout: 5.0,
            max_frames: 600,
        }
    }
}

impl DemoConfig {
    /// Seconds per simulated frame.
    pub fn frame_secs(&self) -> f32 {
        1.0 / self.frame_rate.max(1) as f32
    }
}

fn env_f32(key: &str) -> Option<f32> {
    std::env::var(key).ok()?.trim().parse::<f32>().ok()
}

fn env_u32(key: &str) -> Option<u32> {
    std::env::var(key).ok()?.trim().parse::<u32>().ok()
}

impl StagecraftConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from `stagecraft.toml` in the current directory,
    /// or return the default configuration if it is missing or invalid
    pub fn load_or_default() -> Self {
        Self::load_from_file(CONFIG_FILE).unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values.
    /// Values that fail to parse are ignored.
    pub fn merge_with_env(&mut self) {
        // Animation settings
        if let Some(duration) = env_f32("STAGECRAFT_DURATION") {
            self.animation.duration = duration;
        }
        if let Ok(easing) = std::env::var("STAGECRAFT_EASING") {
            self.animation.easing = easing;
        }
        if let Some(delay) = env_f32("STAGECRAFT_FORWARD_DELAY") {
            self.animation.forward_delay = delay;
        }
        if let Some(delay) = env_f32("STAGECRAFT_REVERSE_DELAY") {
            self.animation.reverse_delay = delay;
        }

        // State machine settings
        if let Ok(policy) = std::env::var("STAGECRAFT_TRANSITION_POLICY") {
            self.state_machine.transition_policy = policy;
        }

        // Demo settings
        if let Some(rate) = env_u32("STAGECRAFT_FRAME_RATE") {
            self.demo.frame_rate = rate;
        }
        if let Some(timeout) = env_f32("STAGECRAFT_IDLE_TIMEOUT") {
            self.demo.idle_timeout = timeout;
        }
        if let Some(frames) = env_u32("STAGECRAFT_MAX_FRAMES") {
            self.demo.max_frames = frames;
        }
    }

    /// Load configuration with environment variable overrides
    ///
    /// 1. Load from stagecraft.toml (or use defaults if not found)
    /// 2. Override with environment variables if present
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StagecraftConfig::default();
        assert_eq!(config.animation.duration, 0.5);
        assert_eq!(config.animation.easing, "out_quad");
        assert_eq!(config.animation.forward_delay, 0.2);
        assert_eq!(config.state_machine.transition_policy, "reject");
        assert_eq!(config.demo.frame_rate, 60);
        assert_eq!(config.demo.idle_timeout, 5.0);
    }

    #[test]
    fn test_toml_serialization() {
        let config = StagecraftConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: StagecraftConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let parsed: StagecraftConfig = toml::from_str(
            r#"
            [animation]
            easing = "out_back"

            [state_machine]
            transition_policy = "supersede"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.animation.easing, "out_back");
        assert_eq!(parsed.animation.duration, 0.5);
        assert_eq!(parsed.state_machine.transition_policy, "supersede");
        assert_eq!(parsed.demo, DemoConfig::default());
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = StagecraftConfig::load_from_file("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("does/not/exist.toml"));
    }

    #[test]
    fn test_load_from_invalid_file() {
        let path = std::env::temp_dir().join("stagecraft-config-invalid.toml");
        std::fs::write(&path, "[animation]\nduration = \"slow\"\n").unwrap();
        let err = StagecraftConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_or_default() {
        // Should not panic even if stagecraft.toml doesn't exist
        let config = StagecraftConfig::load_or_default();
        assert!(config.demo.frame_rate > 0);
    }

    #[test]
    fn test_frame_secs() {
        let mut demo = DemoConfig::default();
        demo.frame_rate = 50;
        assert_eq!(demo.frame_secs(), 0.02);
        demo.frame_rate = 0;
        assert_eq!(demo.frame_secs(), 1.0);
    }

    #[test]
    fn test_merge_with_env() {
        unsafe {
            std::env::set_var("STAGECRAFT_REVERSE_DELAY", "0.35");
            std::env::set_var("STAGECRAFT_TRANSITION_POLICY", "supersede");
            std::env::set_var("STAGECRAFT_FRAME_RATE", "not-a-number");
        }

        let mut config = StagecraftConfig::default();
        config.merge_with_env();

        assert_eq!(config.animation.reverse_delay, 0.35);
        assert_eq!(config.state_machine.transition_policy, "supersede");
        assert_eq!(config.demo.frame_rate, 60);

        // Clean up
        unsafe {
            std::env::remove_var("STAGECRAFT_REVERSE_DELAY");
            std::env::remove_var("STAGECRAFT_TRANSITION_POLICY");
            std::env::remove_var("STAGECRAFT_FRAME_RATE");
        }
    }
}
