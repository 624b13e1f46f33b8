//! Tuning profile loaded from TOML or JSON.
//!
//! Every field has a default, so an empty document gives the stock XInput
//! thresholds:
//!
//! ```toml
//! [gamepad]
//! left_stick_dead_zone = 7849
//! right_stick_dead_zone = 8689
//! trigger_threshold = 30
//! stick_mode = "circular"   # "none" | "linear" | "circular"
//! ```

use crate::deadzone::{
    self, DeadZoneFilter, DeadZoneMode, LEFT_STICK_DEAD_ZONE, RIGHT_STICK_DEAD_ZONE,
    TRIGGER_THRESHOLD,
};
use crate::error::{InputError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level input profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub gamepad: GamepadConfig,
}

/// Gamepad analog tuning (raw units).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadConfig {
    pub left_stick_dead_zone: i16,
    pub right_stick_dead_zone: i16,
    pub trigger_threshold: u8,
    pub stick_mode: DeadZoneMode,
}

impl Default for GamepadConfig {
    fn default() -> Self {
        Self {
            left_stick_dead_zone: LEFT_STICK_DEAD_ZONE,
            right_stick_dead_zone: RIGHT_STICK_DEAD_ZONE,
            trigger_threshold: TRIGGER_THRESHOLD,
            stick_mode: DeadZoneMode::default(),
        }
    }
}

impl GamepadConfig {
    /// Build the validated filter described by this section.
    pub fn filter(&self) -> Result<DeadZoneFilter> {
        DeadZoneFilter::new(
            self.left_stick_dead_zone,
            self.right_stick_dead_zone,
            self.trigger_threshold,
            self.stick_mode,
        )
    }
}

impl InputConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a `.toml` or `.json` file (chosen by extension).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&text),
            Some("toml") => Self::from_toml_str(&text),
            other => Err(InputError::invalid(
                "config path",
                format!("unsupported extension {other:?} (expected toml or json)"),
            )),
        }
    }

    /// Reject values the filter cannot work with.
    pub fn validate(&self) -> Result<()> {
        let g = &self.gamepad;
        deadzone::validate_stick_dead_zone(g.left_stick_dead_zone)?;
        deadzone::validate_stick_dead_zone(g.right_stick_dead_zone)?;
        deadzone::validate_trigger_threshold(g.trigger_threshold)?;
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| InputError::invalid("config", format!("cannot serialize: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = InputConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, InputConfig::default());
        assert_eq!(cfg.gamepad.filter().unwrap(), DeadZoneFilter::default());
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let cfg = InputConfig::from_toml_str(
            r#"
            [gamepad]
            trigger_threshold = 10
            stick_mode = "linear"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.gamepad.trigger_threshold, 10);
        assert_eq!(cfg.gamepad.stick_mode, DeadZoneMode::Linear);
        assert_eq!(cfg.gamepad.left_stick_dead_zone, LEFT_STICK_DEAD_ZONE);
    }

    #[test]
    fn json_is_accepted() {
        let cfg = InputConfig::from_json_str(r#"{"gamepad":{"stick_mode":"none"}}"#).unwrap();
        assert_eq!(cfg.gamepad.stick_mode, DeadZoneMode::None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = InputConfig::from_toml_str("[gamepad]\ntrigger_threshold = 255\n").unwrap_err();
        assert!(err.is_invalid_argument());

        let err = InputConfig::from_toml_str("[gamepad]\nleft_stick_dead_zone = -5\n").unwrap_err();
        assert!(err.is_invalid_argument());

        // does not fit in i16
        let err = InputConfig::from_toml_str("[gamepad]\nright_stick_dead_zone = 40000\n").unwrap_err();
        assert!(matches!(err, InputError::Config(_)));

        let err = InputConfig::from_toml_str("[gamepad]\nstick_mode = \"square\"\n").unwrap_err();
        assert!(matches!(err, InputError::Config(_)));
    }

    #[test]
    fn toml_round_trip() {
        let mut cfg = InputConfig::default();
        cfg.gamepad.stick_mode = DeadZoneMode::Linear;
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(InputConfig::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = std::env::temp_dir().join(format!("padstate-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let toml_path = dir.join("input.toml");
        std::fs::write(&toml_path, "[gamepad]\ntrigger_threshold = 12\n").unwrap();
        assert_eq!(InputConfig::load(&toml_path).unwrap().gamepad.trigger_threshold, 12);

        let json_path = dir.join("input.json");
        std::fs::write(&json_path, r#"{"gamepad":{"trigger_threshold":13}}"#).unwrap();
        assert_eq!(InputConfig::load(&json_path).unwrap().gamepad.trigger_threshold, 13);

        let ini_path = dir.join("input.ini");
        std::fs::write(&ini_path, "").unwrap();
        assert!(InputConfig::load(&ini_path).unwrap_err().is_invalid_argument());

        assert!(matches!(InputConfig::load(dir.join("missing.toml")), Err(InputError::Io(_))));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
