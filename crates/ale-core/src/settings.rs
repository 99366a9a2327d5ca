//! Environment settings.
//!
//! Settings are a typed struct. String keys exist only for the boundary
//! layer; they map onto the fields below and are validated when a ROM is
//! loaded, which is also when they take effect.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{AleError, Result};
use crate::palette::{DisplayFormat, PaletteType};
use crate::session::DEFAULT_NOOP_RESET_STEPS;

/// Console reset frames used when an episode restarts.
pub const DEFAULT_SYSTEM_RESET_STEPS: u32 = 4;

/// Every key understood by [`Settings`], in declaration order.
pub const KEYS: [&str; 10] = [
    "random_seed",
    "repeat_action_probability",
    "max_num_frames_per_episode",
    "system_reset_steps",
    "noop_reset_steps",
    "truncate_on_loss_of_life",
    "palette",
    "display_format",
    "user_palette_file",
    "record_screen_dir",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Seed for the environment RNG, applied at every ROM load.
    pub random_seed: i64,
    /// Chance that the previous action is repeated instead of the requested one.
    pub repeat_action_probability: f32,
    /// Episode length cap in frames. Zero means unlimited.
    pub max_num_frames_per_episode: i64,
    pub system_reset_steps: u32,
    pub noop_reset_steps: u32,
    /// End the episode as soon as a life is lost.
    pub truncate_on_loss_of_life: bool,
    pub palette: PaletteType,
    pub display_format: DisplayFormat,
    /// Palette file loaded into the user slot.
    pub user_palette_file: Option<PathBuf>,
    /// Export every frame as a PNG into this directory.
    pub record_screen_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            random_seed: 0,
            repeat_action_probability: 0.0,
            max_num_frames_per_episode: 0,
            system_reset_steps: DEFAULT_SYSTEM_RESET_STEPS,
            noop_reset_steps: DEFAULT_NOOP_RESET_STEPS,
            truncate_on_loss_of_life: false,
            palette: PaletteType::Standard,
            display_format: DisplayFormat::Ntsc,
            user_palette_file: None,
            record_screen_dir: None,
        }
    }
}

impl Settings {
    /// Check cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.repeat_action_probability) {
            return Err(AleError::setting(
                "repeat_action_probability",
                format!("{} is outside [0, 1]", self.repeat_action_probability),
            ));
        }
        if self.max_num_frames_per_episode < 0 {
            return Err(AleError::setting(
                "max_num_frames_per_episode",
                "must not be negative",
            ));
        }
        if self.palette == PaletteType::User && self.user_palette_file.is_none() {
            return Err(AleError::setting(
                "palette",
                "`user` requires user_palette_file",
            ));
        }
        Ok(())
    }

    /// RNG seed as the generator expects it.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.random_seed as u64
    }

    /// Episode cap, `None` when unlimited.
    #[must_use]
    pub fn frame_limit(&self) -> Option<u64> {
        u64::try_from(self.max_num_frames_per_episode)
            .ok()
            .filter(|&n| n > 0)
    }

    /// Any setting, rendered as text.
    pub fn get_string(&self, key: &str) -> Result<String> {
        Ok(match key {
            "random_seed" => self.random_seed.to_string(),
            "repeat_action_probability" => self.repeat_action_probability.to_string(),
            "max_num_frames_per_episode" => self.max_num_frames_per_episode.to_string(),
            "system_reset_steps" => self.system_reset_steps.to_string(),
            "noop_reset_steps" => self.noop_reset_steps.to_string(),
            "truncate_on_loss_of_life" => self.truncate_on_loss_of_life.to_string(),
            "palette" => self.palette.to_string(),
            "display_format" => self.display_format.to_string(),
            "user_palette_file" => path_string(self.user_palette_file.as_ref()),
            "record_screen_dir" => path_string(self.record_screen_dir.as_ref()),
            _ => return Err(unknown(key)),
        })
    }

    pub fn get_int(&self, key: &str) -> Result<i64> {
        match key {
            "random_seed" => Ok(self.random_seed),
            "max_num_frames_per_episode" => Ok(self.max_num_frames_per_episode),
            "system_reset_steps" => Ok(i64::from(self.system_reset_steps)),
            "noop_reset_steps" => Ok(i64::from(self.noop_reset_steps)),
            _ => Err(wrong_type(key, "int")),
        }
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        match key {
            "truncate_on_loss_of_life" => Ok(self.truncate_on_loss_of_life),
            _ => Err(wrong_type(key, "bool")),
        }
    }

    pub fn get_float(&self, key: &str) -> Result<f32> {
        match key {
            "repeat_action_probability" => Ok(self.repeat_action_probability),
            _ => Err(wrong_type(key, "float")),
        }
    }

    /// Set any setting from text. An empty path clears a path setting.
    pub fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "random_seed" => self.random_seed = parse(key, value)?,
            "repeat_action_probability" => self.repeat_action_probability = parse(key, value)?,
            "max_num_frames_per_episode" => self.max_num_frames_per_episode = parse(key, value)?,
            "system_reset_steps" => self.system_reset_steps = parse(key, value)?,
            "noop_reset_steps" => self.noop_reset_steps = parse(key, value)?,
            "truncate_on_loss_of_life" => self.truncate_on_loss_of_life = parse(key, value)?,
            "palette" => self.palette = parse(key, value)?,
            "display_format" => self.display_format = parse(key, value)?,
            "user_palette_file" => self.user_palette_file = path_value(value),
            "record_screen_dir" => self.record_screen_dir = path_value(value),
            _ => return Err(unknown(key)),
        }
        Ok(())
    }

    pub fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        match key {
            "random_seed" => self.random_seed = value,
            "max_num_frames_per_episode" => self.max_num_frames_per_episode = value,
            "system_reset_steps" => self.system_reset_steps = non_negative(key, value)?,
            "noop_reset_steps" => self.noop_reset_steps = non_negative(key, value)?,
            _ => return Err(wrong_type(key, "int")),
        }
        Ok(())
    }

    pub fn set_bool(&mut self, key: &str, value: bool) -> Result<()> {
        match key {
            "truncate_on_loss_of_life" => self.truncate_on_loss_of_life = value,
            _ => return Err(wrong_type(key, "bool")),
        }
        Ok(())
    }

    pub fn set_float(&mut self, key: &str, value: f32) -> Result<()> {
        match key {
            "repeat_action_probability" => self.repeat_action_probability = value,
            _ => return Err(wrong_type(key, "float")),
        }
        Ok(())
    }
}

fn parse<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AleError::setting(key, format!("`{value}`: {e}")))
}

fn non_negative(key: &str, value: i64) -> Result<u32> {
    u32::try_from(value).map_err(|_| AleError::setting(key, format!("{value} is out of range")))
}

fn path_value(value: &str) -> Option<PathBuf> {
    (!value.is_empty()).then(|| PathBuf::from(value))
}

fn path_string(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

fn unknown(key: &str) -> AleError {
    AleError::setting(key, "unknown key")
}

fn wrong_type(key: &str, kind: &str) -> AleError {
    if KEYS.contains(&key) {
        AleError::setting(key, format!("not a {kind} setting"))
    } else {
        unknown(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.get_int("random_seed").expect("valid"), 0);
        assert_eq!(settings.get_int("system_reset_steps").expect("valid"), 4);
        assert_eq!(settings.get_int("noop_reset_steps").expect("valid"), 60);
        assert_eq!(settings.get_string("palette").expect("valid"), "standard");
        assert_eq!(settings.get_string("display_format").expect("valid"), "NTSC");
        assert_eq!(settings.get_string("record_screen_dir").expect("valid"), "");
        assert_eq!(settings.frame_limit(), None);
        settings.validate().expect("valid");
    }

    #[test]
    fn every_key_round_trips_as_text() {
        let settings = Settings::default();
        for key in KEYS {
            let text = settings.get_string(key).expect("valid");
            let mut copy = Settings::default();
            copy.set_string(key, &text).expect("valid");
            assert_eq!(copy, settings, "{key}");
        }
    }

    #[test]
    fn typed_access_checks_kind() {
        let mut settings = Settings::default();
        settings.set_float("repeat_action_probability", 0.25).expect("valid");
        assert!((settings.get_float("repeat_action_probability").expect("valid") - 0.25).abs() < 1e-6);
        assert!(matches!(
            settings.set_int("palette", 1),
            Err(AleError::Setting { .. })
        ));
        assert!(matches!(
            settings.get_bool("no_such_key"),
            Err(AleError::Setting { reason, .. }) if reason == "unknown key"
        ));
        assert!(settings.set_int("noop_reset_steps", -1).is_err());
    }

    #[test]
    fn unparsable_values_are_rejected() {
        let mut settings = Settings::default();
        assert!(settings.set_string("random_seed", "twelve").is_err());
        assert!(settings.set_string("display_format", "VGA").is_err());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn validation() {
        let mut settings = Settings::default();
        settings.repeat_action_probability = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.palette = PaletteType::User;
        assert!(settings.validate().is_err());
        settings.user_palette_file = Some(PathBuf::from("palette.bin"));
        settings.validate().expect("valid");

        let mut settings = Settings::default();
        settings.max_num_frames_per_episode = 100;
        assert_eq!(settings.frame_limit(), Some(100));
    }
}
