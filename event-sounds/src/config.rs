use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::errors::{Result, SoundEventError};
use crate::events::SoundEventId;
use crate::playback::CachePolicy;

/// Default bound on records waiting for the next drain.
pub const DEFAULT_MAX_PENDING_RECORDS: usize = 1024;

/// Engine configuration.
///
/// Only the final play call is gated by these settings. Records are still
/// coalesced and dispatched, so per-object and menu state stay consistent
/// when sounds are toggled back on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Window, dialog, menu and tooltip sounds.
    pub enable_event_sounds: bool,
    /// Button, link, toggle, menu-click and selection sounds.
    pub enable_input_feedback_sounds: bool,
    pub cache_policy: CachePolicy,
    pub max_pending_records: usize,
    /// Individual sounds that are never played.
    pub muted_events: HashSet<SoundEventId>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            enable_event_sounds: true,
            enable_input_feedback_sounds: true,
            cache_policy: CachePolicy::Permanent,
            max_pending_records: DEFAULT_MAX_PENDING_RECORDS,
            muted_events: HashSet::new(),
        }
    }
}

impl EngineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_pending_records == 0 {
            return Err(SoundEventError::Config(
                "max_pending_records must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether a dispatched sound should reach the playback port.
    pub fn should_play(&self, id: SoundEventId) -> bool {
        if self.muted_events.contains(&id) {
            return false;
        }
        if id.is_input_feedback() {
            self.enable_input_feedback_sounds
        } else {
            self.enable_event_sounds
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_plays_everything() {
        let config = EngineConfig::default();
        assert!(config.should_play(SoundEventId::WindowNew));
        assert!(config.should_play(SoundEventId::ButtonPressed));
        assert_eq!(config.max_pending_records, DEFAULT_MAX_PENDING_RECORDS);
    }

    #[test]
    fn test_feedback_switch_only_affects_feedback_sounds() {
        let config = EngineConfig {
            enable_input_feedback_sounds: false,
            ..Default::default()
        };
        assert!(!config.should_play(SoundEventId::MenuClick));
        assert!(!config.should_play(SoundEventId::ItemSelected));
        assert!(config.should_play(SoundEventId::MenuPopup));
    }

    #[test]
    fn test_muted_events() {
        let config = EngineConfig::from_json_str(r#"{"muted_events": ["window-close"]}"#).unwrap();
        assert!(!config.should_play(SoundEventId::WindowClose));
        assert!(config.should_play(SoundEventId::WindowNew));
        assert!(config.enable_event_sounds);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let err = EngineConfig::from_json_str(r#"{"max_pending_records": 0}"#).unwrap_err();
        assert!(matches!(err, SoundEventError::Config(_)));
    }

    #[test]
    fn test_unknown_sound_name_is_a_json_error() {
        let err = EngineConfig::from_json_str(r#"{"muted_events": ["bell"]}"#).unwrap_err();
        assert!(matches!(err, SoundEventError::Json(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"enable_event_sounds": false, "cache_policy": "none", "max_pending_records": 16}}"#
        )
        .unwrap();

        let config = EngineConfig::load(file.path()).unwrap();
        assert!(!config.enable_event_sounds);
        assert!(config.enable_input_feedback_sounds);
        assert_eq!(config.cache_policy, CachePolicy::None);
        assert_eq!(config.max_pending_records, 16);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SoundEventError::Io(_)));
    }
}
