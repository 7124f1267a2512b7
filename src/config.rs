use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const FIRMWARE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEBOUNCE: Duration = Duration::from_millis(10);
pub const BLINK_PERIOD: Duration = Duration::from_millis(100);
/// Hold before the play command and after the busy line clears.
pub const LEAD_TIME: Duration = Duration::from_millis(1000);
/// Older announcements are not replayed by the button.
pub const REPLAY_WINDOW: Duration = Duration::from_secs(5 * 60);

pub const DEVICE_VOLUME_MAX: u8 = 30;
pub const DEFAULT_VOLUME: i32 = 70;

/// Maps remote device identifiers to clips on the player's card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipTable {
    /// Identifier of the first entry in `clips`.
    pub device_base: i32,
    pub clips: Vec<u16>,
    pub error_clip: u16,
    pub nothing_announced_clip: u16,
    pub min_clip: i32,
    pub max_clip: i32,
    pub low_test_clip: u16,
    pub high_test_clip: u16,
}

impl Default for ClipTable {
    fn default() -> Self {
        Self {
            device_base: 10,
            clips: (10..=19).collect(),
            error_clip: 3,
            nothing_announced_clip: 4,
            min_clip: 1,
            max_clip: 256,
            low_test_clip: 1,
            high_test_clip: 2,
        }
    }
}

impl ClipTable {
    /// Clip for a device identifier; `None` when it falls outside the table.
    pub fn lookup(&self, device: i32) -> Option<u16> {
        let index = device.checked_sub(self.device_base)?;
        usize::try_from(index)
            .ok()
            .and_then(|i| self.clips.get(i).copied())
    }

    pub fn clamp_clip(&self, requested: i32) -> u16 {
        if requested < self.min_clip {
            self.low_test_clip
        } else if requested > self.max_clip {
            self.high_test_clip
        } else {
            // min_clip..=max_clip fits the player's index range
            u16::try_from(requested).unwrap_or(self.high_test_clip)
        }
    }
}

/// Grid coordinates standing in for the board's button and LEDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelLayout {
    pub button: (i32, i32),
    pub ready_led: (i32, i32),
    pub link_led: (i32, i32),
    pub activity_led: (i32, i32),
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            button: (0, 0),
            ready_led: (0, 7),
            link_led: (1, 7),
            activity_led: (2, 7),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub clips: ClipTable,
    pub panel: PanelLayout,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => confy::load_path(path)
                .with_context(|| format!("loading settings from {}", path.display())),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_inside_table() {
        let table = ClipTable::default();
        assert_eq!(table.lookup(10), Some(10));
        assert_eq!(table.lookup(19), Some(19));
    }

    #[test]
    fn lookup_outside_table() {
        let table = ClipTable::default();
        assert_eq!(table.lookup(9), None);
        assert_eq!(table.lookup(20), None);
        assert_eq!(table.lookup(0), None);
        assert_eq!(table.lookup(i32::MIN), None);
    }

    #[test]
    fn clip_clamping() {
        let table = ClipTable::default();
        assert_eq!(table.clamp_clip(0), table.low_test_clip);
        assert_eq!(table.clamp_clip(-5), table.low_test_clip);
        assert_eq!(table.clamp_clip(257), table.high_test_clip);
        assert_eq!(table.clamp_clip(256), 256);
        assert_eq!(table.clamp_clip(42), 42);
    }

    #[test]
    fn settings_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yml");
        // first load writes the defaults
        let settings = Settings::load(Some(path.as_path())).unwrap();
        assert_eq!(settings, Settings::default());
        assert!(path.exists());
    }
}
