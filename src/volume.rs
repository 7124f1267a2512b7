use crate::config::{DEFAULT_VOLUME, DEVICE_VOLUME_MAX};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Relative volume, 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume(u8);

impl Volume {
    pub fn clamped(value: i32) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    /// Values outside 0..=100 mean the store was never written.
    pub fn from_stored(value: Option<i32>) -> Self {
        match value {
            Some(v) if (0..=100).contains(&v) => Self(v as u8),
            _ => Self(DEFAULT_VOLUME as u8),
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Level in the player's native 0..=30 scale.
    pub fn device_level(self) -> u8 {
        (u16::from(DEVICE_VOLUME_MAX) * u16::from(self.0) / 100) as u8
    }
}

pub trait VolumeStore {
    fn load(&self) -> Option<i32>;
    fn save(&mut self, volume: i32);
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredState {
    volume: i32,
}

impl Default for StoredState {
    fn default() -> Self {
        // erased storage reads back out of range
        Self { volume: -1 }
    }
}

/// Keeps the volume in a small YAML file across restarts.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl VolumeStore for FileStore {
    fn load(&self) -> Option<i32> {
        match confy::load_path::<StoredState>(&self.path) {
            Ok(state) => Some(state.volume),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unable to read stored volume");
                None
            }
        }
    }

    fn save(&mut self, volume: i32) {
        if let Err(e) = confy::store_path(&self.path, StoredState { volume }) {
            tracing::warn!(path = %self.path.display(), error = %e, "unable to persist volume");
        }
    }
}

/// Clamps, stores and persists the relative volume.
#[derive(Debug)]
pub struct VolumeSetter<S> {
    store: S,
    volume: Volume,
}

impl<S: VolumeStore> VolumeSetter<S> {
    pub fn load(store: S) -> Self {
        let volume = Volume::from_stored(store.load());
        tracing::info!(volume = volume.get(), "volume loaded");
        Self { store, volume }
    }

    pub fn set(&mut self, requested: i32) -> Volume {
        self.volume = Volume::clamped(requested);
        self.store.save(i32::from(self.volume.get()));
        tracing::info!(requested, volume = self.volume.get(), "volume set");
        self.volume
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }
}
