use crate::message::{DeviceCommand, Outbound};
use std::sync::mpsc::Sender;

/// The MP3 module as far as the controller cares.
pub trait PlaybackDevice {
    /// `level` is in the module's 0..=30 scale.
    fn set_volume(&mut self, level: u8);
    fn play_clip(&mut self, clip: u16);
}

/// Forwards commands to the playback bridge over OSC.
#[derive(Debug, Clone)]
pub struct BridgePlayer {
    tx: Sender<Outbound>,
}

impl BridgePlayer {
    pub fn new(tx: Sender<Outbound>) -> Self {
        Self { tx }
    }

    fn send(&self, cmd: DeviceCommand) {
        if self.tx.send(Outbound::Device(cmd)).is_err() {
            tracing::error!("playback bridge sender has stopped");
        }
    }
}

impl PlaybackDevice for BridgePlayer {
    fn set_volume(&mut self, level: u8) {
        self.send(DeviceCommand::SetVolume(level));
    }

    fn play_clip(&mut self, clip: u16) {
        self.send(DeviceCommand::Play(clip));
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    #[test]
    fn bridge_forwards_commands_in_order() {
        let (tx, rx) = channel();
        let mut player = BridgePlayer::new(tx);
        player.set_volume(21);
        player.play_clip(12);
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![
                Outbound::Device(DeviceCommand::SetVolume(21)),
                Outbound::Device(DeviceCommand::Play(12)),
            ]
        );
    }
}
