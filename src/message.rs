/// Operations the remote side may invoke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    SetVolume(String),
    PlayClip(String),
    Trigger(String),
    Event(String),
    Status,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Remote(RemoteCommand),
    /// Busy line as reported by the playback bridge, true while playing.
    Busy(bool),
    LinkUp,
    LinkDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceCommand {
    SetVolume(u8),
    Play(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    pub version: String,
    pub volume: u8,
    pub clip: u16,
    pub last_event: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    Device(DeviceCommand),
    Reply { op: &'static str, status: i32 },
    Status(Diagnostics),
}
