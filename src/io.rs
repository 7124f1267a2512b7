/// Digital lines the controller touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pin {
    Button,
    /// Active low: the playback device pulls it low while playing.
    Busy,
    ReadyLed,
    LinkLed,
    ActivityLed,
}

pub trait DigitalIo {
    fn read(&mut self, pin: Pin) -> bool;
    fn write(&mut self, pin: Pin, level: bool);
}

/// True while the playback device reports active playback.
pub fn device_busy(io: &mut impl DigitalIo) -> bool {
    !io.read(Pin::Busy)
}

#[cfg(test)]
pub(crate) mod fake {
    use super::{DigitalIo, Pin};
    use std::collections::HashMap;

    /// Scripted inputs, recorded outputs.
    #[derive(Debug, Default)]
    pub(crate) struct FakeIo {
        pub(crate) levels: HashMap<Pin, bool>,
        pub(crate) writes: Vec<(Pin, bool)>,
    }

    impl FakeIo {
        pub(crate) fn new() -> Self {
            let mut io = Self::default();
            // busy line idles high
            io.levels.insert(Pin::Busy, true);
            io
        }

        pub(crate) fn set(&mut self, pin: Pin, level: bool) {
            self.levels.insert(pin, level);
        }

        pub(crate) fn level(&self, pin: Pin) -> bool {
            self.levels.get(&pin).copied().unwrap_or(false)
        }
    }

    impl crate::device::panel::Panel for FakeIo {
        fn pump(&mut self) {}
    }

    impl DigitalIo for FakeIo {
        fn read(&mut self, pin: Pin) -> bool {
            self.level(pin)
        }

        fn write(&mut self, pin: Pin, level: bool) {
            self.levels.insert(pin, level);
            self.writes.push((pin, level));
        }
    }
}
