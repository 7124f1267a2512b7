use crate::config::BLINK_PERIOD;
use crate::io::{DigitalIo, Pin};
use std::time::Instant;

/// Flashes the activity LED while enabled.
#[derive(Debug)]
pub struct Blinker {
    enabled: bool,
    lit: bool,
    last_toggle: Option<Instant>,
}

impl Blinker {
    pub fn new() -> Self {
        Self {
            enabled: false,
            lit: false,
            last_toggle: None,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    #[cfg(test)]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn poll(&mut self, io: &mut impl DigitalIo, now: Instant) {
        if !self.enabled {
            if self.lit || self.last_toggle.is_some() {
                self.lit = false;
                self.last_toggle = None;
                io.write(Pin::ActivityLed, false);
            }
            return;
        }

        let due = match self.last_toggle {
            Some(at) => now.saturating_duration_since(at) >= BLINK_PERIOD,
            None => true,
        };
        if due {
            self.lit = !self.lit;
            self.last_toggle = Some(now);
            io.write(Pin::ActivityLed, self.lit);
        }
    }
}

impl Default for Blinker {
    fn default() -> Self {
        Self::new()
    }
}
