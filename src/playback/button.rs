use crate::config::DEBOUNCE;
use crate::io::{DigitalIo, Pin};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ButtonState {
    Released,
    PressConfirming(Instant),
    Pressed,
    ReleaseConfirming(Instant),
}

/// Turns a bouncing switch into one event per press.
#[derive(Debug)]
pub struct ButtonMonitor {
    state: ButtonState,
}

impl ButtonMonitor {
    pub fn new() -> Self {
        Self {
            state: ButtonState::Released,
        }
    }

    /// Returns true exactly once per confirmed press.
    pub fn poll(&mut self, io: &mut impl DigitalIo, now: Instant) -> bool {
        let asserted = io.read(Pin::Button);
        match (self.state, asserted) {
            (ButtonState::Released, true) => {
                self.state = ButtonState::PressConfirming(now);
                false
            }
            (ButtonState::Released, false) => false,
            (ButtonState::PressConfirming(_), false) => {
                self.state = ButtonState::Released;
                false
            }
            (ButtonState::PressConfirming(since), true) => {
                if now.saturating_duration_since(since) >= DEBOUNCE {
                    self.state = ButtonState::Pressed;
                    tracing::debug!("button press confirmed");
                    true
                } else {
                    false
                }
            }
            (ButtonState::Pressed, true) => false,
            (ButtonState::Pressed, false) => {
                self.state = ButtonState::ReleaseConfirming(now);
                false
            }
            // bounce while releasing, still held
            (ButtonState::ReleaseConfirming(_), true) => {
                self.state = ButtonState::Pressed;
                false
            }
            (ButtonState::ReleaseConfirming(since), false) => {
                if now.saturating_duration_since(since) >= DEBOUNCE {
                    self.state = ButtonState::Released;
                }
                false
            }
        }
    }
}

impl Default for ButtonMonitor {
    fn default() -> Self {
        Self::new()
    }
}
