use crate::config::PanelLayout;
use crate::io::{DigitalIo, Pin};
use monome::{KeyDirection, Monome, MonomeEvent};

/// Front panel whose inputs must be pumped once per loop.
pub trait Panel: DigitalIo {
    fn pump(&mut self);
}

/// A monome grid wired up as the announcer's button and LEDs.
pub(crate) struct MonomePanel {
    monome: Monome,
    layout: PanelLayout,
    held: bool,
    leds: [bool; 3],
}

impl MonomePanel {
    pub fn new(mut monome: Monome, layout: PanelLayout) -> Self {
        monome.set_all_intensity(&vec![0; 128]);
        Self {
            monome,
            layout,
            held: false,
            leds: [false; 3],
        }
    }

    fn led(&self, pin: Pin) -> Option<(usize, (i32, i32))> {
        match pin {
            Pin::ReadyLed => Some((0, self.layout.ready_led)),
            Pin::LinkLed => Some((1, self.layout.link_led)),
            Pin::ActivityLed => Some((2, self.layout.activity_led)),
            Pin::Button | Pin::Busy => None,
        }
    }
}

impl Panel for MonomePanel {
    fn pump(&mut self) {
        while let Some(event) = self.monome.poll() {
            if let MonomeEvent::GridKey { x, y, direction } = event {
                if (x, y) == self.layout.button {
                    self.held = matches!(direction, KeyDirection::Down);
                }
            }
        }
    }
}

impl DigitalIo for MonomePanel {
    fn read(&mut self, pin: Pin) -> bool {
        match pin {
            Pin::Button => self.held,
            pin => self.led(pin).map_or(false, |(i, _)| self.leds[i]),
        }
    }

    fn write(&mut self, pin: Pin, level: bool) {
        if let Some((i, (x, y))) = self.led(pin) {
            if self.leds[i] != level {
                self.leds[i] = level;
                self.monome.set(x, y, level);
            }
        }
    }
}

/// Panel plus the busy line reported by the playback bridge.
pub struct Board<P> {
    panel: P,
    busy_level: bool,
}

impl<P: Panel> Board<P> {
    pub fn new(panel: P) -> Self {
        // released busy line floats high
        Self {
            panel,
            busy_level: true,
        }
    }

    pub fn set_device_busy(&mut self, playing: bool) {
        self.busy_level = !playing;
    }

    pub fn pump(&mut self) {
        self.panel.pump();
    }

    #[cfg(test)]
    pub(crate) fn panel(&self) -> &P {
        &self.panel
    }

    #[cfg(test)]
    pub(crate) fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }
}

impl<P: Panel> DigitalIo for Board<P> {
    fn read(&mut self, pin: Pin) -> bool {
        match pin {
            Pin::Busy => self.busy_level,
            pin => self.panel.read(pin),
        }
    }

    fn write(&mut self, pin: Pin, level: bool) {
        self.panel.write(pin, level);
    }
}
