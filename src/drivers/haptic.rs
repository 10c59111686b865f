// WandWatch — Haptic Motor Driver
//
// GPIO-driven vibration motor: a tick for touches, a pulse train per gesture.

use std::thread;
use std::time::Duration;

use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};

use wandwatch::events::Gesture;

pub struct HapticDriver<'d> {
    pin: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> HapticDriver<'d> {
    pub fn new(pin: PinDriver<'d, AnyOutputPin, Output>) -> Self {
        Self { pin }
    }

    /// Short 40 ms tick acknowledging a touch.
    pub fn tick(&mut self) {
        self.buzz(Duration::from_millis(40));
    }

    /// One pulse for a wing, two for a ring, three for a slope.
    pub fn gesture(&mut self, gesture: Gesture) {
        let pulses = match gesture {
            Gesture::Wing => 1,
            Gesture::Ring => 2,
            Gesture::Slope => 3,
        };
        for i in 0..pulses {
            if i > 0 {
                thread::sleep(Duration::from_millis(80));
            }
            self.buzz(Duration::from_millis(120));
        }
    }

    /// Vibrate for a custom duration (blocks the calling thread).
    fn buzz(&mut self, duration: Duration) {
        let _ = self.pin.set_high();
        thread::sleep(duration);
        let _ = self.pin.set_low();
    }
}
