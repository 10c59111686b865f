// WandWatch — Button Input Manager
//
// The board's single button stands in for the demos' touch screen: a short
// press is a touch, a long press moves to the next demo.  Debounced, and
// designed to be polled at ~100 Hz from the UI task.

use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use esp_idf_hal::gpio::{AnyInputPin, Input, PinDriver};

use wandwatch::config::*;
use wandwatch::events::UiEvent;

pub struct InputManager<'d> {
    pin: PinDriver<'d, AnyInputPin, Input>,
    ui_tx: Sender<UiEvent>,

    // Debounce state
    last_raw: bool,
    last_change: Instant,

    // Set while the button is held; cleared once a long press has fired so
    // releasing afterwards is not also a touch.
    press_start: Option<Instant>,
    long_press_sent: bool,
}

impl<'d> InputManager<'d> {
    pub fn new(pin: PinDriver<'d, AnyInputPin, Input>, ui_tx: Sender<UiEvent>) -> Self {
        Self {
            pin,
            ui_tx,
            last_raw: true, // pull-up → idle HIGH
            last_change: Instant::now(),
            press_start: None,
            long_press_sent: false,
        }
    }

    /// Call every ~10 ms from the UI task loop.
    pub fn update(&mut self) {
        let released = self.pin.is_high(); // active LOW
        let now = Instant::now();

        if released != self.last_raw {
            self.last_raw = released;
            self.last_change = now;
        }
        if now.duration_since(self.last_change) < Duration::from_millis(DEBOUNCE_MS) {
            return;
        }

        match (self.press_start, released) {
            (None, false) => {
                self.press_start = Some(now);
                self.long_press_sent = false;
            }
            (Some(start), false) => {
                // Fire while still held so the demo switches without waiting
                // for release.
                let held = now.duration_since(start);
                if !self.long_press_sent && held >= Duration::from_millis(LONG_PRESS_MS) {
                    self.long_press_sent = true;
                    let _ = self.ui_tx.send(UiEvent::NextDemo);
                }
            }
            (Some(_), true) => {
                self.press_start = None;
                if !self.long_press_sent {
                    let _ = self.ui_tx.send(UiEvent::Touch);
                }
            }
            (None, true) => {}
        }
    }
}
