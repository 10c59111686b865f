// WandWatch — UI Task
//
// Owns the OLED display, haptic motor and button.  Polls the button at
// ~100 Hz, handles events from the wand task, and steps whichever demo is on
// screen.

use std::sync::mpsc::{Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, Input, Output, PinDriver};

use wandwatch::config::*;
use wandwatch::demo::{RegressionDemo, SineSweep, TouchAction};
use wandwatch::events::{DemoMode, UiEvent};
use wandwatch::plot::{self, ScatterPlot, SineTrace};

use crate::drivers::display::OledDisplay;
use crate::drivers::haptic::HapticDriver;
use crate::drivers::SharedBus;
use crate::input::InputManager;

const REGRESSION_PROMPT: &str = "Touch to begin";
const WAND_PROMPT: &str = "Draw W, O or L";

pub fn ui_task(
    bus: SharedBus,
    button_pin: PinDriver<'static, AnyInputPin, Input>,
    haptic_pin: PinDriver<'static, AnyOutputPin, Output>,
    ui_rx: Receiver<UiEvent>,
    ui_tx: Sender<UiEvent>,
) {
    log::info!("UI task started");

    let mut display = OledDisplay::new(bus);
    let mut haptic = HapticDriver::new(haptic_pin);
    let mut input = InputManager::new(button_pin, ui_tx);

    let area = plot::plot_area(SCREEN_WIDTH, SCREEN_HEIGHT);
    let mut mode = DemoMode::default();
    let mut sweep = SineSweep::default();
    let mut trace = SineTrace::new(area, SINE_X_STEP);
    let mut regression = RegressionDemo::new();
    let scatter = ScatterPlot::new(area);
    let mut banner_until: Option<Instant> = None;

    if let Err(e) = enter_mode(&mut display, mode) {
        log::error!("Display error: {}", e);
    }

    let poll_interval = Duration::from_millis(UI_POLL_INTERVAL_MS);

    loop {
        // 1. Poll the button (handles debounce + press detection internally).
        input.update();

        // 2. Drain all pending UI events (non-blocking).
        while let Ok(event) = ui_rx.try_recv() {
            match event {
                UiEvent::NextDemo => {
                    haptic.tick();
                    mode = mode.next();
                    trace.restart();
                    regression = RegressionDemo::new();
                    banner_until = None;
                    log::info!("Switching to {} demo", mode.title());
                    if let Err(e) = enter_mode(&mut display, mode) {
                        log::error!("Display error: {}", e);
                    }
                }

                UiEvent::Touch if mode == DemoMode::Regression => {
                    haptic.tick();
                    match regression.on_touch() {
                        TouchAction::Start => {
                            log::info!("Regression run started");
                            let _ = scatter.clear(&mut display);
                        }
                        TouchAction::Reset => {
                            let _ = scatter.clear(&mut display);
                            let _ = plot::draw_centered_text(&mut display, REGRESSION_PROMPT);
                        }
                        TouchAction::Ignored => {}
                    }
                    flush(&mut display);
                }

                UiEvent::Touch => log::debug!("Touch ignored in {} demo", mode.title()),

                UiEvent::Gesture(result) if mode == DemoMode::Wand => {
                    let text = format!(
                        "{} {:.0}%",
                        result.gesture.display_name(),
                        result.confidence * 100.0
                    );
                    if let Err(e) = display.show_message(mode.title(), &text) {
                        log::error!("Display error: {}", e);
                    }
                    haptic.gesture(result.gesture);
                    banner_until = Some(Instant::now() + Duration::from_millis(GESTURE_BANNER_MS));
                }

                UiEvent::Gesture(result) => {
                    log::debug!("Gesture {:?} outside the wand demo", result.gesture);
                }
            }
        }

        // 3. Step the active demo.
        match mode {
            DemoMode::Sine => match sweep.step() {
                Ok((_, y)) => {
                    let _ = trace.plot(&mut display, y);
                    flush(&mut display);
                }
                Err(e) => log::error!("Sine inference failed: {}", e),
            },

            DemoMode::Regression => match regression.run() {
                Ok(points) if !points.is_empty() => {
                    for (x, y) in points {
                        let _ = scatter.plot(&mut display, x, y);
                    }
                    flush(&mut display);
                }
                Ok(_) => {}
                Err(e) => log::error!("Regression inference failed: {}", e),
            },

            DemoMode::Wand => {
                if banner_until.is_some_and(|until| Instant::now() >= until) {
                    banner_until = None;
                    if let Err(e) = display.show_message(mode.title(), WAND_PROMPT) {
                        log::error!("Display error: {}", e);
                    }
                }
            }
        }

        thread::sleep(poll_interval);
    }
}

fn enter_mode(display: &mut OledDisplay, mode: DemoMode) -> anyhow::Result<()> {
    match mode {
        DemoMode::Sine => display.show_title(mode.title()),
        DemoMode::Regression => display.show_message(mode.title(), REGRESSION_PROMPT),
        DemoMode::Wand => display.show_message(mode.title(), WAND_PROMPT),
    }
}

fn flush(display: &mut OledDisplay) {
    if let Err(e) = display.flush() {
        log::error!("Display error: {}", e);
    }
}
