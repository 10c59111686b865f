// WandWatch — Magic Wand Gesture Pipeline
//
// Accelerometer readings in, gestures out.  Readings are converted to milli-g
// and decimated into a SampleWindow; each newly kept tuple on a ready window
// triggers one classification of the most recent model-sized window.  A
// confident gesture clears the history so the same stroke is not reported
// twice.

use crate::config::*;
use crate::error::{Result, SampleWindowError};
use crate::events::{GestureResult, SensorData};
use crate::model;
use crate::sample_window::{SampleWindow, SampleWindowConfig};

/// Running totals, logged periodically by the wand task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WandStats {
    pub raw_samples: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub inferences: u64,
    pub gestures: u64,
}

pub struct GesturePipeline {
    window: SampleWindow,
    input: Vec<f32>,
    stats: WandStats,
}

impl GesturePipeline {
    /// Pipeline with the gesture model's window shape.
    pub fn new() -> Result<Self> {
        Self::with_config(SampleWindowConfig::wand())
    }

    /// Pipeline over a custom window.  The rates and capacity may vary, but the
    /// window must hold exactly one gesture model input of accelerometer axes.
    pub fn with_config(config: SampleWindowConfig) -> Result<Self> {
        let input_len = model::Model::Gesture.input_len();
        if config.channel_count != WAND_CHANNELS
            || config.window_tuples.checked_mul(config.channel_count) != Some(input_len)
        {
            return Err(SampleWindowError::Configuration(format!(
                "gesture model needs {} tuples of {} channels, got {} of {}",
                input_len / WAND_CHANNELS,
                WAND_CHANNELS,
                config.window_tuples,
                config.channel_count
            )));
        }

        let window = SampleWindow::new(config)?;
        Ok(Self {
            input: vec![0.0; input_len],
            window,
            stats: WandStats::default(),
        })
    }

    pub fn stats(&self) -> WandStats {
        self.stats
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    /// Feed one raw IMU reading.  Returns a gesture when one was recognised.
    pub fn push(&mut self, data: &SensorData) -> Option<GestureResult> {
        self.stats.raw_samples += 1;

        let milli_g = data.accel().map(|g| g * WAND_MILLI_G_PER_G);
        match self.window.ingest(&milli_g) {
            Ok(true) => self.stats.accepted += 1,
            Ok(false) => return None,
            Err(e) => {
                self.stats.rejected += 1;
                log::warn!("Dropping accelerometer sample: {}", e);
                return None;
            }
        }

        if !self.window.is_ready() {
            return None;
        }

        if let Err(e) = self.window.read_window_into(&mut self.input) {
            log::warn!("Gesture window unavailable: {}", e);
            return None;
        }

        self.stats.inferences += 1;
        match model::classify_gesture(&self.input) {
            Ok(Some(result)) => {
                self.stats.gestures += 1;
                log::info!(
                    "Gesture: {} ({:.1}%)",
                    result.gesture.display_name(),
                    result.confidence * 100.0
                );
                self.window.reset();
                Some(result)
            }
            Ok(None) => None,
            Err(e) => {
                log::error!("Gesture inference failed: {}", e);
                self.window.reset();
                None
            }
        }
    }

    /// Discard history, e.g. when the wand demo is re-entered.
    pub fn reset(&mut self) {
        self.window.reset();
    }
}

#[cfg(all(test, not(feature = "tflm")))]
mod tests {
    use super::*;
    use crate::events::Gesture;

    fn still() -> SensorData {
        SensorData {
            az: 1.0,
            ..SensorData::default()
        }
    }

    fn shaking_x(t: usize) -> SensorData {
        SensorData {
            ax: if t % 40 < 20 { 1.5 } else { -1.5 },
            az: 1.0,
            ..SensorData::default()
        }
    }

    #[test]
    fn still_wand_never_fires() {
        let mut pipeline = GesturePipeline::new().unwrap();
        let factor = pipeline.window().decimation_factor();
        for _ in 0..(WAND_CAPACITY_TUPLES * factor * 2) {
            assert_eq!(pipeline.push(&still()), None);
        }
        let stats = pipeline.stats();
        assert_eq!(stats.accepted, (WAND_CAPACITY_TUPLES * 2) as u64);
        assert_eq!(stats.gestures, 0);
        assert!(stats.inferences > 0);
    }

    #[test]
    fn no_inference_before_window_is_full() {
        let mut pipeline = GesturePipeline::new().unwrap();
        let factor = pipeline.window().decimation_factor();
        for t in 0..(WAND_WINDOW_TUPLES * factor - 1) {
            assert_eq!(pipeline.push(&shaking_x(t)), None);
        }
        assert_eq!(pipeline.stats().inferences, 0);
        assert!(!pipeline.window().is_ready());
    }

    #[test]
    fn shake_is_recognised_once_then_history_resets() {
        let mut pipeline = GesturePipeline::new().unwrap();
        let factor = pipeline.window().decimation_factor();

        let mut found = Vec::new();
        for t in 0..(WAND_WINDOW_TUPLES * factor) {
            if let Some(result) = pipeline.push(&shaking_x(t)) {
                found.push((t, result.gesture));
            }
        }

        assert_eq!(found, vec![(WAND_WINDOW_TUPLES * factor - 1, Gesture::Wing)]);
        assert!(!pipeline.window().is_ready());
        assert_eq!(pipeline.window().write_cursor(), 0);
    }

    #[test]
    fn window_must_match_the_model_input() {
        for config in [
            SampleWindowConfig { window_tuples: 10, ..SampleWindowConfig::wand() },
            SampleWindowConfig { capacity_tuples: 50, window_tuples: 50, ..SampleWindowConfig::wand() },
            SampleWindowConfig { channel_count: 6, window_tuples: 64, ..SampleWindowConfig::wand() },
            SampleWindowConfig { window_tuples: usize::MAX, ..SampleWindowConfig::wand() },
        ] {
            assert!(
                matches!(
                    GesturePipeline::with_config(config),
                    Err(SampleWindowError::Configuration(_))
                ),
                "{config:?} should be rejected"
            );
        }
    }

    #[test]
    fn custom_rates_keep_the_model_window() {
        let config = SampleWindowConfig {
            raw_sample_rate_hz: 100.0,
            capacity_tuples: WAND_WINDOW_TUPLES,
            ..SampleWindowConfig::wand()
        };
        let mut pipeline = GesturePipeline::with_config(config).unwrap();
        let factor = pipeline.window().decimation_factor();
        assert_eq!(factor, 4);

        for _ in 0..(WAND_WINDOW_TUPLES * factor) {
            pipeline.push(&still());
        }
        assert!(pipeline.window().is_ready());
        assert_eq!(pipeline.stats().inferences, 1);
    }

    #[test]
    fn bad_readings_are_counted_and_dropped() {
        let mut pipeline = GesturePipeline::new().unwrap();
        let bad = SensorData {
            ax: f32::NAN,
            ..SensorData::default()
        };
        assert_eq!(pipeline.push(&bad), None);
        assert_eq!(pipeline.stats().rejected, 1);
        assert_eq!(pipeline.stats().accepted, 0);
    }
}
