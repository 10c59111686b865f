// WandWatch — Decimating Sample Window
//
// Fixed-capacity ring of multi-channel accelerometer tuples.  Raw readings
// arrive at the sensor rate; only every Nth one is kept so the ring fills at
// the rate the gesture model was trained on.  Once enough tuples have been
// kept since the last reset, the most recent window can be copied out, oldest
// tuple first, straight into a model input buffer.

use crate::config::*;
use crate::error::{Result, SampleWindowError};

/// Shape and rates of a [`SampleWindow`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleWindowConfig {
    /// Scalars per tuple (3 for x/y/z).
    pub channel_count: usize,
    /// Ring size, in tuples.
    pub capacity_tuples: usize,
    /// Native rate of the sensor driver.
    pub raw_sample_rate_hz: f32,
    /// Rate the consumer wants after decimation.
    pub target_sample_rate_hz: f32,
    /// Tuples that must be kept before the window becomes ready.
    pub window_tuples: usize,
}

impl SampleWindowConfig {
    /// Configuration used by the magic wand gesture model.
    pub fn wand() -> Self {
        Self {
            channel_count: WAND_CHANNELS,
            capacity_tuples: WAND_CAPACITY_TUPLES,
            raw_sample_rate_hz: WAND_RAW_SAMPLE_RATE_HZ,
            target_sample_rate_hz: WAND_TARGET_SAMPLE_RATE_HZ,
            window_tuples: WAND_WINDOW_TUPLES,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.channel_count == 0 {
            return Err(SampleWindowError::Configuration(
                "channel count must be positive".into(),
            ));
        }
        if self.capacity_tuples == 0 || self.window_tuples == 0 {
            return Err(SampleWindowError::Configuration(
                "capacity and window length must be positive".into(),
            ));
        }
        if self.capacity_tuples < self.window_tuples {
            return Err(SampleWindowError::Configuration(format!(
                "capacity of {} tuples cannot hold a window of {}",
                self.capacity_tuples, self.window_tuples
            )));
        }
        self.slot_count()?;
        validate_rates(self.raw_sample_rate_hz, self.target_sample_rate_hz)
    }

    /// Scalar slots needed to hold `capacity_tuples` tuples.
    pub fn slot_count(&self) -> Result<usize> {
        self.capacity_tuples
            .checked_mul(self.channel_count)
            .ok_or_else(|| {
                SampleWindowError::Configuration(format!(
                    "{} tuples of {} channels overflow the slot count",
                    self.capacity_tuples, self.channel_count
                ))
            })
    }

    /// Raw samples per kept sample: `round(raw / target)`, at least 1.
    pub fn decimation_factor(&self) -> usize {
        decimation_factor(self.raw_sample_rate_hz, self.target_sample_rate_hz)
    }
}

impl Default for SampleWindowConfig {
    fn default() -> Self {
        Self::wand()
    }
}

fn validate_rates(raw_hz: f32, target_hz: f32) -> Result<()> {
    let valid = |hz: f32| hz.is_finite() && hz > 0.0;
    if !valid(raw_hz) || !valid(target_hz) {
        return Err(SampleWindowError::Configuration(format!(
            "sample rates must be positive (raw {raw_hz} Hz, target {target_hz} Hz)"
        )));
    }
    Ok(())
}

fn decimation_factor(raw_hz: f32, target_hz: f32) -> usize {
    ((raw_hz / target_hz).round() as usize).max(1)
}

/// Circular buffer of decimated multi-channel samples.
///
/// Single-owner and non-blocking: the struct has no internal locking, so the
/// firmware keeps each instance inside exactly one task.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    storage: Box<[f32]>,
    channel_count: usize,
    window_tuples: usize,
    /// Next scalar slot to write; always a multiple of `channel_count`.
    write_cursor: usize,
    decimation_factor: usize,
    /// Raw samples seen since the last reset.
    raw_seen: u64,
    /// Tuples kept since the last reset, saturating at `window_tuples`.
    accepted: usize,
    ready: bool,
}

impl SampleWindow {
    /// Allocate a zeroed ring for `config`.
    pub fn new(config: SampleWindowConfig) -> Result<Self> {
        config.validate()?;

        let slots = config.slot_count()?;
        let window = Self {
            storage: vec![0.0; slots].into_boxed_slice(),
            channel_count: config.channel_count,
            window_tuples: config.window_tuples,
            write_cursor: 0,
            decimation_factor: config.decimation_factor(),
            raw_seen: 0,
            accepted: 0,
            ready: false,
        };

        log::debug!(
            "SampleWindow: {} x {} slots, keep 1 in {}, ready after {} tuples",
            config.capacity_tuples,
            config.channel_count,
            window.decimation_factor,
            window.window_tuples
        );
        Ok(window)
    }

    /// Drop all history: zero the ring and close the readiness gate.
    pub fn reset(&mut self) {
        self.storage.fill(0.0);
        self.write_cursor = 0;
        self.raw_seen = 0;
        self.accepted = 0;
        self.ready = false;
    }

    /// Recompute the decimation factor for new sensor/target rates.
    ///
    /// Stored history is kept.  Acceptance is a modulo test on the raw sample
    /// count, so a smaller factor takes effect at its next multiple instead of
    /// being overshot.
    pub fn set_rates(&mut self, raw_sample_rate_hz: f32, target_sample_rate_hz: f32) -> Result<()> {
        validate_rates(raw_sample_rate_hz, target_sample_rate_hz)?;
        self.decimation_factor = decimation_factor(raw_sample_rate_hz, target_sample_rate_hz);
        Ok(())
    }

    /// Offer one raw reading.
    ///
    /// Returns `Ok(true)` when the reading was kept, `Ok(false)` when the
    /// decimation stride discarded it.  A reading with the wrong number of
    /// channels, or a non-finite value, is rejected without touching any
    /// state, including the decimation count.
    pub fn ingest(&mut self, values: &[f32]) -> Result<bool> {
        if values.len() != self.channel_count {
            return Err(SampleWindowError::InvalidInput(format!(
                "expected {} channels, got {}",
                self.channel_count,
                values.len()
            )));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(SampleWindowError::InvalidInput(format!(
                "non-finite channel value {bad}"
            )));
        }

        self.raw_seen += 1;
        if self.raw_seen % self.decimation_factor as u64 != 0 {
            return Ok(false);
        }

        let slots = self.storage.len();
        for (i, &value) in values.iter().enumerate() {
            self.storage[(self.write_cursor + i) % slots] = value;
        }
        self.write_cursor = (self.write_cursor + self.channel_count) % slots;

        if self.accepted < self.window_tuples {
            self.accepted += 1;
        }
        if !self.ready && self.accepted == self.window_tuples {
            self.ready = true;
            log::debug!("SampleWindow ready after {} raw samples", self.raw_seen);
        }

        Ok(true)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Most recent `length_tuples` tuples, oldest first.
    pub fn read_window(&self, length_tuples: usize) -> Result<Vec<f32>> {
        let slots = length_tuples.saturating_mul(self.channel_count);
        self.check_window(length_tuples)?;

        let mut out = vec![0.0; slots];
        self.copy_recent(&mut out);
        Ok(out)
    }

    /// Fill `out` with the most recent `out.len() / channel_count` tuples,
    /// oldest first.  `out.len()` must be a whole number of tuples.
    pub fn read_window_into(&self, out: &mut [f32]) -> Result<()> {
        if out.len() % self.channel_count != 0 {
            return Err(SampleWindowError::InvalidInput(format!(
                "output of {} slots is not a whole number of {}-channel tuples",
                out.len(),
                self.channel_count
            )));
        }
        self.check_window(out.len() / self.channel_count)?;
        self.copy_recent(out);
        Ok(())
    }

    fn check_window(&self, length_tuples: usize) -> Result<()> {
        let capacity = self.capacity_tuples();
        if length_tuples > capacity {
            return Err(SampleWindowError::InvalidLength {
                requested: length_tuples,
                capacity,
            });
        }
        if !self.ready {
            return Err(SampleWindowError::NotReady);
        }
        Ok(())
    }

    // Walk back `out.len()` slots from the cursor, unwrapping into the ring.
    fn copy_recent(&self, out: &mut [f32]) {
        let slots = self.storage.len();
        let start = self.write_cursor + slots - out.len();
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = self.storage[(start + i) % slots];
        }
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    pub fn capacity_tuples(&self) -> usize {
        self.storage.len() / self.channel_count
    }

    pub fn window_tuples(&self) -> usize {
        self.window_tuples
    }

    pub fn decimation_factor(&self) -> usize {
        self.decimation_factor
    }

    /// Next scalar slot to be written.
    pub fn write_cursor(&self) -> usize {
        self.write_cursor
    }

    /// Tuples kept since the last reset, saturating at the window length.
    pub fn accepted_since_reset(&self) -> usize {
        self.accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(capacity: usize, raw_hz: f32, target_hz: f32, window: usize) -> SampleWindowConfig {
        SampleWindowConfig {
            channel_count: 3,
            capacity_tuples: capacity,
            raw_sample_rate_hz: raw_hz,
            target_sample_rate_hz: target_hz,
            window_tuples: window,
        }
    }

    #[test]
    fn test_decimation_factor_rounds() {
        assert_eq!(config(200, 119.0, 25.0, 100).decimation_factor(), 5);
        assert_eq!(config(200, 125.0, 25.0, 100).decimation_factor(), 5);
        assert_eq!(config(200, 62.5, 25.0, 100).decimation_factor(), 3);
        // Target faster than the sensor still keeps every sample.
        assert_eq!(config(200, 10.0, 25.0, 100).decimation_factor(), 1);
    }

    #[test]
    fn test_rejects_bad_configuration() {
        let cases = [
            config(50, 119.0, 25.0, 100),
            config(0, 119.0, 25.0, 0),
            config(200, 0.0, 25.0, 100),
            config(200, 119.0, -25.0, 100),
            config(200, f32::NAN, 25.0, 100),
            SampleWindowConfig { channel_count: 0, ..config(200, 119.0, 25.0, 100) },
            SampleWindowConfig { capacity_tuples: usize::MAX / 2, ..config(200, 119.0, 25.0, 100) },
        ];
        for case in cases {
            assert!(
                matches!(SampleWindow::new(case), Err(SampleWindowError::Configuration(_))),
                "{case:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_wand_config_is_valid() {
        let window = SampleWindow::new(SampleWindowConfig::wand()).unwrap();
        assert_eq!(window.decimation_factor(), 5);
        assert_eq!(window.capacity_tuples(), WAND_CAPACITY_TUPLES);
        assert!(!window.is_ready());
    }

    #[test]
    fn test_accepts_every_nth_sample() {
        let mut window = SampleWindow::new(config(10, 4.0, 1.0, 2)).unwrap();
        let kept: Vec<bool> = (0..12)
            .map(|i| window.ingest(&[i as f32; 3]).unwrap())
            .collect();
        let expected: Vec<bool> = (1..=12).map(|n| n % 4 == 0).collect();
        assert_eq!(kept, expected);
    }

    #[test]
    fn test_wrong_channel_count_leaves_state_alone() {
        let mut window = SampleWindow::new(config(4, 2.0, 1.0, 1)).unwrap();
        assert!(!window.ingest(&[1.0; 3]).unwrap());

        let err = window.ingest(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, SampleWindowError::InvalidInput(_)));
        assert!(window.ingest(&[1.0, f32::NAN, 3.0]).is_err());

        // The rejected calls did not count towards the stride.
        assert!(window.ingest(&[7.0; 3]).unwrap());
        assert_eq!(window.write_cursor(), 3);
    }

    #[test]
    fn test_ready_exactly_at_window_length() {
        let mut window = SampleWindow::new(config(8, 1.0, 1.0, 5)).unwrap();
        for i in 0..4 {
            window.ingest(&[i as f32; 3]).unwrap();
            assert!(!window.is_ready());
            assert_eq!(window.read_window(1), Err(SampleWindowError::NotReady));
        }
        window.ingest(&[4.0; 3]).unwrap();
        assert!(window.is_ready());

        // Stays ready as the ring keeps turning over.
        for i in 5..40 {
            window.ingest(&[i as f32; 3]).unwrap();
            assert!(window.is_ready());
        }
        assert_eq!(window.accepted_since_reset(), 5);
    }

    #[test]
    fn test_cursor_wraps_on_tuple_boundaries() {
        let mut window = SampleWindow::new(config(3, 1.0, 1.0, 1)).unwrap();
        let mut cursors = Vec::new();
        for i in 0..7 {
            window.ingest(&[i as f32; 3]).unwrap();
            cursors.push(window.write_cursor());
        }
        assert_eq!(cursors, vec![3, 6, 0, 3, 6, 0, 3]);
    }

    #[test]
    fn test_read_window_unwraps_ring() {
        let mut window = SampleWindow::new(config(4, 1.0, 1.0, 2)).unwrap();
        for i in 0..6 {
            window.ingest(&[i as f32, -(i as f32), 10.0 * i as f32]).unwrap();
        }
        assert_eq!(
            window.read_window(3).unwrap(),
            vec![3.0, -3.0, 30.0, 4.0, -4.0, 40.0, 5.0, -5.0, 50.0]
        );
        assert_eq!(window.read_window(4).unwrap()[..3], [2.0, -2.0, 20.0]);
        assert!(window.read_window(0).unwrap().is_empty());
    }

    #[test]
    fn test_read_window_into_matches_read_window() {
        let mut window = SampleWindow::new(config(5, 1.0, 1.0, 3)).unwrap();
        for i in 0..9 {
            window.ingest(&[i as f32; 3]).unwrap();
        }
        let mut out = [0.0f32; 9];
        window.read_window_into(&mut out).unwrap();
        assert_eq!(out.to_vec(), window.read_window(3).unwrap());

        let mut ragged = [0.0f32; 4];
        assert!(matches!(
            window.read_window_into(&mut ragged),
            Err(SampleWindowError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_read_window_longer_than_capacity() {
        let mut window = SampleWindow::new(config(4, 1.0, 1.0, 2)).unwrap();
        assert_eq!(
            window.read_window(5),
            Err(SampleWindowError::InvalidLength { requested: 5, capacity: 4 })
        );
        window.ingest(&[1.0; 3]).unwrap();
        window.ingest(&[2.0; 3]).unwrap();
        assert_eq!(
            window.read_window(5),
            Err(SampleWindowError::InvalidLength { requested: 5, capacity: 4 })
        );
    }

    #[test]
    fn test_reset_clears_history() {
        let mut window = SampleWindow::new(config(4, 2.0, 1.0, 2)).unwrap();
        for i in 0..9 {
            window.ingest(&[i as f32; 3]).unwrap();
        }
        assert!(window.is_ready());

        window.reset();
        assert!(!window.is_ready());
        assert_eq!(window.write_cursor(), 0);
        assert_eq!(window.accepted_since_reset(), 0);
        assert_eq!(window.read_window(2), Err(SampleWindowError::NotReady));

        // Stride restarts from the beginning too.
        assert!(!window.ingest(&[1.0; 3]).unwrap());
        assert!(window.ingest(&[2.0; 3]).unwrap());
        assert!(!window.ingest(&[3.0; 3]).unwrap());
        assert!(window.ingest(&[4.0; 3]).unwrap());
        assert_eq!(window.read_window(4).unwrap()[..6], [0.0; 6]);
        assert_eq!(window.read_window(2).unwrap(), vec![2.0, 2.0, 2.0, 4.0, 4.0, 4.0]);
    }

    #[test]
    fn test_set_rates_smaller_factor_never_stalls() {
        let mut window = SampleWindow::new(config(16, 10.0, 1.0, 1)).unwrap();
        for _ in 0..7 {
            assert!(!window.ingest(&[0.0; 3]).unwrap());
        }

        window.set_rates(3.0, 1.0).unwrap();
        assert_eq!(window.decimation_factor(), 3);

        // Raw count is 7; the next multiple of 3 is the 9th sample.
        assert!(!window.ingest(&[8.0; 3]).unwrap());
        assert!(window.ingest(&[9.0; 3]).unwrap());
        assert!(window.is_ready());

        assert!(window.set_rates(0.0, 1.0).is_err());
        assert_eq!(window.decimation_factor(), 3);
    }
}
