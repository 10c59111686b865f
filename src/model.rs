// WandWatch — TensorFlow Lite Micro Inference Interface
//
// Safe Rust API over the three pre-trained demo models.
//
// Architecture:
//   1. STUB mode (default): deterministic stand-ins so the rest of the
//      firmware (and the host simulator) can run without the C++ runtime.
//   2. FFI mode: enable the `tflm` feature; build.rs compiles the
//      TensorFlow Lite Micro runtime and the `tflm_invoke` shim that owns the
//      model byte arrays and the tensor arena.
//
// Every model takes a flat f32 input and fills a flat f32 output; the shapes
// below must match the tensors baked into the shim.

use crate::config::*;
use crate::error::ModelError;
use crate::events::{Gesture, GestureResult};

/// Labels matching the gesture model output order.
pub const GESTURE_LABELS: [&str; GESTURE_LABEL_COUNT] = ["wing", "ring", "slope", "negative"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Model {
    Sine,
    Linear,
    Gesture,
}

impl Model {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sine    => "sine",
            Self::Linear  => "linear_regression",
            Self::Gesture => "magic_wand",
        }
    }

    pub fn input_len(&self) -> usize {
        match self {
            Self::Sine | Self::Linear => 1,
            Self::Gesture => WAND_INPUT_SIZE,
        }
    }

    pub fn output_len(&self) -> usize {
        match self {
            Self::Sine | Self::Linear => 1,
            Self::Gesture => GESTURE_LABEL_COUNT,
        }
    }
}

// ---------------------------------------------------------------------------
// Public interface
// ---------------------------------------------------------------------------

/// Predict `sin(x)` for `x` in `[0, 2π)`.
pub fn predict_sine(x: f32) -> Result<f32, ModelError> {
    let mut y = [0.0f32; 1];
    invoke(Model::Sine, &[x], &mut y)?;
    Ok(y[0])
}

/// Predict `y` for `x` in `[0, 1)` with the linear regression model.
pub fn predict_linear(x: f32) -> Result<f32, ModelError> {
    let mut y = [0.0f32; 1];
    invoke(Model::Linear, &[x], &mut y)?;
    Ok(y[0])
}

/// Classify a window of `WAND_WINDOW_TUPLES` accelerometer tuples (milli-g,
/// oldest first).
///
/// Returns `Ok(Some(result))` when a gesture wins with at least
/// [`GESTURE_CONFIDENCE_THRESHOLD`], `Ok(None)` when the best class is the
/// catch-all or below threshold.
pub fn classify_gesture(window: &[f32]) -> Result<Option<GestureResult>, ModelError> {
    let mut scores = [0.0f32; GESTURE_LABEL_COUNT];
    invoke(Model::Gesture, window, &mut scores)?;

    let Some((best_idx, &best)) = scores
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
    else {
        return Ok(None);
    };

    log::debug!("gesture scores {:?}", scores);

    if best < GESTURE_CONFIDENCE_THRESHOLD {
        return Ok(None);
    }
    Ok(Gesture::from_label(GESTURE_LABELS[best_idx]).map(|gesture| GestureResult {
        gesture,
        confidence: best,
    }))
}

/// Log one regression result over serial.
pub fn report(model: Model, x: f32, y: f32) {
    log::info!("[{}] x_value: {:.4}, y_value: {:.4}", model.name(), x, y);
}

/// Run `model` on `input`, writing its raw output into `output`.
pub fn invoke(model: Model, input: &[f32], output: &mut [f32]) -> Result<(), ModelError> {
    if input.len() != model.input_len() {
        return Err(ModelError::Shape {
            model: model.name(),
            expected: model.input_len(),
            actual: input.len(),
        });
    }
    if output.len() != model.output_len() {
        return Err(ModelError::Shape {
            model: model.name(),
            expected: model.output_len(),
            actual: output.len(),
        });
    }

    #[cfg(not(feature = "tflm"))]
    stub::invoke(model, input, output);

    #[cfg(feature = "tflm")]
    ffi_invoke(model, input, output)?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Stub back-end: development and testing without the C++ runtime
// ---------------------------------------------------------------------------
#[cfg(not(feature = "tflm"))]
mod stub {
    use super::Model;
    use crate::config::*;

    /// Below this mean squared deviation (milli-g²) the wand is held still.
    const STILL_ENERGY: f32 = 250.0 * 250.0;

    pub fn invoke(model: Model, input: &[f32], output: &mut [f32]) {
        match model {
            Model::Sine => output[0] = input[0].sin(),
            Model::Linear => output[0] = REGRESSION_SLOPE * input[0] + REGRESSION_INTERCEPT,
            Model::Gesture => gesture_scores(input, output),
        }
    }

    // Motion energy per axis decides the class: x-dominant strokes read as a
    // wing, y-dominant as a ring, z-dominant as a slope.
    fn gesture_scores(window: &[f32], scores: &mut [f32]) {
        let tuples = (window.len() / WAND_CHANNELS).max(1) as f32;

        let mut mean = [0.0f32; WAND_CHANNELS];
        for tuple in window.chunks_exact(WAND_CHANNELS) {
            for (m, v) in mean.iter_mut().zip(tuple) {
                *m += v / tuples;
            }
        }

        let mut energy = [0.0f32; WAND_CHANNELS];
        for tuple in window.chunks_exact(WAND_CHANNELS) {
            for ((e, v), m) in energy.iter_mut().zip(tuple).zip(&mean) {
                *e += (v - m).powi(2) / tuples;
            }
        }

        let total: f32 = energy.iter().sum();
        scores.fill(0.02);
        if total < STILL_ENERGY {
            scores[3] = 0.94;
        } else {
            let dominant = (0..WAND_CHANNELS)
                .max_by(|&a, &b| energy[a].total_cmp(&energy[b]))
                .unwrap_or(0);
            scores[dominant] = 0.94;
        }

        log::debug!("STUB gesture: axis energy {:?}", energy);
    }
}

// ---------------------------------------------------------------------------
// Real FFI back-end: calls the compiled TensorFlow Lite Micro shim
// ---------------------------------------------------------------------------
#[cfg(feature = "tflm")]
mod ffi {
    extern "C" {
        /// Copies `input` into the model's input tensor, invokes the
        /// interpreter and copies the output tensor into `output`.
        /// Returns 0 (kTfLiteOk) on success.
        pub fn tflm_invoke(
            model_id: i32,
            input: *const f32,
            input_len: usize,
            output: *mut f32,
            output_len: usize,
        ) -> i32;
    }
}

#[cfg(feature = "tflm")]
fn ffi_invoke(model: Model, input: &[f32], output: &mut [f32]) -> Result<(), ModelError> {
    let model_id = match model {
        Model::Sine => 0,
        Model::Linear => 1,
        Model::Gesture => 2,
    };

    // SAFETY: both slices were length-checked against the model's tensor
    // shapes above, and the shim copies in and out before returning.
    let code = unsafe {
        ffi::tflm_invoke(
            model_id,
            input.as_ptr(),
            input.len(),
            output.as_mut_ptr(),
            output.len(),
        )
    };

    if code != 0 {
        log::error!("TFLM invoke failed on model {}: {}", model.name(), code);
        return Err(ModelError::Invoke {
            model: model.name(),
            code,
        });
    }
    Ok(())
}

#[cfg(all(test, not(feature = "tflm")))]
mod tests {
    use super::*;

    fn window_moving_on(axis: usize) -> Vec<f32> {
        let mut window = vec![0.0f32; WAND_INPUT_SIZE];
        for (t, tuple) in window.chunks_exact_mut(WAND_CHANNELS).enumerate() {
            tuple[2] = 1000.0; // gravity
            tuple[axis] += if t % 8 < 4 { 900.0 } else { -900.0 };
        }
        window
    }

    #[test]
    fn regressors_follow_their_training_curves() {
        let y = predict_sine(core::f32::consts::FRAC_PI_2).unwrap();
        assert!((y - 1.0).abs() < 1e-5);

        let y = predict_linear(0.75).unwrap();
        assert!((y - 0.5).abs() < 1e-5);
    }

    #[test]
    fn still_wand_is_not_a_gesture() {
        let mut window = vec![0.0f32; WAND_INPUT_SIZE];
        for tuple in window.chunks_exact_mut(WAND_CHANNELS) {
            tuple[2] = 1000.0;
        }
        assert_eq!(classify_gesture(&window).unwrap(), None);
    }

    #[test]
    fn dominant_axis_picks_the_gesture() {
        let wing = classify_gesture(&window_moving_on(0)).unwrap().unwrap();
        assert_eq!(wing.gesture, Gesture::Wing);
        assert!(wing.confidence >= GESTURE_CONFIDENCE_THRESHOLD);

        let ring = classify_gesture(&window_moving_on(1)).unwrap().unwrap();
        assert_eq!(ring.gesture, Gesture::Ring);

        let slope = classify_gesture(&window_moving_on(2)).unwrap().unwrap();
        assert_eq!(slope.gesture, Gesture::Slope);
    }

    #[test]
    fn wrong_window_size_is_rejected() {
        let err = classify_gesture(&[0.0; 12]).unwrap_err();
        assert_eq!(
            err,
            ModelError::Shape {
                model: "magic_wand",
                expected: WAND_INPUT_SIZE,
                actual: 12,
            }
        );
    }
}
