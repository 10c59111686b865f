// WandWatch — System Events & Data Types

// ---------------------------------------------------------------------------
// Sensor Data (6-axis IMU reading from MPU6050)
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SensorData {
    pub ax: f32,
    pub ay: f32,
    pub az: f32,
    pub gx: f32,
    pub gy: f32,
    pub gz: f32,
}

impl SensorData {
    /// Accelerometer axes in the order the gesture model expects.
    pub fn accel(&self) -> [f32; 3] {
        [self.ax, self.ay, self.az]
    }
}

// ---------------------------------------------------------------------------
// Gesture Classification
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// "W" shape.
    Wing,
    /// Clockwise circle.
    Ring,
    /// Angle / slope.
    Slope,
}

impl Gesture {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Wing  => "WING",
            Self::Ring  => "RING",
            Self::Slope => "SLOPE",
        }
    }

    /// Map a model output label to a gesture.  The model's catch-all
    /// `"negative"` class, like any unknown label, maps to `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "wing"  => Some(Self::Wing),
            "ring"  => Some(Self::Ring),
            "slope" => Some(Self::Slope),
            _       => None,
        }
    }
}

/// A confident gesture prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureResult {
    pub gesture: Gesture,
    pub confidence: f32,
}

// ---------------------------------------------------------------------------
// Demo selection
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemoMode {
    #[default]
    Sine,
    Regression,
    Wand,
}

impl DemoMode {
    /// Long press cycles through the demos in this order.
    pub fn next(self) -> Self {
        match self {
            Self::Sine       => Self::Regression,
            Self::Regression => Self::Wand,
            Self::Wand       => Self::Sine,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Sine       => "Sine",
            Self::Regression => "Linear regression",
            Self::Wand       => "Magic wand",
        }
    }
}

// ---------------------------------------------------------------------------
// UI Events, sent to the UI task via channel
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    /// Wand task recognised a gesture.
    Gesture(GestureResult),
    /// Short press: the demos' "touch" input.
    Touch,
    /// Long press: switch to the next demo.
    NextDemo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_display_names() {
        assert_eq!(Gesture::from_label("wing"), Some(Gesture::Wing));
        assert_eq!(Gesture::from_label("ring"), Some(Gesture::Ring));
        assert_eq!(Gesture::from_label("slope"), Some(Gesture::Slope));
        assert_eq!(Gesture::from_label("negative"), None);
        assert_eq!(Gesture::Ring.display_name(), "RING");
    }

    #[test]
    fn demo_mode_cycles_back_to_sine() {
        let mut mode = DemoMode::default();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(mode);
            mode = mode.next();
        }
        assert_eq!(
            seen,
            vec![DemoMode::Sine, DemoMode::Regression, DemoMode::Wand, DemoMode::Sine]
        );
    }
}
