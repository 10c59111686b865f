// WandWatch — Hardware & System Configuration
// Target: Seeed Studio Xiao ESP32-C3 (RISC-V)

// ---------------------------------------------------------------------------
// GPIO Pin Definitions (Xiao ESP32-C3 pinout)
// I2C (D4/D5 = GPIO6/GPIO7) and haptic (D2 = GPIO4) are claimed as typed
// pins in main.rs; only the button needs its raw number.
// ---------------------------------------------------------------------------
pub const PIN_BUTTON: i32 = 3;      // D1/A1 — User button / "touch" (INPUT_PULLUP, active LOW)

// ---------------------------------------------------------------------------
// I2C Bus
// ---------------------------------------------------------------------------
pub const I2C_ADDR_MPU6050: u8 = 0x68;
pub const I2C_ADDR_OLED: u8 = 0x3C;
pub const I2C_TIMEOUT_TICKS: u32 = 1000; // FreeRTOS ticks

// ---------------------------------------------------------------------------
// Display (SSD1306 OLED)
// ---------------------------------------------------------------------------
pub const SCREEN_WIDTH: u32 = 128;
pub const SCREEN_HEIGHT: u32 = 64;
pub const DISPLAY_BUFFER_SIZE: usize = (SCREEN_WIDTH as usize * SCREEN_HEIGHT as usize) / 8; // 1024

/// Rows reserved for the title line; plots live below it.
pub const TITLE_BAR_HEIGHT: u32 = 12;
pub const DOT_DIAMETER: u32 = 3;

// ---------------------------------------------------------------------------
// Task Stack Sizes (bytes)
// ---------------------------------------------------------------------------
pub const STACK_SENSOR: usize = 4096;
pub const STACK_WAND: usize = 8192;
pub const STACK_UI: usize = 8192;

// ---------------------------------------------------------------------------
// Timing (milliseconds)
// ---------------------------------------------------------------------------
pub const SENSOR_SAMPLE_INTERVAL_MS: u64 = 8;          // ~125 Hz
pub const UI_POLL_INTERVAL_MS: u64 = 10;               // 100 Hz input poll / refresh
pub const DEBOUNCE_MS: u64 = 50;
pub const LONG_PRESS_MS: u64 = 1500;                   // hold → next demo
pub const BOOT_TEXT_DISPLAY_MS: u64 = 1000;            // Title splash duration
pub const GESTURE_BANNER_MS: u64 = 1500;               // How long a detected gesture stays up

// ---------------------------------------------------------------------------
// Sine demo
// ---------------------------------------------------------------------------
/// Range of x the sine model was trained on: [0, 2π).
pub const SINE_X_RANGE: f32 = 2.0 * core::f32::consts::PI;
/// Inferences needed to sweep one full period.
pub const SINE_INFERENCES_PER_CYCLE: u32 = 1000;
/// Horizontal distance between consecutive sine dots (pixels).
pub const SINE_X_STEP: f32 = 0.75;

// ---------------------------------------------------------------------------
// Linear regression demo
// ---------------------------------------------------------------------------
pub const REGRESSION_POINTS_PER_RUN: usize = 100;
/// The regression model was trained on y = 2x - 1 + noise, x in [0, 1).
pub const REGRESSION_SLOPE: f32 = 2.0;
pub const REGRESSION_INTERCEPT: f32 = -1.0;

// ---------------------------------------------------------------------------
// Magic wand (gesture model + SampleWindow)
// ---------------------------------------------------------------------------
pub const WAND_CHANNELS: usize = 3;               // accX, accY, accZ
pub const WAND_CAPACITY_TUPLES: usize = 200;      // ring history
pub const WAND_WINDOW_TUPLES: usize = 128;        // model input length
pub const WAND_INPUT_SIZE: usize = WAND_WINDOW_TUPLES * WAND_CHANNELS; // 384
pub const WAND_RAW_SAMPLE_RATE_HZ: f32 = 1000.0 / SENSOR_SAMPLE_INTERVAL_MS as f32; // 125 Hz
pub const WAND_TARGET_SAMPLE_RATE_HZ: f32 = 25.0;
/// Accelerometer readings are fed to the model in milli-g.
pub const WAND_MILLI_G_PER_G: f32 = 1000.0;

pub const GESTURE_LABEL_COUNT: usize = 4;
pub const GESTURE_CONFIDENCE_THRESHOLD: f32 = 0.8;

// ---------------------------------------------------------------------------
// MPU6050 Sensor Scale Factors
// ---------------------------------------------------------------------------
pub const ACCEL_SCALE_2G: f32 = 16384.0;  // LSB/g  at ±2 g
pub const GYRO_SCALE_250: f32 = 131.0;    // LSB/°/s at ±250 °/s
