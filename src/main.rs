// WandWatch — Firmware Entry Point
//
// Boot sequence (ESP32-C3):
//   1. Bring up the shared I2C bus and the OLED.
//   2. Show the "WandWatch" title splash.
//   3. Run component self-test (OLED + MPU6050) and show the result.
//   4. Spawn sensor, wand and UI tasks; the UI starts on the sine demo.
//
// On any other target the binary runs the host simulator instead: the same
// demos and gesture pipeline driven by a synthetic accelerometer stream.

#[cfg(target_os = "espidf")]
mod drivers;
#[cfg(target_os = "espidf")]
mod input;
#[cfg(target_os = "espidf")]
mod tasks;

#[cfg(not(target_os = "espidf"))]
mod simulator;

#[cfg(not(target_os = "espidf"))]
fn main() -> anyhow::Result<()> {
    wandwatch::logging::init();
    simulator::run()
}

#[cfg(target_os = "espidf")]
fn main() -> anyhow::Result<()> {
    use std::sync::mpsc;
    use std::sync::Mutex;
    use std::thread;
    use std::time::Duration;

    use esp_idf_hal::gpio::{AnyInputPin, AnyOutputPin, Input, InputPin, Output, OutputPin, PinDriver};
    use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
    use esp_idf_hal::prelude::*;

    use wandwatch::config::*;

    use crate::drivers::display::OledDisplay;
    use crate::drivers::imu::Mpu6050;
    use crate::drivers::SharedBus;

    // Link esp-idf-sys runtime patches and initialise logging.
    esp_idf_svc::sys::link_patches();
    wandwatch::logging::init();
    log::info!("WandWatch firmware starting…");

    // ---- Peripherals ------------------------------------------------------
    let peripherals = Peripherals::take()?;

    // ---- I2C bus (shared between OLED and MPU6050) ------------------------
    let i2c_config = I2cConfig::new().baudrate(400u32.kHz().into());
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio6, // SDA, D4
        peripherals.pins.gpio7, // SCL, D5
        &i2c_config,
    )?;
    // The I2C peripheral is a singleton from `Peripherals::take()` and the
    // firmware never exits, so the bus can live for 'static.
    let i2c_bus: SharedBus = Box::leak(Box::new(Mutex::new(i2c)));

    // ---- Boot sequence (display) ------------------------------------------
    let mut display = OledDisplay::new(i2c_bus);
    display.init()?;

    display.show_title("WandWatch")?;
    thread::sleep(Duration::from_millis(BOOT_TEXT_DISPLAY_MS));

    // Component self-test
    let oled_ok = display.is_connected();
    let imu_ok = Mpu6050::new(i2c_bus).is_connected();
    display.show_boot_status(oled_ok, imu_ok)?;
    thread::sleep(Duration::from_secs(1));

    if !oled_ok || !imu_ok {
        log::error!("Boot check FAILED — OLED:{} IMU:{}", oled_ok, imu_ok);
        // Continue anyway so we can still debug via serial.
    }
    log::info!("Boot complete — entering normal operation");

    // ---- Channels ---------------------------------------------------------
    let (sensor_tx, sensor_rx) = mpsc::channel();
    let (ui_tx, ui_rx) = mpsc::channel();

    // ---- GPIO handles for the UI task -------------------------------------
    let button: PinDriver<'static, AnyInputPin, Input> =
        PinDriver::input(peripherals.pins.gpio3.downgrade_input())?;
    // Pull-up set through the raw API: `set_pull` needs an input/output pin
    // type, and the downgraded pin is input-only.
    // SAFETY: plain register configuration of a pin this driver owns.
    unsafe {
        esp_idf_sys::gpio_set_pull_mode(PIN_BUTTON, esp_idf_sys::gpio_pull_mode_t_GPIO_PULLUP_ONLY);
    }

    let haptic: PinDriver<'static, AnyOutputPin, Output> =
        PinDriver::output(peripherals.pins.gpio4.downgrade_output())?; // D2

    // ---- Spawn tasks (map to FreeRTOS tasks via std::thread) ---------------

    // Sensor task: tightest timing.
    thread::Builder::new()
        .name("sensor".into())
        .stack_size(STACK_SENSOR)
        .spawn(move || {
            tasks::sensor::sensor_task(i2c_bus, sensor_tx);
        })?;

    // Gesture pipeline + inference
    let wand_ui_tx = ui_tx.clone();
    thread::Builder::new()
        .name("wand".into())
        .stack_size(STACK_WAND)
        .spawn(move || {
            if let Err(e) = tasks::wand::wand_task(sensor_rx, wand_ui_tx) {
                log::error!("Wand task failed: {}", e);
            }
        })?;

    // UI task (display + button + haptic + sine/regression demos)
    thread::Builder::new()
        .name("ui".into())
        .stack_size(STACK_UI)
        .spawn(move || {
            tasks::ui::ui_task(i2c_bus, button, haptic, ui_rx, ui_tx);
        })?;

    // Main thread has nothing left to do; park it forever.
    loop {
        thread::sleep(Duration::from_secs(60));
    }
}
