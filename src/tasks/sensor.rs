// WandWatch — Sensor Task
//
// Reads the IMU at the raw accelerometer rate (~125 Hz) and hands every
// reading to the wand task.  Decimation happens downstream in the
// SampleWindow, so this task never drops samples on purpose.

use std::sync::mpsc::Sender;
use std::thread;
use std::time::{Duration, Instant};

use wandwatch::config::*;
use wandwatch::events::SensorData;

use crate::drivers::imu::Mpu6050;
use crate::drivers::SharedBus;

/// Consecutive read failures before the IMU is re-initialised.
const MAX_READ_ERRORS: u32 = 25;

pub fn sensor_task(bus: SharedBus, sensor_tx: Sender<SensorData>) {
    log::info!("Sensor task started");

    let imu = Mpu6050::new(bus);
    if let Err(e) = imu.init() {
        log::error!("MPU6050 init failed in sensor task: {}", e);
        return;
    }

    let interval = Duration::from_millis(SENSOR_SAMPLE_INTERVAL_MS);
    let mut read_errors: u32 = 0;

    loop {
        let tick_start = Instant::now();

        match imu.read_data() {
            Ok(data) => {
                read_errors = 0;
                if sensor_tx.send(data).is_err() {
                    log::warn!("Sensor channel closed — exiting sensor task");
                    return;
                }
            }
            Err(e) => {
                read_errors += 1;
                log::warn!("IMU read error ({} in a row): {}", read_errors, e);
                if read_errors >= MAX_READ_ERRORS {
                    log::error!("IMU unresponsive — re-initialising");
                    if let Err(e) = imu.init() {
                        log::error!("MPU6050 re-init failed: {}", e);
                    }
                    read_errors = 0;
                }
            }
        }

        // Sleep out the rest of the period to hold the raw sample rate.
        let elapsed = tick_start.elapsed();
        if elapsed < interval {
            thread::sleep(interval - elapsed);
        }
    }
}
