// WandWatch — MPU6050 IMU Driver
//
// Register-level driver over the shared I2C bus.  Configured for wand
// strokes: ±2 g accelerometer, ±250 °/s gyro, 125 Hz output data rate.

use anyhow::anyhow;

use wandwatch::config::*;
use wandwatch::events::SensorData;

use super::SharedBus;

// MPU6050 register addresses
const REG_SMPLRT_DIV: u8 = 0x19;
const REG_CONFIG: u8 = 0x1A;
const REG_GYRO_CONFIG: u8 = 0x1B;
const REG_ACCEL_CONFIG: u8 = 0x1C;
const REG_ACCEL_XOUT_H: u8 = 0x3B; // Start of 14-byte sensor burst
const REG_PWR_MGMT_1: u8 = 0x6B;
const REG_WHO_AM_I: u8 = 0x75;
const WHO_AM_I_EXPECTED: u8 = 0x68;

pub struct Mpu6050 {
    bus: SharedBus,
}

impl Mpu6050 {
    pub fn new(bus: SharedBus) -> Self {
        Self { bus }
    }

    /// Verify the device is reachable on the I2C bus.
    pub fn is_connected(&self) -> bool {
        let Ok(mut bus) = self.bus.lock() else {
            return false;
        };
        let mut buf = [0u8; 1];
        match bus.write_read(I2C_ADDR_MPU6050, &[REG_WHO_AM_I], &mut buf, I2C_TIMEOUT_TICKS) {
            Ok(()) => buf[0] == WHO_AM_I_EXPECTED,
            Err(_) => false,
        }
    }

    /// Wake the sensor and configure accel (±2 g), gyro (±250 °/s),
    /// DLPF 44 Hz, output rate 1 kHz / (1 + 7) = 125 Hz.
    pub fn init(&self) -> anyhow::Result<()> {
        let mut bus = self.bus.lock().map_err(|_| anyhow!("I2C bus lock poisoned"))?;

        // Wake up, clock from the X gyro PLL
        bus.write(I2C_ADDR_MPU6050, &[REG_PWR_MGMT_1, 0x01], I2C_TIMEOUT_TICKS)?;
        bus.write(I2C_ADDR_MPU6050, &[REG_CONFIG, 0x03], I2C_TIMEOUT_TICKS)?;
        bus.write(I2C_ADDR_MPU6050, &[REG_SMPLRT_DIV, 0x07], I2C_TIMEOUT_TICKS)?;
        bus.write(I2C_ADDR_MPU6050, &[REG_GYRO_CONFIG, 0x00], I2C_TIMEOUT_TICKS)?;
        bus.write(I2C_ADDR_MPU6050, &[REG_ACCEL_CONFIG, 0x00], I2C_TIMEOUT_TICKS)?;

        log::info!("MPU6050 initialised (±2g, ±250°/s, 125 Hz)");
        Ok(())
    }

    /// Burst-read all 6 axes; acceleration in g, rotation in °/s.
    pub fn read_data(&self) -> anyhow::Result<SensorData> {
        let mut bus = self.bus.lock().map_err(|_| anyhow!("I2C bus lock poisoned"))?;
        let mut raw = [0u8; 14];
        bus.write_read(
            I2C_ADDR_MPU6050,
            &[REG_ACCEL_XOUT_H],
            &mut raw,
            I2C_TIMEOUT_TICKS,
        )?;

        let axis = |i: usize| i16::from_be_bytes([raw[i], raw[i + 1]]) as f32;
        Ok(SensorData {
            ax: axis(0) / ACCEL_SCALE_2G,
            ay: axis(2) / ACCEL_SCALE_2G,
            az: axis(4) / ACCEL_SCALE_2G,
            // raw[6..8] = temperature, skipped
            gx: axis(8) / GYRO_SCALE_250,
            gy: axis(10) / GYRO_SCALE_250,
            gz: axis(12) / GYRO_SCALE_250,
        })
    }
}
