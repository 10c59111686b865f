// WandWatch — SSD1306 OLED Driver
//
// 128×64 monochrome frame buffer in RAM, exposed as an `embedded-graphics`
// draw target.  Drawing only touches the buffer; `flush` pushes the whole
// frame over the shared I2C bus.

use core::convert::Infallible;

use anyhow::anyhow;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;

use wandwatch::config::*;
use wandwatch::plot;

use super::SharedBus;

const CONTROL_COMMAND: u8 = 0x00;
const CONTROL_DATA: u8 = 0x40;
const CMD_DISPLAY_OFF: u8 = 0xAE;
const CMD_DISPLAY_ON: u8 = 0xAF;
const CMD_NOP: u8 = 0xE3;
/// Bytes of pixel data per I2C transaction.
const DATA_CHUNK: usize = 32;

const INIT_SEQUENCE: &[u8] = &[
    CMD_DISPLAY_OFF,
    0xD5, 0x80, // clock divide ratio / oscillator
    0xA8, 0x3F, // multiplex 1/64
    0xD3, 0x00, // display offset
    0x40,       // start line 0
    0x8D, 0x14, // charge pump on
    0x20, 0x00, // horizontal addressing
    0xA1,       // segment remap
    0xC8,       // COM scan descending
    0xDA, 0x12, // COM pins
    0x81, 0xCF, // contrast
    0xD9, 0xF1, // pre-charge
    0xDB, 0x40, // VCOMH deselect
    0xA4,       // resume from RAM
    0xA6,       // normal (not inverted)
    CMD_DISPLAY_ON,
];

pub struct OledDisplay {
    bus: SharedBus,
    buffer: [u8; DISPLAY_BUFFER_SIZE],
}

impl OledDisplay {
    pub fn new(bus: SharedBus) -> Self {
        Self {
            bus,
            buffer: [0; DISPLAY_BUFFER_SIZE],
        }
    }

    pub fn is_connected(&self) -> bool {
        let Ok(mut bus) = self.bus.lock() else {
            return false;
        };
        bus.write(I2C_ADDR_OLED, &[CONTROL_COMMAND, CMD_NOP], I2C_TIMEOUT_TICKS)
            .is_ok()
    }

    pub fn init(&mut self) -> anyhow::Result<()> {
        self.commands(INIT_SEQUENCE)?;
        self.clear_buffer();
        self.flush()?;
        log::info!("SSD1306 initialised ({}x{})", SCREEN_WIDTH, SCREEN_HEIGHT);
        Ok(())
    }

    fn commands(&self, commands: &[u8]) -> anyhow::Result<()> {
        let mut bus = self.bus.lock().map_err(|_| anyhow!("I2C bus lock poisoned"))?;
        let mut packet = Vec::with_capacity(commands.len() + 1);
        packet.push(CONTROL_COMMAND);
        packet.extend_from_slice(commands);
        bus.write(I2C_ADDR_OLED, &packet, I2C_TIMEOUT_TICKS)?;
        Ok(())
    }

    pub fn clear_buffer(&mut self) {
        self.buffer.fill(0);
    }

    /// Push the frame buffer to the panel.
    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.commands(&[
            0x21, 0x00, (SCREEN_WIDTH - 1) as u8,        // column range
            0x22, 0x00, (SCREEN_HEIGHT / 8 - 1) as u8,   // page range
        ])?;

        let mut bus = self.bus.lock().map_err(|_| anyhow!("I2C bus lock poisoned"))?;
        let mut packet = [0u8; DATA_CHUNK + 1];
        packet[0] = CONTROL_DATA;
        for chunk in self.buffer.chunks(DATA_CHUNK) {
            packet[1..=chunk.len()].copy_from_slice(chunk);
            bus.write(I2C_ADDR_OLED, &packet[..=chunk.len()], I2C_TIMEOUT_TICKS)?;
        }
        Ok(())
    }

    /// Clear the screen and draw a demo title bar.
    pub fn show_title(&mut self, title: &str) -> anyhow::Result<()> {
        self.clear_buffer();
        let _ = plot::draw_title(self, title);
        self.flush()
    }

    /// Title bar plus a centered line of text below it.
    pub fn show_message(&mut self, title: &str, text: &str) -> anyhow::Result<()> {
        self.clear_buffer();
        let _ = plot::draw_title(self, title);
        let _ = plot::draw_centered_text(self, text);
        self.flush()
    }

    pub fn show_boot_status(&mut self, oled_ok: bool, imu_ok: bool) -> anyhow::Result<()> {
        let status = |ok: bool| if ok { "OK" } else { "FAIL" };
        let text = format!("OLED {}  IMU {}", status(oled_ok), status(imu_ok));
        self.show_message("Self test", &text)
    }
}

impl OriginDimensions for OledDisplay {
    fn size(&self) -> Size {
        Size::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl DrawTarget for OledDisplay {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u32::try_from(point.x), u32::try_from(point.y)) else {
                continue;
            };
            if x >= SCREEN_WIDTH || y >= SCREEN_HEIGHT {
                continue;
            }

            // Each byte is a vertical strip of 8 pixels within one page.
            let index = (x + (y / 8) * SCREEN_WIDTH) as usize;
            let bit = 1u8 << (y % 8);
            if color.is_on() {
                self.buffer[index] |= bit;
            } else {
                self.buffer[index] &= !bit;
            }
        }
        Ok(())
    }
}
