// WandWatch — Demo Plotting
//
// Draws the regression demos onto any monochrome `embedded-graphics` target:
// the SSD1306 frame buffer on the device, `MockDisplay` in tests.  The plot box
// sits below a one-line title bar.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Alignment, Text};

use crate::config::*;

/// Arduino-style linear remap of `value` from one range onto another.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Region of a `width` × `height` screen left for plots.
pub fn plot_area(width: u32, height: u32) -> Rectangle {
    Rectangle::new(
        Point::new(0, TITLE_BAR_HEIGHT as i32),
        Size::new(width, height.saturating_sub(TITLE_BAR_HEIGHT)),
    )
}

fn dot_radius() -> i32 {
    (DOT_DIAMETER / 2) as i32
}

fn draw_dot<D>(target: &mut D, center: Point, color: BinaryColor) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Circle::with_center(center, DOT_DIAMETER)
        .into_styled(PrimitiveStyle::with_fill(color))
        .draw(target)
}

/// Screen row for `y` in `[-1, 1]`; +1 at the top of `area`.
fn row_for(area: &Rectangle, y: f32) -> i32 {
    let r = dot_radius();
    let top = (area.top_left.y + r) as f32;
    let bottom = (area.top_left.y + area.size.height as i32 - 1 - r) as f32;
    map_range(y.clamp(-1.0, 1.0), -1.0, 1.0, bottom, top).round() as i32
}

/// Scrolling dot for the sine demo.
///
/// Every new point erases the previous dot, so a single dot sweeps left to
/// right and wraps back to the left edge.
#[derive(Debug, Clone)]
pub struct SineTrace {
    area: Rectangle,
    x_step: f32,
    cursor_x: f32,
    last: Option<Point>,
}

impl SineTrace {
    pub fn new(area: Rectangle, x_step: f32) -> Self {
        Self {
            area,
            x_step,
            cursor_x: 0.0,
            last: None,
        }
    }

    fn sweep_width(&self) -> f32 {
        (self.area.size.width as i32 - 2 * dot_radius() - 1).max(0) as f32
    }

    /// Where `y` would be drawn at the current cursor.
    pub fn point_for(&self, y: f32) -> Point {
        let x = self.area.top_left.x + dot_radius() + self.cursor_x.round() as i32;
        Point::new(x, row_for(&self.area, y))
    }

    /// Erase the previous dot, draw `y` at the cursor and advance it.
    pub fn plot<D>(&mut self, target: &mut D, y: f32) -> Result<Point, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        if let Some(previous) = self.last.take() {
            draw_dot(target, previous, BinaryColor::Off)?;
        }

        let point = self.point_for(y);
        draw_dot(target, point, BinaryColor::On)?;
        self.last = Some(point);

        self.cursor_x += self.x_step;
        if self.cursor_x > self.sweep_width() {
            self.cursor_x = 0.0;
        }
        Ok(point)
    }

    /// Forget the on-screen dot, e.g. after the screen was cleared.
    pub fn restart(&mut self) {
        self.cursor_x = 0.0;
        self.last = None;
    }
}

/// Scatter plot for the linear regression demo: `x` in `[0, 1]` across,
/// `y` in `[-1, 1]` up.
#[derive(Debug, Clone, Copy)]
pub struct ScatterPlot {
    area: Rectangle,
}

impl ScatterPlot {
    pub fn new(area: Rectangle) -> Self {
        Self { area }
    }

    pub fn point_for(&self, x: f32, y: f32) -> Point {
        let r = dot_radius();
        let left = (self.area.top_left.x + r) as f32;
        let right = (self.area.top_left.x + self.area.size.width as i32 - 1 - r) as f32;
        let column = map_range(x.clamp(0.0, 1.0), 0.0, 1.0, left, right).round() as i32;
        Point::new(column, row_for(&self.area, y))
    }

    pub fn plot<D>(&self, target: &mut D, x: f32, y: f32) -> Result<Point, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let point = self.point_for(x, y);
        draw_dot(target, point, BinaryColor::On)?;
        Ok(point)
    }

    pub fn clear<D>(&self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        self.area
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
            .draw(target)
    }
}

/// Centered title in the title bar.
pub fn draw_title<D>(target: &mut D, title: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor> + OriginDimensions,
{
    let center_x = (target.size().width / 2) as i32;
    Text::with_alignment(
        title,
        Point::new(center_x, FONT_6X10.baseline as i32),
        MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
        Alignment::Center,
    )
    .draw(target)?;
    Ok(())
}

/// Text centered in the plot area (prompts, gesture banners).
pub fn draw_centered_text<D>(target: &mut D, text: &str) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor> + OriginDimensions,
{
    let area = plot_area(target.size().width, target.size().height);
    Text::with_alignment(
        text,
        area.center(),
        MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
        Alignment::Center,
    )
    .draw(target)?;
    Ok(())
}
