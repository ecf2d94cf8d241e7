//! Scaling draw target adapter.
//!
//! Bitmap fonts come in one pixel size. [`ScaledCanvas`] maps each source
//! pixel onto a destination rectangle, which lets a 16px glyph be drawn at
//! any font size and squeezed horizontally by the fitter's compression
//! factor. The same adapter shrinks a whole frame to fit the host viewport.

use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{Dimensions, Point, Size};
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::Pixel;

/// Logical extent reported to drawables. Large enough that glyph and
/// primitive code never clips before the real target does.
const LOGICAL_BOUNDS: Rectangle = Rectangle::new(Point::new(-4096, -4096), Size::new(8192, 8192));

pub struct ScaledCanvas<'a, D> {
    target: &'a mut D,
    origin_x: f32,
    origin_y: f32,
    scale_x: f32,
    scale_y: f32,
}

impl<'a, D> ScaledCanvas<'a, D> {
    /// Source `(0, 0)` lands on `(origin_x, origin_y)` in the target.
    pub fn new(target: &'a mut D, origin_x: f32, origin_y: f32, scale_x: f32, scale_y: f32) -> Self {
        Self {
            target,
            origin_x,
            origin_y,
            scale_x,
            scale_y,
        }
    }

    /// Uniform scale with the origin at the target's top-left.
    pub fn uniform(target: &'a mut D, scale: f32) -> Self {
        Self::new(target, 0.0, 0.0, scale, scale)
    }

    /// Destination rectangle for a source rectangle. Never narrower or
    /// shorter than one pixel.
    fn map(&self, top_left: Point, size: Size) -> Rectangle {
        let x0 = (self.origin_x + top_left.x as f32 * self.scale_x).round() as i32;
        let y0 = (self.origin_y + top_left.y as f32 * self.scale_y).round() as i32;
        let x1 = (self.origin_x + (top_left.x + size.width as i32) as f32 * self.scale_x).round() as i32;
        let y1 = (self.origin_y + (top_left.y + size.height as i32) as f32 * self.scale_y).round() as i32;
        Rectangle::new(
            Point::new(x0, y0),
            Size::new((x1 - x0).max(1) as u32, (y1 - y0).max(1) as u32),
        )
    }
}

impl<D: DrawTarget> Dimensions for ScaledCanvas<'_, D> {
    fn bounding_box(&self) -> Rectangle {
        LOGICAL_BOUNDS
    }
}

impl<D: DrawTarget> DrawTarget for ScaledCanvas<'_, D> {
    type Color = D::Color;
    type Error = D::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let area = self.map(point, Size::new(1, 1));
            self.target.fill_solid(&area, color)?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        if area.is_zero_sized() {
            return Ok(());
        }
        let mapped = self.map(area.top_left, area.size);
        self.target.fill_solid(&mapped, color)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.target.clear(color)
    }
}

#[cfg(test)]
mod tests {
    use embedded_graphics::pixelcolor::Rgb888;
    use embedded_graphics::prelude::*;

    use super::*;
    use crate::colors::{BLACK, WHITE};
    use crate::testing::Canvas;

    #[test]
    fn test_pixel_maps_to_scaled_block() {
        let mut canvas = Canvas::new(20, 20);
        let mut scaled = ScaledCanvas::new(&mut canvas, 2.0, 4.0, 3.0, 2.0);
        Pixel(Point::new(1, 1), WHITE).draw(&mut scaled).ok();

        assert_eq!(canvas.count(WHITE), 6, "one source pixel covers 3x2");
        assert_eq!(canvas.pixel(5, 6), Some(WHITE));
        assert_eq!(canvas.pixel(7, 7), Some(WHITE));
        assert_eq!(canvas.pixel(8, 7), Some(BLACK));
    }

    #[test]
    fn test_downscale_keeps_one_pixel_minimum() {
        let mut canvas = Canvas::new(10, 10);
        let mut scaled = ScaledCanvas::uniform(&mut canvas, 0.1);
        Pixel(Point::new(3, 3), WHITE).draw(&mut scaled).ok();
        assert_eq!(canvas.count(WHITE), 1);
    }

    #[test]
    fn test_fill_solid_maps_whole_rect() {
        let mut canvas = Canvas::new(30, 30);
        let mut scaled = ScaledCanvas::uniform(&mut canvas, 0.5);
        scaled
            .fill_solid(&Rectangle::new(Point::new(10, 10), Size::new(20, 10)), Rgb888::RED)
            .ok();
        assert_eq!(canvas.count(Rgb888::RED), 50, "20x10 at half scale is 10x5");
        assert_eq!(canvas.pixel(5, 5), Some(Rgb888::RED));
    }
}
