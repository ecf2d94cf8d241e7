//! Low-level drawing primitives shared across widgets.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle};

use crate::colors::{UNLIT_SQUARE, WHITE};
use crate::geometry::Bounds;
use crate::icons::IconMask;

/// Inset of the rounded square inside its cell, as a fraction of the cell.
const SQUARE_PADDING_RATIO: f32 = 0.1;

/// Corner radius as a fraction of the inner square.
const SQUARE_CORNER_RATIO: f32 = 0.1;

/// Icon size as a fraction of the inner square.
const ICON_RATIO: f32 = 0.85;

/// Outline width of indicator squares.
const SQUARE_STROKE: u32 = 3;

/// Colors of one indicator square.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareTint {
    pub fill: Rgb888,
    /// Outline color, or no outline.
    pub edge: Option<Rgb888>,
    pub icon: Rgb888,
}

impl SquareTint {
    /// Dark square with white icon and edge.
    pub const UNLIT: Self = Self { fill: UNLIT_SQUARE, edge: Some(WHITE), icon: WHITE };
}

/// Fill a box with a solid color.
pub fn fill_bounds<D>(display: &mut D, bounds: &Bounds, color: Rgb888)
where
    D: DrawTarget<Color = Rgb888>,
{
    if bounds.is_empty() {
        return;
    }
    display.fill_solid(&bounds.to_rectangle(), color).ok();
}

/// Draw a horizontal line of `thickness` centered on `y`.
pub fn draw_hline<D>(display: &mut D, x: f32, y: f32, width: f32, thickness: f32, color: Rgb888)
where
    D: DrawTarget<Color = Rgb888>,
{
    if thickness <= 0.0 {
        return;
    }
    let thickness = thickness.max(1.0);
    fill_bounds(display, &Bounds::new(x, y - thickness / 2.0, width, thickness), color);
}

/// Draw a rounded indicator square filling the `cell` box.
///
/// The square is inset by 10% of the cell, with an icon centered at 85% of
/// the inner size when `icon` is available.
pub fn draw_indicator_square<D>(display: &mut D, cell: &Bounds, tint: &SquareTint, icon: Option<&IconMask>)
where
    D: DrawTarget<Color = Rgb888>,
{
    let padding = cell.width * SQUARE_PADDING_RATIO;
    let inner_size = cell.width - padding * 2.0;
    if inner_size <= 0.0 {
        return;
    }
    let inner = Bounds::new(cell.x + padding, cell.y + padding, inner_size, inner_size);
    let radius = (inner_size * SQUARE_CORNER_RATIO).round() as u32;

    let mut style = PrimitiveStyleBuilder::new().fill_color(tint.fill);
    if let Some(edge) = tint.edge {
        style = style.stroke_color(edge).stroke_width(SQUARE_STROKE);
    }
    RoundedRectangle::with_equal_corners(inner.to_rectangle(), Size::new(radius, radius))
        .into_styled(style.build())
        .draw(display)
        .ok();

    if let Some(mask) = icon {
        let side = inner_size * ICON_RATIO;
        let offset = (inner_size - side) / 2.0;
        let top_left = Point::new((inner.x + offset).round() as i32, (inner.y + offset).round() as i32);
        mask.draw(display, top_left, side.round() as u32, tint.icon);
    }
}

/// Draw a vertical capsule centered on `(center_x, center_y)`.
///
/// The ends are semicircles of radius `width / 2`.
pub fn draw_capsule<D>(
    display: &mut D,
    center_x: f32,
    center_y: f32,
    width: f32,
    height: f32,
    fill: Rgb888,
    border: Option<Rgb888>,
) where
    D: DrawTarget<Color = Rgb888>,
{
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    let area = Bounds::new(center_x - width / 2.0, center_y - height / 2.0, width, height).to_rectangle();
    let radius = (width / 2.0).round() as u32;

    let mut style = PrimitiveStyleBuilder::new().fill_color(fill);
    if let Some(border) = border {
        style = style.stroke_color(border).stroke_width(1);
    }
    RoundedRectangle::with_equal_corners(area, Size::new(radius, radius))
        .into_styled(style.build())
        .draw(display)
        .ok();
}

/// Stroke the outline of a box.
pub fn draw_frame<D>(display: &mut D, bounds: &Bounds, color: Rgb888, width: u32)
where
    D: DrawTarget<Color = Rgb888>,
{
    let rect: Rectangle = bounds.to_rectangle();
    rect.into_styled(PrimitiveStyle::with_stroke(color, width)).draw(display).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::BLACK;
    use crate::testing::Canvas;

    const FILL: Rgb888 = Rgb888::new(0x4d, 0x98, 0x4d);

    #[test]
    fn test_indicator_square_inset_and_fill() {
        let mut canvas = Canvas::new(100, 100);
        let tint = SquareTint { fill: FILL, edge: None, icon: WHITE };
        draw_indicator_square(&mut canvas, &Bounds::new(0.0, 0.0, 100.0, 100.0), &tint, None);

        assert_eq!(canvas.pixel(5, 50), Some(BLACK), "padding stays untouched");
        assert_eq!(canvas.pixel(50, 50), Some(FILL));
        let lit = canvas.lit_bounds(FILL).unwrap();
        assert_eq!(lit.top_left.x, 10, "inset is 10% of the cell");
        assert_eq!(lit.size.width, 80);
    }

    #[test]
    fn test_indicator_square_draws_icon() {
        let mut canvas = Canvas::new(100, 100);
        let tint = SquareTint { fill: FILL, edge: Some(WHITE), icon: Rgb888::RED };
        let mask = IconMask::bus();
        draw_indicator_square(&mut canvas, &Bounds::new(0.0, 0.0, 100.0, 100.0), &tint, Some(&mask));

        let icon = canvas.lit_bounds(Rgb888::RED).expect("icon should be drawn");
        assert!(icon.top_left.x >= 10 && icon.top_left.y >= 10, "icon stays inside the square");
        assert!(canvas.count(WHITE) > 0, "edge should be stroked");
    }

    #[test]
    fn test_capsule_is_centered() {
        let mut canvas = Canvas::new(60, 60);
        draw_capsule(&mut canvas, 30.0, 30.0, 20.0, 40.0, Rgb888::RED, None);
        let lit = canvas.lit_bounds(Rgb888::RED).unwrap();
        assert_eq!(lit, Rectangle::new(Point::new(20, 10), Size::new(20, 40)));
        assert_eq!(canvas.pixel(20, 10), Some(BLACK), "corners are rounded");
    }

    #[test]
    fn test_hline_centered_on_y() {
        let mut canvas = Canvas::new(20, 20);
        draw_hline(&mut canvas, 2.0, 10.0, 10.0, 2.0, WHITE);
        assert_eq!(canvas.count(WHITE), 20);
        assert_eq!(canvas.pixel(2, 9), Some(WHITE));
        assert_eq!(canvas.pixel(2, 10), Some(WHITE));
        assert_eq!(canvas.pixel(2, 11), Some(BLACK));
    }

    #[test]
    fn test_zero_sizes_draw_nothing() {
        let mut canvas = Canvas::new(20, 20);
        draw_capsule(&mut canvas, 10.0, 10.0, 0.0, 10.0, WHITE, None);
        draw_hline(&mut canvas, 0.0, 10.0, 10.0, 0.0, WHITE);
        fill_bounds(&mut canvas, &Bounds::new(0.0, 0.0, 0.0, 5.0), WHITE);
        assert_eq!(canvas.count(WHITE), 0);
    }
}
