//! Text fitting and drawing.
//!
//! [`fitter`] decides where each glyph goes; [`fonts`] draws glyphs from
//! bitmap faces through the [`scaled`] adapter. The helpers here tie the
//! two together for widgets: fit a line into a slot and draw it, or draw a
//! line at its natural width.

pub mod fitter;
pub mod fonts;
pub mod scaled;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

pub use fitter::{FitParams, GlyphMetrics, LinePlan, PlacedGlyph, StackMetrics, layout_line, measure_line};
pub use fonts::{FontBook, GlyphBox, Typeface};
pub use scaled::ScaledCanvas;

/// A horizontal slot one line of text is fitted into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextSlot {
    pub left: f32,
    pub width: f32,
    pub center_y: f32,
    pub font_size: f32,
    pub kerning_ratio: f32,
    pub vertical_scale: f32,
}

impl TextSlot {
    pub const fn new(left: f32, width: f32, center_y: f32, font_size: f32) -> Self {
        Self {
            left,
            width,
            center_y,
            font_size,
            kerning_ratio: 0.0,
            vertical_scale: 1.0,
        }
    }

    /// Slot of `width` centered on `center_x`.
    pub const fn centered(center_x: f32, width: f32, center_y: f32, font_size: f32) -> Self {
        Self::new(center_x - width / 2.0, width, center_y, font_size)
    }

    #[must_use]
    pub const fn with_kerning(mut self, kerning_ratio: f32) -> Self {
        self.kerning_ratio = kerning_ratio;
        self
    }

    #[must_use]
    pub const fn with_vertical_scale(mut self, vertical_scale: f32) -> Self {
        self.vertical_scale = vertical_scale;
        self
    }

    pub const fn params(&self) -> FitParams {
        FitParams {
            area_width: self.width,
            font_size: self.font_size,
            kerning_ratio: self.kerning_ratio,
        }
    }
}

/// Draw a fitted plan into `slot`.
pub fn draw_plan<D>(target: &mut D, face: &Typeface, plan: &LinePlan<'_>, slot: &TextSlot, color: Rgb888)
where
    D: DrawTarget<Color = Rgb888>,
{
    let scale_x = plan.glyph_scale();
    for placed in &plan.glyphs {
        let glyph_box = GlyphBox {
            left: slot.left + placed.x,
            center_y: slot.center_y,
            font_size: slot.font_size,
            scale_x,
            vertical_scale: slot.vertical_scale,
        };
        face.draw_glyph(target, placed.glyph, &glyph_box, color);
    }
}

/// Fit `text` into `slot` and draw it. Empty text draws nothing.
pub fn draw_fitted<D>(target: &mut D, face: &Typeface, text: &str, slot: &TextSlot, color: Rgb888)
where
    D: DrawTarget<Color = Rgb888>,
{
    let plan = layout_line(text, &slot.params(), face);
    if plan.is_empty() {
        return;
    }
    draw_plan(target, face, &plan, slot, color);
}

/// Natural width of `text` in `face`.
pub fn natural_width(face: &Typeface, text: &str, font_size: f32, kerning_ratio: f32) -> f32 {
    measure_line(text, font_size, kerning_ratio, face)
}

/// Draw `text` at its natural width starting at `left`. Returns the width.
pub fn draw_natural<D>(
    target: &mut D,
    face: &Typeface,
    text: &str,
    left: f32,
    center_y: f32,
    font_size: f32,
    color: Rgb888,
) -> f32
where
    D: DrawTarget<Color = Rgb888>,
{
    let width = natural_width(face, text, font_size, 0.0);
    draw_fitted(target, face, text, &TextSlot::new(left, width, center_y, font_size), color);
    width
}

/// Draw `text` at its natural width centered on `center_x`.
pub fn draw_natural_centered<D>(
    target: &mut D,
    face: &Typeface,
    text: &str,
    center_x: f32,
    center_y: f32,
    font_size: f32,
    color: Rgb888,
) where
    D: DrawTarget<Color = Rgb888>,
{
    let width = natural_width(face, text, font_size, 0.0);
    draw_fitted(target, face, text, &TextSlot::centered(center_x, width, center_y, font_size), color);
}
