//! Typefaces used on the sign.
//!
//! Japanese labels use the u8g2 `b16` faces, which cover kana, common
//! kanji and ASCII in a 16px cell. The English stop name uses ProFont.
//! Both are bitmap faces drawn through [`ScaledCanvas`], so a face is a
//! shape source and the font size is only a scale factor.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use u8g2_fonts::FontRenderer;
use u8g2_fonts::fonts;
use u8g2_fonts::types::{FontColor, VerticalPosition};

use super::fitter::GlyphMetrics;
use super::scaled::ScaledCanvas;

/// Native cell height of the u8g2 `b16` faces.
const BITMAP_EM: f32 = 16.0;

/// Advance used for glyphs a face cannot render, as a fraction of the em.
const MISSING_GLYPH_ADVANCE: f32 = 0.5;

static HEAVY_FACE: FontRenderer =
    FontRenderer::new::<fonts::u8g2_font_b16_b_t_japanese3>().with_ignore_unknown_chars(true);
static ROUNDED_FACE: FontRenderer =
    FontRenderer::new::<fonts::u8g2_font_b16_t_japanese3>().with_ignore_unknown_chars(true);

#[derive(Clone, Copy)]
pub enum Typeface {
    Bitmap {
        renderer: &'static FontRenderer,
        /// Native pixel height the renderer draws at.
        em: f32,
    },
    Mono(&'static MonoFont<'static>),
}

/// Where and how large a single glyph is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBox {
    pub left: f32,
    pub center_y: f32,
    pub font_size: f32,
    pub scale_x: f32,
    pub vertical_scale: f32,
}

impl Typeface {
    pub fn heavy() -> Self {
        Self::Bitmap { renderer: &HEAVY_FACE, em: BITMAP_EM }
    }

    pub fn rounded() -> Self {
        Self::Bitmap { renderer: &ROUNDED_FACE, em: BITMAP_EM }
    }

    pub const fn latin() -> Self {
        Self::Mono(&profont::PROFONT_24_POINT)
    }

    /// Native cell height in source pixels.
    fn native_height(&self) -> f32 {
        match self {
            Self::Bitmap { em, .. } => *em,
            Self::Mono(font) => font.character_size.height as f32,
        }
    }

    /// Draw one glyph with its left edge at `glyph_box.left`, vertically
    /// centered on `glyph_box.center_y`.
    pub fn draw_glyph<D>(&self, target: &mut D, glyph: &str, glyph_box: &GlyphBox, color: Rgb888)
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let native = self.native_height();
        if native <= 0.0 || glyph_box.font_size <= 0.0 {
            return;
        }
        let unit = glyph_box.font_size / native;
        let scale_x = unit * glyph_box.scale_x;
        let scale_y = unit * glyph_box.vertical_scale;
        let top = glyph_box.center_y - native * scale_y / 2.0;
        let mut canvas = ScaledCanvas::new(target, glyph_box.left, top, scale_x, scale_y);

        match self {
            Self::Bitmap { renderer, .. } => {
                renderer
                    .render(glyph, Point::zero(), VerticalPosition::Top, FontColor::Transparent(color), &mut canvas)
                    .ok();
            }
            Self::Mono(font) => {
                Text::with_baseline(glyph, Point::zero(), MonoTextStyle::new(font, color), Baseline::Top)
                    .draw(&mut canvas)
                    .ok();
            }
        }
    }
}

impl GlyphMetrics for Typeface {
    fn advance(&self, glyph: &str, font_size: f32) -> f32 {
        let native = self.native_height();
        if native <= 0.0 {
            return 0.0;
        }
        let source_advance = match self {
            Self::Bitmap { renderer, em } => {
                let advance = renderer
                    .get_rendered_dimensions(glyph, Point::zero(), VerticalPosition::Top)
                    .map_or(0, |dims| dims.advance.x);
                if advance > 0 { advance as f32 } else { em * MISSING_GLYPH_ADVANCE }
            }
            Self::Mono(font) => {
                let cells = glyph.chars().count() as f32;
                cells * (font.character_size.width + font.character_spacing) as f32
            }
        };
        source_advance * font_size / native
    }
}

/// The three faces a scene draws with.
#[derive(Clone, Copy)]
pub struct FontBook {
    /// Bold face for route numbers, destinations and stop names.
    pub heavy: Typeface,
    /// Regular face for via text, captions and legend text.
    pub rounded: Typeface,
    /// Latin-only face for the English stop name.
    pub latin: Typeface,
}

impl FontBook {
    pub fn new() -> Self {
        Self {
            heavy: Typeface::heavy(),
            rounded: Typeface::rounded(),
            latin: Typeface::latin(),
        }
    }
}

impl Default for FontBook {
    fn default() -> Self {
        Self::new()
    }
}
