//! Compress-or-justify line fitting.
//!
//! Every label on the sign fills its slot exactly:
//!
//! - **Overflow**: the line keeps its natural spacing and is squeezed by a
//!   single horizontal scale factor `area / natural` about its center.
//! - **Fits**: the slack is shared out as extra space between glyphs so
//!   the first glyph starts at the left edge and the last one ends at the
//!   right edge.
//! - **Single glyph**: never scaled or stretched, just centered.
//!
//! Natural width is the sum of glyph advances plus `font_size * kerning`
//! between each pair; kerning may be negative.
//!
//! Glyphs are extended grapheme clusters, so combining marks stay with
//! their base character.

use heapless::Vec as StackVec;
use unicode_segmentation::UnicodeSegmentation;

use crate::label::MAX_LABEL_LINES;

/// Advance widths for a face at a given font size.
pub trait GlyphMetrics {
    fn advance(&self, glyph: &str, font_size: f32) -> f32;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitParams {
    pub area_width: f32,
    pub font_size: f32,
    pub kerning_ratio: f32,
}

/// One glyph of a fitted line. `x` and `advance` are final positions
/// relative to the area's left edge, with any compression applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacedGlyph<'t> {
    pub glyph: &'t str,
    pub x: f32,
    pub advance: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LinePlan<'t> {
    pub glyphs: Vec<PlacedGlyph<'t>>,
    pub natural_width: f32,
    /// Horizontal scale applied to every glyph, set only when compressed.
    pub scale_x: Option<f32>,
    /// Extra space inserted between glyphs when justified.
    pub spacing: f32,
    pub area_width: f32,
}

impl LinePlan<'_> {
    fn empty(area_width: f32) -> Self {
        Self {
            glyphs: Vec::new(),
            natural_width: 0.0,
            scale_x: None,
            spacing: 0.0,
            area_width,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyph_scale(&self) -> f32 {
        self.scale_x.unwrap_or(1.0)
    }

    /// Left edge of the first glyph and right edge of the last.
    pub fn span(&self) -> (f32, f32) {
        match (self.glyphs.first(), self.glyphs.last()) {
            (Some(first), Some(last)) => (first.x, last.x + last.advance),
            _ => (0.0, 0.0),
        }
    }

    pub fn rendered_width(&self) -> f32 {
        let (start, end) = self.span();
        end - start
    }
}

/// Natural width of `text` without fitting.
pub fn measure_line<M>(text: &str, font_size: f32, kerning_ratio: f32, metrics: &M) -> f32
where
    M: GlyphMetrics + ?Sized,
{
    let kerning = font_size * kerning_ratio;
    let mut count = 0usize;
    let mut total = 0.0f32;
    for glyph in text.graphemes(true) {
        total += metrics.advance(glyph, font_size).max(0.0);
        count += 1;
    }
    if count == 0 {
        return 0.0;
    }
    total + kerning * (count - 1) as f32
}

/// Fit one line of text into `params.area_width`.
///
/// Empty text or a non-positive area gives an empty plan.
pub fn layout_line<'t, M>(text: &'t str, params: &FitParams, metrics: &M) -> LinePlan<'t>
where
    M: GlyphMetrics + ?Sized,
{
    let area = params.area_width;
    if text.is_empty() || !area.is_finite() || area <= 0.0 {
        return LinePlan::empty(area);
    }

    let units: Vec<(&str, f32)> = text
        .graphemes(true)
        .map(|glyph| (glyph, metrics.advance(glyph, params.font_size).max(0.0)))
        .collect();

    let kerning = params.font_size * params.kerning_ratio;
    let gaps = units.len().saturating_sub(1) as f32;
    let natural: f32 = units.iter().map(|(_, advance)| advance).sum::<f32>() + kerning * gaps;

    let mut plan = LinePlan::empty(area);
    plan.natural_width = natural;

    if let [(glyph, advance)] = units.as_slice() {
        plan.glyphs.push(PlacedGlyph {
            glyph: *glyph,
            x: (area - advance) / 2.0,
            advance: *advance,
        });
        return plan;
    }

    if natural > area {
        let scale = area / natural;
        let mut pen = 0.0f32;
        for (glyph, advance) in units {
            plan.glyphs.push(PlacedGlyph {
                glyph,
                x: pen * scale,
                advance: advance * scale,
            });
            pen += advance + kerning;
        }
        plan.scale_x = Some(scale);
    } else {
        let spacing = (area - natural) / gaps;
        let mut pen = 0.0f32;
        for (glyph, advance) in units {
            plan.glyphs.push(PlacedGlyph { glyph, x: pen, advance });
            pen += advance + kerning + spacing;
        }
        plan.spacing = spacing;
    }
    plan
}

// =============================================================================
// Stacked Lines
// =============================================================================

/// Vertical metrics for a label whose lines stack inside one block.
///
/// Each line is `font_size * vertical_scale` tall and neighbours are
/// separated by `line_gap`, which is usually negative so the lines overlap
/// slightly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackMetrics {
    pub font_size: f32,
    pub vertical_scale: f32,
    pub line_gap: f32,
}

impl StackMetrics {
    pub const fn line_height(&self) -> f32 {
        self.font_size * self.vertical_scale
    }

    pub fn block_height(&self, lines: usize) -> f32 {
        if lines == 0 {
            return 0.0;
        }
        lines as f32 * self.line_height() + (lines - 1) as f32 * self.line_gap
    }

    /// Vertical centers of `lines` stacked lines centered on `block_center`.
    pub fn line_centers(&self, lines: usize, block_center: f32) -> StackVec<f32, MAX_LABEL_LINES> {
        let line_height = self.line_height();
        let top = block_center - self.block_height(lines) / 2.0;
        (0..lines.min(MAX_LABEL_LINES))
            .map(|i| top + i as f32 * (line_height + self.line_gap) + line_height / 2.0)
            .collect()
    }
}
