//! Header block: label badge, description, status square and captions.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use super::Scene;
use super::primitives::{SquareTint, draw_frame, draw_hline, draw_indicator_square, fill_bounds};
use crate::colors::{DEFAULT_SQUARE_ON, HEADER_LIT_ACCENT, WHITE, or_default};
use crate::document::HeaderText;
use crate::geometry::Bounds;
use crate::icons::IconMask;
use crate::text::{draw_natural, draw_natural_centered, natural_width};

/// Badge outline width.
const LABEL_BORDER: u32 = 2;

/// Draw the header across the row area.
///
/// `far_enabled` is the first route's far-blink flag. The status square
/// shows it as a steady lit or unlit square and never blinks.
pub fn draw_header<D>(display: &mut D, scene: &Scene<'_>, text: &HeaderText, far_enabled: bool, icon: Option<&IconMask>)
where
    D: DrawTarget<Color = Rgb888>,
{
    let config = &scene.config.header;
    let geometry = &scene.geometry.header;
    let fonts = scene.fonts;

    let background = or_default(config.background_color, scene.config.canvas.background_color.rgb());
    fill_bounds(
        display,
        &Bounds::new(0.0, 0.0, scene.geometry.row_area_width, config.height),
        background,
    );

    // Badge
    let label = &config.label;
    if !text.label.is_empty() {
        let text_width = natural_width(&fonts.heavy, &text.label, label.font_size, 0.0);
        let badge = Bounds::new(
            geometry.label_left,
            geometry.label_top,
            text_width + label.padding_x * 2.0,
            label.font_size + label.padding_y * 2.0,
        );
        fill_bounds(display, &badge, label.background_color.rgb());
        let border = or_default(label.border_color, label.text_color.rgb());
        draw_frame(display, &badge, border, LABEL_BORDER);
        draw_natural(
            display,
            &fonts.heavy,
            &text.label,
            badge.x + label.padding_x,
            badge.center_y(),
            label.font_size,
            label.text_color.rgb(),
        );
    }

    draw_natural(
        display,
        &fonts.rounded,
        &text.description,
        geometry.description_left,
        geometry.description_center_y,
        geometry.description_font,
        WHITE,
    );

    let description = &config.description;
    let tint = if far_enabled {
        SquareTint {
            fill: or_default(description.square_on_color, DEFAULT_SQUARE_ON),
            edge: Some(or_default(description.square_on_edge_color, HEADER_LIT_ACCENT)),
            icon: or_default(description.square_on_icon_color, HEADER_LIT_ACCENT),
        }
    } else {
        SquareTint::UNLIT
    };
    draw_indicator_square(display, &geometry.square, &tint, icon);

    // Captions
    let captions = &config.column_headers;
    let strip = &scene.geometry.strip;
    let spans = scene.geometry.columns.in_order();
    for ((caption, span), font_size) in text.column_headers.iter().zip(spans).zip(geometry.caption_fonts) {
        draw_natural_centered(
            display,
            &fonts.rounded,
            caption,
            strip.content_start + span.center,
            geometry.captions_center_y,
            font_size,
            captions.color.rgb(),
        );
    }

    if let Some(line) = &captions.top_line {
        draw_hline(display, strip.x, line.y, strip.width, line.line_width, line.color.rgb());
    }
}
