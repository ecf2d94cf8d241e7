//! Side panel: indicator legend and stop information.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use super::Scene;
use super::primitives::{SquareTint, draw_capsule, draw_indicator_square, fill_bounds};
use crate::colors::{DEFAULT_LIT_ACCENT, LEGEND_EDGE_FILL, LEGEND_LIT_FILL, OBSTACLE_RED, WHITE, or_default};
use crate::config::{LegendConfig, LegendMark};
use crate::document::StopInfo;
use crate::geometry::Bounds;
use crate::icons::IconMask;
use crate::label::Label;
use crate::text::{TextSlot, Typeface, draw_fitted, draw_natural_centered, natural_width};

/// Line pitch of multi-line legend text, relative to its font size.
const LEGEND_LINE_HEIGHT: f32 = 1.2;

/// How much the legend shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendStyle {
    /// Plain squares, no "other routes" message.
    Basic,
    /// Tinted icons in the squares and the "other routes" message.
    #[default]
    Enriched,
}

impl LegendStyle {
    const fn shows_icons(self) -> bool {
        matches!(self, Self::Enriched)
    }

    const fn shows_message(self) -> bool {
        matches!(self, Self::Enriched)
    }
}

/// Draw the side panel over its full height.
pub fn draw_side_panel<D>(display: &mut D, scene: &Scene<'_>, stop: &StopInfo, style: LegendStyle, icon: Option<&IconMask>)
where
    D: DrawTarget<Color = Rgb888>,
{
    let panel_config = &scene.config.side_panel;
    let legend = &panel_config.legend;
    let panel = &scene.geometry.side_panel;
    let fonts = scene.fonts;

    fill_bounds(display, &panel.panel, panel_config.background_color.rgb());

    let icon = icon.filter(|_| style.shows_icons());
    for (item, slot) in legend.items.iter().zip(&panel.legend) {
        if let Some(left) = item.left {
            draw_mark(display, legend, left, &slot.left_mark, icon);
        }
        draw_mark(display, legend, item.right, &slot.right_mark, icon);

        let text = Label::parse_marked(&item.text);
        let line_height = legend.text_font_size * LEGEND_LINE_HEIGHT;
        let first = slot.text_center_y - line_height * text.line_count() as f32 / 2.0 + line_height / 2.0;
        for (index, line) in text.lines().iter().enumerate() {
            draw_kerned(
                display,
                &fonts.rounded,
                line,
                slot.text_left,
                first + index as f32 * line_height,
                legend.text_font_size,
                legend.text_kerning,
                legend.text_color.rgb(),
            );
        }
    }

    if style.shows_message() {
        let message = &legend.other_routes_message;
        draw_kerned(
            display,
            &fonts.rounded,
            &message.text,
            panel.content_left,
            panel.other_routes_center_y,
            message.font_size,
            legend.text_kerning,
            message.color.rgb(),
        );
    }

    // Stop information
    let info = &legend.stop_info;
    let color = info.text_color.rgb();
    for (name, center_y) in [&stop.name_upper, &stop.name_lower].into_iter().zip(panel.name_line_centers) {
        let slot = TextSlot::new(panel.content_left, panel.name_width, center_y, info.name_font_size);
        draw_fitted(display, &fonts.heavy, name, &slot, color);
    }
    draw_natural_centered(
        display,
        &fonts.heavy,
        &stop.number,
        panel.number_center_x,
        panel.number_center_y,
        info.number_font_size,
        color,
    );

    let platform = TextSlot::new(panel.content_left, panel.content_width, panel.platform_center_y, info.platform_font_size);
    draw_fitted(display, &fonts.rounded, &stop.platform_name, &platform, color);
    let english = TextSlot::new(panel.content_left, panel.content_width, panel.english_center_y, info.english_font_size);
    draw_fitted(display, &fonts.latin, &stop.english, &english, color);
}

fn draw_mark<D>(display: &mut D, legend: &LegendConfig, mark: LegendMark, cell: &Bounds, icon: Option<&IconMask>)
where
    D: DrawTarget<Color = Rgb888>,
{
    let tint = match mark {
        LegendMark::Lit => SquareTint {
            fill: or_default(legend.on_fill_color, LEGEND_LIT_FILL),
            edge: Some(or_default(legend.on_edge_color, DEFAULT_LIT_ACCENT)),
            icon: or_default(legend.on_icon_color, DEFAULT_LIT_ACCENT),
        },
        LegendMark::Edge => SquareTint { fill: LEGEND_EDGE_FILL, edge: Some(WHITE), icon: WHITE },
        LegendMark::Obstacle => {
            let ratios = legend.obstacle_capsule;
            draw_capsule(
                display,
                cell.center_x(),
                cell.center_y(),
                cell.width * ratios.width_ratio,
                cell.height * ratios.height_ratio,
                OBSTACLE_RED,
                None,
            );
            return;
        }
    };
    draw_indicator_square(display, cell, &tint, icon);
}

/// Draw `text` left-aligned at its natural width with kerning applied.
#[allow(clippy::too_many_arguments)]
fn draw_kerned<D>(
    display: &mut D,
    face: &Typeface,
    text: &str,
    left: f32,
    center_y: f32,
    font_size: f32,
    kerning: f32,
    color: Rgb888,
) where
    D: DrawTarget<Color = Rgb888>,
{
    let width = natural_width(face, text, font_size, kerning);
    let slot = TextSlot::new(left, width, center_y, font_size).with_kerning(kerning);
    draw_fitted(display, face, text, &slot, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::Rectangle;

    use crate::colors::BLACK;
    use crate::geometry::SceneGeometry;
    use crate::testing::{Canvas, sample_config};
    use crate::text::FontBook;

    const PANEL_FILL: Rgb888 = Rgb888::new(0x10, 0x10, 0x10);
    const MESSAGE: Rgb888 = Rgb888::new(0xff, 0xff, 0x00);

    fn stop() -> StopInfo {
        StopInfo {
            name_upper: "広坂".into(),
            name_lower: "美術館".into(),
            number: "1".into(),
            platform_name: "のりば".into(),
            english: "Hirosaka".into(),
        }
    }

    fn render(style: LegendStyle, icon: Option<&IconMask>) -> Canvas {
        let config = sample_config();
        let geometry = SceneGeometry::new(&config).unwrap();
        let fonts = FontBook::new();
        let scene = Scene { config: &config, geometry: &geometry, fonts: &fonts };
        let mut canvas = Canvas::new(1520, 960);
        draw_side_panel(&mut canvas, &scene, &stop(), style, icon);
        canvas
    }

    #[test]
    fn test_panel_fills_right_edge() {
        let canvas = render(LegendStyle::Enriched, None);
        assert_eq!(canvas.pixel(1105, 5), Some(PANEL_FILL), "panel starts at x 1100");
        assert_eq!(canvas.pixel(1515, 955), Some(PANEL_FILL), "panel runs to the bottom");
        assert_eq!(canvas.pixel(1095, 5), Some(BLACK), "row area is untouched");
    }

    #[test]
    fn test_legend_marks() {
        let canvas = render(LegendStyle::Basic, None);
        assert!(canvas.count(LEGEND_LIT_FILL) > 0, "lit legend squares");
        assert!(canvas.count(LEGEND_EDGE_FILL) > 0, "edge-only legend squares");
        let capsule = canvas.lit_bounds(OBSTACLE_RED).expect("obstacle capsule");
        // Fourth item: top 40 + 2 * 70 + 90 = 270, square at 280, right column
        // x 1168, so a 30x36 capsule centered on (1188, 300).
        assert_eq!(capsule, Rectangle::new(Point::new(1173, 282), Size::new(30, 36)));
    }

    #[test]
    fn test_message_only_when_enriched() {
        let basic = render(LegendStyle::Basic, None);
        let enriched = render(LegendStyle::Enriched, None);
        assert_eq!(basic.count(MESSAGE), 0, "basic legend has no message");
        assert!(enriched.count(MESSAGE) > 0, "enriched legend shows the message");
    }

    #[test]
    fn test_icons_only_when_enriched() {
        let mask = IconMask::bus();
        let basic = render(LegendStyle::Basic, Some(&mask));
        let enriched = render(LegendStyle::Enriched, Some(&mask));
        assert!(
            enriched.count(DEFAULT_LIT_ACCENT) > basic.count(DEFAULT_LIT_ACCENT),
            "enriched legend tints icons in lit squares"
        );
    }

    #[test]
    fn test_stop_info_is_drawn_below_legend() {
        let canvas = render(LegendStyle::Basic, None);
        let config = sample_config();
        let geometry = SceneGeometry::new(&config).unwrap();
        let top = geometry.side_panel.name_line_centers[0] - 36.0;
        let text = canvas.lit_bounds(WHITE).expect("white text is drawn");
        assert!(text.bottom_right().unwrap().y as f32 > top, "stop info sits under the legend");
    }
}
