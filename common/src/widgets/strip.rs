//! Route strips and the gaps between them.
//!
//! A strip holds, left to right: the far and near approach squares, the
//! stacked route number, the via text, the stacked destination and the
//! status capsule. Content is clipped to the strip box and positioned from
//! the strip's content origin.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;

use super::Scene;
use super::primitives::{SquareTint, draw_capsule, draw_hline, draw_indicator_square, fill_bounds};
use crate::colors::{DEFAULT_LIT_ACCENT, OBSTACLE_RED, or_default};
use crate::document::RouteEntry;
use crate::geometry::Bounds;
use crate::icons::IconMask;
use crate::label::{Label, MAX_LABEL_LINES};
use crate::text::{StackMetrics, TextSlot, Typeface, draw_fitted};

// =============================================================================
// Row Metrics
// =============================================================================

/// Per-line-count font sizing, relative to the row height.
#[derive(Debug, Clone, Copy)]
struct StackRatios {
    font: f32,
    vertical_scale: f32,
    gap: f32,
}

impl StackRatios {
    const fn new(font: f32, vertical_scale: f32, gap: f32) -> Self {
        Self { font, vertical_scale, gap }
    }

    const fn metrics(&self, row_height: f32) -> StackMetrics {
        StackMetrics {
            font_size: self.font * row_height,
            vertical_scale: self.vertical_scale,
            line_gap: self.gap * row_height,
        }
    }
}

/// Route number: one, two and three lines.
const NUMBER_STACKS: [StackRatios; MAX_LABEL_LINES] = [
    StackRatios::new(0.81, 1.0, 0.0),
    StackRatios::new(0.65, 0.75, -0.075),
    StackRatios::new(0.5, 0.75, -0.05),
];

/// Destination: one, two and three lines.
const DESTINATION_STACKS: [StackRatios; MAX_LABEL_LINES] = [
    StackRatios::new(0.81, 1.0, 0.0),
    StackRatios::new(0.45, 1.0, -0.02),
    StackRatios::new(0.32, 1.0, -0.02),
];

const VIA_FONT_RATIO: f32 = 0.45;

/// Share of the number column the number is fitted into.
const NUMBER_AREA_RATIO: f32 = 0.9;

/// Status capsule size relative to the configured ellipse.
const STATUS_CAPSULE_RATIO: f32 = 0.75;

// =============================================================================
// Row Content
// =============================================================================

/// What one strip shows this frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowContent<'a> {
    /// `None` for an unused slot: the strip is drawn with no text.
    pub route: Option<&'a RouteEntry>,
    pub far_on: bool,
    pub near_on: bool,
    /// Host-selected row, filled with the active background.
    pub active: bool,
}

/// Fill the row area outside the strips for `rows` rows.
pub fn draw_gaps<D>(display: &mut D, scene: &Scene<'_>, rows: usize)
where
    D: DrawTarget<Color = Rgb888>,
{
    let color = or_default(scene.config.row.gap_background_color, scene.config.canvas.background_color.rgb());
    for region in scene.geometry.gap_regions(rows) {
        fill_bounds(display, &region, color);
    }
}

/// Draw the strip for slot `index`.
pub fn draw_row<D>(display: &mut D, scene: &Scene<'_>, index: usize, content: &RowContent<'_>, icon: Option<&IconMask>)
where
    D: DrawTarget<Color = Rgb888>,
{
    let row = &scene.config.row;
    let bounds = scene.geometry.row_bounds(index);

    let background = if content.active {
        or_default(row.active_background_color, row.background_color.rgb())
    } else {
        row.background_color.rgb()
    };
    fill_bounds(display, &bounds, background);
    draw_hline(display, bounds.x, bounds.y, bounds.width, row.border_width, row.border_color.rgb());
    draw_hline(display, bounds.x, bounds.bottom(), bounds.width, row.border_width, row.border_color.rgb());

    let clip = bounds.to_rectangle();
    let mut display = display.clipped(&clip);
    let origin = scene.geometry.strip.content_start;

    draw_approach_squares(&mut display, scene, origin, &bounds, content, icon);
    if let Some(route) = content.route {
        draw_number(&mut display, scene, origin, &bounds, &route.number());
        draw_via(&mut display, scene, origin, &bounds, route.via());
        draw_destination(&mut display, scene, origin, &bounds, &route.destination());
    }
    let obstacle = content.route.is_some_and(|route| route.obstacle);
    draw_status(&mut display, scene, origin, &bounds, obstacle);
}

fn draw_approach_squares<D>(
    display: &mut D,
    scene: &Scene<'_>,
    origin: f32,
    bounds: &Bounds,
    content: &RowContent<'_>,
    icon: Option<&IconMask>,
) where
    D: DrawTarget<Color = Rgb888>,
{
    let config = &scene.config.columns.approach;
    let column = scene.geometry.columns.approach;
    let size = bounds.height;
    let spacing = (column.width - size * 2.0) / 3.0;

    let lit = SquareTint {
        fill: or_default(config.on_fill_color, config.color.rgb()),
        edge: Some(or_default(config.on_edge_color, DEFAULT_LIT_ACCENT)),
        icon: or_default(config.on_icon_color, DEFAULT_LIT_ACCENT),
    };

    for (slot, on) in [content.far_on, content.near_on].into_iter().enumerate() {
        let x = origin + column.start + spacing + slot as f32 * (size + spacing);
        let cell = Bounds::new(x, bounds.center_y() - size / 2.0, size, size);
        let tint = if on { lit } else { SquareTint::UNLIT };
        draw_indicator_square(display, &cell, &tint, icon);
    }
}

/// Draw a stacked label with one fitted slot per line.
#[allow(clippy::too_many_arguments)]
fn draw_stacked<D>(
    display: &mut D,
    face: &Typeface,
    label: &Label,
    stacks: &[StackRatios; MAX_LABEL_LINES],
    row_height: f32,
    area: (f32, f32),
    center_y: f32,
    kerning: f32,
    color: Rgb888,
) where
    D: DrawTarget<Color = Rgb888>,
{
    let lines = label.line_count();
    if lines == 0 {
        return;
    }
    let metrics = stacks[lines - 1].metrics(row_height);
    let (left, width) = area;
    for (line, line_center) in label.lines().iter().zip(metrics.line_centers(lines, center_y)) {
        let slot = TextSlot::new(left, width, line_center, metrics.font_size)
            .with_kerning(kerning)
            .with_vertical_scale(metrics.vertical_scale);
        draw_fitted(display, face, line, &slot, color);
    }
}

fn draw_number<D>(display: &mut D, scene: &Scene<'_>, origin: f32, bounds: &Bounds, label: &Label)
where
    D: DrawTarget<Color = Rgb888>,
{
    let config = &scene.config.columns.number;
    let column = scene.geometry.columns.number;
    let width = column.width * NUMBER_AREA_RATIO;
    draw_stacked(
        display,
        &scene.fonts.heavy,
        label,
        &NUMBER_STACKS,
        bounds.height,
        (origin + column.center - width / 2.0, width),
        bounds.center_y(),
        config.kerning,
        config.color.rgb(),
    );
}

fn draw_via<D>(display: &mut D, scene: &Scene<'_>, origin: f32, bounds: &Bounds, text: &str)
where
    D: DrawTarget<Color = Rgb888>,
{
    let config = &scene.config.columns.via;
    let column = scene.geometry.columns.via;
    let slot = TextSlot::new(
        origin + column.start + config.padding_left,
        column.width - config.padding_left * 2.0,
        bounds.center_y(),
        bounds.height * VIA_FONT_RATIO,
    );
    draw_fitted(display, &scene.fonts.rounded, text, &slot, config.color.rgb());
}

fn draw_destination<D>(display: &mut D, scene: &Scene<'_>, origin: f32, bounds: &Bounds, label: &Label)
where
    D: DrawTarget<Color = Rgb888>,
{
    let config = &scene.config.columns.destination;
    let column = scene.geometry.columns.destination;
    draw_stacked(
        display,
        &scene.fonts.heavy,
        label,
        &DESTINATION_STACKS,
        bounds.height,
        (origin + column.start + config.padding_left, column.width - config.padding_left * 2.0),
        bounds.center_y(),
        0.0,
        config.color.rgb(),
    );
}

fn draw_status<D>(display: &mut D, scene: &Scene<'_>, origin: f32, bounds: &Bounds, obstacle: bool)
where
    D: DrawTarget<Color = Rgb888>,
{
    let config = &scene.config.columns.status;
    let column = scene.geometry.columns.status;
    let fill = if obstacle { OBSTACLE_RED } else { config.color.rgb() };
    draw_capsule(
        display,
        origin + column.center,
        bounds.center_y(),
        config.ellipse_width * STATUS_CAPSULE_RATIO,
        config.ellipse_height * STATUS_CAPSULE_RATIO,
        fill,
        Some(config.border_color.rgb()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::{BLACK, UNLIT_SQUARE, WHITE};
    use crate::config::LayoutConfig;
    use crate::geometry::SceneGeometry;
    use crate::testing::{Canvas, sample_config};
    use crate::text::FontBook;

    const ROW_FILL: Rgb888 = Rgb888::new(0x1a, 0x1a, 0x1a);
    const APPROACH_ON: Rgb888 = Rgb888::new(0x4d, 0x98, 0x4d);

    fn route() -> RouteEntry {
        RouteEntry {
            number_upper: "18".into(),
            destination_upper: "駅西口".into(),
            sub_destination: "武蔵".into(),
            ..RouteEntry::default()
        }
    }

    fn draw_with(config: &LayoutConfig, index: usize, content: &RowContent<'_>) -> Canvas {
        let geometry = SceneGeometry::new(config).unwrap();
        let fonts = FontBook::new();
        let scene = Scene { config, geometry: &geometry, fonts: &fonts };
        let mut canvas = Canvas::new(1520, 960);
        draw_row(&mut canvas, &scene, index, content, None);
        canvas
    }

    fn draw(index: usize, content: &RowContent<'_>) -> Canvas {
        draw_with(&sample_config(), index, content)
    }

    #[test]
    fn test_strip_fills_row_box() {
        let route = route();
        let canvas = draw(1, &RowContent { route: Some(&route), ..RowContent::default() });
        // Row 1 spans y 300..380, strip x 10..1090.
        assert_eq!(canvas.pixel(11, 340), Some(ROW_FILL), "inside the strip");
        assert_eq!(canvas.pixel(5, 340), Some(BLACK), "left of the strip");
        assert_eq!(canvas.pixel(11, 296), Some(BLACK), "above the top border");
        assert_eq!(canvas.pixel(11, 384), Some(BLACK), "below the bottom border");
    }

    #[test]
    fn test_text_is_drawn_inside_strip() {
        let route = route();
        let canvas = draw(0, &RowContent { route: Some(&route), ..RowContent::default() });
        let text = canvas.lit_bounds(WHITE).expect("route text should draw white pixels");
        assert!(text.top_left.y >= 210, "text stays inside the strip");
        assert!(text.bottom_right().unwrap().y < 290);
    }

    #[test]
    fn test_obstacle_lights_status_red() {
        let mut route = route();
        route.obstacle = true;
        let lit = draw(0, &RowContent { route: Some(&route), ..RowContent::default() });
        assert!(lit.count(OBSTACLE_RED) > 0, "obstacle should light the lamp");

        route.obstacle = false;
        let unlit = draw(0, &RowContent { route: Some(&route), ..RowContent::default() });
        assert_eq!(unlit.count(OBSTACLE_RED), 0);
        let lamp = Rgb888::new(0x33, 0x33, 0x33);
        // Status center x = 10 + 1050, row center y = 250.
        assert_eq!(unlit.pixel(1060, 250), Some(lamp));
    }

    #[test]
    fn test_approach_squares_follow_blink_state() {
        let far_only = draw(0, &RowContent { far_on: true, ..RowContent::default() });
        let lit = far_only.lit_bounds(APPROACH_ON).expect("far square should be lit");
        assert!(lit.top_left.x < 110, "far square is the left one");
        assert!(far_only.count(UNLIT_SQUARE) > 0, "near square stays unlit");

        let dark = draw(0, &RowContent::default());
        assert_eq!(dark.count(APPROACH_ON), 0);
    }

    #[test]
    fn test_absent_slot_draws_no_text() {
        let canvas = draw(2, &RowContent::default());
        assert_eq!(canvas.pixel(20, 430), Some(ROW_FILL), "strip is still drawn");
        assert_eq!(canvas.count(OBSTACLE_RED), 0);
        // White only comes from the unlit square edges and icons.
        let white = canvas.lit_bounds(WHITE).unwrap();
        assert!(white.bottom_right().unwrap().x < 10 + 200, "no text outside the approach column");
    }

    #[test]
    fn test_active_row_uses_active_color() {
        let mut config = sample_config();
        let active = Rgb888::new(0x20, 0x20, 0x60);
        config.row.active_background_color = Some(crate::colors::HexColor(active));
        let canvas = draw_with(&config, 0, &RowContent { active: true, ..RowContent::default() });
        assert_eq!(canvas.pixel(11, 250), Some(active));
    }

    #[test]
    fn test_gaps_use_canvas_background_by_default() {
        let config = sample_config();
        let geometry = SceneGeometry::new(&config).unwrap();
        let fonts = FontBook::new();
        let scene = Scene { config: &config, geometry: &geometry, fonts: &fonts };
        let mut canvas = Canvas::new(1520, 960);
        canvas.fill_solid(&canvas.bounding_box(), WHITE).ok();
        draw_gaps(&mut canvas, &scene, 2);
        assert_eq!(canvas.pixel(500, 205), Some(BLACK), "first gap");
        assert_eq!(canvas.pixel(500, 295), Some(BLACK), "gap between rows");
        assert_eq!(canvas.pixel(500, 250), Some(WHITE), "rows are left alone");
        assert_eq!(canvas.pixel(1200, 205), Some(WHITE), "side panel is left alone");
    }
}
