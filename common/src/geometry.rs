//! Scene anchors derived from the layout config.
//!
//! Everything in [`SceneGeometry`] depends only on config, so a renderer
//! computes it once and reuses it every frame. Coordinates are canvas
//! pixels as `f32`; widgets round when they hit the pixel grid.
//!
//! # Vertical Layout
//!
//! ```text
//! 0                header (label badge, description, captions)
//! header           gap
//! header+gap       row 0
//!                  gap
//!                  row 1 ...
//! ```
//!
//! `row_top(i) = header_height + gap + i * (row_height + gap)`
//!
//! # Horizontal Layout
//!
//! The row area is the canvas minus the side panel, and its width equals
//! the column total. Strips are centered in it; the status column's
//! trailing padding stays outside the strip.

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use tracing::warn;

use crate::columns::{ColumnPositions, compute_positions};
use crate::config::{LayoutConfig, LegendItemConfig, LegendMark};
use crate::error::ConfigError;

// =============================================================================
// Header Constants
// =============================================================================

/// Top-left corner of the header label badge.
pub const LABEL_X: f32 = 20.0;
pub const LABEL_Y: f32 = 20.0;

/// Left edge of the header description line.
pub const DESCRIPTION_X: f32 = 200.0;

/// Extra drop between the badge and the description.
const DESCRIPTION_DROP: f32 = 14.0;

/// Description font multipliers: layout height and drawn size.
const DESCRIPTION_LAYOUT_SCALE: f32 = 1.4;
const DESCRIPTION_DRAW_SCALE: f32 = 1.5;

/// Header status square bottom sits this far below the description line.
const SQUARE_BOTTOM_DROP: f32 = 15.0;

/// Gap between the header status square and the description.
const SQUARE_DESCRIPTION_GAP: f32 = 8.0;

/// Caption font multiplier.
const CAPTION_SCALE: f32 = 1.4;

// =============================================================================
// Side Panel Constants
// =============================================================================

/// Share of the stop-info width given to the two-line stop name. The stop
/// number takes the rest.
const STOP_NAME_SHARE: f32 = 0.7;

// =============================================================================
// Bounds
// =============================================================================

/// Axis-aligned box in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub const fn right(&self) -> f32 {
        self.x + self.width
    }

    pub const fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub const fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub const fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Snap to the pixel grid by rounding each edge.
    pub fn to_rectangle(&self) -> Rectangle {
        let x0 = self.x.round() as i32;
        let y0 = self.y.round() as i32;
        let x1 = self.right().round() as i32;
        let y1 = self.bottom().round() as i32;
        Rectangle::new(
            Point::new(x0, y0),
            Size::new((x1 - x0).max(0) as u32, (y1 - y0).max(0) as u32),
        )
    }
}

// =============================================================================
// Scene Geometry
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripGeometry {
    pub x: f32,
    pub width: f32,
    /// Left edge column positions are measured from.
    pub content_start: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderGeometry {
    pub label_left: f32,
    pub label_top: f32,
    pub description_left: f32,
    pub description_center_y: f32,
    pub description_font: f32,
    pub square: Bounds,
    pub captions_center_y: f32,
    /// Caption font sizes in column order.
    pub caption_fonts: [f32; 5],
}

/// Anchors of one legend entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendSlot {
    pub left_mark: Bounds,
    pub right_mark: Bounds,
    pub text_left: f32,
    pub text_width: f32,
    pub text_center_y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidePanelGeometry {
    pub panel: Bounds,
    pub content_left: f32,
    pub content_width: f32,
    pub legend: Vec<LegendSlot>,
    pub other_routes_center_y: f32,
    pub name_width: f32,
    pub name_line_centers: [f32; 2],
    pub number_center_x: f32,
    pub number_center_y: f32,
    pub platform_center_y: f32,
    pub english_center_y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneGeometry {
    pub columns: ColumnPositions,
    /// Canvas size: column total plus side panel, by configured height.
    pub width: f32,
    pub height: f32,
    /// Canvas width left of the side panel.
    pub row_area_width: f32,
    pub header_height: f32,
    pub row_height: f32,
    pub row_gap: f32,
    pub horizontal_gap: f32,
    pub strip: StripGeometry,
    pub header: HeaderGeometry,
    pub side_panel: SidePanelGeometry,
}

impl SceneGeometry {
    pub fn new(config: &LayoutConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let columns = compute_positions(&config.columns)?;

        let width = columns.total_width + config.side_panel.width;
        if let Some(configured) = config.canvas.width
            && (configured - width).abs() > 0.5
        {
            warn!(configured, computed = width, "canvas.width disagrees with the column layout, using computed width");
        }

        let row_area_width = width - config.side_panel.width;
        let horizontal_gap = config.row.horizontal_gap;
        let strip_width = columns.content_width() + horizontal_gap * 2.0;
        let strip_x = (row_area_width - strip_width) / 2.0;
        let strip = StripGeometry {
            x: strip_x,
            width: strip_width,
            content_start: strip_x + horizontal_gap,
        };

        Ok(Self {
            columns,
            width,
            height: config.canvas.height,
            row_area_width,
            header_height: config.header.height,
            row_height: config.row.height,
            row_gap: config.row.gap,
            horizontal_gap,
            strip,
            header: header_geometry(config),
            side_panel: side_panel_geometry(config, width),
        })
    }

    /// Canvas size in whole pixels.
    pub fn canvas_size(&self) -> Size {
        Size::new(self.width.round().max(0.0) as u32, self.height.round().max(0.0) as u32)
    }

    /// Top edge of row `index`.
    pub fn row_top(&self, index: usize) -> f32 {
        self.header_height + self.row_gap + index as f32 * (self.row_height + self.row_gap)
    }

    /// Strip box of row `index`.
    pub fn row_bounds(&self, index: usize) -> Bounds {
        Bounds::new(self.strip.x, self.row_top(index), self.strip.width, self.row_height)
    }

    /// Regions of the row area not covered by strips, for `rows` rows.
    pub fn gap_regions(&self, rows: usize) -> Vec<Bounds> {
        let area_top = self.header_height + self.row_gap;
        let area_height = if rows == 0 {
            0.0
        } else {
            rows as f32 * self.row_height + (rows - 1) as f32 * self.row_gap
        };

        let mut regions = vec![Bounds::new(0.0, self.header_height, self.row_area_width, self.row_gap)];
        regions.extend(
            (1..rows).map(|index| Bounds::new(0.0, self.row_top(index) - self.row_gap, self.row_area_width, self.row_gap)),
        );
        regions.push(Bounds::new(0.0, area_top, self.horizontal_gap, area_height));
        regions.push(Bounds::new(
            self.row_area_width - self.horizontal_gap,
            area_top,
            self.horizontal_gap,
            area_height,
        ));

        let area_bottom = area_top + area_height;
        if self.height > area_bottom {
            regions.push(Bounds::new(0.0, area_bottom, self.row_area_width, self.height - area_bottom));
        }
        regions.retain(|region| !region.is_empty());
        regions
    }
}

fn header_geometry(config: &LayoutConfig) -> HeaderGeometry {
    let header = &config.header;
    let label = &header.label;

    let description_top = LABEL_Y + label.font_size + label.padding_y * 2.0 + header.description.margin_top + DESCRIPTION_DROP;
    let description_layout_font = header.description.font_size * DESCRIPTION_LAYOUT_SCALE;
    let description_font = header.description.font_size * DESCRIPTION_DRAW_SCALE;

    let square_size = config.row.height;
    let square_bottom = description_top + description_layout_font + SQUARE_BOTTOM_DROP;
    let square = Bounds::new(
        DESCRIPTION_X - square_size - SQUARE_DESCRIPTION_GAP,
        square_bottom - square_size,
        square_size,
        square_size,
    );

    let captions = &header.column_headers;
    let large = captions.font_size * CAPTION_SCALE;
    let small = captions.small_font_size * CAPTION_SCALE;

    HeaderGeometry {
        label_left: LABEL_X,
        label_top: LABEL_Y,
        description_left: DESCRIPTION_X,
        description_center_y: description_top + description_font / 2.0,
        description_font,
        square,
        captions_center_y: description_top + description_layout_font + captions.margin_top,
        caption_fonts: [large, small, small, large, small],
    }
}

/// Vertical space taken by legend item `index` plus the gap after it.
fn legend_step(items: &[LegendItemConfig], index: usize, config: &LayoutConfig) -> f32 {
    let legend = &config.side_panel.legend;
    let next_is_obstacle = items.get(index + 1).is_some_and(|item| item.right == LegendMark::Obstacle);
    let gap = if next_is_obstacle { legend.gap_before_obstacle } else { legend.item_gap };
    legend.item_height + gap
}

fn side_panel_geometry(config: &LayoutConfig, canvas_width: f32) -> SidePanelGeometry {
    let panel_config = &config.side_panel;
    let legend = &panel_config.legend;
    let panel = Bounds::new(canvas_width - panel_config.width, 0.0, panel_config.width, config.canvas.height);

    let content_left = panel.x + panel_config.padding;
    let content_width = (panel_config.width - panel_config.padding * 2.0).max(0.0);
    let content_right = content_left + content_width;

    let size = legend.square_size;
    let left_square_x = content_left;
    let right_square_x = left_square_x + size + legend.square_gap;
    let text_left = right_square_x + size + legend.text_margin_left;

    let mut item_top = panel_config.padding + legend.margin_top;
    let mut slots = Vec::with_capacity(legend.items.len());
    for index in 0..legend.items.len() {
        let square_top = item_top + (legend.item_height - size) / 2.0;
        slots.push(LegendSlot {
            left_mark: Bounds::new(left_square_x, square_top, size, size),
            right_mark: Bounds::new(right_square_x, square_top, size, size),
            text_left,
            text_width: (content_right - text_left).max(0.0),
            text_center_y: item_top + legend.item_height / 2.0,
        });
        item_top += legend_step(&legend.items, index, config);
    }

    let info = &legend.stop_info;
    let name_top = item_top + info.margin_top;
    let name_block = info.name_font_size * 2.0 + info.name_line_gap;
    let name_center = name_top + name_block / 2.0;
    let line_offset = info.name_font_size / 2.0 + info.name_line_gap / 2.0;

    let name_width = content_width * STOP_NAME_SHARE;
    let platform_top = name_top + name_block + info.platform_margin_top;
    let english_top = platform_top + info.platform_font_size + info.english_margin_top;

    let message = &legend.other_routes_message;
    let message_top = name_top - message.margin_top - message.font_size;

    SidePanelGeometry {
        panel,
        content_left,
        content_width,
        legend: slots,
        other_routes_center_y: message_top + message.font_size / 2.0,
        name_width,
        name_line_centers: [name_center - line_offset, name_center + line_offset],
        number_center_x: content_left + name_width + (content_width - name_width) / 2.0,
        number_center_y: name_center,
        platform_center_y: platform_top + info.platform_font_size / 2.0,
        english_center_y: english_top + info.english_font_size / 2.0,
    }
}
