//! Layout configuration tree.
//!
//! Mirrors `layout.json`. Required geometry has no serde default so a
//! layout missing a width or height fails at load. Optional colors stay
//! `Option` and are resolved against the palette fallbacks in
//! [`crate::colors`] at draw time.

use serde::Deserialize;

use crate::colors::HexColor;
use crate::error::ConfigError;

// =============================================================================
// Defaults
// =============================================================================

/// Inter-glyph kerning for route numbers, as a fraction of font size.
pub const DEFAULT_NUMBER_KERNING: f32 = -0.08;

/// Obstacle capsule in the legend, relative to the square size.
pub const DEFAULT_CAPSULE_WIDTH_RATIO: f32 = 0.75;
pub const DEFAULT_CAPSULE_HEIGHT_RATIO: f32 = 0.9;

pub const DEFAULT_OTHER_ROUTES_TEXT: &str = "左記以外の路線は表示してありません";

fn default_number_kerning() -> f32 {
    DEFAULT_NUMBER_KERNING
}

fn default_other_routes_text() -> String {
    DEFAULT_OTHER_ROUTES_TEXT.to_owned()
}

// =============================================================================
// Root
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub canvas: CanvasConfig,
    pub header: HeaderConfig,
    pub row: RowConfig,
    pub columns: ColumnsConfig,
    pub side_panel: SidePanelConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Informational only. The scene width is always derived from the columns.
    #[serde(default)]
    pub width: Option<f32>,
    pub height: f32,
    pub background_color: HexColor,
}

// =============================================================================
// Header
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderConfig {
    pub height: f32,
    #[serde(default)]
    pub background_color: Option<HexColor>,
    pub label: HeaderLabelConfig,
    pub description: DescriptionConfig,
    pub column_headers: ColumnHeadersConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderLabelConfig {
    pub font_size: f32,
    pub padding_x: f32,
    pub padding_y: f32,
    pub background_color: HexColor,
    pub text_color: HexColor,
    #[serde(default)]
    pub border_color: Option<HexColor>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionConfig {
    pub font_size: f32,
    pub margin_top: f32,
    #[serde(default)]
    pub square_on_color: Option<HexColor>,
    #[serde(default)]
    pub square_on_icon_color: Option<HexColor>,
    #[serde(default)]
    pub square_on_edge_color: Option<HexColor>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnHeadersConfig {
    pub margin_top: f32,
    pub color: HexColor,
    pub font_size: f32,
    pub small_font_size: f32,
    #[serde(default)]
    pub top_line: Option<TopLineConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopLineConfig {
    pub color: HexColor,
    pub line_width: f32,
    pub y: f32,
}

// =============================================================================
// Rows
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowConfig {
    pub height: f32,
    pub gap: f32,
    /// Inset between the row area edge and the strip content.
    #[serde(default)]
    pub horizontal_gap: f32,
    pub background_color: HexColor,
    /// Fill for the row the host has selected, if any.
    #[serde(default)]
    pub active_background_color: Option<HexColor>,
    pub border_color: HexColor,
    pub border_width: f32,
    #[serde(default)]
    pub gap_background_color: Option<HexColor>,
}

// =============================================================================
// Columns
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsConfig {
    pub widths: ColumnWidths,
    pub spacing: ColumnSpacing,
    #[serde(alias = "led")]
    pub status: StatusColumnConfig,
    #[serde(alias = "greenSquares")]
    pub approach: ApproachColumnConfig,
    pub number: NumberColumnConfig,
    pub via: TextColumnConfig,
    pub destination: TextColumnConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnWidths {
    #[serde(alias = "greenSquares")]
    pub approach: f32,
    pub number: f32,
    pub via: f32,
    pub destination: f32,
    #[serde(alias = "led")]
    pub status: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpacing {
    pub after_approach: f32,
    pub after_number: f32,
    pub after_via: f32,
    pub after_destination: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusColumnConfig {
    /// Trailing space after the status column, counted into the total width.
    pub padding_right: f32,
    pub ellipse_width: f32,
    pub ellipse_height: f32,
    pub color: HexColor,
    pub border_color: HexColor,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproachColumnConfig {
    pub color: HexColor,
    #[serde(default)]
    pub on_fill_color: Option<HexColor>,
    #[serde(default)]
    pub on_icon_color: Option<HexColor>,
    #[serde(default)]
    pub on_edge_color: Option<HexColor>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberColumnConfig {
    pub color: HexColor,
    #[serde(default = "default_number_kerning")]
    pub kerning: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextColumnConfig {
    pub color: HexColor,
    pub padding_left: f32,
}

// =============================================================================
// Side Panel
// =============================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SidePanelConfig {
    pub width: f32,
    pub padding: f32,
    pub background_color: HexColor,
    pub legend: LegendConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendConfig {
    pub margin_top: f32,
    pub square_size: f32,
    pub item_height: f32,
    pub item_gap: f32,
    /// Gap between the third item and the obstacle item.
    pub gap_before_obstacle: f32,
    pub square_gap: f32,
    pub text_color: HexColor,
    pub text_font_size: f32,
    #[serde(default)]
    pub text_kerning: f32,
    pub text_margin_left: f32,
    #[serde(default)]
    pub on_fill_color: Option<HexColor>,
    #[serde(default)]
    pub on_icon_color: Option<HexColor>,
    #[serde(default)]
    pub on_edge_color: Option<HexColor>,
    #[serde(default)]
    pub obstacle_capsule: CapsuleRatios,
    pub other_routes_message: OtherRoutesConfig,
    #[serde(default = "default_legend_items")]
    pub items: Vec<LegendItemConfig>,
    pub stop_info: StopInfoConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapsuleRatios {
    pub width_ratio: f32,
    pub height_ratio: f32,
}

impl Default for CapsuleRatios {
    fn default() -> Self {
        Self {
            width_ratio: DEFAULT_CAPSULE_WIDTH_RATIO,
            height_ratio: DEFAULT_CAPSULE_HEIGHT_RATIO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherRoutesConfig {
    pub margin_top: f32,
    pub font_size: f32,
    pub color: HexColor,
    #[serde(default = "default_other_routes_text")]
    pub text: String,
}

/// What a legend slot shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LegendMark {
    /// Lit square.
    Lit,
    /// Unlit square drawn as an outline.
    Edge,
    /// Red status capsule.
    Obstacle,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendItemConfig {
    #[serde(default)]
    pub left: Option<LegendMark>,
    pub right: LegendMark,
    /// Legend text. `<br>` splits it across lines.
    pub text: String,
}

fn default_legend_items() -> Vec<LegendItemConfig> {
    use LegendMark::{Edge, Lit, Obstacle};

    let item = |left, right, text: &str| LegendItemConfig { left, right, text: text.to_owned() };
    vec![
        item(Some(Lit), Edge, "２つ前の停留所を出ました。"),
        item(Some(Edge), Lit, "１つ前の停留所を出ました。"),
        item(Some(Lit), Lit, "続いてバスがきます。"),
        item(None, Obstacle, "障害のため、運休または<br>大幅な乱れが生じています。"),
    ]
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopInfoConfig {
    pub margin_top: f32,
    pub text_color: HexColor,
    pub name_font_size: f32,
    pub name_line_gap: f32,
    pub number_font_size: f32,
    pub platform_margin_top: f32,
    pub platform_font_size: f32,
    pub english_margin_top: f32,
    pub english_font_size: f32,
}

// =============================================================================
// Validation
// =============================================================================

/// Reject a geometry value that is negative, NaN or infinite.
pub(crate) fn non_negative(field: &str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidGeometry { field: field.to_owned(), value })
    }
}

/// Reject a ratio or signed offset that is NaN or infinite.
pub(crate) fn finite(field: &str, value: f32) -> Result<f32, ConfigError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigError::InvalidGeometry { field: field.to_owned(), value })
    }
}

impl LayoutConfig {
    /// Check every geometry value, failing on the first bad one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(width) = self.canvas.width {
            non_negative("canvas.width", width)?;
        }
        non_negative("canvas.height", self.canvas.height)?;

        let header = &self.header;
        non_negative("header.height", header.height)?;
        non_negative("header.label.fontSize", header.label.font_size)?;
        non_negative("header.label.paddingX", header.label.padding_x)?;
        non_negative("header.label.paddingY", header.label.padding_y)?;
        non_negative("header.description.fontSize", header.description.font_size)?;
        finite("header.description.marginTop", header.description.margin_top)?;
        finite("header.columnHeaders.marginTop", header.column_headers.margin_top)?;
        non_negative("header.columnHeaders.fontSize", header.column_headers.font_size)?;
        non_negative("header.columnHeaders.smallFontSize", header.column_headers.small_font_size)?;
        if let Some(line) = &header.column_headers.top_line {
            non_negative("header.columnHeaders.topLine.lineWidth", line.line_width)?;
            non_negative("header.columnHeaders.topLine.y", line.y)?;
        }

        let row = &self.row;
        non_negative("row.height", row.height)?;
        non_negative("row.gap", row.gap)?;
        non_negative("row.horizontalGap", row.horizontal_gap)?;
        non_negative("row.borderWidth", row.border_width)?;

        self.columns.validate()?;

        let panel = &self.side_panel;
        non_negative("sidePanel.width", panel.width)?;
        non_negative("sidePanel.padding", panel.padding)?;
        panel.legend.validate()
    }
}

impl ColumnsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.widths;
        non_negative("columns.widths.approach", w.approach)?;
        non_negative("columns.widths.number", w.number)?;
        non_negative("columns.widths.via", w.via)?;
        non_negative("columns.widths.destination", w.destination)?;
        non_negative("columns.widths.status", w.status)?;

        let s = &self.spacing;
        non_negative("columns.spacing.afterApproach", s.after_approach)?;
        non_negative("columns.spacing.afterNumber", s.after_number)?;
        non_negative("columns.spacing.afterVia", s.after_via)?;
        non_negative("columns.spacing.afterDestination", s.after_destination)?;

        non_negative("columns.status.paddingRight", self.status.padding_right)?;
        non_negative("columns.status.ellipseWidth", self.status.ellipse_width)?;
        non_negative("columns.status.ellipseHeight", self.status.ellipse_height)?;
        finite("columns.number.kerning", self.number.kerning)?;
        non_negative("columns.via.paddingLeft", self.via.padding_left)?;
        non_negative("columns.destination.paddingLeft", self.destination.padding_left)?;
        Ok(())
    }
}

impl LegendConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        non_negative("sidePanel.legend.marginTop", self.margin_top)?;
        non_negative("sidePanel.legend.squareSize", self.square_size)?;
        non_negative("sidePanel.legend.itemHeight", self.item_height)?;
        non_negative("sidePanel.legend.itemGap", self.item_gap)?;
        non_negative("sidePanel.legend.gapBeforeObstacle", self.gap_before_obstacle)?;
        non_negative("sidePanel.legend.squareGap", self.square_gap)?;
        non_negative("sidePanel.legend.textFontSize", self.text_font_size)?;
        finite("sidePanel.legend.textKerning", self.text_kerning)?;
        non_negative("sidePanel.legend.textMarginLeft", self.text_margin_left)?;
        non_negative("sidePanel.legend.obstacleCapsule.widthRatio", self.obstacle_capsule.width_ratio)?;
        non_negative("sidePanel.legend.obstacleCapsule.heightRatio", self.obstacle_capsule.height_ratio)?;
        finite("sidePanel.legend.otherRoutesMessage.marginTop", self.other_routes_message.margin_top)?;
        non_negative("sidePanel.legend.otherRoutesMessage.fontSize", self.other_routes_message.font_size)?;

        let info = &self.stop_info;
        finite("sidePanel.legend.stopInfo.marginTop", info.margin_top)?;
        non_negative("sidePanel.legend.stopInfo.nameFontSize", info.name_font_size)?;
        finite("sidePanel.legend.stopInfo.nameLineGap", info.name_line_gap)?;
        non_negative("sidePanel.legend.stopInfo.numberFontSize", info.number_font_size)?;
        finite("sidePanel.legend.stopInfo.platformMarginTop", info.platform_margin_top)?;
        non_negative("sidePanel.legend.stopInfo.platformFontSize", info.platform_font_size)?;
        finite("sidePanel.legend.stopInfo.englishMarginTop", info.english_margin_top)?;
        non_negative("sidePanel.legend.stopInfo.englishFontSize", info.english_font_size)?;
        Ok(())
    }
}
