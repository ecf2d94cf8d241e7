//! Test fixtures: an in-memory canvas and a sample layout.

use std::convert::Infallible;

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics_simulator::SimulatorDisplay;

use crate::config::LayoutConfig;

/// Off-screen simulator display with pixel queries for assertions.
pub struct Canvas {
    display: SimulatorDisplay<Rgb888>,
}

impl Canvas {
    /// A black canvas of `width` by `height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            display: SimulatorDisplay::new(Size::new(width, height)),
        }
    }

    /// Pixel color, or `None` outside the canvas.
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb888> {
        let point = Point::new(x, y);
        self.bounding_box()
            .contains(point)
            .then(|| self.display.get_pixel(point))
    }

    pub fn count(&self, color: Rgb888) -> usize {
        self.bounding_box()
            .points()
            .filter(|&point| self.display.get_pixel(point) == color)
            .count()
    }

    /// Smallest rectangle containing every pixel of `color`.
    pub fn lit_bounds(&self, color: Rgb888) -> Option<Rectangle> {
        let mut corners: Option<(Point, Point)> = None;
        for point in self.bounding_box().points() {
            if self.display.get_pixel(point) != color {
                continue;
            }
            corners = Some(match corners {
                Some((min, max)) => (min.component_min(point), max.component_max(point)),
                None => (point, point),
            });
        }
        corners.map(|(min, max)| Rectangle::with_corners(min, max))
    }
}

impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        self.display.size()
    }
}

impl DrawTarget for Canvas {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels)
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.display.fill_solid(area, color)
    }
}

/// Layout used across the test suite.
///
/// Columns: approach 200, number 140, via 120, destination 520, status 60,
/// spacing 10 each and 20 trailing padding, so the total is 1100. With the
/// 420 side panel the canvas is 1520 by 960.
pub const SAMPLE_LAYOUT: &str = r##"{
  "canvas": { "height": 960, "backgroundColor": "#000000" },
  "header": {
    "height": 200,
    "label": {
      "fontSize": 32, "paddingX": 12, "paddingY": 6,
      "backgroundColor": "#ffffff", "textColor": "#000000"
    },
    "description": { "fontSize": 18, "marginTop": 8 },
    "columnHeaders": {
      "marginTop": 30, "color": "#ffffff", "fontSize": 20, "smallFontSize": 14,
      "topLine": { "color": "#808080", "lineWidth": 2, "y": 196 }
    }
  },
  "row": {
    "height": 80, "gap": 10,
    "backgroundColor": "#1a1a1a", "borderColor": "#404040", "borderWidth": 2
  },
  "columns": {
    "widths": { "approach": 200, "number": 140, "via": 120, "destination": 520, "status": 60 },
    "spacing": { "afterApproach": 10, "afterNumber": 10, "afterVia": 10, "afterDestination": 10 },
    "status": {
      "paddingRight": 20, "ellipseWidth": 40, "ellipseHeight": 40,
      "color": "#333333", "borderColor": "#666666"
    },
    "approach": { "color": "#4d984d" },
    "number": { "color": "#ffffff" },
    "via": { "color": "#ffffff", "paddingLeft": 8 },
    "destination": { "color": "#ffffff", "paddingLeft": 8 }
  },
  "sidePanel": {
    "width": 420, "padding": 20, "backgroundColor": "#101010",
    "legend": {
      "marginTop": 20, "squareSize": 40, "itemHeight": 60, "itemGap": 10,
      "gapBeforeObstacle": 30, "squareGap": 8,
      "textColor": "#ffffff", "textFontSize": 18, "textMarginLeft": 12,
      "otherRoutesMessage": { "marginTop": 20, "fontSize": 16, "color": "#ffff00" },
      "stopInfo": {
        "marginTop": 120, "textColor": "#ffffff",
        "nameFontSize": 36, "nameLineGap": 6, "numberFontSize": 48,
        "platformMarginTop": 16, "platformFontSize": 22,
        "englishMarginTop": 10, "englishFontSize": 20
      }
    }
  }
}"##;

pub fn sample_layout_json() -> serde_json::Value {
    serde_json::from_str(SAMPLE_LAYOUT).unwrap()
}

pub fn sample_config() -> LayoutConfig {
    LayoutConfig::from_json(SAMPLE_LAYOUT).unwrap()
}
