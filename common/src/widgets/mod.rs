//! Widget components for the arrival sign.
//!
//! All widgets are generic over `DrawTarget<Color = Rgb888>` and read their
//! anchors from [`SceneGeometry`], so nothing here recomputes layout.

mod header;
mod primitives;
mod side_panel;
mod strip;

pub use header::draw_header;
pub use primitives::{SquareTint, draw_capsule, draw_frame, draw_hline, draw_indicator_square, fill_bounds};
pub use side_panel::{LegendStyle, draw_side_panel};
pub use strip::{RowContent, draw_gaps, draw_row};

use crate::config::LayoutConfig;
use crate::geometry::SceneGeometry;
use crate::text::FontBook;

/// Read-only inputs every widget draws from.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub config: &'a LayoutConfig,
    pub geometry: &'a SceneGeometry,
    pub fonts: &'a FontBook,
}
