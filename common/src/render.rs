//! Frame orchestration.
//!
//! [`SceneRenderer`] owns everything that depends only on config (geometry,
//! faces, legend style) and draws one complete frame from a borrowed
//! document and blink bank. [`SignSession`] owns the mutable per-session
//! state and runs the host tick.
//!
//! # Draw Order
//!
//! | Step | Element |
//! |------|---------|
//! | 1 | Clear to the canvas background |
//! | 2 | Header |
//! | 3 | Side panel |
//! | 4 | Gap fills around the strips |
//! | 5 | Strips, slot 0 first |
//!
//! Nothing is supposed to overlap, but the order is fixed so frames are
//! deterministic.

use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::trace;

use crate::animations::BlinkBank;
use crate::config::LayoutConfig;
use crate::document::DisplayDocument;
use crate::error::ConfigError;
use crate::geometry::SceneGeometry;
use crate::icons::IconMask;
use crate::text::FontBook;
use crate::widgets::{RowContent, Scene, draw_gaps, draw_header, draw_row, draw_side_panel};

pub use crate::widgets::LegendStyle;

/// Per-frame inputs, read once at the start of the frame.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub document: &'a DisplayDocument,
    pub blinks: &'a BlinkBank,
    /// Indicator icon, or `None` while the asset is missing.
    pub icon: Option<&'a IconMask>,
    /// Row highlighted by the host, if any.
    pub active_row: Option<usize>,
}

pub struct SceneRenderer<'a> {
    config: &'a LayoutConfig,
    geometry: SceneGeometry,
    fonts: FontBook,
    legend: LegendStyle,
}

impl<'a> SceneRenderer<'a> {
    /// Validate the layout and compute its geometry once.
    pub fn new(config: &'a LayoutConfig, fonts: FontBook, legend: LegendStyle) -> Result<Self, ConfigError> {
        let geometry = SceneGeometry::new(config)?;
        Ok(Self { config, geometry, fonts, legend })
    }

    pub const fn geometry(&self) -> &SceneGeometry {
        &self.geometry
    }

    pub const fn legend(&self) -> LegendStyle {
        self.legend
    }

    /// Size of the surface a frame covers.
    pub fn canvas_size(&self) -> Size {
        self.geometry.canvas_size()
    }

    fn scene(&self) -> Scene<'_> {
        Scene {
            config: self.config,
            geometry: &self.geometry,
            fonts: &self.fonts,
        }
    }

    /// Draw one complete frame.
    pub fn render<D>(&self, display: &mut D, frame: &Frame<'_>)
    where
        D: DrawTarget<Color = Rgb888>,
    {
        let document = frame.document;
        let scene = self.scene();
        let rows = document.slot_count();
        trace!(rows, "rendering frame");

        display.clear(self.config.canvas.background_color.rgb()).ok();
        draw_header(display, &scene, &document.header, document.first_far_enabled(), frame.icon);
        draw_side_panel(display, &scene, &document.stop_info, self.legend, frame.icon);
        draw_gaps(display, &scene, rows);

        for index in 0..rows {
            let route = document.slot(index);
            let state = route.and_then(|route| frame.blinks.state_for(index, route));
            let content = RowContent {
                route,
                far_on: state.is_some_and(|state| state.far_on()),
                near_on: state.is_some_and(|state| state.near_on()),
                active: frame.active_row == Some(index),
            };
            draw_row(display, &scene, index, &content, frame.icon);
        }
    }
}

/// Mutable state of one running sign: the blink bank and its RNG.
pub struct SignSession {
    blinks: BlinkBank,
    rng: StdRng,
}

impl SignSession {
    /// Seeded sessions roll the same blink periods every run.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        Self { blinks: BlinkBank::new(), rng }
    }

    pub const fn blinks(&self) -> &BlinkBank {
        &self.blinks
    }

    /// Match blink state to the document and step it to `now`.
    pub fn advance(&mut self, document: &DisplayDocument, now: u64) {
        self.blinks.sync(document, now, &mut self.rng);
        self.blinks.advance(now);
    }

    /// One host tick: advance the blink state, then render.
    pub fn tick<D>(
        &mut self,
        now: u64,
        document: &DisplayDocument,
        renderer: &SceneRenderer<'_>,
        display: &mut D,
        icon: Option<&IconMask>,
        active_row: Option<usize>,
    ) where
        D: DrawTarget<Color = Rgb888>,
    {
        self.advance(document, now);
        let frame = Frame { document, blinks: &self.blinks, icon, active_row };
        renderer.render(display, &frame);
    }
}
