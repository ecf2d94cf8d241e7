//! Display scale for the host viewport.
//!
//! The sign is laid out at its native canvas size and shown scaled to the
//! viewport. By default the scale fits the whole canvas with a small margin
//! and never enlarges it; a manual zoom overrides that until reset.
//! Changing the scale never touches layout or blink state.

use embedded_graphics::geometry::Size;

/// Fraction of the viewport the fitted canvas may fill.
pub const FIT_MARGIN: f32 = 0.95;

/// Manual zoom step and limits.
pub const ZOOM_STEP: f32 = 0.1;
pub const ZOOM_MIN: f32 = 0.1;
pub const ZOOM_MAX: f32 = 3.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportScale {
    manual: Option<f32>,
}

impl ViewportScale {
    pub const fn new() -> Self {
        Self { manual: None }
    }

    /// Largest scale that fits `base` inside `viewport`, capped at 1.
    pub fn fit(base: Size, viewport: Size) -> f32 {
        if base.width == 0 || base.height == 0 {
            return 1.0;
        }
        let x = viewport.width as f32 * FIT_MARGIN / base.width as f32;
        let y = viewport.height as f32 * FIT_MARGIN / base.height as f32;
        x.min(y).min(1.0)
    }

    /// Scale to display with, manual zoom first.
    pub fn resolve(&self, base: Size, viewport: Size) -> f32 {
        self.manual.unwrap_or_else(|| Self::fit(base, viewport))
    }

    pub const fn manual(&self) -> Option<f32> {
        self.manual
    }

    /// Set a manual zoom, clamped to the zoom limits.
    pub fn set_manual(&mut self, ratio: f32) {
        self.manual = Some(ratio.clamp(ZOOM_MIN, ZOOM_MAX));
    }

    /// Zoom by `steps` increments starting from the current scale.
    pub fn adjust(&mut self, steps: i32, base: Size, viewport: Size) -> f32 {
        let current = self.resolve(base, viewport);
        self.set_manual(current + steps as f32 * ZOOM_STEP);
        self.resolve(base, viewport)
    }

    /// Drop the manual zoom and go back to fitting.
    pub fn reset(&mut self) {
        self.manual = None;
    }
}

/// `base` scaled by `scale`, at least one pixel each way.
pub fn scaled_size(base: Size, scale: f32) -> Size {
    let scale_dim = |v: u32| ((v as f32 * scale).round() as u32).max(1);
    Size::new(scale_dim(base.width), scale_dim(base.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGN: Size = Size::new(1520, 960);

    #[test]
    fn test_fit_limited_by_narrow_axis() {
        let scale = ViewportScale::fit(SIGN, Size::new(800, 1000));
        assert!((scale - 800.0 * 0.95 / 1520.0).abs() < 1e-6);
    }

    #[test]
    fn test_fit_never_enlarges() {
        assert_eq!(ViewportScale::fit(SIGN, Size::new(4000, 4000)), 1.0);
    }

    #[test]
    fn test_manual_overrides_fit() {
        let mut viewport = ViewportScale::new();
        viewport.set_manual(1.5);
        assert_eq!(viewport.resolve(SIGN, Size::new(100, 100)), 1.5);
        viewport.reset();
        assert!(viewport.resolve(SIGN, Size::new(100, 100)) < 0.1);
    }

    #[test]
    fn test_adjust_steps_and_clamps() {
        let mut viewport = ViewportScale::new();
        let viewport_size = Size::new(1600, 1000);
        let fitted = ViewportScale::fit(SIGN, viewport_size);

        let zoomed = viewport.adjust(2, SIGN, viewport_size);
        assert!((zoomed - (fitted + 0.2)).abs() < 1e-5);

        let clamped = viewport.adjust(-100, SIGN, viewport_size);
        assert_eq!(clamped, ZOOM_MIN);
        assert_eq!(viewport.adjust(100, SIGN, viewport_size), ZOOM_MAX);
    }

    #[test]
    fn test_scaled_size() {
        assert_eq!(scaled_size(SIGN, 0.5), Size::new(760, 480));
        assert_eq!(scaled_size(Size::new(3, 3), 0.01), Size::new(1, 1));
    }
}
