//! Loading layout, document and icon assets from disk.
//!
//! The layout and document are read once at startup and any failure aborts.
//! The icon is optional: it loads on a background thread and the sign
//! renders without icons until it arrives, or for good if loading fails.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::thread;

use anyhow::{Context, Result};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay};
use signboard_common::config::{DocumentLayer, resolve_document};
use signboard_common::icons::IconMask;
use signboard_common::{AssetError, BlinkBank, DisplayDocument, Frame, LayoutConfig, SceneRenderer};
use tracing::{debug, error, info};

pub fn load_layout(path: &Path) -> Result<LayoutConfig> {
    let config = LayoutConfig::load(path).with_context(|| format!("loading layout from {}", path.display()))?;
    info!(path = %path.display(), "layout loaded");
    Ok(config)
}

fn read_layer(path: &Path) -> Result<DocumentLayer> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    DocumentLayer::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Load the stored document and lay `overrides` on top of it.
pub fn load_document(data: &Path, overrides: Option<&Path>) -> Result<DisplayDocument> {
    let stored = read_layer(data)?;
    let document = match overrides {
        Some(path) => {
            let overlay = read_layer(path)?;
            info!(path = %path.display(), "applying document overrides");
            resolve_document(&[&overlay, &stored])
        }
        None => resolve_document(&[&stored]),
    };
    info!(slots = document.slot_count(), "document loaded");
    Ok(document)
}

fn load_icon(path: &Path, width: u32) -> Result<IconMask, AssetError> {
    let bytes = fs::read(path)?;
    IconMask::from_raw(&bytes, width)
}

/// Start loading a raw icon mask. The mask is sent once, if it loads.
pub fn spawn_icon_loader(path: PathBuf, width: u32) -> Receiver<IconMask> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || match load_icon(&path, width) {
        Ok(mask) => {
            debug!(path = %path.display(), size = ?mask.size(), "icon loaded");
            sender.send(mask).ok();
        }
        Err(err) => {
            error!(path = %path.display(), %err, "icon failed to load, drawing squares without icons");
        }
    });
    receiver
}

/// Render the current frame at native size and write it as a PNG.
pub fn save_snapshot(
    renderer: &SceneRenderer<'_>,
    document: &DisplayDocument,
    blinks: &BlinkBank,
    icon: Option<&IconMask>,
    path: &Path,
) -> Result<()> {
    let mut display: SimulatorDisplay<Rgb888> = SimulatorDisplay::new(renderer.canvas_size());
    let frame = Frame { document, blinks, icon, active_row: None };
    renderer.render(&mut display, &frame);
    display
        .to_rgb_output_image(&OutputSettingsBuilder::new().build())
        .save_png(path)
        .with_context(|| format!("writing snapshot to {}", path.display()))?;
    let size = display.size();
    info!(path = %path.display(), size = ?size, "snapshot saved");
    Ok(())
}
