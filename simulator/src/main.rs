//! Transit arrival sign simulator for desktop.
//!
//! Loads a layout and a display document, then runs the sign in an
//! `embedded-graphics-simulator` window, scaled to fit the viewport. The
//! keyboard stands in for the editor form (see [`controls`]).
//!
//! Logging goes through `tracing`; set `RUST_LOG` to change the filter
//! (default `info`).

// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

mod assets;
mod controls;
mod timing;

use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::thread;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use embedded_graphics::pixelcolor::Rgb888;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window};
use signboard_common::colors::BLACK;
use signboard_common::icons::IconMask;
use signboard_common::text::{FontBook, ScaledCanvas};
use signboard_common::viewport::{ViewportScale, scaled_size};
use signboard_common::{LegendStyle, SceneRenderer, SignSession};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::controls::{Command, Editor, Outcome};
use crate::timing::FRAME_TIME;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Legend {
    Basic,
    Enriched,
}

impl From<Legend> for LegendStyle {
    fn from(legend: Legend) -> Self {
        match legend {
            Legend::Basic => Self::Basic,
            Legend::Enriched => Self::Enriched,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "simulator", about = "Desktop simulator for the transit arrival sign")]
struct Args {
    /// Layout configuration
    #[arg(long, default_value = "simulator/assets/layout.json")]
    layout: PathBuf,

    /// Display document
    #[arg(long, default_value = "simulator/assets/data.json")]
    data: PathBuf,

    /// Sparse document laid over `--data`
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Raw 1-bit icon mask (MSB-first rows). The built-in bus is used otherwise.
    #[arg(long)]
    icon: Option<PathBuf>,

    /// Width in pixels of the `--icon` mask
    #[arg(long, default_value_t = 24)]
    icon_width: u32,

    #[arg(long, value_enum, default_value_t = Legend::Enriched)]
    legend: Legend,

    /// Seed for the blink periods
    #[arg(long)]
    seed: Option<u64>,

    /// Where S writes the PNG snapshot
    #[arg(long, default_value = "snapshot.png")]
    snapshot: PathBuf,

    #[arg(long, default_value_t = 1280)]
    viewport_width: u32,

    #[arg(long, default_value_t = 800)]
    viewport_height: u32,
}

/// Icon for the frame loop: ready now, or arriving from the loader thread.
enum IconSource {
    Ready(IconMask),
    Pending(Receiver<IconMask>),
    Missing,
}

impl IconSource {
    fn poll(&mut self) -> Option<&IconMask> {
        if let Self::Pending(receiver) = self {
            match receiver.try_recv() {
                Ok(mask) => {
                    info!(size = ?mask.size(), "icon ready");
                    *self = Self::Ready(mask);
                }
                Err(std::sync::mpsc::TryRecvError::Disconnected) => *self = Self::Missing,
                Err(std::sync::mpsc::TryRecvError::Empty) => {}
            }
        }
        match self {
            Self::Ready(mask) => Some(mask),
            Self::Pending(_) | Self::Missing => None,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = assets::load_layout(&args.layout)?;
    let mut document = assets::load_document(&args.data, args.overrides.as_deref())?;
    let renderer = SceneRenderer::new(&config, FontBook::new(), args.legend.into())?;

    let mut icon_source = match args.icon.clone() {
        Some(path) => IconSource::Pending(assets::spawn_icon_loader(path, args.icon_width)),
        None => IconSource::Ready(IconMask::bus()),
    };

    let base = renderer.canvas_size();
    let viewport_size = Size::new(args.viewport_width, args.viewport_height);
    let mut viewport = ViewportScale::new();
    info!(?base, viewport = ?viewport_size, scale = viewport.resolve(base, viewport_size), "starting simulator");

    let mut display: SimulatorDisplay<Rgb888> = SimulatorDisplay::new(viewport_size);
    let output_settings = OutputSettingsBuilder::new().build();
    let mut window = Window::new("Transit Sign Sim", &output_settings);

    display.clear(BLACK).ok();
    window.update(&display);

    let mut session = SignSession::new(args.seed);
    let mut editor = Editor::new();
    let started = Instant::now();

    loop {
        let frame_start = Instant::now();

        let mut snapshot_requested = false;
        for ev in window.events() {
            match ev {
                SimulatorEvent::Quit => return Ok(()),
                SimulatorEvent::KeyDown { keycode, repeat, .. } => {
                    if repeat {
                        continue;
                    }
                    let Some(command) = Command::from_keycode(keycode) else {
                        continue;
                    };
                    match editor.apply(command, &mut document) {
                        Outcome::Quit => return Ok(()),
                        Outcome::Snapshot => snapshot_requested = true,
                        Outcome::Zoom(steps) => {
                            let scale = viewport.adjust(steps, base, viewport_size);
                            info!(scale, size = ?scaled_size(base, scale), "zoom");
                        }
                        Outcome::ResetZoom => {
                            viewport.reset();
                            info!(scale = viewport.resolve(base, viewport_size), "zoom reset to fit");
                        }
                        Outcome::Edited | Outcome::Ignored => {}
                    }
                }
                _ => {}
            }
        }

        let icon = icon_source.poll();
        let now = started.elapsed().as_millis() as u64;
        let scale = viewport.resolve(base, viewport_size);
        {
            let mut canvas = ScaledCanvas::uniform(&mut display, scale);
            session.tick(now, &document, &renderer, &mut canvas, icon, Some(editor.selected()));
        }
        window.update(&display);

        if snapshot_requested
            && let Err(err) = assets::save_snapshot(&renderer, &document, session.blinks(), icon, &args.snapshot)
        {
            error!("{err:#}");
        }

        let elapsed = frame_start.elapsed();
        if let Some(remaining) = FRAME_TIME.checked_sub(elapsed) {
            thread::sleep(remaining);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    /// Poll until the loader settles or `attempts` run out.
    fn settle(source: &mut IconSource, attempts: usize) {
        for _ in 0..attempts {
            source.poll();
            if !matches!(source, IconSource::Pending(_)) {
                return;
            }
            thread::sleep(Duration::from_millis(10));
        }
    }

    #[test]
    fn test_missing_icon_file_draws_without_icons() {
        let path = std::env::temp_dir().join("signboard-sim-no-such-icon.bin");
        let mut source = IconSource::Pending(assets::spawn_icon_loader(path, 24));

        settle(&mut source, 500);
        assert!(matches!(source, IconSource::Missing), "failed load should end in Missing");
        assert!(source.poll().is_none(), "frames continue without an icon");
    }

    #[test]
    fn test_icon_file_arrives_from_loader() {
        let path = std::env::temp_dir().join(format!("signboard-sim-icon-{}.bin", std::process::id()));
        std::fs::write(&path, [0xff, 0x81, 0xff]).unwrap();
        let mut source = IconSource::Pending(assets::spawn_icon_loader(path.clone(), 8));

        settle(&mut source, 500);
        std::fs::remove_file(&path).ok();
        let mask = source.poll().expect("loaded icon should be ready");
        assert_eq!(mask.size(), Size::new(8, 3));
    }
}
