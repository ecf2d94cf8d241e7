//! Keyboard editing of the display document.
//!
//! Stands in for the editor form: every command writes straight into the
//! host's document and becomes visible at the next tick.
//!
//! | Key | Command |
//! |-----|---------|
//! | J / K | Select next / previous row |
//! | F / N | Toggle far / near blink |
//! | O | Toggle obstacle |
//! | E | Toggle empty (blanks the row's text, restores it when cleared) |
//! | Z / X | Zoom in / out |
//! | R | Reset zoom to fit |
//! | S | Save a PNG snapshot |
//! | Q | Quit |

use std::collections::HashMap;

use embedded_graphics_simulator::sdl2::Keycode;
use signboard_common::{DisplayDocument, RouteEntry};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    ToggleFar,
    ToggleNear,
    ToggleObstacle,
    ToggleEmpty,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Snapshot,
    Quit,
}

impl Command {
    pub fn from_keycode(keycode: Keycode) -> Option<Self> {
        let command = match keycode {
            Keycode::J => Self::Next,
            Keycode::K => Self::Previous,
            Keycode::F => Self::ToggleFar,
            Keycode::N => Self::ToggleNear,
            Keycode::O => Self::ToggleObstacle,
            Keycode::E => Self::ToggleEmpty,
            Keycode::Z => Self::ZoomIn,
            Keycode::X => Self::ZoomOut,
            Keycode::R => Self::ResetZoom,
            Keycode::S => Self::Snapshot,
            Keycode::Q => Self::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// What the frame loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Document or selection changed.
    Edited,
    /// Command targeted an absent slot.
    Ignored,
    /// Zoom by this many steps.
    Zoom(i32),
    ResetZoom,
    Snapshot,
    Quit,
}

/// Row selection plus the text of rows blanked by the empty toggle.
#[derive(Debug, Default)]
pub struct Editor {
    selected: usize,
    stash: HashMap<usize, RouteEntry>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub fn apply(&mut self, command: Command, document: &mut DisplayDocument) -> Outcome {
        match command {
            Command::Next => self.select(document, 1),
            Command::Previous => self.select(document, -1),
            Command::ToggleFar => self.edit(document, |route| route.approach_far_blink = !route.approach_far_blink),
            Command::ToggleNear => self.edit(document, |route| route.approach_near_blink = !route.approach_near_blink),
            Command::ToggleObstacle => self.edit(document, |route| route.obstacle = !route.obstacle),
            Command::ToggleEmpty => self.toggle_empty(document),
            Command::ZoomIn => Outcome::Zoom(1),
            Command::ZoomOut => Outcome::Zoom(-1),
            Command::ResetZoom => Outcome::ResetZoom,
            Command::Snapshot => Outcome::Snapshot,
            Command::Quit => Outcome::Quit,
        }
    }

    fn select(&mut self, document: &DisplayDocument, step: isize) -> Outcome {
        let rows = document.slot_count();
        if rows == 0 {
            return Outcome::Ignored;
        }
        self.selected = (self.selected as isize + step).rem_euclid(rows as isize) as usize;
        debug!(row = self.selected, "selected row");
        Outcome::Edited
    }

    fn edit(&self, document: &mut DisplayDocument, change: impl FnOnce(&mut RouteEntry)) -> Outcome {
        match document.slot_mut(self.selected) {
            Some(route) => {
                change(route);
                Outcome::Edited
            }
            None => {
                warn!(slot = self.selected, "selected slot has no route");
                Outcome::Ignored
            }
        }
    }

    fn toggle_empty(&mut self, document: &mut DisplayDocument) -> Outcome {
        let slot = self.selected;
        let Some(route) = document.slot_mut(slot) else {
            warn!(slot, "cannot toggle empty on an absent slot");
            return Outcome::Ignored;
        };

        if route.empty {
            route.empty = false;
            if let Some(saved) = self.stash.remove(&slot) {
                restore_text(route, saved);
            }
        } else {
            self.stash.insert(slot, route.clone());
            route.clear_text();
            route.empty = true;
        }
        debug!(slot, empty = route.empty, "toggled empty row");
        Outcome::Edited
    }
}

fn restore_text(route: &mut RouteEntry, saved: RouteEntry) {
    route.number_upper = saved.number_upper;
    route.number_middle = saved.number_middle;
    route.number_lower = saved.number_lower;
    route.destination_upper = saved.destination_upper;
    route.destination_lower = saved.destination_lower;
    route.sub_destination = saved.sub_destination;
}
