//! Display document: the per-frame content of the sign.
//!
//! The host owns the document and may edit it between ticks. The renderer
//! borrows it once per frame and keeps no copy. Every field here is fully
//! populated; sparse input goes through [`crate::config::resolve_document`]
//! first.

use std::fs;
use std::path::Path;

use crate::MAX_SLOTS;
use crate::config::{DocumentLayer, resolve_document};
use crate::error::DocumentError;
use crate::label::Label;

/// Number of caption slots above the route columns.
pub const COLUMN_HEADER_COUNT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayDocument {
    pub header: HeaderText,
    pub stop_info: StopInfo,
    /// Route slots, top row first. `None` is an unused slot that still
    /// occupies its row.
    pub routes: Vec<Option<RouteEntry>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderText {
    pub label: String,
    pub description: String,
    /// Captions for approach, number, via, destination and status.
    pub column_headers: [String; COLUMN_HEADER_COUNT],
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopInfo {
    pub name_upper: String,
    pub name_lower: String,
    pub number: String,
    pub platform_name: String,
    pub english: String,
}

/// One route row.
///
/// Split text fields use the empty string for "absent". A field holding
/// only whitespace is present content and keeps its line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    /// Stable identity for blink timers when rows get reordered.
    pub id: Option<String>,
    pub number_upper: String,
    pub number_middle: String,
    pub number_lower: String,
    pub destination_upper: String,
    pub destination_lower: String,
    pub sub_destination: String,
    pub approach_far_blink: bool,
    pub approach_near_blink: bool,
    pub obstacle: bool,
    pub empty: bool,
}

impl Default for RouteEntry {
    fn default() -> Self {
        Self {
            id: None,
            number_upper: String::new(),
            number_middle: String::new(),
            number_lower: String::new(),
            destination_upper: String::new(),
            destination_lower: String::new(),
            sub_destination: String::new(),
            approach_far_blink: true,
            approach_near_blink: true,
            obstacle: false,
            empty: false,
        }
    }
}

impl RouteEntry {
    /// Route number from the upper, middle and lower parts.
    pub fn number(&self) -> Label {
        Label::from_parts(&[&self.number_upper, &self.number_middle, &self.number_lower])
    }

    /// Destination from the upper and lower parts.
    pub fn destination(&self) -> Label {
        Label::from_parts(&[&self.destination_upper, &self.destination_lower])
    }

    /// Single-line via text shown between number and destination.
    pub fn via(&self) -> &str {
        &self.sub_destination
    }

    /// Blank every text field, leaving flags untouched.
    pub fn clear_text(&mut self) {
        self.number_upper.clear();
        self.number_middle.clear();
        self.number_lower.clear();
        self.destination_upper.clear();
        self.destination_lower.clear();
        self.sub_destination.clear();
    }
}

impl DisplayDocument {
    /// Parse a single document and fill missing fields with defaults.
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        let layer = DocumentLayer::from_json(text)?;
        Ok(resolve_document(&[&layer]))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Number of rows the sign lays out.
    pub fn slot_count(&self) -> usize {
        self.routes.len().min(MAX_SLOTS)
    }

    /// Route in a slot, or `None` for an unused or out-of-range slot.
    pub fn slot(&self, index: usize) -> Option<&RouteEntry> {
        if index >= MAX_SLOTS {
            return None;
        }
        self.routes.get(index).and_then(Option::as_ref)
    }

    pub fn slot_mut(&mut self, index: usize) -> Option<&mut RouteEntry> {
        if index >= MAX_SLOTS {
            return None;
        }
        self.routes.get_mut(index).and_then(Option::as_mut)
    }

    /// Slots that hold a route, with their index.
    pub fn present_routes(&self) -> impl Iterator<Item = (usize, &RouteEntry)> {
        self.routes
            .iter()
            .take(MAX_SLOTS)
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|route| (index, route)))
    }

    /// Far-blink flag of the first slot, shown by the header indicator.
    pub fn first_far_enabled(&self) -> bool {
        self.slot(0).is_some_and(|route| route.approach_far_blink)
    }
}
