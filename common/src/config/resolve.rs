//! Layered document resolution.
//!
//! Input documents are sparse: any field may be missing. A host can stack
//! several of them (for example an edit overlay on top of the stored
//! document) and resolve them into one fully populated
//! [`DisplayDocument`].
//!
//! # Precedence
//!
//! For every field, in order:
//! 1. The first layer (highest precedence) that sets it
//! 2. Any later layer that sets it, the last layer being the stored document
//! 3. The hardcoded fallback: `""` for text, `true` for blink flags,
//!    `false` for `obstacle` and `empty`
//!
//! The slot list always comes from the last layer. Overlays can change the
//! routes it holds but cannot add or remove slots.

use serde::Deserialize;
use tracing::debug;

use crate::MAX_SLOTS;
use crate::document::{DisplayDocument, HeaderText, RouteEntry, StopInfo};
use crate::error::DocumentError;

/// One sparse document as read from JSON.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLayer {
    pub header: Option<HeaderLayer>,
    pub stop_info: Option<StopInfoLayer>,
    pub routes: Option<Vec<Option<RouteLayer>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderLayer {
    pub label: Option<String>,
    pub description: Option<String>,
    pub column_headers: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StopInfoLayer {
    pub name_upper: Option<String>,
    pub name_lower: Option<String>,
    pub number: Option<String>,
    pub platform_name: Option<String>,
    pub english: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteLayer {
    pub id: Option<String>,
    pub number_upper: Option<String>,
    pub number_middle: Option<String>,
    pub number_lower: Option<String>,
    pub destination_upper: Option<String>,
    pub destination_lower: Option<String>,
    pub sub_destination: Option<String>,
    pub approach_far_blink: Option<bool>,
    pub approach_near_blink: Option<bool>,
    pub obstacle: Option<bool>,
    pub empty: Option<bool>,
}

impl DocumentLayer {
    pub fn from_json(text: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Picks fields across a stack of layers and counts fallbacks.
struct Stack<'l, T> {
    layers: Vec<&'l T>,
    defaulted: usize,
}

impl<'l, T> Stack<'l, T> {
    fn new(layers: impl IntoIterator<Item = &'l T>) -> Self {
        Self {
            layers: layers.into_iter().collect(),
            defaulted: 0,
        }
    }

    fn text(&mut self, get: impl Fn(&'l T) -> Option<&'l String>) -> String {
        let found = self.layers.iter().find_map(|layer| get(*layer));
        if let Some(value) = found {
            value.clone()
        } else {
            self.defaulted += 1;
            String::new()
        }
    }

    fn flag(&mut self, get: impl Fn(&'l T) -> Option<bool>, fallback: bool) -> bool {
        let found = self.layers.iter().find_map(|layer| get(*layer));
        found.unwrap_or_else(|| {
            self.defaulted += 1;
            fallback
        })
    }
}

/// Merge `layers` (highest precedence first) into a full document.
pub fn resolve_document(layers: &[&DocumentLayer]) -> DisplayDocument {
    let header = resolve_header(layers);
    let stop_info = resolve_stop_info(layers);

    let base = layers.last().and_then(|layer| layer.routes.as_deref()).unwrap_or_default();
    if base.len() > MAX_SLOTS {
        debug!(slots = base.len(), max = MAX_SLOTS, "ignoring route slots past the supported maximum");
    }

    let routes = base
        .iter()
        .take(MAX_SLOTS)
        .enumerate()
        .map(|(index, slot)| {
            slot.as_ref()?;
            let stack = layers
                .iter()
                .filter_map(|layer| layer.routes.as_ref()?.get(index)?.as_ref());
            Some(resolve_route(index, Stack::new(stack)))
        })
        .collect();

    DisplayDocument {
        header,
        stop_info,
        routes,
    }
}

fn resolve_header(layers: &[&DocumentLayer]) -> HeaderText {
    let mut stack = Stack::new(layers.iter().filter_map(|layer| layer.header.as_ref()));
    let label = stack.text(|h| h.label.as_ref());
    let description = stack.text(|h| h.description.as_ref());

    // Captions resolve per position so an overlay can replace one of them.
    let column_headers = std::array::from_fn(|i| {
        stack.text(|h| h.column_headers.as_ref().and_then(|captions| captions.get(i)))
    });

    if stack.defaulted > 0 {
        debug!(fields = stack.defaulted, "header fields defaulted");
    }
    HeaderText {
        label,
        description,
        column_headers,
    }
}

fn resolve_stop_info(layers: &[&DocumentLayer]) -> StopInfo {
    let mut stack = Stack::new(layers.iter().filter_map(|layer| layer.stop_info.as_ref()));
    let info = StopInfo {
        name_upper: stack.text(|s| s.name_upper.as_ref()),
        name_lower: stack.text(|s| s.name_lower.as_ref()),
        number: stack.text(|s| s.number.as_ref()),
        platform_name: stack.text(|s| s.platform_name.as_ref()),
        english: stack.text(|s| s.english.as_ref()),
    };
    if stack.defaulted > 0 {
        debug!(fields = stack.defaulted, "stop info fields defaulted");
    }
    info
}

fn resolve_route(index: usize, mut stack: Stack<'_, RouteLayer>) -> RouteEntry {
    let id = stack.layers.iter().find_map(|r| r.id.clone());
    let route = RouteEntry {
        id,
        number_upper: stack.text(|r| r.number_upper.as_ref()),
        number_middle: stack.text(|r| r.number_middle.as_ref()),
        number_lower: stack.text(|r| r.number_lower.as_ref()),
        destination_upper: stack.text(|r| r.destination_upper.as_ref()),
        destination_lower: stack.text(|r| r.destination_lower.as_ref()),
        sub_destination: stack.text(|r| r.sub_destination.as_ref()),
        approach_far_blink: stack.flag(|r| r.approach_far_blink, true),
        approach_near_blink: stack.flag(|r| r.approach_near_blink, true),
        obstacle: stack.flag(|r| r.obstacle, false),
        empty: stack.flag(|r| r.empty, false),
    };
    if stack.defaulted > 0 {
        debug!(slot = index, fields = stack.defaulted, "route fields defaulted");
    }
    route
}
