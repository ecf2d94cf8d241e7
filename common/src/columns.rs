//! Column geometry.
//!
//! Columns run left to right in a fixed order: approach squares, route
//! number, via text, destination, status lamp. Each start is the previous
//! column's end plus the spacing configured for that boundary, so:
//!
//! ```text
//! total = Σ widths + Σ spacings + status padding
//! ```
//!
//! Positions are relative to the strip content origin. The result depends
//! only on config and is computed once per renderer.

use crate::config::{ColumnsConfig, non_negative};
use crate::error::ConfigError;

/// Horizontal extent of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpan {
    pub start: f32,
    pub width: f32,
    pub center: f32,
}

impl ColumnSpan {
    const fn new(start: f32, width: f32) -> Self {
        Self {
            start,
            width,
            center: start + width / 2.0,
        }
    }

    pub const fn end(&self) -> f32 {
        self.start + self.width
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnPositions {
    pub approach: ColumnSpan,
    pub number: ColumnSpan,
    pub via: ColumnSpan,
    pub destination: ColumnSpan,
    pub status: ColumnSpan,
    /// Status end plus its trailing padding.
    pub total_width: f32,
}

impl ColumnPositions {
    /// Columns in draw order, matching the caption order.
    pub const fn in_order(&self) -> [ColumnSpan; 5] {
        [self.approach, self.number, self.via, self.destination, self.status]
    }

    /// Width covered by the columns, excluding the trailing padding.
    pub const fn content_width(&self) -> f32 {
        self.status.end()
    }
}

/// Derive column positions from the column config.
///
/// Fails on the first negative or non-finite width, spacing or padding.
pub fn compute_positions(columns: &ColumnsConfig) -> Result<ColumnPositions, ConfigError> {
    let widths = &columns.widths;
    let spacing = &columns.spacing;

    let approach = ColumnSpan::new(0.0, non_negative("columns.widths.approach", widths.approach)?);

    let number_start = approach.end() + non_negative("columns.spacing.afterApproach", spacing.after_approach)?;
    let number = ColumnSpan::new(number_start, non_negative("columns.widths.number", widths.number)?);

    let via_start = number.end() + non_negative("columns.spacing.afterNumber", spacing.after_number)?;
    let via = ColumnSpan::new(via_start, non_negative("columns.widths.via", widths.via)?);

    let destination_start = via.end() + non_negative("columns.spacing.afterVia", spacing.after_via)?;
    let destination = ColumnSpan::new(
        destination_start,
        non_negative("columns.widths.destination", widths.destination)?,
    );

    let status_start =
        destination.end() + non_negative("columns.spacing.afterDestination", spacing.after_destination)?;
    let status = ColumnSpan::new(status_start, non_negative("columns.widths.status", widths.status)?);

    let padding = non_negative("columns.status.paddingRight", columns.status.padding_right)?;

    Ok(ColumnPositions {
        approach,
        number,
        via,
        destination,
        status,
        total_width: status.end() + padding,
    })
}
