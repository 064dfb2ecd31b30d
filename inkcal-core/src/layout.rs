//! Timeline layout: occurrences to pixel bands on a vertical day strip.
//!
//! Produces geometry and text only. Drawing (rectangles, text, display
//! I/O) happens behind the caller's canvas; the one thing layout needs
//! from it is text measurement, via [`TextMetrics`].

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};

use crate::event::Occurrence;
use crate::window::TimeWindow;

/// Ellipsis marker appended to truncated labels.
pub const ELLIPSIS: &str = "...";

/// Text measurement boundary, implemented by the drawing side.
pub trait TextMetrics {
    /// Rendered (width, height) of `text` in pixels.
    fn measure(&self, text: &str) -> (u32, u32);
}

/// Pixel extent of the full canvas.
#[derive(Debug, Clone, Copy)]
pub struct CanvasExtent {
    pub width: u32,
    pub height: u32,
}

/// Horizontal strip of the canvas the timeline blocks occupy.
#[derive(Debug, Clone, Copy)]
pub struct BlockRegion {
    pub left: i32,
    pub right: i32,
}

/// Presentation knobs. All limits are configuration, not hardcoded.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Max label length in characters, ellipsis included
    pub label_limit: usize,
    /// Pixels below y_top for top-aligned labels
    pub label_offset: i32,
    /// Center the label vertically when the block is taller than
    /// `label_height * factor`. `None` keeps labels top-aligned always.
    pub center_factor: Option<f32>,
    /// Gap between an hour label and the region's right edge
    pub hour_label_margin: i32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            label_limit: 15,
            label_offset: 2,
            center_factor: Some(1.2),
            hour_label_margin: 5,
        }
    }
}

/// Pixel band for one occurrence, ready to hand to the drawing side.
#[derive(Debug, Clone)]
pub struct LayoutBlock<'a> {
    pub occurrence: Occurrence<'a>,
    pub y_top: i32,
    pub y_bottom: i32,
    pub x_left: i32,
    pub x_right: i32,
    pub label: String,
    pub label_y: i32,
}

/// One whole-hour gridline with its right-aligned numeric label.
#[derive(Debug, Clone)]
pub struct HourMark {
    /// Hour of day in the window's zone (24h)
    pub hour: u32,
    pub label: String,
    pub y: i32,
    pub label_x: i32,
}

/// The computed layout for one render pass.
///
/// Blocks are in input order; overlapping occurrences are not reflowed,
/// so drawing them in order gives last-wins stacking.
#[derive(Debug, Clone)]
pub struct TimelinePlan<'a> {
    pub blocks: Vec<LayoutBlock<'a>>,
    pub hour_marks: Vec<HourMark>,
}

pub struct TimelineLayout {
    config: LayoutConfig,
}

impl TimelineLayout {
    pub fn new(config: LayoutConfig) -> Self {
        TimelineLayout { config }
    }

    /// Lay out `occurrences` against `window` on a canvas of `canvas`
    /// pixels, blocks constrained to `region`.
    ///
    /// Occurrences that do not intersect the window are excluded, not
    /// clamped to zero height. Every returned y lies in
    /// `[0, canvas.height]` with `y_top <= y_bottom`.
    pub fn plan<'a>(
        &self,
        occurrences: &[Occurrence<'a>],
        window: &TimeWindow,
        canvas: CanvasExtent,
        region: BlockRegion,
        metrics: &dyn TextMetrics,
    ) -> TimelinePlan<'a> {
        let pixels_per_minute = canvas.height as f64 / window.duration_minutes() as f64;

        let mut blocks = Vec::new();
        for occ in occurrences {
            if !window.intersects(occ.start, occ.end) {
                continue;
            }
            let effective_start = occ.start.max(window.start());
            let effective_end = occ.end.min(window.end());
            if effective_end <= effective_start {
                continue;
            }

            let y_top = self.to_y(effective_start, window, pixels_per_minute, canvas.height);
            let y_bottom = self.to_y(effective_end, window, pixels_per_minute, canvas.height);

            let label = truncate_label(&occ.event.summary, self.config.label_limit);
            let (_, label_height) = metrics.measure(&label);
            let label_y = self.place_label(y_top, y_bottom, label_height);

            blocks.push(LayoutBlock {
                occurrence: *occ,
                y_top,
                y_bottom,
                x_left: region.left,
                x_right: region.right,
                label,
                label_y,
            });
        }

        let hour_marks = self.hour_marks(window, canvas.height, region, pixels_per_minute, metrics);

        TimelinePlan { blocks, hour_marks }
    }

    fn to_y(
        &self,
        at: DateTime<Utc>,
        window: &TimeWindow,
        pixels_per_minute: f64,
        canvas_height: u32,
    ) -> i32 {
        let offset_minutes = (at - window.start()).num_seconds() as f64 / 60.0;
        let y = (offset_minutes * pixels_per_minute).round() as i32;
        y.clamp(0, canvas_height as i32)
    }

    /// Top-align a few pixels below y_top; center vertically when the
    /// block comfortably fits the label. A heuristic, not an invariant.
    fn place_label(&self, y_top: i32, y_bottom: i32, label_height: u32) -> i32 {
        let block_height = y_bottom - y_top;
        if let Some(factor) = self.config.center_factor {
            if block_height as f32 > label_height as f32 * factor {
                return y_top + (block_height - label_height as i32) / 2;
            }
        }
        y_top + self.config.label_offset
    }

    /// Whole-hour boundaries inside `[window.start, window.end]`, end
    /// inclusive, wrapping across midnight. Labels are 24-hour numerals
    /// right-aligned inside the region.
    fn hour_marks(
        &self,
        window: &TimeWindow,
        canvas_height: u32,
        region: BlockRegion,
        pixels_per_minute: f64,
        metrics: &dyn TextMetrics,
    ) -> Vec<HourMark> {
        let zone = window.zone;
        let start_local = window.start().with_timezone(&zone);

        // First whole hour at or after the window start
        let truncated = start_local
            .date_naive()
            .and_hms_opt(start_local.hour(), 0, 0)
            .and_then(|naive| zone.from_local_datetime(&naive).earliest())
            .map(|dt| dt.with_timezone(&Utc));
        let mut mark = match truncated {
            Some(t) if t >= window.start() => t,
            Some(t) => t + Duration::hours(1),
            None => window.start(),
        };

        let mut marks = Vec::new();
        while mark <= window.end() {
            let hour = mark.with_timezone(&zone).hour();
            let label = hour.to_string();
            let (label_width, _) = metrics.measure(&label);
            marks.push(HourMark {
                hour,
                y: self.to_y(mark, window, pixels_per_minute, canvas_height),
                label_x: region.right - label_width as i32 - self.config.hour_label_margin,
                label,
            });
            mark += Duration::hours(1);
        }
        marks
    }
}

/// Cut `text` to at most `limit` characters, ellipsis included.
pub fn truncate_label(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let kept: String = text.chars().take(limit.saturating_sub(ELLIPSIS.len())).collect();
    format!("{kept}{ELLIPSIS}")
}
