use anyhow::Result;
use chrono::Utc;
use inkcal_core::InkCalError;
use inkcal_core::feed::collect_events;
use inkcal_core::layout::{
    BlockRegion, CanvasExtent, LayoutConfig, TimelineLayout, TimelinePlan,
};
use inkcal_core::window::TimeWindow;
use serde::Serialize;
use tracing::error;

use crate::commands::{build_cache, expand_all, source_ids};
use crate::config::Config;
use crate::metrics::MonoMetrics;

/// The computed plan as handed to the drawing side.
#[derive(Serialize)]
struct PlanOutput {
    window_start: String,
    window_end: String,
    blocks: Vec<BlockOutput>,
    hour_marks: Vec<HourMarkOutput>,
}

#[derive(Serialize)]
struct BlockOutput {
    event_id: String,
    label: String,
    y_top: i32,
    y_bottom: i32,
    x_left: i32,
    x_right: i32,
    label_y: i32,
}

#[derive(Serialize)]
struct HourMarkOutput {
    hour: u32,
    label: String,
    y: i32,
    label_x: i32,
}

impl PlanOutput {
    fn from_plan(plan: &TimelinePlan, window: &TimeWindow) -> Self {
        PlanOutput {
            window_start: window.start().to_rfc3339(),
            window_end: window.end().to_rfc3339(),
            blocks: plan
                .blocks
                .iter()
                .map(|b| BlockOutput {
                    event_id: b.occurrence.event.id.clone(),
                    label: b.label.clone(),
                    y_top: b.y_top,
                    y_bottom: b.y_bottom,
                    x_left: b.x_left,
                    x_right: b.x_right,
                    label_y: b.label_y,
                })
                .collect(),
            hour_marks: plan
                .hour_marks
                .iter()
                .map(|m| HourMarkOutput {
                    hour: m.hour,
                    label: m.label.clone(),
                    y: m.y,
                    label_x: m.label_x,
                })
                .collect(),
        }
    }
}

pub async fn run(config: &Config) -> Result<()> {
    let zone = config.zone()?;
    let cache = build_cache(config)?;

    // All sources failing means an empty strip, not a dead display: the
    // drawing side still gets the hour grid and decides what to show.
    let events = match collect_events(&cache, &source_ids(config), config.ttl()).await {
        Ok(events) => events,
        Err(InkCalError::EmptyResult) => {
            error!("all sources failed; emitting empty timeline");
            Vec::new()
        }
        Err(e) => return Err(e.into()),
    };

    let now = Utc::now().with_timezone(&zone);
    let window = TimeWindow::for_day(now, config.window.start_hour, config.window.hours)?;
    let occurrences = expand_all(&events, &window);

    let canvas = CanvasExtent {
        width: config.canvas.width,
        height: config.canvas.height,
    };
    let region = BlockRegion {
        left: canvas.width as i32 - config.canvas.timeline_width as i32,
        right: canvas.width as i32 - 1,
    };
    let metrics = MonoMetrics {
        char_width: config.labels.char_width,
        char_height: config.labels.char_height,
    };
    let layout = TimelineLayout::new(LayoutConfig {
        label_limit: config.labels.timeline_limit,
        ..LayoutConfig::default()
    });

    let plan = layout.plan(&occurrences, &window, canvas, region, &metrics);
    let output = PlanOutput::from_plan(&plan, &window);
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
