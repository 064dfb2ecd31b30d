use anyhow::Result;
use chrono::Utc;
use inkcal_core::InkCalError;
use inkcal_core::feed::collect_events;
use inkcal_core::upcoming::select_upcoming;
use inkcal_core::window::TimeWindow;
use owo_colors::OwoColorize;

use crate::commands::{build_cache, expand_all, source_ids};
use crate::config::Config;
use crate::render;

pub async fn run(config: &Config, count: Option<usize>) -> Result<()> {
    let zone = config.zone()?;
    let cache = build_cache(config)?;

    let events = match collect_events(&cache, &source_ids(config), config.ttl()).await {
        Ok(events) => events,
        Err(InkCalError::EmptyResult) => {
            println!("{}", "No calendars available".dimmed());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let now = Utc::now().with_timezone(&zone);
    // Expand from local midnight (so events earlier today stay eligible)
    // out to the lookahead horizon.
    let window = TimeWindow::for_day(now, 0, config.upcoming.lookahead_days * 24)?;
    let occurrences = expand_all(&events, &window);

    let count = count.unwrap_or(config.upcoming.count);
    let selected = select_upcoming(&occurrences, now, count);
    render::print_upcoming(&selected, zone, config.labels.upcoming_limit);
    Ok(())
}
