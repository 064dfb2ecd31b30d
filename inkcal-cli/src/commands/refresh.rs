use anyhow::Result;
use chrono::Duration;
use owo_colors::OwoColorize;

use crate::commands::build_cache;
use crate::config::Config;

/// Refetch every source unconditionally, replacing its cache entry.
pub async fn run(config: &Config) -> Result<()> {
    let cache = build_cache(config)?;

    let mut failures = 0;
    for source in &config.sources {
        // TTL of zero: any existing entry counts as expired
        match cache.get(&source.name, Duration::zero()).await {
            Ok(events) => {
                println!("  {} {} ({} events)", "✓".green(), source.name, events.len());
            }
            Err(e) => {
                failures += 1;
                println!("  {} {} ({})", "✗".red(), source.name, e);
            }
        }
    }

    if failures == config.sources.len() {
        anyhow::bail!("All {} sources failed to refresh", failures);
    }
    Ok(())
}
