//! Terminal rendering for inkcal output.

use chrono_tz::Tz;
use inkcal_core::event::Occurrence;
use inkcal_core::layout::truncate_label;
use owo_colors::OwoColorize;

/// Print the upcoming list the way the panel shows it:
/// `MM-DD @ HH:MM - summary`, one line per occurrence.
pub fn print_upcoming(occurrences: &[Occurrence], zone: Tz, label_limit: usize) {
    if occurrences.is_empty() {
        println!("{}", "No upcoming events".dimmed());
        return;
    }

    println!("{}", "Upcoming events".bold());
    for occ in occurrences {
        let start = occ.start.with_timezone(&zone);
        let stamp = start.format("%m-%d @ %H:%M").to_string();
        let name = truncate_label(&occ.event.summary, label_limit);
        println!("  {} - {}", stamp.dimmed(), name);
    }
}
