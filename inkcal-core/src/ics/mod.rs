//! ICS adapter: calendar text in, source-neutral `Event`s out.

mod parse;

pub use parse::parse_calendar;
