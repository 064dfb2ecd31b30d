//! Core types and algorithms for the inkcal e-paper calendar dashboard.
//!
//! This crate turns calendar feeds into a bounded-time-window timeline:
//! - `event` / `window` hold the shared data model
//! - `ics` parses fetched calendar text into that model
//! - `cache` wraps an `EventSource` with a TTL'd on-disk cache
//! - `recurrence` expands recurring events against a window
//! - `upcoming` selects the next N occurrences
//! - `layout` computes pixel bands and hour gridlines for drawing
//! - `merge` / `feed` combine multiple sources into one stream
//!
//! The crate never draws and never talks to the network itself; both sit
//! behind small traits (`layout::TextMetrics`, `cache::EventSource`).

pub mod cache;
pub mod error;
pub mod event;
pub mod feed;
pub mod ics;
pub mod layout;
pub mod merge;
pub mod recurrence;
pub mod upcoming;
pub mod window;

pub use error::{InkCalError, InkCalResult};
pub use event::{Event, EventTime, Occurrence, Recurrence};
pub use window::TimeWindow;
