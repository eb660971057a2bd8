//! Adapter utilities for the `calgrid` crate.
//!
//! The `calgrid` crate is UI-agnostic and focuses on the core state and algorithms. This crate
//! provides small, framework-neutral helpers commonly needed by adapters:
//!
//! - A frame controller that folds the grid's timers and an optional scroll tween into one
//!   `tick(now_ms)` call
//! - Date navigation (jump or tween to a day)
//! - Date anchoring, to keep the first visible day in place when the range is rebuilt
//!
//! No UI framework bindings (ratatui, egui, ...) live here.
#![forbid(unsafe_code)]

#[macro_use]
mod macros;

mod anchor;
mod controller;
mod tween;

#[cfg(test)]
mod tests;

pub use anchor::{DateAnchor, apply_date_anchor, capture_first_visible_date};
pub use controller::{Controller, TickOutput};
pub use tween::{Easing, Tween};
