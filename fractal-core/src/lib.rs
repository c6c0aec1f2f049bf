//! Core engine for incrementally grown 2-D fractal trees.
//!
//! Main components:
//! - [`geometry`] — pure functions computing segment anchors, bases and
//!   child angles.
//! - [`segment`] — the growth unit carried through the queue.
//! - [`queue`] — index-addressed work queue of pending segments.
//! - [`tree`] — the growth engine driven one step (or one length budget)
//!   at a time.
//! - [`sink`] — draw intents and the [`sink::RenderSink`] contract the
//!   engine drives.
//! - [`color`] — RGB/HSL colors and gradient lightness.
//! - [`config`] — tunable growth parameters.
//! - [`error`] — error type shared by the crate.
//! - [`types`] — shared type aliases and IDs.

pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod queue;
pub mod segment;
pub mod sink;
pub mod tree;
pub mod types;
