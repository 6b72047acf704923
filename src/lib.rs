//! Inkdex - encyclopedia cards for small e-ink panels
//!
//! Lays out a sprite, type icons, name and a flavor text on one canvas,
//! reduces it to the panel's few colors and pushes it to a display.
//! This library exposes modules for integration testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
