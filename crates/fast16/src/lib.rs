//! Ergonomic wrappers over `fast16-core` that accept `image::RgbaImage` inputs.
//!
//! - [`image`] – detection and annotation helpers on `image::RgbaImage`.
//! - [`app`] – configuration, file I/O and the timing report shared by the CLI.
//! - [`logger`] – `tracing-subscriber` setup for the binary.

pub mod app;
pub mod image;
pub mod logger;

pub use fast16_core::*;

pub use crate::image::{annotate_image, find_corners_image, paint_image, view_of};
