#![doc = "pulsewriter-core: core transform logic for pulsewriter."]

//! This crate contains the platform model, template rendering, draft
//! generation and draft revision for pulsewriter. It performs no network
//! access; everything here is a function of its inputs and the embedded
//! template assets.
//!
//! # Usage
//! Construct a [`render::Renderer`] once per process and pass it to
//! [`transform::generate`]. The CLI and HTTP frontends live in the
//! `pulsewriter` binary crate.

pub mod io;
pub mod platform;
pub mod render;
pub mod revise;
pub mod transform;

pub use platform::{parse_platforms, Platform, UnknownPlatformError};
pub use render::{RenderContext, RenderError, Renderer};
pub use revise::revise;
pub use transform::{generate, DraftSet, TransformConfig};
