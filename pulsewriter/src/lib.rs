#![doc = "pulsewriter: CLI, HTTP API and publishing frontend over pulsewriter-core."]

//! All transform/revision logic lives in the `pulsewriter-core` crate; this
//! crate is the I/O shell around it: argument parsing, config resolution,
//! post discovery, the axum server and the GitHub connector.

pub mod api;
pub mod cli;
pub mod discover;
pub mod github;
pub mod load_config;
