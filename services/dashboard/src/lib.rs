//! advis dashboard library.
//!
//! This crate primarily ships the `advis-dashboard` binary, but exposes its
//! router, state and upload pipeline for integration testing.

pub mod api;
pub mod audit;
pub mod config;
pub mod logging;
pub mod pipeline;
pub mod state;
mod views;
