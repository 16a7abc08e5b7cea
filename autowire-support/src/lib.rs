//! # Autowire Support
//!
//! Shared utilities for the autowire crates.
//!
//! This crate provides:
//! - Text rendering for error messages
//! - Logging setup on top of `tracing-subscriber`

pub mod logging;
pub mod rendering;
