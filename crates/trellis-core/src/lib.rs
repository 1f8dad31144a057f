//! Trellis core - shared utilities for the widget runtime.
//!
//! This crate provides:
//! - Re-exports of optimized hash collections using AHash
//! - Logging bootstrap built on `tracing`
//! - The [`Value`](value::Value) dynamic value type used for widget
//!   options, operation arguments, runtime state and event payloads

pub mod alloc;
pub mod logging;
pub mod value;

pub use value::Value;
