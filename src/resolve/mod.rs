//! Axis resolution.
//!
//! Binds every axis of a validated pattern to a concrete size using the
//! input shape and explicit sizes, then computes the output shape.

mod resolved;
mod resolver;

pub use resolved::{AxisDimensionMap, ResolvedPattern};
pub use resolver::{resolve_pattern, resolve_pattern_for};
