//! # Einops Engine
//!
//! Pattern-driven tensor axis manipulation: `rearrange`, `reduce` and
//! `repeat` described by strings like `"b (h w) c -> b h w c"`.
//!
//! ## Features
//!
//! - Pattern parsing with composite axes, ellipsis and singletons
//! - Shape-independent validation with structured diagnostics
//! - Axis size resolution from the input shape and explicit sizes
//! - Fast paths for identity, transpose and permute
//! - Plans made of backend primitives (reshape, permute, reduce, expand)
//! - Async execution over any backend implementing the capability traits
//!
//! ## Example
//!
//! ```ignore
//! use einops_engine::{DenseTensor, rearrange};
//!
//! let images = DenseTensor::from_fn(&[2, 3, 32, 32], |i| i as f32);
//! let nhwc = rearrange(images, "b c h w -> b h w c", &[]).await?;
//!
//! // Split a flattened batch
//! let seq = rearrange(flat, "(batch seq) hidden -> batch seq hidden", &[("batch", 4)]).await?;
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(feature = "std")]
pub mod cache;
pub mod error;
pub mod launch;
pub mod notation;
pub mod pattern;
pub mod plan;
pub mod resolve;
pub mod tensor;

#[cfg(feature = "std")]
pub use cache::PatternCache;
pub use error::{EinopsError, EinopsResult, ErrorStage, ExecutionError};
pub use launch::{Einops, EinopsConfig, rearrange, reduce, repeat};
pub use notation::{AxisPattern, EinopsAst, OperationKind, Span, parse_pattern, validate_pattern};
pub use pattern::{FastPath, PatternMatcher};
pub use plan::{RearrangePlan, ReducePlan, ReductionOp, RepeatPlan, TensorOperation, create_plan};
pub use resolve::{AxisDimensionMap, ResolvedPattern, resolve_pattern};
pub use tensor::{DenseTensor, ExpandCapability, ReduceCapability, TensorCapability};
