//! Einops pattern scanning, parsing and validation.
//!
//! Supports the einops grammar:
//! - Named axes: `h w -> w h`
//! - Groups: `b (h w) c -> b h w c`, nested `((a b) c) -> a b c`
//! - Ellipsis: `batch ... c -> batch c ...`, flattened on output `b ... -> b (...)`
//! - Singletons: `a 1 b -> a b`

mod ast;
mod axis;
mod parser;
mod scanner;
pub mod validation;

pub use ast::{EinopsAst, PatternMetadata, Side};
pub use axis::{AxisPattern, ellipsis_count, explicit_count, flatten_names, has_ellipsis, simple_names};
pub use parser::parse_pattern;
pub use scanner::{Span, Token, TokenKind, scan};
pub use validation::{
    OperationKind, validate_explicit_sizes, validate_for, validate_pattern,
    validate_reduce_pattern, validate_repeat_pattern,
};

pub(crate) use ast::owned_sorted;
