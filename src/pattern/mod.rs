//! Pattern recognition for rearrange fast paths.
//!
//! Recognizes patterns that map onto a single tensor primitive:
//! - Identity
//! - Two-axis transpose
//! - General permutation of simple axes
//!
//! Anything involving composites, ellipses or singletons goes through the
//! general reshape/permute/reshape planner instead.

mod fast_path;
mod permutation;

pub use fast_path::FastPath;
pub use permutation::{is_identity, is_identity_permutation, is_permute, is_transpose, permutation_of};

use crate::notation::EinopsAst;

/// Pattern matcher for rearrange patterns.
pub struct PatternMatcher;

impl PatternMatcher {
    /// Attempts to recognize a fast-path pattern.
    pub fn recognize(ast: &EinopsAst) -> Option<FastPath> {
        recognize_pattern(ast)
    }
}

/// Main entry point for pattern recognition.
///
/// Tries the patterns in order of specificity; the first match wins.
pub fn recognize_pattern(ast: &EinopsAst) -> Option<FastPath> {
    if !ast.is_simple_only() {
        return None;
    }

    let perm = permutation_of(ast)?;

    if is_identity_permutation(&perm) {
        return Some(FastPath::Identity);
    }

    if perm == [1, 0] {
        return Some(FastPath::Transpose);
    }

    Some(FastPath::Permute { axes: perm })
}
