//! Complete einops pattern representation.

use alloc::collections::BTreeSet;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

use super::axis::{self, AxisPattern};

/// One side of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Input,
    Output,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Input => write!(f, "input"),
            Side::Output => write!(f, "output"),
        }
    }
}

/// Source information kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PatternMetadata {
    /// The pattern exactly as given by the caller.
    pub original: String,
    /// Number of tokens left of the arrow.
    pub input_tokens: usize,
    /// Number of tokens right of the arrow.
    pub output_tokens: usize,
    /// Character offset of the arrow.
    pub arrow_position: usize,
}

/// Parsed einops pattern.
///
/// Built once per pattern string and never mutated. Equality compares the
/// structure of both sides only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EinopsAst {
    input: Vec<AxisPattern>,
    output: Vec<AxisPattern>,
    metadata: PatternMetadata,
}

impl EinopsAst {
    /// Creates an AST from its sides. The original text is the normalized
    /// rendering of the sides.
    pub fn new(input: Vec<AxisPattern>, output: Vec<AxisPattern>) -> Self {
        let mut ast = Self {
            input,
            output,
            metadata: PatternMetadata::default(),
        };
        ast.metadata.original = ast.to_string();
        ast
    }

    /// Replaces the diagnostic metadata.
    pub fn with_metadata(mut self, metadata: PatternMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    #[inline]
    pub fn input(&self) -> &[AxisPattern] {
        &self.input
    }

    #[inline]
    pub fn output(&self) -> &[AxisPattern] {
        &self.output
    }

    #[inline]
    pub fn side(&self, side: Side) -> &[AxisPattern] {
        match side {
            Side::Input => &self.input,
            Side::Output => &self.output,
        }
    }

    #[inline]
    pub fn metadata(&self) -> &PatternMetadata {
        &self.metadata
    }

    /// Returns the original pattern string.
    #[inline]
    pub fn pattern(&self) -> &str {
        &self.metadata.original
    }

    /// Simple axis names on the input side, in order.
    pub fn input_names(&self) -> Vec<&str> {
        axis::flatten_names(&self.input)
    }

    /// Simple axis names on the output side, in order.
    pub fn output_names(&self) -> Vec<&str> {
        axis::flatten_names(&self.output)
    }

    /// Every simple axis name appearing on either side.
    pub fn all_names(&self) -> BTreeSet<&str> {
        self.input_names()
            .into_iter()
            .chain(self.output_names())
            .collect()
    }

    /// Returns true if either side uses an ellipsis.
    pub fn has_ellipsis(&self) -> bool {
        axis::has_ellipsis(&self.input) || axis::has_ellipsis(&self.output)
    }

    /// Returns true if both sides consist only of simple axes.
    pub fn is_simple_only(&self) -> bool {
        self.input.iter().all(AxisPattern::is_simple) && self.output.iter().all(AxisPattern::is_simple)
    }

    /// Returns true if the output side is empty (rank 0).
    #[inline]
    pub fn is_scalar_output(&self) -> bool {
        self.output.is_empty()
    }
}

impl PartialEq for EinopsAst {
    fn eq(&self, other: &Self) -> bool {
        self.input == other.input && self.output == other.output
    }
}

impl Eq for EinopsAst {}

impl fmt::Display for EinopsAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        axis::fmt_side(&self.input, f)?;
        write!(f, " -> ")?;
        axis::fmt_side(&self.output, f)
    }
}

/// Sorted, deduplicated owned names, for error reporting.
pub(crate) fn owned_sorted<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let set: BTreeSet<&str> = names.into_iter().collect();
    set.into_iter().map(ToString::to_string).collect()
}
