//! Error types for einops operations.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::notation::Span;

/// Pipeline stage at which a pattern was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorStage {
    /// The pattern string is not well-formed.
    Parse,
    /// The pattern is well-formed but semantically illegal.
    Axis,
    /// The pattern does not fit the concrete input shape or sizes.
    Shape,
}

impl fmt::Display for ErrorStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorStage::Parse => write!(f, "parse"),
            ErrorStage::Axis => write!(f, "axis"),
            ErrorStage::Shape => write!(f, "shape"),
        }
    }
}

/// Errors that can occur while parsing, validating or resolving a pattern.
///
/// Every variant carries the original pattern so the failure can be
/// reproduced from the error alone.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EinopsError {
    /// Invalid pattern syntax.
    #[error("parse error in '{pattern}' at {span}: {message}")]
    ParseError {
        pattern: String,
        message: String,
        span: Span,
    },

    /// Semantically illegal pattern (independent of any shape).
    #[error("axis error in '{pattern}': {message}{}", format_axes(.axes))]
    AxisError {
        pattern: String,
        message: String,
        /// Offending axis names, sorted.
        axes: Vec<String>,
    },

    /// Pattern incompatible with the input shape or explicit sizes.
    #[error("shape error in '{pattern}': {message}{}", format_shapes(.expected, .actual))]
    ShapeError {
        pattern: String,
        message: String,
        axes: Vec<String>,
        expected: Option<Vec<usize>>,
        actual: Option<Vec<usize>>,
    },
}

fn format_axes(axes: &[String]) -> String {
    if axes.is_empty() {
        String::new()
    } else {
        alloc::format!(" {{{}}}", axes.join(", "))
    }
}

fn format_shapes(expected: &Option<Vec<usize>>, actual: &Option<Vec<usize>>) -> String {
    match (expected, actual) {
        (Some(expected), Some(actual)) => {
            alloc::format!(" (expected {:?}, got {:?})", expected, actual)
        }
        (None, Some(actual)) => alloc::format!(" (got {:?})", actual),
        (Some(expected), None) => alloc::format!(" (expected {:?})", expected),
        (None, None) => String::new(),
    }
}

impl EinopsError {
    pub fn parse(pattern: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self::ParseError {
            pattern: pattern.into(),
            message: message.into(),
            span,
        }
    }

    pub fn axis<I, S>(pattern: impl Into<String>, message: impl Into<String>, axes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut axes: Vec<String> = axes.into_iter().map(Into::into).collect();
        axes.sort();
        axes.dedup();
        Self::AxisError {
            pattern: pattern.into(),
            message: message.into(),
            axes,
        }
    }

    pub fn shape(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ShapeError {
            pattern: pattern.into(),
            message: message.into(),
            axes: Vec::new(),
            expected: None,
            actual: None,
        }
    }

    /// Attaches offending axis names to a shape error.
    pub fn with_axes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let Self::ShapeError { axes, .. } = &mut self {
            axes.extend(names.into_iter().map(Into::into));
        }
        self
    }

    /// Attaches expected vs. actual shapes to a shape error.
    pub fn with_shapes(mut self, expected_shape: Vec<usize>, actual_shape: Vec<usize>) -> Self {
        if let Self::ShapeError {
            expected, actual, ..
        } = &mut self
        {
            *expected = Some(expected_shape);
            *actual = Some(actual_shape);
        }
        self
    }

    /// Attaches the actual input shape to a shape error.
    pub fn with_actual(mut self, actual_shape: &[usize]) -> Self {
        if let Self::ShapeError { actual, .. } = &mut self {
            *actual = Some(actual_shape.to_vec());
        }
        self
    }

    /// Returns the stage at which the pattern failed.
    pub fn stage(&self) -> ErrorStage {
        match self {
            Self::ParseError { .. } => ErrorStage::Parse,
            Self::AxisError { .. } => ErrorStage::Axis,
            Self::ShapeError { .. } => ErrorStage::Shape,
        }
    }

    /// Returns the original pattern string.
    pub fn pattern(&self) -> &str {
        match self {
            Self::ParseError { pattern, .. }
            | Self::AxisError { pattern, .. }
            | Self::ShapeError { pattern, .. } => pattern,
        }
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        match self {
            Self::ParseError { message, .. }
            | Self::AxisError { message, .. }
            | Self::ShapeError { message, .. } => message,
        }
    }

    /// Returns the offending axis names (empty for parse errors).
    pub fn axes(&self) -> &[String] {
        match self {
            Self::ParseError { .. } => &[],
            Self::AxisError { axes, .. } | Self::ShapeError { axes, .. } => axes,
        }
    }
}

/// Result type for pattern-level operations.
pub type EinopsResult<T> = core::result::Result<T, EinopsError>;

/// Error returned by the executing entry points.
///
/// Capability failures are carried through unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError<E> {
    #[error(transparent)]
    Einops(#[from] EinopsError),

    #[error("tensor operation failed: {0}")]
    Tensor(E),
}

impl<E> ExecutionError<E> {
    /// Returns the pattern error, if the failure happened before execution.
    pub fn as_einops(&self) -> Option<&EinopsError> {
        match self {
            Self::Einops(err) => Some(err),
            Self::Tensor(_) => None,
        }
    }

    /// Returns the capability error, if a tensor operation failed.
    pub fn as_tensor(&self) -> Option<&E> {
        match self {
            Self::Einops(_) => None,
            Self::Tensor(err) => Some(err),
        }
    }
}
