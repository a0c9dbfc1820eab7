//! Axis pattern representation for einops notation.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

use super::scanner::Span;

/// A single term on one side of a pattern.
///
/// Spans are carried for diagnostics only and take no part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AxisPattern {
    /// A named axis.
    Simple { name: String, span: Span },
    /// A parenthesized group; its size is the product of its members.
    Composite { axes: Vec<AxisPattern>, span: Span },
    /// A run of zero or more unnamed axes.
    Ellipsis { span: Span },
    /// The literal `1`.
    Singleton { span: Span },
}

impl AxisPattern {
    /// Creates a simple axis without source position.
    pub fn simple(name: impl Into<String>) -> Self {
        AxisPattern::Simple {
            name: name.into(),
            span: Span::default(),
        }
    }

    /// Creates a composite without source position.
    pub fn composite(axes: impl IntoIterator<Item = AxisPattern>) -> Self {
        AxisPattern::Composite {
            axes: axes.into_iter().collect(),
            span: Span::default(),
        }
    }

    pub fn ellipsis() -> Self {
        AxisPattern::Ellipsis {
            span: Span::default(),
        }
    }

    pub fn singleton() -> Self {
        AxisPattern::Singleton {
            span: Span::default(),
        }
    }

    /// Returns the source span of this term.
    #[inline]
    pub fn span(&self) -> Span {
        match self {
            AxisPattern::Simple { span, .. }
            | AxisPattern::Composite { span, .. }
            | AxisPattern::Ellipsis { span }
            | AxisPattern::Singleton { span } => *span,
        }
    }

    /// Returns the name if this is a simple axis.
    #[inline]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            AxisPattern::Simple { name, .. } => Some(name),
            _ => None,
        }
    }

    #[inline]
    pub fn is_simple(&self) -> bool {
        matches!(self, AxisPattern::Simple { .. })
    }

    #[inline]
    pub fn is_ellipsis(&self) -> bool {
        matches!(self, AxisPattern::Ellipsis { .. })
    }

    /// Returns true if this term is or contains an ellipsis.
    pub fn contains_ellipsis(&self) -> bool {
        match self {
            AxisPattern::Ellipsis { .. } => true,
            AxisPattern::Composite { axes, .. } => axes.iter().any(AxisPattern::contains_ellipsis),
            AxisPattern::Simple { .. } | AxisPattern::Singleton { .. } => false,
        }
    }

    /// Counts ellipsis terms at any depth.
    pub fn ellipsis_count(&self) -> usize {
        match self {
            AxisPattern::Ellipsis { .. } => 1,
            AxisPattern::Composite { axes, .. } => axes.iter().map(AxisPattern::ellipsis_count).sum(),
            AxisPattern::Simple { .. } | AxisPattern::Singleton { .. } => 0,
        }
    }

    /// Appends every simple axis name, in order, at any depth.
    pub fn collect_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            AxisPattern::Simple { name, .. } => out.push(name),
            AxisPattern::Composite { axes, .. } => {
                for axis in axes {
                    axis.collect_names(out);
                }
            }
            AxisPattern::Ellipsis { .. } | AxisPattern::Singleton { .. } => {}
        }
    }

    /// Visits every composite, innermost first.
    pub fn visit_composites<'a>(&'a self, f: &mut dyn FnMut(&'a [AxisPattern], Span)) {
        if let AxisPattern::Composite { axes, span } = self {
            for axis in axes {
                axis.visit_composites(f);
            }
            f(axes, *span);
        }
    }
}

impl PartialEq for AxisPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (AxisPattern::Simple { name: a, .. }, AxisPattern::Simple { name: b, .. }) => a == b,
            (AxisPattern::Composite { axes: a, .. }, AxisPattern::Composite { axes: b, .. }) => {
                a == b
            }
            (AxisPattern::Ellipsis { .. }, AxisPattern::Ellipsis { .. }) => true,
            (AxisPattern::Singleton { .. }, AxisPattern::Singleton { .. }) => true,
            _ => false,
        }
    }
}

impl Eq for AxisPattern {}

impl fmt::Display for AxisPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisPattern::Simple { name, .. } => write!(f, "{}", name),
            AxisPattern::Composite { axes, .. } => {
                write!(f, "(")?;
                fmt_side(axes, f)?;
                write!(f, ")")
            }
            AxisPattern::Ellipsis { .. } => write!(f, "..."),
            AxisPattern::Singleton { .. } => write!(f, "1"),
        }
    }
}

/// Writes a side as space-separated terms.
pub(crate) fn fmt_side(side: &[AxisPattern], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, axis) in side.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", axis)?;
    }
    Ok(())
}

/// Returns every simple name on a side, in order, through composites.
pub fn flatten_names(side: &[AxisPattern]) -> Vec<&str> {
    let mut names = Vec::new();
    for axis in side {
        axis.collect_names(&mut names);
    }
    names
}

/// Counts ellipsis terms on a side at any depth.
pub fn ellipsis_count(side: &[AxisPattern]) -> usize {
    side.iter().map(AxisPattern::ellipsis_count).sum()
}

/// Returns true if the side has an ellipsis at any depth.
pub fn has_ellipsis(side: &[AxisPattern]) -> bool {
    side.iter().any(AxisPattern::contains_ellipsis)
}

/// Returns the names if every term on the side is a simple axis.
pub fn simple_names(side: &[AxisPattern]) -> Option<Vec<&str>> {
    side.iter().map(AxisPattern::as_name).collect()
}

/// Number of top-level terms that are not an ellipsis.
pub fn explicit_count(side: &[AxisPattern]) -> usize {
    side.iter().filter(|axis| !axis.is_ellipsis()).count()
}
