//! Result of binding a pattern to a concrete input shape.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Mapping from axis name to its resolved size.
pub type AxisDimensionMap = HashMap<String, usize>;

/// Concrete sizes for one (pattern, input shape, explicit sizes) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPattern {
    /// Size of every simple axis named in the pattern.
    pub axis_dimensions: AxisDimensionMap,
    /// Dimensions consumed by the input ellipsis, in order.
    pub ellipsis_dimensions: Vec<usize>,
    /// Final output shape.
    pub output_shape: Vec<usize>,
}

impl ResolvedPattern {
    /// Returns the resolved size of an axis.
    #[inline]
    pub fn size_of(&self, name: &str) -> Option<usize> {
        self.axis_dimensions.get(name).copied()
    }
}
