//! Memoization of parsed patterns.

use alloc::string::String;
use alloc::sync::Arc;

use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::error::EinopsResult;
use crate::notation::{EinopsAst, parse_pattern};

/// Thread-safe cache of successful parses, keyed by the raw pattern string.
///
/// Failed parses are never stored. Once `capacity` entries are held, new
/// patterns are parsed but no longer inserted. A capacity of 0 means
/// unbounded.
#[derive(Debug, Default)]
pub struct PatternCache {
    entries: RwLock<HashMap<String, Arc<EinopsAst>>>,
    capacity: usize,
}

impl PatternCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// Returns the cached parse of `pattern`, parsing it on a miss.
    pub fn get_or_parse(&self, pattern: &str) -> EinopsResult<Arc<EinopsAst>> {
        if let Some(ast) = self.entries.read().get(pattern) {
            tracing::trace!(pattern, "pattern cache hit");
            return Ok(Arc::clone(ast));
        }

        tracing::trace!(pattern, "pattern cache miss");
        let ast = Arc::new(parse_pattern(pattern)?);

        let mut entries = self.entries.write();
        if self.capacity == 0 || entries.len() < self.capacity {
            let entry = entries
                .entry(String::from(pattern))
                .or_insert_with(|| Arc::clone(&ast));
            return Ok(Arc::clone(entry));
        }
        Ok(ast)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.entries.read().contains_key(pattern)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
