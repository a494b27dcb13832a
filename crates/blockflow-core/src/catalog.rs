//! Type-name to shape-class registry.

use crate::collections::map::HashMap;
use blockflow_graphics::ShapeClass;

const DEFAULT_HATS: &[&str] = &["start", "trigger", "webhook_trigger"];
const DEFAULT_CAPS: &[&str] = &["end", "return", "stop"];
const DEFAULT_C_BLOCKS: &[(&str, usize)] = &[
    ("if", 1),
    ("if_else", 2),
    ("switch_case", 3),
    ("try_catch", 2),
    ("loop", 1),
    ("for_each", 1),
    ("while", 1),
    ("parallel", 2),
];

/// Maps block type names to their shape class.
///
/// Unregistered names are plain stack blocks. Arm counts are fixed at block
/// creation, so re-registering a kind only affects blocks created afterwards.
#[derive(Clone, Debug)]
pub struct BlockCatalog {
    kinds: HashMap<String, ShapeClass>,
}

impl BlockCatalog {
    /// Catalog with no registered kinds: every block is a stack block.
    pub fn empty() -> Self {
        Self {
            kinds: HashMap::default(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, class: ShapeClass) {
        self.kinds.insert(name.into(), class);
    }

    pub fn with(mut self, name: impl Into<String>, class: ShapeClass) -> Self {
        self.register(name, class);
        self
    }

    pub fn shape_of(&self, name: &str) -> ShapeClass {
        self.kinds.get(name).copied().unwrap_or(ShapeClass::Stack)
    }
}

impl Default for BlockCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        for name in DEFAULT_HATS {
            catalog.register(*name, ShapeClass::Hat);
        }
        for name in DEFAULT_CAPS {
            catalog.register(*name, ShapeClass::Cap);
        }
        for (name, arms) in DEFAULT_C_BLOCKS {
            catalog.register(*name, ShapeClass::CBlock { arms: *arms });
        }
        catalog
    }
}
