//! Mapping refresh configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MappingConfig {
    /// Anchors per bulk-sweep page during a full refresh.
    pub sweep_page_size: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            sweep_page_size: 500,
        }
    }
}
