//! Block type registry, highlight colors and the filter table.
#![forbid(unsafe_code)]

pub mod config;
pub mod filter;
pub mod registry;
pub mod types;

pub use config::{BlockDef, BlocksConfig, HighlightConfig, HighlightEntry};
pub use filter::FilterTable;
pub use registry::{BlockRegistry, TypeRegistry};
pub use types::{AIR, BlockId, Rgba};
