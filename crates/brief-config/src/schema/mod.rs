//! Configuration schema types for brief.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with defaults that talk to a locally running
//! generation service.

mod logging;
mod server;
mod stream;

pub use logging::*;
pub use server::*;
pub use stream::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for brief.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct BriefConfig {
    pub server: ServerConfig,
    pub stream: StreamConfig,
    pub logging: LoggingConfig,
}
