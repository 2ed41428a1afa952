pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod manifest;
pub mod sync;
pub mod ui;
pub mod version;
pub mod warning;

pub use error::{PluginVersionError, Result};
pub use sync::VersionSynchronizer;
