pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod store;
pub mod sync;
pub mod ui;

pub use error::{BumpError, Result};
pub use sync::{SyncConfig, SyncState, VersionSync};
