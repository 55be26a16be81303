//! Domain logic - version arithmetic and run selection, independent of any file format

pub mod change;
pub mod platform;
pub mod version;

pub use change::FieldChange;
pub use platform::{Platform, SkipSet};
pub use version::{BumpKind, Version};
