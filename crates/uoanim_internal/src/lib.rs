//! This module is separated into its own crate to enable simple dynamic linking for `uoanim`, and should not be used directly.

/// `use uoanim::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export member crates for convenience
pub use uoanim_types;
pub use uoanim_vfs;

// Re-export commonly used types at crate root
pub use uoanim_types::file::{BodyRemapper, DecodedFrame, UoFileError, UopFile};
pub use uoanim_vfs::{AnimationLookupService, ClientFiles, VfsError};
