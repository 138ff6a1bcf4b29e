//! Prelude module for `uoanim_internal`.
//!
//! This module provides a convenient way to import commonly used types and traits.
//!
//! # Examples
//!
//! ```rust
//! use uoanim_internal::prelude::*;
//!
//! // Now you can use all common types directly
//! let mut service: AnimationLookupService = AnimationLookupService::new();
//! assert_eq!(service.resolve_action(400, 0), NO_ACTION);
//!
//! let remapper = BodyRemapper::from_strs("", "501 -1 -1 650 -1");
//! assert_eq!(remapper.resolve_for_mul(501).variant, 3);
//! ```

// Re-export everything from uoanim_types::prelude
#[doc(inline)]
pub use uoanim_types::prelude::*;

#[doc(inline)]
pub use uoanim_vfs::{AnimFile, AnimationLookupService, ClientFiles, ClientSettings, NO_ACTION, VfsError};

// Re-export the entire uoanim_types module for advanced usage
#[doc(inline)]
pub use uoanim_types;
