//! Client file set and body animation lookup for the `uoanim-rs` project.
//!
//! - [`ClientFiles`] / [`ClientSettings`]: where the client files are
//! - [`AnimFile`]: the six legacy animation families
//! - [`AnimationLookupService`]: frame, action and art queries over the opened files

pub mod config;
mod error;
pub mod lookup;
pub mod variant;

pub use config::{ClientFiles, ClientSettings, FileOverride};
pub use error::VfsError;
pub use lookup::{AnimationLookupService, NO_ACTION, UopGroup};
pub use variant::AnimFile;
