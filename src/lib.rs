#![allow(clippy::single_component_path_imports)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! `uoanim-rs` decodes Ultima Online body animations and static art from the client files.
//!
//! ```no_run
//! use uoanim_rs::prelude::*;
//!
//! let files = ClientFiles::from_dir("/games/uo");
//! let mut service = AnimationLookupService::from_client_files(&files);
//! service.load_uop_animations();
//!
//! if let Some(frame) = service.get_frame(400, 0, 1, 0, 0) {
//! 	frame.to_rgba_image().save("400.png").ok();
//! }
//! ```
pub use uoanim_internal::*;

#[cfg(all(feature = "dynamic_linking", not(target_family = "wasm")))]
#[allow(unused_imports)]
use uoanim_dylib;
