//! This crate provides core data types and file format support for the `uoanim-rs` project.
//!
//! # File Formats
//!
//! - **UOP**: Hashed archives (`AnimationFrame*.uop`, `AnimationSequence.uop`) addressed by path hash
//! - **BIN**: Animation frame containers stored inside the UOP archives
//! - **MUL/IDX**: Classic index + data pairs (`anim*.mul`, `art.mul`)
//! - **hues.mul**: Color ramps used to recolor sprites
//! - **body.def / bodyconv.def**: Body id remapping tables
//!
//! # Examples
//!
//! Using the prelude (recommended):
//!
//! ```no_run
//! use uoanim_types::prelude::*;
//!
//! # fn main() -> Result<(), UoFileError> {
//! let mut archive = UopFile::open("AnimationFrame1.uop")?;
//! let hash = uop::hash::animation_frame_hash(400, 0);
//! if let Some(bytes) = archive.read_hash(hash)? {
//! 	let frame = decode_uop_bin(&bytes, 0, 0);
//! 	println!("{:?}", frame.map(|frame| frame.header));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Or use explicit paths:
//!
//! ```no_run
//! use uoanim_types::file::body_def::BodyRemapper;
//!
//! let remapper = BodyRemapper::load("body.def", "bodyconv.def");
//! let id = remapper.resolve_for_uop(400);
//! ```

pub mod file;

/// `use uoanim_types::prelude::*;` to import commonly used items.
pub mod prelude;
