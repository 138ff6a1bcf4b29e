//! Prelude module for `uoanim_types`.
//!
//! This module provides a convenient way to import commonly used types, traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use uoanim_types::prelude::*;
//!
//! // Now you can use all common types directly
//! let remapper = BodyRemapper::from_strs("400 401 0", "");
//! let hues = HueTable::new();
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	// Animation types
	DecodedFrame,
	FrameHeader,
	IndexedImage,
	decode_mul_bytes,
	decode_uop_bin,

	// Art types
	ArtRecord,

	// Remapping types
	BodyConvEntry,
	BodyDefEntry,
	BodyRemapper,
	MulResolution,

	// Colors
	Color,
	ColorBlend,
	HueTable,
	Palette,
	ScaleBlend,

	// Archive types
	ArchiveRecord,
	FileType,
	IndexRecord,
	MulPair,
	UoFileError,
	UopFile,
};

#[doc(inline)]
pub use crate::file::{anim, uop};

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
