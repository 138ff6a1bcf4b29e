//! File type support for `uoanim-rs` project.

mod error;
pub(crate) mod io;

pub mod anim;
pub mod art;
pub mod body_def;
pub mod hues;
pub mod mul;
pub mod palette;
pub mod uop;

// Re-export unified error type
pub use error::{FileType, UoFileError};

// Re-export main file types
pub use anim::{DecodedFrame, FrameHeader, IndexedImage, decode_mul_bytes, decode_uop_bin};
pub use art::{ArtRecord, item_record_id};
pub use body_def::{BodyConvEntry, BodyDefEntry, BodyRemapper, MulResolution};
pub use hues::HueTable;
pub use mul::{IndexRecord, Pair as MulPair};
pub use palette::{Color, ColorBlend, Palette, ScaleBlend};
pub use uop::{
	ArchiveRecord, Builder as UopBuilder, Compression as UopCompression, File as UopFile,
	sequence::{GroupReplacement, SequenceRecord},
};
