//! `hues.mul` hue tables.
//!
//! The file is a sequence of 708-byte groups, each holding 8 hues:
//!
//! ```text
//! 0x00    4     header        Unused
//! 0x04    88×8  hues
//! ```
//!
//! Each hue entry:
//!
//! ```text
//! +0x00   64    ramp          32 × u16 colors, dark to light
//! +0x40   2     table_start
//! +0x42   2     table_end
//! +0x44   20    name          NUL padded ASCII
//! ```
//!
//! Hue ids are 1-based: the first entry of the file is hue 1.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;

use log::debug;

use crate::file::io::ReadExt;
use crate::file::palette::{Color, ColorBlend, channels_555};
use crate::file::{FileType, UoFileError};

/// Size of one group of 8 hues
pub const GROUP_SIZE: usize = 708;

/// Hues per group
pub const HUES_PER_GROUP: usize = 8;

/// Colors in one hue ramp
pub const RAMP_SIZE: usize = 32;

/// Bytes following a ramp (start, end, name)
const ENTRY_TRAILER_SIZE: usize = 24;

/// Hue tables keyed by 1-based hue id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HueTable {
	ramps: HashMap<u16, [u16; RAMP_SIZE]>,
}

impl HueTable {
	/// Creates an empty table; every hue then blends like [`crate::file::ScaleBlend`].
	pub fn new() -> Self {
		Self::default()
	}

	/// Loads `hues.mul`.
	pub fn open(path: impl AsRef<Path>) -> Result<Self, UoFileError> {
		let data = std::fs::read(path)?;
		Self::from_bytes(&data)
	}

	/// Parses every complete group of `data`. A trailing partial group is ignored.
	pub fn from_bytes(data: &[u8]) -> Result<Self, UoFileError> {
		if data.len() < GROUP_SIZE {
			return Err(UoFileError::insufficient_data(FileType::Hues, GROUP_SIZE, data.len()));
		}

		let group_count = data.len() / GROUP_SIZE;
		let mut reader = Cursor::new(data);
		let mut ramps = HashMap::with_capacity(group_count * HUES_PER_GROUP);

		for group in 0..group_count {
			let _header = reader.read_u32_le()?;
			for entry in 0..HUES_PER_GROUP {
				let mut ramp = [0u16; RAMP_SIZE];
				for color in ramp.iter_mut() {
					*color = reader.read_u16_le()?;
				}
				let mut trailer = [0u8; ENTRY_TRAILER_SIZE];
				reader.read_exact(&mut trailer)?;

				let id = group * HUES_PER_GROUP + entry + 1;
				if let Ok(id) = u16::try_from(id) {
					ramps.insert(id, ramp);
				}
			}
		}

		debug!("Loaded {} hues from {} groups", ramps.len(), group_count);
		Ok(Self {
			ramps,
		})
	}

	/// Adds or replaces the ramp of hue `id`.
	pub fn insert(&mut self, id: u16, ramp: [u16; RAMP_SIZE]) {
		self.ramps.insert(id, ramp);
	}

	/// Color ramp of hue `id`.
	pub fn ramp(&self, id: u16) -> Option<&[u16; RAMP_SIZE]> {
		self.ramps.get(&id)
	}

	/// Number of hues loaded.
	pub fn len(&self) -> usize {
		self.ramps.len()
	}

	/// Returns `true` when no hue is loaded.
	pub fn is_empty(&self) -> bool {
		self.ramps.is_empty()
	}
}

impl ColorBlend for HueTable {
	fn blend(&self, color: u16, hue: u16, partial: bool) -> Color {
		let base = Color::from_555_scaled(color);
		if hue == 0 {
			return base;
		}
		if partial && base.r != base.g && base.r != base.b {
			return base;
		}

		let (r, g, b) = channels_555(color);
		let gray = ((r as usize + g as usize + b as usize) / 3).min(RAMP_SIZE - 1);

		match self.ramps.get(&hue) {
			Some(ramp) => Color::from_555_scaled(ramp[gray]),
			None => base,
		}
	}
}
