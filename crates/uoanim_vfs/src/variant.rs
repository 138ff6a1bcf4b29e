//! Legacy animation file families.
//!
//! Bodies are spread over six `anim*.idx` / `anim*.mul` pairs. `bodyconv.def`
//! names the family by column: variant 0 is `anim`, variant `k` is
//! `anim{k+1}`. Each family lays its bodies out in blocks of different sizes,
//! so the first record of a body depends on the family.

use std::fmt;

/// Number of legacy animation families
pub const ANIM_FILE_COUNT: usize = 6;

/// Records per body in the high detail block (22 actions)
const HIGH_DETAIL_RECORDS: u32 = 110;
/// Records per body in the low detail block (13 actions)
const LOW_DETAIL_RECORDS: u32 = 65;
/// Records per body in the human block (35 actions)
const HUMAN_RECORDS: u32 = 175;

/// One `anim*.idx` / `anim*.mul` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AnimFile {
	/// `anim.idx` / `anim.mul`
	Anim,
	/// `anim2.idx` / `anim2.mul`
	Anim2,
	/// `anim3.idx` / `anim3.mul`
	Anim3,
	/// `anim4.idx` / `anim4.mul`
	Anim4,
	/// `anim5.idx` / `anim5.mul`
	Anim5,
	/// `anim6.idx` / `anim6.mul`
	Anim6,
}

impl AnimFile {
	/// Every family, in variant order.
	pub const ALL: [Self; ANIM_FILE_COUNT] =
		[Self::Anim, Self::Anim2, Self::Anim3, Self::Anim4, Self::Anim5, Self::Anim6];

	/// Family of a `bodyconv.def` variant, `None` past `anim6`.
	pub fn from_variant(variant: u8) -> Option<Self> {
		Self::ALL.get(variant as usize).copied()
	}

	/// Position in [`AnimFile::ALL`], which is also the variant number.
	pub fn index(self) -> usize {
		self as usize
	}

	/// File name without extension.
	pub fn stem(self) -> &'static str {
		match self {
			Self::Anim => "anim",
			Self::Anim2 => "anim2",
			Self::Anim3 => "anim3",
			Self::Anim4 => "anim4",
			Self::Anim5 => "anim5",
			Self::Anim6 => "anim6",
		}
	}

	/// Index file name.
	pub fn index_file_name(self) -> String {
		format!("{}.idx", self.stem())
	}

	/// Data file name.
	pub fn data_file_name(self) -> String {
		format!("{}.mul", self.stem())
	}

	/// First record of `body` in this family's index.
	///
	/// The record of an action and direction is this base plus
	/// `action * 5 + direction`.
	pub fn record_base(self, body: u16) -> u32 {
		let body = body as u32;
		match self {
			Self::Anim2 => match body {
				0x44 => 13420,
				0..0xC8 => body * HIGH_DETAIL_RECORDS,
				_ => (body - 0xC8) * LOW_DETAIL_RECORDS + 22000,
			},
			Self::Anim3 => match body {
				0x5F => 15175,
				0..0x190 => body * HIGH_DETAIL_RECORDS,
				0x190..0x258 => (body - 0x190) * LOW_DETAIL_RECORDS + 44000,
				_ => (body - 0x258) * HUMAN_RECORDS + 70000,
			},
			Self::Anim5 if body == 0x22 => 11210,
			Self::Anim | Self::Anim4 | Self::Anim5 | Self::Anim6 => match body {
				0..0xC8 => body * HIGH_DETAIL_RECORDS,
				0xC8..0x190 => (body - 0xC8) * LOW_DETAIL_RECORDS + 22000,
				_ => (body - 0x190) * HUMAN_RECORDS + 35000,
			},
		}
	}

	/// Record of `body` performing `action` towards `direction`.
	pub fn record_id(self, body: u16, action: u32, direction: u32) -> u32 {
		self.record_base(body).saturating_add(action.saturating_mul(5)).saturating_add(direction)
	}
}

impl fmt::Display for AnimFile {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.stem())
	}
}
