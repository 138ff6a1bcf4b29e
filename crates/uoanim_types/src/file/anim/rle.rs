//! Run-length encoded pixel streams.
//!
//! # UOP runs
//!
//! One little-endian `u32` per run, followed by `run_length` palette indices:
//!
//! ```text
//! bits  0-11   run_length
//! bits 12-21   y (10-bit two's complement)
//! bits 22-31   x (10-bit two's complement)
//! ```
//!
//! Pixel `i` of a run lands at `(center_x + x + i, height - 1 - (-y - center_y))`.
//! `0x7FFF7FFF` ends the stream.
//!
//! # MUL runs
//!
//! Two little-endian `i16` per run, followed by `run_length` palette indices:
//!
//! ```text
//! header  bits  0-11   run_length
//!         bits 12-15   line number
//! offset  signed, x offset scaled by 64
//! ```
//!
//! The line number does not give a row: the row advances by one whenever it
//! changes from the previous run. `(0x7FFF, 0x7FFF)` ends the stream.
//!
//! In both formats pixels that fall outside the frame are dropped, and a
//! stream may also end at a run boundary without its terminator. Running out
//! of data inside a run fails the whole frame.

use std::io::Cursor;

use super::{FrameHeader, IndexedImage};
use crate::file::io::ReadExt;

/// Terminator of a UOP stream
pub const UOP_TERMINATOR: u32 = 0x7FFF_7FFF;

/// Each half of the MUL terminator
pub const MUL_TERMINATOR: i16 = 0x7FFF;

/// Sign-extends a 10-bit field.
#[inline]
const fn sign_extend_10(value: u32) -> i16 {
	let value = (value & 0x3FF) as i16;
	if value & 0x200 != 0 { value - 0x400 } else { value }
}

/// A decoded UOP run header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UopRun {
	/// Number of pixels in the run
	pub run_length: u16,
	/// Horizontal offset from the anchor
	pub x: i16,
	/// Vertical offset from the anchor
	pub y: i16,
}

impl UopRun {
	/// Unpacks a run word.
	#[inline]
	pub const fn from_word(word: u32) -> Self {
		Self {
			run_length: (word & 0xFFF) as u16,
			y: sign_extend_10(word >> 12),
			x: sign_extend_10(word >> 22),
		}
	}

	/// Packs the run into a word. Coordinates must fit in 10 bits.
	#[inline]
	pub const fn to_word(self) -> u32 {
		(self.run_length as u32 & 0xFFF) | ((self.y as u32 & 0x3FF) << 12) | ((self.x as u32 & 0x3FF) << 22)
	}

	/// Destination of pixel `i` of the run.
	#[inline]
	pub fn position(&self, header: &FrameHeader, i: u16) -> (i32, i32) {
		let x = header.center_x as i32 + self.x as i32 + i as i32;
		let y = header.height as i32 - 1 - (-(self.y as i32) - header.center_y as i32);
		(x, y)
	}
}

/// A decoded MUL run header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MulRun {
	/// Number of pixels in the run
	pub run_length: u16,
	/// 4-bit line discriminator
	pub line: u8,
	/// Horizontal offset from the frame middle
	pub offset: i16,
}

impl MulRun {
	/// Unpacks the two run fields.
	#[inline]
	pub const fn from_fields(header: i16, raw_offset: i16) -> Self {
		let header = header as u16;
		Self {
			run_length: header & 0xFFF,
			line: ((header >> 12) & 0xF) as u8,
			offset: (raw_offset & i16::MIN) | (raw_offset >> 6),
		}
	}

	/// Packs the run into its two fields.
	#[inline]
	pub const fn to_fields(self) -> (i16, i16) {
		let header = (self.run_length & 0xFFF) | ((self.line as u16 & 0xF) << 12);
		(header as i16, self.offset.wrapping_shl(6))
	}

	/// Column of pixel `j` of the run. Action 0 is drawn left to right, every
	/// other action mirrored.
	#[inline]
	pub fn column(&self, width: u16, action: u32, j: u16) -> i32 {
		let middle = (width / 2) as i32;
		if action == 0 {
			middle + self.offset as i32 + j as i32
		} else {
			middle - self.offset as i32 - j as i32
		}
	}
}

#[inline]
fn remaining(reader: &Cursor<&[u8]>) -> usize {
	reader.get_ref().len().saturating_sub(reader.position() as usize)
}

#[inline]
fn read_indices<'a>(reader: &mut Cursor<&'a [u8]>, count: usize) -> Option<&'a [u8]> {
	let start = reader.position() as usize;
	let data: &'a [u8] = *reader.get_ref();
	let indices = data.get(start..start.checked_add(count)?)?;
	reader.set_position((start + count) as u64);
	Some(indices)
}

/// Decodes a UOP stream starting at the reader's position.
///
/// Returns `None` when the data ends inside a run.
pub fn decode_uop_runs(reader: &mut Cursor<&[u8]>, header: &FrameHeader, image: &mut IndexedImage) -> Option<()> {
	while remaining(reader) > 0 {
		let word = reader.read_u32_le().ok()?;
		if word == UOP_TERMINATOR {
			break;
		}

		let run = UopRun::from_word(word);
		let indices = read_indices(reader, run.run_length as usize)?;
		for (i, &index) in indices.iter().enumerate() {
			let (x, y) = run.position(header, i as u16);
			image.put(x, y, index);
		}
	}
	Some(())
}

/// Decodes a MUL stream starting at the reader's position.
///
/// Returns `None` when the data ends inside a run.
pub fn decode_mul_runs(
	reader: &mut Cursor<&[u8]>,
	width: u16,
	action: u32,
	image: &mut IndexedImage,
) -> Option<()> {
	let mut y = 0i32;
	let mut previous_line: Option<u8> = None;

	while remaining(reader) > 0 {
		let header = reader.read_i16_le().ok()?;
		let raw_offset = reader.read_i16_le().ok()?;
		if header == MUL_TERMINATOR && raw_offset == MUL_TERMINATOR {
			break;
		}

		let run = MulRun::from_fields(header, raw_offset);
		if previous_line.is_some_and(|line| line != run.line) {
			y += 1;
		}
		previous_line = Some(run.line);

		let indices = read_indices(reader, run.run_length as usize)?;
		for (j, &index) in indices.iter().enumerate() {
			image.put(run.column(width, action, j as u16), y, index);
		}
	}
	Some(())
}
