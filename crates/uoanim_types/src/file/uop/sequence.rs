//! Records of `AnimationSequence.uop`.
//!
//! Each entry of the sequence archive describes one animation id: which UOP
//! groups are served by a different legacy group, and how many frames some
//! groups really have. The layout is only partially known. The regions marked
//! reserved below are skipped with the widths observed in client data, and the
//! nested repeat counts are treated as opaque.
//!
//! ```text
//! 0x00    4     animation_id
//! 0x04    16    reserved
//! 0x14    32    reserved
//! 0x34    4     replacement_count
//! 0x38    ...   replacements
//! ```
//!
//! Each replacement:
//!
//! ```text
//! +0x00   4     uop_group
//! +0x04   4     frame_count (i32)
//! +0x08   4     mul_group
//! +0x0C   4     reserved
//! +0x10   16    reserved
//! +0x20   32    reserved
//! +0x40   4     count1, then count1 × { 4 reserved, count2, count2 × { 8 reserved, count3, count3 × 8 reserved, 4 reserved } }
//! ...     4     count4, then count4 × 4 reserved
//! ```
//!
//! Any repeat count above [`MAX_REPEAT_COUNT`] marks the record as corrupt:
//! parsing stops and the replacements read so far are kept.

use std::io::Cursor;

use log::debug;

use crate::file::io::{ReadExt, skip};
use crate::file::{FileType, UoFileError};

/// Largest repeat count accepted inside a record.
pub const MAX_REPEAT_COUNT: i32 = 100;

/// One group remap or frame count override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupReplacement {
	/// Group index in the UOP numbering
	pub uop_group: u32,
	/// Real frame count of the group, 0 when this is a remap
	pub frame_count: i32,
	/// Legacy group that replaces `uop_group` when `frame_count` is 0
	pub mul_group: u32,
}

/// How parsing of a record ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseEnd {
	/// Every replacement was read
	Complete,
	/// A repeat count exceeded [`MAX_REPEAT_COUNT`]
	Aborted,
	/// The data ended early
	Truncated,
}

/// A parsed sequence record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceRecord {
	/// Animation (body) id the record applies to
	pub animation_id: u32,
	/// Replacements in file order, up to where parsing stopped
	pub replacements: Vec<GroupReplacement>,
	/// Whether the whole record was read
	pub end: ParseEnd,
}

impl SequenceRecord {
	/// Parses one record.
	///
	/// Only a record too short to hold its header is an error. Later damage is
	/// reported through [`SequenceRecord::end`] with the replacements that
	/// precede it.
	pub fn from_bytes(data: &[u8]) -> Result<Self, UoFileError> {
		let mut reader = Cursor::new(data);

		let Ok((animation_id, replacement_count)) = read_header(&mut reader) else {
			return Err(UoFileError::insufficient_data(FileType::Sequence, 56, data.len()));
		};

		let mut record = Self {
			animation_id,
			replacements: Vec::new(),
			end: ParseEnd::Complete,
		};

		for _ in 0..replacement_count {
			match read_replacement(&mut reader, &mut record.replacements) {
				Ok(true) => {}
				Ok(false) => {
					debug!("Sequence record {animation_id}: repeat count over limit, rest ignored");
					record.end = ParseEnd::Aborted;
					break;
				}
				Err(_) => {
					debug!(
						"Sequence record {animation_id}: truncated after {} replacements",
						record.replacements.len()
					);
					record.end = ParseEnd::Truncated;
					break;
				}
			}
		}

		Ok(record)
	}

	/// Returns `true` when parsing stopped before the end of the record.
	pub fn is_partial(&self) -> bool {
		self.end != ParseEnd::Complete
	}
}

fn read_header(reader: &mut Cursor<&[u8]>) -> std::io::Result<(u32, u32)> {
	let animation_id = reader.read_u32_le()?;
	skip(reader, 16)?;
	skip(reader, 32)?;
	let replacement_count = reader.read_u32_le()?;
	Ok((animation_id, replacement_count))
}

/// Reads one replacement and its trailing blocks. `Ok(false)` means a repeat
/// count was over the limit.
fn read_replacement(reader: &mut Cursor<&[u8]>, out: &mut Vec<GroupReplacement>) -> std::io::Result<bool> {
	let uop_group = reader.read_u32_le()?;
	let frame_count = reader.read_i32_le()?;
	let mul_group = reader.read_u32_le()?;
	skip(reader, 4)?;
	skip(reader, 16)?;
	skip(reader, 32)?;

	out.push(GroupReplacement {
		uop_group,
		frame_count,
		mul_group,
	});

	let count1 = reader.read_i32_le()?;
	if count1 > MAX_REPEAT_COUNT {
		return Ok(false);
	}
	for _ in 0..count1.max(0) {
		skip(reader, 4)?;
		let count2 = reader.read_i32_le()?;
		if count2 > MAX_REPEAT_COUNT {
			return Ok(false);
		}
		for _ in 0..count2.max(0) {
			skip(reader, 8)?;
			let count3 = reader.read_i32_le()?;
			if count3 > MAX_REPEAT_COUNT {
				return Ok(false);
			}
			skip(reader, count3.max(0) as i64 * 8)?;
			skip(reader, 4)?;
		}
	}

	let count4 = reader.read_i32_le()?;
	if count4 > MAX_REPEAT_COUNT {
		return Ok(false);
	}
	skip(reader, count4.max(0) as i64 * 4)?;

	Ok(true)
}

/// Serializes a record with empty nested blocks. Used to fabricate archives.
pub fn encode_record(animation_id: u32, replacements: &[GroupReplacement]) -> Vec<u8> {
	let mut buffer = Vec::with_capacity(56 + replacements.len() * 72);
	buffer.extend_from_slice(&animation_id.to_le_bytes());
	buffer.resize(buffer.len() + 48, 0);
	buffer.extend_from_slice(&(replacements.len() as u32).to_le_bytes());
	for replacement in replacements {
		buffer.extend_from_slice(&replacement.uop_group.to_le_bytes());
		buffer.extend_from_slice(&replacement.frame_count.to_le_bytes());
		buffer.extend_from_slice(&replacement.mul_group.to_le_bytes());
		buffer.resize(buffer.len() + 52, 0);
		buffer.extend_from_slice(&0i32.to_le_bytes());
		buffer.extend_from_slice(&0i32.to_le_bytes());
	}
	buffer
}
