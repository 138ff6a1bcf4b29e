//! Legacy animation records of `anim*.mul`.
//!
//! ```text
//! Offset  Size    Field          Description
//! ------  ------  -------------  ------------------------------------
//! 0x000   512     palette        256 × u16
//! 0x200   4       frame_count
//! 0x204   4 × n   frame_offsets  Relative to 0x200
//! ```
//!
//! Each frame starts with four `i16` (center x, center y, width, height),
//! followed by the MUL RLE stream described in [`super::rle`].

use std::io::{Cursor, Seek, SeekFrom};

use log::debug;

use super::rle::{MUL_TERMINATOR, MulRun, decode_mul_runs};
use super::{DIRECTION_COUNT, DecodedFrame, FrameHeader, IndexedImage};
use crate::file::io::ReadExt;
use crate::file::palette::{ColorBlend, Palette};

/// Decodes one frame of a legacy animation record.
///
/// The frame is picked by `action * 5 + direction`, and the palette goes
/// through `blend` with `hue`. Returns `None` on any structural problem.
pub fn decode_mul_bytes(
	bytes: &[u8],
	direction: u32,
	action: u32,
	blend: &dyn ColorBlend,
	hue: u16,
) -> Option<DecodedFrame> {
	if bytes.is_empty() {
		return None;
	}
	let mut reader = Cursor::new(bytes);

	let raw = Palette::read_raw(&mut reader).ok()?;
	let frame_count = reader.read_u32_le().ok()?;
	let frame_index = action as u64 * DIRECTION_COUNT as u64 + direction as u64;
	if frame_index >= frame_count as u64 {
		debug!("MUL record: frame {frame_index} out of range ({frame_count} frames)");
		return None;
	}

	if frame_count as u64 * 4 > (bytes.len() as u64).saturating_sub(Palette::BYTE_SIZE as u64 + 4) {
		debug!("MUL record: offset table of {frame_count} frames exceeds the record");
		return None;
	}
	reader.seek(SeekFrom::Current(frame_index as i64 * 4)).ok()?;
	let frame_offset = reader.read_u32_le().ok()?;

	reader.seek(SeekFrom::Start(Palette::BYTE_SIZE as u64 + frame_offset as u64)).ok()?;
	let center_x = reader.read_i16_le().ok()?;
	let center_y = reader.read_i16_le().ok()?;
	let width = reader.read_i16_le().ok()?;
	let height = reader.read_i16_le().ok()?;
	if width <= 0 || height <= 0 {
		debug!("MUL record: frame has no area ({width}x{height})");
		return None;
	}

	let header = FrameHeader {
		center_x,
		center_y,
		width: width as u16,
		height: height as u16,
	};
	let mut image = IndexedImage::new(header.width as u32, header.height as u32);
	decode_mul_runs(&mut reader, header.width, action, &mut image)?;

	Some(DecodedFrame {
		header,
		palette: Palette::from_raw_blended(raw, blend, hue),
		image,
	})
}

/// A legacy frame ready to be written into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame {
	/// Frame header
	pub header: FrameHeader,
	/// Runs with their palette indices
	pub runs: Vec<(MulRun, Vec<u8>)>,
}

impl EncodedFrame {
	fn write_to(&self, buffer: &mut Vec<u8>) {
		buffer.extend_from_slice(&self.header.to_bytes());
		for (run, indices) in &self.runs {
			let (header, offset) = run.to_fields();
			buffer.extend_from_slice(&header.to_le_bytes());
			buffer.extend_from_slice(&offset.to_le_bytes());
			buffer.extend_from_slice(indices);
		}
		buffer.extend_from_slice(&MUL_TERMINATOR.to_le_bytes());
		buffer.extend_from_slice(&MUL_TERMINATOR.to_le_bytes());
	}
}

/// Writes legacy animation records.
#[derive(Debug, Clone, Default)]
pub struct Builder {
	palette: Vec<u16>,
	frames: Vec<EncodedFrame>,
}

impl Builder {
	/// Creates an empty record with the given palette.
	pub fn new(palette: [u16; 256]) -> Self {
		Self {
			palette: palette.to_vec(),
			frames: Vec::new(),
		}
	}

	/// Appends a frame.
	pub fn add_frame(&mut self, frame: EncodedFrame) -> &mut Self {
		self.frames.push(frame);
		self
	}

	/// Serializes the record.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut palette = self.palette.clone();
		palette.resize(Palette::SIZE, 0);

		let table_size = 4 + self.frames.len() * 4;
		let mut data = Vec::new();
		let mut offsets = Vec::with_capacity(self.frames.len());
		for frame in &self.frames {
			offsets.push((table_size + data.len()) as u32);
			frame.write_to(&mut data);
		}

		let mut buffer = Vec::with_capacity(Palette::BYTE_SIZE + table_size + data.len());
		for color in palette {
			buffer.extend_from_slice(&color.to_le_bytes());
		}
		buffer.extend_from_slice(&(self.frames.len() as u32).to_le_bytes());
		for offset in offsets {
			buffer.extend_from_slice(&offset.to_le_bytes());
		}
		buffer.extend_from_slice(&data);
		buffer
	}
}
