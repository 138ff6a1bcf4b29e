//! `AMOU` frame containers stored in `AnimationFrame*.uop`.
//!
//! One container holds a whole action: the frames of all five directions,
//! `frame_count / 5` per direction, stored direction by direction.
//!
//! # File Structure
//!
//! ```text
//! Offset  Size  Field               Description
//! ------  ----  ------------------  ------------------------------------
//! 0x00    4     magic               0x554F4D41 ("AMOU")
//! 0x04    4     version
//! 0x08    4     total_size
//! 0x0C    4     animation_id
//! 0x10    16    reserved
//! 0x20    4     frame_count
//! 0x24    4     frame_index_offset  Offset of the frame index
//! ```
//!
//! Frame index entries (16 bytes each):
//!
//! ```text
//! +0x00   2     direction
//! +0x02   2     frame_number
//! +0x04   8     reserved
//! +0x0C   4     frame_data_offset   Relative to the start of this entry
//! ```
//!
//! Frame data: 256 × u16 palette, an 8-byte [`FrameHeader`], then the UOP RLE
//! stream described in [`super::rle`].

use std::fmt;
use std::io::{Cursor, Seek, SeekFrom};

use log::debug;

use super::rle::{UOP_TERMINATOR, UopRun, decode_uop_runs};
use super::{DIRECTION_COUNT, DecodedFrame, FrameHeader, IndexedImage};
use crate::file::io::{ReadExt, remaining, skip};
use crate::file::palette::Palette;
use crate::file::{FileType, UoFileError};

/// BIN container constants.
pub mod constants {
	/// Magic number ("AMOU" read as a little-endian u32)
	pub const MAGIC: u32 = 0x554F_4D41;

	/// Size of the container header
	pub const HEADER_SIZE: usize = 40;

	/// Size of one frame index entry
	pub const FRAME_ENTRY_SIZE: usize = 16;
}

/// Container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinHeader {
	/// Format version
	pub version: u32,
	/// Declared container size
	pub total_size: u32,
	/// Animation id the container belongs to
	pub animation_id: u32,
	/// Frames over all directions
	pub frame_count: u32,
	/// Offset of the frame index
	pub frame_index_offset: u32,
}

impl BinHeader {
	fn read_from(reader: &mut Cursor<&[u8]>) -> Result<Self, UoFileError> {
		let length = reader.get_ref().len();
		if length < constants::HEADER_SIZE {
			return Err(UoFileError::insufficient_data(FileType::Bin, constants::HEADER_SIZE, length));
		}

		let magic = reader.read_u32_le()?;
		if magic != constants::MAGIC {
			return Err(UoFileError::invalid_magic(
				FileType::Bin,
				&constants::MAGIC.to_le_bytes(),
				&magic.to_le_bytes(),
			));
		}
		let version = reader.read_u32_le()?;
		let total_size = reader.read_u32_le()?;
		let animation_id = reader.read_u32_le()?;
		skip(reader, 16)?;
		let frame_count = reader.read_u32_le()?;
		let frame_index_offset = reader.read_u32_le()?;

		Ok(Self {
			version,
			total_size,
			animation_id,
			frame_count,
			frame_index_offset,
		})
	}

	/// Frames stored per direction.
	#[inline]
	pub fn frames_per_direction(&self) -> u32 {
		self.frame_count / DIRECTION_COUNT
	}
}

/// One entry of the frame index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameIndexEntry {
	/// Direction recorded in the entry
	pub direction: u16,
	/// Frame number within the direction
	pub frame_number: u16,
	/// Byte position of the entry itself
	pub stream_position: u64,
	/// Offset of the frame data from `stream_position`
	pub frame_data_offset: u32,
}

impl FrameIndexEntry {
	/// Absolute position of the frame data.
	#[inline]
	pub fn data_position(&self) -> u64 {
		self.stream_position + self.frame_data_offset as u64
	}
}

/// A parsed container borrowing its bytes.
#[derive(Debug, Clone)]
pub struct Container<'a> {
	data: &'a [u8],
	header: BinHeader,
	entries: Vec<FrameIndexEntry>,
}

impl<'a> Container<'a> {
	/// Parses the header and the frame index.
	///
	/// # Errors
	///
	/// Returns an error on a bad magic, an empty container or a frame index
	/// that runs past the data.
	pub fn parse(data: &'a [u8]) -> Result<Self, UoFileError> {
		let mut reader = Cursor::new(data);
		let header = BinHeader::read_from(&mut reader)?;
		if header.frame_count == 0 {
			return Err(UoFileError::bad_encoding(FileType::Bin, "container holds no frames"));
		}

		reader.seek(SeekFrom::Start(header.frame_index_offset as u64))?;
		let available = remaining(&mut reader)? as usize / constants::FRAME_ENTRY_SIZE;
		let mut entries = Vec::with_capacity((header.frame_count as usize).min(available));
		for _ in 0..header.frame_count {
			let stream_position = reader.position();
			let direction = reader.read_u16_le()?;
			let frame_number = reader.read_u16_le()?;
			skip(&mut reader, 8)?;
			let frame_data_offset = reader.read_u32_le()?;
			entries.push(FrameIndexEntry {
				direction,
				frame_number,
				stream_position,
				frame_data_offset,
			});
		}

		Ok(Self {
			data,
			header,
			entries,
		})
	}

	/// Container header.
	pub fn header(&self) -> &BinHeader {
		&self.header
	}

	/// Frame index in file order.
	pub fn entries(&self) -> &[FrameIndexEntry] {
		&self.entries
	}

	/// Index into [`Container::entries`] of frame `frame_index` of `direction`.
	pub fn entry_index(&self, direction: u32, frame_index: u32) -> Option<usize> {
		let index = direction as u64 * self.header.frames_per_direction() as u64 + frame_index as u64;
		(index < self.entries.len() as u64).then_some(index as usize)
	}

	/// Decodes frame `frame_index` of `direction`.
	///
	/// Returns `None` when the frame is out of range, has no area or its data
	/// is truncated.
	pub fn decode(&self, direction: u32, frame_index: u32) -> Option<DecodedFrame> {
		let Some(index) = self.entry_index(direction, frame_index) else {
			debug!(
				"BIN {}: frame {} of direction {} out of range ({} entries)",
				self.header.animation_id,
				frame_index,
				direction,
				self.entries.len()
			);
			return None;
		};
		self.decode_entry(&self.entries[index])
	}

	/// Decodes the frame an index entry points at.
	pub fn decode_entry(&self, entry: &FrameIndexEntry) -> Option<DecodedFrame> {
		let mut reader = Cursor::new(self.data);
		reader.seek(SeekFrom::Start(entry.data_position())).ok()?;

		let palette = Palette::from_raw_shifted(Palette::read_raw(&mut reader).ok()?);
		let header = FrameHeader {
			center_x: reader.read_i16_le().ok()?,
			center_y: reader.read_i16_le().ok()?,
			width: reader.read_u16_le().ok()?,
			height: reader.read_u16_le().ok()?,
		};
		if !header.is_valid() {
			debug!("BIN {}: frame has no area ({})", self.header.animation_id, header);
			return None;
		}

		let mut image = IndexedImage::new(header.width as u32, header.height as u32);
		if decode_uop_runs(&mut reader, &header, &mut image).is_none() {
			debug!("BIN {}: RLE stream truncated", self.header.animation_id);
			return None;
		}

		Some(DecodedFrame {
			header,
			palette,
			image,
		})
	}
}

impl fmt::Display for Container<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"BIN animation {}: {} frames, {} per direction",
			self.header.animation_id,
			self.header.frame_count,
			self.header.frames_per_direction()
		)
	}
}

/// Decodes frame `frame_index` of `direction` from a container.
///
/// Every structural problem is reported as `None`.
pub fn decode_uop_bin(bytes: &[u8], direction: u32, frame_index: u32) -> Option<DecodedFrame> {
	match Container::parse(bytes) {
		Ok(container) => container.decode(direction, frame_index),
		Err(e) => {
			debug!("BIN container rejected: {e}");
			None
		}
	}
}

/// A frame ready to be written into a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFrame {
	/// Direction stored in the index entry
	pub direction: u16,
	/// Frame number stored in the index entry
	pub frame_number: u16,
	/// Raw palette
	pub palette: [u16; 256],
	/// Frame header
	pub header: FrameHeader,
	/// Runs with their palette indices
	pub runs: Vec<(UopRun, Vec<u8>)>,
}

impl EncodedFrame {
	/// Encodes the covered pixels of `image` as horizontal runs.
	///
	/// Returns `None` when a run position does not fit the 10-bit fields.
	pub fn from_image(
		direction: u16,
		frame_number: u16,
		palette: [u16; 256],
		header: FrameHeader,
		image: &IndexedImage,
	) -> Option<Self> {
		let mut runs = Vec::new();
		for fy in 0..image.height() {
			let mut fx = 0;
			while fx < image.width() {
				if image.get(fx, fy).is_none() {
					fx += 1;
					continue;
				}
				let start = fx;
				let mut indices = Vec::new();
				while fx < image.width() && indices.len() < 0xFFF {
					let Some(index) = image.get(fx, fy) else {
						break;
					};
					indices.push(index);
					fx += 1;
				}

				let x = start as i32 - header.center_x as i32;
				let y = fy as i32 - header.height as i32 + 1 - header.center_y as i32;
				if !(-512..512).contains(&x) || !(-512..512).contains(&y) {
					return None;
				}
				runs.push((
					UopRun {
						run_length: indices.len() as u16,
						x: x as i16,
						y: y as i16,
					},
					indices,
				));
			}
		}

		Some(Self {
			direction,
			frame_number,
			palette,
			header,
			runs,
		})
	}

	fn write_to(&self, buffer: &mut Vec<u8>) {
		for color in &self.palette {
			buffer.extend_from_slice(&color.to_le_bytes());
		}
		buffer.extend_from_slice(&self.header.to_bytes());
		for (run, indices) in &self.runs {
			buffer.extend_from_slice(&run.to_word().to_le_bytes());
			buffer.extend_from_slice(indices);
		}
		buffer.extend_from_slice(&UOP_TERMINATOR.to_le_bytes());
	}
}

/// Writes BIN containers.
///
/// # Examples
///
/// ```
/// use uoanim_types::file::anim::{FrameHeader, IndexedImage, bin};
///
/// let header = FrameHeader { center_x: 0, center_y: 0, width: 2, height: 1 };
/// let mut image = IndexedImage::new(2, 1);
/// image.put(0, 0, 3);
///
/// let mut builder = bin::Builder::new(400);
/// for direction in 0..5 {
///     let frame = bin::EncodedFrame::from_image(direction, 0, [0; 256], header, &image).unwrap();
///     builder.add_frame(frame);
/// }
///
/// let bytes = builder.to_bytes();
/// let frame = bin::decode_uop_bin(&bytes, 2, 0).unwrap();
/// assert_eq!(frame.image.get(0, 0), Some(3));
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
	animation_id: u32,
	version: u32,
	frames: Vec<EncodedFrame>,
}

impl Builder {
	/// Creates an empty container for `animation_id`.
	pub fn new(animation_id: u32) -> Self {
		Self {
			animation_id,
			version: 1,
			frames: Vec::new(),
		}
	}

	/// Appends a frame. Frames are expected direction by direction.
	pub fn add_frame(&mut self, frame: EncodedFrame) -> &mut Self {
		self.frames.push(frame);
		self
	}

	/// Number of frames added.
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Returns `true` when no frame has been added.
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Serializes the container.
	pub fn to_bytes(&self) -> Vec<u8> {
		let index_offset = constants::HEADER_SIZE;
		let data_start = index_offset + self.frames.len() * constants::FRAME_ENTRY_SIZE;

		let mut data = Vec::new();
		let mut index = Vec::with_capacity(self.frames.len() * constants::FRAME_ENTRY_SIZE);
		for (i, frame) in self.frames.iter().enumerate() {
			let entry_position = index_offset + i * constants::FRAME_ENTRY_SIZE;
			let data_position = data_start + data.len();

			index.extend_from_slice(&frame.direction.to_le_bytes());
			index.extend_from_slice(&frame.frame_number.to_le_bytes());
			index.extend_from_slice(&[0u8; 8]);
			index.extend_from_slice(&((data_position - entry_position) as u32).to_le_bytes());

			frame.write_to(&mut data);
		}

		let total_size = data_start + data.len();
		let mut buffer = Vec::with_capacity(total_size);
		buffer.extend_from_slice(&constants::MAGIC.to_le_bytes());
		buffer.extend_from_slice(&self.version.to_le_bytes());
		buffer.extend_from_slice(&(total_size as u32).to_le_bytes());
		buffer.extend_from_slice(&self.animation_id.to_le_bytes());
		buffer.extend_from_slice(&[0u8; 16]);
		buffer.extend_from_slice(&(self.frames.len() as u32).to_le_bytes());
		buffer.extend_from_slice(&(index_offset as u32).to_le_bytes());
		buffer.extend_from_slice(&index);
		buffer.extend_from_slice(&data);
		buffer
	}
}
