//! `.UOP` hashed archive support.
//!
//! UOP ("Mythic package") archives replaced the MUL/IDX pairs in later
//! clients. Entries carry no names: they are addressed by the 64-bit hash of
//! their relative path (see [`hash`]).
//!
//! # File Structure
//!
//! ```text
//! Offset  Size  Field           Description
//! ------  ----  --------------  ------------------------------------------
//! 0x00    4     magic           0x0050594D ("MYP\0")
//! 0x04    4     version         Format version
//! 0x08    4     signature       Format timestamp (0xFD23EC43)
//! 0x0C    8     first_block     Offset of the first directory block
//! 0x14    4     block_capacity  Maximum entries per directory block
//! 0x18    4     file_count      Total number of entries
//! ```
//!
//! Directory blocks form a linked list:
//!
//! ```text
//! +0x00   4     entry_count     Entries in this block
//! +0x04   8     next_block      Offset of the next block (0 = last)
//! +0x0C   34×n  entries
//! ```
//!
//! Each 34-byte entry:
//!
//! ```text
//! +0x00   8     header_offset    Offset of the entry's local header (0 = unused slot)
//! +0x08   4     header_length    Size of the local header, data follows it
//! +0x0C   4     compressed       Stored size
//! +0x10   4     decompressed     Size after inflating
//! +0x14   8     hash             Path hash
//! +0x1C   4     data_hash        Adler-32 of the stored payload
//! +0x20   2     flag             0 = stored, 1 = zlib
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use uoanim_types::file::uop::{File, hash};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut uop = File::open("AnimationFrame1.uop")?;
//!
//! let key = hash::animation_frame_hash(400, 0);
//! if let Some(record) = uop.lookup(key).copied() {
//!     let bytes = uop.read_data(&record)?;
//!     println!("{} bytes", bytes.len());
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
pub mod hash;
pub mod sequence;

use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Seek, SeekFrom};

use flate2::read::ZlibDecoder;
use log::debug;

use crate::file::io::ReadExt;
use crate::file::{FileType, UoFileError};

pub use builder::Builder;

/// UOP file constants.
pub mod constants {
	/// Magic number ("MYP\0")
	pub const MAGIC: u32 = 0x0050_594D;

	/// Signature written by the official packer
	pub const SIGNATURE: u32 = 0xFD23_EC43;

	/// Size of the file header in bytes
	pub const HEADER_SIZE: usize = 28;

	/// Size of a directory block header (entry count + next offset)
	pub const BLOCK_HEADER_SIZE: usize = 12;

	/// Size of a directory entry in bytes
	pub const ENTRY_SIZE: usize = 34;

	/// Default number of entries per directory block
	pub const DEFAULT_BLOCK_CAPACITY: u32 = 1000;
}

/// Compression applied to an archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
	/// Stored as-is
	None,
	/// zlib stream (RFC 1950)
	Zlib,
	/// Any other flag (e.g. the BWT scheme of newer clients)
	Unsupported(u16),
}

impl Compression {
	/// Converts the raw directory flag.
	pub fn from_flag(flag: u16) -> Self {
		match flag {
			0 => Self::None,
			1 => Self::Zlib,
			other => Self::Unsupported(other),
		}
	}

	/// Raw directory flag.
	pub fn to_flag(self) -> u16 {
		match self {
			Self::None => 0,
			Self::Zlib => 1,
			Self::Unsupported(flag) => flag,
		}
	}
}

impl fmt::Display for Compression {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::None => write!(f, "None"),
			Self::Zlib => write!(f, "Zlib"),
			Self::Unsupported(flag) => write!(f, "Unsupported({flag})"),
		}
	}
}

/// Location and size of one archive entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArchiveRecord {
	/// Path hash
	pub hash: u64,
	/// Absolute offset of the payload (local header already skipped)
	pub data_offset: u64,
	/// Stored size in bytes
	pub compressed_size: u32,
	/// Size after decompression
	pub decompressed_size: u32,
	/// Compression scheme
	pub compression: Compression,
}

impl ArchiveRecord {
	/// Returns `true` when the payload has to be inflated.
	#[inline]
	pub fn is_compressed(&self) -> bool {
		self.compression != Compression::None
	}
}

impl fmt::Display for ArchiveRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{:016X} @ 0x{:X} ({} -> {} bytes, {})",
			self.hash,
			self.data_offset,
			self.compressed_size,
			self.decompressed_size,
			self.compression
		)
	}
}

/// An opened UOP archive: the parsed directory plus the underlying reader.
#[derive(Debug)]
pub struct File<R> {
	reader: R,
	version: u32,
	records: HashMap<u64, ArchiveRecord>,
}

impl<R: Read + Seek> File<R> {
	/// Parses the header and every directory block of an archive.
	///
	/// # Errors
	///
	/// Returns an error if the data is truncated, the magic does not match, or
	/// the block chain points outside the file or loops.
	pub fn from_reader(mut reader: R) -> Result<Self, UoFileError> {
		let length = reader.seek(SeekFrom::End(0))?;
		if length < constants::HEADER_SIZE as u64 {
			return Err(UoFileError::insufficient_data(
				FileType::Uop,
				constants::HEADER_SIZE,
				length as usize,
			));
		}
		reader.seek(SeekFrom::Start(0))?;

		let magic = reader.read_u32_le()?;
		if magic != constants::MAGIC {
			return Err(UoFileError::invalid_magic(
				FileType::Uop,
				&constants::MAGIC.to_le_bytes(),
				&magic.to_le_bytes(),
			));
		}
		let version = reader.read_u32_le()?;
		let _signature = reader.read_u32_le()?;
		let mut next_block = reader.read_u64_le()?;
		let _block_capacity = reader.read_u32_le()?;
		let file_count = reader.read_u32_le()?;

		let mut records = HashMap::with_capacity(file_count.min(0x10_0000) as usize);
		let mut visited = Vec::new();

		while next_block != 0 {
			if next_block.checked_add(constants::BLOCK_HEADER_SIZE as u64).is_none_or(|end| end > length) {
				return Err(UoFileError::bad_encoding(
					FileType::Uop,
					format!("directory block at 0x{next_block:X} is outside the file ({length} bytes)"),
				));
			}
			if visited.contains(&next_block) {
				return Err(UoFileError::bad_encoding(
					FileType::Uop,
					format!("directory block chain loops back to 0x{next_block:X}"),
				));
			}
			visited.push(next_block);

			reader.seek(SeekFrom::Start(next_block))?;
			let entry_count = reader.read_u32_le()?;
			next_block = reader.read_u64_le()?;

			for _ in 0..entry_count {
				let header_offset = reader.read_i64_le()?;
				let header_length = reader.read_u32_le()?;
				let compressed_size = reader.read_u32_le()?;
				let decompressed_size = reader.read_u32_le()?;
				let hash = reader.read_u64_le()?;
				let _data_hash = reader.read_u32_le()?;
				let flag = reader.read_u16_le()?;

				if header_offset <= 0 {
					continue;
				}

				records.entry(hash).or_insert(ArchiveRecord {
					hash,
					data_offset: header_offset as u64 + header_length as u64,
					compressed_size,
					decompressed_size,
					compression: Compression::from_flag(flag),
				});
			}
		}

		debug!(
			"UOP v{}: {} entries declared, {} usable in {} blocks",
			version,
			file_count,
			records.len(),
			visited.len()
		);

		Ok(Self {
			reader,
			version,
			records,
		})
	}

	/// Looks up an entry by path hash.
	#[inline]
	pub fn lookup(&self, hash: u64) -> Option<&ArchiveRecord> {
		self.records.get(&hash)
	}

	/// Looks up an entry by (unnormalized) path.
	pub fn lookup_path(&self, path: &str) -> Option<&ArchiveRecord> {
		self.lookup(hash::hash_path(path))
	}

	/// Returns `true` when the archive holds an entry for `hash`.
	#[inline]
	pub fn contains(&self, hash: u64) -> bool {
		self.records.contains_key(&hash)
	}

	/// Iterates over every usable entry, in no particular order.
	pub fn records(&self) -> impl Iterator<Item = &ArchiveRecord> {
		self.records.values()
	}

	/// Number of usable entries.
	pub fn len(&self) -> usize {
		self.records.len()
	}

	/// Returns `true` when the archive has no usable entries.
	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	/// Format version from the header.
	pub fn version(&self) -> u32 {
		self.version
	}

	/// Reads an entry's payload, inflating it when compressed.
	///
	/// # Errors
	///
	/// Returns an error on a truncated read, an unsupported compression flag,
	/// or a zlib stream that fails or inflates to the wrong size.
	pub fn read_data(&mut self, record: &ArchiveRecord) -> Result<Vec<u8>, UoFileError> {
		self.reader.seek(SeekFrom::Start(record.data_offset))?;
		let mut stored = vec![0u8; record.compressed_size as usize];
		self.reader.read_exact(&mut stored)?;

		match record.compression {
			Compression::None => Ok(stored),
			Compression::Zlib => inflate(&stored, record.decompressed_size as usize),
			Compression::Unsupported(flag) => Err(UoFileError::UnsupportedCompressionType {
				file_type: FileType::Uop,
				compression_type: flag,
			}),
		}
	}

	/// Looks up `hash` and reads its payload; `Ok(None)` when absent.
	pub fn read_hash(&mut self, hash: u64) -> Result<Option<Vec<u8>>, UoFileError> {
		match self.lookup(hash).copied() {
			Some(record) => self.read_data(&record).map(Some),
			None => Ok(None),
		}
	}
}

impl File<std::io::BufReader<std::fs::File>> {
	/// Opens a `.uop` file from the given path.
	pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self, UoFileError> {
		let file = std::fs::File::open(path)?;
		Self::from_reader(std::io::BufReader::new(file))
	}
}

impl<R> fmt::Display for File<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "UOP File: version {}, {} entries", self.version, self.records.len())
	}
}

fn inflate(stored: &[u8], expected: usize) -> Result<Vec<u8>, UoFileError> {
	let mut output = Vec::with_capacity(expected);
	ZlibDecoder::new(stored).read_to_end(&mut output).map_err(|e| {
		UoFileError::DecompressionError {
			file_type: FileType::Uop,
			message: e.to_string(),
		}
	})?;

	if output.len() != expected {
		return Err(UoFileError::DecompressionError {
			file_type: FileType::Uop,
			message: format!("inflated to {} bytes, expected {}", output.len(), expected),
		});
	}
	Ok(output)
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use super::*;

	fn open(data: Vec<u8>) -> File<Cursor<Vec<u8>>> {
		File::from_reader(Cursor::new(data)).unwrap()
	}

	#[test_log::test]
	fn test_lookup_and_read() {
		let mut builder = Builder::new();
		builder.add_path("build/animationlegacyframe/000400/00.bin", b"plain payload".to_vec());
		builder.add_path_compressed("build/animationlegacyframe/000400/05.bin", vec![7u8; 4096]);
		let mut uop = open(builder.to_bytes().unwrap());

		assert_eq!(uop.len(), 2);

		let plain = *uop.lookup(hash::animation_frame_hash(400, 0)).unwrap();
		assert!(!plain.is_compressed());
		assert_eq!(uop.read_data(&plain).unwrap(), b"plain payload");

		let packed = *uop.lookup(hash::animation_frame_hash(400, 5)).unwrap();
		assert!(packed.is_compressed());
		assert!(packed.compressed_size < packed.decompressed_size);
		assert_eq!(uop.read_data(&packed).unwrap(), vec![7u8; 4096]);

		assert!(uop.lookup(hash::animation_frame_hash(400, 1)).is_none());
		assert!(uop.read_hash(hash::animation_frame_hash(401, 0)).unwrap().is_none());
	}

	#[test_log::test]
	fn test_repeated_lookup_is_stable() {
		let mut builder = Builder::new();
		for group in 0..12 {
			builder.add_hash(hash::animation_frame_hash(7, group), vec![group as u8; 3]);
		}
		let uop = open(builder.to_bytes().unwrap());

		for _ in 0..3 {
			for group in 0..12 {
				let record = uop.lookup(hash::animation_frame_hash(7, group)).unwrap();
				assert_eq!(record.hash, hash::animation_frame_hash(7, group));
			}
		}
	}

	#[test_log::test]
	fn test_multiple_blocks() {
		let mut builder = Builder::with_block_capacity(2);
		for group in 0..5 {
			builder.add_hash(hash::animation_frame_hash(1, group), vec![group as u8]);
		}
		let mut uop = open(builder.to_bytes().unwrap());
		assert_eq!(uop.len(), 5);
		for group in 0..5 {
			let data = uop.read_hash(hash::animation_frame_hash(1, group)).unwrap();
			assert_eq!(data, Some(vec![group as u8]));
		}
	}

	#[test_log::test]
	fn test_bad_magic() {
		let mut data = Builder::new().to_bytes().unwrap();
		data[0] = b'X';
		let err = File::from_reader(Cursor::new(data)).unwrap_err();
		assert!(matches!(err, UoFileError::InvalidMagic { .. }));
	}

	#[test_log::test]
	fn test_truncated() {
		let err = File::from_reader(Cursor::new(vec![0x4D, 0x59, 0x50])).unwrap_err();
		assert!(matches!(err, UoFileError::InsufficientData { .. }));

		let mut builder = Builder::new();
		builder.add_path("a.bin", vec![1, 2, 3]);
		let mut data = builder.to_bytes().unwrap();
		data.truncate(data.len() - 10);
		assert!(File::from_reader(Cursor::new(data)).is_err());
	}

	#[test_log::test]
	fn test_block_offset_near_end_of_range() {
		let mut header = Vec::with_capacity(constants::HEADER_SIZE);
		header.extend_from_slice(&constants::MAGIC.to_le_bytes());
		header.extend_from_slice(&5u32.to_le_bytes());
		header.extend_from_slice(&constants::SIGNATURE.to_le_bytes());
		header.extend_from_slice(&u64::MAX.to_le_bytes());
		header.extend_from_slice(&constants::DEFAULT_BLOCK_CAPACITY.to_le_bytes());
		header.extend_from_slice(&0u32.to_le_bytes());
		let err = File::from_reader(Cursor::new(header)).unwrap_err();
		assert!(matches!(err, UoFileError::BadEncoding { .. }));

		// a valid first block whose next pointer is near the end of the range
		let mut builder = Builder::new();
		builder.add_path("a.bin", vec![1, 2, 3]);
		let mut data = builder.to_bytes().unwrap();
		let first_block = u64::from_le_bytes(data[12..20].try_into().unwrap()) as usize;
		data[first_block + 4..first_block + 12].copy_from_slice(&(u64::MAX - 4).to_le_bytes());
		let err = File::from_reader(Cursor::new(data)).unwrap_err();
		assert!(matches!(err, UoFileError::BadEncoding { .. }));
	}

	#[test_log::test]
	fn test_corrupt_zlib_is_an_error() {
		let mut builder = Builder::new();
		builder.add_path_compressed("a.bin", vec![1u8; 128]);
		let mut uop = open(builder.to_bytes().unwrap());
		let mut record = *uop.lookup_path("a.bin").unwrap();
		record.decompressed_size += 1;
		assert!(matches!(uop.read_data(&record), Err(UoFileError::DecompressionError { .. })));

		record.compression = Compression::Unsupported(3);
		assert!(matches!(
			uop.read_data(&record),
			Err(UoFileError::UnsupportedCompressionType { compression_type: 3, .. })
		));
	}
}
