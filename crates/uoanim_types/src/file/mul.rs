//! Legacy `*.idx` / `*.mul` file pairs.
//!
//! The index file is a flat table of 12-byte records, one per record id. Each
//! record points into the paired data file.
//!
//! ```text
//! Offset  Size  Field   Description
//! ------  ----  ------  ------------------------------------------
//! 0x00    4     lookup  Offset into the data file (0xFFFFFFFF = absent)
//! 0x04    4     size    Length in bytes (<= 0 = absent)
//! 0x08    4     extra   Format specific (art: unused, gumps: dimensions)
//! ```
//!
//! Nothing here is cached: each read opens the file, seeks, reads and closes
//! it again. Every failure, from a missing file to a record past the end,
//! shows up as `None`.

use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use log::debug;

use crate::file::io::{ReadExt, remaining};

/// Size of one index record in bytes
pub const INDEX_RECORD_SIZE: u64 = 12;

/// `lookup` value of an unused index slot
pub const ABSENT_LOOKUP: u32 = 0xFFFF_FFFF;

/// One entry of an index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexRecord {
	/// Offset into the data file
	pub lookup: u32,
	/// Length of the data in bytes
	pub size: i32,
	/// Format specific value
	pub extra: i32,
}

impl IndexRecord {
	/// Returns `true` when the record points at actual data.
	pub fn is_present(&self) -> bool {
		self.lookup != ABSENT_LOOKUP && self.size > 0
	}

	/// Reads record `record_id` from an index stream.
	///
	/// Returns `None` when the record lies past the end of the stream or is
	/// marked absent.
	pub fn read_from<R: Read + Seek>(reader: &mut R, record_id: u32) -> Option<Self> {
		let position = record_id as u64 * INDEX_RECORD_SIZE;
		let length = reader.seek(SeekFrom::End(0)).ok()?;
		if position + INDEX_RECORD_SIZE > length {
			return None;
		}
		reader.seek(SeekFrom::Start(position)).ok()?;

		let record = Self {
			lookup: reader.read_u32_le().ok()?,
			size: reader.read_i32_le().ok()?,
			extra: reader.read_i32_le().ok()?,
		};
		record.is_present().then_some(record)
	}

	/// Serializes the record.
	pub fn to_bytes(&self) -> [u8; 12] {
		let mut bytes = [0u8; 12];
		bytes[0..4].copy_from_slice(&self.lookup.to_le_bytes());
		bytes[4..8].copy_from_slice(&self.size.to_le_bytes());
		bytes[8..12].copy_from_slice(&self.extra.to_le_bytes());
		bytes
	}
}

/// Reads record `record_id` of the index file at `index_path`.
pub fn read_record(index_path: impl AsRef<Path>, record_id: u32) -> Option<IndexRecord> {
	let index_path = index_path.as_ref();
	let mut file = match std::fs::File::open(index_path) {
		Ok(file) => file,
		Err(e) => {
			debug!("Cannot open index {}: {}", index_path.display(), e);
			return None;
		}
	};
	IndexRecord::read_from(&mut file, record_id)
}

/// Reads the bytes `record` points at from a data stream.
///
/// Returns `None` when the record is absent or reaches past the end.
pub fn read_data_from<R: Read + Seek>(reader: &mut R, record: &IndexRecord) -> Option<Vec<u8>> {
	if !record.is_present() {
		return None;
	}
	reader.seek(SeekFrom::Start(record.lookup as u64)).ok()?;
	if (record.size as u64) > remaining(reader).ok()? {
		return None;
	}

	let mut data = vec![0u8; record.size as usize];
	reader.read_exact(&mut data).ok()?;
	Some(data)
}

/// Reads the bytes `record` points at from the data file at `data_path`.
pub fn read_data(data_path: impl AsRef<Path>, record: &IndexRecord) -> Option<Vec<u8>> {
	let data_path = data_path.as_ref();
	let mut file = match std::fs::File::open(data_path) {
		Ok(file) => file,
		Err(e) => {
			debug!("Cannot open data file {}: {}", data_path.display(), e);
			return None;
		}
	};
	read_data_from(&mut file, record)
}

/// Paths of an index file and its data file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
	/// `*.idx` path
	pub index: PathBuf,
	/// `*.mul` path
	pub data: PathBuf,
}

impl Pair {
	/// Creates a pair from two paths.
	pub fn new(index: impl Into<PathBuf>, data: impl Into<PathBuf>) -> Self {
		Self {
			index: index.into(),
			data: data.into(),
		}
	}

	/// Returns `true` when both files exist.
	pub fn exists(&self) -> bool {
		self.index.is_file() && self.data.is_file()
	}

	/// Looks up `record_id` and reads its data.
	pub fn read(&self, record_id: u32) -> Option<Vec<u8>> {
		let record = read_record(&self.index, record_id)?;
		read_data(&self.data, &record)
	}
}
