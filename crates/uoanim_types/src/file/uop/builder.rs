//! Construction and serialization of UOP archives.
//!
//! Real archives are produced by the client's packer; this builder writes the
//! same layout so tooling and tests can create archives without it. Blocks are
//! padded to their capacity with unused (zero offset) slots, like the packer
//! does.

use std::io::Write;
use std::path::Path;

use flate2::Compression as ZlibLevel;
use flate2::write::ZlibEncoder;

use crate::file::UoFileError;

use super::constants::{BLOCK_HEADER_SIZE, DEFAULT_BLOCK_CAPACITY, ENTRY_SIZE, HEADER_SIZE, MAGIC, SIGNATURE};
use super::{Compression, hash};

#[derive(Debug, Clone)]
struct PendingEntry {
	hash: u64,
	data: Vec<u8>,
	compress: bool,
}

/// Collects entries and serializes them into an archive.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
/// use uoanim_types::file::uop::{Builder, File, hash};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut builder = Builder::new();
/// builder.add_path("build/animationlegacyframe/000001/00.bin", vec![1, 2, 3]);
///
/// let mut uop = File::from_reader(Cursor::new(builder.to_bytes()?))?;
/// let record = *uop.lookup(hash::animation_frame_hash(1, 0)).unwrap();
/// assert_eq!(uop.read_data(&record)?, vec![1, 2, 3]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Builder {
	version: u32,
	block_capacity: u32,
	entries: Vec<PendingEntry>,
}

impl Default for Builder {
	fn default() -> Self {
		Self::new()
	}
}

impl Builder {
	/// Creates an empty builder with the packer's default block capacity.
	pub fn new() -> Self {
		Self::with_block_capacity(DEFAULT_BLOCK_CAPACITY)
	}

	/// Creates an empty builder that splits the directory every `capacity` entries.
	pub fn with_block_capacity(capacity: u32) -> Self {
		Self {
			version: 5,
			block_capacity: capacity.max(1),
			entries: Vec::new(),
		}
	}

	/// Sets the version written to the header.
	pub fn version(mut self, version: u32) -> Self {
		self.version = version;
		self
	}

	/// Adds a stored entry under a precomputed hash.
	pub fn add_hash(&mut self, hash: u64, data: Vec<u8>) -> &mut Self {
		self.push(hash, data, false)
	}

	/// Adds a zlib-compressed entry under a precomputed hash.
	pub fn add_hash_compressed(&mut self, hash: u64, data: Vec<u8>) -> &mut Self {
		self.push(hash, data, true)
	}

	/// Adds a stored entry under the hash of `path`.
	pub fn add_path(&mut self, path: &str, data: Vec<u8>) -> &mut Self {
		self.push(hash::hash_path(path), data, false)
	}

	/// Adds a zlib-compressed entry under the hash of `path`.
	pub fn add_path_compressed(&mut self, path: &str, data: Vec<u8>) -> &mut Self {
		self.push(hash::hash_path(path), data, true)
	}

	/// Number of entries added so far.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns `true` when no entry has been added.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn push(&mut self, hash: u64, data: Vec<u8>, compress: bool) -> &mut Self {
		self.entries.push(PendingEntry {
			hash,
			data,
			compress,
		});
		self
	}

	/// Serializes the archive.
	pub fn to_bytes(&self) -> Result<Vec<u8>, UoFileError> {
		let capacity = self.block_capacity as usize;
		let block_count = self.entries.len().div_ceil(capacity).max(1);
		let block_size = BLOCK_HEADER_SIZE + capacity * ENTRY_SIZE;
		let directory_end = HEADER_SIZE + block_count * block_size;

		// Payloads go after the directory
		let mut payloads = Vec::with_capacity(self.entries.len());
		for entry in &self.entries {
			if entry.compress {
				let mut encoder = ZlibEncoder::new(Vec::new(), ZlibLevel::default());
				encoder.write_all(&entry.data)?;
				payloads.push((encoder.finish()?, Compression::Zlib));
			} else {
				payloads.push((entry.data.clone(), Compression::None));
			}
		}

		let mut buffer = Vec::with_capacity(directory_end + payloads.iter().map(|(p, _)| p.len()).sum::<usize>());
		buffer.extend_from_slice(&MAGIC.to_le_bytes());
		buffer.extend_from_slice(&self.version.to_le_bytes());
		buffer.extend_from_slice(&SIGNATURE.to_le_bytes());
		buffer.extend_from_slice(&(HEADER_SIZE as u64).to_le_bytes());
		buffer.extend_from_slice(&self.block_capacity.to_le_bytes());
		buffer.extend_from_slice(&(self.entries.len() as u32).to_le_bytes());

		let mut data_offset = directory_end as u64;
		for block in 0..block_count {
			let first = block * capacity;
			let next_block = if block + 1 < block_count {
				(HEADER_SIZE + (block + 1) * block_size) as u64
			} else {
				0
			};
			buffer.extend_from_slice(&self.block_capacity.to_le_bytes());
			buffer.extend_from_slice(&next_block.to_le_bytes());

			for slot in first..first + capacity {
				let Some((entry, (payload, compression))) = self.entries.get(slot).zip(payloads.get(slot)) else {
					buffer.resize(buffer.len() + ENTRY_SIZE, 0);
					continue;
				};
				buffer.extend_from_slice(&(data_offset as i64).to_le_bytes());
				buffer.extend_from_slice(&0u32.to_le_bytes());
				buffer.extend_from_slice(&(payload.len() as u32).to_le_bytes());
				buffer.extend_from_slice(&(entry.data.len() as u32).to_le_bytes());
				buffer.extend_from_slice(&entry.hash.to_le_bytes());
				buffer.extend_from_slice(&0u32.to_le_bytes());
				buffer.extend_from_slice(&compression.to_flag().to_le_bytes());
				data_offset += payload.len() as u64;
			}
		}

		for (payload, _) in &payloads {
			buffer.extend_from_slice(payload);
		}

		Ok(buffer)
	}

	/// Serializes the archive and writes it to `path`.
	pub fn save(&self, path: impl AsRef<Path>) -> Result<(), UoFileError> {
		std::fs::write(path, self.to_bytes()?)?;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test_log::test]
	fn test_empty_archive_layout() {
		let bytes = Builder::with_block_capacity(4).to_bytes().unwrap();
		assert_eq!(bytes.len(), HEADER_SIZE + BLOCK_HEADER_SIZE + 4 * ENTRY_SIZE);
		assert_eq!(&bytes[0..4], b"MYP\0");
	}

	#[test_log::test]
	fn test_block_padding() {
		let mut builder = Builder::with_block_capacity(3);
		builder.add_hash(1, vec![0xAA]).add_hash(2, vec![0xBB]);
		let bytes = builder.to_bytes().unwrap();

		// Third slot is unused and must carry a zero offset
		let third = HEADER_SIZE + BLOCK_HEADER_SIZE + 2 * ENTRY_SIZE;
		assert_eq!(&bytes[third..third + 8], &[0u8; 8]);
		assert_eq!(&bytes[bytes.len() - 2..], &[0xAA, 0xBB]);
	}
}
