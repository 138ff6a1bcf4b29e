//! Error types for file format parsing and manipulation.

use std::fmt;

use thiserror::Error;

/// Identifies which file format an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
	/// UOP hashed archive (`*.uop`)
	Uop,
	/// BIN frame container stored inside `AnimationFrame*.uop`
	Bin,
	/// Record of `AnimationSequence.uop`
	Sequence,
	/// Legacy index file (`*.idx`)
	Idx,
	/// Legacy data file (`*.mul`)
	Mul,
	/// Static art record (`art.mul`)
	Art,
	/// Hue table (`hues.mul`)
	Hues,
	/// `body.def` / `bodyconv.def` text tables
	BodyDef,
}

impl fmt::Display for FileType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Uop => "UOP",
			Self::Bin => "BIN",
			Self::Sequence => "SEQUENCE",
			Self::Idx => "IDX",
			Self::Mul => "MUL",
			Self::Art => "ART",
			Self::Hues => "HUES",
			Self::BodyDef => "BODYDEF",
		};
		f.write_str(name)
	}
}

/// Unified error type for every format in this crate.
#[derive(Debug, Error)]
pub enum UoFileError {
	/// Not enough data to parse
	#[error("[{file_type}] Insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Format being parsed
		file_type: FileType,
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Invalid magic number
	#[error("[{file_type}] Invalid magic number: expected {expected:02X?}, got {actual:02X?}")]
	InvalidMagic {
		/// Format being parsed
		file_type: FileType,
		/// Expected magic bytes
		expected: Vec<u8>,
		/// Magic bytes found in the data
		actual: Vec<u8>,
	},

	/// A requested entry does not exist
	#[error("[{file_type}] Entry not found: {message}")]
	EntryNotFound {
		/// Format being parsed
		file_type: FileType,
		/// Details about the missing entry
		message: String,
	},

	/// Compressed payload could not be inflated
	#[error("[{file_type}] Decompression failed: {message}")]
	DecompressionError {
		/// Format being parsed
		file_type: FileType,
		/// Details about the failure
		message: String,
	},

	/// Compression flag this crate cannot decode
	#[error("[{file_type}] Unsupported compression type: {compression_type}")]
	UnsupportedCompressionType {
		/// Format being parsed
		file_type: FileType,
		/// Raw compression flag
		compression_type: u16,
	},

	/// Structurally invalid data
	#[error("[{file_type}] Bad encoding: {message}")]
	BadEncoding {
		/// Format being parsed
		file_type: FileType,
		/// Details about the problem
		message: String,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

impl UoFileError {
	/// Shorthand for [`UoFileError::InsufficientData`].
	pub fn insufficient_data(file_type: FileType, expected: usize, actual: usize) -> Self {
		Self::InsufficientData {
			file_type,
			expected,
			actual,
		}
	}

	/// Shorthand for [`UoFileError::InvalidMagic`].
	pub fn invalid_magic(file_type: FileType, expected: &[u8], actual: &[u8]) -> Self {
		Self::InvalidMagic {
			file_type,
			expected: expected.to_vec(),
			actual: actual.to_vec(),
		}
	}

	/// Shorthand for [`UoFileError::BadEncoding`].
	pub fn bad_encoding(file_type: FileType, message: impl Into<String>) -> Self {
		Self::BadEncoding {
			file_type,
			message: message.into(),
		}
	}
}
