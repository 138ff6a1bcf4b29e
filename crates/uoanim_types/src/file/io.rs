//! Little-endian primitive readers shared by the binary formats.

use std::io::{self, Read, Seek, SeekFrom};

/// Extension methods for reading little-endian primitives.
pub(crate) trait ReadExt: Read {
	fn read_array<const N: usize>(&mut self) -> io::Result<[u8; N]> {
		let mut buffer = [0u8; N];
		self.read_exact(&mut buffer)?;
		Ok(buffer)
	}

	fn read_u8(&mut self) -> io::Result<u8> {
		Ok(self.read_array::<1>()?[0])
	}

	fn read_u16_le(&mut self) -> io::Result<u16> {
		self.read_array().map(u16::from_le_bytes)
	}

	fn read_i16_le(&mut self) -> io::Result<i16> {
		self.read_array().map(i16::from_le_bytes)
	}

	fn read_u32_le(&mut self) -> io::Result<u32> {
		self.read_array().map(u32::from_le_bytes)
	}

	fn read_i32_le(&mut self) -> io::Result<i32> {
		self.read_array().map(i32::from_le_bytes)
	}

	fn read_u64_le(&mut self) -> io::Result<u64> {
		self.read_array().map(u64::from_le_bytes)
	}

	fn read_i64_le(&mut self) -> io::Result<i64> {
		self.read_array().map(i64::from_le_bytes)
	}
}

impl<R: Read + ?Sized> ReadExt for R {}

/// Skips `count` bytes forward, failing if that moves past the end of the stream.
pub(crate) fn skip<R: Read + Seek>(reader: &mut R, count: i64) -> io::Result<()> {
	let position = reader.stream_position()?;
	let end = reader.seek(SeekFrom::End(0))?;
	let target = (position as i64).checked_add(count).filter(|&target| target >= 0 && target as u64 <= end);
	let Some(target) = target else {
		reader.seek(SeekFrom::Start(position))?;
		return Err(io::Error::new(
			io::ErrorKind::UnexpectedEof,
			format!("cannot skip {count} bytes from position {position} (length {end})"),
		));
	};
	reader.seek(SeekFrom::Start(target as u64))?;
	Ok(())
}

/// Returns the number of bytes left between the current position and the end.
pub(crate) fn remaining<R: Seek>(reader: &mut R) -> io::Result<u64> {
	let position = reader.stream_position()?;
	let end = reader.seek(SeekFrom::End(0))?;
	reader.seek(SeekFrom::Start(position))?;
	Ok(end.saturating_sub(position))
}
