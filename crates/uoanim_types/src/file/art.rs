//! Static item art records of `art.mul`.
//!
//! Item `n` is record `n + 0x4000` of `art.idx`; the lower ids hold land
//! tiles, which use a different layout and are not handled here.
//!
//! ```text
//! Offset  Size    Field        Description
//! ------  ------  -----------  ---------------------------------------
//! 0x00    4       flags        Unused
//! 0x04    2       width        1..=1024
//! 0x06    2       height       1..=1024
//! 0x08    2 × h   line_starts  Start of each row, in u16 units from the data
//! ...             data
//! ```
//!
//! A row is a list of `(x_offset, x_run)` u16 pairs ended by `(0, 0)`. Each
//! pair skips `x_offset` pixels and is followed by `x_run` raw 15-bit colors.
//! A raw color of 0 is transparent.

use std::fmt;
use std::io::{Cursor, Seek, SeekFrom};

use image::RgbaImage;
use log::debug;

use crate::file::io::ReadExt;
use crate::file::palette::{Color, ColorBlend};

/// Offset between item ids and `art.idx` record ids
pub const ITEM_RECORD_OFFSET: u32 = 0x4000;

/// Largest accepted width or height
pub const MAX_DIMENSION: u16 = 1024;

/// Record id of item `item_id` in `art.idx`.
#[inline]
pub fn item_record_id(item_id: u32) -> u32 {
	item_id.saturating_add(ITEM_RECORD_OFFSET)
}

/// A decoded item sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtRecord {
	/// Width in pixels
	pub width: u16,
	/// Height in pixels
	pub height: u16,
	/// Row-major raw colors, 0 where transparent
	pub pixels: Vec<u16>,
}

impl ArtRecord {
	/// Decodes a record. Returns `None` on bad dimensions or truncated data.
	pub fn from_bytes(data: &[u8]) -> Option<Self> {
		let mut reader = Cursor::new(data);
		reader.seek(SeekFrom::Start(4)).ok()?;
		let width = reader.read_u16_le().ok()?;
		let height = reader.read_u16_le().ok()?;
		if width == 0 || width > MAX_DIMENSION || height == 0 || height > MAX_DIMENSION {
			debug!("Art record has invalid dimensions {width}x{height}");
			return None;
		}

		let mut line_starts = Vec::with_capacity(height as usize);
		for _ in 0..height {
			line_starts.push(reader.read_u16_le().ok()?);
		}
		let data_start = reader.position();

		let mut pixels = vec![0u16; width as usize * height as usize];
		for (y, &line_start) in line_starts.iter().enumerate() {
			reader.seek(SeekFrom::Start(data_start + line_start as u64 * 2)).ok()?;
			let row = y * width as usize;
			let mut x = 0usize;
			loop {
				let x_offset = reader.read_u16_le().ok()?;
				let x_run = reader.read_u16_le().ok()?;
				if x_offset == 0 && x_run == 0 {
					break;
				}
				x += x_offset as usize;
				for _ in 0..x_run {
					let pixel = reader.read_u16_le().ok()?;
					if x < width as usize {
						pixels[row + x] = pixel;
					}
					x += 1;
				}
			}
		}

		Some(Self {
			width,
			height,
			pixels,
		})
	}

	/// Raw color at `(x, y)`.
	pub fn pixel(&self, x: u16, y: u16) -> Option<u16> {
		if x >= self.width || y >= self.height {
			return None;
		}
		self.pixels.get(y as usize * self.width as usize + x as usize).copied()
	}

	/// Row `y`, padded with 0 where `pixels` is short.
	fn row(&self, y: u16) -> Vec<u16> {
		(0..self.width).map(|x| self.pixel(x, y).unwrap_or(0)).collect()
	}

	/// Display color of a raw value, transparent for 0.
	fn color(&self, raw: u16, blend: &dyn ColorBlend, hue: u16) -> Color {
		if raw == 0 { Color::transparent() } else { blend.blend(raw, hue, false) }
	}

	/// Renders the sprite to an RGBA image.
	pub fn to_rgba_image(&self, blend: &dyn ColorBlend, hue: u16) -> RgbaImage {
		RgbaImage::from_fn(self.width as u32, self.height as u32, |x, y| {
			let raw = self.pixel(x as u16, y as u16).unwrap_or(0);
			image::Rgba(self.color(raw, blend, hue).to_rgba())
		})
	}

	/// Renders the sprite to a BGRA byte buffer.
	pub fn to_bgra(&self, blend: &dyn ColorBlend, hue: u16) -> Vec<u8> {
		(0..self.height)
			.flat_map(|y| self.row(y))
			.flat_map(|raw| self.color(raw, blend, hue).to_bgra())
			.collect()
	}

	/// Encodes the sprite, one run per span of non-zero pixels.
	pub fn to_bytes(&self) -> Vec<u8> {
		let mut rows = Vec::new();
		let mut line_starts = Vec::with_capacity(self.height as usize);
		for y in 0..self.height {
			line_starts.push((rows.len() / 2) as u16);
			let row = self.row(y);
			let mut cursor = 0usize;
			let mut x = 0usize;
			while x < row.len() {
				if row[x] == 0 {
					x += 1;
					continue;
				}
				let start = x;
				while x < row.len() && row[x] != 0 {
					x += 1;
				}
				rows.extend_from_slice(&((start - cursor) as u16).to_le_bytes());
				rows.extend_from_slice(&((x - start) as u16).to_le_bytes());
				for &pixel in &row[start..x] {
					rows.extend_from_slice(&pixel.to_le_bytes());
				}
				cursor = x;
			}
			rows.extend_from_slice(&[0u8; 4]);
		}

		let mut buffer = Vec::with_capacity(8 + line_starts.len() * 2 + rows.len());
		buffer.extend_from_slice(&[0u8; 4]);
		buffer.extend_from_slice(&self.width.to_le_bytes());
		buffer.extend_from_slice(&self.height.to_le_bytes());
		for start in line_starts {
			buffer.extend_from_slice(&start.to_le_bytes());
		}
		buffer.extend_from_slice(&rows);
		buffer
	}
}

impl fmt::Display for ArtRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Art {}x{}", self.width, self.height)
	}
}
