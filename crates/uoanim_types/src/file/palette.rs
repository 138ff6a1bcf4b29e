//! 15-bit colors and 256-entry frame palettes.
//!
//! Every animation frame carries its own palette of 256 little-endian `u16`
//! colors in `xRRRRRGGGGGBBBBB` layout. Two conversions to 8-bit channels
//! exist in the wild and both are kept:
//!
//! - UOP frames shift each 5-bit channel left by 3 ([`Color::from_555_shifted`])
//! - MUL frames and static art scale to the full range, `c * 255 / 31`, and go
//!   through a [`ColorBlend`] so they can be hued ([`Color::from_555_scaled`])

use std::fmt;
use std::io::{self, Read};

use crate::file::io::ReadExt;

/// RGBA color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	/// Red component (0-255)
	pub r: u8,
	/// Green component (0-255)
	pub g: u8,
	/// Blue component (0-255)
	pub b: u8,
	/// Alpha component (0-255)
	pub a: u8,
}

impl Color {
	/// Creates a new RGBA color.
	pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
		Self {
			r,
			g,
			b,
			a,
		}
	}

	/// Creates a new RGB color with full opacity.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self::new(r, g, b, 255)
	}

	/// Creates a transparent black color.
	pub const fn transparent() -> Self {
		Self::new(0, 0, 0, 0)
	}

	/// Converts a 15-bit color by shifting each channel left by 3.
	pub const fn from_555_shifted(color: u16) -> Self {
		let (r, g, b) = channels_555(color);
		Self::rgb(r << 3, g << 3, b << 3)
	}

	/// Converts a 15-bit color by scaling each channel to 0-255.
	pub const fn from_555_scaled(color: u16) -> Self {
		let (r, g, b) = channels_555(color);
		Self::rgb(scale_channel(r), scale_channel(g), scale_channel(b))
	}

	/// Returns the color as `[b, g, r, a]`.
	pub const fn to_bgra(self) -> [u8; 4] {
		[self.b, self.g, self.r, self.a]
	}

	/// Returns the color as `[r, g, b, a]`.
	pub const fn to_rgba(self) -> [u8; 4] {
		[self.r, self.g, self.b, self.a]
	}
}

impl Default for Color {
	fn default() -> Self {
		Self::transparent()
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "RGBA({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Splits a 15-bit color into its 5-bit channels.
#[inline]
pub const fn channels_555(color: u16) -> (u8, u8, u8) {
	(((color >> 10) & 0x1F) as u8, ((color >> 5) & 0x1F) as u8, (color & 0x1F) as u8)
}

#[inline]
const fn scale_channel(value: u8) -> u8 {
	(value as u32 * 0xFF / 0x1F) as u8
}

/// Maps a raw 15-bit color and a hue id to a display color.
///
/// `hue == 0` means "no hue". `partial` selects partial hueing, where only
/// gray pixels take the hue.
pub trait ColorBlend {
	/// Blends `color` with `hue`.
	fn blend(&self, color: u16, hue: u16, partial: bool) -> Color;
}

/// Blender without hue data: every color is scaled, hues are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScaleBlend;

impl ColorBlend for ScaleBlend {
	fn blend(&self, color: u16, _hue: u16, _partial: bool) -> Color {
		Color::from_555_scaled(color)
	}
}

impl<B: ColorBlend + ?Sized> ColorBlend for &B {
	fn blend(&self, color: u16, hue: u16, partial: bool) -> Color {
		(**self).blend(color, hue, partial)
	}
}

/// A frame palette: the raw colors and their display conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
	raw: [u16; 256],
	colors: [Color; 256],
}

impl Palette {
	/// Number of entries
	pub const SIZE: usize = 256;

	/// Size of a stored palette in bytes
	pub const BYTE_SIZE: usize = Self::SIZE * 2;

	/// Reads 256 raw colors.
	pub fn read_raw<R: Read>(reader: &mut R) -> io::Result<[u16; 256]> {
		let mut raw = [0u16; 256];
		for entry in raw.iter_mut() {
			*entry = reader.read_u16_le()?;
		}
		Ok(raw)
	}

	/// Builds a palette with the shift conversion used by UOP frames.
	pub fn from_raw_shifted(raw: [u16; 256]) -> Self {
		Self {
			raw,
			colors: raw.map(Color::from_555_shifted),
		}
	}

	/// Builds a palette through a blender, as MUL frames do.
	pub fn from_raw_blended(raw: [u16; 256], blend: &dyn ColorBlend, hue: u16) -> Self {
		Self {
			raw,
			colors: raw.map(|color| blend.blend(color, hue, false)),
		}
	}

	/// Returns a copy with every display color recomputed through `blend`.
	pub fn recolored(&self, blend: &dyn ColorBlend, hue: u16, partial: bool) -> Self {
		Self {
			raw: self.raw,
			colors: self.raw.map(|color| blend.blend(color, hue, partial)),
		}
	}

	/// Display color at `index`.
	#[inline]
	pub fn get(&self, index: u8) -> Color {
		self.colors[index as usize]
	}

	/// Raw 15-bit color at `index`.
	#[inline]
	pub fn raw(&self, index: u8) -> u16 {
		self.raw[index as usize]
	}

	/// All raw colors.
	#[inline]
	pub fn raw_colors(&self) -> &[u16; 256] {
		&self.raw
	}

	/// All display colors.
	#[inline]
	pub fn colors(&self) -> &[Color; 256] {
		&self.colors
	}

	/// Serializes the raw colors.
	pub fn to_bytes(&self) -> Vec<u8> {
		self.raw.iter().flat_map(|c| c.to_le_bytes()).collect()
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::from_raw_shifted([0; 256])
	}
}

impl std::ops::Index<u8> for Palette {
	type Output = Color;

	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[index as usize]
	}
}
