//! Animation frame decoding.
//!
//! Two containers hold body animation frames:
//!
//! - [`bin`]: the `AMOU` container stored in `AnimationFrame*.uop`, one per
//!   action with the frames of all five directions
//! - [`mul`]: the legacy record of `anim*.mul`, one per action and direction
//!
//! Both end in palette-indexed RLE streams ([`rle`]). Decoding produces a
//! [`DecodedFrame`]: the frame header, its palette and an [`IndexedImage`]
//! that remembers which pixels were actually written.

pub mod bin;
pub mod mul;
pub mod rle;

use std::fmt;

use image::RgbaImage;

use crate::file::palette::{Color, ColorBlend, Palette};

pub use bin::decode_uop_bin;
pub use mul::decode_mul_bytes;

/// Number of directions stored per action
pub const DIRECTION_COUNT: u32 = 5;

/// Placement and size of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FrameHeader {
	/// Horizontal anchor
	pub center_x: i16,
	/// Vertical anchor
	pub center_y: i16,
	/// Width in pixels
	pub width: u16,
	/// Height in pixels
	pub height: u16,
}

impl FrameHeader {
	/// Size of the header in bytes
	pub const SIZE: usize = 8;

	/// Returns `true` when the frame has a drawable area.
	pub fn is_valid(&self) -> bool {
		self.width > 0 && self.height > 0
	}

	/// Serializes the header.
	pub fn to_bytes(&self) -> [u8; 8] {
		let mut bytes = [0u8; 8];
		bytes[0..2].copy_from_slice(&self.center_x.to_le_bytes());
		bytes[2..4].copy_from_slice(&self.center_y.to_le_bytes());
		bytes[4..6].copy_from_slice(&self.width.to_le_bytes());
		bytes[6..8].copy_from_slice(&self.height.to_le_bytes());
		bytes
	}
}

impl fmt::Display for FrameHeader {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}x{} (center {}, {})", self.width, self.height, self.center_x, self.center_y)
	}
}

/// Palette indices of a frame plus a coverage mask.
///
/// Pixels never written by the RLE stream stay uncovered and render
/// transparent, even where their index is 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedImage {
	width: u32,
	height: u32,
	indices: Vec<u8>,
	covered: Vec<bool>,
}

impl IndexedImage {
	/// Creates a fully transparent image.
	pub fn new(width: u32, height: u32) -> Self {
		let len = width as usize * height as usize;
		Self {
			width,
			height,
			indices: vec![0; len],
			covered: vec![false; len],
		}
	}

	/// Width in pixels.
	#[inline]
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height in pixels.
	#[inline]
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Number of pixels, `width * height`.
	#[inline]
	pub fn pixel_count(&self) -> usize {
		self.indices.len()
	}

	/// Writes `index` at `(x, y)`. Returns `false` and writes nothing when the
	/// position lies outside the image.
	#[inline]
	pub fn put(&mut self, x: i32, y: i32, index: u8) -> bool {
		if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
			return false;
		}
		let offset = y as usize * self.width as usize + x as usize;
		self.indices[offset] = index;
		self.covered[offset] = true;
		true
	}

	/// Palette index at `(x, y)`, `None` when transparent or outside.
	#[inline]
	pub fn get(&self, x: u32, y: u32) -> Option<u8> {
		if x >= self.width || y >= self.height {
			return None;
		}
		let offset = y as usize * self.width as usize + x as usize;
		self.covered[offset].then_some(self.indices[offset])
	}

	/// Number of written pixels.
	pub fn covered_count(&self) -> usize {
		self.covered.iter().filter(|&&c| c).count()
	}

	/// Row-major palette indices (transparent pixels hold 0).
	pub fn indices(&self) -> &[u8] {
		&self.indices
	}

	/// Iterates over every pixel as `Option<index>`, row-major.
	pub fn pixels(&self) -> impl Iterator<Item = Option<u8>> + '_ {
		self.indices.iter().zip(&self.covered).map(|(&index, &covered)| covered.then_some(index))
	}
}

/// A decoded animation frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
	/// Frame header
	pub header: FrameHeader,
	/// Palette the indices refer to
	pub palette: Palette,
	/// Pixel indices
	pub image: IndexedImage,
}

impl DecodedFrame {
	/// Width in pixels.
	pub fn width(&self) -> u32 {
		self.image.width()
	}

	/// Height in pixels.
	pub fn height(&self) -> u32 {
		self.image.height()
	}

	/// Display color at `(x, y)`; transparent where nothing was drawn.
	pub fn color_at(&self, x: u32, y: u32) -> Color {
		match self.image.get(x, y) {
			Some(index) => Color {
				a: 255,
				..self.palette.get(index)
			},
			None => Color::transparent(),
		}
	}

	/// Recomputes the palette's display colors with a hue.
	pub fn recolor(&mut self, blend: &dyn ColorBlend, hue: u16) {
		self.palette = self.palette.recolored(blend, hue, false);
	}

	/// Renders the frame to an RGBA image.
	pub fn to_rgba_image(&self) -> RgbaImage {
		RgbaImage::from_fn(self.width(), self.height(), |x, y| image::Rgba(self.color_at(x, y).to_rgba()))
	}

	/// Renders the frame to a BGRA byte buffer, `width * 4` bytes per row.
	pub fn to_bgra(&self) -> Vec<u8> {
		let mut buffer = Vec::with_capacity(self.image.pixel_count() * 4);
		for y in 0..self.height() {
			for x in 0..self.width() {
				buffer.extend_from_slice(&self.color_at(x, y).to_bgra());
			}
		}
		buffer
	}
}

impl fmt::Display for DecodedFrame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Frame {}, {} pixels drawn", self.header, self.image.covered_count())
	}
}
