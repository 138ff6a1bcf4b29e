//! Benchmark helper utilities for uoanim-rs
//!
//! Everything here is synthetic: frames are filled with a diagonal pattern of
//! runs so both RLE decoders walk many short runs with transparent gaps, the
//! way real creature sprites look.

use uoanim_types::file::anim::rle::MulRun;
use uoanim_types::file::anim::{FrameHeader, IndexedImage, bin, mul};
use uoanim_types::file::uop::{self, hash};

/// Palette with a gray ramp over every index
pub fn gray_palette() -> [u16; 256] {
	let mut palette = [0u16; 256];
	for (i, color) in palette.iter_mut().enumerate() {
		let level = (i / 8) as u16;
		*color = (level << 10) | (level << 5) | level;
	}
	palette
}

/// Image whose every row holds runs of 6 pixels separated by gaps of 2,
/// shifted by one column per row.
pub fn pattern_image(width: u16, height: u16) -> IndexedImage {
	let mut image = IndexedImage::new(width as u32, height as u32);
	for y in 0..height as i32 {
		for x in 0..width as i32 {
			if (x + y) % 8 < 6 {
				image.put(x, y, ((x * 7 + y) % 255 + 1) as u8);
			}
		}
	}
	image
}

/// BIN container of `frames_per_direction` identical frames per direction.
pub fn generate_uop_container(width: u16, height: u16, frames_per_direction: u16) -> Vec<u8> {
	let header = FrameHeader {
		center_x: 0,
		center_y: 0,
		width,
		height,
	};
	let image = pattern_image(width, height);
	let mut builder = bin::Builder::new(400);
	for direction in 0..5 {
		for frame in 0..frames_per_direction {
			if let Some(encoded) = bin::EncodedFrame::from_image(direction, frame, gray_palette(), header, &image) {
				builder.add_frame(encoded);
			}
		}
	}
	builder.to_bytes()
}

/// Legacy record of `frame_count` frames drawn with the same pattern.
pub fn generate_mul_record(width: u16, height: u16, frame_count: usize) -> Vec<u8> {
	let middle = (width / 2) as i32;
	let mut runs = Vec::new();
	for y in 0..height as i32 {
		let line = (y % 16) as u8;
		let mut x = y % 8;
		while x + 6 <= width as i32 {
			let indices: Vec<u8> = (0..6).map(|i| ((x + i) % 255 + 1) as u8).collect();
			runs.push((
				MulRun {
					run_length: 6,
					line,
					offset: (x - middle) as i16,
				},
				indices,
			));
			x += 8;
		}
	}

	let mut builder = mul::Builder::new(gray_palette());
	for _ in 0..frame_count {
		builder.add_frame(mul::EncodedFrame {
			header: FrameHeader {
				center_x: 0,
				center_y: 0,
				width,
				height,
			},
			runs: runs.clone(),
		});
	}
	builder.to_bytes()
}

/// UOP archive holding group 0 of animations `0..count`, each a tiny container.
pub fn generate_frame_archive(count: u32, compressed: bool) -> Vec<u8> {
	let container = generate_uop_container(8, 8, 1);
	let mut builder = uop::Builder::new();
	for anim in 0..count {
		let key = hash::animation_frame_hash(anim, 0);
		if compressed {
			builder.add_hash_compressed(key, container.clone());
		} else {
			builder.add_hash(key, container.clone());
		}
	}
	builder.to_bytes().unwrap_or_default()
}
