//! Synthetic client files

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use uoanim_rs::uoanim_types::file::anim::rle::{MulRun, UopRun};
use uoanim_rs::uoanim_types::file::anim::{FrameHeader, bin, mul};
use uoanim_rs::uoanim_types::file::mul::{ABSENT_LOOKUP, IndexRecord};
use uoanim_rs::uoanim_types::file::uop::{self, hash};

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// A temporary client directory, removed on drop.
pub(crate) struct ClientDir {
	path: PathBuf,
}

impl ClientDir {
	pub(crate) fn new(name: &str) -> Self {
		let id = NEXT_DIR.fetch_add(1, Ordering::Relaxed);
		let path = std::env::temp_dir().join(format!("uoanim_{name}_{}_{id}", std::process::id()));
		let _ = std::fs::remove_dir_all(&path);
		std::fs::create_dir_all(&path).unwrap();
		Self {
			path,
		}
	}

	pub(crate) fn path(&self) -> &Path {
		&self.path
	}

	pub(crate) fn write(&self, name: &str, data: impl AsRef<[u8]>) {
		std::fs::write(self.path.join(name), data).unwrap();
	}

	/// Writes `name` as a UOP archive of `(anim, group, data, compressed)` entries.
	pub(crate) fn write_frame_archive(&self, name: &str, entries: Vec<(u32, u32, Vec<u8>, bool)>) {
		let mut builder = uop::Builder::new();
		for (anim, group, data, compressed) in entries {
			let key = hash::animation_frame_hash(anim, group);
			if compressed {
				builder.add_hash_compressed(key, data);
			} else {
				builder.add_hash(key, data);
			}
		}
		builder.save(self.path.join(name)).unwrap();
	}

	/// Writes an index/data pair holding `records`; every other id is absent.
	pub(crate) fn write_mul_pair(&self, index_name: &str, data_name: &str, records: &[(u32, Vec<u8>)]) {
		let count = records.iter().map(|(id, _)| id + 1).max().unwrap_or(0);
		let mut index = vec![
			IndexRecord {
				lookup: ABSENT_LOOKUP,
				size: 0,
				extra: 0,
			};
			count as usize
		];
		let mut data = Vec::new();
		for (id, bytes) in records {
			index[*id as usize] = IndexRecord {
				lookup: data.len() as u32,
				size: bytes.len() as i32,
				extra: 0,
			};
			data.extend_from_slice(bytes);
		}

		let index: Vec<u8> = index.iter().flat_map(IndexRecord::to_bytes).collect();
		self.write(index_name, index);
		self.write(data_name, data);
	}
}

impl Drop for ClientDir {
	fn drop(&mut self) {
		let _ = std::fs::remove_dir_all(&self.path);
	}
}

/// Palette whose index 1 is `color`.
pub(crate) fn palette(color: u16) -> [u16; 256] {
	let mut palette = [0u16; 256];
	palette[1] = color;
	palette
}

/// BIN container with `per_direction` frames per direction. Frame `f` of
/// direction `d` is `10 * d + f + 1` pixels wide with its first pixel drawn.
pub(crate) fn uop_container(anim: u32, per_direction: u16) -> Vec<u8> {
	let mut builder = bin::Builder::new(anim);
	for direction in 0..5u16 {
		for f in 0..per_direction {
			builder.add_frame(bin::EncodedFrame {
				direction,
				frame_number: f,
				palette: palette(0x7FFF),
				header: FrameHeader {
					center_x: 0,
					center_y: 0,
					width: direction * 10 + f + 1,
					height: 3,
				},
				runs: vec![(
					UopRun {
						run_length: 1,
						x: 0,
						y: -2,
					},
					vec![1],
				)],
			});
		}
	}
	builder.to_bytes()
}

/// Legacy record of 10 frames; frame `k` is `k + 4` pixels wide with a run
/// of two pixels one column right of the middle.
pub(crate) fn mul_record(color: u16) -> Vec<u8> {
	let mut builder = mul::Builder::new(palette(color));
	for k in 0..10u16 {
		builder.add_frame(mul::EncodedFrame {
			header: FrameHeader {
				center_x: 0,
				center_y: 0,
				width: k + 4,
				height: 2,
			},
			runs: vec![(
				MulRun {
					run_length: 2,
					line: 0,
					offset: 1,
				},
				vec![1, 1],
			)],
		});
	}
	builder.to_bytes()
}

/// `hues.mul` with one group; hue `n` (1-based) has a flat ramp of `ramps[n - 1]`.
pub(crate) fn hues_file(ramps: [u16; 8]) -> Vec<u8> {
	let mut data = vec![0u8; 4];
	for color in ramps {
		for _ in 0..32 {
			data.extend_from_slice(&color.to_le_bytes());
		}
		data.extend_from_slice(&[0u8; 24]);
	}
	data
}
