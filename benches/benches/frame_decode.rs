//! Benchmark suite for animation frame decoding
//!
//! Measures both RLE decoders, the path hash and archive directory parsing.
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml

use std::hint::black_box;
use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use uoanim_benches::{generate_frame_archive, generate_mul_record, generate_uop_container};
use uoanim_types::file::anim::{decode_mul_bytes, decode_uop_bin};
use uoanim_types::file::uop::{self, hash};
use uoanim_types::file::{HueTable, ScaleBlend};

const SIZES: [(u16, u16); 3] = [(32, 32), (128, 128), (512, 256)];

fn bench_uop_frames(c: &mut Criterion) {
	let mut group = c.benchmark_group("uop_frame");

	for (width, height) in SIZES {
		let data = generate_uop_container(width, height, 4);
		group.throughput(Throughput::Elements(width as u64 * height as u64));
		group.bench_with_input(BenchmarkId::new("decode", format!("{width}x{height}")), &data, |b, data| {
			b.iter(|| black_box(decode_uop_bin(black_box(data), 3, 2)));
		});
	}

	group.finish();
}

fn bench_mul_frames(c: &mut Criterion) {
	let mut group = c.benchmark_group("mul_frame");

	let mut hues = HueTable::new();
	hues.insert(1, [0x7C00; 32]);

	for (width, height) in SIZES {
		let data = generate_mul_record(width, height, 10);
		let name = format!("{width}x{height}");
		group.throughput(Throughput::Elements(width as u64 * height as u64));
		group.bench_with_input(BenchmarkId::new("decode", &name), &data, |b, data| {
			b.iter(|| black_box(decode_mul_bytes(black_box(data), 0, 1, &ScaleBlend, 0)));
		});
		group.bench_with_input(BenchmarkId::new("decode_hued", &name), &data, |b, data| {
			b.iter(|| black_box(decode_mul_bytes(black_box(data), 0, 1, &hues, 1)));
		});
	}

	group.finish();
}

fn bench_hash(c: &mut Criterion) {
	let mut group = c.benchmark_group("uop_hash");

	group.bench_function("animation_frame_hash", |b| {
		b.iter(|| black_box(hash::animation_frame_hash(black_box(400), black_box(12))));
	});

	// what a full group table scan costs per animation
	group.bench_function("hash_52_groups", |b| {
		b.iter(|| {
			let mut acc = 0u64;
			for group in 0..52 {
				acc ^= hash::animation_frame_hash(black_box(400), group);
			}
			black_box(acc)
		});
	});

	group.finish();
}

fn bench_archive(c: &mut Criterion) {
	let mut group = c.benchmark_group("uop_archive");

	for count in [100u32, 5000] {
		let data = generate_frame_archive(count, false);
		group.throughput(Throughput::Elements(count as u64));
		group.bench_with_input(BenchmarkId::new("open", count), &data, |b, data| {
			b.iter(|| black_box(uop::File::from_reader(Cursor::new(black_box(data.as_slice())))));
		});
	}

	let data = generate_frame_archive(1000, true);
	if let Ok(mut archive) = uop::File::from_reader(Cursor::new(data)) {
		let key = hash::animation_frame_hash(500, 0);
		group.bench_function("read_compressed", |b| {
			b.iter(|| black_box(archive.read_hash(black_box(key))));
		});
	}

	group.finish();
}

criterion_group!(benches, bench_uop_frames, bench_mul_frames, bench_hash, bench_archive);

criterion_main!(benches);
