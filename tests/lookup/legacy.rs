use uoanim_rs::prelude::*;
use uoanim_rs::uoanim_types::file::anim::rle::MulRun;
use uoanim_rs::uoanim_types::file::anim::{FrameHeader, mul};

use crate::fixtures::{ClientDir, hues_file, mul_record, palette};

const GRAY: u16 = 0x4210;
const RED: u16 = 0x7C00;

/// Frame 2 of a record whose only run starts past the right edge.
fn clipped_record() -> Vec<u8> {
	let mut builder = mul::Builder::new(palette(GRAY));
	for _ in 0..3 {
		builder.add_frame(mul::EncodedFrame {
			header: FrameHeader {
				center_x: 0,
				center_y: 0,
				width: 4,
				height: 2,
			},
			runs: vec![
				(
					MulRun {
						run_length: 3,
						line: 0,
						offset: 1,
					},
					vec![1, 1, 1],
				),
				(
					MulRun {
						run_length: 1,
						line: 1,
						offset: 0,
					},
					vec![1],
				),
			],
		});
	}
	builder.to_bytes()
}

fn client() -> ClientDir {
	let dir = ClientDir::new("legacy");
	dir.write_mul_pair("anim.idx", "anim.mul", &[
		(110, mul_record(GRAY)),
		(111, mul_record(GRAY)),
		(112, clipped_record()),
		(115, mul_record(GRAY)),
		(120, mul_record(GRAY)),
		(770, mul_record(GRAY)),
		(8800, mul_record(GRAY)),
	]);
	dir.write_mul_pair("anim3.idx", "anim3.mul", &[(550, mul_record(RED)), (551, mul_record(RED))]);
	dir.write("body.def", "302 80 0\n");
	dir.write("Bodyconv.def", "# relocated bodies\n501\t-1\t5\n502 -1 -1 -1 -1 7\n");

	let mut ramps = [0u16; 8];
	ramps[2] = 0x001F;
	dir.write("hues.mul", hues_file(ramps));

	let mut art = Vec::new();
	art.push((0x4010, ArtRecord {
		width: 3,
		height: 2,
		pixels: vec![0x7FFF, 0, 0x001F, 0, RED, 0],
	}
	.to_bytes()));
	dir.write_mul_pair("artidx.mul", "art.mul", &art);
	dir
}

fn service(dir: &ClientDir) -> AnimationLookupService {
	AnimationLookupService::from_client_files(&ClientFiles::from_dir(dir.path()))
}

#[test_log::test]
fn test_body_animation_picks_record_and_frame() {
	let dir = client();
	let service = service(&dir);

	// record 111, frame 0 * 5 + 1
	let frame = service.get_body_animation(1, 0, 1, 0).unwrap();
	assert_eq!((frame.width(), frame.height()), (5, 2));
	assert_eq!(frame.image.pixel_count(), 10);
	assert_eq!(frame.image.get(3, 0), Some(1));
	assert_eq!(frame.image.get(4, 0), Some(1));
	assert_eq!(frame.color_at(3, 0), Color::from_555_scaled(GRAY));

	// record 115, frame 5, drawn mirrored
	let frame = service.get_body_animation(1, 1, 0, 0).unwrap();
	assert_eq!(frame.width(), 9);
	assert_eq!(frame.image.get(3, 0), Some(1));
	assert_eq!(frame.image.get(2, 0), Some(1));
	assert_eq!(frame.image.get(5, 0), None);
}

#[test_log::test]
fn test_body_animation_clips_runs() {
	let dir = client();
	let service = service(&dir);

	let frame = service.get_body_animation(1, 0, 2, 0).unwrap();
	assert_eq!(frame.image.pixel_count(), 8);
	// 3, then 4 and 5 fall off the edge; the next line starts at the middle
	assert_eq!(frame.image.covered_count(), 2);
	assert_eq!(frame.image.get(3, 0), Some(1));
	assert_eq!(frame.image.get(2, 1), Some(1));
}

#[test_log::test]
fn test_body_animation_missing_records() {
	let dir = client();
	let service = service(&dir);

	// absent index entry
	assert!(service.get_body_animation(1, 0, 3, 0).is_none());
	// record 120 has 10 frames, frame 2 * 5 + 0 is past them
	assert!(service.get_body_animation(1, 2, 0, 0).is_none());
	// past the end of the index
	assert!(service.get_body_animation(900, 0, 0, 0).is_none());
}

#[test_log::test]
fn test_body_animation_uses_conv_family() {
	let dir = client();
	let service = service(&dir);
	assert!(service.anim_pair(AnimFile::Anim3).is_some());
	assert!(service.anim_pair(AnimFile::Anim6).is_none());

	// 501 is body 5 of anim3
	let frame = service.get_body_animation(501, 0, 1, 0).unwrap();
	assert_eq!(frame.color_at(3, 0), Color::from_555_scaled(RED));

	// 502 would be body 7 of anim6, which is not installed
	let frame = service.get_body_animation(502, 0, 0, 0).unwrap();
	assert_eq!(frame.color_at(3, 0), Color::from_555_scaled(GRAY));
}

#[test_log::test]
fn test_body_animation_maps_def_replacements_back() {
	let dir = client();
	let service = service(&dir);

	// 80 replaces 302, whose legacy record is body 80 again
	let replaced = service.get_body_animation(80, 0, 0, 0).unwrap();
	let original = service.get_body_animation(302, 0, 0, 0).unwrap();
	assert_eq!(replaced.header, original.header);
	assert_eq!(replaced.width(), 4);
}

#[test_log::test]
fn test_body_animation_hue() {
	let dir = client();
	let service = service(&dir);
	assert_eq!(service.hues().len(), 8);

	let frame = service.get_body_animation(1, 0, 0, 3).unwrap();
	assert_eq!(frame.color_at(3, 0), Color::from_555_scaled(0x001F));

	// hue 4 has a black ramp
	let frame = service.get_body_animation(1, 0, 0, 4).unwrap();
	assert_eq!(frame.color_at(3, 0), Color::rgb(0, 0, 0));
}

#[test_log::test]
fn test_art_lookup() {
	let dir = client();
	let service = service(&dir);

	let art = service.get_art(0x10).unwrap();
	assert_eq!((art.width, art.height), (3, 2));
	assert_eq!(art.pixel(0, 0), Some(0x7FFF));
	assert_eq!(art.pixel(1, 0), Some(0));
	assert_eq!(art.pixel(1, 1), Some(RED));

	assert!(service.get_art(0x11).is_none());
	let empty: AnimationLookupService = AnimationLookupService::new();
	assert!(empty.get_art(0x10).is_none());
}

#[test_log::test]
fn test_no_legacy_files() {
	let dir = ClientDir::new("no_legacy");
	let service = service(&dir);
	assert!(service.anim_pair(AnimFile::Anim).is_none());
	assert!(service.get_body_animation(1, 0, 0, 0).is_none());
	assert!(service.get_art(0).is_none());
}
