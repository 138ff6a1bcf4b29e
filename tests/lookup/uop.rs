use uoanim_rs::prelude::*;
use uoanim_rs::uoanim_types::file::uop::hash;

use crate::fixtures::{ClientDir, uop_container};

fn client() -> ClientDir {
	let dir = ClientDir::new("uop");
	dir.write_frame_archive("AnimationFrame1.uop", vec![(400, 0, uop_container(400, 2), true)]);
	dir.write_frame_archive("AnimationFrame2.uop", vec![
		(400, 0, uop_container(400, 1), false),
		(400, 5, uop_container(400, 1), false),
		(400, 30, uop_container(400, 1), false),
		(12, 25, uop_container(12, 1), true),
	]);
	dir
}

#[test_log::test]
fn test_frame_from_client_dir() {
	let dir = client();
	let mut service = AnimationLookupService::from_client_files(&ClientFiles::from_dir(dir.path()));
	assert!(service.has_frame_archives());

	// slot 1 holds the two-frame container, compressed on disk
	let frame = service.get_frame(400, 0, 1, 0, 0).unwrap();
	assert_eq!(frame.header.width, 11);
	assert_eq!(frame.image.pixel_count(), 11 * 3);
	assert_eq!(frame.image.covered_count(), 1);
	assert_eq!(frame.color_at(0, 0), Color::from_555_shifted(0x7FFF));
	assert_eq!(frame.color_at(1, 0), Color::transparent());

	let frame = service.get_frame(400, 0, 4, 1, 0).unwrap();
	assert_eq!(frame.header.width, 42);
}

#[test_log::test]
fn test_discovery_from_client_dir() {
	let dir = client();
	let service = AnimationLookupService::from_client_files(&ClientFiles::from_dir(dir.path()));

	assert_eq!(service.discover_actions(400), vec![0, 1, 6]);
	assert_eq!(service.discover_actions(12), vec![5]);
	assert_eq!(service.available_directions(400, 1), vec![0]);

	let all = service.discover_all_animations(500);
	assert_eq!(all.len(), 2);
	for actions in all.values() {
		assert!(actions.windows(2).all(|w| w[0] < w[1]));
	}
}

#[test_log::test]
fn test_resolved_action_survives_other_requests() {
	let dir = client();
	let mut service = AnimationLookupService::from_client_files(&ClientFiles::from_dir(dir.path()));

	// action 3 is missing, so 12 settles on its only action
	assert!(service.get_frame(12, 3, 0, 0, 0).is_some());
	assert_eq!(service.cached_action(12), Some(5));
	assert_eq!(service.resolve_action(12, 0), 5);

	assert!(service.get_frame(400, 1, 2, 0, 0).is_some());
	assert_eq!(service.resolve_action(400, 0), 1);
}

#[test_log::test]
fn test_missing_animation() {
	let dir = client();
	let mut service = AnimationLookupService::from_client_files(&ClientFiles::from_dir(dir.path()));
	assert!(service.get_frame(401, 0, 0, 0, 0).is_none());
	assert_eq!(service.resolve_action(401, 0), NO_ACTION);
	assert_eq!(service.cached_action(401), None);
}

#[test_log::test]
fn test_empty_client_dir() {
	let dir = ClientDir::new("empty");
	let mut service = AnimationLookupService::from_client_files(&ClientFiles::from_dir(dir.path()));
	assert!(!service.has_frame_archives());
	assert!(service.discover_actions(400).is_empty());
	assert!(service.get_frame(400, 0, 0, 0, 0).is_none());
	assert!(!service.load_uop_animations_up_to(10));
}

#[test_log::test]
fn test_group_table_from_client_dir() {
	let dir = client();
	let mut service = AnimationLookupService::from_client_files(&ClientFiles::from_dir(dir.path()));
	service.load_uop_animations_up_to(500);

	assert_eq!(service.uop_group(400, 0).map(|g| g.slot), Some(1));
	assert_eq!(service.uop_group(400, 5).map(|g| g.slot), Some(2));
	assert_eq!(service.uop_group(12, 25).map(|g| g.slot), Some(2));
	assert_eq!(service.uop_group_count(), 4);
}

#[test_log::test]
fn test_archive_paths_hash_to_frame_keys() {
	let dir = ClientDir::new("hash");
	let mut builder = uop::Builder::new();
	builder.add_path("build/animationlegacyframe/000400/00.bin", uop_container(400, 1));
	builder.save(dir.path().join("AnimationFrame1.uop")).unwrap();

	let archive = UopFile::open(dir.path().join("AnimationFrame1.uop")).unwrap();
	let key = hash::animation_frame_hash(400, 0);
	assert_eq!(key, hash::hash_path("build/animationlegacyframe/000400/00.bin"));
	assert_eq!(key, hash::animation_frame_hash(400, 0));
	assert!(archive.contains(key));
	assert!(!archive.contains(hash::animation_frame_hash(400, 1)));
	assert!(archive.lookup_path("build/animationlegacyframe/000400/00.bin").is_some());
}
