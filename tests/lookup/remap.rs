use uoanim_rs::prelude::*;

use crate::fixtures::{ClientDir, uop_container};

const BODY_DEF: &str = "\
# original {replacements} hue
500 {400} 0
501 {401} 0
77 {900, 901} 33
77 {910} 0
";

const BODY_CONV: &str = "\
501 -1 -1 650 -1
620 -1 -1 -1 -1
";

#[test_log::test]
fn test_tables_from_client_dir() {
	let dir = ClientDir::new("remap");
	dir.write("Body.def", BODY_DEF);
	dir.write("bodyconv.def", BODY_CONV);

	let files = ClientFiles::from_dir(dir.path());
	let remapper = BodyRemapper::load(&files.body_def, &files.body_conv);
	assert_eq!(remapper.def_count(), 4);
	assert_eq!(remapper.conv_count(), 2);

	// a relocated body keeps its id in the archives
	assert_eq!(remapper.resolve_for_uop(500), 400);
	assert_eq!(remapper.resolve_for_uop(501), 501);
	assert_eq!(remapper.resolve_for_uop(77), 900);
	assert_eq!(remapper.def_entry(77).map(|e| e.hue), Some(33));
	assert_eq!(remapper.resolve_for_uop(1), 1);

	// the first usable column names both the id and the family
	let MulResolution {
		id,
		variant,
	} = remapper.resolve_for_mul(501);
	assert_eq!((id, variant), (650, 3));
	assert_eq!(AnimFile::from_variant(variant), Some(AnimFile::Anim4));

	let resolution = remapper.resolve_for_mul(620);
	assert_eq!(resolution.id, 620);

	// 400 is what 500 turned into
	assert_eq!(remapper.original_id(400), 500);
	assert_eq!(remapper.resolve_for_mul(400).id, 400);
	assert_eq!(remapper.resolve_for_mul(400).variant, 0);
}

#[test_log::test]
fn test_service_uses_remapped_id() {
	let dir = ClientDir::new("remap_service");
	dir.write("body.def", BODY_DEF);
	dir.write("bodyconv.def", BODY_CONV);
	dir.write_frame_archive("AnimationFrame1.uop", vec![
		(400, 0, uop_container(400, 1), false),
		(501, 0, uop_container(501, 1), false),
	]);

	let mut service = AnimationLookupService::from_client_files(&ClientFiles::from_dir(dir.path()));
	assert_eq!(service.remapper().def_count(), 4);

	assert!(service.get_frame(500, 0, 0, 0, 0).is_some());
	assert_eq!(service.cached_action(400), Some(0));
	assert!(service.get_frame(501, 0, 0, 0, 0).is_some());
	assert_eq!(service.cached_action(401), None);
}

#[test_log::test]
fn test_settings_override_tables() {
	let dir = ClientDir::new("remap_settings");
	dir.write("body.def", "500 400 0\n");
	dir.write("shard_body.def", "500 402 0\n");

	let text = format!(
		"client_dir = '{}'\n\n[[overrides]]\nfile_name = 'BODY.DEF'\npath = '{}'\n",
		dir.path().display(),
		dir.path().join("shard_body.def").display()
	);
	let settings = ClientSettings::from_toml_str(&text).unwrap();
	let files = settings.resolve();
	assert_eq!(files.body_def, dir.path().join("shard_body.def"));
	assert_eq!(files.hues, dir.path().join("hues.mul"));

	let service: AnimationLookupService = AnimationLookupService::from_client_files(&files);
	assert_eq!(service.remapper().resolve_for_uop(500), 402);
}

#[test_log::test]
fn test_missing_tables() {
	let dir = ClientDir::new("remap_missing");
	let files = ClientFiles::from_dir(dir.path());
	let remapper = BodyRemapper::load(&files.body_def, &files.body_conv);
	assert_eq!(remapper.def_count(), 0);
	assert_eq!(remapper.resolve_for_uop(500), 500);
	assert_eq!(remapper.resolve_for_mul(500).id, 500);
}
