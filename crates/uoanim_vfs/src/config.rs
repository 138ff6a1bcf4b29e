//! Client file locations.
//!
//! A client install keeps every file this crate reads in one directory.
//! [`ClientFiles::from_dir`] assumes the conventional names. A settings file
//! can point at that directory and replace individual files:
//!
//! ```toml
//! client_dir = "/games/uo"
//!
//! [[overrides]]
//! file_name = "bodyconv.def"
//! path = "/games/shard/bodyconv.def"
//! ```
//!
//! `UOANIM_CLIENT_DIR` in the environment takes precedence over `client_dir`.

use std::path::{Path, PathBuf};

use config::{Config, Environment, FileFormat};
use log::debug;
use serde::Deserialize;
use uoanim_types::file::MulPair;

use crate::VfsError;
use crate::lookup::constants::FRAME_ARCHIVE_COUNT;
use crate::variant::{ANIM_FILE_COUNT, AnimFile};

/// Prefix of environment variables read by [`ClientSettings`]
pub const ENV_PREFIX: &str = "UOANIM";

/// Conventional client file names.
pub mod names {
	/// Sequence archive
	pub const ANIMATION_SEQUENCE: &str = "AnimationSequence.uop";
	/// Static art index
	pub const ART_INDEX: &str = "artidx.mul";
	/// Static art data
	pub const ART_DATA: &str = "art.mul";
	/// Hue table
	pub const HUES: &str = "hues.mul";
	/// Body substitution table
	pub const BODY_DEF: &str = "body.def";
	/// Body relocation table
	pub const BODY_CONV: &str = "bodyconv.def";

	/// Frame archive of slot `slot` (1-based).
	pub fn animation_frame(slot: usize) -> String {
		format!("AnimationFrame{slot}.uop")
	}
}

/// One replaced client file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileOverride {
	/// Conventional name of the replaced file, compared case-insensitively
	pub file_name: String,
	/// Path used instead
	pub path: PathBuf,
}

/// Contents of a settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
	/// Directory of the client install
	pub client_dir: PathBuf,
	/// Files taken from somewhere else
	pub overrides: Vec<FileOverride>,
}

impl ClientSettings {
	/// Loads a TOML settings file, then applies `UOANIM_*` environment variables.
	pub fn from_toml(path: impl AsRef<Path>) -> Result<Self, VfsError> {
		let source = config::File::from(path.as_ref()).format(FileFormat::Toml);
		Self::build(Config::builder().add_source(source))
	}

	/// Parses TOML settings text, then applies `UOANIM_*` environment variables.
	pub fn from_toml_str(text: &str) -> Result<Self, VfsError> {
		Self::build(Config::builder().add_source(config::File::from_str(text, FileFormat::Toml)))
	}

	fn build(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self, VfsError> {
		let settings = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__")).build()?;
		Ok(settings.try_deserialize()?)
	}

	/// Replacement path of `file_name`, if any.
	pub fn override_for(&self, file_name: &str) -> Option<&Path> {
		self.overrides
			.iter()
			.find(|o| o.file_name.eq_ignore_ascii_case(file_name))
			.map(|o| o.path.as_path())
	}

	/// Path of every client file, overrides applied.
	pub fn resolve(&self) -> ClientFiles {
		let path = |name: &str| match self.override_for(name) {
			Some(path) => path.to_path_buf(),
			None => locate(&self.client_dir, name),
		};
		ClientFiles::with(path)
	}
}

/// Paths of every file the lookup service can use.
///
/// Nothing here has to exist: missing files are skipped when the service is
/// built from this set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientFiles {
	/// `AnimationFrame1.uop` to `AnimationFrame6.uop`, in search order
	pub frame_archives: [PathBuf; FRAME_ARCHIVE_COUNT],
	/// `AnimationSequence.uop`
	pub sequence_archive: PathBuf,
	/// Legacy animation pairs, indexed by [`AnimFile::index`]
	pub anim: [MulPair; ANIM_FILE_COUNT],
	/// Static art pair
	pub art: MulPair,
	/// `hues.mul`
	pub hues: PathBuf,
	/// `body.def`
	pub body_def: PathBuf,
	/// `bodyconv.def`
	pub body_conv: PathBuf,
}

impl ClientFiles {
	/// Conventional names inside `dir`.
	///
	/// Names are matched case-insensitively when the exact spelling is not
	/// present.
	pub fn from_dir(dir: impl AsRef<Path>) -> Self {
		let dir = dir.as_ref();
		Self::with(|name| locate(dir, name))
	}

	/// Loads a settings file and resolves it, see [`ClientSettings::from_toml`].
	pub fn from_toml(path: impl AsRef<Path>) -> Result<Self, VfsError> {
		Ok(ClientSettings::from_toml(path)?.resolve())
	}

	fn with(path: impl Fn(&str) -> PathBuf) -> Self {
		Self {
			frame_archives: std::array::from_fn(|i| path(&names::animation_frame(i + 1))),
			sequence_archive: path(names::ANIMATION_SEQUENCE),
			anim: AnimFile::ALL
				.map(|family| MulPair::new(path(&family.index_file_name()), path(&family.data_file_name()))),
			art: MulPair::new(path(names::ART_INDEX), path(names::ART_DATA)),
			hues: path(names::HUES),
			body_def: path(names::BODY_DEF),
			body_conv: path(names::BODY_CONV),
		}
	}

	/// Legacy animation pair of `family`.
	pub fn anim_pair(&self, family: AnimFile) -> &MulPair {
		&self.anim[family.index()]
	}
}

/// `dir/name`, or the entry of `dir` equal to `name` ignoring case.
fn locate(dir: &Path, name: &str) -> PathBuf {
	let exact = dir.join(name);
	if exact.exists() {
		return exact;
	}

	let found = std::fs::read_dir(dir).ok().and_then(|entries| {
		entries
			.filter_map(Result::ok)
			.find(|entry| entry.file_name().to_string_lossy().eq_ignore_ascii_case(name))
			.map(|entry| entry.path())
	});
	if let Some(path) = &found {
		debug!("Using {} for {}", path.display(), name);
	}
	found.unwrap_or(exact)
}
