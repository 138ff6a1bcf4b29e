//! Body animation lookup.
//!
//! [`AnimationLookupService`] owns every opened client file and answers
//! "which image is body `b` doing action `a` towards direction `d`".
//!
//! UOP frames live in up to six `AnimationFrame*.uop` archives. A body's
//! action is one BIN container at group `action * 5`, and the archives are
//! searched in slot order with the first hit winning. Legacy frames come from
//! the `anim*.mul` families (see [`crate::variant`]).
//!
//! Failures never surface as errors: a missing archive, a damaged record or a
//! frame the body does not have all end up as `None`, logged.
//!
//! # Examples
//!
//! ```no_run
//! use uoanim_vfs::{AnimationLookupService, ClientFiles};
//!
//! let files = ClientFiles::from_dir("/games/uo");
//! let mut service = AnimationLookupService::from_client_files(&files);
//! service.load_uop_animations();
//!
//! if let Some(frame) = service.get_frame(400, 0, 1, 0, 0) {
//! 	println!("{}x{}", frame.width(), frame.height());
//! }
//! ```

mod legacy;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::io::{BufReader, Read, Seek};

use log::{debug, info, warn};
use uoanim_types::file::anim::{DIRECTION_COUNT, DecodedFrame, decode_uop_bin};
use uoanim_types::file::uop::{self, hash, sequence::SequenceRecord};
use uoanim_types::file::{ArchiveRecord, BodyRemapper, HueTable, MulPair};

use crate::config::ClientFiles;
use crate::variant::ANIM_FILE_COUNT;

/// Lookup constants.
pub mod constants {
	/// Number of `AnimationFrame*.uop` slots
	pub const FRAME_ARCHIVE_COUNT: usize = 6;

	/// Animation ids covered by [`super::AnimationLookupService::load_uop_animations`]
	pub const MAX_ANIMATION_ID: u32 = 0x10000;

	/// UOP groups indexed per animation
	pub const UOP_GROUP_COUNT: u32 = 52;

	/// Groups a sequence record may remap or resize
	pub const SEQUENCE_GROUP_COUNT: u32 = 30;

	/// Highest action probed by discovery
	pub const MAX_ACTION: i32 = 35;
}

use constants::*;

/// Sentinel returned when a body has no action at all
pub const NO_ACTION: i32 = -1;

/// Archive slot holding a group, and what the sequence archive says about it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UopGroup {
	/// 1-based `AnimationFrame*.uop` slot
	pub slot: usize,
	/// Frame count from the sequence archive, if it has one
	pub frame_count: Option<i32>,
}

/// Answers frame queries over the client files.
///
/// `R` is the reader behind the UOP archives, a buffered file unless the
/// archives are built in memory.
pub struct AnimationLookupService<R = BufReader<fs::File>> {
	frame_archives: [Option<uop::File<R>>; FRAME_ARCHIVE_COUNT],
	sequence_archive: Option<uop::File<R>>,
	groups: HashMap<(u32, u32), UopGroup>,
	replaced_groups: HashMap<(u32, u32), u32>,
	resolved_actions: HashMap<u32, i32>,
	anim_pairs: [Option<MulPair>; ANIM_FILE_COUNT],
	art: Option<MulPair>,
	remapper: BodyRemapper,
	hues: HueTable,
}

impl<R> Default for AnimationLookupService<R> {
	fn default() -> Self {
		Self {
			frame_archives: std::array::from_fn(|_| None),
			sequence_archive: None,
			groups: HashMap::new(),
			replaced_groups: HashMap::new(),
			resolved_actions: HashMap::new(),
			anim_pairs: std::array::from_fn(|_| None),
			art: None,
			remapper: BodyRemapper::default(),
			hues: HueTable::new(),
		}
	}
}

impl AnimationLookupService {
	/// Opens every file of `files` that exists.
	///
	/// Files that are missing or fail to parse are logged and left out; the
	/// service then answers `None` for whatever needed them.
	pub fn from_client_files(files: &ClientFiles) -> Self {
		let mut service = Self::new();

		for (i, path) in files.frame_archives.iter().enumerate() {
			if !path.is_file() {
				debug!("Frame archive {} not found", path.display());
				continue;
			}
			match uop::File::open(path) {
				Ok(archive) => {
					info!("Loaded {}: {}", path.display(), archive);
					service.set_frame_archive(i + 1, archive);
				}
				Err(e) => warn!("Cannot load {}: {}", path.display(), e),
			}
		}

		if files.sequence_archive.is_file() {
			match uop::File::open(&files.sequence_archive) {
				Ok(archive) => {
					info!("Loaded {}: {}", files.sequence_archive.display(), archive);
					service.set_sequence_archive(archive);
				}
				Err(e) => warn!("Cannot load {}: {}", files.sequence_archive.display(), e),
			}
		}

		for (i, pair) in files.anim.iter().enumerate() {
			if pair.exists() {
				service.anim_pairs[i] = Some(pair.clone());
			}
		}
		if files.art.exists() {
			service.art = Some(files.art.clone());
		} else {
			warn!("Static art files not found: {}", files.art.data.display());
		}

		if files.hues.is_file() {
			match HueTable::open(&files.hues) {
				Ok(hues) => service.hues = hues,
				Err(e) => warn!("Cannot load {}: {}", files.hues.display(), e),
			}
		}
		service.remapper = BodyRemapper::load(&files.body_def, &files.body_conv);

		service
	}
}

impl<R> AnimationLookupService<R> {
	/// Creates a service with no files.
	pub fn new() -> Self {
		Self::default()
	}

	/// Installs the archive of 1-based `slot` (`AnimationFrame{slot}.uop`).
	///
	/// Slots outside `1..=6` are ignored.
	pub fn set_frame_archive(&mut self, slot: usize, archive: uop::File<R>) -> &mut Self {
		match slot.checked_sub(1).and_then(|i| self.frame_archives.get_mut(i)) {
			Some(entry) => *entry = Some(archive),
			None => warn!("Ignoring frame archive for slot {slot}"),
		}
		self
	}

	/// Installs `AnimationSequence.uop`.
	pub fn set_sequence_archive(&mut self, archive: uop::File<R>) -> &mut Self {
		self.sequence_archive = Some(archive);
		self
	}

	/// Replaces the body remapping tables.
	pub fn set_remapper(&mut self, remapper: BodyRemapper) -> &mut Self {
		self.remapper = remapper;
		self
	}

	/// Replaces the hue table.
	pub fn set_hues(&mut self, hues: HueTable) -> &mut Self {
		self.hues = hues;
		self
	}

	/// Body remapping tables in use.
	pub fn remapper(&self) -> &BodyRemapper {
		&self.remapper
	}

	/// Hue table in use.
	pub fn hues(&self) -> &HueTable {
		&self.hues
	}

	/// Returns `true` when at least one frame archive is installed.
	pub fn has_frame_archives(&self) -> bool {
		self.frame_archives.iter().any(Option::is_some)
	}

	/// Forgets the resolved action of `anim`.
	pub fn clear_resolved_action(&mut self, anim: u32) {
		self.resolved_actions.remove(&anim);
	}

	/// Forgets every resolved action.
	pub fn clear_resolved_actions(&mut self) {
		self.resolved_actions.clear();
	}

	/// Action cached for `anim` by [`AnimationLookupService::resolve_action`].
	pub fn cached_action(&self, anim: u32) -> Option<i32> {
		self.resolved_actions.get(&anim).copied()
	}

	/// Group table entry built by [`AnimationLookupService::load_uop_animations`].
	pub fn uop_group(&self, anim: u32, group: u32) -> Option<UopGroup> {
		self.groups.get(&(anim, group)).copied()
	}

	/// Number of groups in the group table.
	pub fn uop_group_count(&self) -> usize {
		self.groups.len()
	}

	/// Legacy group that serves `uop_group` of `anim`, per the sequence archive.
	pub fn replaced_group(&self, anim: u32, uop_group: u32) -> Option<u32> {
		self.replaced_groups.get(&(anim, uop_group)).copied()
	}
}

impl<R: Read + Seek> AnimationLookupService<R> {
	/// 0-based slot of the first archive holding `group` of `anim`.
	fn locate_group(&self, anim: u32, group: u32) -> Option<usize> {
		let key = hash::animation_frame_hash(anim, group);
		self.frame_archives.iter().position(|archive| archive.as_ref().is_some_and(|a| a.contains(key)))
	}

	/// Actions of `anim` with at least one direction present, ascending.
	///
	/// Only archive directories are consulted, no data is read.
	pub fn discover_actions(&self, anim: u32) -> Vec<i32> {
		if !self.has_frame_archives() {
			return Vec::new();
		}

		let actions: Vec<i32> = (0..=MAX_ACTION)
			.filter(|&action| {
				(0..DIRECTION_COUNT).any(|direction| {
					self.locate_group(anim, action as u32 * DIRECTION_COUNT + direction).is_some()
				})
			})
			.collect();

		debug!("Animation {anim} has {} actions: {:?}", actions.len(), actions);
		actions
	}

	/// Lowest discovered action of `anim`, or [`NO_ACTION`].
	pub fn first_available_action(&self, anim: u32) -> i32 {
		self.discover_actions(anim).first().copied().unwrap_or(NO_ACTION)
	}

	/// Directions `0..5` whose group of `action` is present.
	pub fn available_directions(&self, anim: u32, action: i32) -> Vec<u32> {
		let Ok(action) = u32::try_from(action) else {
			return Vec::new();
		};
		(0..DIRECTION_COUNT)
			.filter(|&direction| {
				action
					.checked_mul(DIRECTION_COUNT)
					.and_then(|group| group.checked_add(direction))
					.is_some_and(|group| self.locate_group(anim, group).is_some())
			})
			.collect()
	}

	/// Discovered actions of every animation up to `max_anim`, skipping bodies
	/// without any.
	pub fn discover_all_animations(&self, max_anim: u32) -> BTreeMap<u32, Vec<i32>> {
		let mut animations = BTreeMap::new();
		if !self.has_frame_archives() {
			return animations;
		}
		for anim in 0..=max_anim {
			let actions = self.discover_actions(anim);
			if !actions.is_empty() {
				animations.insert(anim, actions);
			}
		}
		info!("Discovered {} animations", animations.len());
		animations
	}

	/// Action to draw when `requested` is asked of `anim`.
	///
	/// The first answer for an animation is cached and returned for every
	/// later request, whatever action it asks for, until
	/// [`AnimationLookupService::clear_resolved_action`]. A present action is
	/// kept, otherwise the first available one is used. [`NO_ACTION`] is not
	/// cached.
	pub fn resolve_action(&mut self, anim: u32, requested: i32) -> i32 {
		if let Some(&cached) = self.resolved_actions.get(&anim) {
			return cached;
		}

		let present = u32::try_from(requested)
			.ok()
			.and_then(|action| action.checked_mul(DIRECTION_COUNT))
			.is_some_and(|group| self.locate_group(anim, group).is_some());
		if present {
			debug!("Action {requested} found for animation {anim}");
			self.resolved_actions.insert(anim, requested);
			return requested;
		}

		let first = self.first_available_action(anim);
		if first == NO_ACTION {
			warn!("No actions available for animation {anim}");
			return NO_ACTION;
		}

		info!("Action {requested} not found for animation {anim}, using {first}");
		self.resolved_actions.insert(anim, first);
		first
	}

	/// Frame `frame` of `anim` doing `action` towards `direction`.
	///
	/// The body id goes through `body.def` first. The action is resolved with
	/// [`AnimationLookupService::resolve_action`], then direction 0 is tried
	/// when the requested direction has no such frame. A non-zero `hue`
	/// recolors the palette.
	pub fn get_frame(&mut self, anim: u32, action: i32, direction: u32, frame: u32, hue: u16) -> Option<DecodedFrame> {
		let anim = match u16::try_from(anim) {
			Ok(id) => self.remapper.resolve_for_uop(id) as u32,
			Err(_) => anim,
		};

		let resolved = self.resolve_action(anim, action);
		let Ok(resolved) = u32::try_from(resolved) else {
			return None;
		};
		if resolved as i32 != action {
			debug!("Using action {resolved} instead of {action} for animation {anim}");
		}

		let mut decoded = match self.read_action_frame(anim, resolved, direction, frame) {
			Some(decoded) => decoded,
			None if direction != 0 => {
				debug!("Direction {direction} not found for animation {anim}, action {resolved}, trying 0");
				self.read_action_frame(anim, resolved, 0, frame)?
			}
			None => return None,
		};

		if hue != 0 {
			decoded.recolor(&self.hues, hue);
		}
		Some(decoded)
	}

	/// Reads the container of `action` and decodes one of its frames.
	fn read_action_frame(&mut self, anim: u32, action: u32, direction: u32, frame: u32) -> Option<DecodedFrame> {
		let group = action.checked_mul(DIRECTION_COUNT)?;
		let slot = self.locate_group(anim, group)?;
		let archive = self.frame_archives[slot].as_mut()?;
		let record = archive.lookup(hash::animation_frame_hash(anim, group)).copied()?;

		let bytes = match archive.read_data(&record) {
			Ok(bytes) => bytes,
			Err(e) => {
				warn!("Cannot read animation {anim} group {group} from slot {}: {}", slot + 1, e);
				return None;
			}
		};

		let decoded = decode_uop_bin(&bytes, direction, frame);
		if decoded.is_none() {
			debug!("No frame {frame} at direction {direction} in animation {anim} group {group}");
		}
		decoded
	}

	/// Builds the group table and applies `AnimationSequence.uop`.
	///
	/// Returns `false` when no sequence archive is installed; the group table
	/// is built regardless.
	pub fn load_uop_animations(&mut self) -> bool {
		self.load_uop_animations_up_to(MAX_ANIMATION_ID)
	}

	/// [`AnimationLookupService::load_uop_animations`] over animations below
	/// `max_anim` only.
	pub fn load_uop_animations_up_to(&mut self, max_anim: u32) -> bool {
		self.index_groups(max_anim.min(MAX_ANIMATION_ID));
		self.apply_sequences(max_anim.min(MAX_ANIMATION_ID))
	}

	fn index_groups(&mut self, max_anim: u32) {
		self.groups.clear();
		if !self.has_frame_archives() {
			warn!("No frame archive loaded, group table left empty");
			return;
		}

		for anim in 0..max_anim {
			for group in 0..UOP_GROUP_COUNT {
				if let Some(slot) = self.locate_group(anim, group) {
					self.groups.insert((anim, group), UopGroup {
						slot: slot + 1,
						frame_count: None,
					});
				}
			}
		}
		info!("Indexed {} UOP animation groups", self.groups.len());
	}

	fn apply_sequences(&mut self, max_anim: u32) -> bool {
		self.replaced_groups.clear();
		let Some(archive) = self.sequence_archive.as_mut() else {
			warn!("No sequence archive loaded");
			return false;
		};

		let records: Vec<ArchiveRecord> = archive.records().copied().collect();
		let mut parsed = 0usize;
		for record in records {
			let data = match archive.read_data(&record) {
				Ok(data) => data,
				Err(e) => {
					debug!("Skipping sequence entry {:016X}: {}", record.hash, e);
					continue;
				}
			};
			let sequence = match SequenceRecord::from_bytes(&data) {
				Ok(sequence) => sequence,
				Err(e) => {
					debug!("Skipping sequence entry {:016X}: {}", record.hash, e);
					continue;
				}
			};

			let anim = sequence.animation_id;
			if anim >= max_anim {
				debug!("Sequence entry for animation {anim} is out of range");
				continue;
			}

			for replacement in &sequence.replacements {
				let uop_group = replacement.uop_group;
				if uop_group >= SEQUENCE_GROUP_COUNT {
					continue;
				}
				if replacement.frame_count == 0 && replacement.mul_group < SEQUENCE_GROUP_COUNT {
					self.replaced_groups.insert((anim, uop_group), replacement.mul_group);
				} else if replacement.frame_count > 0 {
					if let Some(group) = self.groups.get_mut(&(anim, uop_group)) {
						group.frame_count = Some(replacement.frame_count);
					}
				}
			}
			parsed += 1;
		}

		info!("Applied {parsed} animation sequence records, {} group replacements", self.replaced_groups.len());
		true
	}
}

impl<R> fmt::Display for AnimationLookupService<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let archives = self.frame_archives.iter().filter(|a| a.is_some()).count();
		let pairs = self.anim_pairs.iter().filter(|p| p.is_some()).count();
		write!(
			f,
			"Animation lookup: {} frame archives, {} anim files, {} groups, {}",
			archives,
			pairs,
			self.groups.len(),
			self.remapper
		)
	}
}
