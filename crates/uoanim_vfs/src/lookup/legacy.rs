//! Lookups over the `*.idx` / `*.mul` pairs.

use log::debug;
use uoanim_types::file::anim::{DecodedFrame, decode_mul_bytes};
use uoanim_types::file::{ArtRecord, MulPair, MulResolution, item_record_id};

use super::AnimationLookupService;
use crate::variant::AnimFile;

impl<R> AnimationLookupService<R> {
	/// Installs the pair of an animation family.
	pub fn set_anim_pair(&mut self, family: AnimFile, pair: MulPair) -> &mut Self {
		self.anim_pairs[family.index()] = Some(pair);
		self
	}

	/// Installs the static art pair.
	pub fn set_art_pair(&mut self, pair: MulPair) -> &mut Self {
		self.art = Some(pair);
		self
	}

	/// Pair of `family`, if installed.
	pub fn anim_pair(&self, family: AnimFile) -> Option<&MulPair> {
		self.anim_pairs[family.index()].as_ref()
	}

	/// Legacy frame of `body` doing `action` towards `direction`.
	///
	/// `body` is first mapped back through `body.def`, then `bodyconv.def`
	/// selects the family. A family without files falls back to `anim`. The
	/// palette is blended with `hue`.
	pub fn get_body_animation(&self, body: u16, action: u32, direction: u32, hue: u16) -> Option<DecodedFrame> {
		let MulResolution {
			id,
			variant,
		} = self.remapper.resolve_for_mul(body);

		let requested = AnimFile::from_variant(variant).unwrap_or(AnimFile::Anim);
		let (family, pair) = match self.anim_pair(requested) {
			Some(pair) => (requested, pair),
			None => {
				if requested != AnimFile::Anim {
					debug!("{requested} not loaded, reading body {id} from anim");
				}
				(AnimFile::Anim, self.anim_pair(AnimFile::Anim)?)
			}
		};

		let record_id = family.record_id(id, action, direction);
		let Some(bytes) = pair.read(record_id) else {
			debug!("No {family} record {record_id} for body {body} (as {id})");
			return None;
		};
		decode_mul_bytes(&bytes, direction, action, &self.hues, hue)
	}

	/// Static art of item `item_id`.
	pub fn get_art(&self, item_id: u32) -> Option<ArtRecord> {
		let pair = self.art.as_ref()?;
		let record_id = item_record_id(item_id);
		let Some(bytes) = pair.read(record_id) else {
			debug!("No art record {record_id} for item {item_id}");
			return None;
		};
		ArtRecord::from_bytes(&bytes)
	}
}
