//! `body.def` and `bodyconv.def` body id remapping.
//!
//! Both files are whitespace separated tables with `#` comments.
//!
//! `body.def` substitutes a body the client lacks with another one, optionally
//! hued:
//!
//! ```text
//! # original  replacement    hue
//! 302         {200, 226}     0
//! 400         401            1002
//! ```
//!
//! Only the first id of a `{a, b}` list is used.
//!
//! `bodyconv.def` relocates bodies into the extra animation files. Column 0 is
//! the body id and column `k` its id inside variant `k` (`anim{k+1}.mul`).
//! `-1` and `0xFFFF` mark variants that do not hold the body:
//!
//! ```text
//! # body  anim2  anim3  anim4  anim5
//! 501     -1     -1     650    -1
//! ```
//!
//! The first column with a usable id wins. An id of `65535` selects the
//! variant but keeps the body id. A row without one still moves the
//! body (under its own id) to the first column that is not a sentinel, or to
//! variant 1 when every column is.
//!
//! Malformed lines are skipped and missing files give empty tables, so every
//! lookup degrades to the identity.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use log::{debug, warn};

/// Tokens of `bodyconv.def` meaning "not in this variant"
pub const CONV_SENTINELS: [&str; 3] = ["-1", "0xFFFF", "-1}"];

/// A `body.def` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyDefEntry {
	/// Body id as requested
	pub original_id: u16,
	/// Body id actually drawn
	pub new_id: u16,
	/// Hue applied to the replacement, 0 for none
	pub hue: i32,
}

/// A `bodyconv.def` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyConvEntry {
	/// Body id as requested
	pub original_id: u16,
	/// Id inside the variant file, `None` to keep `original_id`
	pub new_id: Option<u16>,
	/// Variant (column) holding the body
	pub variant: u8,
}

/// Where to find a body in the legacy animation files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MulResolution {
	/// Body id inside the selected file
	pub id: u16,
	/// File variant, 0 for `anim.mul`
	pub variant: u8,
}

/// Splits a line into columns, dropping the `#` comment.
fn columns(line: &str) -> Vec<&str> {
	let content = line.split('#').next().unwrap_or_default();
	content.split([' ', '\t']).filter(|token| !token.is_empty()).collect()
}

fn is_sentinel(token: &str) -> bool {
	CONV_SENTINELS.contains(&token)
}

/// Parses `body.def` text.
pub fn parse_body_def(text: &str) -> Vec<BodyDefEntry> {
	let mut entries = Vec::new();
	for line in text.lines() {
		let parts = columns(line);
		if parts.len() < 2 {
			continue;
		}
		let Ok(original_id) = parts[0].parse::<u16>() else {
			continue;
		};

		let mut replacement = parts[1];
		if replacement.starts_with('{') && replacement.ends_with('}') {
			replacement = replacement.trim_matches(['{', '}']).split(',').next().unwrap_or_default().trim();
		} else if let Some(list) = replacement.strip_prefix('{') {
			// "{200, 226}" is split over several columns
			replacement = list.trim_end_matches(',');
		}
		let Ok(new_id) = replacement.parse::<u16>() else {
			debug!("body.def: skipping line with unusable replacement: {line}");
			continue;
		};

		let hue_column = parts.iter().skip(2).find(|token| !token.ends_with('}') && !token.ends_with(','));
		let hue = match (parts[1].starts_with('{') && !parts[1].ends_with('}'), hue_column) {
			(true, Some(token)) => token.parse().unwrap_or(0),
			(false, _) => parts.get(2).and_then(|token| token.parse().ok()).unwrap_or(0),
			(true, None) => 0,
		};

		entries.push(BodyDefEntry {
			original_id,
			new_id,
			hue,
		});
	}
	entries
}

/// Parses `bodyconv.def` text.
pub fn parse_body_conv(text: &str) -> Vec<BodyConvEntry> {
	let mut entries = Vec::new();
	for line in text.lines() {
		let parts = columns(line);
		if parts.is_empty() {
			continue;
		}
		if parts.len() < 2 {
			warn!("bodyconv.def: skipping malformed line: {line}");
			continue;
		}
		let Ok(original_id) = parts[0].parse::<u16>() else {
			warn!("bodyconv.def: skipping line with invalid body id: {line}");
			continue;
		};

		let candidates = parts.iter().enumerate().skip(1).filter_map(|(column, token)| {
			let variant = u8::try_from(column).ok()?;
			(!is_sentinel(token)).then_some((variant, *token))
		});

		let mut first_usable_column = None;
		let mut chosen = None;
		for (variant, token) in candidates {
			first_usable_column.get_or_insert(variant);
			if let Ok(new_id) = token.parse::<u16>() {
				// 65535 keeps the body id and only switches the variant
				chosen = Some(((new_id != u16::MAX).then_some(new_id), variant));
				break;
			}
		}
		let (new_id, variant) = chosen.unwrap_or((None, first_usable_column.unwrap_or(1)));

		entries.push(BodyConvEntry {
			original_id,
			new_id,
			variant,
		});
	}
	entries
}

/// Lookup tables built from `body.def` and `bodyconv.def`.
#[derive(Debug, Clone, Default)]
pub struct BodyRemapper {
	defs: Vec<BodyDefEntry>,
	convs: Vec<BodyConvEntry>,
	def_index: HashMap<u16, usize>,
	conv_index: HashMap<u16, usize>,
	reverse_index: HashMap<u16, u16>,
}

impl BodyRemapper {
	/// Loads both files. A missing or unreadable file leaves its table empty.
	pub fn load(def_path: impl AsRef<Path>, conv_path: impl AsRef<Path>) -> Self {
		let read = |path: &Path| match std::fs::read(path) {
			Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
			Err(e) => {
				warn!("Cannot read {}: {}", path.display(), e);
				String::new()
			}
		};
		Self::from_strs(&read(def_path.as_ref()), &read(conv_path.as_ref()))
	}

	/// Builds the tables from in-memory file contents.
	pub fn from_strs(def: &str, conv: &str) -> Self {
		Self::from_entries(parse_body_def(def), parse_body_conv(conv))
	}

	/// Builds the tables from parsed rows. The first row of an id wins.
	pub fn from_entries(defs: Vec<BodyDefEntry>, convs: Vec<BodyConvEntry>) -> Self {
		let mut def_index = HashMap::with_capacity(defs.len());
		let mut reverse_index = HashMap::with_capacity(defs.len());
		for (i, entry) in defs.iter().enumerate() {
			def_index.entry(entry.original_id).or_insert(i);
			reverse_index.entry(entry.new_id).or_insert(entry.original_id);
		}
		let mut conv_index = HashMap::with_capacity(convs.len());
		for (i, entry) in convs.iter().enumerate() {
			conv_index.entry(entry.original_id).or_insert(i);
		}

		debug!("Body remapper: {} body.def rows, {} bodyconv.def rows", defs.len(), convs.len());
		Self {
			defs,
			convs,
			def_index,
			conv_index,
			reverse_index,
		}
	}

	/// `body.def` row of `id`.
	pub fn def_entry(&self, id: u16) -> Option<&BodyDefEntry> {
		self.def_index.get(&id).map(|&i| &self.defs[i])
	}

	/// `bodyconv.def` row of `id`.
	pub fn conv_entry(&self, id: u16) -> Option<&BodyConvEntry> {
		self.conv_index.get(&id).map(|&i| &self.convs[i])
	}

	/// Body id `id` was substituted from, or `id` itself.
	pub fn original_id(&self, id: u16) -> u16 {
		self.reverse_index.get(&id).copied().unwrap_or(id)
	}

	/// Number of `body.def` rows.
	pub fn def_count(&self) -> usize {
		self.defs.len()
	}

	/// Number of `bodyconv.def` rows.
	pub fn conv_count(&self) -> usize {
		self.convs.len()
	}

	/// Id to look up in the UOP archives.
	///
	/// Bodies listed in `bodyconv.def` are never substituted through
	/// `body.def`.
	pub fn resolve_for_uop(&self, id: u16) -> u16 {
		if self.conv_index.contains_key(&id) {
			return id;
		}
		self.def_entry(id).map_or(id, |entry| entry.new_id)
	}

	/// Id and file variant to look up in the legacy animation files.
	///
	/// `id` may already be a `body.def` replacement; it is first mapped back
	/// to the body it replaces.
	pub fn resolve_for_mul(&self, id: u16) -> MulResolution {
		let original = self.original_id(id);

		if let Some(conv) = self.conv_entry(original) {
			return MulResolution {
				id: conv.new_id.unwrap_or(original),
				variant: conv.variant,
			};
		}
		if let Some(def) = self.def_entry(original) {
			return MulResolution {
				id: def.new_id,
				variant: 0,
			};
		}
		MulResolution {
			id: original,
			variant: 0,
		}
	}
}

impl fmt::Display for BodyRemapper {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Body remapper: {} defs, {} convs", self.defs.len(), self.convs.len())
	}
}
