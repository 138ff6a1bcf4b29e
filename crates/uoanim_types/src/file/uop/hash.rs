//! Path hashing used to address entries of UOP archives.
//!
//! UOP archives do not store file names. Every entry is keyed by a 64-bit hash
//! of its lowercase, forward-slash relative path, computed with Bob Jenkins'
//! `lookup3` (`hashlittle2`) seeded with `0xDEADBEEF + len`. The high word of
//! the result is the secondary hash (`b`) and the low word the primary (`c`).
//!
//! The function must match the client bit for bit: it is the only key space.

/// Formats the archive path of a legacy animation group.
///
/// `group` is `action * 5 + direction` for probes, or the action's base group
/// (`action * 5`) when reading a whole action.
///
/// # Examples
///
/// ```
/// use uoanim_types::file::uop::hash::animation_frame_path;
///
/// assert_eq!(animation_frame_path(400, 2), "build/animationlegacyframe/000400/02.bin");
/// ```
pub fn animation_frame_path(animation_id: u32, group: u32) -> String {
	format!("build/animationlegacyframe/{animation_id:06}/{group:02}.bin")
}

/// Hash of the legacy animation group path, see [`animation_frame_path`].
pub fn animation_frame_hash(animation_id: u32, group: u32) -> u64 {
	hash_bytes(animation_frame_path(animation_id, group).as_bytes())
}

/// Normalizes `path` (ASCII lowercase, `\` to `/`) and hashes it.
pub fn hash_path(path: &str) -> u64 {
	let normalized: Vec<u8> = path
		.bytes()
		.map(|b| match b {
			b'\\' => b'/',
			_ => b.to_ascii_lowercase(),
		})
		.collect();
	hash_bytes(&normalized)
}

#[inline]
fn word(bytes: &[u8]) -> u32 {
	u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Raw archive hash over `bytes`, without normalization.
pub fn hash_bytes(bytes: &[u8]) -> u64 {
	let length = bytes.len();
	let seed = (length as u32).wrapping_add(0xDEAD_BEEF);
	let (mut a, mut b, mut c) = (seed, seed, seed);

	let mut i = 0;
	while i + 12 < length {
		a = a.wrapping_add(word(&bytes[i..]));
		b = b.wrapping_add(word(&bytes[i + 4..]));
		c = c.wrapping_add(word(&bytes[i + 8..]));

		a = a.wrapping_sub(c);
		a ^= c.rotate_left(4);
		c = c.wrapping_add(b);
		b = b.wrapping_sub(a);
		b ^= a.rotate_left(6);
		a = a.wrapping_add(c);
		c = c.wrapping_sub(b);
		c ^= b.rotate_left(8);
		b = b.wrapping_add(a);
		a = a.wrapping_sub(c);
		a ^= c.rotate_left(16);
		c = c.wrapping_add(b);
		b = b.wrapping_sub(a);
		b ^= a.rotate_left(19);
		a = a.wrapping_add(c);
		c = c.wrapping_sub(b);
		c ^= b.rotate_left(4);
		b = b.wrapping_add(a);

		i += 12;
	}

	let tail = &bytes[i..];
	if tail.is_empty() {
		// Only reachable for the empty string; the client returns the
		// untouched secondary word and a zero primary word.
		return (c as u64) << 32;
	}

	for (k, &byte) in tail.iter().enumerate() {
		let value = (byte as u32) << ((k % 4) * 8);
		match k / 4 {
			0 => a = a.wrapping_add(value),
			1 => b = b.wrapping_add(value),
			_ => c = c.wrapping_add(value),
		}
	}

	c ^= b;
	c = c.wrapping_sub(b.rotate_left(14));
	a ^= c;
	a = a.wrapping_sub(c.rotate_left(11));
	b ^= a;
	b = b.wrapping_sub(a.rotate_left(25));
	c ^= b;
	c = c.wrapping_sub(b.rotate_left(16));
	a ^= c;
	a = a.wrapping_sub(c.rotate_left(4));
	b ^= a;
	b = b.wrapping_sub(a.rotate_left(14));
	c ^= b;
	c = c.wrapping_sub(b.rotate_left(24));

	((b as u64) << 32) | c as u64
}
