//! Persisted widget visibility encoding.
//!
//! One string per application mode, tokens separated by `;`:
//!
//! - `key`  widget shown
//! - `-key` widget hidden
//! - `+key` widget shown only while its panel is expanded
//!
//! The empty string means the mode has never been customized and every
//! widget follows the mode defaults. A non-empty string is exhaustive: keys
//! it does not mention are hidden.

use indexmap::IndexSet;

pub const SHOW_PREFIX: &str = "";
pub const HIDE_PREFIX: &str = "-";
pub const COLLAPSED_PREFIX: &str = "+";
pub const SETTINGS_SEPARATOR: char = ';';

/// Visibility of one widget in one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisibilityState {
	/// Always shown.
	Visible,
	/// Shown only while the panel is expanded.
	VisibleCollapsed,
	/// Not shown.
	Hidden,
}

impl VisibilityState {
	/// Maps the `(visible, collapsed)` pair used by menus to a state.
	pub fn from_flags(visible: bool, collapsed: bool) -> Self {
		match (visible, collapsed) {
			(true, true) => Self::VisibleCollapsed,
			(true, false) => Self::Visible,
			(false, _) => Self::Hidden,
		}
	}

	pub fn is_visible(self) -> bool {
		self == Self::Visible
	}

	pub fn is_collapsed(self) -> bool {
		self == Self::VisibleCollapsed
	}

	/// Visible in either form.
	pub fn is_shown(self) -> bool {
		self != Self::Hidden
	}

	fn prefix(self) -> &'static str {
		match self {
			Self::Visible => SHOW_PREFIX,
			Self::VisibleCollapsed => COLLAPSED_PREFIX,
			Self::Hidden => HIDE_PREFIX,
		}
	}
}

/// Whether `key` survives an encode/decode cycle: non-empty, free of the
/// separator and not starting with a state prefix.
pub fn is_valid_key(key: &str) -> bool {
	!key.is_empty()
		&& !key.contains(SETTINGS_SEPARATOR)
		&& !key.starts_with(HIDE_PREFIX)
		&& !key.starts_with(COLLAPSED_PREFIX)
}

/// Builds the token for `key` in `state`.
pub fn token(key: &str, state: VisibilityState) -> String {
	format!("{}{key}", state.prefix())
}

/// Explicit visibility tokens of one mode, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedSet {
	tokens: IndexSet<String>,
}

impl PersistedSet {
	pub fn new() -> Self {
		Self::default()
	}

	/// Replaces whatever token `key` had with the one for `state`.
	pub fn insert(&mut self, key: &str, state: VisibilityState) {
		self.remove_key(key);
		self.tokens.insert(token(key, state));
	}

	/// Removes every token for `key`. Returns `true` if one was present.
	pub fn remove_key(&mut self, key: &str) -> bool {
		let mut removed = false;
		for state in [
			VisibilityState::Visible,
			VisibilityState::Hidden,
			VisibilityState::VisibleCollapsed,
		] {
			removed |= self.tokens.shift_remove(token(key, state).as_str());
		}
		removed
	}

	/// Explicit state of `key`, or `None` when the set does not mention it.
	///
	/// Legacy data may hold more than one token for a key; the plain token
	/// wins over hidden, which wins over collapsed.
	pub fn state_of(&self, key: &str) -> Option<VisibilityState> {
		[
			VisibilityState::Visible,
			VisibilityState::Hidden,
			VisibilityState::VisibleCollapsed,
		]
		.into_iter()
		.find(|&state| self.contains_token(&token(key, state)))
	}

	pub fn contains_token(&self, token: &str) -> bool {
		self.tokens.contains(token)
	}

	pub fn tokens(&self) -> impl Iterator<Item = &str> {
		self.tokens.iter().map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}
}

impl<'a> FromIterator<(&'a str, VisibilityState)> for PersistedSet {
	fn from_iter<I: IntoIterator<Item = (&'a str, VisibilityState)>>(iter: I) -> Self {
		let mut set = Self::new();
		for (key, state) in iter {
			set.insert(key, state);
		}
		set
	}
}

/// Decodes a stored string. The empty string decodes to `None`.
///
/// Empty fields (including the one after a trailing separator) are skipped.
pub fn decode(raw: &str) -> Option<PersistedSet> {
	if raw == SHOW_PREFIX {
		return None;
	}
	let tokens = raw
		.split(SETTINGS_SEPARATOR)
		.filter(|t| !t.is_empty())
		.map(str::to_string)
		.collect();
	Some(PersistedSet { tokens })
}

/// Encodes a set, terminating every token with the separator.
///
/// An empty set encodes to the empty string, which reads back as "not
/// customized".
pub fn encode(set: &PersistedSet) -> String {
	let mut out = String::new();
	for token in set.tokens() {
		out.push_str(token);
		out.push(SETTINGS_SEPARATOR);
	}
	out
}

/// Resolves the state of `key` given the mode's persisted set.
///
/// Without a set the mode default applies. With one, the set is exhaustive
/// and unmentioned keys are hidden.
pub fn derive_state(persisted: Option<&PersistedSet>, key: &str, default: VisibilityState) -> VisibilityState {
	match persisted {
		None => default,
		Some(set) => set.state_of(key).unwrap_or(VisibilityState::Hidden),
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	use super::*;
	use super::VisibilityState::*;

	#[rstest]
	#[case::plain("speed", true)]
	#[case::inner_dash("map_marker-1", true)]
	#[case::empty("", false)]
	#[case::separator("a;b", false)]
	#[case::hide_prefix("-speed", false)]
	#[case::collapsed_prefix("+speed", false)]
	fn test_is_valid_key(#[case] key: &str, #[case] expected: bool) {
		assert_eq!(is_valid_key(key), expected);
	}

	#[test]
	fn test_empty_string_is_uncustomized() {
		assert_eq!(decode(""), None);
	}

	#[test]
	fn test_decode_legacy_string() {
		let set = decode("speed;-compass;+battery;").unwrap();
		assert_eq!(set.tokens().collect::<Vec<_>>(), ["speed", "-compass", "+battery"]);
		assert_eq!(set.state_of("speed"), Some(Visible));
		assert_eq!(set.state_of("compass"), Some(Hidden));
		assert_eq!(set.state_of("battery"), Some(VisibleCollapsed));
		assert_eq!(set.state_of("altitude"), None);
	}

	#[test]
	fn test_decode_skips_empty_fields() {
		let set = decode(";;speed;;").unwrap();
		assert_eq!(set.len(), 1);
		assert!(decode(";").unwrap().is_empty());
	}

	#[test]
	fn test_encode_terminates_every_token() {
		let set: PersistedSet = [("speed", Visible), ("compass", Hidden), ("battery", VisibleCollapsed)]
			.into_iter()
			.collect();
		assert_eq!(encode(&set), "speed;-compass;+battery;");
		assert_eq!(encode(&PersistedSet::new()), "");
	}

	#[test]
	fn test_insert_replaces_previous_token() {
		let mut set = decode("a;-b;").unwrap();
		set.insert("b", VisibleCollapsed);
		set.insert("a", Hidden);
		assert_eq!(encode(&set), "+b;-a;");
		assert_eq!(set.len(), 2);
	}

	#[test]
	fn test_duplicate_legacy_tokens_precedence() {
		let set = decode("+a;-a;a;").unwrap();
		assert_eq!(set.state_of("a"), Some(Visible));
		let set = decode("+a;-a;").unwrap();
		assert_eq!(set.state_of("a"), Some(Hidden));
	}

	#[rstest]
	#[case(None, Visible, Visible)]
	#[case(None, Hidden, Hidden)]
	#[case(None, VisibleCollapsed, VisibleCollapsed)]
	#[case(Some("other;"), Visible, Hidden)]
	#[case(Some("-k;"), Visible, Hidden)]
	#[case(Some("+k;"), Hidden, VisibleCollapsed)]
	#[case(Some("k;"), Hidden, Visible)]
	fn test_derive_state(#[case] raw: Option<&str>, #[case] default: VisibilityState, #[case] expected: VisibilityState) {
		let persisted = raw.and_then(decode);
		assert_eq!(derive_state(persisted.as_ref(), "k", default), expected);
	}

	#[test]
	fn test_round_trip_reproduces_states() {
		let keys = ["next_turn", "speed", "altitude", "battery", "ruler", "gps_info"];
		let all = [Visible, VisibleCollapsed, Hidden];
		// Every assignment of the three states over the first four keys,
		// with the last two left unmentioned.
		for combo in 0..all.len().pow(4) {
			let mut states = Vec::new();
			let mut n = combo;
			for key in &keys[..4] {
				states.push((*key, all[n % 3]));
				n /= 3;
			}
			let set: PersistedSet = states.iter().copied().collect();
			let decoded = decode(&encode(&set)).unwrap();
			assert_eq!(decoded, set);
			for (key, state) in &states {
				assert_eq!(derive_state(Some(&decoded), key, Hidden), *state);
			}
			for key in &keys[4..] {
				assert_eq!(derive_state(Some(&decoded), key, Visible), Hidden);
			}
		}
	}

	#[rstest]
	#[case(true, true, VisibleCollapsed)]
	#[case(true, false, Visible)]
	#[case(false, true, Hidden)]
	#[case(false, false, Hidden)]
	fn test_from_flags(#[case] visible: bool, #[case] collapsed: bool, #[case] expected: VisibilityState) {
		assert_eq!(VisibilityState::from_flags(visible, collapsed), expected);
	}
}
