//! Typed, mode-scoped preference handles.

use tracing::warn;

use crate::error::Result;
use crate::mode::{AppModes, ModeKey};
use crate::store::PreferenceStore;

/// Conversion between a typed value and its stored string form.
pub trait PrefValue: Sized + Clone {
	fn decode(raw: &str) -> Option<Self>;
	fn encode(&self) -> String;
}

impl PrefValue for String {
	fn decode(raw: &str) -> Option<Self> {
		Some(raw.to_string())
	}

	fn encode(&self) -> String {
		self.clone()
	}
}

impl PrefValue for bool {
	fn decode(raw: &str) -> Option<Self> {
		raw.parse().ok()
	}

	fn encode(&self) -> String {
		self.to_string()
	}
}

impl PrefValue for i32 {
	fn decode(raw: &str) -> Option<Self> {
		raw.trim().parse().ok()
	}

	fn encode(&self) -> String {
		self.to_string()
	}
}

/// A preference whose value may differ per application mode.
///
/// Reads resolve through the mode hierarchy:
///
/// 1. the value stored for the mode itself
/// 2. the value stored for the nearest ancestor that has one
/// 3. the compile-time default
#[derive(Debug, Clone, Copy)]
pub struct ModePreference<T: 'static> {
	id: &'static str,
	default: fn() -> T,
}

impl<T: PrefValue> ModePreference<T> {
	pub const fn new(id: &'static str, default: fn() -> T) -> Self {
		Self { id, default }
	}

	pub fn id(&self) -> &'static str {
		self.id
	}

	pub fn default_value(&self) -> T {
		(self.default)()
	}

	/// Resolves the value for `mode` through the hierarchy.
	pub fn get(&self, store: &dyn PreferenceStore, modes: &AppModes, mode: &ModeKey) -> T {
		if let Some(v) = self.stored(store, mode) {
			return v;
		}
		for ancestor in modes.ancestors(mode).skip(1) {
			if let Some(v) = self.stored(store, &ancestor.key) {
				return v;
			}
		}
		self.default_value()
	}

	/// Whether `mode` has its own stored value (ignoring ancestors).
	pub fn is_set_for_mode(&self, store: &dyn PreferenceStore, mode: &ModeKey) -> bool {
		store.get(self.id, mode).is_some()
	}

	pub fn set(&self, store: &dyn PreferenceStore, mode: &ModeKey, value: &T) -> Result<()> {
		store.set(self.id, mode, &value.encode())
	}

	/// Drops the mode's own value so reads fall back to the hierarchy again.
	pub fn reset_mode_to_default(&self, store: &dyn PreferenceStore, mode: &ModeKey) -> Result<()> {
		store.remove(self.id, mode)
	}

	fn stored(&self, store: &dyn PreferenceStore, mode: &ModeKey) -> Option<T> {
		let raw = store.get(self.id, mode)?;
		let decoded = T::decode(&raw);
		if decoded.is_none() {
			warn!(
				domain = "prefs",
				pref = self.id,
				mode = %mode,
				raw = %raw,
				"undecodable preference value; falling back",
			);
		}
		decoded
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mode::AppMode;
	use crate::store::MemoryStore;

	const SHOW_LANES: ModePreference<bool> = ModePreference::new("show_lanes", || false);
	const COUNT: ModePreference<i32> = ModePreference::new("count", || 2);

	fn modes() -> AppModes {
		AppModes::try_from_modes([
			AppMode::new("default", "Browse map"),
			AppMode::new("car", "Driving").with_parent("default"),
			AppMode::new("truck", "Truck").with_parent("car"),
		])
		.unwrap()
	}

	#[test]
	fn test_default_when_unset() {
		let store = MemoryStore::new();
		assert!(!SHOW_LANES.get(&store, &modes(), &ModeKey::new("truck")));
		assert_eq!(COUNT.get(&store, &modes(), &ModeKey::new("car")), 2);
	}

	#[test]
	fn test_inherits_nearest_ancestor() {
		let store = MemoryStore::new();
		let modes = modes();
		SHOW_LANES.set(&store, &ModeKey::new("default"), &true).unwrap();
		COUNT.set(&store, &ModeKey::new("car"), &1).unwrap();

		assert!(SHOW_LANES.get(&store, &modes, &ModeKey::new("truck")));
		assert_eq!(COUNT.get(&store, &modes, &ModeKey::new("truck")), 1);
		assert_eq!(COUNT.get(&store, &modes, &ModeKey::new("default")), 2);
		assert!(!COUNT.is_set_for_mode(&store, &ModeKey::new("truck")));
	}

	#[test]
	fn test_reset_falls_back_again() {
		let store = MemoryStore::new();
		let modes = modes();
		let truck = ModeKey::new("truck");
		SHOW_LANES.set(&store, &ModeKey::new("car"), &true).unwrap();
		SHOW_LANES.set(&store, &truck, &false).unwrap();
		assert!(!SHOW_LANES.get(&store, &modes, &truck));

		SHOW_LANES.reset_mode_to_default(&store, &truck).unwrap();
		assert!(SHOW_LANES.get(&store, &modes, &truck));
	}

	#[test]
	fn test_undecodable_value_falls_through() {
		let store = MemoryStore::new();
		let modes = modes();
		store.set("count", &ModeKey::new("car"), "many").unwrap();
		store.set("count", &ModeKey::new("default"), "5").unwrap();
		assert_eq!(COUNT.get(&store, &modes, &ModeKey::new("car")), 5);
	}
}
