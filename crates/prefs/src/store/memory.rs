use parking_lot::RwLock;
use rustc_hash::FxHashMap as HashMap;

use super::{ChangeListener, ListenerId, ListenerSet, PrefChange, PreferenceStore};
use crate::error::Result;
use crate::mode::ModeKey;

/// Volatile store, mostly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
	values: RwLock<HashMap<(String, ModeKey), String>>,
	listeners: ListenerSet,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of stored entries across all modes.
	pub fn len(&self) -> usize {
		self.values.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.read().is_empty()
	}
}

impl PreferenceStore for MemoryStore {
	fn get(&self, pref: &str, mode: &ModeKey) -> Option<String> {
		self.values
			.read()
			.get(&(pref.to_string(), mode.clone()))
			.cloned()
	}

	fn set(&self, pref: &str, mode: &ModeKey, value: &str) -> Result<()> {
		let previous = self
			.values
			.write()
			.insert((pref.to_string(), mode.clone()), value.to_string());
		if previous.as_deref() != Some(value) {
			self.listeners.notify(&PrefChange {
				pref: pref.to_string(),
				mode: mode.clone(),
			});
		}
		Ok(())
	}

	fn remove(&self, pref: &str, mode: &ModeKey) -> Result<()> {
		let previous = self
			.values
			.write()
			.remove(&(pref.to_string(), mode.clone()));
		if previous.is_some() {
			self.listeners.notify(&PrefChange {
				pref: pref.to_string(),
				mode: mode.clone(),
			});
		}
		Ok(())
	}

	fn subscribe(&self, listener: ChangeListener) -> ListenerId {
		self.listeners.add(listener)
	}

	fn unsubscribe(&self, id: ListenerId) {
		self.listeners.remove(id);
	}
}
