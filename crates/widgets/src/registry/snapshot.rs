use std::sync::Arc;

use mapdeck_prefs::{AppModes, ModeKey, PreferenceStore};
use rustc_hash::FxHashMap as HashMap;

use crate::codec::{self, PersistedSet, VisibilityState};
use crate::descriptor::{PanelSide, WidgetEntry, WidgetHandle};
use crate::settings::MAP_INFO_CONTROLS;

/// Complete registry state. Writers clone, modify and swap a snapshot, so a
/// reader always sees one consistent generation.
#[derive(Clone, Default)]
pub(crate) struct RegistrySnapshot {
	pub modes: Arc<AppModes>,
	/// Sorted by priority, then registration order.
	pub left: Vec<WidgetEntry>,
	/// Sorted by priority, then registration order.
	pub right: Vec<WidgetEntry>,
	/// Decoded persisted set per mode; `None` means "use defaults".
	pub persisted: HashMap<ModeKey, Option<PersistedSet>>,
	/// Derived state per registration per mode.
	pub states: HashMap<WidgetHandle, HashMap<ModeKey, VisibilityState>>,
}

impl RegistrySnapshot {
	pub fn new(modes: AppModes) -> Self {
		Self {
			modes: Arc::new(modes),
			..Self::default()
		}
	}

	pub fn panel(&self, side: PanelSide) -> &[WidgetEntry] {
		match side {
			PanelSide::Left => &self.left,
			PanelSide::Right => &self.right,
		}
	}

	fn panel_mut(&mut self, side: PanelSide) -> &mut Vec<WidgetEntry> {
		match side {
			PanelSide::Left => &mut self.left,
			PanelSide::Right => &mut self.right,
		}
	}

	/// Left panel first, then right, each in panel order.
	pub fn entries(&self) -> impl Iterator<Item = &WidgetEntry> {
		self.left.iter().chain(self.right.iter())
	}

	pub fn find(&self, handle: WidgetHandle) -> Option<&WidgetEntry> {
		self.entries().find(|e| e.handle == handle)
	}

	pub fn first_with_key(&self, key: &str) -> Option<&WidgetEntry> {
		self.entries().find(|e| e.key == key)
	}

	pub fn state(&self, mode: &ModeKey, handle: WidgetHandle) -> Option<VisibilityState> {
		self.states.get(&handle)?.get(mode).copied()
	}

	pub fn insert_entry(&mut self, entry: WidgetEntry) {
		let panel = self.panel_mut(entry.panel);
		let pos = panel.partition_point(|e| e.order_key() < entry.order_key());
		panel.insert(pos, entry);
	}

	/// Removes every entry matching `pred` and forgets its derived state.
	pub fn remove_where(&mut self, pred: impl Fn(&WidgetEntry) -> bool) -> usize {
		let removed: Vec<WidgetHandle> = self
			.entries()
			.filter(|&e| pred(e))
			.map(|e| e.handle)
			.collect();
		self.left.retain(|e| !removed.contains(&e.handle));
		self.right.retain(|e| !removed.contains(&e.handle));
		for handle in &removed {
			self.states.remove(handle);
		}
		removed.len()
	}

	/// Default state of `key` in `mode` when the mode is not customized.
	pub fn default_state(&self, mode: &ModeKey, key: &str) -> VisibilityState {
		if self.modes.is_widget_visible(mode, key) {
			VisibilityState::Visible
		} else if self.modes.is_widget_collapsible(mode, key) {
			VisibilityState::VisibleCollapsed
		} else {
			VisibilityState::Hidden
		}
	}

	pub fn derive(&self, mode: &ModeKey, key: &str) -> VisibilityState {
		let persisted = self.persisted.get(mode).and_then(Option::as_ref);
		codec::derive_state(persisted, key, self.default_state(mode, key))
	}

	/// Recomputes one registration for every mode.
	pub fn recompute(&mut self, handle: WidgetHandle) {
		let Some(key) = self.find(handle).map(|e| e.key.clone()) else {
			return;
		};
		let states: HashMap<ModeKey, VisibilityState> = self
			.modes
			.keys()
			.map(|mode| (mode.clone(), self.derive(mode, &key)))
			.collect();
		self.states.insert(handle, states);
	}

	pub fn recompute_all(&mut self) {
		let handles: Vec<WidgetHandle> = self.entries().map(|e| e.handle).collect();
		self.states.clear();
		for handle in handles {
			self.recompute(handle);
		}
	}

	/// Re-reads every mode's encoded set and re-derives all states.
	pub fn reload(&mut self, store: &dyn PreferenceStore) {
		self.load_persisted(store);
		self.recompute_all();
	}

	/// Re-reads the encoded set of every mode. Only a mode's own value counts:
	/// a derived mode without one follows its inherited widget defaults, not
	/// its parent's customization.
	pub fn load_persisted(&mut self, store: &dyn PreferenceStore) {
		self.persisted = self
			.modes
			.keys()
			.map(|mode| {
				let raw = store.get(MAP_INFO_CONTROLS.id(), mode).unwrap_or_default();
				(mode.clone(), codec::decode(&raw))
			})
			.collect();
	}

	/// Replaces the set of one mode and re-derives that mode only.
	pub fn set_persisted(&mut self, mode: &ModeKey, set: Option<PersistedSet>) {
		self.persisted.insert(mode.clone(), set);
		let derived: Vec<(WidgetHandle, VisibilityState)> = self
			.entries()
			.map(|e| (e.handle, self.derive(mode, &e.key)))
			.collect();
		for (handle, state) in derived {
			self.states.entry(handle).or_default().insert(mode.clone(), state);
		}
	}

	/// Freezes the current derived state of every registration into an
	/// explicit set for `mode`, left panel first.
	pub fn materialize(&self, mode: &ModeKey) -> PersistedSet {
		self.entries()
			.map(|e| {
				let state = self
					.state(mode, e.handle)
					.unwrap_or_else(|| self.derive(mode, &e.key));
				(e.key.as_str(), state)
			})
			.collect()
	}
}
