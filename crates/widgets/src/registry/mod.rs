//! Widget registry.
//!
//! Owns the left and right panel widget sets and derives, for every
//! `(mode, widget)` pair, whether the widget is visible, visible only while
//! the panel is expanded, or hidden.
//!
//! # Derivation
//!
//! For each mode the registry keeps the decoded [`PersistedSet`] read from
//! the `map_info_controls` preference:
//!
//! 1. No set (empty string): the mode's widget defaults apply.
//! 2. A set: its token for the key decides. Keys the set does not mention
//!    are hidden; an explicit set replaces the defaults wholesale.
//!
//! # Consistency
//!
//! All state lives in one immutable snapshot. Writers are serialized by a
//! re-entrant lock, build the next snapshot from a clone and swap it in
//! atomically, so readers never see a partially recomputed registry. The
//! lock is re-entrant because persisting a change notifies store listeners
//! synchronously, and the registry's own listener refreshes from the store.

mod panel;
mod snapshot;


use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use mapdeck_prefs::{AppModes, ListenerId, ModeKey, PrefChange, PreferenceStore};
use parking_lot::ReentrantMutex;
use tracing::{debug, trace, warn};

pub use panel::PanelSlot;
use snapshot::RegistrySnapshot;

use crate::codec::{self, PersistedSet, VisibilityState};
use crate::controller::WidgetController;
use crate::descriptor::{PanelSide, StringId, WidgetDescriptor, WidgetEntry, WidgetHandle, WidgetKind};
use crate::error::{Result, WidgetError};
use crate::settings::{
	DISPLAYED_MARKERS_WIDGETS_COUNT, MAP_INFO_CONTROLS, MAP_MARKERS_MODE, MARKERS_DISTANCE_INDICATION_ENABLED,
	SHOW_STREET_NAME, TRANSPARENT_MAP_THEME,
};

/// Key of the first map-marker distance widget.
pub const WIDGET_MARKER_1: &str = "map_marker_1st";
/// Key of the second map-marker distance widget.
pub const WIDGET_MARKER_2: &str = "map_marker_2nd";

/// Registry of map widgets with per-mode visibility.
pub struct WidgetRegistry {
	store: Arc<dyn PreferenceStore>,
	snap: ArcSwap<RegistrySnapshot>,
	writer: ReentrantMutex<()>,
	next_handle: AtomicU64,
}

impl WidgetRegistry {
	/// Creates an empty registry and loads the persisted configuration of
	/// every mode in `modes`.
	pub fn new(store: Arc<dyn PreferenceStore>, modes: AppModes) -> Self {
		let mut snap = RegistrySnapshot::new(modes);
		snap.load_persisted(store.as_ref());
		Self {
			store,
			snap: ArcSwap::from_pointee(snap),
			writer: ReentrantMutex::new(()),
			next_handle: AtomicU64::new(0),
		}
	}

	/// Subscribes the registry to its store: any change to the encoded
	/// widget configuration triggers [`refresh_from_persistence`].
	///
	/// The subscription ends when the returned guard is dropped.
	///
	/// [`refresh_from_persistence`]: Self::refresh_from_persistence
	pub fn attach(self: &Arc<Self>) -> Subscription {
		let weak = Arc::downgrade(self);
		let id = self.store.subscribe(Arc::new(move |change: &PrefChange| {
			if change.pref != MAP_INFO_CONTROLS.id() {
				return;
			}
			if let Some(registry) = weak.upgrade() {
				trace!(domain = "widgets", mode = %change.mode, "widget settings changed");
				registry.refresh_from_persistence();
			}
		}));
		Subscription {
			store: self.store.clone(),
			id,
		}
	}

	pub fn store(&self) -> &Arc<dyn PreferenceStore> {
		&self.store
	}

	pub fn modes(&self) -> Arc<AppModes> {
		self.snap.load().modes.clone()
	}

	/// Registers a widget and computes its visibility for every mode.
	///
	/// Keys are not deduplicated: registering a key twice yields two entries.
	/// Keys that cannot be encoded (empty, containing `;`, or starting with
	/// `-` or `+`) are rejected with [`WidgetError::InvalidKey`].
	pub fn register(&self, descriptor: WidgetDescriptor) -> Result<WidgetHandle> {
		if !codec::is_valid_key(&descriptor.key) {
			warn!(domain = "widgets", key = %descriptor.key, "rejected unencodable widget key");
			return Err(WidgetError::InvalidKey(descriptor.key));
		}
		let handle = WidgetHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
		let key = descriptor.key.clone();
		let panel = descriptor.panel;
		self.write(|snap| {
			snap.insert_entry(WidgetEntry {
				handle,
				descriptor: Arc::new(descriptor),
			});
			snap.recompute(handle);
		});
		debug!(domain = "widgets", key = %key, panel = panel.as_str(), %handle, "registered widget");
		Ok(handle)
	}

	/// Removes a registration. Returns `false` if it was not registered.
	pub fn unregister(&self, handle: WidgetHandle) -> bool {
		self.write(|snap| snap.remove_where(|e| e.handle == handle) > 0)
	}

	/// Removes every registration bound to `controller`.
	pub fn remove_by_controller(&self, controller: &Arc<dyn WidgetController>) -> usize {
		let target = Arc::as_ptr(controller) as *const ();
		self.write(|snap| {
			snap.remove_where(|e| {
				e.controller
					.as_ref()
					.is_some_and(|c| Arc::as_ptr(c) as *const () == target)
			})
		})
	}

	/// Removes every registration (owning layer torn down).
	pub fn clear(&self) {
		self.write(|snap| {
			snap.left.clear();
			snap.right.clear();
			snap.states.clear();
		});
	}

	/// Replaces the mode catalog and re-derives everything.
	pub fn replace_modes(&self, modes: AppModes) {
		self.write(|snap| {
			snap.modes = Arc::new(modes);
			snap.reload(self.store.as_ref());
		});
	}

	/// Re-reads every mode's configuration from the store and re-derives all
	/// states. Idempotent.
	pub fn refresh_from_persistence(&self) {
		self.write(|snap| snap.reload(self.store.as_ref()));
		trace!(domain = "widgets", "refreshed widget visibility from preferences");
	}

	/// `true` if the first widget registered under `key` is visible in
	/// `mode`. Unknown keys are not visible.
	pub fn is_visible(&self, mode: &ModeKey, key: &str) -> bool {
		self.key_state(mode, key) == VisibilityState::Visible
	}

	/// `true` if the first widget registered under `key` is collapsed in
	/// `mode`.
	pub fn is_visible_collapsed(&self, mode: &ModeKey, key: &str) -> bool {
		self.key_state(mode, key) == VisibilityState::VisibleCollapsed
	}

	/// State of the first widget registered under `key`; hidden if none.
	pub fn key_state(&self, mode: &ModeKey, key: &str) -> VisibilityState {
		let snap = self.snap.load();
		snap.first_with_key(key)
			.and_then(|e| snap.state(mode, e.handle))
			.unwrap_or(VisibilityState::Hidden)
	}

	/// State of one registration, `None` if the handle or mode is unknown.
	pub fn state(&self, mode: &ModeKey, handle: WidgetHandle) -> Option<VisibilityState> {
		self.snap.load().state(mode, handle)
	}

	pub fn get(&self, handle: WidgetHandle) -> Option<WidgetEntry> {
		self.snap.load().find(handle).cloned()
	}

	pub fn find_by_key(&self, key: &str) -> Option<WidgetEntry> {
		self.snap.load().first_with_key(key).cloned()
	}

	/// First registration tagged with `kind`, left panel first.
	pub fn find_by_kind(&self, kind: WidgetKind) -> Option<WidgetEntry> {
		self.snap
			.load()
			.entries()
			.find(|e| e.kind == Some(kind))
			.cloned()
	}

	/// Registrations of one panel in display order.
	pub fn widgets(&self, side: PanelSide) -> Vec<WidgetEntry> {
		self.snap.load().panel(side).to_vec()
	}

	pub fn len(&self) -> usize {
		let snap = self.snap.load();
		snap.left.len() + snap.right.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Whether `mode` has its own explicit configuration. A parent's
	/// configuration is never inherited.
	pub fn is_customized(&self, mode: &ModeKey) -> bool {
		matches!(self.snap.load().persisted.get(mode), Some(Some(_)))
	}

	/// The decoded configuration of `mode`, `None` when it uses defaults.
	pub fn persisted(&self, mode: &ModeKey) -> Option<PersistedSet> {
		self.snap.load().persisted.get(mode).cloned().flatten()
	}

	/// Menu label: `" + "` before collapsed widgets, two spaces otherwise.
	pub fn menu_text(&self, mode: &ModeKey, handle: WidgetHandle, resolve: impl FnOnce(StringId) -> String) -> Option<String> {
		let snap = self.snap.load();
		let entry = snap.find(handle)?;
		let prefix = match snap.state(mode, handle) {
			Some(VisibilityState::VisibleCollapsed) => " + ",
			_ => "  ",
		};
		Some(format!("{prefix}{}", entry.title.resolve(resolve)))
	}

	/// Sets the visibility of one registration in `mode`.
	///
	/// The first customization of a mode freezes the current state of every
	/// registered widget into an explicit set. The token for the widget's key
	/// is then replaced (`key`, `-key` or `+key`), the set is persisted and
	/// the descriptor's change callback runs.
	///
	/// If the store rejects the write, nothing changes.
	pub fn set_visibility(&self, mode: &ModeKey, handle: WidgetHandle, visible: bool, collapsed: bool) -> Result<()> {
		let state = VisibilityState::from_flags(visible, collapsed);
		let entry = self.try_write(|snap| {
			if !snap.modes.contains(mode) {
				return Err(WidgetError::UnknownMode(mode.to_string()));
			}
			let entry = snap
				.find(handle)
				.cloned()
				.ok_or_else(|| WidgetError::UnknownWidget(handle.to_string()))?;

			let mut set = match snap.persisted.get(mode) {
				Some(Some(set)) => set.clone(),
				_ => snap.materialize(mode),
			};
			set.insert(&entry.key, state);
			MAP_INFO_CONTROLS.set(self.store.as_ref(), mode, &codec::encode(&set))?;
			snap.set_persisted(mode, Some(set));
			Ok(entry)
		})?;

		debug!(domain = "widgets", mode = %mode, key = %entry.key, ?state, "widget visibility changed");
		if let Some(callback) = &entry.on_state_change {
			callback();
		}
		Ok(())
	}

	/// [`set_visibility`](Self::set_visibility) for the first registration
	/// under `key`.
	pub fn set_visibility_by_key(&self, mode: &ModeKey, key: &str, visible: bool, collapsed: bool) -> Result<()> {
		let handle = self
			.find_by_key(key)
			.map(|e| e.handle)
			.ok_or_else(|| WidgetError::UnknownWidget(key.to_string()))?;
		self.set_visibility(mode, handle, visible, collapsed)
	}

	/// Drops the customization of `mode`: every widget returns to the mode
	/// defaults, the empty sentinel is persisted and the mode's appearance
	/// preferences are reset.
	pub fn reset_to_default(&self, mode: &ModeKey) -> Result<()> {
		self.try_write(|snap| {
			if !snap.modes.contains(mode) {
				return Err(WidgetError::UnknownMode(mode.to_string()));
			}
			MAP_INFO_CONTROLS.set(self.store.as_ref(), mode, &String::new())?;
			snap.set_persisted(mode, None);
			Ok(())
		})?;

		let store = self.store.as_ref();
		TRANSPARENT_MAP_THEME.reset_mode_to_default(store, mode)?;
		SHOW_STREET_NAME.reset_mode_to_default(store, mode)?;
		MAP_MARKERS_MODE.reset_mode_to_default(store, mode)?;
		debug!(domain = "widgets", mode = %mode, "widget configuration reset to defaults");
		Ok(())
	}

	/// Aligns the map-marker widgets with the markers preferences of `mode`.
	///
	/// The first marker widget is shown when markers are displayed as widgets
	/// with distance indication on; the second additionally needs a
	/// displayed-markers count of two. Widgets already in the wanted state
	/// are left alone so an uncustomized mode stays uncustomized.
	pub fn sync_map_marker_widgets(&self, mode: &ModeKey) -> Result<()> {
		let store = self.store.as_ref();
		let modes = self.modes();
		let as_widgets = MAP_MARKERS_MODE.get(store, &modes, mode).is_widgets()
			&& MARKERS_DISTANCE_INDICATION_ENABLED.get(store, &modes, mode);
		let two = DISPLAYED_MARKERS_WIDGETS_COUNT.get(store, &modes, mode) == 2;

		for entry in self.widgets(PanelSide::Right) {
			let wanted = match entry.key.as_str() {
				WIDGET_MARKER_1 => as_widgets,
				WIDGET_MARKER_2 => as_widgets && two,
				_ => continue,
			};
			let wanted_state = VisibilityState::from_flags(wanted, false);
			if self.state(mode, entry.handle) != Some(wanted_state) {
				self.set_visibility(mode, entry.handle, wanted, false)?;
			}
		}
		Ok(())
	}

	fn write<R>(&self, f: impl FnOnce(&mut RegistrySnapshot) -> R) -> R {
		let _guard = self.writer.lock();
		let mut next = RegistrySnapshot::clone(&self.snap.load());
		let out = f(&mut next);
		self.snap.store(Arc::new(next));
		out
	}

	fn try_write<R>(&self, f: impl FnOnce(&mut RegistrySnapshot) -> Result<R>) -> Result<R> {
		let _guard = self.writer.lock();
		let mut next = RegistrySnapshot::clone(&self.snap.load());
		let out = f(&mut next)?;
		self.snap.store(Arc::new(next));
		Ok(out)
	}
}

impl core::fmt::Debug for WidgetRegistry {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		let snap = self.snap.load();
		f.debug_struct("WidgetRegistry")
			.field("modes", &snap.modes.len())
			.field("left", &snap.left.len())
			.field("right", &snap.right.len())
			.finish()
	}
}

/// Keeps a registry subscribed to its store; unsubscribes on drop.
#[must_use = "dropping the subscription detaches the registry"]
pub struct Subscription {
	store: Arc<dyn PreferenceStore>,
	id: ListenerId,
}

impl Drop for Subscription {
	fn drop(&mut self) {
		self.store.unsubscribe(self.id);
	}
}
