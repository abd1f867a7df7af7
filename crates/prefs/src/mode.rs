//! Application modes (user profiles).
//!
//! Every mode carries its own default widget configuration or inherits the
//! configuration of its parent. Lookups walk the parent chain from the most
//! specific mode to the root, the same way preference values fall back in
//! [`ModePreference`](crate::ModePreference).

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet as HashSet;

use crate::error::{PrefsError, Result};

/// Stable identifier of an application mode.
///
/// Cheap to clone; used as the per-mode key in preference stores.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModeKey(Arc<str>);

impl ModeKey {
	pub fn new(key: impl AsRef<str>) -> Self {
		Self(Arc::from(key.as_ref()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Debug for ModeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "ModeKey({:?})", &*self.0)
	}
}

impl fmt::Display for ModeKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for ModeKey {
	fn from(value: &str) -> Self {
		Self::new(value)
	}
}

impl From<String> for ModeKey {
	fn from(value: String) -> Self {
		Self(Arc::from(value))
	}
}

impl Borrow<str> for ModeKey {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl AsRef<str> for ModeKey {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

/// Default widget configuration of a mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetDefaults {
	/// Widgets shown by default.
	pub visible: HashSet<String>,
	/// Widgets shown only while their panel is expanded.
	pub collapsible: HashSet<String>,
	/// Widgets offered in this mode; `None` offers every widget.
	pub available: Option<HashSet<String>>,
}

impl WidgetDefaults {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn visible<I, S>(mut self, keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.visible.extend(keys.into_iter().map(Into::into));
		self
	}

	pub fn collapsible<I, S>(mut self, keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.collapsible.extend(keys.into_iter().map(Into::into));
		self
	}

	/// Restricts the widgets offered in this mode.
	pub fn available<I, S>(mut self, keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.available
			.get_or_insert_with(HashSet::default)
			.extend(keys.into_iter().map(Into::into));
		self
	}
}

/// A user-selectable profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppMode {
	/// Unique key, also used in the preferences file.
	pub key: ModeKey,
	/// Human-readable name.
	pub name: String,
	/// Mode this one derives from.
	pub parent: Option<ModeKey>,
	/// Own widget defaults; `None` inherits from the parent.
	pub widgets: Option<WidgetDefaults>,
}

impl AppMode {
	pub fn new(key: impl Into<ModeKey>, name: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			name: name.into(),
			parent: None,
			widgets: None,
		}
	}

	pub fn with_parent(mut self, parent: impl Into<ModeKey>) -> Self {
		self.parent = Some(parent.into());
		self
	}

	pub fn with_widgets(mut self, widgets: WidgetDefaults) -> Self {
		self.widgets = Some(widgets);
		self
	}
}

/// Ordered catalog of every known mode.
///
/// Enumeration order is insertion order. The catalog is validated on
/// construction: parents exist and the parent graph has no cycles.
#[derive(Debug, Clone, Default)]
pub struct AppModes {
	modes: IndexMap<ModeKey, AppMode>,
}

impl AppModes {
	/// Builds a validated catalog.
	pub fn try_from_modes(modes: impl IntoIterator<Item = AppMode>) -> Result<Self> {
		let mut catalog = Self::default();
		catalog.extend(modes)?;
		Ok(catalog)
	}

	/// Adds modes to the catalog and re-validates it.
	///
	/// On error the catalog is left unchanged.
	pub fn extend(&mut self, modes: impl IntoIterator<Item = AppMode>) -> Result<()> {
		let mut next = self.modes.clone();
		for mode in modes {
			if next.contains_key(&mode.key) {
				return Err(PrefsError::DuplicateMode(mode.key.to_string()));
			}
			next.insert(mode.key.clone(), mode);
		}
		validate(&next)?;
		self.modes = next;
		Ok(())
	}

	pub fn values(&self) -> impl Iterator<Item = &AppMode> {
		self.modes.values()
	}

	pub fn keys(&self) -> impl Iterator<Item = &ModeKey> {
		self.modes.keys()
	}

	pub fn get(&self, key: &str) -> Option<&AppMode> {
		self.modes.get(key)
	}

	pub fn contains(&self, key: &ModeKey) -> bool {
		self.modes.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.modes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.modes.is_empty()
	}

	/// Returns the parent of `mode`, if any.
	pub fn parent(&self, mode: &ModeKey) -> Option<&AppMode> {
		let parent = self.modes.get(mode)?.parent.as_ref()?;
		self.modes.get(parent)
	}

	/// Iterates `mode` and then its ancestors up to the root.
	pub fn ancestors<'a>(&'a self, mode: &ModeKey) -> impl Iterator<Item = &'a AppMode> + 'a {
		let first = self.modes.get(mode);
		// Bounded by catalog size; validation already rejects cycles.
		std::iter::successors(first, move |m| {
			m.parent.as_ref().and_then(|p| self.modes.get(p))
		})
		.take(self.modes.len())
	}

	/// Widget defaults in effect for `mode`, inherited from the nearest
	/// ancestor that declares them.
	pub fn widget_defaults(&self, mode: &ModeKey) -> Option<&WidgetDefaults> {
		self.ancestors(mode).find_map(|m| m.widgets.as_ref())
	}

	pub fn is_widget_visible(&self, mode: &ModeKey, key: &str) -> bool {
		self.widget_defaults(mode)
			.is_some_and(|d| d.visible.contains(key))
	}

	pub fn is_widget_collapsible(&self, mode: &ModeKey, key: &str) -> bool {
		self.widget_defaults(mode)
			.is_some_and(|d| d.collapsible.contains(key))
	}

	/// Whether the widget should be offered at all in `mode`.
	pub fn is_widget_available(&self, mode: &ModeKey, key: &str) -> bool {
		match self.widget_defaults(mode).and_then(|d| d.available.as_ref()) {
			Some(available) => available.contains(key),
			None => true,
		}
	}
}

fn validate(modes: &IndexMap<ModeKey, AppMode>) -> Result<()> {
	for mode in modes.values() {
		if let Some(parent) = &mode.parent
			&& !modes.contains_key(parent)
		{
			return Err(PrefsError::UnknownParent {
				mode: mode.key.to_string(),
				parent: parent.to_string(),
			});
		}
	}

	for mode in modes.values() {
		let mut current = mode.parent.as_ref();
		let mut steps = 0;
		while let Some(key) = current {
			if key == &mode.key || steps > modes.len() {
				return Err(PrefsError::ParentCycle(mode.key.to_string()));
			}
			current = modes.get(key).and_then(|m| m.parent.as_ref());
			steps += 1;
		}
	}
	Ok(())
}
