//! Widget registration records.

use std::sync::Arc;

use crate::controller::{WidgetController, WidgetStateSwitch};

/// Screen edge a widget is stacked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelSide {
	Left,
	Right,
}

impl PanelSide {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Left => "left",
			Self::Right => "right",
		}
	}
}

/// Localizable string resource id. Resolution is up to the UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StringId(pub u32);

/// Icon resource id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconId(pub u32);

/// Title shown for a widget in menus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetTitle {
	/// Literal text (plugin widgets, user-defined widgets).
	Text(String),
	/// A string resource.
	Resource(StringId),
}

impl WidgetTitle {
	/// Resolves the title, delegating resources to `resolve`.
	pub fn resolve(&self, resolve: impl FnOnce(StringId) -> String) -> String {
		match self {
			Self::Text(text) => text.clone(),
			Self::Resource(id) => resolve(*id),
		}
	}
}

impl From<&str> for WidgetTitle {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for WidgetTitle {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<StringId> for WidgetTitle {
	fn from(value: StringId) -> Self {
		Self::Resource(value)
	}
}

/// Category tag used to find a widget of a particular kind without knowing
/// its key (for example the FPS counter a plugin registered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WidgetKind(&'static str);

impl WidgetKind {
	pub const fn new(name: &'static str) -> Self {
		Self(name)
	}

	pub fn as_str(self) -> &'static str {
		self.0
	}
}

/// Callback run after the widget's visibility was changed through the
/// registry.
pub type StateChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Immutable description of a registered widget.
///
/// Visibility is not part of the descriptor; the registry derives it per
/// mode from the persisted configuration.
#[derive(Clone)]
pub struct WidgetDescriptor {
	/// Stable key used in the persisted configuration.
	pub key: String,
	/// Menu title.
	pub title: WidgetTitle,
	/// Menu icon.
	pub icon: Option<IconId>,
	/// Position within the panel (lower first).
	pub priority: i32,
	/// Panel the widget is stacked on.
	pub panel: PanelSide,
	/// Optional category tag.
	pub kind: Option<WidgetKind>,
	/// Live widget; `None` for menu-only entries.
	pub controller: Option<Arc<dyn WidgetController>>,
	/// Alternate display states offered in the widget's popup menu.
	pub state_switch: Option<Arc<dyn WidgetStateSwitch>>,
	/// Invoked after every visibility change made through the registry.
	pub on_state_change: Option<StateChangeCallback>,
}

impl WidgetDescriptor {
	pub fn new(key: impl Into<String>, title: impl Into<WidgetTitle>, panel: PanelSide, priority: i32) -> Self {
		Self {
			key: key.into(),
			title: title.into(),
			icon: None,
			priority,
			panel,
			kind: None,
			controller: None,
			state_switch: None,
			on_state_change: None,
		}
	}

	pub fn with_icon(mut self, icon: IconId) -> Self {
		self.icon = Some(icon);
		self
	}

	pub fn with_kind(mut self, kind: WidgetKind) -> Self {
		self.kind = Some(kind);
		self
	}

	pub fn with_controller(mut self, controller: Arc<dyn WidgetController>) -> Self {
		self.controller = Some(controller);
		self
	}

	pub fn with_state_switch(mut self, switch: Arc<dyn WidgetStateSwitch>) -> Self {
		self.state_switch = Some(switch);
		self
	}

	pub fn on_state_change(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
		self.on_state_change = Some(Arc::new(callback));
		self
	}

	/// Whether the live widget insists on being shown regardless of the
	/// configured visibility.
	pub fn is_explicitly_visible(&self) -> bool {
		self.controller
			.as_ref()
			.is_some_and(|c| c.is_explicitly_visible())
	}
}

impl core::fmt::Debug for WidgetDescriptor {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("WidgetDescriptor")
			.field("key", &self.key)
			.field("panel", &self.panel)
			.field("priority", &self.priority)
			.field("kind", &self.kind)
			.field("has_controller", &self.controller.is_some())
			.finish()
	}
}

/// Identity of one registration. Re-registering the same key yields a new
/// handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetHandle(pub(crate) u64);

impl core::fmt::Display for WidgetHandle {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(f, "widget#{}", self.0)
	}
}

/// A registered descriptor together with its handle.
#[derive(Debug, Clone)]
pub struct WidgetEntry {
	pub handle: WidgetHandle,
	pub descriptor: Arc<WidgetDescriptor>,
}

impl WidgetEntry {
	/// Sort key within a panel: priority, then registration order.
	pub(crate) fn order_key(&self) -> (i32, WidgetHandle) {
		(self.descriptor.priority, self.handle)
	}
}

impl std::ops::Deref for WidgetEntry {
	type Target = WidgetDescriptor;

	fn deref(&self) -> &WidgetDescriptor {
		&self.descriptor
	}
}
