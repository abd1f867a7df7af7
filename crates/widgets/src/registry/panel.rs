use std::sync::Arc;

use mapdeck_prefs::ModeKey;

use super::WidgetRegistry;
use crate::codec::VisibilityState;
use crate::controller::{DrawSettings, WidgetController};
use crate::descriptor::{PanelSide, WidgetHandle};

/// A widget placed on a panel by [`WidgetRegistry::populate`].
#[derive(Clone)]
pub struct PanelSlot {
	pub handle: WidgetHandle,
	pub key: String,
	pub controller: Arc<dyn WidgetController>,
	/// Placed only because the panel is expanded.
	pub collapsed: bool,
}

impl core::fmt::Debug for PanelSlot {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("PanelSlot")
			.field("handle", &self.handle)
			.field("key", &self.key)
			.field("collapsed", &self.collapsed)
			.finish()
	}
}

impl WidgetRegistry {
	/// Widgets to place on `side` for `mode`, in display order.
	///
	/// Visible and force-visible widgets come first. Collapsed widgets follow
	/// only while the panel is `expanded`. Entries without a controller are
	/// skipped.
	pub fn populate(&self, mode: &ModeKey, side: PanelSide, expanded: bool) -> Vec<PanelSlot> {
		let snap = self.snap.load();
		let mut primary = Vec::new();
		let mut collapsed = Vec::new();

		for entry in snap.panel(side) {
			let Some(controller) = &entry.controller else {
				continue;
			};
			let forced = controller.is_explicitly_visible();
			let state = snap.state(mode, entry.handle).unwrap_or(VisibilityState::Hidden);
			let slot = |collapsed| PanelSlot {
				handle: entry.handle,
				key: entry.key.clone(),
				controller: controller.clone(),
				collapsed,
			};
			if forced || state == VisibilityState::Visible {
				primary.push(slot(false));
			} else if expanded && state == VisibilityState::VisibleCollapsed {
				collapsed.push(slot(true));
			}
		}

		primary.extend(collapsed);
		primary
	}

	/// Whether any widget on either panel is collapsed in `mode`, i.e.
	/// whether the panel needs an expand button.
	pub fn has_collapsibles(&self, mode: &ModeKey) -> bool {
		let snap = self.snap.load();
		snap.entries()
			.any(|e| snap.state(mode, e.handle) == Some(VisibilityState::VisibleCollapsed))
	}

	/// Refreshes every shown widget of `mode`. Returns how many reported a
	/// change.
	pub fn update_info(&self, mode: &ModeKey, draw: &DrawSettings, expanded: bool) -> usize {
		let snap = self.snap.load();
		snap.entries()
			.filter(|e| match snap.state(mode, e.handle) {
				Some(VisibilityState::Visible) => true,
				Some(VisibilityState::VisibleCollapsed) => expanded,
				_ => false,
			})
			.filter_map(|e| e.controller.as_ref())
			.filter(|c| c.update_info(draw))
			.count()
	}
}
