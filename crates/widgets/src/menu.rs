//! Configure-screen menu model.
//!
//! Produces the rows of the "configure screen" menu as plain data: section
//! headers, one row per widget available in the mode, and the appearance
//! toggles. Rendering is left to the UI layer; actions on rows are applied
//! back through [`apply_row_action`], [`toggle_appearance`] and
//! [`set_markers_mode`].

use mapdeck_prefs::{ModeKey, ModePreference, PreferenceStore};
use tracing::debug;

use crate::builtins::DEFAULT_MODE;
use crate::codec::VisibilityState;
use crate::controller::WidgetStateSwitch;
use crate::descriptor::{IconId, PanelSide, WidgetEntry, WidgetHandle, WidgetTitle};
use crate::error::{Result, WidgetError};
use crate::registry::WidgetRegistry;
use crate::settings::{
	MAP_MARKERS_MODE, MarkersMode, QUICK_ACTION_FAB, SHOW_COORDINATES_WIDGET, SHOW_DISTANCE_RULER,
	SHOW_ELEVATION_PROFILE_WIDGET, SHOW_LANES, SHOW_STREET_NAME, TRANSPARENT_MAP_THEME, appearance_toggle,
};

/// Description shown under collapsed widget rows.
pub const COLLAPSED_DESCRIPTION: &str = "Collapsed";

/// Feature switches that change which rows are offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuOptions {
	/// The elevation profile widget is a paid feature.
	pub pro_available: bool,
}

/// Menu section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSection {
	QuickAction,
	RightPanel,
	LeftPanel,
	Appearance,
}

impl MenuSection {
	pub fn label(self) -> &'static str {
		match self {
			Self::QuickAction => "Quick action",
			Self::RightPanel => "Right panel",
			Self::LeftPanel => "Left panel",
			Self::Appearance => "Appearance",
		}
	}
}

/// One row of the configure menu.
#[derive(Debug, Clone, PartialEq)]
pub enum MenuRow {
	Header(MenuSection),
	Widget(WidgetRow),
	Toggle(ToggleRow),
	/// Chooser for where marker distances are shown.
	MarkersMode(MarkersMode),
}

/// A registered widget.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetRow {
	pub handle: WidgetHandle,
	pub key: String,
	pub title: WidgetTitle,
	pub icon: Option<IconId>,
	/// Visible or collapsed.
	pub selected: bool,
	pub description: Option<&'static str>,
	/// Offers the show/hide/collapse popup.
	pub has_popup: bool,
}

/// A boolean mode preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleRow {
	/// Preference id, passed back to [`toggle_appearance`].
	pub pref: &'static str,
	pub label: &'static str,
	pub checked: bool,
}

/// Builds the configure menu of `mode`.
pub fn build_configure_menu(
	registry: &WidgetRegistry,
	store: &dyn PreferenceStore,
	mode: &ModeKey,
	options: &MenuOptions,
) -> Vec<MenuRow> {
	let modes = registry.modes();
	let toggle = |pref: ModePreference<bool>, label| {
		MenuRow::Toggle(ToggleRow {
			pref: pref.id(),
			label,
			checked: pref.get(store, &modes, mode),
		})
	};

	let mut rows = vec![
		MenuRow::Header(MenuSection::QuickAction),
		toggle(QUICK_ACTION_FAB, "Show quick action button"),
	];

	for (section, side) in [
		(MenuSection::RightPanel, PanelSide::Right),
		(MenuSection::LeftPanel, PanelSide::Left),
	] {
		rows.push(MenuRow::Header(section));
		rows.extend(
			registry
				.widgets(side)
				.into_iter()
				.filter(|e| modes.is_widget_available(mode, &e.key))
				.map(|e| MenuRow::Widget(widget_row(registry, mode, &e))),
		);
	}

	rows.push(MenuRow::Header(MenuSection::Appearance));
	if mode.as_str() != DEFAULT_MODE {
		rows.push(toggle(SHOW_STREET_NAME, "Street name"));
	}
	rows.push(toggle(SHOW_COORDINATES_WIDGET, "Coordinates widget"));
	rows.push(toggle(SHOW_DISTANCE_RULER, "Distance ruler"));
	if options.pro_available {
		rows.push(toggle(SHOW_ELEVATION_PROFILE_WIDGET, "Elevation profile"));
	}
	rows.push(MenuRow::MarkersMode(MAP_MARKERS_MODE.get(store, &modes, mode)));
	rows.push(toggle(TRANSPARENT_MAP_THEME, "Transparent theme"));
	rows.push(toggle(SHOW_LANES, "Lanes"));
	rows
}

fn widget_row(registry: &WidgetRegistry, mode: &ModeKey, entry: &WidgetEntry) -> WidgetRow {
	let state = registry
		.state(mode, entry.handle)
		.unwrap_or(VisibilityState::Hidden);
	WidgetRow {
		handle: entry.handle,
		key: entry.key.clone(),
		title: entry.title.clone(),
		icon: entry.icon,
		selected: state.is_shown(),
		description: state.is_collapsed().then_some(COLLAPSED_DESCRIPTION),
		has_popup: entry.controller.is_some(),
	}
}

/// Entry of a widget row's popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopupItem {
	/// Alternate display state of the widget.
	State {
		id: u32,
		title: WidgetTitle,
		icon: IconId,
		checked: bool,
	},
	Show { checked: bool },
	Hide { checked: bool },
	Collapse { checked: bool },
}

/// Popup entries for a widget row; empty for unknown handles.
///
/// Display-state choices come first when the widget has them. Collapsing is
/// offered only for live widgets.
pub fn popup_items(registry: &WidgetRegistry, mode: &ModeKey, handle: WidgetHandle) -> Vec<PopupItem> {
	let Some(entry) = registry.get(handle) else {
		return Vec::new();
	};
	let state = registry
		.state(mode, handle)
		.unwrap_or(VisibilityState::Hidden);

	let mut items = Vec::new();
	if let Some(switch) = &entry.state_switch {
		items.extend(state_items(switch.as_ref()));
	}
	items.push(PopupItem::Show {
		checked: state == VisibilityState::Visible,
	});
	items.push(PopupItem::Hide {
		checked: state == VisibilityState::Hidden,
	});
	if entry.controller.is_some() {
		items.push(PopupItem::Collapse {
			checked: state == VisibilityState::VisibleCollapsed,
		});
	}
	items
}

fn state_items(switch: &dyn WidgetStateSwitch) -> impl Iterator<Item = PopupItem> {
	let current = switch.current();
	switch.menu_items().into_iter().map(move |item| PopupItem::State {
		id: item.id,
		title: item.title,
		icon: item.icon,
		checked: item.id == current,
	})
}

/// User action on a widget row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
	Show,
	Hide,
	Collapse,
	/// Row checkbox: hides a shown widget, shows a hidden one.
	Toggle,
	/// Picks an alternate display state.
	SelectState(u32),
}

/// Applies `action` to the widget behind `handle` in `mode`.
pub fn apply_row_action(registry: &WidgetRegistry, mode: &ModeKey, handle: WidgetHandle, action: RowAction) -> Result<()> {
	match action {
		RowAction::Show => registry.set_visibility(mode, handle, true, false),
		RowAction::Hide => registry.set_visibility(mode, handle, false, false),
		RowAction::Collapse => registry.set_visibility(mode, handle, true, true),
		RowAction::Toggle => {
			let shown = registry
				.state(mode, handle)
				.is_some_and(VisibilityState::is_shown);
			registry.set_visibility(mode, handle, !shown, false)
		}
		RowAction::SelectState(id) => {
			let entry = registry
				.get(handle)
				.ok_or_else(|| WidgetError::UnknownWidget(handle.to_string()))?;
			let Some(switch) = &entry.state_switch else {
				return Err(WidgetError::UnknownWidget(entry.key.clone()));
			};
			switch.change_state(id);
			debug!(domain = "widgets", mode = %mode, key = %entry.key, state = id, "widget display state changed");
			if let Some(callback) = &entry.on_state_change {
				callback();
			}
			Ok(())
		}
	}
}

/// Flips the boolean appearance preference `pref` for `mode`. Returns the
/// new value.
pub fn toggle_appearance(registry: &WidgetRegistry, mode: &ModeKey, pref: &str) -> Result<bool> {
	let pref = appearance_toggle(pref).ok_or_else(|| WidgetError::UnknownPreference(pref.to_string()))?;
	let store = registry.store().as_ref();
	let value = !pref.get(store, &registry.modes(), mode);
	pref.set(store, mode, &value)?;
	debug!(domain = "widgets", mode = %mode, pref = pref.id(), value, "appearance toggled");
	Ok(value)
}

/// Stores the markers mode of `mode` and aligns the marker widgets with it.
pub fn set_markers_mode(registry: &WidgetRegistry, mode: &ModeKey, markers: MarkersMode) -> Result<()> {
	MAP_MARKERS_MODE.set(registry.store().as_ref(), mode, &markers)?;
	registry.sync_map_marker_widgets(mode)
}

#[cfg(test)]
mod tests;
