use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use mapdeck_prefs::{MemoryStore, ModeKey};
use pretty_assertions::assert_eq;

use super::*;
use crate::builtins::{WIDGET_MAX_SPEED, builtin_modes, register_builtins};
use crate::controller::{StateMenuItem, TextInfoWidget, WidgetStateSwitch};
use crate::descriptor::WidgetDescriptor;
use crate::registry::WIDGET_MARKER_1;

fn fixture() -> (Arc<MemoryStore>, WidgetRegistry) {
	let store = Arc::new(MemoryStore::new());
	let registry = WidgetRegistry::new(store.clone(), builtin_modes());
	register_builtins(&registry).unwrap();
	(store, registry)
}

fn headers(rows: &[MenuRow]) -> Vec<MenuSection> {
	rows.iter()
		.filter_map(|r| match r {
			MenuRow::Header(section) => Some(*section),
			_ => None,
		})
		.collect()
}

fn toggles(rows: &[MenuRow]) -> Vec<&'static str> {
	rows.iter()
		.filter_map(|r| match r {
			MenuRow::Toggle(t) => Some(t.pref),
			_ => None,
		})
		.collect()
}

fn widget_row<'a>(rows: &'a [MenuRow], key: &str) -> Option<&'a WidgetRow> {
	rows.iter().find_map(|r| match r {
		MenuRow::Widget(w) if w.key == key => Some(w),
		_ => None,
	})
}

/// Two display variants, like arrival time vs. time to go.
#[derive(Default)]
struct TimeSwitch {
	current: AtomicU32,
}

impl WidgetStateSwitch for TimeSwitch {
	fn menu_items(&self) -> Vec<StateMenuItem> {
		vec![
			StateMenuItem {
				id: 0,
				title: "Arrival time".into(),
				icon: IconId(1),
			},
			StateMenuItem {
				id: 1,
				title: "Time to go".into(),
				icon: IconId(2),
			},
		]
	}

	fn current(&self) -> u32 {
		self.current.load(Ordering::Relaxed)
	}

	fn change_state(&self, id: u32) {
		self.current.store(id, Ordering::Relaxed);
	}
}

#[test]
fn test_menu_sections_in_order() {
	let (store, registry) = fixture();
	let rows = build_configure_menu(&registry, store.as_ref(), &ModeKey::new("car"), &MenuOptions::default());
	assert_eq!(
		headers(&rows),
		[
			MenuSection::QuickAction,
			MenuSection::RightPanel,
			MenuSection::LeftPanel,
			MenuSection::Appearance,
		]
	);
	assert_eq!(rows[1], MenuRow::Toggle(ToggleRow {
		pref: "quick_action_fab",
		label: "Show quick action button",
		checked: false,
	}));
}

#[test]
fn test_appearance_toggles_depend_on_mode_and_options() {
	let (store, registry) = fixture();
	let browse = build_configure_menu(&registry, store.as_ref(), &ModeKey::new("default"), &MenuOptions::default());
	assert_eq!(
		toggles(&browse),
		[
			"quick_action_fab",
			"show_coordinates_widget",
			"show_distance_ruler",
			"transparent_map_theme",
			"show_lanes",
		]
	);

	let pro = MenuOptions { pro_available: true };
	let car = build_configure_menu(&registry, store.as_ref(), &ModeKey::new("car"), &pro);
	assert_eq!(
		toggles(&car),
		[
			"quick_action_fab",
			"show_street_name",
			"show_coordinates_widget",
			"show_distance_ruler",
			"show_elevation_profile_widget",
			"transparent_map_theme",
			"show_lanes",
		]
	);
	assert!(car.contains(&MenuRow::MarkersMode(MarkersMode::Toolbar)));
}

#[test]
fn test_widget_rows_follow_registry_state() {
	let (store, registry) = fixture();
	let car = ModeKey::new("car");
	let rows = build_configure_menu(&registry, store.as_ref(), &car, &MenuOptions::default());

	let speed = widget_row(&rows, "speed").unwrap();
	assert!(speed.selected);
	assert_eq!(speed.description, None);
	assert!(speed.has_popup);

	let altitude = widget_row(&rows, "altitude").unwrap();
	assert!(altitude.selected);
	assert_eq!(altitude.description, Some(COLLAPSED_DESCRIPTION));

	assert!(!widget_row(&rows, "bearing").unwrap().selected);
}

#[test]
fn test_unavailable_widgets_are_not_listed() {
	let (store, registry) = fixture();
	let walking = build_configure_menu(&registry, store.as_ref(), &ModeKey::new("pedestrian"), &MenuOptions::default());
	assert!(widget_row(&walking, WIDGET_MAX_SPEED).is_none());
	assert!(widget_row(&walking, "speed").is_some());

	let transit = build_configure_menu(&registry, store.as_ref(), &ModeKey::new("public_transport"), &MenuOptions::default());
	assert!(widget_row(&transit, WIDGET_MAX_SPEED).is_none());
}

#[test]
fn test_popup_lists_states_then_visibility() {
	let (_store, registry) = fixture();
	let car = ModeKey::new("car");
	let handle = registry.register(
		WidgetDescriptor::new("arrival", "Arrival", PanelSide::Right, 6)
			.with_controller(Arc::new(TextInfoWidget::new()))
			.with_state_switch(Arc::new(TimeSwitch::default())),
	).unwrap();

	let items = popup_items(&registry, &car, handle);
	assert_eq!(items, [
		PopupItem::State {
			id: 0,
			title: "Arrival time".into(),
			icon: IconId(1),
			checked: true,
		},
		PopupItem::State {
			id: 1,
			title: "Time to go".into(),
			icon: IconId(2),
			checked: false,
		},
		PopupItem::Show { checked: false },
		PopupItem::Hide { checked: true },
		PopupItem::Collapse { checked: false },
	]);
}

#[test]
fn test_popup_without_controller_cannot_collapse() {
	let (_store, registry) = fixture();
	let handle = registry.register(WidgetDescriptor::new("note", "Note", PanelSide::Left, 9)).unwrap();
	let items = popup_items(&registry, &ModeKey::new("car"), handle);
	assert_eq!(items, [PopupItem::Show { checked: false }, PopupItem::Hide { checked: true }]);
}

#[test]
fn test_row_actions_update_visibility() {
	let (_store, registry) = fixture();
	let car = ModeKey::new("car");
	let speed = registry.find_by_key("speed").unwrap().handle;

	apply_row_action(&registry, &car, speed, RowAction::Collapse).unwrap();
	assert!(registry.is_visible_collapsed(&car, "speed"));
	apply_row_action(&registry, &car, speed, RowAction::Toggle).unwrap();
	assert!(!registry.is_visible(&car, "speed"));
	apply_row_action(&registry, &car, speed, RowAction::Toggle).unwrap();
	assert!(registry.is_visible(&car, "speed"));
	apply_row_action(&registry, &car, speed, RowAction::Hide).unwrap();
	assert!(!registry.is_visible(&car, "speed"));
	apply_row_action(&registry, &car, speed, RowAction::Show).unwrap();
	assert!(registry.is_visible(&car, "speed"));
}

#[test]
fn test_select_state_switches_display_variant() {
	let (_store, registry) = fixture();
	let switch = Arc::new(TimeSwitch::default());
	let handle = registry.register(
		WidgetDescriptor::new("arrival", "Arrival", PanelSide::Right, 6).with_state_switch(switch.clone()),
	).unwrap();
	apply_row_action(&registry, &ModeKey::new("car"), handle, RowAction::SelectState(1)).unwrap();
	assert_eq!(switch.current(), 1);

	let speed = registry.find_by_key("speed").unwrap().handle;
	assert!(apply_row_action(&registry, &ModeKey::new("car"), speed, RowAction::SelectState(1)).is_err());
}

#[test]
fn test_toggle_appearance_flips_mode_value() {
	let (store, registry) = fixture();
	let car = ModeKey::new("car");
	assert!(!toggle_appearance(&registry, &car, "transparent_map_theme").unwrap());
	assert!(toggle_appearance(&registry, &car, "show_lanes").unwrap());
	assert_eq!(store.get("show_lanes", &car).as_deref(), Some("true"));
	assert!(!SHOW_LANES.is_set_for_mode(store.as_ref(), &ModeKey::new("bicycle")));

	let err = toggle_appearance(&registry, &car, "map_info_controls").unwrap_err();
	assert!(matches!(err, WidgetError::UnknownPreference(_)));
}

#[test]
fn test_markers_mode_syncs_marker_widgets() {
	let (_store, registry) = fixture();
	let car = ModeKey::new("car");
	assert!(!registry.is_visible(&car, WIDGET_MARKER_1));

	set_markers_mode(&registry, &car, MarkersMode::Widgets).unwrap();
	assert!(registry.is_visible(&car, WIDGET_MARKER_1));

	set_markers_mode(&registry, &car, MarkersMode::None).unwrap();
	assert!(!registry.is_visible(&car, WIDGET_MARKER_1));
}
