//! Stock widgets and application modes.

use std::sync::Arc;

use mapdeck_prefs::{AppMode, AppModes, WidgetDefaults};
use tracing::warn;

use crate::controller::TextInfoWidget;
use crate::descriptor::{IconId, PanelSide, WidgetDescriptor, WidgetHandle, WidgetKind};
use crate::error::Result;
use crate::registry::{WIDGET_MARKER_1, WIDGET_MARKER_2, WidgetRegistry};

pub const WIDGET_NEXT_TURN: &str = "next_turn";
pub const WIDGET_NEXT_TURN_SMALL: &str = "next_turn_small";
pub const WIDGET_NEXT_NEXT_TURN: &str = "next_next_turn";
pub const WIDGET_DISTANCE: &str = "distance";
pub const WIDGET_INTERMEDIATE_DISTANCE: &str = "intermediate_distance";
pub const WIDGET_TIME: &str = "time";
pub const WIDGET_INTERMEDIATE_TIME: &str = "intermediate_time";
pub const WIDGET_MAX_SPEED: &str = "max_speed";
pub const WIDGET_SPEED: &str = "speed";
pub const WIDGET_ALTITUDE: &str = "altitude";
pub const WIDGET_GPS_INFO: &str = "gps_info";
pub const WIDGET_BEARING: &str = "bearing";
pub const WIDGET_PLAIN_TIME: &str = "plain_time";
pub const WIDGET_BATTERY: &str = "battery";
pub const WIDGET_RADIUS_RULER: &str = "ruler";

/// Browse-map mode, root of the builtin hierarchy.
pub const DEFAULT_MODE: &str = "default";

pub const KIND_NAVIGATION: WidgetKind = WidgetKind::new("navigation");
pub const KIND_ROUTE_INFO: WidgetKind = WidgetKind::new("route_info");
pub const KIND_MARKER: WidgetKind = WidgetKind::new("marker");
pub const KIND_SENSOR: WidgetKind = WidgetKind::new("sensor");
pub const KIND_RULER: WidgetKind = WidgetKind::new("ruler");

struct Builtin {
	key: &'static str,
	title: &'static str,
	panel: PanelSide,
	priority: i32,
	kind: WidgetKind,
}

const fn builtin(key: &'static str, title: &'static str, panel: PanelSide, priority: i32, kind: WidgetKind) -> Builtin {
	Builtin {
		key,
		title,
		panel,
		priority,
		kind,
	}
}

const BUILTINS: &[Builtin] = &[
	builtin(WIDGET_NEXT_TURN, "Next turn", PanelSide::Left, 1, KIND_NAVIGATION),
	builtin(WIDGET_NEXT_TURN_SMALL, "Next turn (small)", PanelSide::Left, 2, KIND_NAVIGATION),
	builtin(WIDGET_NEXT_NEXT_TURN, "Second next turn", PanelSide::Left, 3, KIND_NAVIGATION),
	builtin(WIDGET_INTERMEDIATE_DISTANCE, "Distance to intermediate", PanelSide::Right, 3, KIND_ROUTE_INFO),
	builtin(WIDGET_INTERMEDIATE_TIME, "Time to intermediate", PanelSide::Right, 4, KIND_ROUTE_INFO),
	builtin(WIDGET_DISTANCE, "Distance to destination", PanelSide::Right, 5, KIND_ROUTE_INFO),
	builtin(WIDGET_TIME, "Time to destination", PanelSide::Right, 6, KIND_ROUTE_INFO),
	builtin(WIDGET_MARKER_1, "First map marker", PanelSide::Right, 7, KIND_MARKER),
	builtin(WIDGET_MARKER_2, "Second map marker", PanelSide::Right, 8, KIND_MARKER),
	builtin(WIDGET_SPEED, "Current speed", PanelSide::Right, 9, KIND_SENSOR),
	builtin(WIDGET_MAX_SPEED, "Speed limit", PanelSide::Right, 10, KIND_SENSOR),
	builtin(WIDGET_ALTITUDE, "Altitude", PanelSide::Right, 11, KIND_SENSOR),
	builtin(WIDGET_GPS_INFO, "GPS info", PanelSide::Right, 12, KIND_SENSOR),
	builtin(WIDGET_BEARING, "Bearing", PanelSide::Right, 13, KIND_SENSOR),
	builtin(WIDGET_PLAIN_TIME, "Current time", PanelSide::Right, 14, KIND_SENSOR),
	builtin(WIDGET_BATTERY, "Battery level", PanelSide::Right, 15, KIND_SENSOR),
	builtin(WIDGET_RADIUS_RULER, "Radius ruler", PanelSide::Right, 16, KIND_RULER),
];

/// The stock mode catalog: browse map, driving, cycling, walking and public
/// transport (which inherits the walking defaults).
pub fn builtin_modes() -> AppModes {
	AppModes::try_from_modes(mode_table()).unwrap_or_else(|error| {
		warn!(domain = "widgets", %error, "invalid stock mode table");
		AppModes::default()
	})
}

/// Parents precede their children.
fn mode_table() -> [AppMode; 5] {
	[
		AppMode::new(DEFAULT_MODE, "Browse map").with_widgets(
			WidgetDefaults::new()
				.visible([WIDGET_RADIUS_RULER])
				.collapsible([WIDGET_ALTITUDE, WIDGET_GPS_INFO, WIDGET_PLAIN_TIME, WIDGET_BATTERY]),
		),
		AppMode::new("car", "Driving").with_parent(DEFAULT_MODE).with_widgets(
			WidgetDefaults::new()
				.visible([
					WIDGET_NEXT_TURN,
					WIDGET_NEXT_NEXT_TURN,
					WIDGET_INTERMEDIATE_DISTANCE,
					WIDGET_DISTANCE,
					WIDGET_TIME,
					WIDGET_SPEED,
					WIDGET_MAX_SPEED,
				])
				.collapsible([WIDGET_ALTITUDE, WIDGET_GPS_INFO, WIDGET_PLAIN_TIME, WIDGET_BATTERY]),
		),
		AppMode::new("bicycle", "Cycling").with_parent(DEFAULT_MODE).with_widgets(
			WidgetDefaults::new()
				.visible([WIDGET_NEXT_TURN_SMALL, WIDGET_DISTANCE, WIDGET_TIME, WIDGET_SPEED, WIDGET_ALTITUDE])
				.collapsible([WIDGET_MAX_SPEED, WIDGET_GPS_INFO, WIDGET_PLAIN_TIME, WIDGET_BATTERY]),
		),
		AppMode::new("pedestrian", "Walking").with_parent(DEFAULT_MODE).with_widgets(
			WidgetDefaults::new()
				.visible([WIDGET_NEXT_TURN_SMALL, WIDGET_DISTANCE, WIDGET_TIME, WIDGET_PLAIN_TIME])
				.collapsible([WIDGET_SPEED, WIDGET_ALTITUDE, WIDGET_BATTERY])
				.available(BUILTINS.iter().map(|b| b.key).filter(|k| *k != WIDGET_MAX_SPEED)),
		),
		AppMode::new("public_transport", "Public transport").with_parent("pedestrian"),
	]
}

/// Stock descriptors, each backed by a fresh [`TextInfoWidget`].
pub fn builtin_descriptors() -> Vec<(WidgetDescriptor, Arc<TextInfoWidget>)> {
	BUILTINS
		.iter()
		.enumerate()
		.map(|(icon, b)| {
			let widget = Arc::new(TextInfoWidget::new());
			let descriptor = WidgetDescriptor::new(b.key, b.title, b.panel, b.priority)
				.with_icon(IconId(icon as u32))
				.with_kind(b.kind)
				.with_controller(widget.clone());
			(descriptor, widget)
		})
		.collect()
}

/// Registers every stock widget.
pub fn register_builtins(registry: &WidgetRegistry) -> Result<Vec<WidgetHandle>> {
	builtin_descriptors()
		.into_iter()
		.map(|(descriptor, _)| registry.register(descriptor))
		.collect()
}

#[cfg(test)]
mod tests {
	use mapdeck_prefs::ModeKey;

	use super::*;

	#[test]
	fn test_mode_table_is_a_valid_catalog() {
		let modes = AppModes::try_from_modes(mode_table()).unwrap();
		assert_eq!(modes.len(), mode_table().len());
	}

	#[test]
	fn test_builtin_modes_resolve_inherited_defaults() {
		let modes = builtin_modes();
		assert_eq!(modes.len(), 5);
		let transit = ModeKey::new("public_transport");
		assert!(modes.is_widget_visible(&transit, WIDGET_PLAIN_TIME));
		assert!(modes.is_widget_collapsible(&transit, WIDGET_SPEED));
		assert!(!modes.is_widget_available(&transit, WIDGET_MAX_SPEED));
		assert!(modes.is_widget_available(&ModeKey::new("car"), WIDGET_MAX_SPEED));
	}

	#[test]
	fn test_builtin_keys_are_unique() {
		let descriptors = builtin_descriptors();
		let mut keys: Vec<&str> = descriptors.iter().map(|(d, _)| d.key.as_str()).collect();
		keys.sort_unstable();
		keys.dedup();
		assert_eq!(keys.len(), BUILTINS.len());
	}

	#[test]
	fn test_register_builtins_registers_every_key() {
		let store = Arc::new(mapdeck_prefs::MemoryStore::new());
		let registry = WidgetRegistry::new(store, builtin_modes());
		let handles = register_builtins(&registry).unwrap();
		assert_eq!(handles.len(), BUILTINS.len());
		assert_eq!(registry.len(), BUILTINS.len());
	}
}
