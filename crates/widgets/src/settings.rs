//! Mode preferences read and written by the widget registry and the
//! configure-screen menu.

use mapdeck_prefs::{ModePreference, PrefValue};

/// Encoded widget visibility, see [`codec`](crate::codec).
pub const MAP_INFO_CONTROLS: ModePreference<String> = ModePreference::new("map_info_controls", String::new);

pub const TRANSPARENT_MAP_THEME: ModePreference<bool> = ModePreference::new("transparent_map_theme", || true);
pub const SHOW_STREET_NAME: ModePreference<bool> = ModePreference::new("show_street_name", || false);
pub const SHOW_COORDINATES_WIDGET: ModePreference<bool> = ModePreference::new("show_coordinates_widget", || false);
pub const SHOW_DISTANCE_RULER: ModePreference<bool> = ModePreference::new("show_distance_ruler", || false);
pub const SHOW_LANES: ModePreference<bool> = ModePreference::new("show_lanes", || false);
pub const SHOW_ELEVATION_PROFILE_WIDGET: ModePreference<bool> =
	ModePreference::new("show_elevation_profile_widget", || false);
pub const QUICK_ACTION_FAB: ModePreference<bool> = ModePreference::new("quick_action_fab", || false);

pub const MAP_MARKERS_MODE: ModePreference<MarkersMode> = ModePreference::new("map_markers_mode", || MarkersMode::Toolbar);
pub const MARKERS_DISTANCE_INDICATION_ENABLED: ModePreference<bool> =
	ModePreference::new("markers_distance_indication_enabled", || true);
pub const DISPLAYED_MARKERS_WIDGETS_COUNT: ModePreference<i32> =
	ModePreference::new("displayed_markers_widgets_count", || 2);

/// Boolean preferences offered as appearance toggles, looked up by id.
pub const APPEARANCE_TOGGLES: &[ModePreference<bool>] = &[
	SHOW_STREET_NAME,
	SHOW_COORDINATES_WIDGET,
	SHOW_DISTANCE_RULER,
	SHOW_ELEVATION_PROFILE_WIDGET,
	TRANSPARENT_MAP_THEME,
	SHOW_LANES,
	QUICK_ACTION_FAB,
];

/// Finds a boolean appearance preference by id.
pub fn appearance_toggle(id: &str) -> Option<ModePreference<bool>> {
	APPEARANCE_TOGGLES.iter().copied().find(|p| p.id() == id)
}

/// Where distance-to-marker indicators are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkersMode {
	/// Top toolbar.
	Toolbar,
	/// Right-panel widgets (`map_marker_1st` / `map_marker_2nd`).
	Widgets,
	/// Not shown.
	None,
}

impl MarkersMode {
	pub fn is_widgets(self) -> bool {
		self == Self::Widgets
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Toolbar => "toolbar",
			Self::Widgets => "widgets",
			Self::None => "none",
		}
	}

	pub fn human_name(self) -> &'static str {
		match self {
			Self::Toolbar => "Top bar",
			Self::Widgets => "Widgets",
			Self::None => "None",
		}
	}
}

impl PrefValue for MarkersMode {
	fn decode(raw: &str) -> Option<Self> {
		match raw {
			"toolbar" => Some(Self::Toolbar),
			"widgets" => Some(Self::Widgets),
			"none" => Some(Self::None),
			_ => Option::None,
		}
	}

	fn encode(&self) -> String {
		self.as_str().to_string()
	}
}
