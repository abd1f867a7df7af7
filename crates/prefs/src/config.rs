//! Custom profile definitions loaded from TOML.
//!
//! ```toml
//! [[mode]]
//! key = "truck"
//! name = "Truck"
//! parent = "car"
//!
//! [mode.widgets]
//! visible = ["speed", "max_speed"]
//! collapsible = ["battery"]
//! available = ["speed", "max_speed", "battery"]
//! ```
//!
//! A mode without a `widgets` table inherits its parent's widget defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PrefsError, Result};
use crate::mode::{AppMode, AppModes, WidgetDefaults};

/// Parsed `profiles.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfilesConfig {
	#[serde(default, rename = "mode")]
	pub modes: Vec<ProfileEntry>,
}

/// One `[[mode]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileEntry {
	pub key: String,
	pub name: Option<String>,
	pub parent: Option<String>,
	pub widgets: Option<WidgetsEntry>,
}

/// Widget defaults of a profile entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetsEntry {
	#[serde(default)]
	pub visible: Vec<String>,
	#[serde(default)]
	pub collapsible: Vec<String>,
	pub available: Option<Vec<String>>,
}

impl ProfilesConfig {
	/// Parses a profiles document. `origin` is only used in error messages.
	pub fn parse(input: &str, origin: impl Into<PathBuf>) -> Result<Self> {
		toml::from_str(input).map_err(|error| PrefsError::Parse {
			path: origin.into(),
			error,
		})
	}

	/// Loads a profiles file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|error| PrefsError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&content, path)
	}

	/// Converts the entries into modes, in file order.
	pub fn into_modes(self) -> Vec<AppMode> {
		self.modes.into_iter().map(ProfileEntry::into_mode).collect()
	}

	/// Adds the configured profiles to `modes`.
	///
	/// Parents may refer to builtin modes or to other entries in the file.
	pub fn apply_to(self, modes: &mut AppModes) -> Result<()> {
		modes.extend(self.into_modes())
	}
}

impl ProfileEntry {
	fn into_mode(self) -> AppMode {
		let name = self.name.unwrap_or_else(|| self.key.clone());
		let mut mode = AppMode::new(self.key, name);
		if let Some(parent) = self.parent {
			mode = mode.with_parent(parent);
		}
		if let Some(widgets) = self.widgets {
			let mut defaults = WidgetDefaults::new()
				.visible(widgets.visible)
				.collapsible(widgets.collapsible);
			if let Some(available) = widgets.available {
				defaults = defaults.available(available);
			}
			mode = mode.with_widgets(defaults);
		}
		mode
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mode::ModeKey;

	const PROFILES: &str = r#"
		[[mode]]
		key = "truck"
		name = "Truck"
		parent = "car"

		[[mode]]
		key = "mtb"
		parent = "default"

		[mode.widgets]
		visible = ["altitude"]
		available = ["altitude", "speed"]
	"#;

	fn builtin() -> AppModes {
		AppModes::try_from_modes([
			AppMode::new("default", "Browse map"),
			AppMode::new("car", "Driving")
				.with_parent("default")
				.with_widgets(WidgetDefaults::new().visible(["speed"])),
		])
		.unwrap()
	}

	#[test]
	fn test_profiles_extend_builtin_modes() {
		let mut modes = builtin();
		ProfilesConfig::parse(PROFILES, "profiles.toml")
			.unwrap()
			.apply_to(&mut modes)
			.unwrap();

		assert_eq!(modes.len(), 4);
		assert_eq!(modes.get("mtb").map(|m| m.name.as_str()), Some("mtb"));
		assert!(modes.is_widget_visible(&ModeKey::new("truck"), "speed"));
		assert!(modes.is_widget_visible(&ModeKey::new("mtb"), "altitude"));
		assert!(!modes.is_widget_available(&ModeKey::new("mtb"), "compass"));
	}

	#[test]
	fn test_unknown_parent_is_an_error() {
		let mut modes = builtin();
		let err = ProfilesConfig::parse("[[mode]]\nkey = \"x\"\nparent = \"plane\"\n", "profiles.toml")
			.unwrap()
			.apply_to(&mut modes)
			.unwrap_err();
		assert!(matches!(err, PrefsError::UnknownParent { .. }));
		assert_eq!(modes.len(), 2);
	}

	#[test]
	fn test_unknown_field_is_a_parse_error() {
		let err = ProfilesConfig::parse("[[mode]]\nkey = \"x\"\ncolour = \"red\"\n", "profiles.toml").unwrap_err();
		assert!(matches!(err, PrefsError::Parse { .. }));
	}
}
