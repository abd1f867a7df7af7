//! Application modes and per-mode preference storage.
//!
//! Map controls are configured per application mode (driving, cycling,
//! walking, ...). This crate provides:
//!
//! - [`AppModes`]: the ordered mode catalog with parent inheritance and
//!   default widget sets
//! - [`PreferenceStore`]: string storage keyed by `(preference, mode)` with
//!   change notification, backed by memory ([`MemoryStore`]) or a TOML file
//!   ([`FileStore`])
//! - [`ModePreference`]: typed handles that resolve through the mode
//!   hierarchy down to a compile-time default
//! - [`ProfilesConfig`]: user-defined profiles loaded from `profiles.toml`

pub mod config;
pub mod error;
pub mod mode;
pub mod pref;
pub mod store;

use std::path::PathBuf;

pub use config::ProfilesConfig;
pub use error::{PrefsError, Result};
pub use mode::{AppMode, AppModes, ModeKey, WidgetDefaults};
pub use pref::{ModePreference, PrefValue};
pub use store::{ChangeListener, FileStore, ListenerId, MemoryStore, PrefChange, PreferenceStore};

/// Default location of the preferences file
/// (`$XDG_CONFIG_HOME/mapdeck/preferences.toml`).
pub fn default_preferences_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("mapdeck").join("preferences.toml"))
}

/// Default location of the custom profiles file.
pub fn default_profiles_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("mapdeck").join("profiles.toml"))
}
