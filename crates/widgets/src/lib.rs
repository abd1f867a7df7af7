//! Map widget registry.
//!
//! Widgets (speed, distance, next turn, markers, ...) are stacked on the left
//! and right screen panels. Which of them are shown is configured per
//! application mode and persisted as a `;`-separated token string in the
//! `map_info_controls` preference:
//!
//! - [`codec`]: the token format
//! - [`WidgetRegistry`]: registrations, derived per-mode visibility, panel
//!   population and mutations kept in sync with the preference store
//! - [`menu`]: the configure-screen menu as plain data
//! - [`builtins`]: stock widgets and modes

pub mod builtins;
pub mod codec;
pub mod controller;
pub mod descriptor;
pub mod error;
pub mod menu;
pub mod registry;
pub mod settings;

pub use codec::{PersistedSet, VisibilityState};
pub use controller::{DrawSettings, StateMenuItem, TextInfoWidget, WidgetController, WidgetStateSwitch, distance_changed};
pub use descriptor::{
	IconId, PanelSide, StringId, WidgetDescriptor, WidgetEntry, WidgetHandle, WidgetKind, WidgetTitle,
};
pub use error::{Result, WidgetError};
pub use menu::{MenuOptions, MenuRow, MenuSection, PopupItem, RowAction, build_configure_menu};
pub use registry::{PanelSlot, Subscription, WidgetRegistry};
pub use settings::MarkersMode;
