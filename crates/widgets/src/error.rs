use mapdeck_prefs::PrefsError;
use thiserror::Error;

/// Errors returned by registry mutations.
///
/// Reads never fail: unknown keys read as hidden.
#[derive(Debug, Error)]
pub enum WidgetError {
	/// The preference store rejected the write. In-memory state is unchanged.
	#[error(transparent)]
	Prefs(#[from] PrefsError),

	/// No registered widget matches the handle or key.
	#[error("unknown widget: {0}")]
	UnknownWidget(String),

	/// The key cannot be encoded in the persisted token format.
	#[error("invalid widget key: {0:?}")]
	InvalidKey(String),

	/// The mode is not in the registry's mode catalog.
	#[error("unknown application mode: {0}")]
	UnknownMode(String),

	/// No appearance preference has this id.
	#[error("unknown preference: {0}")]
	UnknownPreference(String),
}

pub type Result<T> = std::result::Result<T, WidgetError>;
