//! Per-mode string preference storage.
//!
//! A [`PreferenceStore`] maps `(preference id, mode)` to a raw string value.
//! Typed access with defaults and parent fallback lives in
//! [`ModePreference`](crate::ModePreference); stores only persist strings and
//! tell subscribers what changed.

mod file;
mod listeners;
mod memory;


pub use file::FileStore;
pub use listeners::{ChangeListener, ListenerId, ListenerSet};
pub use memory::MemoryStore;

use crate::error::Result;
use crate::mode::ModeKey;

/// A single changed entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefChange {
	/// Preference id.
	pub pref: String,
	/// Mode whose value changed.
	pub mode: ModeKey,
}

/// Key-value string storage scoped by application mode.
///
/// Listeners are invoked synchronously after a successful write, outside any
/// internal lock, so a listener may read from (or write to) the store again.
pub trait PreferenceStore: Send + Sync {
	/// Returns the value stored for `mode`, without any fallback.
	fn get(&self, pref: &str, mode: &ModeKey) -> Option<String>;

	/// Stores `value` for `mode`.
	fn set(&self, pref: &str, mode: &ModeKey, value: &str) -> Result<()>;

	/// Removes the value for `mode`. Removing a missing entry is not an error.
	fn remove(&self, pref: &str, mode: &ModeKey) -> Result<()>;

	/// Registers a change listener.
	fn subscribe(&self, listener: ChangeListener) -> ListenerId;

	/// Removes a change listener. Unknown ids are ignored.
	fn unsubscribe(&self, id: ListenerId);
}
