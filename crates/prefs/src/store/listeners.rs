use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::PrefChange;

/// Callback invoked for every changed entry.
pub type ChangeListener = Arc<dyn Fn(&PrefChange) + Send + Sync>;

/// Handle returned by [`PreferenceStore::subscribe`](super::PreferenceStore::subscribe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Listener bookkeeping shared by the store implementations.
#[derive(Default)]
pub struct ListenerSet {
	next_id: AtomicU64,
	listeners: Mutex<Vec<(ListenerId, ChangeListener)>>,
}

impl ListenerSet {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&self, listener: ChangeListener) -> ListenerId {
		let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
		self.listeners.lock().push((id, listener));
		id
	}

	pub fn remove(&self, id: ListenerId) {
		self.listeners.lock().retain(|(lid, _)| *lid != id);
	}

	pub fn len(&self) -> usize {
		self.listeners.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.listeners.lock().is_empty()
	}

	/// Calls every listener with `change`.
	///
	/// The listener list is cloned first so callbacks may subscribe or
	/// unsubscribe without deadlocking.
	pub fn notify(&self, change: &PrefChange) {
		let listeners: Vec<ChangeListener> = self
			.listeners
			.lock()
			.iter()
			.map(|(_, l)| l.clone())
			.collect();
		for listener in listeners {
			listener(change);
		}
	}
}

impl std::fmt::Debug for ListenerSet {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("ListenerSet")
			.field("len", &self.len())
			.finish()
	}
}
