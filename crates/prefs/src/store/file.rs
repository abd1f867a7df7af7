use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;

use super::{ChangeListener, ListenerId, ListenerSet, PrefChange, PreferenceStore};
use crate::error::{PrefsError, Result};
use crate::mode::ModeKey;

/// `mode -> pref -> value`, kept sorted so the file diffs cleanly.
type Tables = BTreeMap<String, BTreeMap<String, String>>;

/// TOML-backed store.
///
/// The file holds one table per mode:
///
/// ```toml
/// [car]
/// map_info_controls = "speed;-compass;+battery;"
/// show_lanes = "true"
/// ```
///
/// Every mutation rewrites the whole file through a temporary file in the
/// same directory, so a crash never leaves a half-written file behind.
#[derive(Debug)]
pub struct FileStore {
	path: PathBuf,
	tables: RwLock<Tables>,
	listeners: ListenerSet,
}

impl FileStore {
	/// Opens the store at `path`. A missing file is an empty store; the file
	/// is created on the first write.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let tables = read_tables(&path)?;
		debug!(domain = "prefs", path = %path.display(), modes = tables.len(), "opened preferences file");
		Ok(Self {
			path,
			tables: RwLock::new(tables),
			listeners: ListenerSet::new(),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Re-reads the file and notifies listeners of every entry that differs
	/// from the in-memory copy. Used when another process edited the file.
	pub fn reload(&self) -> Result<usize> {
		let fresh = read_tables(&self.path)?;
		let changes = {
			let mut tables = self.tables.write();
			let changes = diff(&tables, &fresh);
			*tables = fresh;
			changes
		};
		debug!(domain = "prefs", path = %self.path.display(), changed = changes.len(), "reloaded preferences file");
		for change in &changes {
			self.listeners.notify(change);
		}
		Ok(changes.len())
	}

	fn mutate(&self, pref: &str, mode: &ModeKey, f: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> Result<()> {
		let changed = {
			let mut tables = self.tables.write();
			let mut next = tables.clone();
			let table = next.entry(mode.to_string()).or_default();
			if !f(table) {
				false
			} else {
				if table.is_empty() {
					next.remove(mode.as_str());
				}
				write_tables(&self.path, &next)?;
				*tables = next;
				true
			}
		};
		if changed {
			self.listeners.notify(&PrefChange {
				pref: pref.to_string(),
				mode: mode.clone(),
			});
		}
		Ok(())
	}
}

impl PreferenceStore for FileStore {
	fn get(&self, pref: &str, mode: &ModeKey) -> Option<String> {
		self.tables
			.read()
			.get(mode.as_str())
			.and_then(|t| t.get(pref))
			.cloned()
	}

	fn set(&self, pref: &str, mode: &ModeKey, value: &str) -> Result<()> {
		self.mutate(pref, mode, |table| {
			table.insert(pref.to_string(), value.to_string()).as_deref() != Some(value)
		})
	}

	fn remove(&self, pref: &str, mode: &ModeKey) -> Result<()> {
		self.mutate(pref, mode, |table| table.remove(pref).is_some())
	}

	fn subscribe(&self, listener: ChangeListener) -> ListenerId {
		self.listeners.add(listener)
	}

	fn unsubscribe(&self, id: ListenerId) {
		self.listeners.remove(id);
	}
}

fn read_tables(path: &Path) -> Result<Tables> {
	let content = match std::fs::read_to_string(path) {
		Ok(content) => content,
		Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Tables::new()),
		Err(error) => {
			return Err(PrefsError::Io {
				path: path.to_path_buf(),
				error,
			});
		}
	};
	toml::from_str(&content).map_err(|error| PrefsError::Parse {
		path: path.to_path_buf(),
		error,
	})
}

fn write_tables(path: &Path, tables: &Tables) -> Result<()> {
	let content = toml::to_string(tables)?;
	let io_err = |error| PrefsError::Io {
		path: path.to_path_buf(),
		error,
	};

	let dir = match path.parent() {
		Some(parent) if !parent.as_os_str().is_empty() => parent,
		_ => Path::new("."),
	};
	std::fs::create_dir_all(dir).map_err(io_err)?;

	let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
	tmp.write_all(content.as_bytes()).map_err(io_err)?;
	tmp.as_file().sync_all().map_err(io_err)?;
	tmp.persist(path).map_err(|e| io_err(e.error))?;
	Ok(())
}

fn diff(old: &Tables, new: &Tables) -> Vec<PrefChange> {
	let mut changes = Vec::new();
	let empty = BTreeMap::new();
	let modes: std::collections::BTreeSet<&String> = old.keys().chain(new.keys()).collect();
	for mode in modes {
		let before = old.get(mode).unwrap_or(&empty);
		let after = new.get(mode).unwrap_or(&empty);
		let prefs: std::collections::BTreeSet<&String> = before.keys().chain(after.keys()).collect();
		for pref in prefs {
			if before.get(pref) != after.get(pref) {
				changes.push(PrefChange {
					pref: pref.clone(),
					mode: ModeKey::new(mode),
				});
			}
		}
	}
	changes
}
