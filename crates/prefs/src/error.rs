//! Error types for preference storage and profile loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing preferences.
#[derive(Debug, Error)]
pub enum PrefsError {
	/// Error reading or writing a preferences or profiles file.
	#[error("I/O error on {path}: {error}")]
	Io {
		/// Path to the file that failed.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A preferences or profiles file is not valid TOML for its schema.
	#[error("failed to parse {path}: {error}")]
	Parse {
		/// Path to the offending file.
		path: PathBuf,
		/// The underlying TOML error.
		error: toml::de::Error,
	},

	/// The in-memory preferences could not be serialized.
	#[error("failed to serialize preferences: {0}")]
	Serialize(#[from] toml::ser::Error),

	/// A profile names a parent that is not defined.
	#[error("profile '{mode}' names unknown parent '{parent}'")]
	UnknownParent {
		/// Profile key.
		mode: String,
		/// Missing parent key.
		parent: String,
	},

	/// Profile parents form a cycle.
	#[error("profile '{0}' is part of a parent cycle")]
	ParentCycle(String),

	/// Two profiles share a key.
	#[error("duplicate profile key '{0}'")]
	DuplicateMode(String),
}

/// Result type for preference operations.
pub type Result<T> = std::result::Result<T, PrefsError>;
