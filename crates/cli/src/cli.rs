use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use mapdeck_widgets::PanelSide;

#[derive(Parser, Debug)]
#[command(name = "mapdeck-widgets")]
#[command(about = "Inspect and edit per-profile map widget configuration")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Preferences file (defaults to the user config directory)
	#[arg(long, value_name = "PATH", global = true)]
	pub prefs: Option<PathBuf>,

	/// Custom profiles file
	#[arg(long, value_name = "PATH", global = true)]
	pub profiles: Option<PathBuf>,

	/// Application mode to operate on
	#[arg(short, long, default_value = "default", global = true)]
	pub mode: String,

	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
	/// List application modes
	Modes,
	/// List registered widgets and their state in the mode
	List,
	/// Show a widget
	Show { key: String },
	/// Hide a widget
	Hide { key: String },
	/// Show a widget only while its panel is expanded
	Collapse { key: String },
	/// Drop the mode's widget customization
	Reset,
	/// Print the widgets placed on a panel
	Panel {
		side: Side,
		/// Include collapsed widgets
		#[arg(long)]
		expanded: bool,
	},
	/// Print the configure-screen menu
	Menu {
		/// Offer paid features
		#[arg(long)]
		pro: bool,
	},
	/// Flip a boolean appearance preference
	Toggle { pref: String },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
	Left,
	Right,
}

impl From<Side> for PanelSide {
	fn from(side: Side) -> Self {
		match side {
			Side::Left => PanelSide::Left,
			Side::Right => PanelSide::Right,
		}
	}
}
