//! `mapdeck-widgets` binary.
//!
//! Reads and edits the widget configuration stored in a mapdeck preferences
//! file, using the same registry the map screen uses.

mod cli;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use cli::{Cli, Command};
use mapdeck_prefs::{AppModes, FileStore, ModeKey, ProfilesConfig};
use mapdeck_widgets::builtins::{builtin_modes, register_builtins};
use mapdeck_widgets::menu::{self, MenuOptions, MenuRow};
use mapdeck_widgets::{PanelSide, VisibilityState, WidgetRegistry};
use tracing::{debug, info};

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);
	run(&cli, &mut io::stdout().lock())
}

fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<()> {
	let prefs = match &cli.prefs {
		Some(path) => path.clone(),
		None => mapdeck_prefs::default_preferences_path().context("no configuration directory; pass --prefs")?,
	};
	let store = Arc::new(FileStore::open(&prefs)?);
	info!(path = %prefs.display(), "opened preferences");

	let modes = load_modes(cli.profiles.clone())?;
	let mode = ModeKey::new(&cli.mode);
	if !modes.contains(&mode) {
		bail!("unknown application mode '{mode}'");
	}

	let registry = WidgetRegistry::new(store.clone(), modes);
	register_builtins(&registry)?;

	match &cli.command {
		Command::Modes => {
			for m in registry.modes().values() {
				let parent = m.parent.as_ref().map_or("-", ModeKey::as_str);
				writeln!(out, "{}\t{}\t{}", m.key, m.name, parent)?;
			}
		}
		Command::List => {
			for side in [PanelSide::Left, PanelSide::Right] {
				for entry in registry.widgets(side) {
					let state = registry
						.state(&mode, entry.handle)
						.unwrap_or(VisibilityState::Hidden);
					writeln!(out, "{}\t{}\t{}", side.as_str(), entry.key, state_label(state))?;
				}
			}
		}
		Command::Show { key } => set(&registry, &mode, key, true, false, out)?,
		Command::Hide { key } => set(&registry, &mode, key, false, false, out)?,
		Command::Collapse { key } => set(&registry, &mode, key, true, true, out)?,
		Command::Reset => {
			registry.reset_to_default(&mode)?;
			writeln!(out, "{mode}: defaults")?;
		}
		Command::Panel { side, expanded } => {
			for slot in registry.populate(&mode, (*side).into(), *expanded) {
				let marker = if slot.collapsed { "+" } else { "" };
				writeln!(out, "{marker}{}", slot.key)?;
			}
		}
		Command::Menu { pro } => {
			let options = MenuOptions { pro_available: *pro };
			for row in menu::build_configure_menu(&registry, store.as_ref(), &mode, &options) {
				writeln!(out, "{}", menu_line(&row))?;
			}
		}
		Command::Toggle { pref } => {
			let value = menu::toggle_appearance(&registry, &mode, pref)?;
			writeln!(out, "{pref} = {value}")?;
		}
	}
	Ok(())
}

fn load_modes(profiles: Option<PathBuf>) -> anyhow::Result<AppModes> {
	let mut modes = builtin_modes();
	let path = match profiles {
		Some(path) => path,
		None => match mapdeck_prefs::default_profiles_path() {
			Some(path) if path.exists() => path,
			_ => return Ok(modes),
		},
	};
	ProfilesConfig::load(&path)?.apply_to(&mut modes)?;
	debug!(path = %path.display(), modes = modes.len(), "loaded custom profiles");
	Ok(modes)
}

fn set(
	registry: &WidgetRegistry,
	mode: &ModeKey,
	key: &str,
	visible: bool,
	collapsed: bool,
	out: &mut impl Write,
) -> anyhow::Result<()> {
	registry.set_visibility_by_key(mode, key, visible, collapsed)?;
	let state = VisibilityState::from_flags(visible, collapsed);
	writeln!(out, "{mode}: {key} {}", state_label(state))?;
	Ok(())
}

fn state_label(state: VisibilityState) -> &'static str {
	match state {
		VisibilityState::Visible => "visible",
		VisibilityState::VisibleCollapsed => "collapsed",
		VisibilityState::Hidden => "hidden",
	}
}

fn menu_line(row: &MenuRow) -> String {
	match row {
		MenuRow::Header(section) => format!("[{}]", section.label()),
		MenuRow::Widget(w) => {
			let check = if w.selected { "x" } else { " " };
			let title = w.title.resolve(|id| format!("#{}", id.0));
			match w.description {
				Some(desc) => format!("  [{check}] {title} ({desc})"),
				None => format!("  [{check}] {title}"),
			}
		}
		MenuRow::Toggle(t) => {
			let check = if t.checked { "x" } else { " " };
			format!("  [{check}] {} ({})", t.label, t.pref)
		}
		MenuRow::MarkersMode(markers) => format!("  Map markers: {}", markers.human_name()),
	}
}

fn setup_tracing(verbose: bool) {
	use std::fs::OpenOptions;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = || {
		EnvFilter::try_from_env("MAPDECK_LOG")
			.or_else(|_| EnvFilter::try_from_default_env())
			.unwrap_or_else(|_| {
				if verbose {
					EnvFilter::new("mapdeck_widgets=trace,mapdeck_prefs=debug,info")
				} else {
					EnvFilter::new("warn")
				}
			})
	};

	if let Some(log_dir) = std::env::var("MAPDECK_LOG_DIR").ok().map(PathBuf::from)
		&& std::fs::create_dir_all(&log_dir).is_ok()
	{
		let log_path = log_dir.join(format!("mapdeck-widgets.{}.log", std::process::id()));
		if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
			let file_layer = tracing_subscriber::fmt::layer()
				.with_writer(file)
				.with_ansi(false)
				.with_target(true);
			tracing_subscriber::registry()
				.with(filter())
				.with(file_layer)
				.init();
			info!(path = ?log_path, "tracing initialized");
			return;
		}
	}

	tracing_subscriber::fmt()
		.with_env_filter(filter())
		.with_writer(io::stderr)
		.init();
}
