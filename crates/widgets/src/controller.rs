//! Live widget behavior consumed by the registry.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use crate::descriptor::{IconId, WidgetTitle};

/// Per-frame drawing context handed to widgets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawSettings {
	pub night_mode: bool,
	/// Set when the vector map was re-rendered this frame.
	pub update_vector_rendering: bool,
}

/// A live on-screen widget.
pub trait WidgetController: Send + Sync {
	/// Refreshes the widget's content. Returns `true` if anything changed.
	fn update_info(&self, draw: &DrawSettings) -> bool;

	/// A widget may force itself visible (e.g. while an alert is active),
	/// overriding the configured visibility.
	fn is_explicitly_visible(&self) -> bool {
		false
	}
}

/// One entry of a widget's alternate-state popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateMenuItem {
	pub id: u32,
	pub title: WidgetTitle,
	pub icon: IconId,
}

/// Widgets with several display variants (e.g. time of arrival vs. time to
/// go) expose them through this trait.
pub trait WidgetStateSwitch: Send + Sync {
	fn menu_items(&self) -> Vec<StateMenuItem>;
	fn current(&self) -> u32;
	fn change_state(&self, id: u32);

	fn menu_title(&self) -> Option<WidgetTitle> {
		let current = self.current();
		self.menu_items()
			.into_iter()
			.find(|item| item.id == current)
			.map(|item| item.title)
	}

	fn menu_icon(&self) -> Option<IconId> {
		let current = self.current();
		self.menu_items()
			.into_iter()
			.find(|item| item.id == current)
			.map(|item| item.icon)
	}
}

/// Whether a distance widget should redraw after the distance moved from
/// `old` to `new` meters.
///
/// Small changes (under 100 m and under 1 %) are ignored to avoid flicker.
pub fn distance_changed(old: i32, new: i32) -> bool {
	if old == 0 {
		return true;
	}
	let (old, new) = (i64::from(old), i64::from(new));
	let delta = old - new;
	let relative = ((new - old) as f64 / old as f64).abs();
	!(delta < 100 && relative < 0.01)
}

/// Minimal text widget: a label with optional forced visibility.
#[derive(Debug, Default)]
pub struct TextInfoWidget {
	text: Mutex<String>,
	/// Text differs from what the last `update_info` saw.
	dirty: AtomicBool,
	explicitly_visible: AtomicBool,
	updates: AtomicUsize,
}

impl TextInfoWidget {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn set_text(&self, text: impl Into<String>) {
		let text = text.into();
		let mut current = self.text.lock();
		if *current != text {
			*current = text;
			self.dirty.store(true, Ordering::Relaxed);
		}
	}

	pub fn text(&self) -> String {
		self.text.lock().clone()
	}

	pub fn set_explicitly_visible(&self, visible: bool) {
		self.explicitly_visible.store(visible, Ordering::Relaxed);
	}

	/// Number of `update_info` calls so far.
	pub fn update_count(&self) -> usize {
		self.updates.load(Ordering::Relaxed)
	}
}

impl WidgetController for TextInfoWidget {
	fn update_info(&self, _draw: &DrawSettings) -> bool {
		self.updates.fetch_add(1, Ordering::Relaxed);
		self.dirty.swap(false, Ordering::Relaxed)
	}

	fn is_explicitly_visible(&self) -> bool {
		self.explicitly_visible.load(Ordering::Relaxed)
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	#[rstest]
	#[case::first_value(0, 500, true)]
	#[case::tiny_move(10_000, 9_950, false)]
	#[case::large_relative_move(1_000, 950, true)]
	#[case::over_hundred_meters(50_000, 49_800, true)]
	#[case::moving_away(10_000, 10_050, false)]
	#[case::moving_away_far(10_000, 10_200, true)]
	#[case::opposite_extremes(-2_000_000_000, 2_000_000_000, true)]
	#[case::full_range(i32::MAX, i32::MIN, true)]
	fn test_distance_changed(#[case] old: i32, #[case] new: i32, #[case] expected: bool) {
		assert_eq!(distance_changed(old, new), expected);
	}

	#[test]
	fn test_text_widget_counts_updates() {
		let widget = TextInfoWidget::new();
		let draw = DrawSettings::default();
		assert!(!widget.update_info(&draw));

		widget.set_text("42 km/h");
		assert!(widget.update_info(&draw));
		assert!(!widget.update_info(&draw));
		widget.set_text("42 km/h");
		assert!(!widget.update_info(&draw));
		widget.set_text("43 km/h");
		assert!(widget.update_info(&draw));

		assert_eq!(widget.update_count(), 5);
		assert_eq!(widget.text(), "43 km/h");
		assert!(!widget.is_explicitly_visible());
		widget.set_explicitly_visible(true);
		assert!(widget.is_explicitly_visible());
	}
}
