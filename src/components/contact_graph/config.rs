//! Renderer configuration.
//!
//! Everything here deserializes with `#[serde(default)]`, so a host page can
//! ship a partial JSON document and only override what it cares about.

use serde::Deserialize;

use super::scale::ScaleConfig;
use super::theme::Theme;

/// Pointer interpretation parameters.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
	/// Extra pixels around a node's rendered radius that still count as a hit.
	pub hit_tolerance: f64,
	/// Pointer travel (pixels) after a press before it becomes a drag.
	pub drag_threshold: f64,
	/// Radians of rotation per pixel of drag.
	pub rotate_speed: f64,
	/// Distance multiplier per wheel notch away from the viewer.
	pub wheel_zoom_out: f64,
	/// Distance multiplier per wheel notch toward the viewer.
	pub wheel_zoom_in: f64,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			hit_tolerance: 15.0,
			drag_threshold: 3.0,
			rotate_speed: 0.01,
			wheel_zoom_out: 1.15,
			wheel_zoom_in: 0.87,
		}
	}
}

/// Camera framing for segment highlights.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FocusConfig {
	/// Orbit distance as a multiple of the matched nodes' largest radius from their centroid.
	pub radius_factor: f64,
	/// Lower bound on the orbit distance when focusing.
	pub min_distance: f64,
}

impl Default for FocusConfig {
	fn default() -> Self {
		Self {
			radius_factor: 6.0,
			min_distance: 30.0,
		}
	}
}

impl FocusConfig {
	pub fn distance_for(&self, max_radius: f64) -> f64 {
		(self.radius_factor * max_radius).max(self.min_distance)
	}
}

/// Complete renderer configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
	pub scale: ScaleConfig,
	pub interaction: InteractionConfig,
	pub focus: FocusConfig,
	/// Theme name, see [`Theme::by_name`].
	pub theme: String,
}

impl Default for RendererConfig {
	fn default() -> Self {
		Self {
			scale: ScaleConfig::default(),
			interaction: InteractionConfig::default(),
			focus: FocusConfig::default(),
			theme: "default".to_string(),
		}
	}
}

impl RendererConfig {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	pub fn theme(&self) -> Theme {
		Theme::by_name(&self.theme)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_document_is_default() {
		assert_eq!(RendererConfig::from_json("{}").unwrap(), RendererConfig::default());
	}

	#[test]
	fn overrides_tuning_constants() {
		let config = RendererConfig::from_json(
			r#"{"interaction": {"hit_tolerance": 8}, "focus": {"radius_factor": 4}, "theme": "paper"}"#,
		)
		.unwrap();
		assert_eq!(config.interaction.hit_tolerance, 8.0);
		assert_eq!(config.interaction.drag_threshold, 3.0);
		assert_eq!(config.focus.radius_factor, 4.0);
		assert_eq!(config.focus.min_distance, 30.0);
		assert_eq!(config.theme().name, "paper");
	}

	#[test]
	fn focus_distance_has_a_floor() {
		let focus = FocusConfig::default();
		assert_eq!(focus.distance_for(1.0), 30.0);
		assert_eq!(focus.distance_for(10.0), 60.0);
	}
}
