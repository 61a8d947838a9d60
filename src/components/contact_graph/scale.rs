//! Depth-dependent scaling configuration for graph visuals.
//!
//! This module centralizes the sizing parameters of the draw loop, making it
//! easy to understand and tune how nodes and edges react to perspective and
//! highlight state.
//!
//! # Projection scale
//!
//! Every projected node carries a `scale`: screen pixels per world unit at its
//! depth. Node radii are expressed in world units and multiplied by that scale,
//! so near nodes are larger than far ones and zooming in grows everything.
//!
//! # Scaling Behaviors
//!
//! - [`ScaleBehavior::World`]: scales with perspective and zoom.
//! - [`ScaleBehavior::Screen`]: constant pixel size.
//! - [`ScaleBehavior::Clamped`]: world scaling with min/max pixel bounds, so
//!   far nodes stay clickable and near nodes do not swallow the view.

use serde::Deserialize;

/// Defines how a visual size reacts to the projection scale.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScaleBehavior {
	/// Constant world-space size.
	World,
	/// Constant screen-space size (pixels).
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// Screen-space size for a base value at a given projection scale.
	pub fn apply(&self, base: f64, scale: f64) -> f64 {
		match self {
			ScaleBehavior::World => base * scale,
			ScaleBehavior::Screen => base,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => (base * scale).clamp(*min_screen, max_screen.max(*min_screen)),
		}
	}
}

/// Configuration for node sizing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeScaleConfig {
	/// Base node radius in world units.
	pub radius: f64,
	/// How the node radius reacts to the projection scale.
	pub radius_behavior: ScaleBehavior,
	/// Multiplier for the selected node.
	pub selected: f64,
	/// Multiplier for the hovered node.
	pub hovered: f64,
	/// Multiplier for direct neighbors of the selected node.
	pub selection_neighbor: f64,
	/// Multiplier for members of the highlighted segment.
	pub segment: f64,
}

impl Default for NodeScaleConfig {
	fn default() -> Self {
		Self {
			radius: 0.7,
			radius_behavior: ScaleBehavior::Clamped {
				min_screen: 2.0,
				max_screen: 40.0,
			},
			selected: 1.8,
			hovered: 1.5,
			selection_neighbor: 1.25,
			segment: 1.3,
		}
	}
}

/// Configuration for edge widths, in screen pixels, per highlight tier.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeScaleConfig {
	pub width: f64,
	pub selected: f64,
	pub hovered: f64,
	pub segment: f64,
	pub segment_neighbor: f64,
	pub dimmed: f64,
	/// Dash pattern (dash, gap) for edges leaving a highlighted segment.
	pub neighbor_dash: (f64, f64),
}

impl Default for EdgeScaleConfig {
	fn default() -> Self {
		Self {
			width: 1.2,
			selected: 2.6,
			hovered: 2.0,
			segment: 2.2,
			segment_neighbor: 1.5,
			dimmed: 0.6,
			neighbor_dash: (4.0, 3.0),
		}
	}
}

/// Complete scale configuration for all graph elements.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
}

impl ScaleConfig {
	/// Unhighlighted on-screen radius of a node at projection scale `scale`.
	pub fn node_radius(&self, scale: f64) -> f64 {
		self.node.radius_behavior.apply(self.node.radius, scale)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clamped_radius_respects_bounds() {
		let config = ScaleConfig::default();
		assert_eq!(config.node_radius(0.01), 2.0);
		assert_eq!(config.node_radius(1000.0), 40.0);
		assert!((config.node_radius(10.0) - 7.0).abs() < 1e-9);
	}

	#[test]
	fn behaviors() {
		assert_eq!(ScaleBehavior::World.apply(2.0, 3.0), 6.0);
		assert_eq!(ScaleBehavior::Screen.apply(2.0, 3.0), 2.0);
		let inverted = ScaleBehavior::Clamped {
			min_screen: 5.0,
			max_screen: 1.0,
		};
		assert_eq!(inverted.apply(1.0, 1.0), 5.0);
	}

	#[test]
	fn partial_json_keeps_defaults() {
		let config: ScaleConfig = serde_json::from_str(
			r#"{"node": {"radius": 1.5, "radius_behavior": {"kind": "screen"}}}"#,
		)
		.unwrap();
		assert_eq!(config.node.radius, 1.5);
		assert_eq!(config.node.radius_behavior, ScaleBehavior::Screen);
		assert_eq!(config.node.selected, NodeScaleConfig::default().selected);
		assert_eq!(config.edge, EdgeScaleConfig::default());
	}
}
