//! Graph data structures for input to the contact graph renderer.
//!
//! The JSON shape mirrors what structure backends emit:
//!
//! ```json
//! {
//!   "nodes": [{ "x": 1.0, "y": 2.0, "z": 3.0, "label": "A:TRP:42:CA", "element": "C" }],
//!   "edges": [[0, 1]],
//!   "graphMetadata": { "bbox": { "min": [0, 0, 0], "max": [10, 10, 10], "center": [5, 5, 5] } }
//! }
//! ```
//!
//! Missing or `null` collections are treated as empty.

use glam::DVec3;
use serde::{Deserialize, Deserializer};

/// A node in the contact graph (a residue or an atom).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphNode {
	#[serde(default)]
	pub x: f64,
	#[serde(default)]
	pub y: f64,
	#[serde(default)]
	pub z: f64,
	/// Label in `CHAIN:RES:POSITION[:ATOM]` form, e.g. `A:TRP:42` or `A:TRP:42:CA`.
	#[serde(default, deserialize_with = "nullable")]
	pub label: String,
	/// Optional element symbol (e.g. `"C"`, `"N"`). Takes precedence over the
	/// element guessed from the atom name.
	#[serde(default)]
	pub element: Option<String>,
	/// Optional explicit segment key. When present it replaces the label's
	/// position field for segment queries.
	#[serde(default, alias = "residueNumber")]
	pub segment: Option<i64>,
}

impl GraphNode {
	pub fn position(&self) -> DVec3 {
		DVec3::new(self.x, self.y, self.z)
	}
}

/// An undirected contact between two nodes, by index. Serialized as `[i, j]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "[usize; 2]")]
pub struct GraphEdge {
	pub source: usize,
	pub target: usize,
}

impl GraphEdge {
	pub const fn new(source: usize, target: usize) -> Self {
		Self { source, target }
	}
}

impl From<[usize; 2]> for GraphEdge {
	fn from([source, target]: [usize; 2]) -> Self {
		Self { source, target }
	}
}

/// Axis-aligned bounds of the structure, used once at load time to frame the camera.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct BoundingBox {
	pub min: DVec3,
	pub max: DVec3,
	/// Explicit center. Falls back to the midpoint of `min` and `max`.
	#[serde(default)]
	pub center: Option<DVec3>,
}

impl BoundingBox {
	/// Unit box around the origin, used when there is nothing to measure.
	pub const UNIT: BoundingBox = BoundingBox {
		min: DVec3::new(-0.5, -0.5, -0.5),
		max: DVec3::new(0.5, 0.5, 0.5),
		center: None,
	};

	/// Tight bounds around a set of points, or `None` if there are no finite points.
	pub fn from_points(points: impl IntoIterator<Item = DVec3>) -> Option<Self> {
		let mut bounds: Option<(DVec3, DVec3)> = None;
		for p in points.into_iter().filter(|p| p.is_finite()) {
			bounds = Some(match bounds {
				None => (p, p),
				Some((lo, hi)) => (lo.min(p), hi.max(p)),
			});
		}
		bounds.map(|(min, max)| BoundingBox {
			min,
			max,
			center: None,
		})
	}

	pub fn center(&self) -> DVec3 {
		self.center
			.filter(|c| c.is_finite())
			.unwrap_or_else(|| (self.min + self.max) * 0.5)
	}

	/// Largest side length. May be zero or non-finite for degenerate input.
	pub fn max_extent(&self) -> f64 {
		(self.max - self.min).max_element()
	}
}

/// Metadata block shipped alongside the graph.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphMetadata {
	#[serde(default)]
	pub bbox: Option<BoundingBox>,
}

/// Complete graph data: nodes, edges and optional metadata.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphData {
	#[serde(default, deserialize_with = "nullable")]
	pub nodes: Vec<GraphNode>,
	#[serde(default, deserialize_with = "nullable")]
	pub edges: Vec<GraphEdge>,
	#[serde(default)]
	pub graph_metadata: Option<GraphMetadata>,
}

impl GraphData {
	pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(text)
	}

	/// Bounds used to frame the camera: the shipped bbox if present, else
	/// computed from node positions, else [`BoundingBox::UNIT`].
	pub fn bounding_box(&self) -> BoundingBox {
		self.graph_metadata
			.as_ref()
			.and_then(|m| m.bbox)
			.filter(|b| b.min.is_finite() && b.max.is_finite())
			.or_else(|| BoundingBox::from_points(self.nodes.iter().map(GraphNode::position)))
			.unwrap_or(BoundingBox::UNIT)
	}
}

/// Accepts `null` wherever a defaultable value is expected.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
