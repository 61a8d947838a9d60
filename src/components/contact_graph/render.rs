//! Frame planning and canvas painting.
//!
//! Drawing is split in two:
//! 1. [`plan_frame`] projects every node once, depth-sorts nodes and edges
//!    back-to-front (painter's algorithm) and resolves each primitive's size
//!    and color from the highlight tiers. The result is a plain [`Frame`].
//! 2. A [`Surface`] paints the frame. [`CanvasSurface`] does it with a 2D
//!    canvas context: background, edges, nodes, then the stats overlay.

use std::f64::consts::PI;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::adjacency::AdjacencyIndex;
use super::camera::{Camera, Projected, Viewport};
use super::label::NodeClass;
use super::scale::ScaleConfig;
use super::selection::{SelectionState, Tier};
use super::theme::{BackgroundStyle, Color, Theme};
use super::types::{GraphEdge, GraphNode};

/// Offset added to depth before scaling; depth 0 shades at 0.5.
const SHADE_NEAR: f64 = 150.0;
const SHADE_RANGE: f64 = 300.0;
const SHADE_FLOOR: f64 = 0.3;
/// How much a node at the shading floor darkens.
const NODE_DEPTH_DARKEN: f64 = 0.4;

/// Which primitive classes are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visibility {
	pub nodes: bool,
	pub edges: bool,
}

impl Default for Visibility {
	fn default() -> Self {
		Self {
			nodes: true,
			edges: true,
		}
	}
}

/// Subtle depth cue in `[0.3, 1]`, computed as `(depth + 150) / 300`.
pub fn depth_shade(depth: f64) -> f64 {
	((depth + SHADE_NEAR) / SHADE_RANGE).clamp(SHADE_FLOOR, 1.0)
}

/// One contact line, in screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStroke {
	pub source: usize,
	pub target: usize,
	pub from: (f64, f64),
	pub to: (f64, f64),
	pub width: f64,
	pub color: Color,
	pub dash: Option<(f64, f64)>,
	pub tier: Tier,
}

/// One node disc, in screen space.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDisc {
	pub index: usize,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub depth: f64,
	pub color: Color,
	pub tier: Tier,
	/// Outline drawn just outside the disc for selected/hovered nodes.
	pub ring: Option<Color>,
}

/// Fixed stats text in the corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
	pub lines: Vec<String>,
	pub color: Color,
	pub font: &'static str,
}

/// Everything needed to paint one frame, back-to-front.
#[derive(Clone, Debug)]
pub struct Frame {
	pub width: f64,
	pub height: f64,
	pub background: BackgroundStyle,
	pub node_gradient: bool,
	pub node_border: Option<(Color, f64)>,
	/// Farthest first.
	pub edges: Vec<EdgeStroke>,
	/// Farthest first.
	pub nodes: Vec<NodeDisc>,
	pub overlay: Overlay,
}

/// Borrowed view of the renderer state that a frame is computed from.
pub struct FrameInput<'a> {
	pub nodes: &'a [GraphNode],
	pub classes: &'a [NodeClass],
	pub edges: &'a [GraphEdge],
	pub adjacency: &'a AdjacencyIndex,
	pub camera: &'a Camera,
	pub viewport: &'a Viewport,
	pub selection: &'a SelectionState,
	pub visibility: Visibility,
	pub scale: &'a ScaleConfig,
	pub theme: &'a Theme,
	/// Orbit distance right after the last load; 100% zoom.
	pub baseline_distance: f64,
}

/// On-screen radius of node `index`, including highlight multipliers.
pub fn node_radius(
	index: usize,
	projected: &Projected,
	selection: &SelectionState,
	adjacency: &AdjacencyIndex,
	scale: &ScaleConfig,
) -> f64 {
	let mut radius = scale.node_radius(projected.scale);
	if selection.selected() == Some(index) {
		radius *= scale.node.selected;
	}
	if selection.hovered() == Some(index) {
		radius *= scale.node.hovered;
	}
	if selection
		.selected()
		.is_some_and(|s| adjacency.contains(s, index))
	{
		radius *= scale.node.selection_neighbor;
	}
	if selection
		.segment()
		.is_some_and(|seg| seg.members.contains(&index))
	{
		radius *= scale.node.segment;
	}
	radius
}

/// Computes the full frame: projection, depth sort and styling.
pub fn plan_frame(input: &FrameInput<'_>) -> Frame {
	let FrameInput {
		nodes,
		classes,
		edges,
		adjacency,
		camera,
		viewport,
		selection,
		visibility,
		scale,
		theme,
		baseline_distance,
	} = *input;

	let projected: Vec<Projected> = nodes
		.iter()
		.map(|n| camera.project(n.position(), viewport))
		.collect();

	let mut edge_strokes = Vec::new();
	if visibility.edges {
		let mut order: Vec<(f64, &GraphEdge)> = edges
			.iter()
			.filter(|e| e.source != e.target && e.source < nodes.len() && e.target < nodes.len())
			.map(|e| {
				let depth = (projected[e.source].depth + projected[e.target].depth) / 2.0;
				(depth, e)
			})
			.collect();
		order.sort_by(|a, b| b.0.total_cmp(&a.0));

		edge_strokes.reserve(order.len());
		for (depth, edge) in order {
			let (a, b) = (&projected[edge.source], &projected[edge.target]);
			let tier = selection.edge_tier(edge.source, edge.target);
			let (color, width, dash) = edge_style(tier, scale, theme);
			edge_strokes.push(EdgeStroke {
				source: edge.source,
				target: edge.target,
				from: (a.x, a.y),
				to: (b.x, b.y),
				width,
				color: color.fade(depth_shade(depth)),
				dash,
				tier,
			});
		}
	}

	let mut node_discs = Vec::new();
	if visibility.nodes {
		let mut order: Vec<usize> = (0..nodes.len()).collect();
		order.sort_by(|&a, &b| projected[b].depth.total_cmp(&projected[a].depth));

		node_discs.reserve(order.len());
		for index in order {
			let p = &projected[index];
			let tier = selection.node_tier(index);
			let class = classes.get(index).copied().unwrap_or(NodeClass::Generic);
			let base = theme.palette.color(class);
			let highlight = &theme.highlight;
			let color = match tier {
				Tier::Selected => highlight.selected,
				Tier::Hovered => highlight.hovered,
				Tier::SegmentMember => highlight.segment,
				Tier::SegmentNeighbor => highlight.segment_neighbor,
				Tier::Dimmed => base.fade(highlight.dimmed_alpha),
				Tier::Default => base,
			};
			let color = color.darken((1.0 - depth_shade(p.depth)) * NODE_DEPTH_DARKEN);
			let ring = matches!(tier, Tier::Selected | Tier::Hovered).then_some(highlight.ring);
			node_discs.push(NodeDisc {
				index,
				x: p.x,
				y: p.y,
				radius: node_radius(index, p, selection, adjacency, scale),
				depth: p.depth,
				color,
				tier,
				ring,
			});
		}
	}

	let zoom_percent = if camera.distance() > 0.0 {
		baseline_distance / camera.distance() * 100.0
	} else {
		100.0
	};
	let mut lines = vec![format!(
		"{} nodes · {} edges · zoom {:.0}%",
		nodes.len(),
		edges.len(),
		zoom_percent
	)];
	if let Some(seg) = selection.segment() {
		lines.push(format!(
			"segment {}: {} matched, {} neighbors",
			seg.id,
			seg.members.len(),
			seg.neighbors.len()
		));
	}

	Frame {
		width: viewport.width,
		height: viewport.height,
		background: theme.background.clone(),
		node_gradient: theme.node.use_gradient,
		node_border: (theme.node.border_width > 0.0)
			.then_some((theme.node.border_color, theme.node.border_width)),
		edges: edge_strokes,
		nodes: node_discs,
		overlay: Overlay {
			lines,
			color: theme.overlay.color,
			font: theme.overlay.font,
		},
	}
}

fn edge_style(tier: Tier, scale: &ScaleConfig, theme: &Theme) -> (Color, f64, Option<(f64, f64)>) {
	let widths = &scale.edge;
	let highlight = &theme.highlight;
	match tier {
		Tier::Selected => (highlight.selected, widths.selected, None),
		Tier::Hovered => (highlight.hovered, widths.hovered, None),
		Tier::SegmentMember => (highlight.segment, widths.segment, None),
		Tier::SegmentNeighbor => (
			highlight.segment_neighbor,
			widths.segment_neighbor,
			Some(widths.neighbor_dash),
		),
		Tier::Dimmed => (
			theme.edge.color.fade(highlight.dimmed_alpha),
			widths.dimmed,
			None,
		),
		Tier::Default => (theme.edge.color, widths.width, None),
	}
}

/// Where frames end up. The renderer owns exactly one.
pub trait Surface {
	/// Size the host container currently reports. May be zero.
	fn container_size(&self) -> (f64, f64);
	/// Resets the drawing buffer to the given dimensions.
	fn resize(&mut self, width: f64, height: f64);
	/// Paints a complete frame, replacing whatever was there.
	fn present(&mut self, frame: &Frame);
	/// Clears to transparent.
	fn blank(&mut self);
	/// Frees the drawing buffer. Called once, from `destroy`.
	fn release(&mut self) {}
}

/// [`Surface`] backed by an HTML canvas element.
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	/// Size to the window instead of the parent element.
	fullscreen: bool,
}

impl CanvasSurface {
	/// Returns `None` if the canvas has no 2D context.
	pub fn new(canvas: HtmlCanvasElement, fullscreen: bool) -> Option<Self> {
		let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;
		Some(Self {
			canvas,
			ctx,
			fullscreen,
		})
	}

	pub fn set_cursor(&self, cursor: &str) {
		let _ = self.canvas.style().set_property("cursor", cursor);
	}
}

impl Surface for CanvasSurface {
	fn container_size(&self) -> (f64, f64) {
		if self.fullscreen {
			let Some(window) = web_sys::window() else {
				return (0.0, 0.0);
			};
			let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
			(dim(window.inner_width()), dim(window.inner_height()))
		} else {
			self.canvas
				.parent_element()
				.map(|p| (p.client_width() as f64, p.client_height() as f64))
				.unwrap_or((0.0, 0.0))
		}
	}

	fn resize(&mut self, width: f64, height: f64) {
		self.canvas.set_width(width as u32);
		self.canvas.set_height(height as u32);
	}

	fn present(&mut self, frame: &Frame) {
		paint(&self.ctx, frame);
	}

	fn blank(&mut self) {
		self.ctx.clear_rect(
			0.0,
			0.0,
			self.canvas.width() as f64,
			self.canvas.height() as f64,
		);
	}

	fn release(&mut self) {
		self.blank();
		self.canvas.set_width(0);
		self.canvas.set_height(0);
	}
}

/// Paints a planned frame onto a 2D context.
pub fn paint(ctx: &CanvasRenderingContext2d, frame: &Frame) {
	ctx.clear_rect(0.0, 0.0, frame.width, frame.height);
	draw_background(ctx, frame);
	draw_edges(ctx, &frame.edges);
	draw_nodes(ctx, frame);
	if frame.background.vignette > 0.0 {
		draw_vignette(ctx, frame);
	}
	draw_overlay(ctx, frame);
}

fn draw_background(ctx: &CanvasRenderingContext2d, frame: &Frame) {
	let bg = &frame.background;
	let (cx, cy) = (frame.width / 2.0, frame.height / 2.0);
	match bg
		.use_gradient
		.then(|| ctx.create_radial_gradient(cx, cy, 0.0, cx, cy, frame.width.max(frame.height) * 0.8))
	{
		Some(Ok(gradient)) => {
			let _ = gradient.add_color_stop(0.0, &bg.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &bg.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		_ => ctx.set_fill_style_str(&bg.color.to_css()),
	}
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
}

fn draw_vignette(ctx: &CanvasRenderingContext2d, frame: &Frame) {
	let (cx, cy) = (frame.width / 2.0, frame.height / 2.0);
	let Ok(gradient) = ctx.create_radial_gradient(
		cx,
		cy,
		frame.width.min(frame.height) * 0.3,
		cx,
		cy,
		frame.width.max(frame.height) * 0.7,
	) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(
		1.0,
		&format!("rgba(0, 0, 0, {})", frame.background.vignette),
	);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, frame.width, frame.height);
}

fn draw_edges(ctx: &CanvasRenderingContext2d, edges: &[EdgeStroke]) {
	ctx.set_line_cap("round");
	let solid = js_sys::Array::new();
	for edge in edges {
		ctx.set_stroke_style_str(&edge.color.to_css());
		ctx.set_line_width(edge.width);
		match edge.dash {
			Some((dash, gap)) => {
				let _ = ctx.set_line_dash(&js_sys::Array::of2(
					&JsValue::from_f64(dash),
					&JsValue::from_f64(gap),
				));
			}
			None => {
				let _ = ctx.set_line_dash(&solid);
			}
		}
		ctx.begin_path();
		ctx.move_to(edge.from.0, edge.from.1);
		ctx.line_to(edge.to.0, edge.to.1);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&solid);
}

fn draw_nodes(ctx: &CanvasRenderingContext2d, frame: &Frame) {
	for node in &frame.nodes {
		let (x, y, radius) = (node.x, node.y, node.radius);
		if radius <= 0.0 || !x.is_finite() || !y.is_finite() {
			continue;
		}
		ctx.set_global_alpha(node.color.a);
		let opaque = node.color.with_alpha(1.0);

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		match frame.node_gradient.then(|| {
			ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
		}) {
			Some(Ok(gradient)) => {
				let _ = gradient.add_color_stop(0.0, &opaque.lighten(0.4).to_css());
				let _ = gradient.add_color_stop(0.7, &opaque.to_css());
				let _ = gradient.add_color_stop(1.0, &opaque.darken(0.2).to_css());
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
			}
			_ => ctx.set_fill_style_str(&opaque.to_css()),
		}
		ctx.fill();

		if let Some((color, width)) = frame.node_border {
			ctx.set_stroke_style_str(&color.to_css());
			ctx.set_line_width(width);
			ctx.stroke();
		}
		ctx.set_global_alpha(1.0);

		if let Some(ring) = node.ring {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.5, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&ring.to_css());
			ctx.set_line_width(1.5);
			ctx.stroke();
		}
	}
}

fn draw_overlay(ctx: &CanvasRenderingContext2d, frame: &Frame) {
	let overlay = &frame.overlay;
	ctx.set_font(overlay.font);
	ctx.set_fill_style_str(&overlay.color.to_css());
	let line_height = 16.0;
	let bottom = frame.height - 10.0;
	for (i, line) in overlay.lines.iter().rev().enumerate() {
		let _ = ctx.fill_text(line, 10.0, bottom - i as f64 * line_height);
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeSet;

	use super::*;
	use crate::components::contact_graph::selection::SegmentHighlight;
	use crate::components::contact_graph::types::BoundingBox;

	struct Fixture {
		nodes: Vec<GraphNode>,
		classes: Vec<NodeClass>,
		edges: Vec<GraphEdge>,
		adjacency: AdjacencyIndex,
		camera: Camera,
		viewport: Viewport,
		selection: SelectionState,
		scale: ScaleConfig,
		theme: Theme,
	}

	impl Fixture {
		/// A chain of nodes along the view axis, the first one nearest the viewer.
		fn chain(count: usize) -> Self {
			let nodes: Vec<GraphNode> = (0..count)
				.map(|i| GraphNode {
					z: i as f64 * 5.0,
					label: format!("A:ALA:{}", i + 1),
					..GraphNode::default()
				})
				.collect();
			let edges: Vec<GraphEdge> = (1..count).map(|i| GraphEdge::new(i - 1, i)).collect();
			let viewport = Viewport::default();
			let mut camera = Camera::default();
			let bbox = BoundingBox::from_points(nodes.iter().map(GraphNode::position))
				.unwrap_or(BoundingBox::UNIT);
			camera.fit(&bbox, &viewport);
			// Face straight down +z so depth follows the node index.
			camera.rotate(-camera.yaw(), -camera.pitch());
			Self {
				classes: vec![NodeClass::Generic; count],
				adjacency: AdjacencyIndex::build(count, &edges),
				nodes,
				edges,
				camera,
				viewport,
				selection: SelectionState::default(),
				scale: ScaleConfig::default(),
				theme: Theme::default(),
			}
		}

		fn plan(&self, visibility: Visibility) -> Frame {
			plan_frame(&FrameInput {
				nodes: &self.nodes,
				classes: &self.classes,
				edges: &self.edges,
				adjacency: &self.adjacency,
				camera: &self.camera,
				viewport: &self.viewport,
				selection: &self.selection,
				visibility,
				scale: &self.scale,
				theme: &self.theme,
				baseline_distance: self.camera.distance(),
			})
		}
	}

	#[test]
	fn nodes_and_edges_paint_back_to_front() {
		let fixture = Fixture::chain(5);
		let frame = fixture.plan(Visibility::default());
		let order: Vec<usize> = frame.nodes.iter().map(|n| n.index).collect();
		assert_eq!(order, vec![4, 3, 2, 1, 0]);
		for pair in frame.nodes.windows(2) {
			assert!(pair[0].depth >= pair[1].depth);
		}
		let edge_order: Vec<(usize, usize)> =
			frame.edges.iter().map(|e| (e.source, e.target)).collect();
		assert_eq!(edge_order, vec![(3, 4), (2, 3), (1, 2), (0, 1)]);
	}

	#[test]
	fn nearer_nodes_are_larger() {
		let fixture = Fixture::chain(3);
		let frame = fixture.plan(Visibility::default());
		assert!(frame.nodes[2].radius >= frame.nodes[0].radius);
	}

	#[test]
	fn visibility_filters_primitives() {
		let fixture = Fixture::chain(4);
		let frame = fixture.plan(Visibility {
			nodes: false,
			edges: true,
		});
		assert!(frame.nodes.is_empty());
		assert_eq!(frame.edges.len(), 3);
		let frame = fixture.plan(Visibility {
			nodes: true,
			edges: false,
		});
		assert!(frame.edges.is_empty());
		assert_eq!(frame.nodes.len(), 4);
		assert!(frame.overlay.lines[0].starts_with("4 nodes · 3 edges · zoom 100%"));
	}

	#[test]
	fn highlight_overrides_palette_and_grows_nodes() {
		let mut fixture = Fixture::chain(4);
		let plain = fixture.plan(Visibility::default());
		fixture.selection.select(1);
		let frame = fixture.plan(Visibility::default());
		let disc = |f: &Frame, i: usize| f.nodes.iter().find(|n| n.index == i).cloned().unwrap();

		let selected = disc(&frame, 1);
		assert_eq!(selected.tier, Tier::Selected);
		assert_eq!(selected.color.with_alpha(1.0).r, {
			let shade = depth_shade(selected.depth);
			fixture
				.theme
				.highlight
				.selected
				.darken((1.0 - shade) * NODE_DEPTH_DARKEN)
				.r
		});
		assert!(selected.ring.is_some());
		assert!(selected.radius > disc(&plain, 1).radius);
		// Neighbor of the selected node grows too, a non-neighbor does not.
		assert!(disc(&frame, 2).radius > disc(&plain, 2).radius);
		assert_eq!(disc(&frame, 3).radius, disc(&plain, 3).radius);
		let touching = frame.edges.iter().filter(|e| e.tier == Tier::Selected).count();
		assert_eq!(touching, 2);
	}

	#[test]
	fn segment_dims_everything_else() {
		let mut fixture = Fixture::chain(5);
		fixture.selection.set_segment(SegmentHighlight {
			id: "3".into(),
			members: BTreeSet::from([2]),
			neighbors: BTreeSet::from([1, 3]),
		});
		let frame = fixture.plan(Visibility::default());
		let tier = |i: usize| frame.nodes.iter().find(|n| n.index == i).map(|n| n.tier);
		assert_eq!(tier(2), Some(Tier::SegmentMember));
		assert_eq!(tier(1), Some(Tier::SegmentNeighbor));
		assert_eq!(tier(4), Some(Tier::Dimmed));
		let dimmed = frame.nodes.iter().find(|n| n.index == 4).unwrap();
		assert!(dimmed.color.a < 0.5);
		let dashed: Vec<_> = frame.edges.iter().filter(|e| e.dash.is_some()).collect();
		assert_eq!(dashed.len(), 2);
		assert_eq!(frame.overlay.lines[1], "segment 3: 1 matched, 2 neighbors");
	}

	#[test]
	fn depth_shade_is_clamped() {
		assert_eq!(depth_shade(-1000.0), 0.3);
		assert_eq!(depth_shade(1000.0), 1.0);
		assert_eq!(depth_shade(0.0), 0.5);
		assert_eq!(depth_shade(-100.0), 0.3);
		assert!((depth_shade(100.0) - 250.0 / 300.0).abs() < 1e-12);
	}

	#[test]
	fn invalid_edges_are_not_drawn() {
		let mut fixture = Fixture::chain(2);
		fixture.edges.push(GraphEdge::new(0, 9));
		fixture.edges.push(GraphEdge::new(1, 1));
		let frame = fixture.plan(Visibility::default());
		assert_eq!(frame.edges.len(), 1);
	}
}
