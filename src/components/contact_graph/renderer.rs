//! The renderer: one owned state struct behind every public operation.
//!
//! [`ContactGraphRenderer`] holds the loaded graph, its adjacency index, the
//! orbit camera, highlight state and the gesture controller. Each operation
//! mutates that state and synchronously redraws through its [`Surface`].

use std::collections::BTreeSet;

use glam::DVec3;
use log::{debug, info};

use super::adjacency::AdjacencyIndex;
use super::camera::{Camera, CameraSnapshot, Projected, Viewport};
use super::config::RendererConfig;
use super::interaction::{Command, InputEvent, InteractionController};
use super::label::{NodeClass, NodeLabel};
use super::render::{FrameInput, Surface, Visibility, node_radius, plan_frame};
use super::selection::{
	Connection, SegmentHighlight, SegmentMatch, SelectedNode, SelectionListener, SelectionState,
};
use super::theme::Theme;
use super::types::{GraphData, GraphEdge, GraphNode};

/// Partial visibility change; `None` leaves a class as it is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisibilityUpdate {
	pub nodes: Option<bool>,
	pub edges: Option<bool>,
}

/// Graph data plus everything decoded from it at load time.
struct LoadedGraph {
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
	labels: Vec<NodeLabel>,
	classes: Vec<NodeClass>,
}

impl LoadedGraph {
	fn new(data: GraphData) -> Self {
		let labels: Vec<NodeLabel> = data.nodes.iter().map(|n| NodeLabel::parse(&n.label)).collect();
		let classes = data
			.nodes
			.iter()
			.zip(&labels)
			.map(|(node, label)| NodeClass::classify(node.element.as_deref(), label))
			.collect();
		Self {
			nodes: data.nodes,
			edges: data.edges,
			labels,
			classes,
		}
	}

	/// Explicit `segment` field if present, else the label's position.
	fn in_segment(&self, index: usize, id: &str) -> bool {
		match self.nodes[index].segment {
			Some(segment) => id.parse::<i64>().is_ok_and(|v| v == segment),
			None => self.labels[index].position() == Some(id),
		}
	}

	fn find_residue(&self, chain: &str, residue: &str, position: &str, atom: Option<&str>) -> Option<usize> {
		let candidates: Vec<(usize, Option<&str>)> = self
			.labels
			.iter()
			.enumerate()
			.filter(|(_, label)| label.is_residue(chain, residue, position))
			.map(|(i, label)| (i, label.atom()))
			.collect();

		let exact = candidates.iter().find(|&&(_, name)| name == atom);
		let fallback = || match atom {
			Some(atom) => candidates
				.iter()
				.find(|&&(_, name)| name.is_some_and(|name| name.starts_with(atom))),
			None => candidates
				.iter()
				.find(|&&(_, name)| name == Some("CA"))
				.or(candidates.first()),
		};
		exact.or_else(fallback).map(|&(index, _)| index)
	}

	fn connections(&self, adjacency: &AdjacencyIndex, index: usize) -> Vec<Connection> {
		let Some(origin) = self.nodes.get(index).map(GraphNode::position) else {
			return Vec::new();
		};
		let mut connections: Vec<Connection> = adjacency
			.neighbors(index)
			.map(|n| Connection {
				index: n,
				label: self.nodes[n].label.clone(),
				distance: origin.distance(self.nodes[n].position()),
			})
			.collect();
		connections.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.index.cmp(&b.index)));
		connections
	}
}

/// Interactive 3D contact graph renderer drawing onto a [`Surface`].
pub struct ContactGraphRenderer<S: Surface> {
	surface: S,
	listener: Box<dyn SelectionListener>,
	config: RendererConfig,
	theme: Theme,
	graph: Option<LoadedGraph>,
	adjacency: AdjacencyIndex,
	camera: Camera,
	/// Camera right after the last load; `reset_view` returns here.
	home: CameraSnapshot,
	/// Orbit distance right after the last load, the 100% zoom reference.
	baseline_distance: f64,
	viewport: Viewport,
	selection: SelectionState,
	controller: InteractionController,
	visibility: Visibility,
	frames_drawn: u64,
}

impl<S: Surface> ContactGraphRenderer<S> {
	/// Binds to `surface`, sized to its container (800×600 if that reports no area).
	pub fn new(mut surface: S, config: RendererConfig, listener: Box<dyn SelectionListener>) -> Self {
		let (width, height) = surface.container_size();
		let viewport = Viewport::new(width, height);
		surface.resize(viewport.width, viewport.height);
		let camera = Camera::default();
		Self {
			surface,
			listener,
			theme: config.theme(),
			controller: InteractionController::new(config.interaction.clone()),
			config,
			graph: None,
			adjacency: AdjacencyIndex::default(),
			home: camera.snapshot(),
			baseline_distance: camera.distance(),
			camera,
			viewport,
			selection: SelectionState::default(),
			visibility: Visibility::default(),
			frames_drawn: 0,
		}
	}

	/// Replaces the scene: rebuilds adjacency, drops all highlight state,
	/// fits the camera to the bounding box and redraws. A previous selection
	/// is reported to the listener as cleared.
	pub fn load_graph(&mut self, data: GraphData) {
		let bbox = data.bounding_box();
		let graph = LoadedGraph::new(data);
		self.adjacency = AdjacencyIndex::build(graph.nodes.len(), &graph.edges);
		info!(
			"contact-graph: loaded {} nodes, {} edges",
			graph.nodes.len(),
			graph.edges.len()
		);
		self.graph = Some(graph);
		let had_selection = self.selection.selected().is_some();
		self.selection.reset();
		if had_selection {
			self.listener.on_selection_cleared();
		}
		self.controller = InteractionController::new(self.config.interaction.clone());
		self.camera.fit(&bbox, &self.viewport);
		self.home = self.camera.snapshot();
		self.baseline_distance = self.camera.distance();
		self.redraw();
	}

	/// Discards the graph and highlight state and blanks the surface. The
	/// camera is left as it is.
	pub fn clear(&mut self) {
		self.graph = None;
		self.adjacency = AdjacencyIndex::default();
		self.selection.reset();
		self.surface.blank();
		debug!("contact-graph: cleared");
	}

	/// Releases the surface. Consumes the renderer, so it runs at most once.
	pub fn destroy(mut self) {
		self.surface.release();
		info!("contact-graph: destroyed after {} frames", self.frames_drawn);
	}

	/// Shows or hides nodes and edges, then redraws.
	pub fn set_visibility(&mut self, update: VisibilityUpdate) {
		if let Some(nodes) = update.nodes {
			self.visibility.nodes = nodes;
		}
		if let Some(edges) = update.edges {
			self.visibility.edges = edges;
		}
		self.redraw();
	}

	/// Which primitive classes are currently drawn.
	pub fn visibility(&self) -> Visibility {
		self.visibility
	}

	/// Highlights every node whose segment key equals `id`, plus their direct
	/// neighbors, and focuses the camera on them. Any previous segment
	/// highlight is cleared first, also when nothing matches.
	pub fn highlight_segment(&mut self, id: &str) -> SegmentMatch {
		let id = id.trim();
		let had_segment = self.selection.clear_segment();

		let members: BTreeSet<usize> = match &self.graph {
			Some(graph) if !id.is_empty() => (0..graph.nodes.len())
				.filter(|&i| graph.in_segment(i, id))
				.collect(),
			_ => BTreeSet::new(),
		};
		let Some(graph) = self.graph.as_ref().filter(|_| !members.is_empty()) else {
			debug!("contact-graph: segment {:?} not found", id);
			if had_segment {
				self.redraw();
			}
			return SegmentMatch::NOT_FOUND;
		};

		let neighbors = self.adjacency.frontier(&members);
		let positions: Vec<DVec3> = members.iter().map(|&i| graph.nodes[i].position()).collect();
		let centroid = positions.iter().fold(DVec3::ZERO, |sum, &p| sum + p) * (1.0 / positions.len() as f64);
		let max_radius = positions
			.iter()
			.map(|p| p.distance(centroid))
			.fold(0.0, f64::max);
		self.camera
			.focus(centroid, self.config.focus.distance_for(max_radius));

		let found = SegmentMatch {
			found: true,
			count: members.len(),
			neighbor_count: neighbors.len(),
		};
		debug!(
			"contact-graph: segment {} matched {} nodes, {} neighbors",
			id, found.count, found.neighbor_count
		);
		self.selection.set_segment(SegmentHighlight {
			id: id.to_string(),
			members,
			neighbors,
		});
		self.redraw();
		found
	}

	/// Drops the segment highlight. No-op (and no redraw) when none is active.
	pub fn clear_segment_highlight(&mut self) {
		if self.selection.clear_segment() {
			self.redraw();
		}
	}

	/// Selects node `index` and notifies the listener. Out-of-range indices
	/// are ignored.
	pub fn select_node_by_index(&mut self, index: usize) {
		if index >= self.node_count() {
			debug!("contact-graph: select index {} out of range", index);
			return;
		}
		self.select(index);
	}

	/// Selects the node labelled `chain:residue:position[:atom]`.
	///
	/// Tries an exact match first. With an atom name, falls back to atoms
	/// whose name starts with it; without one, falls back to any atom of the
	/// residue, preferring `CA`.
	pub fn select_node_by_residue(
		&mut self,
		chain: &str,
		residue: &str,
		position: &str,
		atom: Option<&str>,
	) -> bool {
		let atom = atom.map(str::trim).filter(|a| !a.is_empty());
		let found = self
			.graph
			.as_ref()
			.and_then(|g| g.find_residue(chain.trim(), residue.trim(), position.trim(), atom));
		match found {
			Some(index) => {
				self.select(index);
				true
			}
			None => {
				debug!(
					"contact-graph: no node for {}:{}:{} {:?}",
					chain, residue, position, atom
				);
				false
			}
		}
	}

	/// Restores the load-time camera, drops selection and hover, and tells
	/// the listener.
	pub fn reset_view(&mut self) {
		self.camera.restore(&self.home);
		self.selection.clear_pointer_state();
		self.listener.on_selection_cleared();
		self.redraw();
	}

	/// Moves the camera one step closer and redraws.
	pub fn zoom_in(&mut self) {
		self.camera.zoom_in();
		self.redraw();
	}

	/// Moves the camera one step back and redraws.
	pub fn zoom_out(&mut self) {
		self.camera.zoom_out();
		self.redraw();
	}

	/// Re-reads the container size and recalibrates the focal length.
	pub fn resize(&mut self) {
		let (width, height) = self.surface.container_size();
		self.viewport = Viewport::new(width, height);
		self.surface.resize(self.viewport.width, self.viewport.height);
		if self.graph.is_some() {
			self.redraw();
		}
	}

	/// Feeds a raw input event through the gesture controller and applies
	/// the resulting command, if any.
	pub fn handle_input(&mut self, event: InputEvent) -> Option<Command> {
		let command = self.controller.handle(event)?;
		self.dispatch(command);
		Some(command)
	}

	/// Applies one command.
	pub fn dispatch(&mut self, command: Command) {
		match command {
			Command::Rotate { dyaw, dpitch } => {
				self.camera.rotate(dyaw, dpitch);
				self.redraw();
			}
			Command::Pan { dx, dy } => {
				self.camera.pan(dx, dy);
				self.redraw();
			}
			Command::Zoom { factor } => {
				self.camera.zoom_by(factor);
				self.redraw();
			}
			Command::HoverProbe { x, y } => {
				let hit = self.hit_test(x, y);
				if self.selection.set_hovered(hit) {
					self.redraw();
				}
			}
			Command::HoverClear => {
				if self.selection.set_hovered(None) {
					self.redraw();
				}
			}
			Command::Click { x, y } => {
				if let Some(index) = self.hit_test(x, y) {
					self.select(index);
				}
			}
			Command::Reset => self.reset_view(),
		}
	}

	/// Nearest drawn node whose disc, widened by the hit tolerance, contains
	/// the screen point.
	pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
		let graph = self.graph.as_ref().filter(|_| self.visibility.nodes)?;
		let tolerance = self.config.interaction.hit_tolerance;
		let mut best: Option<(usize, f64)> = None;
		for (index, node) in graph.nodes.iter().enumerate() {
			let p = self.camera.project(node.position(), &self.viewport);
			let radius = node_radius(index, &p, &self.selection, &self.adjacency, &self.config.scale);
			let distance = (p.x - x).hypot(p.y - y);
			if distance <= radius + tolerance && best.is_none_or(|(_, d)| distance < d) {
				best = Some((index, distance));
			}
		}
		best.map(|(index, _)| index)
	}

	/// Current hover, selection and segment state.
	pub fn selection(&self) -> &SelectionState {
		&self.selection
	}

	/// The orbit camera.
	pub fn camera(&self) -> &Camera {
		&self.camera
	}

	/// Neighbor index of the loaded graph.
	pub fn adjacency(&self) -> &AdjacencyIndex {
		&self.adjacency
	}

	/// The surface frames are presented to.
	pub fn surface(&self) -> &S {
		&self.surface
	}

	/// Current drawing size and focal length.
	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	/// CSS cursor for the current gesture.
	pub fn cursor(&self) -> &'static str {
		self.controller.cursor()
	}

	/// Number of loaded nodes; zero before the first load.
	pub fn node_count(&self) -> usize {
		self.graph.as_ref().map_or(0, |g| g.nodes.len())
	}

	/// Loaded node `index`, if any.
	pub fn node(&self, index: usize) -> Option<&GraphNode> {
		self.graph.as_ref()?.nodes.get(index)
	}

	/// Current screen projection of node `index`.
	pub fn project_node(&self, index: usize) -> Option<Projected> {
		let node = self.node(index)?;
		Some(self.camera.project(node.position(), &self.viewport))
	}

	/// Direct contacts of node `index`, nearest first.
	pub fn connections(&self, index: usize) -> Vec<Connection> {
		self.graph
			.as_ref()
			.map(|g| g.connections(&self.adjacency, index))
			.unwrap_or_default()
	}

	/// Frames presented since construction.
	pub fn frames_drawn(&self) -> u64 {
		self.frames_drawn
	}

	fn select(&mut self, index: usize) {
		self.selection.select(index);
		if let Some(graph) = &self.graph {
			let selected = SelectedNode {
				index,
				node: &graph.nodes[index],
				connections: graph.connections(&self.adjacency, index),
			};
			debug!(
				"contact-graph: selected {} ({} connections)",
				selected.node.label,
				selected.connections.len()
			);
			self.listener.on_node_selected(&selected);
		}
		self.redraw();
	}

	fn redraw(&mut self) {
		let (nodes, edges, classes): (&[GraphNode], &[GraphEdge], &[NodeClass]) = match &self.graph {
			Some(g) => (&g.nodes, &g.edges, &g.classes),
			None => (&[], &[], &[]),
		};
		let frame = plan_frame(&FrameInput {
			nodes,
			classes,
			edges,
			adjacency: &self.adjacency,
			camera: &self.camera,
			viewport: &self.viewport,
			selection: &self.selection,
			visibility: self.visibility,
			scale: &self.config.scale,
			theme: &self.theme,
			baseline_distance: self.baseline_distance,
		});
		self.surface.present(&frame);
		self.frames_drawn += 1;
	}
}
