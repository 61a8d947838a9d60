//! Hover, selection and segment highlight state.
//!
//! Three independent sources feed the draw loop: the transient hovered node,
//! the sticky selected node, and an optional segment highlight (matched nodes
//! plus their first-degree neighbors). When drawing, the highest [`Tier`] wins
//! for any given node or edge.

use std::collections::BTreeSet;

use super::types::GraphNode;

/// Highlight tier, ordered by drawing priority (`Selected` wins).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
	Default,
	/// Outside the active segment.
	Dimmed,
	SegmentNeighbor,
	SegmentMember,
	Hovered,
	Selected,
}

/// An active segment highlight.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentHighlight {
	pub id: String,
	/// Nodes whose segment key matched.
	pub members: BTreeSet<usize>,
	/// First-degree neighbors of `members`, excluding the members.
	pub neighbors: BTreeSet<usize>,
}

/// Result of a segment query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentMatch {
	pub found: bool,
	pub count: usize,
	pub neighbor_count: usize,
}

impl SegmentMatch {
	pub const NOT_FOUND: SegmentMatch = SegmentMatch {
		found: false,
		count: 0,
		neighbor_count: 0,
	};
}

/// Owned hover/selection/segment state. Indices always refer to the graph
/// loaded most recently; loading a new graph must call [`SelectionState::reset`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
	hovered: Option<usize>,
	selected: Option<usize>,
	segment: Option<SegmentHighlight>,
}

impl SelectionState {
	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	pub fn selected(&self) -> Option<usize> {
		self.selected
	}

	pub fn segment(&self) -> Option<&SegmentHighlight> {
		self.segment.as_ref()
	}

	pub fn is_empty(&self) -> bool {
		self.hovered.is_none() && self.selected.is_none() && self.segment.is_none()
	}

	pub fn reset(&mut self) {
		*self = Self::default();
	}

	/// Returns true if the hovered node actually changed.
	pub fn set_hovered(&mut self, node: Option<usize>) -> bool {
		if self.hovered == node {
			return false;
		}
		self.hovered = node;
		true
	}

	pub fn select(&mut self, node: usize) {
		self.selected = Some(node);
	}

	/// Drops selection and hover. Returns true if either was set.
	pub fn clear_pointer_state(&mut self) -> bool {
		let had_state = self.selected.is_some() || self.hovered.is_some();
		self.selected = None;
		self.hovered = None;
		had_state
	}

	pub fn set_segment(&mut self, segment: SegmentHighlight) {
		self.segment = Some(segment);
	}

	/// Returns true if a segment highlight was active.
	pub fn clear_segment(&mut self) -> bool {
		self.segment.take().is_some()
	}

	pub fn node_tier(&self, index: usize) -> Tier {
		if self.selected == Some(index) {
			return Tier::Selected;
		}
		if self.hovered == Some(index) {
			return Tier::Hovered;
		}
		match &self.segment {
			Some(seg) if seg.members.contains(&index) => Tier::SegmentMember,
			Some(seg) if seg.neighbors.contains(&index) => Tier::SegmentNeighbor,
			Some(_) => Tier::Dimmed,
			None => Tier::Default,
		}
	}

	/// Edges take the tier of their strongest endpoint for selection/hover;
	/// inside a segment both endpoints must be members to count as a member edge.
	pub fn edge_tier(&self, a: usize, b: usize) -> Tier {
		let touches = |node: Option<usize>| node.is_some_and(|n| n == a || n == b);
		if touches(self.selected) {
			return Tier::Selected;
		}
		if touches(self.hovered) {
			return Tier::Hovered;
		}
		match &self.segment {
			Some(seg) => match (seg.members.contains(&a), seg.members.contains(&b)) {
				(true, true) => Tier::SegmentMember,
				(true, false) | (false, true) => Tier::SegmentNeighbor,
				(false, false) => Tier::Dimmed,
			},
			None => Tier::Default,
		}
	}
}

/// A neighbor of the selected node, for connection listings.
#[derive(Clone, Debug, PartialEq)]
pub struct Connection {
	pub index: usize,
	pub label: String,
	/// Spatial distance between the two node positions.
	pub distance: f64,
}

/// What the info panel receives when a node is selected.
#[derive(Clone, Debug)]
pub struct SelectedNode<'a> {
	pub index: usize,
	pub node: &'a GraphNode,
	/// Direct contacts, nearest first.
	pub connections: Vec<Connection>,
}

/// Info-panel hook, injected at construction.
pub trait SelectionListener {
	/// Called whenever a node becomes selected by click or programmatically.
	fn on_node_selected(&mut self, selected: &SelectedNode<'_>);
	/// Called when the view is reset and the selection dropped.
	fn on_selection_cleared(&mut self);
}

/// Listener that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopListener;

impl SelectionListener for NoopListener {
	fn on_node_selected(&mut self, _selected: &SelectedNode<'_>) {}

	fn on_selection_cleared(&mut self) {}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn with_segment(members: &[usize], neighbors: &[usize]) -> SelectionState {
		let mut state = SelectionState::default();
		state.set_segment(SegmentHighlight {
			id: "42".into(),
			members: members.iter().copied().collect(),
			neighbors: neighbors.iter().copied().collect(),
		});
		state
	}

	#[test]
	fn tiers_follow_priority() {
		let mut state = with_segment(&[1, 2], &[3]);
		state.select(1);
		assert!(state.set_hovered(Some(2)));
		assert_eq!(state.node_tier(1), Tier::Selected);
		assert_eq!(state.node_tier(2), Tier::Hovered);
		assert_eq!(state.node_tier(3), Tier::SegmentNeighbor);
		assert_eq!(state.node_tier(4), Tier::Dimmed);

		state.select(2);
		assert_eq!(state.node_tier(2), Tier::Selected, "selected beats hovered");
		assert_eq!(state.node_tier(1), Tier::SegmentMember);
	}

	#[test]
	fn default_without_any_source() {
		let state = SelectionState::default();
		assert_eq!(state.node_tier(0), Tier::Default);
		assert_eq!(state.edge_tier(0, 1), Tier::Default);
		assert!(state.is_empty());
	}

	#[test]
	fn edge_tiers() {
		let mut state = with_segment(&[1, 2], &[3]);
		assert_eq!(state.edge_tier(1, 2), Tier::SegmentMember);
		assert_eq!(state.edge_tier(3, 2), Tier::SegmentNeighbor);
		assert_eq!(state.edge_tier(3, 4), Tier::Dimmed);
		state.set_hovered(Some(4));
		assert_eq!(state.edge_tier(3, 4), Tier::Hovered);
		state.select(3);
		assert_eq!(state.edge_tier(3, 4), Tier::Selected);
	}

	#[test]
	fn hover_change_detection() {
		let mut state = SelectionState::default();
		assert!(!state.set_hovered(None));
		assert!(state.set_hovered(Some(5)));
		assert!(!state.set_hovered(Some(5)));
		assert!(state.set_hovered(None));
	}

	#[test]
	fn clearing() {
		let mut state = with_segment(&[0], &[]);
		state.select(0);
		assert!(state.clear_pointer_state());
		assert!(!state.clear_pointer_state());
		assert!(state.clear_segment());
		assert!(!state.clear_segment());
		assert!(state.is_empty());
	}
}
