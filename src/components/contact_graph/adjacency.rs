//! Symmetric neighbor index over the contact edges.

use std::collections::BTreeSet;

use log::debug;

use super::types::GraphEdge;

/// Maps each node index to the set of nodes it shares a contact with.
///
/// Always symmetric: `j ∈ neighbors(i)` iff `i ∈ neighbors(j)`. Self loops and
/// edges pointing past the node count are skipped.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
	neighbors: Vec<BTreeSet<usize>>,
}

impl AdjacencyIndex {
	pub fn build(node_count: usize, edges: &[GraphEdge]) -> Self {
		let mut neighbors = vec![BTreeSet::new(); node_count];
		let mut skipped = 0usize;
		for edge in edges {
			let (a, b) = (edge.source, edge.target);
			if a == b || a >= node_count || b >= node_count {
				skipped += 1;
				continue;
			}
			neighbors[a].insert(b);
			neighbors[b].insert(a);
		}
		if skipped > 0 {
			debug!("contact-graph: skipped {} invalid edges", skipped);
		}
		Self { neighbors }
	}

	/// Neighbors of `index`, in ascending order. Empty for unknown indices.
	pub fn neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
		self.neighbors
			.get(index)
			.into_iter()
			.flat_map(|set| set.iter().copied())
	}

	pub fn degree(&self, index: usize) -> usize {
		self.neighbors.get(index).map_or(0, BTreeSet::len)
	}

	pub fn contains(&self, a: usize, b: usize) -> bool {
		self.neighbors.get(a).is_some_and(|set| set.contains(&b))
	}

	pub fn node_count(&self) -> usize {
		self.neighbors.len()
	}

	/// First-degree neighbors of `members`, excluding the members themselves.
	pub fn frontier(&self, members: &BTreeSet<usize>) -> BTreeSet<usize> {
		members
			.iter()
			.flat_map(|&m| self.neighbors(m))
			.filter(|n| !members.contains(n))
			.collect()
	}
}
