use tracing::warn;

use crate::{
    constants::{MAX_DURATION, MAX_WEIGHT},
    distance::{Distance, Meters},
    edge_direction::EdgeDirection,
    graph::{DirectedEdgeAccess, GraphEdge},
    types::{EdgeId, NodeId},
    weighting::{Milliseconds, Weight},
};

use super::{core_restrictions::CoreRestrictions, shortcut::Shortcut};

/// Original edge as seen by the weighting the core was prepared with.
#[derive(Debug, Clone, PartialEq)]
pub struct CoreBaseEdge {
    pub id: EdgeId,
    pub start: NodeId,
    pub end: NodeId,
    pub distance: Distance<Meters>,
    pub forward_weight: Weight,
    pub backward_weight: Weight,
    pub forward_time: Milliseconds,
    pub backward_time: Milliseconds,
}

impl CoreBaseEdge {
    pub fn weight(&self, direction: EdgeDirection) -> Weight {
        match direction {
            EdgeDirection::Forward => self.forward_weight,
            EdgeDirection::Backward => self.backward_weight,
        }
    }

    pub fn time(&self, direction: EdgeDirection) -> Milliseconds {
        match direction {
            EdgeDirection::Forward => self.forward_time,
            EdgeDirection::Backward => self.backward_time,
        }
    }

    pub fn direction_from(&self, node: NodeId) -> EdgeDirection {
        if node == self.start {
            EdgeDirection::Forward
        } else {
            EdgeDirection::Backward
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoreGraphEdge {
    Edge(CoreBaseEdge),
    Shortcut(Shortcut),
}

impl CoreGraphEdge {
    pub fn id(&self) -> EdgeId {
        match self {
            CoreGraphEdge::Edge(edge) => edge.id,
            CoreGraphEdge::Shortcut(shortcut) => shortcut.id,
        }
    }

    pub fn is_shortcut(&self) -> bool {
        matches!(self, CoreGraphEdge::Shortcut(_))
    }

    /// Weight of the edge when leaving `node`, `MAX_WEIGHT` if it cannot be
    /// traversed that way.
    pub fn weight_from(&self, node: NodeId) -> Weight {
        match self {
            CoreGraphEdge::Edge(edge) => edge.weight(edge.direction_from(node)),
            CoreGraphEdge::Shortcut(shortcut) if node == shortcut.start => shortcut.weight,
            CoreGraphEdge::Shortcut(_) => MAX_WEIGHT,
        }
    }

    /// Weight of the edge when arriving at `node`.
    pub fn weight_to(&self, node: NodeId) -> Weight {
        self.weight_from(self.adj_node(node))
    }

    pub fn time_from(&self, node: NodeId) -> Milliseconds {
        match self {
            CoreGraphEdge::Edge(edge) => edge.time(edge.direction_from(node)),
            CoreGraphEdge::Shortcut(shortcut) if node == shortcut.start => shortcut.time,
            CoreGraphEdge::Shortcut(_) => MAX_DURATION,
        }
    }
}

impl GraphEdge for CoreGraphEdge {
    fn start_node(&self) -> NodeId {
        match self {
            CoreGraphEdge::Edge(edge) => edge.start,
            CoreGraphEdge::Shortcut(shortcut) => shortcut.start,
        }
    }

    fn end_node(&self) -> NodeId {
        match self {
            CoreGraphEdge::Edge(edge) => edge.end,
            CoreGraphEdge::Shortcut(shortcut) => shortcut.end,
        }
    }

    fn distance(&self) -> Distance<Meters> {
        match self {
            CoreGraphEdge::Edge(edge) => edge.distance,
            CoreGraphEdge::Shortcut(shortcut) => shortcut.distance,
        }
    }
}

/// Contraction hierarchy of one weighting whose highest level, the core, is
/// left uncontracted.
///
/// Edge ids of original edges are the store ids, shortcut ids follow the
/// last store edge. Contracted nodes only keep edges towards higher ranked
/// nodes, core nodes keep every edge to other core nodes.
#[derive(Debug)]
pub struct CoreGraph {
    weighting_name: String,
    restrictions: CoreRestrictions,
    edges: Vec<Option<CoreGraphEdge>>,
    ranks: Vec<usize>,
    core: Vec<bool>,
    core_level: usize,
    shortcut_count: usize,

    upward_outgoing: Vec<Vec<EdgeId>>,
    upward_incoming: Vec<Vec<EdgeId>>,
    core_outgoing: Vec<Vec<EdgeId>>,
    core_incoming: Vec<Vec<EdgeId>>,
}

impl CoreGraph {
    pub(crate) fn new(
        weighting_name: String,
        restrictions: CoreRestrictions,
        edges: Vec<Option<CoreGraphEdge>>,
        ranks: Vec<usize>,
        core: Vec<bool>,
    ) -> Self {
        let node_count = ranks.len();
        let core_level = ranks
            .iter()
            .zip(&core)
            .filter(|(_, is_core)| **is_core)
            .map(|(rank, _)| *rank)
            .min()
            .unwrap_or(node_count);

        let mut core_graph = CoreGraph {
            weighting_name,
            restrictions,
            shortcut_count: edges.iter().flatten().filter(|edge| edge.is_shortcut()).count(),
            edges,
            ranks,
            core,
            core_level,
            upward_outgoing: vec![Vec::new(); node_count],
            upward_incoming: vec![Vec::new(); node_count],
            core_outgoing: vec![Vec::new(); node_count],
            core_incoming: vec![Vec::new(); node_count],
        };
        core_graph.build_adjacency();

        core_graph
    }

    fn build_adjacency(&mut self) {
        for edge in self.edges.iter().flatten() {
            let (start, end) = (edge.start_node(), edge.end_node());
            if start == end {
                continue;
            }

            let forward = edge.weight_from(start) != MAX_WEIGHT;
            let backward = edge.weight_from(end) != MAX_WEIGHT;

            if self.core[start] && self.core[end] {
                if forward {
                    self.core_outgoing[start].push(edge.id());
                    self.core_incoming[end].push(edge.id());
                }
                if backward {
                    self.core_outgoing[end].push(edge.id());
                    self.core_incoming[start].push(edge.id());
                }
                continue;
            }

            // Stored at the lower ranked end, which is never a core node
            let (low, leaving_low, entering_low) = if self.ranks[start] < self.ranks[end] {
                (start, forward, backward)
            } else {
                (end, backward, forward)
            };

            if leaving_low {
                self.upward_outgoing[low].push(edge.id());
            }
            if entering_low {
                self.upward_incoming[low].push(edge.id());
            }
        }
    }

    pub fn weighting_name(&self) -> &str {
        &self.weighting_name
    }

    pub fn restrictions(&self) -> &CoreRestrictions {
        &self.restrictions
    }

    pub fn node_count(&self) -> usize {
        self.ranks.len()
    }

    /// Number of edge ids, original edges without access included.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn shortcut_count(&self) -> usize {
        self.shortcut_count
    }

    pub fn shortcuts(&self) -> impl Iterator<Item = &Shortcut> {
        self.edges.iter().flatten().filter_map(|edge| match edge {
            CoreGraphEdge::Shortcut(shortcut) => Some(shortcut),
            CoreGraphEdge::Edge(_) => None,
        })
    }

    /// `None` for original edges the weighting cannot use.
    pub fn edge(&self, edge_id: EdgeId) -> Option<&CoreGraphEdge> {
        self.edges.get(edge_id).and_then(Option::as_ref)
    }

    pub fn rank(&self, node: NodeId) -> usize {
        self.ranks[node]
    }

    pub fn is_core(&self, node: NodeId) -> bool {
        self.core[node]
    }

    /// Rank of the lowest core node, the node count without core.
    pub fn core_level(&self) -> usize {
        self.core_level
    }

    pub fn core_node_count(&self) -> usize {
        self.core.iter().filter(|is_core| **is_core).count()
    }

    pub fn core_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.core
            .iter()
            .enumerate()
            .filter(|(_, is_core)| **is_core)
            .map(|(node, _)| node)
    }

    pub fn upward_outgoing(&self, node: NodeId) -> &[EdgeId] {
        &self.upward_outgoing[node]
    }

    pub fn upward_incoming(&self, node: NodeId) -> &[EdgeId] {
        &self.upward_incoming[node]
    }

    pub fn core_outgoing(&self, node: NodeId) -> &[EdgeId] {
        &self.core_outgoing[node]
    }

    pub fn core_incoming(&self, node: NodeId) -> &[EdgeId] {
        &self.core_incoming[node]
    }

    /// Expands `edge_id`, traversed from `from`, into original edges with the
    /// direction each is traversed in.
    pub fn unfold_edge(
        &self,
        edge_id: EdgeId,
        from: NodeId,
        edges: &mut Vec<(EdgeId, EdgeDirection)>,
    ) {
        let Some(edge) = self.edge(edge_id) else {
            debug_assert!(false, "edge {edge_id} is not part of the core graph");
            return;
        };

        match edge {
            CoreGraphEdge::Edge(base_edge) => {
                edges.push((base_edge.id, base_edge.direction_from(from)));
            }
            CoreGraphEdge::Shortcut(shortcut) => {
                debug_assert_eq!(from, shortcut.start, "shortcuts are one-directional");

                let middle_node = match self.edge(shortcut.incoming_edge) {
                    Some(incoming_edge) => incoming_edge.adj_node(shortcut.start),
                    None => return,
                };

                self.unfold_edge(shortcut.incoming_edge, shortcut.start, edges);
                self.unfold_edge(shortcut.outgoing_edge, middle_node, edges);
            }
        }
    }

    /// Verifies every shortcut against the original edges it unfolds to.
    pub fn check(&self) -> bool {
        let mut valid = true;
        let mut unfolded = Vec::new();

        for shortcut in self.shortcuts() {
            unfolded.clear();
            self.unfold_edge(shortcut.id, shortcut.start, &mut unfolded);

            let mut node = shortcut.start;
            let mut weight: Weight = 0;
            let mut time: Milliseconds = 0;
            let mut distance = Distance::<Meters>::default();
            let mut connected = true;

            for &(edge_id, direction) in unfolded.iter() {
                let Some(CoreGraphEdge::Edge(edge)) = self.edge(edge_id) else {
                    connected = false;
                    break;
                };

                let (from, to) = match direction {
                    EdgeDirection::Forward => (edge.start, edge.end),
                    EdgeDirection::Backward => (edge.end, edge.start),
                };

                if from != node {
                    connected = false;
                    break;
                }

                weight = weight.saturating_add(edge.weight(direction));
                time = time.saturating_add(edge.time(direction));
                distance = distance + edge.distance;
                node = to;
            }

            if !connected || node != shortcut.end {
                warn!(shortcut = shortcut.id, "Shortcut does not unfold to a connected path");
                valid = false;
                continue;
            }

            if weight != shortcut.weight || time != shortcut.time || distance != shortcut.distance {
                warn!(
                    shortcut = shortcut.id,
                    expected_weight = weight,
                    actual_weight = shortcut.weight,
                    "Shortcut does not match its original edges"
                );
                valid = false;
            }
        }

        valid
    }
}

impl DirectedEdgeAccess for CoreGraph {
    type EdgeIterator<'a> = std::iter::Copied<std::slice::Iter<'a, EdgeId>>;

    fn node_count(&self) -> usize {
        self.ranks.len()
    }

    fn outgoing_edges(&self, node: NodeId) -> Self::EdgeIterator<'_> {
        self.core_outgoing[node].iter().copied()
    }

    fn incoming_edges(&self, node: NodeId) -> Self::EdgeIterator<'_> {
        self.core_incoming[node].iter().copied()
    }
}
