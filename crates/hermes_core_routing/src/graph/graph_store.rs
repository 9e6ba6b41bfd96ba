use fxhash::FxHashMap;
use tracing::info;

use crate::{
    ch::core_graph::CoreGraph,
    edge_direction::EdgeDirection,
    error::ConfigurationError,
    geopoint::GeoPoint,
    landmarks::lm_data::LandmarkSet,
    types::{EdgeId, NodeId},
    weighting::Weighting,
};

use super::{
    Graph, GraphEdge,
    attributes::EdgeAttributes,
    edge_record::EdgeRecord,
    location_index::{LocationIndex, Snap},
};

/// Nodes, original edges and per-weighting preprocessing results. The store
/// is mutable until `freeze`, after which only named sub-stores can be
/// registered.
#[derive(Debug, Default)]
pub struct GraphStore {
    profiles: Vec<String>,
    nodes: Vec<GeoPoint>,
    edges: Vec<EdgeRecord>,
    attributes: Vec<EdgeAttributes>,
    adjacency_list: Vec<Vec<EdgeId>>,
    frozen: bool,

    core_graphs: FxHashMap<String, CoreGraph>,
    landmarks: FxHashMap<String, LandmarkSet>,
    location_index: Option<LocationIndex>,
}

impl GraphStore {
    pub fn new<S: Into<String>>(profiles: impl IntoIterator<Item = S>) -> Self {
        GraphStore {
            profiles: profiles.into_iter().map(Into::into).collect(),
            ..GraphStore::default()
        }
    }

    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }

    pub fn profile_slot(&self, profile: &str) -> Option<usize> {
        self.profiles.iter().position(|name| name == profile)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn ensure_mutable(&self) -> Result<(), ConfigurationError> {
        if self.frozen {
            return Err(ConfigurationError::StoreFrozen);
        }
        Ok(())
    }

    pub fn add_node(&mut self, point: GeoPoint) -> Result<NodeId, ConfigurationError> {
        self.ensure_mutable()?;

        let node_id = self.nodes.len();
        self.nodes.push(point);
        self.adjacency_list.push(Vec::new());
        Ok(node_id)
    }

    pub fn add_edge(&mut self, mut edge: EdgeRecord) -> Result<EdgeId, ConfigurationError> {
        self.ensure_mutable()?;

        for node in [edge.start_node(), edge.end_node()] {
            if node >= self.nodes.len() {
                return Err(ConfigurationError::UnknownNode(node));
            }
        }

        if edge.flag_words().len() != self.profiles.len() {
            return Err(ConfigurationError::FlagsMismatch {
                expected: self.profiles.len(),
                actual: edge.flag_words().len(),
            });
        }

        if edge.geometry().len() < 2 {
            edge.set_geometry(vec![
                self.nodes[edge.start_node()],
                self.nodes[edge.end_node()],
            ]);
        }

        let edge_id = self.edges.len();
        edge.set_id(edge_id);

        self.adjacency_list[edge.start_node()].push(edge_id);
        if edge.end_node() != edge.start_node() {
            self.adjacency_list[edge.end_node()].push(edge_id);
        }
        self.edges.push(edge);
        self.attributes.push(EdgeAttributes::default());

        Ok(edge_id)
    }

    pub fn set_edge_attributes(
        &mut self,
        edge: EdgeId,
        attributes: EdgeAttributes,
    ) -> Result<(), ConfigurationError> {
        *self.edge_attributes_mut(edge)? = attributes;
        Ok(())
    }

    pub fn edge_attributes_mut(
        &mut self,
        edge: EdgeId,
    ) -> Result<&mut EdgeAttributes, ConfigurationError> {
        self.ensure_mutable()?;
        self.attributes
            .get_mut(edge)
            .ok_or(ConfigurationError::UnknownEdge(edge))
    }

    /// Ends the mutable phase and builds the location index. Freezing twice
    /// is a no-op.
    pub fn freeze(&mut self) {
        if self.frozen {
            return;
        }

        self.location_index = Some(LocationIndex::build(self));
        self.frozen = true;

        info!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            "Froze graph store"
        );
    }

    pub fn edge_attributes(&self, edge: EdgeId) -> &EdgeAttributes {
        &self.attributes[edge]
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    pub fn register_core_graph(&mut self, core_graph: CoreGraph) -> Result<(), ConfigurationError> {
        if !self.frozen {
            return Err(ConfigurationError::StoreNotFrozen("registering a core graph"));
        }

        let name = core_graph.weighting_name().to_string();
        if self.core_graphs.contains_key(&name) {
            return Err(ConfigurationError::DuplicateSubStore {
                kind: "core graph",
                name,
            });
        }

        self.core_graphs.insert(name, core_graph);
        Ok(())
    }

    pub fn core_graph(&self, weighting: &str) -> Option<&CoreGraph> {
        self.core_graphs.get(weighting)
    }

    pub fn register_landmarks(&mut self, landmarks: LandmarkSet) -> Result<(), ConfigurationError> {
        if !self.frozen {
            return Err(ConfigurationError::StoreNotFrozen("registering landmarks"));
        }

        let name = landmarks.weighting_name().to_string();
        if self.landmarks.contains_key(&name) {
            return Err(ConfigurationError::DuplicateSubStore {
                kind: "landmark set",
                name,
            });
        }

        self.landmarks.insert(name, landmarks);
        Ok(())
    }

    /// Landmarks registered under `name`. A core graph looks its landmarks up
    /// by its own weighting name, a mismatch means they were computed for
    /// another weighting.
    pub fn landmarks(&self, name: &str) -> Option<&LandmarkSet> {
        self.landmarks.get(name)
    }

    pub fn location_index(&self) -> Option<&LocationIndex> {
        self.location_index.as_ref()
    }

    /// Nearest node reachable by `weighting`, `None` before freeze or when no
    /// accessible edge exists.
    pub fn snap(&self, weighting: &dyn Weighting, point: &GeoPoint) -> Option<Snap> {
        self.location_index
            .as_ref()?
            .snap(self, weighting, point)
    }
}

impl Graph for GraphStore {
    type Edge = EdgeRecord;
    type EdgeIterator<'a> = std::iter::Copied<std::slice::Iter<'a, EdgeId>>;

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node_edges_iter(&self, node: NodeId) -> Self::EdgeIterator<'_> {
        self.adjacency_list[node].iter().copied()
    }

    fn edge(&self, edge: EdgeId) -> &EdgeRecord {
        &self.edges[edge]
    }

    fn node_geometry(&self, node: NodeId) -> &GeoPoint {
        &self.nodes[node]
    }

    fn edge_direction(&self, edge_id: EdgeId, start: NodeId) -> EdgeDirection {
        let edge = &self.edges[edge_id];

        if edge.start_node() == start {
            return EdgeDirection::Forward;
        }

        debug_assert_eq!(
            edge.end_node(),
            start,
            "node {start} is not an end of edge {edge_id}"
        );
        EdgeDirection::Backward
    }
}

#[cfg(test)]
mod tests {
    use crate::{distance::meters, landmarks::lm_data::LandmarkSet};

    use super::*;

    fn store() -> GraphStore {
        let mut store = GraphStore::new(["car", "foot"]);
        let a = store.add_node(GeoPoint::new(0.0, 0.0)).unwrap();
        let b = store.add_node(GeoPoint::new(0.0, 0.01)).unwrap();
        store
            .add_edge(EdgeRecord::new(a, b, meters!(1100), vec![], vec![0, 0]))
            .unwrap();
        store
    }

    #[test]
    fn should_fill_missing_geometry() {
        let store = store();
        let edge = store.edge(0);

        assert_eq!(edge.id(), 0);
        assert_eq!(edge.geometry().len(), 2);
        assert_eq!(edge.geometry()[1], GeoPoint::new(0.0, 0.01));
        assert_eq!(store.edge_direction(0, 1), EdgeDirection::Backward);
        assert_eq!(store.node_edges_iter(1).collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn should_validate_edges() {
        let mut store = store();

        assert_eq!(
            store.add_edge(EdgeRecord::new(0, 7, meters!(1), vec![], vec![0, 0])),
            Err(ConfigurationError::UnknownNode(7))
        );
        assert_eq!(
            store.add_edge(EdgeRecord::new(0, 1, meters!(1), vec![], vec![0])),
            Err(ConfigurationError::FlagsMismatch {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn frozen_store_should_reject_mutations() {
        let mut store = store();
        store.freeze();
        store.freeze();

        assert!(store.is_frozen());
        assert!(store.location_index().is_some());
        assert_eq!(
            store.add_node(GeoPoint::new(1.0, 1.0)),
            Err(ConfigurationError::StoreFrozen)
        );
        assert_eq!(
            store.set_edge_attributes(0, EdgeAttributes::default()),
            Err(ConfigurationError::StoreFrozen)
        );
    }

    #[test]
    fn sub_stores_require_frozen_store_and_unique_names() {
        let mut store = store();
        let landmarks = || LandmarkSet::new(String::from("car_fastest"), vec![], vec![], vec![]);

        assert_eq!(
            store.register_landmarks(landmarks()),
            Err(ConfigurationError::StoreNotFrozen("registering landmarks"))
        );

        store.freeze();
        assert_eq!(store.register_landmarks(landmarks()), Ok(()));
        assert!(matches!(
            store.register_landmarks(landmarks()),
            Err(ConfigurationError::DuplicateSubStore { .. })
        ));
        assert!(store.landmarks("car_fastest").is_some());
        assert!(store.landmarks("car_shortest").is_none());
    }

    #[test]
    fn should_resolve_profile_slots() {
        let store = store();
        assert_eq!(store.profile_slot("foot"), Some(1));
        assert_eq!(store.profile_slot("bike"), None);
    }
}
