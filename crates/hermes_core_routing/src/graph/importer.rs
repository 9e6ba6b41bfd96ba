use fxhash::FxHashMap;
use tracing::{debug, info, warn};

use crate::{
    error::{ConfigurationError, DataAnomaly, EncoderError},
    geopoint::GeoPoint,
    profiles::{
        BarrierAccess, EdgeFlags, EncodedWay, ProfileEncoder, RawNode, RawWay,
        way_attributes::edge_attributes,
    },
    stopwatch::Stopwatch,
    types::NodeId,
};

use super::{edge_record::EdgeRecord, graph_store::GraphStore};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub ways: usize,
    pub accepted_ways: usize,
    pub rejected_ways: usize,
    /// Ways skipped because of a data anomaly.
    pub skipped_ways: usize,
    pub edges: usize,
    /// Way segments dropped because a barrier blocks every profile.
    pub blocked_segments: usize,
}

/// Builds a graph store out of raw nodes and ways, encoding every way once
/// per profile. Each pair of consecutive way nodes becomes one edge.
pub struct GraphImporter {
    encoders: Vec<ProfileEncoder>,
}

/// Raw node data resolved for one way.
struct WayNode<'a> {
    raw: &'a RawNode,
    blocks: Vec<bool>,
}

impl GraphImporter {
    pub fn new(encoders: Vec<ProfileEncoder>) -> Self {
        GraphImporter { encoders }
    }

    pub fn encoders(&self) -> &[ProfileEncoder] {
        &self.encoders
    }

    pub fn import(
        &self,
        nodes: &[RawNode],
        ways: &[RawWay],
    ) -> Result<(GraphStore, ImportReport), ConfigurationError> {
        let mut stopwatch = Stopwatch::new("import");
        stopwatch.start();

        let mut store = GraphStore::new(self.encoders.iter().map(|encoder| encoder.name()));
        let mut report = ImportReport::default();

        let mut raw_nodes: FxHashMap<i64, &RawNode> = FxHashMap::default();
        for node in nodes {
            if !node.point.is_valid() {
                warn!("{}", DataAnomaly::InvalidCoordinates { node: node.id });
                continue;
            }
            raw_nodes.insert(node.id, node);
        }

        // Store ids are only given to nodes used by an imported edge.
        let mut node_ids: FxHashMap<i64, NodeId> = FxHashMap::default();

        for way in ways {
            report.ways += 1;

            match self.import_way(way, &raw_nodes, &mut node_ids, &mut store, &mut report) {
                Ok(true) => report.accepted_ways += 1,
                Ok(false) => report.rejected_ways += 1,
                Err(EncoderError::Anomaly(anomaly)) => {
                    warn!("Skipping way: {}", anomaly);
                    report.skipped_ways += 1;
                }
                Err(EncoderError::Configuration(error)) => return Err(error),
            }
        }

        stopwatch.stop();
        info!(
            ways = report.ways,
            accepted = report.accepted_ways,
            skipped = report.skipped_ways,
            edges = report.edges,
            "Imported graph in {}ms",
            stopwatch.total_duration().as_millis()
        );

        Ok((store, report))
    }

    /// Returns whether any profile accepted the way.
    fn import_way(
        &self,
        way: &RawWay,
        raw_nodes: &FxHashMap<i64, &RawNode>,
        node_ids: &mut FxHashMap<i64, NodeId>,
        store: &mut GraphStore,
        report: &mut ImportReport,
    ) -> Result<bool, EncoderError> {
        let way_nodes = way
            .nodes
            .iter()
            .map(|id| {
                let raw = raw_nodes
                    .get(id)
                    .copied()
                    .ok_or(DataAnomaly::UnknownNode { way: way.id, node: *id })?;
                let blocks = self
                    .encoders
                    .iter()
                    .map(|encoder| encoder.barrier_access(raw) == BarrierAccess::Block)
                    .collect();
                Ok(WayNode { raw, blocks })
            })
            .collect::<Result<Vec<_>, DataAnomaly>>()?;

        let geometry: Vec<GeoPoint> = way_nodes.iter().map(|node| node.raw.point).collect();
        let encoded = if way.geometry.is_some() {
            self.encode_way(way)?
        } else {
            let with_geometry = RawWay {
                geometry: Some(geometry.clone()),
                ..way.clone()
            };
            self.encode_way(&with_geometry)?
        };

        if encoded.iter().all(Option::is_none) {
            debug!(way = way.id, "No profile accepts way");
            return Ok(false);
        }

        let attributes = edge_attributes(&way.tags);

        for (index, segment) in way_nodes.windows(2).enumerate() {
            let (start, end) = (&segment[0], &segment[1]);

            // The first segment also counts the first node of the way.
            let counted = if index == 0 {
                vec![start.raw, end.raw]
            } else {
                vec![end.raw]
            };

            let mut accessible = false;
            let flags = self
                .encoders
                .iter()
                .zip(&encoded)
                .enumerate()
                .map(|(slot, (encoder, flags))| {
                    let Some(mut flags) = *flags else {
                        return 0;
                    };

                    if start.blocks[slot] || end.blocks[slot] {
                        flags = flags.blocked();
                    }
                    accessible |= flags.has_access();

                    let (signals, crossings) = encoder.node_counters(counted.iter().copied());
                    flags.traffic_signals = signals;
                    flags.crossings = crossings;
                    flags.encode(encoder.profile().speed_factor)
                })
                .collect::<Vec<u64>>();

            if !accessible {
                report.blocked_segments += 1;
                continue;
            }

            let base_node = Self::node_id(start.raw, node_ids, store)?;
            let adj_node = Self::node_id(end.raw, node_ids, store)?;
            let points = vec![geometry[index], geometry[index + 1]];
            let distance = points[0].haversine_distance(&points[1]);

            let edge_id = store.add_edge(EdgeRecord::new(base_node, adj_node, distance, points, flags))?;
            store.set_edge_attributes(edge_id, attributes)?;
            report.edges += 1;
        }

        Ok(true)
    }

    fn encode_way(&self, way: &RawWay) -> Result<Vec<Option<EdgeFlags>>, EncoderError> {
        self.encoders
            .iter()
            .map(|encoder| {
                Ok(match encoder.encode(way)? {
                    EncodedWay::Accept(flags) => Some(flags),
                    EncodedWay::Reject(_) => None,
                })
            })
            .collect()
    }

    fn node_id(
        node: &RawNode,
        node_ids: &mut FxHashMap<i64, NodeId>,
        store: &mut GraphStore,
    ) -> Result<NodeId, ConfigurationError> {
        if let Some(node_id) = node_ids.get(&node.id) {
            return Ok(*node_id);
        }

        let node_id = store.add_node(node.point)?;
        node_ids.insert(node.id, node_id);
        Ok(node_id)
    }
}
