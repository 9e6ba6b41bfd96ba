use crate::{
    graph::{EdgeAttributes, Graph, GraphEdge, GraphStore},
    weighting::Weighting,
};

/// Kind of edge attribute a request filter may inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RestrictionKind {
    WayCategory,
    Borders,
    Vehicle,
    Wheelchair,
}

impl RestrictionKind {
    pub const ALL: [RestrictionKind; 4] = [
        RestrictionKind::WayCategory,
        RestrictionKind::Borders,
        RestrictionKind::Vehicle,
        RestrictionKind::Wheelchair,
    ];

    /// Whether an edge carries data of this kind.
    pub fn applies_to(&self, attributes: &EdgeAttributes) -> bool {
        match self {
            RestrictionKind::WayCategory => !attributes.way_category.is_empty(),
            RestrictionKind::Borders => attributes.border.is_border(),
            RestrictionKind::Vehicle => !attributes.vehicle.is_empty(),
            RestrictionKind::Wheelchair => !attributes.wheelchair.is_empty(),
        }
    }
}

/// Restriction kinds a core is prepared for. Every endpoint of an edge
/// carrying such an attribute stays in the core, so the filters matching
/// these kinds only ever see original edges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoreRestrictions {
    kinds: Vec<RestrictionKind>,
}

impl CoreRestrictions {
    pub fn new(kinds: impl IntoIterator<Item = RestrictionKind>) -> Self {
        let mut restrictions = CoreRestrictions::default();
        for kind in kinds {
            if !restrictions.kinds.contains(&kind) {
                restrictions.kinds.push(kind);
            }
        }
        restrictions
    }

    pub fn none() -> Self {
        CoreRestrictions::default()
    }

    pub fn all() -> Self {
        CoreRestrictions::new(RestrictionKind::ALL)
    }

    pub fn kinds(&self) -> &[RestrictionKind] {
        &self.kinds
    }

    pub fn contains(&self, kind: RestrictionKind) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn requires_inspection(&self, attributes: &EdgeAttributes) -> bool {
        self.kinds.iter().any(|kind| kind.applies_to(attributes))
    }

    /// Core flag per node. Edges the weighting cannot use are ignored.
    pub fn core_nodes(&self, store: &GraphStore, weighting: &dyn Weighting) -> Vec<bool> {
        let mut core = vec![false; store.node_count()];
        if self.kinds.is_empty() {
            return core;
        }

        for edge in store.edges() {
            if self.requires_inspection(store.edge_attributes(edge.id()))
                && weighting.can_access_edge(edge)
            {
                core[edge.start_node()] = true;
                core[edge.end_node()] = true;
            }
        }

        core
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        graph::attributes::{BorderAttributes, BorderKind, WayCategory},
        test_graph_utils::test_graph::{border_graph, car_weighting},
    };

    use super::*;

    #[test]
    fn should_deduplicate_kinds() {
        let restrictions = CoreRestrictions::new([
            RestrictionKind::Borders,
            RestrictionKind::Borders,
            RestrictionKind::Vehicle,
        ]);
        assert_eq!(restrictions.kinds().len(), 2);
        assert!(restrictions.contains(RestrictionKind::Vehicle));
        assert!(!restrictions.contains(RestrictionKind::Wheelchair));
    }

    #[test]
    fn should_only_inspect_registered_kinds() {
        let attributes = EdgeAttributes {
            way_category: WayCategory::TOLLWAYS,
            ..EdgeAttributes::default()
        };

        assert!(CoreRestrictions::all().requires_inspection(&attributes));
        assert!(!CoreRestrictions::new([RestrictionKind::Borders]).requires_inspection(&attributes));
        assert!(!CoreRestrictions::all().requires_inspection(&EdgeAttributes::default()));

        let border = EdgeAttributes {
            border: BorderAttributes::crossing(BorderKind::Controlled, 1, 2),
            ..EdgeAttributes::default()
        };
        assert!(CoreRestrictions::new([RestrictionKind::Borders]).requires_inspection(&border));
    }

    #[test]
    fn border_endpoints_should_be_core() {
        let (store, border_edge) = border_graph();
        let weighting = car_weighting(&store);

        let core = CoreRestrictions::new([RestrictionKind::Borders]).core_nodes(&store, weighting.as_ref());
        let edge = store.edge(border_edge);

        assert!(core[edge.start_node()]);
        assert!(core[edge.end_node()]);
        assert_eq!(core.iter().filter(|&&is_core| is_core).count(), 2);
        assert!(CoreRestrictions::none().core_nodes(&store, weighting.as_ref()).iter().all(|c| !c));
    }
}
