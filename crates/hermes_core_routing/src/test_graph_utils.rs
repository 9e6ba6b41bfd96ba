#[cfg(test)]
pub mod test_graph {
    use rand::{Rng, SeedableRng, rngs::StdRng};

    use crate::{
        distance::{Distance, Kilometers, Meters, kilometers, meters},
        geopoint::GeoPoint,
        graph::{
            EdgeRecord, Graph, GraphEdge, GraphStore,
            attributes::{BorderAttributes, BorderKind, EdgeAttributes, WayCategory},
        },
        profiles::{EdgeFlags, Profile, ProfileKind},
        types::{EdgeId, NodeId},
        weighting::{FastestWeighting, Weighting},
    };

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RomaniaGraphCity {
        Arad = 0,
        Bucharest = 1,
        Craiova = 2,
        Dobreta = 3,
        Eforie = 4,
        Fagaras = 5,
        Giurgiu = 6,
        Hirsova = 7,
        Iasi = 8,
        Lugoj = 9,
        Mehadia = 10,
        Neamt = 11,
        Oradea = 12,
        Pitesti = 13,
        RimnicuVilcea = 14,
        Sibiu = 15,
        Timisoara = 16,
        Urziceni = 17,
        Vaslui = 18,
        Zerind = 19,
    }

    impl From<RomaniaGraphCity> for usize {
        fn from(value: RomaniaGraphCity) -> Self {
            value as usize
        }
    }

    /// Node coordinates, indexed like `RomaniaGraphCity`.
    const ROMANIA_CITIES: [(f64, f64); 20] = [
        (46.18, 21.31),
        (44.43, 26.10),
        (44.33, 23.80),
        (44.63, 22.66),
        (44.06, 28.63),
        (45.84, 24.97),
        (43.90, 25.97),
        (44.69, 27.95),
        (47.16, 27.59),
        (45.69, 21.90),
        (44.90, 22.36),
        (47.20, 26.37),
        (47.07, 21.94),
        (44.86, 24.87),
        (45.10, 24.37),
        (45.79, 24.15),
        (45.75, 21.23),
        (44.72, 26.64),
        (46.64, 27.73),
        (46.62, 21.52),
    ];

    // https://user-images.githubusercontent.com/43790152/97784960-1a142580-1bc4-11eb-9070-39c03eb16df2.png
    fn get_romania_graph_edges()
    -> Vec<(RomaniaGraphCity, RomaniaGraphCity, Distance<Kilometers>, f64)> {
        use RomaniaGraphCity::*;

        vec![
            (Oradea, Zerind, kilometers!(71), 60.0),
            (Oradea, Sibiu, kilometers!(151), 90.0),
            (Zerind, Arad, kilometers!(75), 60.0),
            (Arad, Sibiu, kilometers!(140), 90.0),
            (Arad, Timisoara, kilometers!(118), 110.0),
            (Timisoara, Lugoj, kilometers!(111), 90.0),
            (Lugoj, Mehadia, kilometers!(70), 60.0),
            (Mehadia, Dobreta, kilometers!(75), 60.0),
            (Dobreta, Craiova, kilometers!(120), 90.0),
            (Craiova, RimnicuVilcea, kilometers!(146), 60.0),
            (Craiova, Pitesti, kilometers!(138), 90.0),
            (RimnicuVilcea, Pitesti, kilometers!(97), 60.0),
            (RimnicuVilcea, Sibiu, kilometers!(80), 90.0),
            (Sibiu, Fagaras, kilometers!(99), 90.0),
            (Fagaras, Bucharest, kilometers!(211), 110.0),
            (Pitesti, Bucharest, kilometers!(101), 110.0),
            (Bucharest, Giurgiu, kilometers!(90), 90.0),
            (Bucharest, Urziceni, kilometers!(85), 90.0),
            (Urziceni, Hirsova, kilometers!(98), 90.0),
            (Hirsova, Eforie, kilometers!(86), 60.0),
            (Urziceni, Vaslui, kilometers!(142), 90.0),
            (Vaslui, Iasi, kilometers!(92), 90.0),
            (Iasi, Neamt, kilometers!(87), 60.0),
        ]
    }

    pub fn car_profile() -> Profile {
        Profile::for_kind(ProfileKind::Car)
    }

    pub fn car_flags(speed: f64, forward: bool, backward: bool) -> u64 {
        EdgeFlags {
            forward_speed: speed,
            backward_speed: speed,
            forward_access: forward,
            backward_access: backward,
            ..EdgeFlags::default()
        }
        .encode(car_profile().speed_factor)
    }

    pub fn car_weighting(store: &GraphStore) -> Box<dyn Weighting> {
        let slot = store.profile_slot("car").unwrap_or(0);
        Box::new(FastestWeighting::new(&car_profile(), slot))
    }

    /// Romania road map with every road open both ways for cars. The store
    /// is left mutable.
    pub fn romania_store() -> GraphStore {
        let mut store = GraphStore::new(["car"]);

        for (lat, lng) in ROMANIA_CITIES {
            store.add_node(GeoPoint::new(lat, lng)).unwrap();
        }

        for (start, end, distance, speed) in get_romania_graph_edges() {
            let distance: Distance<Meters> = distance.into();
            store
                .add_edge(EdgeRecord::new(
                    start.into(),
                    end.into(),
                    distance,
                    vec![],
                    vec![car_flags(speed, true, true)],
                ))
                .unwrap();
        }

        store
    }

    pub fn romania_graph() -> GraphStore {
        let mut store = romania_store();
        store.freeze();
        store
    }

    /// Tolls between Pitesti and Bucharest and a height limit between Sibiu
    /// and Fagaras.
    pub fn romania_graph_with_attributes() -> GraphStore {
        let mut store = romania_store();

        let toll = romania_edge(&store, RomaniaGraphCity::Pitesti, RomaniaGraphCity::Bucharest);
        store
            .edge_attributes_mut(toll)
            .unwrap()
            .way_category
            .insert(WayCategory::TOLLWAYS);

        let low_bridge = romania_edge(&store, RomaniaGraphCity::Sibiu, RomaniaGraphCity::Fagaras);
        store.edge_attributes_mut(low_bridge).unwrap().vehicle.max_height = Some(3.5);

        store.freeze();
        store
    }

    pub fn romania_edge(store: &GraphStore, a: RomaniaGraphCity, b: RomaniaGraphCity) -> EdgeId {
        let (a, b): (NodeId, NodeId) = (a.into(), b.into());
        store
            .node_edges_iter(a)
            .find(|&edge_id| store.edge(edge_id).adj_node(a) == b)
            .unwrap()
    }

    /// Nodes `0..node_count` along the equator, linked by 1 km roads.
    pub fn line_graph(node_count: usize) -> GraphStore {
        let mut store = GraphStore::new(["car"]);
        for i in 0..node_count {
            store.add_node(GeoPoint::new(0.0, i as f64 * 0.009)).unwrap();
        }
        for i in 1..node_count {
            store
                .add_edge(EdgeRecord::new(
                    i - 1,
                    i,
                    meters!(1000),
                    vec![],
                    vec![car_flags(50.0, true, true)],
                ))
                .unwrap();
        }
        store.freeze();
        store
    }

    /// Two countries linked by a single controlled border crossing: nodes 0
    /// to 2 lie in country 1, nodes 3 to 5 in country 2. Returns the store
    /// and the border edge.
    pub fn border_graph() -> (GraphStore, EdgeId) {
        let mut store = GraphStore::new(["car"]);
        for i in 0..6 {
            store.add_node(GeoPoint::new(48.0, 7.0 + i as f64 * 0.01)).unwrap();
        }

        let flags = vec![car_flags(80.0, true, true)];
        let mut border_edge = 0;
        for i in 1..6 {
            let edge_id = store
                .add_edge(EdgeRecord::new(i - 1, i, meters!(740), vec![], flags.clone()))
                .unwrap();

            if i == 3 {
                border_edge = edge_id;
                store
                    .set_edge_attributes(
                        edge_id,
                        EdgeAttributes {
                            border: BorderAttributes::crossing(BorderKind::Controlled, 1, 2),
                            ..EdgeAttributes::default()
                        },
                    )
                    .unwrap();
            }
        }
        store.freeze();

        (store, border_edge)
    }

    /// Random road network: a chain through every node plus random links with
    /// random lengths and speeds, a few of them one-way. About one road in
    /// `1 / toll_share` is tolled.
    pub fn random_graph(node_count: usize, toll_share: f64, seed: u64) -> GraphStore {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut store = GraphStore::new(["car"]);
        for _ in 0..node_count {
            store
                .add_node(GeoPoint::new(rng.random_range(45.0..45.5), rng.random_range(7.0..7.5)))
                .unwrap();
        }

        let links: Vec<(NodeId, NodeId)> = (1..node_count)
            .map(|node| (node - 1, node))
            .chain((0..node_count * 2).map(|_| {
                (rng.random_range(0..node_count), rng.random_range(0..node_count))
            }))
            .collect();

        for (start, end) in links {
            if start == end {
                continue;
            }

            let speed = [30.0, 50.0, 80.0, 110.0][rng.random_range(0..4)];
            let backward = rng.random_range(0..10) > 0;
            let distance: Distance<Meters> = Distance::from(rng.random_range(200_i64..5_000));
            let edge_id = store
                .add_edge(EdgeRecord::new(
                    start,
                    end,
                    distance,
                    vec![],
                    vec![car_flags(speed, true, backward)],
                ))
                .unwrap();

            if rng.random_bool(toll_share) {
                store
                    .edge_attributes_mut(edge_id)
                    .unwrap()
                    .way_category
                    .insert(WayCategory::TOLLWAYS);
            }
        }

        store.freeze();
        store
    }
}
