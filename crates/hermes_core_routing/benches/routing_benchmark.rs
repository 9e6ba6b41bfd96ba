use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use hermes_core_routing::{
    ch::{
        core_restrictions::{CoreRestrictions, RestrictionKind},
        preparation_pipeline::PreparationPipeline,
    },
    config::EngineConfig,
    distance::{Distance, Meters},
    geopoint::GeoPoint,
    graph::{EdgeRecord, GraphStore, attributes::WayCategory},
    profiles::{EdgeFlags, Profile, ProfileEncoder, ProfileKind},
    routing::{RouteOptions, RouteRequest, RoutingEngine},
    weighting::FastestWeighting,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

const GRID_SIZE: usize = 60;
const CELL_DEGREES: f64 = 0.005;

fn grid_point(row: usize, col: usize) -> GeoPoint {
    GeoPoint::new(45.0 + row as f64 * CELL_DEGREES, 7.0 + col as f64 * CELL_DEGREES)
}

/// Square grid of two-way roads with random speeds, one road in fifty is
/// tolled.
fn grid_store(rng: &mut StdRng) -> GraphStore {
    let profile = Profile::for_kind(ProfileKind::Car);
    let mut store = GraphStore::new(["car"]);

    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            store.add_node(grid_point(row, col)).unwrap();
        }
    }

    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let node = row * GRID_SIZE + col;
            let mut neighbors = Vec::with_capacity(2);
            if col + 1 < GRID_SIZE {
                neighbors.push(node + 1);
            }
            if row + 1 < GRID_SIZE {
                neighbors.push(node + GRID_SIZE);
            }

            for neighbor in neighbors {
                let speed = [30.0, 50.0, 70.0, 90.0][rng.random_range(0..4)];
                let flags = EdgeFlags {
                    forward_speed: speed,
                    backward_speed: speed,
                    forward_access: true,
                    backward_access: true,
                    ..EdgeFlags::default()
                }
                .encode(profile.speed_factor);

                let distance: Distance<Meters> = Distance::from(400.0);
                let edge_id = store
                    .add_edge(EdgeRecord::new(node, neighbor, distance, vec![], vec![flags]))
                    .unwrap();

                if rng.random_range(0..50) == 0 {
                    store
                        .edge_attributes_mut(edge_id)
                        .unwrap()
                        .way_category
                        .insert(WayCategory::TOLLWAYS);
                }
            }
        }
    }

    store
}

fn routing_benchmark(c: &mut Criterion) {
    if std::env::var_os("HERMES_BENCH_LOG").is_some() {
        tracing_subscriber::fmt::init();
    }

    let mut rng = StdRng::seed_from_u64(7);
    let store = grid_store(&mut rng);

    let config = EngineConfig {
        landmark_count: 8,
        ..EngineConfig::default()
    };
    let profile = Profile::for_kind(ProfileKind::Car);
    let mut pipeline = PreparationPipeline::new(&config);
    pipeline
        .register(
            Box::new(FastestWeighting::new(&profile, 0)),
            CoreRestrictions::new([RestrictionKind::WayCategory]),
            true,
        )
        .unwrap();
    let store = pipeline.run(store).unwrap();

    let engine = RoutingEngine::new(store, vec![ProfileEncoder::new(profile).unwrap()], config).unwrap();

    let requests: Vec<RouteRequest> = (0..32)
        .map(|_| {
            let from = grid_point(rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE));
            let to = grid_point(rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE));
            RouteRequest::new(vec![from, to], "car")
        })
        .collect();

    let variants = [
        ("core_alt", RouteOptions::default()),
        (
            "core_dijkstra",
            RouteOptions {
                disable_landmarks: true,
                ..RouteOptions::default()
            },
        ),
        (
            "bidirectional_dijkstra",
            RouteOptions {
                disable_core: true,
                ..RouteOptions::default()
            },
        ),
    ];

    for (name, options) in variants {
        let requests: Vec<RouteRequest> = requests
            .iter()
            .cloned()
            .map(|mut request| {
                request.options = options.clone();
                request
            })
            .collect();

        c.bench_function(&format!("route grid ({name})"), |b| {
            b.iter(|| {
                for request in &requests {
                    let _ = black_box(engine.route(black_box(request)));
                }
            })
        });
    }
}

criterion_group!(benches, routing_benchmark);
criterion_main!(benches);
