use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::{
    config::EngineConfig,
    error::{ConfigurationError, RequestError, RouteError},
    graph::GraphStore,
    profiles::ProfileEncoder,
    stopwatch::Stopwatch,
    types::NodeId,
    weighting::{WeightingKind, create_weighting},
};

use super::{
    path_calculator::{PathCalculator, SearchOptions},
    request::RouteRequest,
    routing_path::RoutingPath,
};

/// Entry point for routing requests over a prepared store.
///
/// Requests share the current store through an `Arc`, replacing the store
/// never blocks requests already running on the previous one.
pub struct RoutingEngine {
    store: RwLock<Arc<GraphStore>>,
    config: EngineConfig,
    encoders: Vec<ProfileEncoder>,
}

fn check_profiles(store: &GraphStore, encoders: &[ProfileEncoder]) -> Result<(), ConfigurationError> {
    match encoders
        .iter()
        .find(|encoder| store.profile_slot(encoder.name()).is_none())
    {
        Some(encoder) => Err(ConfigurationError::UnknownProfile(encoder.name().to_string())),
        None => Ok(()),
    }
}

impl RoutingEngine {
    pub fn new(
        mut store: GraphStore,
        encoders: Vec<ProfileEncoder>,
        config: EngineConfig,
    ) -> Result<Self, ConfigurationError> {
        config.validate()?;
        store.freeze();
        check_profiles(&store, &encoders)?;

        Ok(RoutingEngine {
            store: RwLock::new(Arc::new(store)),
            config,
            encoders,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Store used by new requests.
    pub fn store(&self) -> Arc<GraphStore> {
        self.store.read().clone()
    }

    /// Replaces the store and returns the previous one.
    pub fn swap_store(&self, mut store: GraphStore) -> Result<Arc<GraphStore>, ConfigurationError> {
        store.freeze();
        check_profiles(&store, &self.encoders)?;

        let previous = std::mem::replace(&mut *self.store.write(), Arc::new(store));
        info!("Swapped graph store");
        Ok(previous)
    }

    pub fn route(&self, request: &RouteRequest) -> Result<RoutingPath, RouteError> {
        let store = self.store();

        let encoder = self
            .encoders
            .iter()
            .find(|encoder| encoder.name() == request.profile)
            .ok_or_else(|| RequestError::UnsupportedProfile(request.profile.clone()))?;
        let slot = store
            .profile_slot(encoder.name())
            .ok_or_else(|| RequestError::UnsupportedProfile(request.profile.clone()))?;

        let kind = WeightingKind::from_name(&request.weighting)
            .ok_or_else(|| RequestError::UnknownWeighting(request.weighting.clone()))?;

        if self.config.core_mandatory && request.options.disable_core {
            return Err(RequestError::MandatoryOptimization("core").into());
        }

        let max_visited_nodes = request
            .options
            .max_visited_nodes
            .unwrap_or(self.config.default_max_visited_nodes);
        if max_visited_nodes > self.config.max_visited_nodes {
            return Err(RequestError::MaxVisitedNodesAboveLimit {
                requested: max_visited_nodes,
                limit: self.config.max_visited_nodes,
            }
            .into());
        }

        if request.points.len() < 2 {
            return Err(RequestError::TooFewWaypoints(request.points.len()).into());
        }

        for (index, point) in request.points.iter().enumerate() {
            let in_bounds = self
                .config
                .bounds
                .as_ref()
                .is_none_or(|bounds| bounds.contains(point));
            if !point.is_valid() || !in_bounds {
                return Err(RequestError::OutOfBounds {
                    index,
                    lat: point.lat(),
                    lng: point.lng(),
                }
                .into());
            }
        }

        let filters = request.filters.build()?;
        let weighting = create_weighting(kind, encoder.profile(), slot);

        let waypoints = request
            .points
            .iter()
            .enumerate()
            .map(|(index, point)| {
                store
                    .snap(weighting.as_ref(), point)
                    .map(|snap| snap.node)
                    .ok_or(RequestError::UnroutableWaypoint(index))
            })
            .collect::<Result<Vec<NodeId>, RequestError>>()?;

        info!(
            profile = request.profile.as_str(),
            weighting = weighting.name(),
            waypoints = waypoints.len(),
            filters = ?filters,
            "Route request"
        );

        let mut stopwatch = Stopwatch::new("route");
        stopwatch.start();

        let mut calculator = PathCalculator::new(
            &store,
            weighting.as_ref(),
            &filters,
            SearchOptions {
                disable_core: request.options.disable_core,
                disable_landmarks: request.options.disable_landmarks,
                max_visited_nodes,
            },
        );
        let path = calculator.calc_path(&waypoints);

        stopwatch.stop();
        debug!(algorithm = %calculator.algorithm(), "{}", stopwatch);

        path
    }
}
