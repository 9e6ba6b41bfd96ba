use rayon::prelude::*;
use tracing::info;

use crate::{
    config::{CorePreparationConfig, EngineConfig},
    error::ConfigurationError,
    graph::GraphStore,
    landmarks::{lm_data::LandmarkSet, lm_preparation::LandmarkPreparation},
    stopwatch::Stopwatch,
    weighting::Weighting,
};

use super::{core_graph::CoreGraph, core_preparation::CorePreparation, core_restrictions::CoreRestrictions};

struct Registration {
    weighting: Box<dyn Weighting>,
    restrictions: CoreRestrictions,
    landmarks: bool,
}

/// Collects the weightings to prepare, then freezes a store and attaches a
/// core graph (and optionally landmarks) for each of them.
pub struct PreparationPipeline {
    config: CorePreparationConfig,
    landmark_count: usize,
    registrations: Vec<Registration>,
    started: bool,
}

impl PreparationPipeline {
    pub fn new(config: &EngineConfig) -> Self {
        PreparationPipeline {
            config: config.preparation.clone(),
            landmark_count: config.landmark_count,
            registrations: Vec::new(),
            started: false,
        }
    }

    pub fn register(
        &mut self,
        weighting: Box<dyn Weighting>,
        restrictions: CoreRestrictions,
        landmarks: bool,
    ) -> Result<(), ConfigurationError> {
        if self.started {
            return Err(ConfigurationError::PreparationStarted(
                weighting.name().to_string(),
            ));
        }

        if self
            .registrations
            .iter()
            .any(|registration| registration.weighting.name() == weighting.name())
        {
            return Err(ConfigurationError::DuplicateWeighting(
                weighting.name().to_string(),
            ));
        }

        self.registrations.push(Registration {
            weighting,
            restrictions,
            landmarks,
        });
        Ok(())
    }

    pub fn weighting_names(&self) -> impl Iterator<Item = &str> {
        self.registrations
            .iter()
            .map(|registration| registration.weighting.name())
    }

    pub fn run(&mut self, mut store: GraphStore) -> Result<GraphStore, ConfigurationError> {
        self.started = true;
        store.freeze();

        for registration in &self.registrations {
            if registration.weighting.profile_slot() >= store.profiles().len() {
                return Err(ConfigurationError::UnknownProfile(
                    registration.weighting.name().to_string(),
                ));
            }
        }

        let mut stopwatch = Stopwatch::new("preparation_pipeline");
        stopwatch.start();

        let prepared = self
            .registrations
            .par_iter()
            .map(|registration| self.prepare(&store, registration))
            .collect::<Result<Vec<_>, ConfigurationError>>()?;

        for (core_graph, landmarks) in prepared {
            store.register_core_graph(core_graph)?;
            if let Some(landmarks) = landmarks {
                store.register_landmarks(landmarks)?;
            }
        }

        stopwatch.stop();
        info!(
            weightings = self.registrations.len(),
            "Prepared graph store in {}ms",
            stopwatch.total_duration().as_millis()
        );

        Ok(store)
    }

    fn prepare(
        &self,
        store: &GraphStore,
        registration: &Registration,
    ) -> Result<(CoreGraph, Option<LandmarkSet>), ConfigurationError> {
        let core_graph = CorePreparation::new(
            store,
            registration.weighting.as_ref(),
            registration.restrictions.clone(),
            self.config.clone(),
        )?
        .prepare();

        let landmarks = (registration.landmarks && self.landmark_count > 0)
            .then(|| LandmarkPreparation::new(&core_graph).create_landmarks(self.landmark_count));

        Ok((core_graph, landmarks))
    }
}
