//! Route pool and round-robin replication into per-entity schedulers.

use std::sync::Arc;

use em_core::{ExternalMovementConfig, MovementMode};
use em_route::{build_routes, Route, RouteError};
use em_spatial::{MapTransform, PathFinder, TopologyGraph};
use em_trace::TraceIngestor;

use crate::{MovementError, MovementResult, MovementScheduler, SpeedSampler, UniformSpeed};

/// Holds every route of one entity group and hands out schedulers.
///
/// Each [`replicate`](Self::replicate) call draws the next route of the pool
/// in order, wrapping after the last, and gives it fresh cursors and a
/// sampler forked for that replica.
pub struct MovementPrototype<P: PathFinder + Clone, S: SpeedSampler> {
    routes:     Vec<Route>,
    graph:      Arc<TopologyGraph>,
    finder:     P,
    sampler:    S,
    mode:       MovementMode,
    next_route: usize,
    replicas:   usize,
}

impl<P: PathFinder + Clone, S: SpeedSampler> MovementPrototype<P, S> {
    pub fn new(
        routes:  Vec<Route>,
        graph:   Arc<TopologyGraph>,
        finder:  P,
        sampler: S,
        mode:    MovementMode,
    ) -> MovementResult<Self> {
        if routes.is_empty() {
            return Err(MovementError::NoRoutes);
        }
        Ok(Self { routes, graph, finder, sampler, mode, next_route: 0, replicas: 0 })
    }

    /// Scheduler for the next entity.
    pub fn replicate(&mut self) -> MovementScheduler<P, S> {
        let route = self.routes[self.next_route].replicate();
        self.next_route = (self.next_route + 1) % self.routes.len();

        let sampler = self.sampler.fork(self.replicas);
        self.replicas += 1;

        MovementScheduler::new(route, Arc::clone(&self.graph), self.finder.clone(), sampler, self.mode)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Number of schedulers handed out so far.
    pub fn replica_count(&self) -> usize {
        self.replicas
    }

    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub fn graph(&self) -> &Arc<TopologyGraph> {
        &self.graph
    }
}

impl<P: PathFinder + Clone> MovementPrototype<P, UniformSpeed> {
    /// Ingest the configured trace, resolve its routes on `graph`, and build a
    /// prototype sampling speeds from the configured range.
    pub fn from_config(
        cfg:    &ExternalMovementConfig,
        graph:  Arc<TopologyGraph>,
        finder: P,
    ) -> MovementResult<Self> {
        cfg.validate()?;

        let trace     = TraceIngestor::load(&cfg.trace).map_err(RouteError::from)?;
        let transform = MapTransform::from(&cfg.map);
        let resolver  = graph.resolver(cfg.movement.snap_tolerance);
        let routes    = build_routes(&trace, &resolver, &transform)?;

        let sampler = UniformSpeed::new(cfg.movement.speed, cfg.movement.seed, 0)?;
        tracing::info!(
            routes = routes.len(),
            mode   = ?cfg.movement.mode,
            "movement prototype ready"
        );
        Self::new(routes, graph, finder, sampler, cfg.movement.mode)
    }
}
