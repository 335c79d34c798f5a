//! Per-entity movement scheduler.
//!
//! # Epoch model
//!
//! The external clock calls [`MovementScheduler::advance`] once per epoch.
//! Each call consumes one stop and one time budget from the route, prepares
//! the path to that stop, and returns the absolute time of the next movement
//! event.
//!
//! Two clocks are kept:
//!
//! ```text
//! checkpoint   check clock: when the next path is computed
//!              starts at active_start, += available_time every epoch
//! next_event   move clock:  what advance() returns
//!              ScheduleSpeed  next_event = checkpoint (after +=)
//!              SampledSpeed   next_event = checkpoint (before +=) + wait
//! ```
//!
//! In sampled-speed mode the entity waits before departing, so it starts
//! moving at `next_event` and still arrives at the new `checkpoint`.
//!
//! # Timing policies
//!
//! | Mode            | speed                        | wait                          |
//! |-----------------|------------------------------|-------------------------------|
//! | `ScheduleSpeed` | `distance / available`       | `0`                           |
//! | `SampledSpeed`  | sampled, else max speed      | `available - distance/speed`  |
//!
//! A zero-length trip always has speed `0` and waits the full budget.

use std::sync::Arc;

use em_core::{Coord, MovementMode, NodeId, Seconds};
use em_route::Route;
use em_spatial::{PathFinder, SpatialError, TopologyGraph};

use crate::{MovementError, MovementResult, Path, SpeedSampler};

/// Drives one entity along its [`Route`].
///
/// # Type parameters
///
/// `P` is the shortest-path service (e.g. [`em_spatial::DijkstraPathFinder`]),
/// `S` the speed source consulted in [`MovementMode::SampledSpeed`].
pub struct MovementScheduler<P: PathFinder, S: SpeedSampler> {
    route:      Route,
    graph:      Arc<TopologyGraph>,
    finder:     P,
    sampler:    S,
    mode:       MovementMode,
    current:    Option<NodeId>,
    path:       Option<Path>,
    wait_time:  Seconds,
    checkpoint: Seconds,
    next_event: Seconds,
}

impl<P: PathFinder, S: SpeedSampler> MovementScheduler<P, S> {
    /// Both clocks start at the route's `active_start`.  The entity is not
    /// placed until [`initial_location`](Self::initial_location) is called.
    pub fn new(route: Route, graph: Arc<TopologyGraph>, finder: P, sampler: S, mode: MovementMode) -> Self {
        let start = route.active_start();
        Self {
            route,
            graph,
            finder,
            sampler,
            mode,
            current:    None,
            path:       None,
            wait_time:  0.0,
            checkpoint: start,
            next_event: start,
        }
    }

    // ── Placement ─────────────────────────────────────────────────────────

    /// Position of the route's first stop.  Places the entity there on the
    /// first call; later calls return the current position.
    pub fn initial_location(&mut self) -> MovementResult<Coord> {
        let node = match self.current {
            Some(node) => node,
            None => {
                let node = self.route.next_stop();
                self.current = Some(node);
                node
            }
        };
        self.coord_of(node)
    }

    /// Position of the last stop reached, or `None` before placement.
    pub fn last_location(&self) -> Option<Coord> {
        self.current.and_then(|n| self.graph.node_coord(n))
    }

    // ── Epoch ─────────────────────────────────────────────────────────────

    /// Prepare the path to the next stop and return the next event time.
    ///
    /// # Errors
    ///
    /// - [`MovementError::NotPlaced`] before `initial_location()`.
    /// - [`MovementError::Unreachable`] if no path leads to the next stop.
    /// - [`MovementError::InfeasibleSchedule`] if the budget cannot be met.
    ///
    /// All of these are fatal for the entity.
    pub fn advance(&mut self) -> MovementResult<Seconds> {
        let from = self
            .current
            .ok_or_else(|| MovementError::NotPlaced(self.route.entity_id().to_owned()))?;
        let to = self.route.next_stop();

        let nodes = self.finder.find_path(&self.graph, from, to);
        if nodes.is_empty() {
            return Err(MovementError::Unreachable {
                entity: self.route.entity_id().to_owned(),
                from:   self.coord_of(from)?,
                to:     self.coord_of(to)?,
                time:   self.checkpoint,
            });
        }
        let waypoints = nodes
            .iter()
            .map(|&n| self.coord_of(n))
            .collect::<MovementResult<Vec<Coord>>>()?;
        let distance = Coord::polyline_length(&waypoints);

        let available = self.route.next_time_budget();
        let (speed, wait) = self.timing(distance, available, &waypoints)?;

        tracing::debug!(
            entity = self.route.entity_id(),
            t      = self.checkpoint,
            from   = %from,
            to     = %to,
            distance,
            speed,
            wait,
            "movement epoch"
        );

        self.path      = Some(Path::new(nodes, waypoints, speed));
        self.wait_time = wait;
        self.current   = Some(to);

        self.next_event = match self.mode {
            MovementMode::ScheduleSpeed => self.checkpoint + available,
            MovementMode::SampledSpeed  => self.checkpoint + wait,
        };
        self.checkpoint += available;
        Ok(self.next_event)
    }

    /// Speed and wait time for one trip under the configured mode.
    fn timing(&mut self, distance: f64, available: Seconds, waypoints: &[Coord]) -> MovementResult<(f64, Seconds)> {
        // One draw per sampled-speed epoch, moving or not, so a replica's
        // speed sequence does not depend on its stay-in-place legs.
        let sampled = match self.mode {
            MovementMode::ScheduleSpeed => None,
            MovementMode::SampledSpeed => Some(self.sampler.sample()),
        };
        if distance == 0.0 {
            return Ok((0.0, available));
        }
        if available == 0.0 {
            return Err(self.infeasible(distance, available, waypoints));
        }

        match sampled {
            None => Ok((distance / available, 0.0)),
            Some(sampled) => {
                if let Some(wait) = slack(distance, available, sampled) {
                    return Ok((sampled, wait));
                }

                let max = self.sampler.max_speed();
                tracing::warn!(
                    entity = self.route.entity_id(),
                    t      = self.checkpoint,
                    sampled,
                    max,
                    "sampled speed too slow for the time budget, using maximum speed"
                );
                slack(distance, available, max)
                    .map(|wait| (max, wait))
                    .ok_or_else(|| self.infeasible(distance, available, waypoints))
            }
        }
    }

    fn infeasible(&self, distance: f64, available: Seconds, waypoints: &[Coord]) -> MovementError {
        MovementError::InfeasibleSchedule {
            entity:    self.route.entity_id().to_owned(),
            from:      waypoints.first().copied().unwrap_or_default(),
            to:        waypoints.last().copied().unwrap_or_default(),
            distance,
            available,
            max_speed: self.sampler.max_speed(),
            time:      self.checkpoint,
        }
    }

    fn coord_of(&self, node: NodeId) -> MovementResult<Coord> {
        self.graph
            .node_coord(node)
            .ok_or(MovementError::Spatial(SpatialError::NodeNotFound(node)))
    }

    // ── Produced interface ────────────────────────────────────────────────

    /// Path prepared by the last `advance()`.
    pub fn get_path(&self) -> Option<&Path> {
        self.path.as_ref()
    }

    /// Value returned by the last `advance()` (`active_start` before the first).
    pub fn next_event_time(&self) -> Seconds {
        self.next_event
    }

    /// When the following `advance()` is due on the check clock.
    pub fn next_check_time(&self) -> Seconds {
        self.checkpoint
    }

    /// Caller contract: consult this before `advance()`; the scheduler does
    /// not check it itself.
    pub fn is_active(&self, now: Seconds) -> bool {
        now >= self.route.active_start() && now <= self.route.active_end()
    }

    pub fn current_node(&self) -> Option<NodeId> {
        self.current
    }

    /// Speed of the prepared path (`0.0` before the first epoch).
    pub fn speed(&self) -> f64 {
        self.path.as_ref().map_or(0.0, |p| p.speed)
    }

    pub fn wait_time(&self) -> Seconds {
        self.wait_time
    }

    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub fn entity_id(&self) -> &str {
        self.route.entity_id()
    }

    pub fn stops(&self) -> &[NodeId] {
        self.route.stops()
    }

    pub fn route(&self) -> &Route {
        &self.route
    }
}

/// Wait time left when covering `distance` at `speed` within `available`,
/// or `None` if `speed` cannot make it.
fn slack(distance: f64, available: Seconds, speed: f64) -> Option<Seconds> {
    if !speed.is_finite() || speed <= 0.0 {
        return None;
    }
    let wait = available - distance / speed;
    (wait >= 0.0).then_some(wait)
}
