//! Unit tests for em-movement.

use std::sync::Arc;

use em_core::{Coord, MovementMode, NodeId};
use em_route::Route;
use em_spatial::{DijkstraPathFinder, TopologyGraph, TopologyGraphBuilder};

use crate::{ConstantSpeed, MovementScheduler, SpeedSampler};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Nodes (x, y):
///   0:(0,0) ── 1:(100,0)
///                  │
///              2:(100,50)         3:(500,500) isolated
fn graph() -> Arc<TopologyGraph> {
    let mut b = TopologyGraphBuilder::new();
    b.add_polyline(&[Coord::new(0.0, 0.0), Coord::new(100.0, 0.0), Coord::new(100.0, 50.0)]);
    b.add_node(Coord::new(500.0, 500.0));
    Arc::new(b.build())
}

/// Stops 0 → 1 → 1 → 2, budgets 5 (start offset), 50, 20, 10.
fn route() -> Route {
    Route::new("A", vec![NodeId(0), NodeId(1), NodeId(1), NodeId(2)], vec![5.0, 50.0, 20.0, 10.0])
        .unwrap()
}

fn scheduler<S: SpeedSampler>(
    route:   Route,
    sampler: S,
    mode:    MovementMode,
) -> MovementScheduler<DijkstraPathFinder, S> {
    MovementScheduler::new(route, graph(), DijkstraPathFinder, sampler, mode)
}

/// Samples a fixed speed but reports a different maximum.
#[derive(Clone, Copy)]
struct SlowSampler {
    sampled: f64,
    max:     f64,
}

impl SpeedSampler for SlowSampler {
    fn sample(&mut self) -> f64 {
        self.sampled
    }

    fn max_speed(&self) -> f64 {
        self.max
    }

    fn fork(&self, _replica: usize) -> Self {
        *self
    }
}

/// Replays a fixed list of speeds and counts the draws.
#[derive(Clone)]
struct ScriptedSampler {
    speeds: Vec<f64>,
    drawn:  usize,
    max:    f64,
}

impl SpeedSampler for ScriptedSampler {
    fn sample(&mut self) -> f64 {
        let v = self.speeds.get(self.drawn).copied().unwrap_or(self.max);
        self.drawn += 1;
        v
    }

    fn max_speed(&self) -> f64 {
        self.max
    }

    fn fork(&self, _replica: usize) -> Self {
        self.clone()
    }
}

// ── Schedule-speed mode ───────────────────────────────────────────────────────

#[cfg(test)]
mod schedule_speed {
    use em_core::{Coord, MovementMode, NodeId};

    use crate::ConstantSpeed;

    #[test]
    fn speed_is_distance_over_time() {
        let mut s = super::scheduler(super::route(), ConstantSpeed(1.0), MovementMode::ScheduleSpeed);
        assert_eq!(s.initial_location().unwrap(), Coord::new(0.0, 0.0));

        let next = s.advance().unwrap();
        let path = s.get_path().unwrap();
        assert_eq!(path.distance, 100.0);
        assert_eq!(path.speed, 2.0);
        assert_eq!(path.nodes, vec![NodeId(0), NodeId(1)]);
        assert_eq!(s.wait_time(), 0.0);
        assert_eq!(next, 55.0);
        assert_eq!(s.current_node(), Some(NodeId(1)));
    }

    #[test]
    fn zero_distance_waits_full_budget() {
        let mut s = super::scheduler(super::route(), ConstantSpeed(1.0), MovementMode::ScheduleSpeed);
        s.initial_location().unwrap();
        s.advance().unwrap();

        let next = s.advance().unwrap();
        assert_eq!(s.speed(), 0.0);
        assert_eq!(s.wait_time(), 20.0);
        assert_eq!(s.get_path().unwrap().nodes, vec![NodeId(1)]);
        assert_eq!(next, 75.0);
    }

    #[test]
    fn event_times_accumulate_then_hold_last_stop() {
        let mut s = super::scheduler(super::route(), ConstantSpeed(1.0), MovementMode::ScheduleSpeed);
        s.initial_location().unwrap();
        let times: Vec<f64> = (0..5).map(|_| s.advance().unwrap()).collect();
        assert_eq!(times, vec![55.0, 75.0, 85.0, 95.0, 105.0]);
        assert_eq!(s.last_location(), Some(Coord::new(100.0, 50.0)));
        // Exhausted route: stays put, waiting the last budget.
        assert_eq!(s.speed(), 0.0);
        assert_eq!(s.wait_time(), 10.0);
        assert_eq!(s.next_check_time(), 105.0);
    }

    #[test]
    fn third_leg_speed() {
        let mut s = super::scheduler(super::route(), ConstantSpeed(1.0), MovementMode::ScheduleSpeed);
        s.initial_location().unwrap();
        s.advance().unwrap();
        s.advance().unwrap();
        s.advance().unwrap();
        assert_eq!(s.speed(), 5.0);
        assert_eq!(s.get_path().unwrap().destination(), Some(Coord::new(100.0, 50.0)));
    }
}

// ── Sampled-speed mode ────────────────────────────────────────────────────────

#[cfg(test)]
mod sampled_speed {
    use em_core::MovementMode;

    use crate::{ConstantSpeed, MovementError};

    #[test]
    fn slack_becomes_wait_before_departure() {
        let mut s = super::scheduler(super::route(), ConstantSpeed(4.0), MovementMode::SampledSpeed);
        s.initial_location().unwrap();

        // 100 m at 4 m/s = 25 s of a 50 s budget starting at t=5.
        let next = s.advance().unwrap();
        assert_eq!(s.speed(), 4.0);
        assert_eq!(s.wait_time(), 25.0);
        assert_eq!(next, 30.0);
        assert_eq!(s.next_event_time(), 30.0);
        assert_eq!(s.next_check_time(), 55.0);
        assert_eq!(s.get_path().unwrap().travel_time(), 25.0);

        // Zero-distance leg: wait all 20 s from the check clock.
        let next = s.advance().unwrap();
        assert_eq!(s.speed(), 0.0);
        assert_eq!(next, 75.0);
        assert_eq!(s.next_check_time(), 75.0);
    }

    #[test]
    fn too_slow_falls_back_to_max_speed() {
        let sampler = super::SlowSampler { sampled: 1.0, max: 10.0 };
        let mut s = super::scheduler(super::route(), sampler, MovementMode::SampledSpeed);
        s.initial_location().unwrap();

        let next = s.advance().unwrap();
        assert_eq!(s.speed(), 10.0);
        assert_eq!(s.wait_time(), 40.0);
        assert_eq!(next, 45.0);
    }

    #[test]
    fn non_positive_sample_falls_back() {
        let sampler = super::SlowSampler { sampled: 0.0, max: 4.0 };
        let mut s = super::scheduler(super::route(), sampler, MovementMode::SampledSpeed);
        s.initial_location().unwrap();
        s.advance().unwrap();
        assert_eq!(s.speed(), 4.0);
    }

    #[test]
    fn stationary_epoch_consumes_a_sample() {
        let sampler = super::ScriptedSampler { speeds: vec![4.0, 1.0, 5.0], drawn: 0, max: 10.0 };
        let mut s = super::scheduler(super::route(), sampler, MovementMode::SampledSpeed);
        s.initial_location().unwrap();

        s.advance().unwrap();
        assert_eq!(s.speed(), 4.0);

        // Stays at node 1; the 1.0 draw is spent and ignored.
        s.advance().unwrap();
        assert_eq!(s.speed(), 0.0);

        // 50 m in 10 s at the third draw: no fallback, no slack.
        s.advance().unwrap();
        assert_eq!(s.speed(), 5.0);
        assert_eq!(s.wait_time(), 0.0);
    }

    #[test]
    fn infeasible_even_at_max_speed() {
        let mut s = super::scheduler(super::route(), ConstantSpeed(4.0), MovementMode::SampledSpeed);
        s.initial_location().unwrap();
        s.advance().unwrap();
        s.advance().unwrap();

        // 50 m in 10 s needs 5 m/s.
        let err = s.advance().unwrap_err();
        match err {
            MovementError::InfeasibleSchedule { entity, distance, available, max_speed, time, .. } => {
                assert_eq!(entity, "A");
                assert_eq!(distance, 50.0);
                assert_eq!(available, 10.0);
                assert_eq!(max_speed, 4.0);
                assert_eq!(time, 75.0);
            }
            other => panic!("unexpected error {other}"),
        }
    }
}

// ── Fatal conditions & produced interface ─────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use em_core::{Coord, MovementMode, NodeId};
    use em_route::Route;

    use crate::{ConstantSpeed, MovementError};

    #[test]
    fn advance_before_placement() {
        let mut s = super::scheduler(super::route(), ConstantSpeed(1.0), MovementMode::ScheduleSpeed);
        assert!(s.last_location().is_none());
        assert!(matches!(s.advance(), Err(MovementError::NotPlaced(ref e)) if e == "A"));
    }

    #[test]
    fn initial_location_places_once() {
        let mut s = super::scheduler(super::route(), ConstantSpeed(1.0), MovementMode::ScheduleSpeed);
        assert_eq!(s.initial_location().unwrap(), Coord::new(0.0, 0.0));
        assert_eq!(s.initial_location().unwrap(), Coord::new(0.0, 0.0));
        assert_eq!(s.last_location(), Some(Coord::new(0.0, 0.0)));
        // Second call did not consume a stop.
        s.advance().unwrap();
        assert_eq!(s.current_node(), Some(NodeId(1)));
    }

    #[test]
    fn unreachable_stop() {
        let r = Route::new("C", vec![NodeId(0), NodeId(3)], vec![0.0, 10.0]).unwrap();
        let mut s = super::scheduler(r, ConstantSpeed(1.0), MovementMode::ScheduleSpeed);
        s.initial_location().unwrap();
        match s.advance().unwrap_err() {
            MovementError::Unreachable { entity, from, to, time } => {
                assert_eq!(entity, "C");
                assert_eq!(from, Coord::new(0.0, 0.0));
                assert_eq!(to, Coord::new(500.0, 500.0));
                assert_eq!(time, 0.0);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn zero_budget_with_distance_is_infeasible() {
        let r = Route::new("D", vec![NodeId(0), NodeId(1)], vec![0.0, 0.0]).unwrap();
        let mut s = super::scheduler(r, ConstantSpeed(1.0), MovementMode::ScheduleSpeed);
        s.initial_location().unwrap();
        assert!(matches!(s.advance(), Err(MovementError::InfeasibleSchedule { .. })));
    }

    #[test]
    fn zero_budget_in_place_is_fine() {
        let r = Route::new("E", vec![NodeId(1), NodeId(1)], vec![3.0, 0.0]).unwrap();
        let mut s = super::scheduler(r, ConstantSpeed(1.0), MovementMode::SampledSpeed);
        s.initial_location().unwrap();
        assert_eq!(s.advance().unwrap(), 3.0);
        assert_eq!(s.wait_time(), 0.0);
    }

    #[test]
    fn active_window() {
        let s = super::scheduler(super::route(), ConstantSpeed(1.0), MovementMode::ScheduleSpeed);
        assert!(!s.is_active(4.9));
        assert!(s.is_active(5.0));
        assert!(s.is_active(85.0));
        assert!(!s.is_active(85.1));
        assert_eq!(s.next_event_time(), 5.0);
        assert_eq!(s.next_check_time(), 5.0);
        assert_eq!(s.entity_id(), "A");
        assert_eq!(s.stops().len(), 4);
        assert_eq!(s.mode(), MovementMode::ScheduleSpeed);
    }
}

// ── Speed samplers ────────────────────────────────────────────────────────────

#[cfg(test)]
mod speed {
    use em_core::SpeedRange;

    use crate::{SpeedSampler, UniformSpeed};

    fn draws(s: &mut UniformSpeed, n: usize) -> Vec<f64> {
        (0..n).map(|_| s.sample()).collect()
    }

    #[test]
    fn uniform_within_range_and_deterministic() {
        let range = SpeedRange { min: 0.5, max: 1.5 };
        let mut a = UniformSpeed::new(range, 42, 3).unwrap();
        let mut b = UniformSpeed::new(range, 42, 3).unwrap();
        let da = draws(&mut a, 50);
        assert_eq!(da, draws(&mut b, 50));
        assert!(da.iter().all(|&v| (0.5..=1.5).contains(&v)));
        assert_eq!(a.max_speed(), 1.5);
    }

    #[test]
    fn forks_are_independent_streams() {
        let range = SpeedRange { min: 0.0, max: 100.0 };
        let proto = UniformSpeed::new(range, 7, 0).unwrap();
        let mut one = proto.fork(1);
        let mut two = proto.fork(2);
        let mut one_again = proto.fork(1);
        let d1 = draws(&mut one, 8);
        assert_ne!(d1, draws(&mut two, 8));
        assert_eq!(d1, draws(&mut one_again, 8));
    }

    #[test]
    fn degenerate_range_is_constant() {
        let mut s = UniformSpeed::new(SpeedRange { min: 2.0, max: 2.0 }, 0, 0).unwrap();
        assert!(draws(&mut s, 5).iter().all(|&v| v == 2.0));
    }

    #[test]
    fn inverted_range_rejected() {
        assert!(UniformSpeed::new(SpeedRange { min: 2.0, max: 1.0 }, 0, 0).is_err());
    }
}

// ── Prototype & replication ───────────────────────────────────────────────────

#[cfg(test)]
mod prototype {
    use std::io::Write;

    use em_core::{Coord, ExternalMovementConfig, MovementMode, NodeId};
    use em_route::Route;
    use em_spatial::DijkstraPathFinder;

    use crate::{ConstantSpeed, MovementError, MovementPrototype};

    fn pool() -> Vec<Route> {
        vec![
            Route::new("A", vec![NodeId(0), NodeId(1)], vec![0.0, 50.0]).unwrap(),
            Route::new("B", vec![NodeId(2)], vec![7.0]).unwrap(),
        ]
    }

    #[test]
    fn round_robin_and_wrap() {
        let mut proto = MovementPrototype::new(
            pool(),
            super::graph(),
            DijkstraPathFinder,
            ConstantSpeed(1.0),
            MovementMode::ScheduleSpeed,
        )
        .unwrap();

        let ids: Vec<String> = (0..5).map(|_| proto.replicate().entity_id().to_owned()).collect();
        assert_eq!(ids, vec!["A", "B", "A", "B", "A"]);
        assert_eq!(proto.replica_count(), 5);
        assert_eq!(proto.route_count(), 2);
    }

    #[test]
    fn replicas_advance_independently() {
        let mut proto = MovementPrototype::new(
            vec![pool().remove(0)],
            super::graph(),
            DijkstraPathFinder,
            ConstantSpeed(1.0),
            MovementMode::ScheduleSpeed,
        )
        .unwrap();

        let mut first = proto.replicate();
        let mut second = proto.replicate();
        first.initial_location().unwrap();
        first.advance().unwrap();

        assert_eq!(first.current_node(), Some(NodeId(1)));
        assert_eq!(second.initial_location().unwrap(), Coord::new(0.0, 0.0));
        assert!(std::ptr::eq(first.route().stops(), second.route().stops()));
    }

    #[test]
    fn empty_pool_rejected() {
        let r = MovementPrototype::new(
            vec![],
            super::graph(),
            DijkstraPathFinder,
            ConstantSpeed(1.0),
            MovementMode::ScheduleSpeed,
        );
        assert!(matches!(r, Err(MovementError::NoRoutes)));
    }

    #[test]
    fn from_config_end_to_end() {
        let mut trace = tempfile::NamedTempFile::new().unwrap();
        write!(trace, "# id,time,x,y\nA,0,0,0\nA,50,100,0\nB,0,100,50\n").unwrap();
        trace.flush().unwrap();

        let toml = format!(
            "[trace]\npath = {:?}\n\n[movement]\nmode = 1\nspeed = {{ min = 1.0, max = 5.0 }}\nseed = 7\n",
            trace.path().display().to_string()
        );
        let cfg = ExternalMovementConfig::from_toml_str(&toml).unwrap();

        let mut proto = MovementPrototype::from_config(&cfg, super::graph(), DijkstraPathFinder).unwrap();
        assert_eq!(proto.route_count(), 2);
        assert_eq!(proto.mode(), MovementMode::SampledSpeed);

        let mut a = proto.replicate();
        assert_eq!(a.initial_location().unwrap(), Coord::new(0.0, 0.0));
        let next = a.advance().unwrap();
        // At least 2 m/s is needed; slower samples fall back to 5 m/s.
        assert!(a.speed() >= 2.0 && a.speed() <= 5.0);
        assert!((a.wait_time() - (50.0 - 100.0 / a.speed())).abs() < 1e-9);
        assert_eq!(next, a.wait_time());
        assert_eq!(a.next_check_time(), 50.0);

        let mut b = proto.replicate();
        assert_eq!(b.initial_location().unwrap(), Coord::new(100.0, 50.0));
        assert!(b.is_active(0.0));
        assert!(!b.is_active(0.1));
    }

    #[test]
    fn from_config_unresolved_point() {
        let mut trace = tempfile::NamedTempFile::new().unwrap();
        write!(trace, "A,0,1,1\n").unwrap();
        trace.flush().unwrap();

        let toml = format!("[trace]\npath = {:?}\n", trace.path().display().to_string());
        let cfg = ExternalMovementConfig::from_toml_str(&toml).unwrap();
        let err = MovementPrototype::from_config(&cfg, super::graph(), DijkstraPathFinder)
            .err()
            .unwrap();
        assert!(matches!(err, MovementError::Route(em_route::RouteError::UnresolvedCoordinate { .. })));
    }
}

#[cfg(test)]
mod constant {
    use super::*;

    #[test]
    fn constant_speed_is_its_own_max() {
        let mut c = ConstantSpeed(3.0);
        assert_eq!(c.sample(), 3.0);
        assert_eq!(c.max_speed(), 3.0);
        assert_eq!(c.fork(9), c);
    }
}
