//! Per-entity route: shared stops and time budgets, per-instance cursors.
//!
//! # Ownership
//!
//! ```text
//! Route ─┬─ Arc<RoutePlan>   stops, time_budget, active window (immutable)
//!        ├─ stop_cursor      owned by this replica
//!        └─ time_cursor      owned by this replica
//! ```
//!
//! [`Route::replicate`] clones the `Arc`, never the lists, so every replica
//! reads the same plan and advances its own cursors.
//!
//! # Cursor alignment
//!
//! `time_budget[i]` is the time available to reach `stops[i]` from
//! `stops[i-1]`; `time_budget[0]` is the offset from the global start and is
//! spent on placing the entity.  The stop cursor therefore starts at 0 and
//! the time cursor at 1.  Both clamp at the last index.

use std::sync::Arc;

use em_core::{NodeId, Seconds};

use crate::{RouteError, RouteResult};

#[derive(Debug)]
struct RoutePlan {
    entity_id:    String,
    stops:        Vec<NodeId>,
    time_budget:  Vec<Seconds>,
    active_start: Seconds,
    active_end:   Seconds,
}

/// One entity's stop sequence with its two cursors.
#[derive(Debug)]
pub struct Route {
    plan:        Arc<RoutePlan>,
    stop_cursor: usize,
    time_cursor: usize,
}

impl Route {
    /// Build a route from aligned `stops` and `time_budget`.
    ///
    /// # Errors
    ///
    /// [`RouteError::EmptyRoute`] if `stops` is empty,
    /// [`RouteError::BudgetMismatch`] if the lengths differ.
    pub fn new(
        entity_id:   impl Into<String>,
        stops:       Vec<NodeId>,
        time_budget: Vec<Seconds>,
    ) -> RouteResult<Self> {
        let entity_id = entity_id.into();
        if stops.is_empty() {
            return Err(RouteError::EmptyRoute { entity: entity_id });
        }
        if stops.len() != time_budget.len() {
            return Err(RouteError::BudgetMismatch {
                entity:  entity_id,
                stops:   stops.len(),
                budgets: time_budget.len(),
            });
        }

        let active_start = time_budget[0];
        let active_end   = time_budget.iter().sum();
        let plan = RoutePlan { entity_id, stops, time_budget, active_start, active_end };
        Ok(Self::with_plan(Arc::new(plan)))
    }

    fn with_plan(plan: Arc<RoutePlan>) -> Self {
        let time_cursor = 1usize.min(plan.stops.len() - 1);
        Self { plan, stop_cursor: 0, time_cursor }
    }

    /// Next stop to travel to.  Repeats the final stop once exhausted.
    pub fn next_stop(&mut self) -> NodeId {
        let stop = self.plan.stops[self.stop_cursor];
        self.stop_cursor = (self.stop_cursor + 1).min(self.plan.stops.len() - 1);
        stop
    }

    /// Time available for the trip to the stop last handed out by
    /// [`next_stop`](Self::next_stop).  Repeats the final budget once
    /// exhausted.
    pub fn next_time_budget(&mut self) -> Seconds {
        let budget = self.plan.time_budget[self.time_cursor];
        self.time_cursor = (self.time_cursor + 1).min(self.plan.time_budget.len() - 1);
        budget
    }

    /// Seconds from the global start until the entity first appears.
    #[inline]
    pub fn active_start(&self) -> Seconds {
        self.plan.active_start
    }

    /// Seconds from the global start until the entity's last sample.
    #[inline]
    pub fn active_end(&self) -> Seconds {
        self.plan.active_end
    }

    /// A replica sharing this route's plan, with fresh cursors.
    pub fn replicate(&self) -> Route {
        Self::with_plan(Arc::clone(&self.plan))
    }

    pub fn entity_id(&self) -> &str {
        &self.plan.entity_id
    }

    pub fn stops(&self) -> &[NodeId] {
        &self.plan.stops
    }

    pub fn time_budget(&self) -> &[Seconds] {
        &self.plan.time_budget
    }

    /// Number of stops (always at least one).
    pub fn len(&self) -> usize {
        self.plan.stops.len()
    }
}
