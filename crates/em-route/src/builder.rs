//! Route pool construction from a canonical trace.
//!
//! Every canonical location is mapped into topology space by a
//! [`MapTransform`] and then resolved to a graph node.  A location with no
//! node aborts the whole build: a route through an unknown point cannot be
//! scheduled later.

use em_core::NodeId;
use em_spatial::{CoordResolver, MapTransform};
use em_trace::{CanonicalTrace, EntityTrace};

use crate::{Route, RouteError, RouteResult};

/// Build one [`Route`] per entity of `trace`, in ascending entity-id order.
///
/// With the `parallel` Cargo feature entities are resolved on Rayon's thread
/// pool; the output order is the same either way.
pub fn build_routes<R>(
    trace:     &CanonicalTrace,
    resolver:  &R,
    transform: &MapTransform,
) -> RouteResult<Vec<Route>>
where
    R: CoordResolver + ?Sized,
{
    #[cfg(not(feature = "parallel"))]
    let routes = trace
        .entities()
        .iter()
        .map(|entity| build_route(entity, resolver, transform))
        .collect::<RouteResult<Vec<_>>>()?;

    #[cfg(feature = "parallel")]
    let routes = {
        use rayon::prelude::*;

        trace
            .entities()
            .par_iter()
            .map(|entity| build_route(entity, resolver, transform))
            .collect::<RouteResult<Vec<_>>>()?
    };

    tracing::info!(
        routes = routes.len(),
        stops  = routes.iter().map(Route::len).sum::<usize>(),
        "route pool built"
    );
    Ok(routes)
}

/// Resolve one entity's locations and wrap them with its deltas.
pub fn build_route<R>(
    entity:    &EntityTrace,
    resolver:  &R,
    transform: &MapTransform,
) -> RouteResult<Route>
where
    R: CoordResolver + ?Sized,
{
    let stops = entity
        .locations
        .iter()
        .map(|&original| {
            let coord = transform.apply(original);
            resolver.graph_node_for(coord).ok_or_else(|| RouteError::UnresolvedCoordinate {
                entity: entity.entity_id.clone(),
                coord,
                original,
            })
        })
        .collect::<RouteResult<Vec<NodeId>>>()?;

    Route::new(entity.entity_id.clone(), stops, entity.deltas.clone())
}
