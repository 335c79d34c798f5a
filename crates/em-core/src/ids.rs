//! Typed graph indices.
//!
//! Nodes and edges are addressed by dense `u32` positions into the graph's
//! CSR arrays.  Trace entities have no numeric id: the raw id string is the
//! identity, and its byte order is the grouping order.

use std::fmt;

macro_rules! graph_index {
    ($($(#[$doc:meta])* $name:ident;)+) => {$(
        $(#[$doc])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        pub struct $name(pub u32);

        impl $name {
            /// Placeholder for "no such element" (never a valid position).
            pub const INVALID: $name = $name(u32::MAX);

            /// Position in the graph's arrays.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    )+};
}

graph_index! {
    /// A topology-graph node.
    NodeId;
    /// A directed topology-graph edge.
    EdgeId;
}
