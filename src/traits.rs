//! Core seams of the reporting layer.
//!
//! The decoding and aggregation code only talks to a solved routing model
//! through [`AssignmentOracle`]. Concrete solver bindings should implement it
//! (or copy their solution into [`crate::assignment::SolvedAssignment`]).

use crate::{Cost, Minutes, NodeId, TraversalIndex, VehicleId};

/// Read-only view over an already solved assignment.
///
/// Traversal indices are the solver's slot numbering. Several indices may
/// resolve to the same node (e.g. a depot shared by all vehicles).
pub trait AssignmentOracle {
    fn vehicle_count(&self) -> usize;

    /// Total number of traversal indices, start/end slots included.
    fn slot_count(&self) -> usize;

    fn start(&self, vehicle: VehicleId) -> TraversalIndex;
    fn end(&self, vehicle: VehicleId) -> TraversalIndex;

    fn is_start(&self, index: TraversalIndex) -> bool;
    fn is_end(&self, index: TraversalIndex) -> bool;

    /// Successor of `index` in the found solution. An unscheduled slot is
    /// its own successor.
    fn next(&self, index: TraversalIndex) -> TraversalIndex;

    fn index_to_node(&self, index: TraversalIndex) -> NodeId;

    /// Inverse of [`AssignmentOracle::index_to_node`]. Not 1:1 when slots are
    /// duplicated, so callers should only rely on it for customer nodes.
    fn node_to_index(&self, node: NodeId) -> Option<TraversalIndex>;

    /// Resolved value of the time dimension at `index`.
    fn cumulative_time(&self, index: TraversalIndex) -> Minutes;

    /// Objective cost of the arc `from -> to` when driven by `vehicle`.
    fn arc_cost(&self, from: TraversalIndex, to: TraversalIndex, vehicle: VehicleId) -> Cost;

    fn objective_value(&self) -> Cost;
}

/// Provides a travel-time matrix (minutes) for a set of `(lat, lng)` locations.
///
/// The matrix is indexed by the provided location order.
pub trait DistanceMatrixProvider {
    type Error;

    fn matrix_for(&self, locations: &[(f64, f64)]) -> Result<Vec<Vec<Minutes>>, Self::Error>;
}
