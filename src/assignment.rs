//! In-memory successor-array assignment.
//!
//! Solver bindings copy their solution into a [`SolvedAssignment`]; the
//! reporting pass then only sees it through [`AssignmentOracle`].

use std::collections::HashMap;

use crate::error::ReportError;
use crate::traits::AssignmentOracle;
use crate::{Cost, Minutes, NodeId, TraversalIndex, VehicleId};

#[derive(Debug, Clone)]
pub struct SolvedAssignment {
    next: Vec<TraversalIndex>,
    index_to_node: Vec<NodeId>,
    /// Lowest slot carrying each node.
    node_to_index: HashMap<NodeId, TraversalIndex>,
    starts: Vec<TraversalIndex>,
    ends: Vec<TraversalIndex>,
    start_slot: Vec<bool>,
    end_slot: Vec<bool>,
    cumulative_time: Vec<Minutes>,
    /// Arc costs keyed by node id pair.
    arc_costs: Vec<Vec<Cost>>,
    fixed_costs: Vec<Cost>,
    objective: Option<Cost>,
}

impl SolvedAssignment {
    /// Creates an assignment where every vehicle goes straight from its start
    /// to its end slot and every other slot is unscheduled.
    ///
    /// `starts` and `ends` must pair up one slot each per vehicle, all within
    /// `index_to_node`.
    pub fn new(
        index_to_node: Vec<NodeId>,
        starts: Vec<TraversalIndex>,
        ends: Vec<TraversalIndex>,
    ) -> Result<Self, ReportError> {
        if starts.len() != ends.len() {
            return Err(ReportError::MalformedAssignment {
                vehicle: starts.len().min(ends.len()),
                reason: format!("{} start slots but {} end slots", starts.len(), ends.len()),
            });
        }

        let slots = index_to_node.len();
        let mut next: Vec<TraversalIndex> = (0..slots).collect();
        let mut start_slot = vec![false; slots];
        let mut end_slot = vec![false; slots];
        for (vehicle, (&start, &end)) in starts.iter().zip(&ends).enumerate() {
            if start >= slots || end >= slots {
                return Err(ReportError::MalformedAssignment {
                    vehicle,
                    reason: format!("start {} or end {} outside {} slots", start, end, slots),
                });
            }
            next[start] = end;
            start_slot[start] = true;
            end_slot[end] = true;
        }

        let mut node_to_index = HashMap::new();
        for (index, &node) in index_to_node.iter().enumerate() {
            node_to_index.entry(node).or_insert(index);
        }

        Ok(Self {
            next,
            index_to_node,
            node_to_index,
            fixed_costs: vec![0; starts.len()],
            starts,
            ends,
            start_slot,
            end_slot,
            cumulative_time: vec![0; slots],
            arc_costs: Vec::new(),
            objective: None,
        })
    }

    /// Links `start -> stops... -> end` for `vehicle`.
    pub fn set_route(&mut self, vehicle: VehicleId, stops: &[TraversalIndex]) -> Result<(), ReportError> {
        let malformed = |reason: String| ReportError::MalformedAssignment { vehicle, reason };

        let (start, end) = match (self.starts.get(vehicle), self.ends.get(vehicle)) {
            (Some(&start), Some(&end)) => (start, end),
            _ => return Err(malformed("vehicle has no start/end slot".to_string())),
        };

        if let Some(&stop) = stops
            .iter()
            .find(|&&stop| stop >= self.next.len() || self.is_start(stop) || self.is_end(stop))
        {
            return Err(malformed(format!("slot {} cannot be used as a stop", stop)));
        }

        // Unschedule whatever the vehicle visited before.
        let mut current = self.next.get(start).copied().ok_or_else(|| malformed(format!("no slot {}", start)))?;
        for _ in 0..self.next.len() {
            if current == end || self.is_start(current) || self.is_end(current) {
                break;
            }
            let following = self.next[current];
            self.next[current] = current;
            current = following;
        }

        let mut current = start;
        for &stop in stops {
            self.next[current] = stop;
            current = stop;
        }
        self.next[current] = end;

        Ok(())
    }

    pub fn set_cumulative_time(&mut self, index: TraversalIndex, minutes: Minutes) {
        if let Some(value) = self.cumulative_time.get_mut(index) {
            *value = minutes;
        }
    }

    pub fn set_arc_costs(&mut self, costs: Vec<Vec<Cost>>) {
        self.arc_costs = costs;
    }

    /// Cost added to the arc leaving the vehicle's start when it is used.
    pub fn set_vehicle_fixed_cost(&mut self, vehicle: VehicleId, cost: Cost) {
        if let Some(value) = self.fixed_costs.get_mut(vehicle) {
            *value = cost;
        }
    }

    pub fn set_objective(&mut self, objective: Cost) {
        self.objective = Some(objective);
    }

    fn route_cost(&self, vehicle: VehicleId) -> Cost {
        let mut cost = 0;
        let mut index = self.starts[vehicle];
        for _ in 0..self.next.len() {
            if self.is_end(index) {
                break;
            }
            let next = self.next[index];
            cost += self.arc_cost(index, next, vehicle);
            index = next;
        }
        cost
    }
}

impl AssignmentOracle for SolvedAssignment {
    fn vehicle_count(&self) -> usize {
        self.starts.len()
    }

    fn slot_count(&self) -> usize {
        self.next.len()
    }

    fn start(&self, vehicle: VehicleId) -> TraversalIndex {
        self.starts[vehicle]
    }

    fn end(&self, vehicle: VehicleId) -> TraversalIndex {
        self.ends[vehicle]
    }

    fn is_start(&self, index: TraversalIndex) -> bool {
        self.start_slot.get(index).copied().unwrap_or(false)
    }

    fn is_end(&self, index: TraversalIndex) -> bool {
        self.end_slot.get(index).copied().unwrap_or(false)
    }

    fn next(&self, index: TraversalIndex) -> TraversalIndex {
        self.next[index]
    }

    fn index_to_node(&self, index: TraversalIndex) -> NodeId {
        self.index_to_node[index]
    }

    fn node_to_index(&self, node: NodeId) -> Option<TraversalIndex> {
        self.node_to_index.get(&node).copied()
    }

    fn cumulative_time(&self, index: TraversalIndex) -> Minutes {
        self.cumulative_time[index]
    }

    fn arc_cost(&self, from: TraversalIndex, to: TraversalIndex, vehicle: VehicleId) -> Cost {
        if from == to {
            return 0;
        }
        let base = self
            .arc_costs
            .get(self.index_to_node[from])
            .and_then(|row| row.get(self.index_to_node[to]))
            .copied()
            .unwrap_or(0);
        let fixed = if self.is_start(from) && !self.is_end(to) {
            self.fixed_costs.get(vehicle).copied().unwrap_or(0)
        } else {
            0
        };
        base + fixed
    }

    fn objective_value(&self) -> Cost {
        self.objective
            .unwrap_or_else(|| (0..self.vehicle_count()).map(|vehicle| self.route_cost(vehicle)).sum())
    }
}
