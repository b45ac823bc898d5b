//! Tour extraction from a solved assignment.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ReportError;
use crate::traits::AssignmentOracle;
use crate::{NodeId, TraversalIndex, VehicleId};

/// A traversal slot together with the node it resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stop {
    pub index: TraversalIndex,
    pub node: NodeId,
}

/// Ordered visits of one vehicle.
///
/// `stops` holds every slot that belongs to the tour. With an open end the
/// vehicle's end slot is a zero-cost placeholder and is kept out of `stops`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub vehicle: VehicleId,
    pub stops: Vec<Stop>,
    pub end: Stop,
    pub open_end: bool,
}

/// A move between two consecutive slots of a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub from: Stop,
    pub to: Stop,
    /// The destination is the synthetic terminal of an open-ended tour.
    pub to_placeholder: bool,
}

impl Tour {
    pub fn nodes(&self) -> Vec<NodeId> {
        self.stops.iter().map(|stop| stop.node).collect()
    }

    pub fn legs(&self) -> Vec<Leg> {
        let mut legs: Vec<Leg> = self
            .stops
            .windows(2)
            .map(|pair| Leg {
                from: pair[0],
                to: pair[1],
                to_placeholder: false,
            })
            .collect();

        if self.open_end {
            if let Some(&last) = self.stops.last() {
                legs.push(Leg {
                    from: last,
                    to: self.end,
                    to_placeholder: true,
                });
            }
        }

        legs
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

/// Walks each vehicle's successor chain from its start slot to its end slot.
///
/// With `allow_arbitrary_end` the end slot is treated as a synthetic terminal
/// and left out of the tour. Traversal is bounded by `max_steps` (defaults to
/// the slot count plus one), so a cyclic assignment fails instead of hanging.
pub fn compile_tours<O>(
    oracle: &O,
    allow_arbitrary_end: bool,
    max_steps: Option<usize>,
) -> Result<Vec<Tour>, ReportError>
where
    O: AssignmentOracle + ?Sized,
{
    let max_steps = max_steps.unwrap_or(oracle.slot_count() + 1);

    (0..oracle.vehicle_count())
        .map(|vehicle| compile_tour(oracle, vehicle, allow_arbitrary_end, max_steps))
        .collect()
}

fn compile_tour<O>(
    oracle: &O,
    vehicle: VehicleId,
    allow_arbitrary_end: bool,
    max_steps: usize,
) -> Result<Tour, ReportError>
where
    O: AssignmentOracle + ?Sized,
{
    let expected_end = oracle.end(vehicle);
    let mut index = oracle.start(vehicle);
    let mut stops = Vec::new();

    if oracle.is_end(index) && index != expected_end {
        return Err(ReportError::MalformedAssignment {
            vehicle,
            reason: format!("start slot {} is flagged as another vehicle's end", index),
        });
    }

    let mut steps = 0;
    while !oracle.is_end(index) {
        if steps >= max_steps {
            return Err(ReportError::MalformedAssignment {
                vehicle,
                reason: format!("no end slot reached after {} steps", max_steps),
            });
        }
        stops.push(Stop {
            index,
            node: oracle.index_to_node(index),
        });
        index = oracle.next(index);
        steps += 1;
    }

    if index != expected_end {
        return Err(ReportError::MalformedAssignment {
            vehicle,
            reason: format!("route terminates at slot {} instead of {}", index, expected_end),
        });
    }

    let end = Stop {
        index,
        node: oracle.index_to_node(index),
    };
    if !allow_arbitrary_end {
        stops.push(end);
    }

    debug!(vehicle, stops = stops.len(), open_end = allow_arbitrary_end, "compiled tour");

    Ok(Tour {
        vehicle,
        stops,
        end,
        open_end: allow_arbitrary_end,
    })
}
