//! Per-customer attendance report.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::model::Node;
use crate::traits::AssignmentOracle;
use crate::{Minutes, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attendance {
    Attended { arrival: Minutes },
    NotAttended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub node: NodeId,
    pub timeslot: Option<String>,
    pub status: Attendance,
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.timeslot.as_deref().unwrap_or("-");
        match self.status {
            Attendance::Attended { arrival } => {
                write!(f, "Node {} (timeslot {}): arrival {}", self.node, slot, arrival)
            }
            Attendance::NotAttended => write!(f, "Node {} (timeslot {}): not attended", self.node, slot),
        }
    }
}

/// Builds one appointment line per node, skipping `excluded` (depots and
/// vehicle start locations).
///
/// Arrival is the time dimension value at the node's slot, resolved through
/// the oracle's node-to-slot mapping.
pub fn build_per_customer<O>(
    nodes: &[Node],
    oracle: &O,
    dropped: &[NodeId],
    excluded: &[NodeId],
) -> Result<Vec<Appointment>, ReportError>
where
    O: AssignmentOracle + ?Sized,
{
    let known: HashSet<NodeId> = nodes.iter().map(|node| node.id).collect();
    if let Some(&unknown) = dropped.iter().find(|id| !known.contains(*id)) {
        return Err(ReportError::UnknownNodeReference(unknown));
    }

    let dropped: HashSet<NodeId> = dropped.iter().copied().collect();
    let excluded: HashSet<NodeId> = excluded.iter().copied().collect();

    nodes
        .iter()
        .filter(|node| !excluded.contains(&node.id))
        .map(|node| -> Result<Appointment, ReportError> {
            let status = if dropped.contains(&node.id) {
                Attendance::NotAttended
            } else {
                let index = oracle
                    .node_to_index(node.id)
                    .ok_or(ReportError::UnknownNodeReference(node.id))?;
                Attendance::Attended {
                    arrival: oracle.cumulative_time(index),
                }
            };

            Ok(Appointment {
                node: node.id,
                timeslot: node.timeslot.clone(),
                status,
            })
        })
        .collect()
}
