use thiserror::Error;

use crate::{NodeId, VehicleId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("malformed assignment for vehicle {vehicle}: {reason}")]
    MalformedAssignment { vehicle: VehicleId, reason: String },

    #[error("node {0} has no entry in the dataset")]
    UnknownNodeReference(NodeId),

    #[error("job type '{job_type}' of node {node} has no service time")]
    UnknownJobType { node: NodeId, job_type: String },

    #[error("vehicle {0} has an empty work window, utilization is undefined")]
    UndefinedUtilization(VehicleId),

    #[error("no vehicles supplied")]
    EmptyFleet,

    #[error("customer node {node} appears {occurrences} times across tours and dropped nodes")]
    InconsistentCoverage { node: NodeId, occurrences: usize },
}
