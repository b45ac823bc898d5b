//! Dataset types consumed by the reporting pass.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::traits::DistanceMatrixProvider;
use crate::{Minutes, NodeId, VehicleId};

/// A location in the routing model: either a customer or a depot/start location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Category key into the service time table. Depots have none.
    #[serde(default)]
    pub job_type: Option<String>,
    /// Appointment slot label shown in the per-customer report.
    #[serde(default)]
    pub timeslot: Option<String>,
    /// Horizontal axis; longitude for geographic data.
    pub x: f64,
    /// Vertical axis; latitude for geographic data.
    pub y: f64,
    #[serde(default)]
    pub depot: bool,
}

impl Node {
    pub fn customer(id: NodeId, job_type: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id,
            job_type: Some(job_type.into()),
            timeslot: None,
            x,
            y,
            depot: false,
        }
    }

    pub fn depot(id: NodeId, x: f64, y: f64) -> Self {
        Self {
            id,
            job_type: None,
            timeslot: None,
            x,
            y,
            depot: true,
        }
    }

    pub fn with_timeslot(mut self, timeslot: impl Into<String>) -> Self {
        self.timeslot = Some(timeslot.into());
        self
    }

    pub fn coordinates(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    /// Start of the work window (minutes).
    pub start_time: Minutes,
    /// End of the work window (minutes).
    pub end_time: Minutes,
    pub start_node: NodeId,
}

impl Vehicle {
    pub fn new(id: VehicleId, start_time: Minutes, end_time: Minutes, start_node: NodeId) -> Self {
        Self {
            id,
            start_time,
            end_time,
            start_node,
        }
    }

    pub fn work_window(&self) -> Minutes {
        self.end_time - self.start_time
    }
}

/// Lookup tables the solver was built from.
///
/// `nodes[i].id` is expected to equal `i`; the travel time matrix is indexed
/// by node id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub nodes: Vec<Node>,
    pub service_times: HashMap<String, Minutes>,
    pub travel_times: Vec<Vec<Minutes>>,
}

impl Dataset {
    pub fn new(nodes: Vec<Node>, service_times: HashMap<String, Minutes>, travel_times: Vec<Vec<Minutes>>) -> Self {
        Self {
            nodes,
            service_times,
            travel_times,
        }
    }

    /// Replaces the travel time matrix with one computed from node coordinates.
    ///
    /// Providers take `(lat, lng)`, so each node is passed as `(y, x)`.
    pub fn with_travel_times_from<M>(mut self, provider: &M) -> Result<Self, M::Error>
    where
        M: DistanceMatrixProvider,
    {
        let locations: Vec<(f64, f64)> = self.nodes.iter().map(|node| (node.y, node.x)).collect();
        self.travel_times = provider.matrix_for(&locations)?;
        Ok(self)
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, ReportError> {
        self.nodes
            .get(id)
            .filter(|node| node.id == id)
            .or_else(|| self.nodes.iter().find(|node| node.id == id))
            .ok_or(ReportError::UnknownNodeReference(id))
    }

    pub fn coordinates(&self, id: NodeId) -> Result<(f64, f64), ReportError> {
        self.node(id).map(Node::coordinates)
    }

    /// Service duration of a node, looked up by its job type. Depots and
    /// untyped nodes take no time.
    pub fn service_time(&self, id: NodeId) -> Result<Minutes, ReportError> {
        let node = self.node(id)?;
        match &node.job_type {
            None => Ok(0),
            Some(job_type) => self
                .service_times
                .get(job_type)
                .copied()
                .ok_or_else(|| ReportError::UnknownJobType {
                    node: id,
                    job_type: job_type.clone(),
                }),
        }
    }

    pub fn travel_time(&self, from: NodeId, to: NodeId) -> Result<Minutes, ReportError> {
        let row = self
            .travel_times
            .get(from)
            .ok_or(ReportError::UnknownNodeReference(from))?;
        row.get(to).copied().ok_or(ReportError::UnknownNodeReference(to))
    }

    pub fn customers(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| !node.depot)
    }
}
