//! A full reporting pass over a solved assignment.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::appointments::{build_per_customer, Appointment};
use crate::dropped::{ensure_coverage, find_dropped};
use crate::error::ReportError;
use crate::metrics::{build_report, FleetReport};
use crate::model::{Dataset, Vehicle};
use crate::projection::{project, Projection};
use crate::tours::{compile_tours, Tour};
use crate::traits::AssignmentOracle;
use crate::{Cost, NodeId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Vehicles may finish anywhere; their end slot is a zero-cost
    /// placeholder that never shows up in a tour.
    pub allow_arbitrary_end: bool,
    /// Upper bound on slots walked per vehicle. Defaults to the slot count plus one.
    pub max_route_steps: Option<usize>,
    /// Extra nodes left out of the appointment report. Depots and vehicle
    /// start nodes are always excluded.
    pub excluded_nodes: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionReport {
    pub tours: Vec<Tour>,
    pub dropped: Vec<NodeId>,
    pub metrics: FleetReport,
    pub appointments: Vec<Appointment>,
    pub projection: Projection,
    pub objective: Cost,
}

/// Decodes tours and dropped nodes, then derives every report from them.
///
/// Nothing is returned unless the whole pass succeeds.
pub fn decode_solution<O>(
    oracle: &O,
    vehicles: &[Vehicle],
    dataset: &Dataset,
    options: &ReportOptions,
) -> Result<SolutionReport, ReportError>
where
    O: AssignmentOracle + Sync + ?Sized,
{
    if vehicles.is_empty() {
        return Err(ReportError::EmptyFleet);
    }

    let tours = compile_tours(oracle, options.allow_arbitrary_end, options.max_route_steps)?;
    let dropped = find_dropped(oracle);
    let starts: Vec<NodeId> = vehicles.iter().map(|vehicle| vehicle.start_node).collect();
    ensure_coverage(&tours, &dropped, dataset, &starts)?;

    let metrics = build_report(vehicles, &tours, oracle, dataset)?;

    let excluded = excluded_nodes(vehicles, dataset, options);
    let appointments = build_per_customer(&dataset.nodes, oracle, &dropped, &excluded)?;

    let projection = project(&tours, dataset, &dropped)?;

    info!(
        vehicles = vehicles.len(),
        dropped = dropped.len(),
        objective = metrics.objective,
        "decoded solution"
    );

    Ok(SolutionReport {
        objective: metrics.objective,
        tours,
        dropped,
        metrics,
        appointments,
        projection,
    })
}

fn excluded_nodes(vehicles: &[Vehicle], dataset: &Dataset, options: &ReportOptions) -> Vec<NodeId> {
    let mut excluded: Vec<NodeId> = dataset
        .nodes
        .iter()
        .filter(|node| node.depot)
        .map(|node| node.id)
        .chain(vehicles.iter().map(|vehicle| vehicle.start_node))
        .chain(options.excluded_nodes.iter().copied())
        .collect();
    excluded.sort_unstable();
    excluded.dedup();
    excluded
}
