//! Per-vehicle and fleet-wide time, cost and utilization metrics.

use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ReportError;
use crate::model::{Dataset, Vehicle};
use crate::tours::Tour;
use crate::traits::AssignmentOracle;
use crate::{Cost, Minutes, NodeId, VehicleId};

/// Time the solver committed to leave a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Departure {
    pub node: NodeId,
    pub time: Minutes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteMetrics {
    pub vehicle: VehicleId,
    /// Service time spent at the visited nodes.
    pub job_time: Minutes,
    /// Raw travel time taken from the travel-time matrix.
    pub drive_time: Minutes,
    /// Arc cost as seen by the solver's objective.
    pub job_drive_time: Cost,
    /// Time dimension value at the end of the route, zero for an idle vehicle.
    pub finish_time: Minutes,
    pub work_window: Minutes,
    pub departures: Vec<Departure>,
    /// `None` when the work window is empty.
    pub utilization: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetTotals {
    pub job_time: Minutes,
    pub drive_time: Minutes,
    pub job_drive_time: Cost,
    pub finish_time: Minutes,
    pub work_window: Minutes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetReport {
    pub vehicles: Vec<RouteMetrics>,
    pub totals: FleetTotals,
    /// Mean over the vehicles whose utilization is defined.
    pub mean_utilization: Option<f64>,
    /// Fleet job time against the fleet work window.
    pub fleet_utilization: Option<f64>,
    /// Solver objective, passed through. It minimises `job_drive_time`, not
    /// finish time, so the two may diverge.
    pub objective: Cost,
}

/// Job time per hundred minutes of work window.
///
/// Note the divisor is `window / 100`, so values exceed 100 once the job time
/// exceeds the window.
pub fn utilization(vehicle: VehicleId, job_time: Minutes, work_window: Minutes) -> Result<f64, ReportError> {
    if work_window <= 0 {
        return Err(ReportError::UndefinedUtilization(vehicle));
    }
    Ok(job_time as f64 / (work_window as f64 / 100.0))
}

/// Walks every tour and accumulates its metrics.
///
/// `vehicles` and `tours` are matched by vehicle id. All node references are
/// checked before anything is accumulated.
pub fn build_report<O>(
    vehicles: &[Vehicle],
    tours: &[Tour],
    oracle: &O,
    dataset: &Dataset,
) -> Result<FleetReport, ReportError>
where
    O: AssignmentOracle + Sync + ?Sized,
{
    if vehicles.is_empty() {
        return Err(ReportError::EmptyFleet);
    }

    let pairs = vehicles
        .iter()
        .map(|vehicle| {
            tours
                .iter()
                .find(|tour| tour.vehicle == vehicle.id)
                .map(|tour| (vehicle, tour))
                .ok_or_else(|| ReportError::MalformedAssignment {
                    vehicle: vehicle.id,
                    reason: "no tour compiled for vehicle".to_string(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    for (_, tour) in &pairs {
        validate_tour(tour, dataset)?;
    }

    let metrics = pairs
        .par_iter()
        .map(|(vehicle, tour)| route_metrics(vehicle, tour, oracle, dataset))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(summarize(metrics, oracle.objective_value()))
}

fn validate_tour(tour: &Tour, dataset: &Dataset) -> Result<(), ReportError> {
    for leg in tour.legs() {
        dataset.service_time(leg.from.node)?;
        if !leg.to_placeholder {
            dataset.travel_time(leg.from.node, leg.to.node)?;
        }
    }
    Ok(())
}

fn route_metrics<O>(vehicle: &Vehicle, tour: &Tour, oracle: &O, dataset: &Dataset) -> Result<RouteMetrics, ReportError>
where
    O: AssignmentOracle + ?Sized,
{
    // A vehicle that never leaves its start contributes nothing, finish time included.
    let idle = tour
        .stops
        .iter()
        .all(|stop| oracle.is_start(stop.index) || oracle.is_end(stop.index));

    let mut metrics = RouteMetrics {
        vehicle: vehicle.id,
        job_time: 0,
        drive_time: 0,
        job_drive_time: 0,
        finish_time: if idle { 0 } else { oracle.cumulative_time(tour.end.index) },
        work_window: vehicle.work_window(),
        departures: Vec::with_capacity(tour.stops.len()),
        utilization: None,
    };

    let legs = if idle { Vec::new() } else { tour.legs() };
    for leg in legs {
        metrics.departures.push(Departure {
            node: leg.from.node,
            time: oracle.cumulative_time(leg.from.index),
        });
        metrics.job_drive_time += oracle.arc_cost(leg.from.index, leg.to.index, vehicle.id);
        if !leg.to_placeholder {
            metrics.drive_time += dataset.travel_time(leg.from.node, leg.to.node)?;
        }
        metrics.job_time += dataset.service_time(leg.from.node)?;
    }

    metrics.utilization = match utilization(vehicle.id, metrics.job_time, metrics.work_window) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(vehicle = vehicle.id, "{}", err);
            None
        }
    };

    Ok(metrics)
}

fn summarize(vehicles: Vec<RouteMetrics>, objective: Cost) -> FleetReport {
    let totals = vehicles.iter().fold(FleetTotals::default(), |mut totals, metrics| {
        totals.job_time += metrics.job_time;
        totals.drive_time += metrics.drive_time;
        totals.job_drive_time += metrics.job_drive_time;
        totals.finish_time += metrics.finish_time;
        totals.work_window += metrics.work_window;
        totals
    });

    let defined: Vec<f64> = vehicles.iter().filter_map(|metrics| metrics.utilization).collect();
    let mean_utilization = if defined.is_empty() {
        None
    } else {
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    };
    let fleet_utilization = if totals.work_window > 0 {
        Some(totals.job_time as f64 / (totals.work_window as f64 / 100.0))
    } else {
        None
    };

    FleetReport {
        vehicles,
        totals,
        mean_utilization,
        fleet_utilization,
        objective,
    }
}

fn fmt_utilization(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{:.1}", value),
        None => "undefined".to_string(),
    }
}

impl fmt::Display for FleetReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for metrics in &self.vehicles {
            writeln!(
                f,
                "Vehicle {}: job time {} min, drive time {} min, job+drive cost {}, finished at {}, utilization {}",
                metrics.vehicle,
                metrics.job_time,
                metrics.drive_time,
                metrics.job_drive_time,
                metrics.finish_time,
                fmt_utilization(metrics.utilization),
            )?;
        }
        writeln!(
            f,
            "Fleet: job time {} min, drive time {} min, job+drive cost {}, finish time {} min",
            self.totals.job_time, self.totals.drive_time, self.totals.job_drive_time, self.totals.finish_time,
        )?;
        writeln!(
            f,
            "Average utilization {}, fleet utilization {}",
            fmt_utilization(self.mean_utilization),
            fmt_utilization(self.fleet_utilization),
        )?;
        write!(f, "Objective {} (minimises job+drive cost, not finish time)", self.objective)
    }
}
