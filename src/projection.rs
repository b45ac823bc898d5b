//! Plot-ready geometry for tours and dropped nodes.

use serde::{Deserialize, Serialize};

use crate::error::ReportError;
use crate::model::Dataset;
use crate::polyline::Polyline;
use crate::tours::Tour;
use crate::{NodeId, VehicleId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSeries {
    pub vehicle: VehicleId,
    pub line: Polyline,
}

/// Geometry handed to an external chart renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub routes: Vec<RouteSeries>,
    /// Unordered point set of the dropped nodes.
    pub dropped: Polyline,
}

/// Maps every tour to an open polyline in tour order, and the dropped nodes
/// to a point set. Fails before producing anything if an id has no
/// coordinates.
pub fn project(tours: &[Tour], dataset: &Dataset, dropped: &[NodeId]) -> Result<Projection, ReportError> {
    let routes = tours
        .iter()
        .map(|tour| -> Result<RouteSeries, ReportError> {
            let points = tour
                .nodes()
                .into_iter()
                .map(|node| dataset.coordinates(node))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(RouteSeries {
                vehicle: tour.vehicle,
                line: Polyline::new(points),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let dropped = dropped
        .iter()
        .map(|&node| dataset.coordinates(node))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Projection {
        routes,
        dropped: Polyline::new(dropped),
    })
}
