//! vrp-report: decoding and analytics for solved routing assignments.
//!
//! Turns a solver's successor-linked assignment into tours, dropped nodes,
//! per-vehicle time/utilization metrics, appointment status and plot-ready
//! geometry.

pub mod error;
pub mod traits;
pub mod model;
pub mod assignment;
pub mod tours;
pub mod dropped;
pub mod metrics;
pub mod appointments;
pub mod polyline;
pub mod projection;
pub mod report;
pub mod osrm;
pub mod haversine;

/// Slot numbering used by the solver; may map several slots to one node.
pub type TraversalIndex = usize;
pub type NodeId = usize;
pub type VehicleId = usize;
pub type Minutes = i64;
pub type Cost = i64;
