//! Polyline representation for route geometries.
//!
//! Points are kept in visiting order; nothing is deduplicated or closed.
//! Chart renderers usually want the axes separately, hence [`Polyline::xs`]
//! and [`Polyline::ys`].

use serde::{Deserialize, Serialize};

/// An ordered sequence of `(x, y)` points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn xs(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.0).collect()
    }

    pub fn ys(&self) -> Vec<f64> {
        self.points.iter().map(|point| point.1).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True when the first and last points coincide.
    pub fn is_closed(&self) -> bool {
        self.points.len() > 1 && self.points.first() == self.points.last()
    }
}
