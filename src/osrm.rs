//! OSRM HTTP adapter for travel-time matrices.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::traits::DistanceMatrixProvider;
use crate::Minutes;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Error)]
pub enum OsrmError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("OSRM returned no durations")]
    MissingDurations,

    #[error("no route between locations {from} and {to}")]
    Unreachable { from: usize, to: usize },
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, OsrmError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn table_url(&self, locations: &[(f64, f64)]) -> String {
        let coords = locations
            .iter()
            .map(|(lat, lng)| format!("{:.6},{:.6}", lng, lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/table/v1/{}/{}?annotations=duration",
            self.config.base_url, self.config.profile, coords
        )
    }
}

impl DistanceMatrixProvider for OsrmClient {
    type Error = OsrmError;

    fn matrix_for(&self, locations: &[(f64, f64)]) -> Result<Vec<Vec<Minutes>>, OsrmError> {
        if locations.is_empty() {
            return Ok(Vec::new());
        }

        let body = self
            .client
            .get(self.table_url(locations))
            .send()?
            .error_for_status()?
            .json::<OsrmTableResponse>()?;

        durations_to_minutes(body)
    }
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    durations: Option<Vec<Vec<Option<f64>>>>,
}

/// OSRM reports seconds; unreachable pairs come back as `null`.
fn durations_to_minutes(body: OsrmTableResponse) -> Result<Vec<Vec<Minutes>>, OsrmError> {
    let durations = body.durations.ok_or(OsrmError::MissingDurations)?;

    durations
        .into_iter()
        .enumerate()
        .map(|(from, row)| {
            row.into_iter()
                .enumerate()
                .map(|(to, seconds)| {
                    seconds
                        .map(|seconds| (seconds / 60.0).round() as Minutes)
                        .ok_or(OsrmError::Unreachable { from, to })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}
