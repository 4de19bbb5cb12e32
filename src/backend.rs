//! Simulator boundary.
//!
//! The simulator is an external service. This module defines the JSON
//! request/response contract, the [`Simulator`] trait the session talks to,
//! and [`HttpSimulator`], a client for the editor's `/simulate` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

use crate::config::SessionConfig;
use crate::error::{SimulationError, SimulationResult};
use crate::ir::{Circuit, GatePlacement};
use crate::results::Counts;

/// Body sent to the simulator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Placements in execution order.
    pub circuit: Vec<GatePlacement>,
    pub num_qubits: usize,
}

impl SimulationRequest {
    pub fn from_circuit(circuit: &Circuit) -> Self {
        Self {
            circuit: circuit.sorted_by_position(),
            num_qubits: circuit.num_qubits(),
        }
    }
}

/// Body returned by the simulator.
///
/// Fields other than `success`, `counts` and `error` (e.g. `circuit_depth`)
/// are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<Counts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SimulationResponse {
    pub fn ok(counts: Counts) -> Self {
        Self {
            success: true,
            counts: Some(counts),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            counts: None,
            error: Some(error.into()),
        }
    }

    /// Decodes a raw response body.
    ///
    /// A body that is not JSON is a transport failure; JSON of the wrong
    /// shape is a malformed result.
    pub fn from_json(body: &str) -> SimulationResult<Self> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        serde_json::from_value(value)
            .map_err(|e| SimulationError::MalformedResult(e.to_string()))
    }

    /// Extracts the counts, turning a refusal or a missing result into an error.
    pub fn into_counts(self) -> SimulationResult<Counts> {
        if !self.success {
            return Err(SimulationError::Rejected(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        self.counts
            .ok_or_else(|| SimulationError::MalformedResult("response has no counts".to_string()))
    }
}

/// Something that can run a circuit and report outcome counts.
#[async_trait]
pub trait Simulator: Send + Sync {
    /// Returns the name of the simulator.
    fn name(&self) -> &str;

    /// Submits a circuit and waits for the reply.
    ///
    /// Transport failures are errors; a reply with `success: false` is
    /// returned as a response and interpreted by the caller.
    async fn simulate(&self, request: &SimulationRequest) -> SimulationResult<SimulationResponse>;
}

/// Client for a simulator reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSimulator {
    client: Client,
    /// Base URL without trailing slash.
    base_url: String,
}

impl HttpSimulator {
    /// Creates a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> SimulationResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10).min(timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &SessionConfig) -> SimulationResult<Self> {
        Self::new(
            config.simulator_url.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn endpoint(&self) -> String {
        format!("{}/simulate", self.base_url)
    }
}

#[async_trait]
impl Simulator for HttpSimulator {
    fn name(&self) -> &str {
        &self.base_url
    }

    #[instrument(skip(self, request), fields(gates = request.circuit.len(), num_qubits = request.num_qubits))]
    async fn simulate(&self, request: &SimulationRequest) -> SimulationResult<SimulationResponse> {
        let url = self.endpoint();
        debug!("POST {}", url);

        let resp = self.client.post(&url).json(request).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(SimulationError::Transport(format!(
                "HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }
        SimulationResponse::from_json(&body)
    }
}
