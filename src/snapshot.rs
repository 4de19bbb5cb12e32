//! Circuit snapshots: the `{ circuit, num_qubits }` document the editor
//! downloads and loads back.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CircuitError;
use crate::ir::{Circuit, GatePlacement};

/// Result type for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid snapshot: {0}")]
    Circuit(#[from] CircuitError),
}

/// Serializable copy of a circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub circuit: Vec<GatePlacement>,
    pub num_qubits: usize,
}

impl Snapshot {
    /// Captures the circuit, placements in insertion order.
    pub fn from_circuit(circuit: &Circuit) -> Self {
        Self {
            circuit: circuit.list().to_vec(),
            num_qubits: circuit.num_qubits(),
        }
    }

    pub fn to_json(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> SnapshotResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuilds a circuit by replaying every placement, in time-step order,
    /// through the validated placement path.
    ///
    /// Fails on the first placement the circuit refuses. Two placements on
    /// the same cell resolve to the later one, as they would in the editor.
    pub fn into_circuit(self) -> SnapshotResult<Circuit> {
        let mut circuit = Circuit::new(self.num_qubits)?;
        let mut gates = self.circuit;
        gates.sort_by_key(|gate| gate.position);
        for gate in gates {
            circuit.add_or_replace(gate)?;
        }
        Ok(circuit)
    }
}
