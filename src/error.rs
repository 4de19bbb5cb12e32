//! Error types for circuit editing and simulation.

use crate::ir::GateType;
use thiserror::Error;

/// Result type for circuit model operations.
pub type CircuitResult<T> = Result<T, CircuitError>;

/// Result type for simulation runs.
pub type SimulationResult<T> = Result<T, SimulationError>;

/// The specific constraint a rejected placement violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementFault {
    #[error("a target wire is required")]
    MissingTarget,

    #[error("a second control wire is required")]
    MissingControl,

    #[error("wire {wire} is outside 0..{num_qubits}")]
    WireOutOfRange { wire: usize, num_qubits: usize },

    #[error("wires must be pairwise distinct, got {wires:?}")]
    DuplicateWire { wires: Vec<usize> },

    #[error("unexpected {0} operand")]
    UnexpectedOperand(&'static str),

    #[error("time step {position} is outside 0..{depth}")]
    PositionOutOfRange { position: usize, depth: usize },
}

/// Errors raised while editing a circuit. None of them leave the model
/// partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CircuitError {
    /// Gate geometry violates the range or distinctness rules.
    #[error("Invalid {gate} placement: {reason}")]
    InvalidPlacement { gate: GateType, reason: PlacementFault },

    /// The gate needs more wires than the circuit has.
    #[error("{gate} gate requires at least {required} qubits, circuit has {available}")]
    InsufficientQubits {
        gate: GateType,
        required: usize,
        available: usize,
    },

    /// Qubit count is already at the upper bound.
    #[error("Maximum {max} qubits allowed")]
    CapacityExceeded { max: usize },

    /// Qubit count is already at the lower bound.
    #[error("Minimum {min} qubit required")]
    MinimumReached { min: usize },

    /// A qubit count outside the supported range was requested.
    #[error("Qubit count {0} is outside the supported range")]
    QubitCountOutOfRange(usize),
}

impl CircuitError {
    pub(crate) fn invalid(gate: GateType, reason: PlacementFault) -> Self {
        CircuitError::InvalidPlacement { gate, reason }
    }
}

/// Errors raised while running a circuit on a simulator. The circuit model is
/// never touched when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    /// Nothing to simulate; no request was sent.
    #[error("Please add gates to the circuit before running simulation")]
    EmptyCircuit,

    /// The request could not be completed or the reply could not be decoded.
    #[error("Failed to run simulation: {0}")]
    Transport(String),

    /// The simulator answered with `success: false`.
    #[error("Simulation error: {0}")]
    Rejected(String),

    /// The simulator answered without a usable result.
    #[error("Malformed simulation result: {0}")]
    MalformedResult(String),
}

impl From<reqwest::Error> for SimulationError {
    fn from(e: reqwest::Error) -> Self {
        SimulationError::Transport(e.to_string())
    }
}

impl From<serde_json::Error> for SimulationError {
    fn from(e: serde_json::Error) -> Self {
        SimulationError::Transport(e.to_string())
    }
}
