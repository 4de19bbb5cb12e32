pub mod circuit;
pub mod gates;
pub mod placement;

// Re-export for easier access
pub use circuit::{
    Circuit, CircuitStats, DEFAULT_QUBITS, GRID_DEPTH, MAX_QUBITS, MIN_QUBITS,
};
pub use gates::{GateType, UnknownGate};
pub use placement::{Cell, GatePlacement};
