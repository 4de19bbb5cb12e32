//! Circuit state model for a grid-based quantum circuit editor.
//!
//! Gates are placed on a grid of qubit wires and time steps. The crate keeps
//! the placement model consistent (one gate per cell, multi-qubit gates on
//! distinct in-range wires, gates pruned when their wire disappears), talks to
//! an external simulator, and turns its counts into a complete histogram.
//!
//! ```
//! use q_grid::ir::{Circuit, GatePlacement, GateType};
//!
//! let mut circuit = Circuit::new(2).unwrap();
//! circuit.add_or_replace(GatePlacement::new(GateType::H, 0, 0)).unwrap();
//! circuit
//!     .add_or_replace(GatePlacement::new(GateType::CX, 0, 1).with_target(1))
//!     .unwrap();
//! assert_eq!(circuit.depth(), 1);
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod ir;
pub mod logging;
pub mod resize;
pub mod results;
pub mod session;
pub mod snapshot;
pub mod validate;

pub use error::{CircuitError, CircuitResult, PlacementFault, SimulationError, SimulationResult};
pub use ir::{Circuit, GatePlacement, GateType};
pub use results::{Histogram, SIMULATION_SHOTS};
pub use session::{CircuitEvent, Session};
