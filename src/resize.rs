//! Adding and removing wires.

use crate::error::{CircuitError, CircuitResult};
use crate::ir::{Circuit, GatePlacement, MAX_QUBITS, MIN_QUBITS};
use tracing::debug;

/// Adds a wire below the existing ones. Every placement is kept as is.
///
/// Returns the new wire count.
pub fn increase_qubits(circuit: &mut Circuit) -> CircuitResult<usize> {
    let current = circuit.num_qubits();
    if current >= MAX_QUBITS {
        return Err(CircuitError::CapacityExceeded { max: MAX_QUBITS });
    }
    circuit.set_num_qubits(current + 1);
    debug!("Increased qubit count to {}", current + 1);
    Ok(current + 1)
}

/// Removes the last wire together with every gate that touches it.
///
/// A gate is dropped when the removed wire is its anchor, its target or its
/// second control, even if its other wires survive. Returns the dropped
/// placements in insertion order.
pub fn decrease_qubits(circuit: &mut Circuit) -> CircuitResult<Vec<GatePlacement>> {
    let current = circuit.num_qubits();
    if current <= MIN_QUBITS {
        return Err(CircuitError::MinimumReached { min: MIN_QUBITS });
    }
    let removed_wire = current - 1;
    let pruned = circuit.drain_where(|gate| gate.references(removed_wire));
    circuit.set_num_qubits(removed_wire);
    debug!(
        "Decreased qubit count to {}, pruned {} gate(s)",
        removed_wire,
        pruned.len()
    );
    Ok(pruned)
}
