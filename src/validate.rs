//! Placement validation.
//!
//! Pure checks run before the circuit is mutated. [`can_place`] covers what
//! is known when a gate is first dropped on a cell (gate type and anchor
//! wire); [`can_place_multi`] covers the resolved target and second control
//! of multi-qubit gates. [`validate_placement`] combines both with the grid
//! depth check.

use crate::error::{CircuitError, CircuitResult, PlacementFault};
use crate::ir::{GatePlacement, GateType, GRID_DEPTH};

/// Checks that `gate` fits a circuit of `num_qubits` wires anchored on `qubit`.
///
/// Reports [`CircuitError::InsufficientQubits`] before anything else so the
/// caller can refuse a multi-qubit gate without asking for its other wires.
pub fn can_place(gate: GateType, qubit: usize, num_qubits: usize) -> CircuitResult<()> {
    let required = gate.arity();
    if num_qubits < required {
        return Err(CircuitError::InsufficientQubits {
            gate,
            required,
            available: num_qubits,
        });
    }
    check_wire(gate, qubit, num_qubits)
}

/// Checks the full wire geometry of a placement with resolved operands.
pub fn can_place_multi(
    gate: GateType,
    qubit: usize,
    target: Option<usize>,
    control2: Option<usize>,
    num_qubits: usize,
) -> CircuitResult<()> {
    can_place(gate, qubit, num_qubits)?;

    match gate {
        GateType::CX | GateType::SWAP => {
            if control2.is_some() {
                return Err(CircuitError::invalid(
                    gate,
                    PlacementFault::UnexpectedOperand("control2"),
                ));
            }
            let target =
                target.ok_or_else(|| CircuitError::invalid(gate, PlacementFault::MissingTarget))?;
            check_wire(gate, target, num_qubits)?;
            check_distinct(gate, &[qubit, target])
        }
        GateType::CCX => {
            let target =
                target.ok_or_else(|| CircuitError::invalid(gate, PlacementFault::MissingTarget))?;
            let control2 = control2
                .ok_or_else(|| CircuitError::invalid(gate, PlacementFault::MissingControl))?;
            check_wire(gate, control2, num_qubits)?;
            check_wire(gate, target, num_qubits)?;
            check_distinct(gate, &[qubit, control2, target])
        }
        _ => {
            if target.is_some() {
                return Err(CircuitError::invalid(
                    gate,
                    PlacementFault::UnexpectedOperand("target"),
                ));
            }
            if control2.is_some() {
                return Err(CircuitError::invalid(
                    gate,
                    PlacementFault::UnexpectedOperand("control2"),
                ));
            }
            Ok(())
        }
    }
}

/// Validates a complete placement against a circuit of `num_qubits` wires.
pub fn validate_placement(placement: &GatePlacement, num_qubits: usize) -> CircuitResult<()> {
    if placement.position >= GRID_DEPTH {
        return Err(CircuitError::invalid(
            placement.gate,
            PlacementFault::PositionOutOfRange {
                position: placement.position,
                depth: GRID_DEPTH,
            },
        ));
    }
    can_place_multi(
        placement.gate,
        placement.qubit,
        placement.target,
        placement.control2,
        num_qubits,
    )
}

fn check_wire(gate: GateType, wire: usize, num_qubits: usize) -> CircuitResult<()> {
    if wire < num_qubits {
        Ok(())
    } else {
        Err(CircuitError::invalid(
            gate,
            PlacementFault::WireOutOfRange { wire, num_qubits },
        ))
    }
}

fn check_distinct(gate: GateType, wires: &[usize]) -> CircuitResult<()> {
    let mut sorted = wires.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    if sorted.len() == wires.len() {
        Ok(())
    } else {
        Err(CircuitError::invalid(
            gate,
            PlacementFault::DuplicateWire {
                wires: wires.to_vec(),
            },
        ))
    }
}
