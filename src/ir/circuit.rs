use super::placement::{Cell, GatePlacement};
use crate::error::{CircuitError, CircuitResult};
use crate::validate::validate_placement;
use std::collections::HashMap;

/// Fewest wires a circuit may have.
pub const MIN_QUBITS: usize = 1;
/// Most wires a circuit may have.
pub const MAX_QUBITS: usize = 10;
/// Wires in a freshly created circuit.
pub const DEFAULT_QUBITS: usize = 4;
/// Time steps per wire.
pub const GRID_DEPTH: usize = 8;

/// Derived statistics shown next to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CircuitStats {
    pub num_qubits: usize,
    pub gate_count: usize,
    pub depth: usize,
}

/// The editable circuit grid.
///
/// A `Circuit` holds the placed gates in insertion order together with an
/// occupancy index keyed by `(qubit, position)`. At most one placement
/// occupies a cell, and no placement refers to a wire at or beyond
/// `num_qubits`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Circuit {
    num_qubits: usize,
    gates: Vec<GatePlacement>,
    occupancy: HashMap<Cell, usize>,
}

impl Default for Circuit {
    fn default() -> Self {
        Self {
            num_qubits: DEFAULT_QUBITS,
            gates: Vec::new(),
            occupancy: HashMap::new(),
        }
    }
}

impl Circuit {
    /// Creates a new empty circuit.
    ///
    /// # Arguments
    ///
    /// * `num_qubits` - The number of wires, within `MIN_QUBITS..=MAX_QUBITS`.
    pub fn new(num_qubits: usize) -> CircuitResult<Self> {
        if !(MIN_QUBITS..=MAX_QUBITS).contains(&num_qubits) {
            return Err(CircuitError::QubitCountOutOfRange(num_qubits));
        }
        Ok(Self {
            num_qubits,
            ..Self::default()
        })
    }

    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Places a gate, evicting whatever occupied its cell.
    ///
    /// The placement is validated first; on error the circuit is unchanged.
    /// Returns the evicted placement, if any.
    pub fn add_or_replace(&mut self, gate: GatePlacement) -> CircuitResult<Option<GatePlacement>> {
        validate_placement(&gate, self.num_qubits)?;
        let evicted = self.remove_at(gate.qubit, gate.position);
        self.occupancy.insert(gate.cell(), self.gates.len());
        self.gates.push(gate);
        Ok(evicted)
    }

    /// Removes the placement at a cell. Absent cells are a no-op.
    pub fn remove_at(&mut self, qubit: usize, position: usize) -> Option<GatePlacement> {
        let index = self.occupancy.remove(&Cell::new(qubit, position))?;
        let removed = self.gates.remove(index);
        self.reindex();
        Some(removed)
    }

    pub fn get(&self, qubit: usize, position: usize) -> Option<&GatePlacement> {
        self.occupancy
            .get(&Cell::new(qubit, position))
            .map(|&index| &self.gates[index])
    }

    pub fn is_occupied(&self, qubit: usize, position: usize) -> bool {
        self.occupancy.contains_key(&Cell::new(qubit, position))
    }

    /// All placements in insertion order.
    pub fn list(&self) -> &[GatePlacement] {
        &self.gates
    }

    /// Placements in execution order: by time step, ties in insertion order.
    pub fn sorted_by_position(&self) -> Vec<GatePlacement> {
        let mut sorted = self.gates.clone();
        sorted.sort_by_key(|gate| gate.position);
        sorted
    }

    /// Highest occupied time step, or 0 for an empty circuit.
    pub fn depth(&self) -> usize {
        self.gates.iter().map(|gate| gate.position).max().unwrap_or(0)
    }

    pub fn gate_count(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    pub fn stats(&self) -> CircuitStats {
        CircuitStats {
            num_qubits: self.num_qubits,
            gate_count: self.gate_count(),
            depth: self.depth(),
        }
    }

    /// Removes every placement; the wire count is kept.
    pub fn clear(&mut self) {
        self.gates.clear();
        self.occupancy.clear();
    }

    pub(crate) fn set_num_qubits(&mut self, num_qubits: usize) {
        self.num_qubits = num_qubits;
    }

    /// Drops placements matching `reject`, returning them in insertion order.
    pub(crate) fn drain_where<F>(&mut self, mut reject: F) -> Vec<GatePlacement>
    where
        F: FnMut(&GatePlacement) -> bool,
    {
        let (dropped, kept): (Vec<_>, Vec<_>) = self.gates.drain(..).partition(|g| reject(g));
        self.gates = kept;
        self.reindex();
        dropped
    }

    fn reindex(&mut self) {
        self.occupancy = self
            .gates
            .iter()
            .enumerate()
            .map(|(index, gate)| (gate.cell(), index))
            .collect();
    }
}
