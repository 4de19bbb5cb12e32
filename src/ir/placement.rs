use super::gates::GateType;
use serde::{Deserialize, Serialize};

/// A single grid cell: one wire at one time step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub qubit: usize,
    pub position: usize,
}

impl Cell {
    pub fn new(qubit: usize, position: usize) -> Self {
        Self { qubit, position }
    }
}

/// A gate placed on the circuit grid.
///
/// `qubit` is the anchor wire (the control for controlled gates). Multi-qubit
/// gates carry the remaining wires in `target` and, for the Toffoli gate,
/// `control2`. Absent operands are omitted when serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GatePlacement {
    /// Type of the gate (e.g., H, CX).
    #[serde(rename = "type")]
    pub gate: GateType,
    /// Anchor wire.
    pub qubit: usize,
    /// Time step along the wire.
    pub position: usize,
    /// Target wire of CX, SWAP and CCX.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<usize>,
    /// Second control wire of CCX.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control2: Option<usize>,
}

impl GatePlacement {
    /// Creates a placement with no target or second control.
    pub fn new(gate: GateType, qubit: usize, position: usize) -> Self {
        Self {
            gate,
            qubit,
            position,
            target: None,
            control2: None,
        }
    }

    pub fn with_target(mut self, target: usize) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_control2(mut self, control2: usize) -> Self {
        self.control2 = Some(control2);
        self
    }

    /// The cell this placement occupies.
    pub fn cell(&self) -> Cell {
        Cell::new(self.qubit, self.position)
    }

    /// Every wire the placement refers to, anchor first.
    pub fn wires(&self) -> Vec<usize> {
        let mut wires = vec![self.qubit];
        wires.extend(self.target);
        wires.extend(self.control2);
        wires
    }

    /// Whether `wire` appears as anchor, target or second control.
    pub fn references(&self, wire: usize) -> bool {
        self.qubit == wire || self.target == Some(wire) || self.control2 == Some(wire)
    }

    /// Highest wire index the placement refers to.
    pub fn max_wire(&self) -> usize {
        self.wires().into_iter().max().unwrap_or(self.qubit)
    }
}
