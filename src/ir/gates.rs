use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quantum Gate Types
///
/// The fixed palette of gates the editor can place on the grid.
/// It includes single-qubit gates (H, X, Y, Z, T, S), two-qubit gates
/// (CX, SWAP) and the three-qubit Toffoli gate (CCX).
///
/// On the wire gates are named the way the editor palette names them:
/// `h`, `x`, `y`, `z`, `t`, `s`, `cnot`, `swap` and `toff`.
///
/// # Examples
///
/// ```
/// use q_grid::ir::GateType;
/// let cx: GateType = "cnot".parse().unwrap();
/// assert_eq!(cx, GateType::CX);
/// assert_eq!(cx.arity(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateType {
    /// Hadamard gate
    H,
    /// Pauli-X gate (NOT)
    X,
    /// Pauli-Y gate
    Y,
    /// Pauli-Z gate
    Z,
    /// T gate (sqrt(S))
    T,
    /// S gate (sqrt(Z))
    S,
    /// Controlled-NOT gate
    #[serde(rename = "cnot", alias = "cx")]
    CX,
    /// Swap gate
    SWAP,
    /// Toffoli gate (CCX)
    #[serde(rename = "toff", alias = "ccx", alias = "toffoli")]
    CCX,
}

impl GateType {
    /// Every gate in palette order.
    pub const ALL: [GateType; 9] = [
        GateType::H,
        GateType::X,
        GateType::Y,
        GateType::Z,
        GateType::T,
        GateType::S,
        GateType::CX,
        GateType::SWAP,
        GateType::CCX,
    ];

    /// Number of distinct wires the gate acts on.
    pub fn arity(self) -> usize {
        match self {
            GateType::CX | GateType::SWAP => 2,
            GateType::CCX => 3,
            _ => 1,
        }
    }

    /// Palette identifier, as used in snapshots and simulator requests.
    pub fn name(self) -> &'static str {
        match self {
            GateType::H => "h",
            GateType::X => "x",
            GateType::Y => "y",
            GateType::Z => "z",
            GateType::T => "t",
            GateType::S => "s",
            GateType::CX => "cnot",
            GateType::SWAP => "swap",
            GateType::CCX => "toff",
        }
    }
}

impl fmt::Display for GateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name().to_uppercase())
    }
}

/// Error returned when a gate name is not part of the palette.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown gate: {0}")]
pub struct UnknownGate(pub String);

impl FromStr for GateType {
    type Err = UnknownGate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "h" => Ok(GateType::H),
            "x" => Ok(GateType::X),
            "y" => Ok(GateType::Y),
            "z" => Ok(GateType::Z),
            "t" => Ok(GateType::T),
            "s" => Ok(GateType::S),
            "cnot" | "cx" => Ok(GateType::CX),
            "swap" => Ok(GateType::SWAP),
            "toff" | "ccx" | "toffoli" => Ok(GateType::CCX),
            _ => Err(UnknownGate(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity() {
        assert_eq!(GateType::H.arity(), 1);
        assert_eq!(GateType::S.arity(), 1);
        assert_eq!(GateType::CX.arity(), 2);
        assert_eq!(GateType::SWAP.arity(), 2);
        assert_eq!(GateType::CCX.arity(), 3);
    }

    #[test]
    fn test_parse_palette_names() {
        for gate in GateType::ALL {
            assert_eq!(gate.name().parse::<GateType>(), Ok(gate));
        }
        assert_eq!("CNOT".parse::<GateType>(), Ok(GateType::CX));
        assert_eq!("toffoli".parse::<GateType>(), Ok(GateType::CCX));
    }

    #[test]
    fn test_unknown_gate() {
        let err = "rx".parse::<GateType>().unwrap_err();
        assert!(err.to_string().contains("rx"));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&GateType::CX).unwrap(), "\"cnot\"");
        assert_eq!(serde_json::to_string(&GateType::CCX).unwrap(), "\"toff\"");
        assert_eq!(serde_json::to_string(&GateType::H).unwrap(), "\"h\"");
        let swap: GateType = serde_json::from_str("\"swap\"").unwrap();
        assert_eq!(swap, GateType::SWAP);
    }

    #[test]
    fn test_display_is_uppercase() {
        assert_eq!(GateType::CX.to_string(), "CNOT");
        assert_eq!(GateType::CCX.to_string(), "TOFF");
    }
}
