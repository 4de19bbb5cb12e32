//! Editing session.
//!
//! A [`Session`] owns the circuit being edited and the simulator it runs
//! against. Every mutation is validated before it is applied and announced
//! to subscribers as a [`CircuitEvent`], so a view can redraw without
//! inspecting the model itself.

use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use crate::backend::{SimulationRequest, Simulator};
use crate::config::SessionConfig;
use crate::error::{CircuitResult, SimulationError, SimulationResult};
use crate::ir::{Circuit, CircuitStats, GatePlacement, GateType};
use crate::resize::{decrease_qubits, increase_qubits};
use crate::results::{normalize, Histogram};
use crate::snapshot::{Snapshot, SnapshotResult};
use crate::validate::can_place;

const EVENT_CAPACITY: usize = 64;

/// A change to the circuit, published after it has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitEvent {
    /// A gate was placed.
    Placed(GatePlacement),
    /// A gate was pushed out of its cell by a new placement.
    Evicted(GatePlacement),
    /// A gate was deleted.
    Removed(GatePlacement),
    /// Gates dropped because a wire they used was removed.
    Pruned(Vec<GatePlacement>),
    /// The wire count changed.
    QubitsChanged(usize),
    /// Every gate was removed.
    Cleared,
    /// The circuit was replaced by a loaded snapshot.
    Loaded,
}

pub struct Session<S> {
    circuit: Circuit,
    simulator: S,
    shots: u64,
    events: broadcast::Sender<CircuitEvent>,
}

impl<S: Simulator> Session<S> {
    /// Starts a session with an empty circuit of `config.initial_qubits` wires.
    pub fn new(simulator: S, config: &SessionConfig) -> CircuitResult<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Ok(Self {
            circuit: Circuit::new(config.initial_qubits)?,
            simulator,
            shots: config.shots,
            events,
        })
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    /// Statistics for display, recomputed from the circuit.
    pub fn stats(&self) -> CircuitStats {
        self.circuit.stats()
    }

    /// Receives every event published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CircuitEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: CircuitEvent) {
        // no subscribers is fine
        let _ = self.events.send(event);
    }

    /// Checks whether `gate` can be dropped on wire `qubit` at all.
    ///
    /// Call before asking the user for the target and second control of a
    /// multi-qubit gate.
    pub fn check(&self, gate: GateType, qubit: usize) -> CircuitResult<()> {
        can_place(gate, qubit, self.circuit.num_qubits())
    }

    /// Places a gate with resolved wires, replacing any occupant of its cell.
    pub fn place(&mut self, gate: GatePlacement) -> CircuitResult<()> {
        let evicted = self.circuit.add_or_replace(gate).map_err(|e| {
            debug!("Rejected placement {:?}: {}", gate, e);
            e
        })?;
        if let Some(old) = evicted {
            debug!("Evicted {:?}", old);
            self.publish(CircuitEvent::Evicted(old));
        }
        self.publish(CircuitEvent::Placed(gate));
        Ok(())
    }

    /// Deletes the gate at a cell, if any.
    pub fn remove_at(&mut self, qubit: usize, position: usize) -> Option<GatePlacement> {
        let removed = self.circuit.remove_at(qubit, position)?;
        self.publish(CircuitEvent::Removed(removed));
        Some(removed)
    }

    /// Adds a wire. Returns the new wire count.
    pub fn add_qubit(&mut self) -> CircuitResult<usize> {
        let num_qubits = increase_qubits(&mut self.circuit)?;
        self.publish(CircuitEvent::QubitsChanged(num_qubits));
        Ok(num_qubits)
    }

    /// Removes the last wire and every gate touching it. Returns the new
    /// wire count.
    pub fn remove_qubit(&mut self) -> CircuitResult<usize> {
        let pruned = decrease_qubits(&mut self.circuit)?;
        if !pruned.is_empty() {
            info!("Removed {} gate(s) on the dropped wire", pruned.len());
            self.publish(CircuitEvent::Pruned(pruned));
        }
        let num_qubits = self.circuit.num_qubits();
        self.publish(CircuitEvent::QubitsChanged(num_qubits));
        Ok(num_qubits)
    }

    pub fn clear(&mut self) {
        self.circuit.clear();
        self.publish(CircuitEvent::Cleared);
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_circuit(&self.circuit)
    }

    /// Replaces the circuit with a snapshot. The current circuit is kept if
    /// any placement in the snapshot is refused.
    pub fn load(&mut self, snapshot: Snapshot) -> SnapshotResult<()> {
        self.circuit = snapshot.into_circuit()?;
        self.publish(CircuitEvent::Loaded);
        Ok(())
    }

    /// Runs the circuit on the simulator and normalizes the outcome counts.
    ///
    /// The circuit is not modified, whatever the outcome. Concurrent runs are
    /// independent of each other.
    #[instrument(skip(self), fields(simulator = self.simulator.name()))]
    pub async fn run(&self) -> SimulationResult<Histogram> {
        if self.circuit.is_empty() {
            return Err(SimulationError::EmptyCircuit);
        }

        let request = SimulationRequest::from_circuit(&self.circuit);
        info!(
            "Submitting {} gate(s) on {} qubit(s)",
            request.circuit.len(),
            request.num_qubits
        );

        let counts = self
            .simulator
            .simulate(&request)
            .await
            .and_then(|response| response.into_counts())
            .map_err(|e| {
                warn!("Simulation failed: {}", e);
                e
            })?;

        normalize(&counts, request.num_qubits, self.shots)
    }
}
