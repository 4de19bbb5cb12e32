#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use q_grid::backend::{SimulationRequest, SimulationResponse, Simulator};
    use q_grid::config::SessionConfig;
    use q_grid::ir::{GatePlacement, GateType, MAX_QUBITS, MIN_QUBITS};
    use q_grid::results::Counts;
    use q_grid::{CircuitError, PlacementFault, Session, SimulationError, SimulationResult};
    use std::sync::Mutex;

    /// Replies with a fixed response and records what it was sent.
    struct Canned {
        response: SimulationResponse,
        seen: Mutex<Vec<SimulationRequest>>,
    }

    impl Canned {
        fn new(response: SimulationResponse) -> Self {
            Self {
                response,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Simulator for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn simulate(&self, request: &SimulationRequest) -> SimulationResult<SimulationResponse> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.response.clone())
        }
    }

    fn counts(pairs: &[(&str, u64)]) -> Counts {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn session_with(qubits: usize, response: SimulationResponse) -> Session<Canned> {
        let config = SessionConfig {
            initial_qubits: qubits,
            ..SessionConfig::default()
        };
        Session::new(Canned::new(response), &config).expect("valid config")
    }

    #[test]
    fn test_cnot_target_choice() {
        let mut session = session_with(2, SimulationResponse::failed("unused"));

        let good = GatePlacement::new(GateType::CX, 0, 0).with_target(1);
        session.place(good).expect("CNOT 0 -> 1 is legal");

        let bad = GatePlacement::new(GateType::CX, 0, 0).with_target(0);
        let err = session.place(bad).unwrap_err();
        assert!(matches!(
            err,
            CircuitError::InvalidPlacement {
                gate: GateType::CX,
                reason: PlacementFault::DuplicateWire { .. },
            }
        ));
        assert_eq!(session.circuit().list(), &[good]);
    }

    #[test]
    fn test_toffoli_on_two_qubits() {
        let session = session_with(2, SimulationResponse::failed("unused"));
        for qubit in 0..2 {
            assert_eq!(
                session.check(GateType::CCX, qubit),
                Err(CircuitError::InsufficientQubits {
                    gate: GateType::CCX,
                    required: 3,
                    available: 2,
                })
            );
        }
    }

    #[test]
    fn test_shrinking_drops_cnot_on_removed_wire() {
        let mut session = session_with(4, SimulationResponse::failed("unused"));
        session
            .place(GatePlacement::new(GateType::CX, 2, 0).with_target(3))
            .unwrap();

        assert_eq!(session.remove_qubit(), Ok(3));
        assert_eq!(session.stats().gate_count, 0);
        assert_eq!(session.remove_qubit(), Ok(2));
        assert_eq!(session.stats().num_qubits, 2);
    }

    #[test]
    fn test_qubit_bounds() {
        let mut session = session_with(MAX_QUBITS, SimulationResponse::failed("unused"));
        session.place(GatePlacement::new(GateType::H, 9, 7)).unwrap();
        let before = session.circuit().clone();
        assert_eq!(
            session.add_qubit(),
            Err(CircuitError::CapacityExceeded { max: MAX_QUBITS })
        );
        assert_eq!(session.circuit(), &before);

        let mut session = session_with(MIN_QUBITS, SimulationResponse::failed("unused"));
        session.place(GatePlacement::new(GateType::X, 0, 0)).unwrap();
        let before = session.circuit().clone();
        assert_eq!(
            session.remove_qubit(),
            Err(CircuitError::MinimumReached { min: MIN_QUBITS })
        );
        assert_eq!(session.circuit(), &before);
    }

    #[tokio::test]
    async fn test_bell_state_run() {
        let mut session = session_with(
            2,
            SimulationResponse::ok(counts(&[("00", 150), ("11", 50)])),
        );
        session
            .place(GatePlacement::new(GateType::CX, 0, 1).with_target(1))
            .unwrap();
        session.place(GatePlacement::new(GateType::H, 0, 0)).unwrap();

        let histogram = session.run().await.expect("simulation succeeds");
        let series: Vec<_> = histogram.series().collect();
        assert_eq!(series, vec![("00", 150), ("01", 0), ("10", 0), ("11", 50)]);
        assert_eq!(histogram.total(), 200);
        assert_eq!(histogram.discrepancy(), 0);
        assert_eq!(histogram.percentages(), vec![75, 0, 0, 25]);

        let seen = session.simulator().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let positions: Vec<_> = seen[0].circuit.iter().map(|g| g.position).collect();
        assert_eq!(positions, vec![0, 1]);
        assert_eq!(seen[0].num_qubits, 2);
    }

    #[tokio::test]
    async fn test_rejected_run_surfaces_error() {
        let mut session = session_with(1, SimulationResponse::failed("Empty circuit"));
        session.place(GatePlacement::new(GateType::H, 0, 0)).unwrap();
        let before = session.circuit().clone();

        let err = session.run().await.unwrap_err();
        assert_eq!(err, SimulationError::Rejected("Empty circuit".to_string()));
        assert_eq!(session.circuit(), &before);
    }

    #[tokio::test]
    async fn test_malformed_counts() {
        let mut session = session_with(2, SimulationResponse::ok(counts(&[("0101", 200)])));
        session.place(GatePlacement::new(GateType::X, 1, 0)).unwrap();
        assert!(matches!(
            session.run().await,
            Err(SimulationError::MalformedResult(_))
        ));
    }

    #[tokio::test]
    async fn test_snapshot_load_then_run() {
        let json = r#"{
            "circuit": [
                {"type": "h", "qubit": 0, "position": 0},
                {"type": "toff", "qubit": 0, "position": 1, "target": 2, "control2": 1}
            ],
            "num_qubits": 3
        }"#;
        let mut session = session_with(4, SimulationResponse::ok(counts(&[("000", 100), ("111", 100)])));
        let mut events = session.subscribe();
        session
            .load(q_grid::snapshot::Snapshot::from_json(json).unwrap())
            .unwrap();
        assert_eq!(events.try_recv().unwrap(), q_grid::CircuitEvent::Loaded);
        assert_eq!(session.stats().num_qubits, 3);

        let histogram = session.run().await.unwrap();
        assert_eq!(histogram.entries().len(), 8);
        assert_eq!(
            histogram.most_frequent().map(|e| e.state.as_str()),
            Some("000")
        );
    }
}
