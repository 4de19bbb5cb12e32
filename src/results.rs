//! Measurement histogram normalization.
//!
//! Turns the raw `bitstring -> count` map a simulator returns into a
//! complete series with one entry per basis state, in ascending binary order,
//! absent outcomes filled with zero.

use crate::error::{SimulationError, SimulationResult};
use crate::ir::{MAX_QUBITS, MIN_QUBITS};
use nom::{
    bytes::complete::take_while1,
    character::complete::space1,
    combinator::all_consuming,
    multi::separated_list1,
    IResult,
};
use serde::Serialize;
use std::collections::HashMap;
use std::io;
use tracing::{debug, warn};

/// Shots the simulator is asked to run.
pub const SIMULATION_SHOTS: u64 = 200;

/// Raw outcome counts keyed by bit-string.
pub type Counts = HashMap<String, u64>;

/// One bar of the histogram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistogramEntry {
    pub state: String,
    pub count: u64,
}

/// Complete, ordered measurement distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Histogram {
    num_qubits: usize,
    expected_shots: u64,
    entries: Vec<HistogramEntry>,
}

// --- Key parsing ---

fn bits(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c == '0' || c == '1')(input)
}

/// Register groups of an outcome key, e.g. `"01 00"` -> `["01", "00"]`.
fn register_groups(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(separated_list1(space1, bits))(input)
}

/// Resolves an outcome key to a basis-state index.
///
/// Keys made of several space-separated registers keep only the left-most
/// register, which holds the final measurement of every wire.
fn outcome_index(key: &str, num_qubits: usize) -> SimulationResult<usize> {
    let (_, groups) = register_groups(key.trim())
        .map_err(|_| SimulationError::MalformedResult(format!("invalid outcome key '{key}'")))?;
    let state = groups[0];
    if state.len() != num_qubits {
        return Err(SimulationError::MalformedResult(format!(
            "outcome '{key}' has {} bits, expected {num_qubits}",
            state.len()
        )));
    }
    usize::from_str_radix(state, 2)
        .map_err(|e| SimulationError::MalformedResult(format!("outcome '{key}': {e}")))
}

fn overflow() -> SimulationError {
    SimulationError::MalformedResult("shot total overflows".to_string())
}

fn label(index: usize, num_qubits: usize) -> String {
    format!("{index:0num_qubits$b}")
}

/// Builds the complete histogram for a `num_qubits`-wide register.
///
/// Outcomes missing from `counts` get a zero count. Keys that are not
/// `num_qubits` characters of `0`/`1` make the whole result malformed.
pub fn normalize(
    counts: &Counts,
    num_qubits: usize,
    expected_shots: u64,
) -> SimulationResult<Histogram> {
    if !(MIN_QUBITS..=MAX_QUBITS).contains(&num_qubits) {
        return Err(SimulationError::MalformedResult(format!(
            "unsupported register width {num_qubits}"
        )));
    }
    let size = 1usize << num_qubits;
    let mut values = vec![0u64; size];
    let mut total = 0u64;
    for (key, &count) in counts {
        let index = outcome_index(key, num_qubits)?;
        total = total.checked_add(count).ok_or_else(overflow)?;
        values[index] = values[index].checked_add(count).ok_or_else(overflow)?;
    }

    let entries = values
        .into_iter()
        .enumerate()
        .map(|(index, count)| HistogramEntry {
            state: label(index, num_qubits),
            count,
        })
        .collect();

    let histogram = Histogram {
        num_qubits,
        expected_shots,
        entries,
    };

    let discrepancy = histogram.discrepancy();
    if discrepancy != 0 {
        warn!(
            total = histogram.total(),
            expected = expected_shots,
            discrepancy,
            "Observed shot total differs from expected"
        );
    } else {
        debug!("Normalized {} outcomes over {} states", counts.len(), size);
    }

    Ok(histogram)
}

impl Histogram {
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    pub fn expected_shots(&self) -> u64 {
        self.expected_shots
    }

    pub fn entries(&self) -> &[HistogramEntry] {
        &self.entries
    }

    /// `(label, count)` pairs for a chart.
    pub fn series(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|e| (e.state.as_str(), e.count))
    }

    /// Sum of all observed counts.
    ///
    /// Never overflows: [`normalize`] rejects counts whose sum does not fit.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Expected shots minus observed total, saturating at the `i64` bounds.
    /// Diagnostic only.
    pub fn discrepancy(&self) -> i64 {
        let diff = i128::from(self.expected_shots) - i128::from(self.total());
        diff.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
    }

    /// Each count as a whole percentage of the expected shots.
    pub fn percentages(&self) -> Vec<u64> {
        if self.expected_shots == 0 {
            return vec![0; self.entries.len()];
        }
        self.entries
            .iter()
            .map(|e| (e.count as f64 / self.expected_shots as f64 * 100.0).round() as u64)
            .collect()
    }

    /// Each count as a fraction of the observed total.
    pub fn probabilities(&self) -> Vec<f64> {
        let total = self.total();
        self.entries
            .iter()
            .map(|e| {
                if total == 0 {
                    0.0
                } else {
                    e.count as f64 / total as f64
                }
            })
            .collect()
    }

    /// The outcome seen most often; the lowest state wins ties.
    pub fn most_frequent(&self) -> Option<&HistogramEntry> {
        self.entries
            .iter()
            .filter(|e| e.count > 0)
            .fold(None, |best: Option<&HistogramEntry>, e| match best {
                Some(b) if b.count >= e.count => Some(b),
                _ => Some(e),
            })
    }

    /// Writes the series as CSV with a `state,count` header.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for entry in &self.entries {
            wtr.serialize(entry)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(pairs: &[(&str, u64)]) -> Counts {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_bell_state_histogram() {
        let hist = normalize(&counts(&[("00", 150), ("11", 50)]), 2, SIMULATION_SHOTS).unwrap();
        let series: Vec<_> = hist.series().collect();
        assert_eq!(series, vec![("00", 150), ("01", 0), ("10", 0), ("11", 50)]);
        assert_eq!(hist.total(), 200);
        assert_eq!(hist.discrepancy(), 0);
    }

    #[test]
    fn test_empty_counts_zero_filled() {
        let hist = normalize(&Counts::new(), 3, SIMULATION_SHOTS).unwrap();
        assert_eq!(hist.entries().len(), 8);
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.discrepancy(), 200);
        assert_eq!(hist.most_frequent(), None);
    }

    #[test]
    fn test_discrepancy_is_signed() {
        let hist = normalize(&counts(&[("1", 230)]), 1, SIMULATION_SHOTS).unwrap();
        assert_eq!(hist.discrepancy(), -30);
    }

    #[test]
    fn test_overflowing_total_is_malformed() {
        let err = normalize(
            &counts(&[("00", u64::MAX), ("11", 1)]),
            2,
            SIMULATION_SHOTS,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SimulationError::MalformedResult("shot total overflows".to_string())
        );

        let err = normalize(
            &counts(&[("0 0", u64::MAX), ("0 1", 1)]),
            1,
            SIMULATION_SHOTS,
        )
        .unwrap_err();
        assert!(matches!(err, SimulationError::MalformedResult(_)));
    }

    #[test]
    fn test_huge_counts_keep_discrepancy_sign() {
        let hist = normalize(&counts(&[("0", 1 << 63)]), 1, SIMULATION_SHOTS).unwrap();
        assert_eq!(hist.total(), 1 << 63);
        assert_eq!(hist.discrepancy(), 200 - (1i64 << 62) - (1i64 << 62));

        let hist = normalize(&counts(&[("1", u64::MAX)]), 1, SIMULATION_SHOTS).unwrap();
        assert_eq!(hist.discrepancy(), i64::MIN);

        let hist = normalize(&Counts::new(), 1, u64::MAX).unwrap();
        assert_eq!(hist.discrepancy(), i64::MAX);
    }

    #[test]
    fn test_register_grouped_keys() {
        let hist = normalize(
            &counts(&[("01 00", 120), ("10 00", 80)]),
            2,
            SIMULATION_SHOTS,
        )
        .unwrap();
        let series: Vec<_> = hist.series().collect();
        assert_eq!(series, vec![("00", 0), ("01", 120), ("10", 80), ("11", 0)]);
    }

    #[test]
    fn test_wrong_length_key_is_malformed() {
        let err = normalize(&counts(&[("000", 10)]), 2, SIMULATION_SHOTS).unwrap_err();
        assert!(matches!(err, SimulationError::MalformedResult(_)));
    }

    #[test]
    fn test_non_binary_key_is_malformed() {
        for key in ["0x1", "ab", "", "01  "] {
            let res = normalize(&counts(&[(key, 1)]), 2, SIMULATION_SHOTS);
            if key.trim() == "01" {
                assert!(res.is_ok());
            } else {
                assert!(
                    matches!(res, Err(SimulationError::MalformedResult(_))),
                    "key {key:?} should be rejected"
                );
            }
        }
    }

    #[test]
    fn test_percentages_and_probabilities() {
        let hist = normalize(&counts(&[("0", 101), ("1", 199)]), 1, 300).unwrap();
        assert_eq!(hist.percentages(), vec![34, 66]);
        let probs = hist.probabilities();
        assert!((probs[0] - 101.0 / 300.0).abs() < 1e-12);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_most_frequent_prefers_lowest_state_on_tie() {
        let hist = normalize(&counts(&[("10", 100), ("01", 100)]), 2, SIMULATION_SHOTS).unwrap();
        assert_eq!(hist.most_frequent().map(|e| e.state.as_str()), Some("01"));
    }

    #[test]
    fn test_write_csv() {
        let hist = normalize(&counts(&[("1", 200)]), 1, SIMULATION_SHOTS).unwrap();
        let mut buf = Vec::new();
        hist.write_csv(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "state,count\n0,0\n1,200\n");
    }
}
