//! Per-output scanning shared by every topic manager.
//!
//! Outputs are evaluated in ascending index order. An output that fails any rule is recorded
//! as rejected and the scan goes on; only an envelope that cannot be parsed empties the result.

use crate::{
    errors::{AdmissionError, AdmissionResult},
    payload::ProtocolPayload,
};
use overlay_consensus_core::{
    EnvelopeError,
    tx::{PopulatedTransaction, TransactionOutput},
};
use overlay_core::debug;
use overlay_txscript::{PushDropToken, ScriptViewer};
use serde::Serialize;

/// Output indices to admit and previous coin indices to keep tracking.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmittanceInstructions {
    pub outputs_to_admit: Vec<u32>,
    pub coins_to_retain: Vec<u32>,
}

impl AdmittanceInstructions {
    pub fn is_empty(&self) -> bool {
        self.outputs_to_admit.is_empty() && self.coins_to_retain.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdmittedOutput {
    pub index: u32,
    /// `None` for topics that admit outputs without reading them.
    pub payload: Option<ProtocolPayload>,
}

/// An output left out of the admission and the first rule it broke.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRejection {
    pub index: u32,
    pub error: AdmissionError,
}

/// A previous coin that could not be taken into account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoinRejection {
    pub index: u32,
    pub error: AdmissionError,
}

/// Everything one evaluation found out, of which [`AdmittanceInstructions`] is the contract
/// with the host engine. The rest is there for callers to log or inspect.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdmissionReport {
    pub instructions: AdmittanceInstructions,
    pub admitted: Vec<AdmittedOutput>,
    pub rejected: Vec<OutputRejection>,
    pub skipped_coins: Vec<CoinRejection>,
    pub parse_error: Option<EnvelopeError>,
}

impl AdmissionReport {
    /// Assembles the report of a completed scan and logs its summary.
    pub fn new(
        topic: &str,
        tx: &PopulatedTransaction,
        scan: OutputScan,
        coins_to_retain: Vec<u32>,
        skipped_coins: Vec<CoinRejection>,
    ) -> Self {
        for skipped in skipped_coins.iter() {
            debug!("[{}] previous coin {} of {} skipped: {}", topic, skipped.index, tx.id(), skipped.error);
        }
        let outputs_to_admit = scan.admitted.iter().map(|output| output.index).collect::<Vec<_>>();
        debug!(
            "[{}] {}: admitted outputs {:?} of {}, retained coins {:?}",
            topic,
            tx.id(),
            outputs_to_admit,
            tx.tx.outputs.len(),
            coins_to_retain
        );
        Self {
            instructions: AdmittanceInstructions { outputs_to_admit, coins_to_retain },
            admitted: scan.admitted,
            rejected: scan.rejected,
            skipped_coins,
            parse_error: None,
        }
    }

    /// The empty report of an envelope that could not be parsed.
    pub fn parse_failure(error: EnvelopeError) -> Self {
        Self { parse_error: Some(error), ..Default::default() }
    }
}

/// Outcome of [`scan_outputs`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OutputScan {
    pub admitted: Vec<AdmittedOutput>,
    pub rejected: Vec<OutputRejection>,
}

/// Runs `evaluate` on every output in index order, isolating failures per output.
pub fn scan_outputs<F>(topic: &str, tx: &PopulatedTransaction, mut evaluate: F) -> OutputScan
where
    F: FnMut(u32, &TransactionOutput) -> AdmissionResult<Option<ProtocolPayload>>,
{
    let mut scan = OutputScan::default();
    for (index, output) in (0u32..).zip(tx.tx.outputs.iter()) {
        match evaluate(index, output) {
            Ok(payload) => scan.admitted.push(AdmittedOutput { index, payload }),
            Err(error) => {
                debug!(
                    "[{}] output {} not admitted: {} [{}]",
                    topic,
                    tx.tx.outpoint(index),
                    error,
                    ScriptViewer::new(output.script_public_key.script())
                );
                scan.rejected.push(OutputRejection { index, error });
            }
        }
    }
    scan
}

/// Decodes the PushDrop token locked by `output`.
pub fn decode_token(output: &TransactionOutput) -> AdmissionResult<PushDropToken> {
    Ok(PushDropToken::decode(output.script_public_key.script())?)
}
