//! Construction Pipeline: the nine-step orchestrator
//!
//! Drives preprocess -> metadata -> payloads -> [parse] -> sign -> combine
//! -> [parse] -> [hash] -> submit, threading each step's outputs into the
//! next step's inputs. Strictly sequential, fail-fast on every mandatory
//! step; the bracketed steps are advisory and governed by configuration.

use std::time::Duration;

use serde_json::{json, Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::{AdvisoryPolicy, Config, PipelineConfig};
use crate::operations::{build_operations, validate_operations, PLACEHOLDER_FEE};
use crate::types::{NetworkIdentifier, SignatureBundle, SubmitReceipt, TransactionIntent};

use super::{ConstructionClient, ConstructionStep, PipelineError, TransactionSigner};

/// Orchestrates one construction run against a service and a signer.
///
/// Holds no per-run state; every `run` call owns its own nonce and blobs, so
/// one pipeline value can serve sequential runs against the same target.
pub struct ConstructionPipeline<S> {
    client: ConstructionClient,
    signer: S,
    network: NetworkIdentifier,
    policy: PipelineConfig,
}

impl<S: TransactionSigner> ConstructionPipeline<S> {
    pub fn new(config: &Config, signer: S) -> Self {
        Self {
            client: ConstructionClient::new(
                config.api.base_url.as_str(),
                Duration::from_secs(config.api.timeout_secs),
            ),
            signer,
            network: NetworkIdentifier::new(
                config.api.blockchain.as_str(),
                config.api.network.as_str(),
            ),
            policy: config.pipeline.clone(),
        }
    }

    /// Execute the full construction run for one intent.
    ///
    /// Returns the submitted transaction hash and replay material on
    /// success; aborts on the first mandatory-step failure with the step
    /// name and raw cause.
    ///
    /// Concurrent runs for the same sender can collide on the nonce, since
    /// each run fetches it independently; serialize runs per sender (or
    /// arbitrate the nonce externally). Cancelling before the submit await
    /// cannot leak a transaction; a cancellation during submit must be
    /// treated as "possibly submitted" and reconciled via hash lookup, not
    /// blind resubmission.
    pub async fn run(
        &self,
        intent: &TransactionIntent,
        private_key: &str,
    ) -> Result<SubmitReceipt, PipelineError> {
        let run_id = Uuid::new_v4();
        let network = serde_json::to_value(&self.network)
            .map_err(|e| PipelineError::Config(format!("network identifier: {e}")))?;

        info!(
            run_id = %run_id,
            kind = intent.kind_name(),
            sender = %intent.sender,
            network = %self.network.network,
            "starting construction run"
        );

        // 1. Preprocess, with the placeholder fee
        let operations = build_operations(intent, PLACEHOLDER_FEE);
        validate_operations(&operations, ConstructionStep::Preprocess)?;
        let preprocess = self
            .client
            .call(
                ConstructionStep::Preprocess,
                &json!({
                    "network_identifier": network,
                    "operations": operations,
                    "metadata": { "memo": intent.memo },
                }),
            )
            .await?;
        let options = preprocess
            .get("options")
            .cloned()
            .ok_or_else(|| missing(ConstructionStep::Preprocess, "options"))?;
        info!(run_id = %run_id, step = "preprocess", "step complete");

        // 2. Metadata: nonce and suggested fee
        let metadata_response = self
            .client
            .call(
                ConstructionStep::Metadata,
                &json!({
                    "network_identifier": network,
                    "options": options,
                }),
            )
            .await?;
        let tx_metadata = metadata_response
            .get("metadata")
            .and_then(Value::as_object)
            .cloned()
            .ok_or_else(|| missing(ConstructionStep::Metadata, "metadata"))?;
        let nonce = tx_metadata
            .get("nonce")
            .cloned()
            .ok_or_else(|| missing(ConstructionStep::Metadata, "metadata.nonce"))?;
        let fee = metadata_response
            .get("suggested_fee")
            .and_then(Value::as_array)
            .and_then(|fees| fees.first())
            .and_then(|fee| fee.get("value"))
            .and_then(Value::as_str)
            .ok_or_else(|| missing(ConstructionStep::Metadata, "suggested_fee[0].value"))?
            .to_string();
        info!(run_id = %run_id, step = "metadata", nonce = %nonce, suggested_fee = %fee, "step complete");

        // 3. Payloads: operations rebuilt with the real fee, nonce merged in
        let operations = build_operations(intent, &fee);
        validate_operations(&operations, ConstructionStep::Payloads)?;
        let mut payloads_metadata: Map<String, Value> = tx_metadata;
        payloads_metadata.insert("nonce".to_string(), nonce.clone());
        let payloads = self
            .client
            .call(
                ConstructionStep::Payloads,
                &json!({
                    "network_identifier": network,
                    "operations": operations,
                    "metadata": payloads_metadata,
                }),
            )
            .await?;
        let unsigned_tx = payloads
            .get("unsigned_transaction")
            .and_then(Value::as_str)
            .ok_or_else(|| missing(ConstructionStep::Payloads, "unsigned_transaction"))?
            .to_string();
        let payload_hex = payloads
            .get("payloads")
            .and_then(Value::as_array)
            .and_then(|payloads| payloads.first())
            .and_then(|payload| payload.get("hex_bytes"))
            .and_then(Value::as_str)
            .ok_or_else(|| missing(ConstructionStep::Payloads, "payloads[0].hex_bytes"))?
            .to_string();
        info!(run_id = %run_id, step = "payloads", "step complete");

        // 4. Parse the unsigned transaction (advisory)
        self.advisory_call(
            run_id,
            ConstructionStep::ParseUnsigned,
            self.policy.parse_unsigned,
            &json!({
                "network_identifier": network,
                "signed": false,
                "transaction": unsigned_tx,
            }),
        )
        .await?;

        // 5. Sign, offline
        let signature = self.signer.sign(&unsigned_tx, private_key).await?;
        info!(run_id = %run_id, step = "sign", signature = %signature, "step complete");

        // 6. Combine: exactly one single-signer bundle
        let bundle = SignatureBundle::single_signer(signature.as_str(), payload_hex.as_str());
        let combine = self
            .client
            .call(
                ConstructionStep::Combine,
                &json!({
                    "network_identifier": network,
                    "unsigned_transaction": unsigned_tx,
                    "signatures": [bundle],
                }),
            )
            .await?;
        let signed_tx = combine
            .get("signed_transaction")
            .and_then(Value::as_str)
            .ok_or_else(|| missing(ConstructionStep::Combine, "signed_transaction"))?
            .to_string();
        info!(run_id = %run_id, step = "combine", "step complete");

        // 7. Parse the signed transaction (advisory)
        self.advisory_call(
            run_id,
            ConstructionStep::ParseSigned,
            self.policy.parse_signed,
            &json!({
                "network_identifier": network,
                "signed": true,
                "transaction": signed_tx,
            }),
        )
        .await?;

        // 8. Hash (advisory): precompute for comparison against submit
        let precomputed_hash = self
            .advisory_call(
                run_id,
                ConstructionStep::Hash,
                self.policy.hash,
                &json!({
                    "network_identifier": network,
                    "signed_transaction": signed_tx,
                }),
            )
            .await?
            .and_then(|response| {
                response
                    .pointer("/transaction_identifier/hash")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });

        // 9. Submit: the only network-mutating call
        let submit_request = json!({
            "network_identifier": network,
            "signed_transaction": signed_tx,
        });
        let submit = self
            .client
            .call(ConstructionStep::Submit, &submit_request)
            .await?;
        let transaction_hash = submit
            .get("hash")
            .and_then(Value::as_str)
            .ok_or_else(|| missing(ConstructionStep::Submit, "hash"))?
            .to_string();
        info!(run_id = %run_id, step = "submit", hash = %transaction_hash, "step complete");

        if let Some(precomputed) = &precomputed_hash {
            if precomputed != &transaction_hash {
                // Submit's hash is authoritative.
                warn!(
                    run_id = %run_id,
                    precomputed = %precomputed,
                    submitted = %transaction_hash,
                    "hash step disagrees with submit"
                );
            }
        }

        let explorer_url = format!(
            "{}/{}/tx/{}",
            self.policy.explorer_base_url.trim_end_matches('/'),
            self.network.network,
            transaction_hash
        );
        let submit_url = self
            .client
            .endpoint_url(ConstructionStep::Submit)
            .unwrap_or_default();

        Ok(SubmitReceipt {
            transaction_hash,
            explorer_url,
            precomputed_hash,
            submit_request,
            submit_url,
        })
    }

    /// Run a diagnostic step under its configured policy.
    ///
    /// `Skip` never issues the call; `Warn` logs a failure and yields
    /// `None`; `Fail` propagates the failure like a mandatory step.
    async fn advisory_call(
        &self,
        run_id: Uuid,
        step: ConstructionStep,
        policy: AdvisoryPolicy,
        body: &Value,
    ) -> Result<Option<Value>, PipelineError> {
        if policy == AdvisoryPolicy::Skip {
            return Ok(None);
        }
        match self.client.call(step, body).await {
            Ok(response) => {
                info!(run_id = %run_id, step = %step, "advisory step complete");
                Ok(Some(response))
            }
            Err(err) if policy == AdvisoryPolicy::Warn => {
                warn!(run_id = %run_id, step = %step, error = %err, "advisory step failed, continuing");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

fn missing(step: ConstructionStep, field: &str) -> PipelineError {
    PipelineError::invariant(step, format!("response missing required field '{field}'"))
}
