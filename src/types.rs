//! Core data types shared across the construction sender
//!
//! Request-side wire shapes follow the Mesh construction protocol; responses
//! are handled as opaque JSON by the pipeline and are not modeled here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Token id of the native MINA token
pub const DEFAULT_TOKEN_ID: &str = "1";

/// Signature scheme expected by the combine step
pub const SIGNATURE_TYPE: &str = "schnorr_poseidon";

/// Curve identifier expected by the combine step
pub const CURVE_TYPE: &str = "tweedle";

/// Identifies the target chain on every construction request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkIdentifier {
    pub blockchain: String,
    pub network: String,
}

impl NetworkIdentifier {
    pub fn new(blockchain: impl Into<String>, network: impl Into<String>) -> Self {
        Self {
            blockchain: blockchain.into(),
            network: network.into(),
        }
    }
}

/// What the caller wants to do, before any protocol encoding
///
/// Immutable once constructed; the pipeline never mutates an intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionIntent {
    /// Sender address (also the fee payer)
    pub sender: String,

    /// Kind-specific fields
    pub kind: IntentKind,

    /// Free-form memo carried through preprocess
    pub memo: String,
}

/// Transaction kinds supported by the operation builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentKind {
    /// Move `amount` minor units from the sender to `receiver`
    Payment { receiver: String, amount: u64 },

    /// Re-point the sender's stake delegation at `delegatee`
    Delegation { delegatee: String },
}

impl TransactionIntent {
    pub fn payment(
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: u64,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            kind: IntentKind::Payment {
                receiver: receiver.into(),
                amount,
            },
            memo: memo.into(),
        }
    }

    pub fn delegation(
        sender: impl Into<String>,
        delegatee: impl Into<String>,
        memo: impl Into<String>,
    ) -> Self {
        Self {
            sender: sender.into(),
            kind: IntentKind::Delegation {
                delegatee: delegatee.into(),
            },
            memo: memo.into(),
        }
    }

    /// Short name used in log lines
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            IntentKind::Payment { .. } => "payment",
            IntentKind::Delegation { .. } => "delegation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub symbol: String,
    pub decimals: u32,
}

impl Currency {
    /// Native MINA currency (9 decimals)
    pub fn mina() -> Self {
        Self {
            symbol: "MINA".to_string(),
            decimals: 9,
        }
    }
}

/// Signed base-10 integer string in minor units, never floating point
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub value: String,
    pub currency: Currency,
}

impl Amount {
    pub fn mina(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            currency: Currency::mina(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationIdentifier {
    pub index: i64,
}

impl OperationIdentifier {
    pub fn new(index: i64) -> Self {
        Self { index }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentifier {
    pub address: String,

    /// Carries `token_id` for token-scoped operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

impl AccountIdentifier {
    /// Account scoped to the native token
    pub fn with_default_token(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            metadata: Some(serde_json::json!({ "token_id": DEFAULT_TOKEN_ID })),
        }
    }

    pub fn bare(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            metadata: None,
        }
    }
}

/// Operation kinds emitted by the builder, snake_cased on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    FeePayment,
    PaymentSourceDec,
    PaymentReceiverInc,
    DelegateChange,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FeePayment => "fee_payment",
            Self::PaymentSourceDec => "payment_source_dec",
            Self::PaymentReceiverInc => "payment_receiver_inc",
            Self::DelegateChange => "delegate_change",
        }
    }
}

/// One atomic balance-affecting effect within a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub operation_identifier: OperationIdentifier,

    /// Earlier operations this one is causally linked to
    pub related_operations: Vec<OperationIdentifier>,

    #[serde(rename = "type")]
    pub op_type: String,

    pub account: AccountIdentifier,

    pub amount: Amount,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub curve_type: String,
    pub hex_bytes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningPayload {
    pub hex_bytes: String,
}

/// Signature material for the combine step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureBundle {
    pub hex_bytes: String,
    pub signature_type: String,
    pub public_key: PublicKey,
    pub signing_payload: SigningPayload,
}

impl SignatureBundle {
    /// Bundle for the single-signer convention: the signing payload hex also
    /// carries the public key material combine needs.
    pub fn single_signer(signature: impl Into<String>, payload_hex: impl Into<String>) -> Self {
        let payload_hex = payload_hex.into();
        Self {
            hex_bytes: signature.into(),
            signature_type: SIGNATURE_TYPE.to_string(),
            public_key: PublicKey {
                curve_type: CURVE_TYPE.to_string(),
                hex_bytes: payload_hex.clone(),
            },
            signing_payload: SigningPayload {
                hex_bytes: payload_hex,
            },
        }
    }
}

/// Result of a fully submitted run
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReceipt {
    /// Hash returned by submit (authoritative)
    pub transaction_hash: String,

    /// Block-explorer link for the submitted transaction
    pub explorer_url: String,

    /// Hash precomputed by the optional hash step, when it ran
    pub precomputed_hash: Option<String>,

    /// Exact submit request body, kept for manual resubmission
    pub submit_request: Value,

    /// Full submit endpoint URL the request was posted to
    pub submit_url: String,
}

impl SubmitReceipt {
    /// Ready-to-run curl line replaying the submit request verbatim
    pub fn replay_curl(&self) -> String {
        format!(
            "curl -X POST -H 'Content-Type: application/json' -d '{}' {}",
            self.submit_request, self.submit_url
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_wire_shape() {
        let op = Operation {
            operation_identifier: OperationIdentifier::new(2),
            related_operations: vec![OperationIdentifier::new(1)],
            op_type: OperationType::PaymentReceiverInc.as_str().to_string(),
            account: AccountIdentifier::with_default_token("B62qreceiver"),
            amount: Amount::mina("1000000000"),
            metadata: None,
        };

        let value = serde_json::to_value(&op).unwrap();
        assert_eq!(value["operation_identifier"]["index"], 2);
        assert_eq!(value["related_operations"], json!([{ "index": 1 }]));
        assert_eq!(value["type"], "payment_receiver_inc");
        assert_eq!(value["account"]["metadata"]["token_id"], "1");
        assert_eq!(value["amount"]["value"], "1000000000");
        assert_eq!(value["amount"]["currency"]["symbol"], "MINA");
        assert_eq!(value["amount"]["currency"]["decimals"], 9);
        // no metadata key when absent
        assert!(value.get("metadata").is_none());
    }

    #[test]
    fn test_signature_bundle_single_signer() {
        let bundle = SignatureBundle::single_signer("C8103A85", "ABCD");
        assert_eq!(bundle.hex_bytes, "C8103A85");
        assert_eq!(bundle.signature_type, SIGNATURE_TYPE);
        assert_eq!(bundle.public_key.curve_type, CURVE_TYPE);
        assert_eq!(bundle.public_key.hex_bytes, "ABCD");
        assert_eq!(bundle.signing_payload.hex_bytes, "ABCD");
    }

    #[test]
    fn test_replay_curl_contains_body_and_url() {
        let receipt = SubmitReceipt {
            transaction_hash: "5Jv8".to_string(),
            explorer_url: "https://minascan.io/devnet/tx/5Jv8".to_string(),
            precomputed_hash: None,
            submit_request: json!({ "signed_transaction": "blob" }),
            submit_url: "http://localhost:3000/construction/submit".to_string(),
        };
        let curl = receipt.replay_curl();
        assert!(curl.contains("\"signed_transaction\":\"blob\""));
        assert!(curl.ends_with("http://localhost:3000/construction/submit"));
    }
}
