//! Operation Builder: intent + fee -> ordered protocol operation list
//!
//! Pure and deterministic by contract: the pipeline calls this twice per run
//! (placeholder fee for preprocess, suggested fee for payloads) and the two
//! lists must be structurally identical apart from the fee amount.

use serde_json::json;

use crate::pipeline::{ConstructionStep, PipelineError};
use crate::types::{
    AccountIdentifier, Amount, IntentKind, Operation, OperationIdentifier, OperationType,
    TransactionIntent,
};

/// Fee used for the preprocess call, before metadata suggests the real one
pub const PLACEHOLDER_FEE: &str = "100000000";

/// Metadata key carrying the delegation target on a delegate_change operation
pub const DELEGATE_TARGET_KEY: &str = "delegate_change_target";

/// Build the ordered operation list for an intent at a given fee.
///
/// Payment emits fee_payment / payment_source_dec / payment_receiver_inc;
/// delegation emits fee_payment / delegate_change. The fee operation always
/// carries the negated fee on the sender.
pub fn build_operations(intent: &TransactionIntent, fee: &str) -> Vec<Operation> {
    let fee_payment = Operation {
        operation_identifier: OperationIdentifier::new(0),
        related_operations: Vec::new(),
        op_type: OperationType::FeePayment.as_str().to_string(),
        account: AccountIdentifier::with_default_token(intent.sender.as_str()),
        amount: Amount::mina(format!("-{fee}")),
        metadata: None,
    };

    match &intent.kind {
        IntentKind::Payment { receiver, amount } => vec![
            fee_payment,
            Operation {
                operation_identifier: OperationIdentifier::new(1),
                related_operations: Vec::new(),
                op_type: OperationType::PaymentSourceDec.as_str().to_string(),
                account: AccountIdentifier::with_default_token(intent.sender.as_str()),
                amount: Amount::mina(format!("-{amount}")),
                metadata: None,
            },
            Operation {
                operation_identifier: OperationIdentifier::new(2),
                related_operations: vec![OperationIdentifier::new(1)],
                op_type: OperationType::PaymentReceiverInc.as_str().to_string(),
                account: AccountIdentifier::with_default_token(receiver.as_str()),
                amount: Amount::mina(amount.to_string()),
                metadata: None,
            },
        ],
        IntentKind::Delegation { delegatee } => vec![
            fee_payment,
            Operation {
                operation_identifier: OperationIdentifier::new(1),
                related_operations: Vec::new(),
                op_type: OperationType::DelegateChange.as_str().to_string(),
                account: AccountIdentifier::with_default_token(intent.sender.as_str()),
                amount: Amount::mina("0"),
                metadata: Some(json!({ DELEGATE_TARGET_KEY: delegatee })),
            },
        ],
    }
}

/// Check the structural invariants every operation list must satisfy:
/// indices contiguous from 0, related_operations referencing only earlier
/// indices. Violations mean a builder bug, surfaced as a protocol invariant
/// failure on the step about to send the list.
pub fn validate_operations(
    operations: &[Operation],
    step: ConstructionStep,
) -> Result<(), PipelineError> {
    for (expected, op) in operations.iter().enumerate() {
        let index = op.operation_identifier.index;
        if index != expected as i64 {
            return Err(PipelineError::invariant(
                step,
                format!("operation index {index} at position {expected}, expected contiguous zero-based indices"),
            ));
        }
        for related in &op.related_operations {
            if related.index >= index {
                return Err(PipelineError::invariant(
                    step,
                    format!(
                        "operation {index} references related operation {} which is not earlier",
                        related.index
                    ),
                ));
            }
        }
    }
    Ok(())
}
