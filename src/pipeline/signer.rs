//! Signer Adapter: boundary to the offline signing tool
//!
//! The private key crosses this boundary exactly once, as an argument to a
//! single subprocess invocation. It is never logged here and never placed in
//! any network request; the only signing artifact that travels further is
//! the signature hex on stdout.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{ConstructionStep, PipelineError};

/// Capability to produce a signature for an unsigned transaction blob.
///
/// Modeled as a trait so tests can substitute a deterministic signer without
/// spawning any binary.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign(
        &self,
        unsigned_transaction: &str,
        private_key: &str,
    ) -> Result<String, PipelineError>;
}

/// Signs by invoking the external signer binary:
/// `<command> sign -private-key <KEY> -unsigned-transaction <BLOB>`.
///
/// Exit code zero with non-empty stdout is success; anything else fails with
/// the captured stderr text.
#[derive(Debug, Clone)]
pub struct CommandSigner {
    command: String,
    timeout: Duration,
}

impl CommandSigner {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            timeout,
        }
    }
}

#[async_trait]
impl TransactionSigner for CommandSigner {
    async fn sign(
        &self,
        unsigned_transaction: &str,
        private_key: &str,
    ) -> Result<String, PipelineError> {
        debug!(command = %self.command, "invoking external signer");

        let mut command = Command::new(&self.command);
        command
            .arg("sign")
            .arg("-private-key")
            .arg(private_key)
            .arg("-unsigned-transaction")
            .arg(unsigned_transaction)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| PipelineError::Timeout {
                step: ConstructionStep::Sign,
            })?
            .map_err(|e| {
                PipelineError::Signing(format!("failed to launch '{}': {e}", self.command))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::Signing(format!(
                "signer exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let signature = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if signature.is_empty() {
            return Err(PipelineError::Signing(
                "signer produced empty output".to_string(),
            ));
        }
        Ok(signature)
    }
}
