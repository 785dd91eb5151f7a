//! Mina construction transaction sender
//!
//! Builds, signs, and submits transactions through the staged Mesh
//! construction protocol, pairing the remote construction service with an
//! offline signer that never touches the network.

pub mod config;
pub mod operations;
pub mod pipeline;
pub mod types;

// Re-export the surface most callers need
pub use config::{AdvisoryPolicy, Config};
pub use pipeline::{CommandSigner, ConstructionPipeline, PipelineError, TransactionSigner};
pub use types::{SubmitReceipt, TransactionIntent};
