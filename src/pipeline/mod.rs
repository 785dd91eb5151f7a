//! Construction pipeline supercomponent
//!
//! Split into focused modules:
//! - **errors**: pipeline error taxonomy
//! - **client**: transport to the construction service endpoints
//! - **signer**: boundary to the offline signing tool
//! - **runner**: the nine-step orchestrator

pub mod client;
pub mod errors;
pub mod runner;
pub mod signer;

pub use client::{ConstructionClient, ConstructionStep};
pub use errors::PipelineError;
pub use runner::ConstructionPipeline;
pub use signer::{CommandSigner, TransactionSigner};
