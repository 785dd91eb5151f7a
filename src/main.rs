//! Command-line sender for Mina construction transactions
//!
//! `mina-sender pay <SENDER> <PRIVATE_KEY> <AMOUNT> <RECEIVER>` sends a
//! payment; `mina-sender delegate <SENDER> <PRIVATE_KEY> <DELEGATEE>`
//! re-points a stake delegation. Each completed pipeline step is logged; on
//! success the transaction hash, an explorer link, and a replayable raw
//! submit request are printed.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mina_sender::{CommandSigner, Config, ConstructionPipeline, TransactionIntent};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Construction API base URL (overrides config and API_URL)
    #[arg(long)]
    url: Option<String>,

    /// Target network name (overrides config and NETWORK)
    #[arg(long)]
    network: Option<String>,

    /// Signer command (overrides config and MINA_SIGNER)
    #[arg(long)]
    signer: Option<String>,

    /// Transaction memo
    #[arg(long, default_value = "hello")]
    memo: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Send a payment
    Pay {
        /// Sender address (fee payer)
        sender: String,
        /// Sender private key, passed only to the offline signer
        private_key: String,
        /// Amount in minor units (nanomina)
        amount: u64,
        /// Receiver address
        receiver: String,
    },
    /// Change the sender's stake delegation
    Delegate {
        /// Sender address (fee payer)
        sender: String,
        /// Sender private key, passed only to the offline signer
        private_key: String,
        /// Delegation target address
        delegatee: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    let mut config = Config::from_file_with_env(&args.config)
        .with_context(|| format!("failed to load configuration from {}", args.config))?;
    if let Some(url) = &args.url {
        config.api.base_url = url.clone();
    }
    if let Some(network) = &args.network {
        config.api.network = network.clone();
    }
    if let Some(signer) = &args.signer {
        config.signer.command = signer.clone();
    }

    let (intent, private_key) = match &args.command {
        Command::Pay {
            sender,
            private_key,
            amount,
            receiver,
        } => (
            TransactionIntent::payment(sender.as_str(), receiver.as_str(), *amount, args.memo.as_str()),
            private_key,
        ),
        Command::Delegate {
            sender,
            private_key,
            delegatee,
        } => (
            TransactionIntent::delegation(sender.as_str(), delegatee.as_str(), args.memo.as_str()),
            private_key,
        ),
    };

    let signer = CommandSigner::new(
        config.signer.command.as_str(),
        Duration::from_secs(config.signer.timeout_secs),
    );
    let pipeline = ConstructionPipeline::new(&config, signer);

    match pipeline.run(&intent, private_key).await {
        Ok(receipt) => {
            println!("✅ Transaction submitted! Hash: {}", receipt.transaction_hash);
            println!("🔗 Transaction URL: {}", receipt.explorer_url);
            println!("\nSubmit curl:");
            println!("{}", receipt.replay_curl());
            Ok(())
        }
        Err(err) => {
            match err.step() {
                Some(step) => eprintln!("❌ Error in {step}: {err}"),
                None => eprintln!("❌ Error: {err}"),
            }
            std::process::exit(1);
        }
    }
}

/// Initialize the tracing subscriber
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "mina_sender=debug,info"
    } else {
        "mina_sender=info,warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
