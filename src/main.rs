//! Mailbox Watch CLI
//!
//! Runs the block monitor against a chain fixture and inspects scripts.

use clap::{Parser, Subcommand};
use mailbox_watch::contract::disassemble_to_string;
use mailbox_watch::crypto::UInt160;
use mailbox_watch::monitor::{BlockMonitor, MemoryChain, MonitorConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mailbox-watch")]
#[command(version = "0.1.0")]
#[command(about = "Watches a NEO chain for mailbox registrations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow a chain and apply mailbox registrations
    Watch {
        /// Chain fixture (JSON with a "blocks" array)
        #[arg(short, long)]
        chain: PathBuf,

        /// Hash of the contract's deployment transaction
        #[arg(short, long)]
        deploy_tx: String,

        /// Last height already processed
        #[arg(short, long, default_value = "0")]
        start_height: u64,

        /// Milliseconds between height checks
        #[arg(short, long, default_value = "5000")]
        interval_ms: u64,

        /// Maximum number of cached transactions
        #[arg(long, default_value = "10000")]
        cache_size: usize,

        /// Poll once and exit instead of running until Ctrl+C
        #[arg(long)]
        once: bool,
    },

    /// Disassemble a hex-encoded script
    Disasm {
        /// Script bytes (hex)
        #[arg(short, long)]
        script: String,
    },

    /// Show the display address of a script hash
    Address {
        /// Script hash, big-endian hex (0x prefix optional)
        #[arg(long)]
        hash: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Watch {
            chain,
            deploy_tx,
            start_height,
            interval_ms,
            cache_size,
            once,
        } => {
            let config = MonitorConfig {
                poll_interval: Duration::from_millis(interval_ms),
                start_height,
                cache_capacity: cache_size,
            };
            run_watch(&chain, &deploy_tx, config, once)?;
        }

        Commands::Disasm { script } => {
            let bytes = hex::decode(script.trim_start_matches("0x"))?;
            print!("{}", disassemble_to_string(&bytes));
        }

        Commands::Address { hash } => {
            let hash: UInt160 = hash.parse()?;
            println!("{}", hash.to_address());
        }
    }

    Ok(())
}

fn run_watch(
    chain: &Path,
    deploy_tx: &str,
    config: MonitorConfig,
    once: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let provider = MemoryChain::load(chain)?;
        let mut monitor = BlockMonitor::connect(provider, deploy_tx, config).await?;

        if once {
            monitor.poll_once().await?;
        } else {
            // Handle Ctrl+C
            let control = monitor.control();
            tokio::spawn(async move {
                tokio::signal::ctrl_c().await.ok();
                println!("\n📴 Stopping monitor...");
                control.stop_when_running().await;
            });

            monitor.run().await?;
        }

        println!("📬 Registered mailboxes ({}):", monitor.registry().count());
        println!("{}", serde_json::to_string_pretty(&monitor.registry().list())?);
        println!("📊 {}", serde_json::to_string(monitor.stats())?);

        Ok::<(), Box<dyn std::error::Error>>(())
    })?;

    Ok(())
}
