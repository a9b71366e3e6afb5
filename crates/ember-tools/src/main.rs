//! ember-tools
//!
//! Offline companion CLI for the Ember ledger. Generates genesis files,
//! computes Merkle roots and proofs over claim lists, and replays
//! simulation scripts against an in-memory token.
//!
//! Usage:
//!   ember-tools genesis       [--out <path>]
//!   ember-tools merkle root   --addresses <path>
//!   ember-tools merkle proof  --addresses <path> --address <b58>
//!   ember-tools simulate      --genesis <path> --script <path> [--pretty]

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use rand::Rng;
use tracing::info;

use ember_core::tax::TaxRates;
use ember_core::types::Address;
use ember_crypto::{build_proof, build_root, leaf_hash};
use ember_ledger::TokenConfig;

mod script;
use script::{ScriptStep, Simulation};

// ── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "ember-tools",
    version,
    about = "Ember tooling — genesis files, Merkle claim lists, ledger simulation"
)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a genesis TokenConfig template with fresh random addresses.
    Genesis {
        /// Output path for the genesis JSON.
        #[arg(long, default_value = "ember-genesis.json")]
        out: PathBuf,
    },

    /// Merkle utilities over a newline-separated base-58 address list.
    #[command(subcommand)]
    Merkle(MerkleCommand),

    /// Replay a JSON script of timestamped operations and print a summary.
    Simulate {
        /// Genesis TokenConfig JSON.
        #[arg(long)]
        genesis: PathBuf,
        /// Script JSON (array of steps).
        #[arg(long)]
        script: PathBuf,
        /// Pretty-print the summary.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
}

#[derive(Subcommand, Debug)]
enum MerkleCommand {
    /// Print the hex root committing to the address list.
    Root {
        /// Path to the address list.
        #[arg(long)]
        addresses: PathBuf,
    },

    /// Print the hex proof (one sibling per line) for one member.
    Proof {
        /// Path to the address list.
        #[arg(long)]
        addresses: PathBuf,
        /// Member address (base-58) to prove.
        #[arg(long)]
        address: String,
    },
}

// ── Main ─────────────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so the JSON output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,ember_tools=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match args.command {
        Command::Genesis { out } => cmd_genesis(&out),
        Command::Merkle(MerkleCommand::Root { addresses }) => cmd_merkle_root(&addresses),
        Command::Merkle(MerkleCommand::Proof { addresses, address }) => {
            cmd_merkle_proof(&addresses, &address)
        }
        Command::Simulate { genesis, script, pretty } => cmd_simulate(&genesis, &script, pretty),
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn cmd_genesis(out: &Path) -> anyhow::Result<()> {
    if out.exists() {
        bail!(
            "{} already exists. Delete it first to generate a fresh genesis.",
            out.display()
        );
    }
    let mut rng = rand::thread_rng();
    let config = TokenConfig {
        owner: Address::from_bytes(rng.gen()),
        treasury: Address::from_bytes(rng.gen()),
        dev_address: Address::from_bytes(rng.gen()),
        reward_address: Address::from_bytes(rng.gen()),
        initial_supply: 1_000_000_000,
        rates: TaxRates::default(),
        claim_amount: 0,
    };
    std::fs::write(out, serde_json::to_string_pretty(&config)?)
        .with_context(|| format!("writing {}", out.display()))?;

    println!("Genesis template written to {}", out.display());
    println!();
    println!("Owner:     {}", config.owner);
    println!("Treasury:  {}", config.treasury);
    println!("Dev:       {}", config.dev_address);
    println!("Reward:    {}", config.reward_address);
    println!();
    println!("Addresses are random placeholders. Replace them with real ones before launch.");
    Ok(())
}

fn cmd_merkle_root(addresses: &Path) -> anyhow::Result<()> {
    let members = read_addresses(addresses)?;
    let leaves: Vec<[u8; 32]> = members.iter().map(leaf_hash).collect();
    let Some(root) = build_root(&leaves) else {
        bail!("address list {} is empty", addresses.display());
    };
    info!(members = members.len(), "claim list committed");
    println!("{}", root.to_hex());
    Ok(())
}

fn cmd_merkle_proof(addresses: &Path, address: &str) -> anyhow::Result<()> {
    let members = read_addresses(addresses)?;
    let target = Address::from_b58(address.trim())
        .map_err(|e| anyhow::anyhow!("invalid address {address}: {e}"))?;
    let Some(index) = members.iter().position(|m| m == &target) else {
        bail!("{} is not in the address list", target);
    };
    let leaves: Vec<[u8; 32]> = members.iter().map(leaf_hash).collect();
    let Some(proof) = build_proof(&leaves, index) else {
        bail!("address list {} is empty", addresses.display());
    };
    for sibling in &proof {
        println!("{}", hex::encode(sibling));
    }
    Ok(())
}

fn cmd_simulate(genesis: &Path, script_path: &Path, pretty: bool) -> anyhow::Result<()> {
    let json = std::fs::read_to_string(genesis)
        .with_context(|| format!("reading genesis {}", genesis.display()))?;
    let config: TokenConfig =
        serde_json::from_str(&json).context("parsing genesis TokenConfig JSON")?;

    let json = std::fs::read_to_string(script_path)
        .with_context(|| format!("reading script {}", script_path.display()))?;
    let steps: Vec<ScriptStep> = serde_json::from_str(&json).context("parsing script JSON")?;

    info!(steps = steps.len(), "replaying script");
    let mut simulation = Simulation::new(config);
    simulation.run(&steps);

    let summary = simulation.summary();
    let rendered = if pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{rendered}");
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Read a newline-separated base-58 address list. Blank lines are skipped.
fn read_addresses(path: &Path) -> anyhow::Result<Vec<Address>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading address list {}", path.display()))?;
    let mut members = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let addr = Address::from_b58(line)
            .map_err(|e| anyhow::anyhow!("line {}: invalid address {line}: {e}", line_no + 1))?;
        members.push(addr);
    }
    Ok(members)
}
