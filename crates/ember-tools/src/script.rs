//! Simulation scripts: a JSON array of timestamped operations replayed
//! against an in-memory token and airdrop.
//!
//! Each step is `{ "at": <unix secs>, "caller": "<b58>", "action": ... }`
//! where the action uses serde's external tagging, e.g.
//! `{ "transfer": { "to": "<b58>", "amount": 200 } }` or the bare string
//! `"activate_airdrop"` for argument-less operations.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{info, warn};

use ember_airdrop::Airdrop;
use ember_core::error::EmberError;
use ember_core::tax::TaxRates;
use ember_core::types::{Address, Balance, MerkleRoot, Timestamp};
use ember_ledger::{Token, TokenConfig};

// ── Script model ──────────────────────────────────────────────────────────────

/// One timestamped call. `caller` is the acting address; operations that
/// take no caller in the library still record who drove them.
#[derive(Debug, Deserialize)]
pub struct ScriptStep {
    /// Logical time of the call, Unix seconds.
    pub at: Timestamp,
    /// Acting address, base-58.
    pub caller: Address,
    pub action: ScriptAction,
}

/// Every mutating ledger and airdrop operation, addressable from a script.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptAction {
    Transfer {
        to: Address,
        amount: Balance,
    },
    /// Untaxed treasury payout (distribution primitive).
    Release {
        to: Address,
        amount: Balance,
    },
    UpdateRates {
        dev: u8,
        burn: u8,
        reward: u8,
    },
    SetDevAddress {
        addr: Address,
    },
    SetRewardAddress {
        addr: Address,
    },
    AddLockExempt {
        addr: Address,
    },
    SetMerkleRoot {
        root: MerkleRoot,
    },
    SetClaimAmount {
        amount: Balance,
    },
    ActivateAirdrop,
    ClaimAirdrop {
        /// Merkle siblings, hex-encoded 32-byte hashes.
        #[serde(default, deserialize_with = "proof_from_hex")]
        proof: Vec<[u8; 32]>,
        #[serde(default)]
        referrer: Option<Address>,
    },
    ClaimReferralBonus,
}

fn proof_from_hex<'de, D>(deserializer: D) -> Result<Vec<[u8; 32]>, D::Error>
where
    D: Deserializer<'de>,
{
    let siblings = Vec::<String>::deserialize(deserializer)?;
    siblings
        .iter()
        .map(|s| {
            let bytes = hex::decode(s).map_err(D::Error::custom)?;
            <[u8; 32]>::try_from(bytes.as_slice())
                .map_err(|_| D::Error::custom("proof sibling must be 32 bytes of hex"))
        })
        .collect()
}

// ── Runner ────────────────────────────────────────────────────────────────────

/// A token and airdrop pair driven step by step. Rejected steps are logged
/// and skipped; the rest of the script still runs, mirroring how rejected
/// calls leave a live ledger untouched.
pub struct Simulation {
    token: Token,
    airdrop: Airdrop,
    applied: usize,
    rejected: usize,
}

impl Simulation {
    pub fn new(config: TokenConfig) -> Self {
        let claim_amount = config.claim_amount;
        Self {
            token: Token::new(config),
            airdrop: Airdrop::new(claim_amount),
            applied: 0,
            rejected: 0,
        }
    }

    pub fn run(&mut self, steps: &[ScriptStep]) {
        for (index, step) in steps.iter().enumerate() {
            let at_utc = human_time(step.at);
            match self.apply(step) {
                Ok(()) => {
                    self.applied += 1;
                    info!(index, %at_utc, caller = %step.caller, "step applied");
                }
                Err(err) => {
                    self.rejected += 1;
                    warn!(index, %at_utc, caller = %step.caller, error = %err, "step rejected");
                }
            }
        }
    }

    fn apply(&mut self, step: &ScriptStep) -> Result<(), EmberError> {
        let caller = &step.caller;
        let now = step.at;
        match &step.action {
            ScriptAction::Transfer { to, amount } => {
                self.token.transfer(caller, to, *amount, now)
            }
            ScriptAction::Release { to, amount } => self.token.release(to, *amount, now),
            ScriptAction::UpdateRates { dev, burn, reward } => {
                self.token.update_rates(caller, *dev, *burn, *reward)
            }
            ScriptAction::SetDevAddress { addr } => {
                self.token.set_dev_address(caller, addr.clone())
            }
            ScriptAction::SetRewardAddress { addr } => {
                self.token.set_reward_address(caller, addr.clone())
            }
            ScriptAction::AddLockExempt { addr } => self.token.add_lock_exempt(caller, addr),
            ScriptAction::SetMerkleRoot { root } => {
                self.airdrop.set_merkle_root(&self.token, caller, root.clone())
            }
            ScriptAction::SetClaimAmount { amount } => {
                self.airdrop.set_claim_amount(&self.token, caller, *amount)
            }
            ScriptAction::ActivateAirdrop => self.airdrop.activate(&self.token, caller, now),
            ScriptAction::ClaimAirdrop { proof, referrer } => {
                self.airdrop
                    .claim(&mut self.token, caller, proof, referrer.as_ref(), now)
            }
            ScriptAction::ClaimReferralBonus => {
                self.airdrop.claim_referral_bonus(&mut self.token, caller, now)
            }
        }
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            steps_applied: self.applied,
            steps_rejected: self.rejected,
            total_supply: self.token.total_supply(),
            rates: self.token.rates(),
            balances: self.token.snapshot(),
            claimed_users: self.airdrop.claimed_users(),
            referral_bonuses: self.airdrop.pending_bonuses(),
        }
    }
}

/// Final state of a run, rendered as the CLI's output document.
#[derive(Debug, Serialize)]
pub struct SimulationSummary {
    pub steps_applied: usize,
    pub steps_rejected: usize,
    pub total_supply: Balance,
    pub rates: TaxRates,
    pub balances: BTreeMap<Address, Balance>,
    pub claimed_users: u64,
    pub referral_bonuses: BTreeMap<Address, Balance>,
}

fn human_time(at: Timestamp) -> String {
    chrono::DateTime::from_timestamp(at, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| at.to_string())
}
