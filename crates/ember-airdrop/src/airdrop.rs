use ember_core::constants::{AIRDROP_WINDOW_SECS, REFERRAL_SHARE_PERCENT};
use ember_core::error::EmberError;
use ember_core::tax::percent_of;
use ember_core::types::{Address, Balance, MerkleRoot, Timestamp};
use ember_crypto::{leaf_hash, verify_proof};
use ember_ledger::Token;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::info;

/// One-shot, time-bounded airdrop over a Merkle-committed membership set.
///
/// Holds its own state and operates on a `Token` passed in explicitly:
/// claims move tokens out of the treasury, and the lock schedule vetoes
/// locked claimants and referrers. Lifecycle is `Unconfigured ->
/// Configured -> Active -> Finished`, and `Finished` is terminal; the
/// window can never be extended or restarted.
pub struct Airdrop {
    root: Option<MerkleRoot>,
    claim_amount: Balance,
    activated_at: Option<Timestamp>,
    claimed: HashSet<Address>,
    referral_bonuses: HashMap<Address, Balance>,
}

impl Airdrop {
    /// `claim_amount` may be zero here; activation then requires the owner
    /// to set one first.
    pub fn new(claim_amount: Balance) -> Self {
        Self {
            root: None,
            claim_amount,
            activated_at: None,
            claimed: HashSet::new(),
            referral_bonuses: HashMap::new(),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    /// True between activation and activation + 36h inclusive.
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.ensure_window(now).is_ok()
    }

    pub fn claimed_users(&self) -> u64 {
        self.claimed.len() as u64
    }

    pub fn claim_amount(&self) -> Balance {
        self.claim_amount
    }

    pub fn merkle_root(&self) -> Option<&MerkleRoot> {
        self.root.as_ref()
    }

    /// Pending withdrawable bonus for a referrer.
    pub fn referral_bonus(&self, addr: &Address) -> Balance {
        self.referral_bonuses.get(addr).copied().unwrap_or(0)
    }

    /// Deterministic view of every pending referral bonus.
    pub fn pending_bonuses(&self) -> BTreeMap<Address, Balance> {
        self.referral_bonuses
            .iter()
            .map(|(addr, bonus)| (addr.clone(), *bonus))
            .collect()
    }

    /// Pure membership check: the proof must bind this exact address to
    /// the committed root, and the address must not have claimed yet.
    /// False when no root is committed.
    pub fn eligible(&self, addr: &Address, proof: &[[u8; 32]]) -> bool {
        let Some(root) = &self.root else {
            return false;
        };
        !self.claimed.contains(addr) && verify_proof(leaf_hash(addr), proof, root)
    }

    // ── Administrative operations (owner only, pre-activation) ───────────────

    pub fn set_merkle_root(
        &mut self,
        token: &Token,
        caller: &Address,
        root: MerkleRoot,
    ) -> Result<(), EmberError> {
        token.ensure_owner(caller)?;
        if self.activated_at.is_some() {
            return Err(EmberError::AirdropAlreadyActive);
        }
        info!(root = %root, "airdrop merkle root set");
        self.root = Some(root);
        Ok(())
    }

    pub fn set_claim_amount(
        &mut self,
        token: &Token,
        caller: &Address,
        amount: Balance,
    ) -> Result<(), EmberError> {
        token.ensure_owner(caller)?;
        if self.activated_at.is_some() {
            return Err(EmberError::AirdropAlreadyActive);
        }
        info!(amount, "airdrop claim amount set");
        self.claim_amount = amount;
        Ok(())
    }

    /// Open the claim window at `now`. Requires a committed root and a
    /// nonzero claim amount; a second activation is rejected so the window
    /// cannot be restarted.
    pub fn activate(
        &mut self,
        token: &Token,
        caller: &Address,
        now: Timestamp,
    ) -> Result<(), EmberError> {
        token.ensure_owner(caller)?;
        if self.activated_at.is_some() {
            return Err(EmberError::AirdropAlreadyActive);
        }
        if self.root.is_none() || self.claim_amount == 0 {
            return Err(EmberError::AirdropNotConfigured);
        }
        self.activated_at = Some(now);
        info!(now, claim_amount = self.claim_amount, "airdrop activated");
        Ok(())
    }

    // ── Claims ───────────────────────────────────────────────────────────────

    /// Claim the caller's allocation: a truncating 10% referral cut is
    /// credited to the referrer's withdrawable bonus and the caller is
    /// paid the remainder from the treasury, the same remainder policy
    /// the transfer tax uses. The bonus tokens stay in the treasury until
    /// withdrawn; with no referrer that share simply never leaves.
    /// Claiming counts as a qualifying receipt and arms the caller's lock
    /// countdown.
    pub fn claim(
        &mut self,
        token: &mut Token,
        caller: &Address,
        proof: &[[u8; 32]],
        referrer: Option<&Address>,
        now: Timestamp,
    ) -> Result<(), EmberError> {
        self.ensure_window(now)?;
        if !self.eligible(caller, proof) {
            return Err(EmberError::NotEligible);
        }
        if referrer == Some(caller) {
            return Err(EmberError::SelfReferral);
        }
        if token.is_locked(caller, now) {
            return Err(EmberError::CallerLocked(caller.to_b58()));
        }
        if let Some(referrer) = referrer {
            if token.is_locked(referrer, now) {
                return Err(EmberError::ReferrerLocked(referrer.to_b58()));
            }
        }
        let have = token.balance_of(token.treasury());
        if have < self.claim_amount {
            return Err(EmberError::NoTokensLeft {
                need: self.claim_amount,
                have,
            });
        }

        let referral_cut = percent_of(self.claim_amount, REFERRAL_SHARE_PERCENT);
        let claimant_share = self.claim_amount - referral_cut;
        token.release(caller, claimant_share, now)?;
        if let Some(referrer) = referrer {
            *self.referral_bonuses.entry(referrer.clone()).or_insert(0) += referral_cut;
        }
        self.claimed.insert(caller.clone());
        info!(
            claimant = %caller,
            paid = claimant_share,
            claimed_users = self.claimed.len(),
            "airdrop claim paid"
        );
        Ok(())
    }

    /// Withdraw the caller's accumulated referral bonus into their main
    /// balance, all at once. Only possible while the airdrop window is
    /// open; the entry is zeroed only after the payout succeeds.
    pub fn claim_referral_bonus(
        &mut self,
        token: &mut Token,
        caller: &Address,
        now: Timestamp,
    ) -> Result<(), EmberError> {
        self.ensure_window(now)?;
        let bonus = self.referral_bonus(caller);
        if bonus == 0 {
            return Err(EmberError::NothingToClaim);
        }
        if token.is_locked(caller, now) {
            return Err(EmberError::CallerLocked(caller.to_b58()));
        }
        token.release(caller, bonus, now)?;
        self.referral_bonuses.remove(caller);
        info!(referrer = %caller, bonus, "referral bonus withdrawn");
        Ok(())
    }

    // ── Window ───────────────────────────────────────────────────────────────

    fn ensure_window(&self, now: Timestamp) -> Result<(), EmberError> {
        match self.activated_at {
            None => Err(EmberError::AirdropNotStarted),
            Some(started) if now > started.saturating_add(AIRDROP_WINDOW_SECS) => {
                Err(EmberError::AirdropFinished)
            }
            Some(_) => Ok(()),
        }
    }
}
