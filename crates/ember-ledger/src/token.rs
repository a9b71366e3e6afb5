use crate::config::TokenConfig;
use crate::lock::LockSchedule;
use ember_core::error::EmberError;
use ember_core::tax::{TaxRates, TaxSplit};
use ember_core::types::{Address, Balance, Timestamp};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// The deflationary token state machine.
///
/// Owns every balance, the total supply, the tax rates, and the lock
/// schedule. Each mutating operation validates all preconditions before
/// the first write, so an error return always means zero state change;
/// the caller sees one atomic transition per call.
pub struct Token {
    balances: HashMap<Address, Balance>,
    total_supply: Balance,
    owner: Address,
    treasury: Address,
    dev_address: Address,
    reward_address: Address,
    rates: TaxRates,
    locks: LockSchedule,
}

impl Token {
    /// Construct from genesis parameters. The full initial supply is
    /// credited to the treasury, which starts allowlisted.
    pub fn new(config: TokenConfig) -> Self {
        let mut locks = LockSchedule::new();
        locks.add_exempt(&config.treasury);
        let mut token = Self {
            balances: HashMap::new(),
            total_supply: config.initial_supply,
            owner: config.owner,
            treasury: config.treasury.clone(),
            dev_address: config.dev_address,
            reward_address: config.reward_address,
            rates: config.rates,
            locks,
        };
        token.credit(&config.treasury, config.initial_supply);
        info!(
            owner = %token.owner,
            treasury = %token.treasury,
            supply = token.total_supply,
            "token genesis"
        );
        token
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub fn balance_of(&self, addr: &Address) -> Balance {
        self.balances.get(addr).copied().unwrap_or(0)
    }

    pub fn total_supply(&self) -> Balance {
        self.total_supply
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn treasury(&self) -> &Address {
        &self.treasury
    }

    pub fn dev_address(&self) -> &Address {
        &self.dev_address
    }

    pub fn reward_address(&self) -> &Address {
        &self.reward_address
    }

    pub fn rates(&self) -> TaxRates {
        self.rates
    }

    pub fn is_locked(&self, addr: &Address, now: Timestamp) -> bool {
        self.locks.is_locked(addr, now)
    }

    pub fn time_till_locked(&self, addr: &Address, now: Timestamp) -> Option<i64> {
        self.locks.time_till_locked(addr, now)
    }

    pub fn is_lock_exempt(&self, addr: &Address) -> bool {
        self.locks.is_exempt(addr)
    }

    /// Deterministic view of every account holding a nonzero balance.
    pub fn snapshot(&self) -> BTreeMap<Address, Balance> {
        self.balances
            .iter()
            .map(|(addr, balance)| (addr.clone(), *balance))
            .collect()
    }

    // ── Transfers ────────────────────────────────────────────────────────────

    /// Move `amount` from `from` to `to`.
    ///
    /// A transfer with neither party allowlisted is decomposed through the
    /// tax rates: the dev and reward cuts go to their configured
    /// addresses, the burn cut is destroyed (total supply shrinks), and
    /// the truncation remainders ride along with the net to the
    /// recipient. Allowlist-exempt transfers move the full amount with no
    /// tax and no receiver arming.
    pub fn transfer(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Balance,
        now: Timestamp,
    ) -> Result<(), EmberError> {
        if self.locks.is_locked(from, now) {
            return Err(EmberError::SenderLocked(from.to_b58()));
        }
        if self.locks.is_locked(to, now) {
            return Err(EmberError::ReceiverLocked(to.to_b58()));
        }
        let have = self.balance_of(from);
        if have < amount {
            return Err(EmberError::InsufficientBalance { need: amount, have });
        }

        let exempt = self.locks.is_exempt(from) || self.locks.is_exempt(to);
        let split = if exempt {
            TaxSplit::untaxed(amount)
        } else {
            self.rates.split(amount)
        };

        let dev_address = self.dev_address.clone();
        let reward_address = self.reward_address.clone();
        self.debit(from, amount);
        self.credit(&dev_address, split.dev_cut);
        self.credit(&reward_address, split.reward_cut);
        self.credit(to, split.net);
        self.total_supply -= split.burn_cut;

        if amount > 0 {
            if self.balance_of(from) == 0 {
                self.locks.clear(from);
            }
            if !exempt {
                // Receiving arms the countdown; the cut recipients are
                // side effects, not receipts, and stay unarmed.
                self.locks.arm(to, now);
            }
        }

        info!(
            from = %from,
            to = %to,
            amount,
            burned = split.burn_cut,
            "transfer applied"
        );
        Ok(())
    }

    /// Pay out from the treasury, untaxed. Distribution primitive for the
    /// embedder and the airdrop layer; the receipt arms the recipient like
    /// any qualifying receipt. Callers gate locked recipients themselves.
    pub fn release(
        &mut self,
        to: &Address,
        amount: Balance,
        now: Timestamp,
    ) -> Result<(), EmberError> {
        let have = self.balance_of(&self.treasury);
        if have < amount {
            return Err(EmberError::InsufficientBalance { need: amount, have });
        }
        let treasury = self.treasury.clone();
        self.debit(&treasury, amount);
        self.credit(to, amount);
        if amount > 0 {
            self.locks.arm(to, now);
        }
        info!(to = %to, amount, "treasury release");
        Ok(())
    }

    // ── Administrative operations (owner only) ───────────────────────────────

    /// The single capability check every administrative operation runs
    /// first.
    pub fn ensure_owner(&self, caller: &Address) -> Result<(), EmberError> {
        if caller != &self.owner {
            return Err(EmberError::NotOwner);
        }
        Ok(())
    }

    /// Replace all three tax rates atomically. The combined ceiling is
    /// validated before anything changes.
    pub fn update_rates(
        &mut self,
        caller: &Address,
        dev: u8,
        burn: u8,
        reward: u8,
    ) -> Result<(), EmberError> {
        self.ensure_owner(caller)?;
        self.rates = TaxRates::new(dev, burn, reward)?;
        info!(dev, burn, reward, "tax rates updated");
        Ok(())
    }

    pub fn set_dev_address(&mut self, caller: &Address, addr: Address) -> Result<(), EmberError> {
        self.ensure_owner(caller)?;
        info!(addr = %addr, "dev address updated");
        self.dev_address = addr;
        Ok(())
    }

    pub fn set_reward_address(
        &mut self,
        caller: &Address,
        addr: Address,
    ) -> Result<(), EmberError> {
        self.ensure_owner(caller)?;
        info!(addr = %addr, "reward address updated");
        self.reward_address = addr;
        Ok(())
    }

    /// Allowlist an address (liquidity pool, router). Permanent.
    pub fn add_lock_exempt(&mut self, caller: &Address, addr: &Address) -> Result<(), EmberError> {
        self.ensure_owner(caller)?;
        self.locks.add_exempt(addr);
        info!(addr = %addr, "lock exemption added");
        Ok(())
    }

    // ── Balance plumbing ─────────────────────────────────────────────────────

    fn credit(&mut self, addr: &Address, amount: Balance) {
        if amount == 0 {
            return;
        }
        *self.balances.entry(addr.clone()).or_insert(0) += amount;
    }

    /// Callers check coverage first; zeroed entries are pruned so the
    /// snapshot stays free of dust rows.
    fn debit(&mut self, addr: &Address, amount: Balance) {
        if amount == 0 {
            return;
        }
        if let Some(balance) = self.balances.get_mut(addr) {
            *balance -= amount;
            if *balance == 0 {
                self.balances.remove(addr);
            }
        }
    }
}
