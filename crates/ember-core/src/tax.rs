use crate::constants::{
    DEFAULT_BURN_PERCENT, DEFAULT_DEV_PERCENT, DEFAULT_REWARD_PERCENT, MAX_TOTAL_TAX_PERCENT,
    PERCENT_DENOMINATOR,
};
use crate::error::EmberError;
use crate::types::Balance;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};

/// Truncating percent-of-amount: ⌊amount · percent / 100⌋.
///
/// Computed as `(a / 100) * p + (a % 100) * p / 100`, which equals the
/// widened product-then-divide exactly but cannot overflow u128 for any
/// percent <= 100. Rates are capped far below that; the referral cut
/// uses 10.
pub fn percent_of(amount: Balance, percent: u8) -> Balance {
    let p = percent as Balance;
    (amount / PERCENT_DENOMINATOR) * p + (amount % PERCENT_DENOMINATOR) * p / PERCENT_DENOMINATOR
}

// ── TaxRates ─────────────────────────────────────────────────────────────────

/// Transfer tax rates as whole percents. Immutable once built; `new` is
/// the only constructor and deserialization delegates to it, so every
/// `TaxRates` in circulation satisfies the aggregate ceiling.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
pub struct TaxRates {
    dev: u8,
    burn: u8,
    reward: u8,
}

impl TaxRates {
    /// Validate and build. Rejects `RateTooHigh` when dev + burn + reward
    /// exceeds `MAX_TOTAL_TAX_PERCENT`.
    pub fn new(dev: u8, burn: u8, reward: u8) -> Result<Self, EmberError> {
        let total = dev as u16 + burn as u16 + reward as u16;
        if total > MAX_TOTAL_TAX_PERCENT as u16 {
            return Err(EmberError::RateTooHigh {
                total,
                max: MAX_TOTAL_TAX_PERCENT as u16,
            });
        }
        Ok(Self { dev, burn, reward })
    }

    pub fn dev(&self) -> u8 {
        self.dev
    }

    pub fn burn(&self) -> u8 {
        self.burn
    }

    pub fn reward(&self) -> u8 {
        self.reward
    }

    /// Combined percent taken out of every qualifying transfer.
    pub fn total(&self) -> u16 {
        self.dev as u16 + self.burn as u16 + self.reward as u16
    }

    /// Decompose a transfer amount. Each cut truncates independently; the
    /// remainders stay with the net recipient, never redistributed.
    pub fn split(&self, amount: Balance) -> TaxSplit {
        let dev_cut = percent_of(amount, self.dev);
        let burn_cut = percent_of(amount, self.burn);
        let reward_cut = percent_of(amount, self.reward);
        TaxSplit {
            dev_cut,
            burn_cut,
            reward_cut,
            net: amount - dev_cut - burn_cut - reward_cut,
        }
    }
}

impl<'de> Deserialize<'de> for TaxRates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            dev: u8,
            burn: u8,
            reward: u8,
        }
        let raw = Raw::deserialize(deserializer)?;
        TaxRates::new(raw.dev, raw.burn, raw.reward).map_err(D::Error::custom)
    }
}

impl Default for TaxRates {
    fn default() -> Self {
        Self {
            dev: DEFAULT_DEV_PERCENT,
            burn: DEFAULT_BURN_PERCENT,
            reward: DEFAULT_REWARD_PERCENT,
        }
    }
}

// ── TaxSplit ─────────────────────────────────────────────────────────────────

/// Decomposition of one transfer amount. `dev_cut + burn_cut + reward_cut +
/// net == amount` always.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TaxSplit {
    pub dev_cut: Balance,
    pub burn_cut: Balance,
    pub reward_cut: Balance,
    pub net: Balance,
}

impl TaxSplit {
    /// The split of an allowlist-exempt transfer: everything to the
    /// recipient, nothing taxed.
    pub fn untaxed(amount: Balance) -> Self {
        Self {
            dev_cut: 0,
            burn_cut: 0,
            reward_cut: 0,
            net: amount,
        }
    }

    pub fn total_tax(&self) -> Balance {
        self.dev_cut + self.burn_cut + self.reward_cut
    }
}
