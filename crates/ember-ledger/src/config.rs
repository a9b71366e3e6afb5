use ember_core::tax::TaxRates;
use ember_core::types::{Address, Balance};
use serde::{Deserialize, Serialize};

/// Genesis parameters for one token instance.
///
/// The whole initial supply lands on the treasury address, which also
/// starts on the lock allowlist. Everything here is fixed at construction
/// except the rates, dev/reward addresses, and claim amount, which the
/// owner can adjust through their respective operations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Single privileged address; every administrative operation checks
    /// its caller against this.
    pub owner: Address,

    /// The system's own escrow account: holds the undistributed supply and
    /// funds airdrop claims.
    pub treasury: Address,

    /// Receives the dev cut of every taxed transfer.
    pub dev_address: Address,

    /// Receives the reward-pool cut of every taxed transfer.
    pub reward_address: Address,

    /// Supply minted at genesis, all credited to the treasury. Fixed; only
    /// burning ever changes total supply afterwards.
    pub initial_supply: Balance,

    /// Transfer tax rates, ceiling-checked at parse time. Defaults to
    /// dev 2 / burn 5 / reward 3.
    #[serde(default)]
    pub rates: TaxRates,

    /// Per-claim airdrop allocation. Zero means the owner must set one
    /// before activating the airdrop.
    #[serde(default)]
    pub claim_amount: Balance,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_and_claim_amount_default_when_absent() {
        let json = r#"{
            "owner": "11111111111111111111111111111111",
            "treasury": "11111111111111111111111111111112",
            "dev_address": "11111111111111111111111111111113",
            "reward_address": "11111111111111111111111111111114",
            "initial_supply": 800
        }"#;
        let config: TokenConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.initial_supply, 800);
        assert_eq!(config.rates, TaxRates::default());
        assert_eq!(config.claim_amount, 0);
    }

    #[test]
    fn greedy_rates_in_genesis_json_are_rejected() {
        let json = r#"{
            "owner": "11111111111111111111111111111111",
            "treasury": "11111111111111111111111111111112",
            "dev_address": "11111111111111111111111111111113",
            "reward_address": "11111111111111111111111111111114",
            "initial_supply": 800,
            "rates": { "dev": 90, "burn": 90, "reward": 90 }
        }"#;
        let err = serde_json::from_str::<TokenConfig>(json).unwrap_err();
        assert!(err.to_string().contains("too greedy"));
    }
}
