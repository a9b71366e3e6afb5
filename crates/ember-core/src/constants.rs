/// ─── Ember Protocol Constants ───────────────────────────────────────────────
///
/// "The ledger that burns as it moves."
///
/// Every taxed transfer destroys a slice of supply; the rest of the tax
/// funds development and the reward pool. Amounts are plain base units
/// (no decimals). Ticker: EMB

// ── Transfer tax ─────────────────────────────────────────────────────────────

/// Default developer-fee percent applied to qualifying transfers.
pub const DEFAULT_DEV_PERCENT: u8 = 2;

/// Default burn percent. The burn cut is destroyed, shrinking total supply.
pub const DEFAULT_BURN_PERCENT: u8 = 5;

/// Default reward-pool percent.
pub const DEFAULT_REWARD_PERCENT: u8 = 3;

/// Ceiling on dev + burn + reward. A single aggregate bound rather than
/// per-field limits: the owner may reallocate between the three as long as
/// the total user-visible tax stays at or below this.
pub const MAX_TOTAL_TAX_PERCENT: u8 = 10;

/// Denominator for all percent arithmetic.
pub const PERCENT_DENOMINATOR: u128 = 100;

// ── Anti-dump time-lock ──────────────────────────────────────────────────────

/// Lock window in seconds: an account armed at time T may transfer until
/// T + window and is locked strictly after.
pub const LOCK_WINDOW_SECS: i64 = 36 * 3600;

// ── Airdrop ──────────────────────────────────────────────────────────────────

/// Airdrop activity window in seconds, measured from activation. Claims at
/// exactly activation + window still succeed; later ones fail.
pub const AIRDROP_WINDOW_SECS: i64 = 36 * 3600;

/// Share of each claim credited to the referrer's withdrawable bonus,
/// truncating. The claimant receives the remainder of the per-claim
/// amount, the same remainder policy the transfer tax uses.
pub const REFERRAL_SHARE_PERCENT: u8 = 10;
