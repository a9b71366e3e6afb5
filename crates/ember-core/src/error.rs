use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmberError {
    // ── Access control ───────────────────────────────────────────────────────
    #[error("caller is not the owner")]
    NotOwner,

    // ── Tax rates ────────────────────────────────────────────────────────────
    #[error("tax rates too greedy: combined {total}% exceeds the {max}% ceiling")]
    RateTooHigh { total: u16, max: u16 },

    // ── Transfers ────────────────────────────────────────────────────────────
    #[error("insufficient balance: need {need}, have {have}")]
    InsufficientBalance { need: u128, have: u128 },

    #[error("sender is locked: {0}")]
    SenderLocked(String),

    #[error("receiver is locked: {0}")]
    ReceiverLocked(String),

    // ── Airdrop window ───────────────────────────────────────────────────────
    #[error("airdrop not started")]
    AirdropNotStarted,

    #[error("airdrop finished")]
    AirdropFinished,

    #[error("airdrop not configured: merkle root and claim amount required")]
    AirdropNotConfigured,

    #[error("airdrop already active")]
    AirdropAlreadyActive,

    // ── Claims ───────────────────────────────────────────────────────────────
    #[error("not eligible for airdrop")]
    NotEligible,

    #[error("self-referral not allowed")]
    SelfReferral,

    #[error("caller is locked: {0}")]
    CallerLocked(String),

    #[error("referrer is locked: {0}")]
    ReferrerLocked(String),

    #[error("no tokens left: claim needs {need}, treasury has {have}")]
    NoTokensLeft { need: u128, have: u128 },

    // ── Referral bonuses ─────────────────────────────────────────────────────
    #[error("nothing to claim")]
    NothingToClaim,
}
