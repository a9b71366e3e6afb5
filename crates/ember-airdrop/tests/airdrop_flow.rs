//! End-to-end airdrop scenarios over the full stack: a real Merkle tree, a
//! live token ledger, and logical time driven forward explicitly.
//!
//! Run with:
//!   cargo test -p ember-airdrop --test airdrop_flow

use ember_airdrop::Airdrop;
use ember_core::constants::{AIRDROP_WINDOW_SECS, LOCK_WINDOW_SECS};
use ember_core::error::EmberError;
use ember_core::tax::TaxRates;
use ember_core::types::{Address, Balance, MerkleRoot, Timestamp};
use ember_crypto::{build_proof, build_root, leaf_hash};
use ember_ledger::{Token, TokenConfig};

const T0: Timestamp = 1_700_000_000;

// ── Fixture ───────────────────────────────────────────────────────────────────

fn addr(tag: u8) -> Address {
    Address::from_bytes([tag; 32])
}

fn owner() -> Address {
    addr(1)
}

fn treasury() -> Address {
    addr(2)
}

struct Fixture {
    token: Token,
    airdrop: Airdrop,
    members: Vec<Address>,
    leaves: Vec<[u8; 32]>,
}

impl Fixture {
    /// Token with `supply` on the treasury and an airdrop of `amount` per
    /// claim over three member addresses, configured but not yet activated.
    fn new(supply: Balance, amount: Balance) -> Self {
        let token = Token::new(TokenConfig {
            owner: owner(),
            treasury: treasury(),
            dev_address: addr(3),
            reward_address: addr(4),
            initial_supply: supply,
            rates: TaxRates::default(),
            claim_amount: amount,
        });
        let members: Vec<Address> = vec![addr(10), addr(11), addr(12)];
        let leaves: Vec<[u8; 32]> = members.iter().map(leaf_hash).collect();
        let root = build_root(&leaves).unwrap();

        let mut airdrop = Airdrop::new(0);
        airdrop.set_merkle_root(&token, &owner(), root).unwrap();
        airdrop.set_claim_amount(&token, &owner(), amount).unwrap();
        Self {
            token,
            airdrop,
            members,
            leaves,
        }
    }

    fn activate(&mut self, now: Timestamp) {
        self.airdrop.activate(&self.token, &owner(), now).unwrap();
    }

    fn member(&self, index: usize) -> Address {
        self.members[index].clone()
    }

    fn proof_for(&self, index: usize) -> Vec<[u8; 32]> {
        build_proof(&self.leaves, index).unwrap()
    }

    fn conserved(&self) {
        let sum: Balance = self.token.snapshot().values().sum();
        assert_eq!(sum, self.token.total_supply());
    }
}

// ── Scenarios ─────────────────────────────────────────────────────────────────

#[test]
fn claim_with_referrer_splits_ninety_ten() {
    let mut fx = Fixture::new(8_000, 800);
    fx.activate(T0);
    let x = fx.member(0);
    let proof = fx.proof_for(0);
    let referrer = addr(20);

    fx.airdrop
        .claim(&mut fx.token, &x, &proof, Some(&referrer), T0)
        .unwrap();

    assert_eq!(fx.token.balance_of(&x), 720);
    assert_eq!(fx.airdrop.referral_bonus(&referrer), 80);
    assert_eq!(fx.token.balance_of(&referrer), 0); // bonus not yet withdrawn
    assert_eq!(fx.token.balance_of(&treasury()), 8_000 - 720);
    assert_eq!(fx.airdrop.claimed_users(), 1);
    assert_eq!(fx.token.total_supply(), 8_000);
    fx.conserved();
}

#[test]
fn second_claim_by_the_same_address_is_not_eligible() {
    let mut fx = Fixture::new(8_000, 800);
    fx.activate(T0);
    let x = fx.member(0);
    let proof = fx.proof_for(0);

    fx.airdrop
        .claim(&mut fx.token, &x, &proof, None, T0)
        .unwrap();
    assert!(!fx.airdrop.eligible(&x, &proof));
    let err = fx
        .airdrop
        .claim(&mut fx.token, &x, &proof, None, T0 + 60)
        .unwrap_err();
    assert!(matches!(err, EmberError::NotEligible));
    assert_eq!(fx.airdrop.claimed_users(), 1);
}

#[test]
fn claim_without_referrer_leaves_the_share_with_the_treasury() {
    let mut fx = Fixture::new(800, 800);
    fx.activate(T0);
    let x = fx.member(0);
    let proof = fx.proof_for(0);

    fx.airdrop
        .claim(&mut fx.token, &x, &proof, None, T0)
        .unwrap();

    assert_eq!(fx.token.balance_of(&x), 720);
    assert_eq!(fx.token.balance_of(&treasury()), 80);
    assert_eq!(fx.token.total_supply(), 800);
    fx.conserved();
}

#[test]
fn odd_claim_amounts_keep_the_remainder_with_the_claimant() {
    let mut fx = Fixture::new(8_000, 805);
    fx.activate(T0);
    let x = fx.member(0);
    let y = fx.member(1);
    let proof_x = fx.proof_for(0);
    let proof_y = fx.proof_for(1);
    let referrer = addr(20);

    // the referral cut truncates to 80; the claimant takes the other 725
    fx.airdrop
        .claim(&mut fx.token, &x, &proof_x, Some(&referrer), T0)
        .unwrap();
    assert_eq!(fx.token.balance_of(&x), 725);
    assert_eq!(fx.airdrop.referral_bonus(&referrer), 80);

    // same claimant share without a referrer; only the cut stays behind
    fx.airdrop
        .claim(&mut fx.token, &y, &proof_y, None, T0 + 60)
        .unwrap();
    assert_eq!(fx.token.balance_of(&y), 725);
    assert_eq!(fx.token.balance_of(&treasury()), 8_000 - 725 - 725);
    fx.conserved();
}

#[test]
fn treasury_below_one_full_claim_means_no_tokens_left() {
    let mut fx = Fixture::new(800, 800);
    fx.activate(T0);
    let x = fx.member(0);
    let y = fx.member(1);
    let proof_x = fx.proof_for(0);
    let proof_y = fx.proof_for(1);

    fx.airdrop
        .claim(&mut fx.token, &x, &proof_x, None, T0)
        .unwrap();

    // the 80 left cannot cover the next full 800 entitlement
    let err = fx
        .airdrop
        .claim(&mut fx.token, &y, &proof_y, None, T0 + 60)
        .unwrap_err();
    assert!(matches!(
        err,
        EmberError::NoTokensLeft {
            need: 800,
            have: 80
        }
    ));
    assert!(fx.airdrop.eligible(&y, &proof_y));
    fx.conserved();
}

#[test]
fn wrong_proof_pairings_are_not_eligible() {
    let mut fx = Fixture::new(8_000, 800);
    fx.activate(T0);
    let x = fx.member(0);
    let outsider = addr(99);
    let proof_x = fx.proof_for(0);
    let proof_z = fx.proof_for(2);

    // Z's proof does not admit X, and an outsider gets nothing
    let err = fx
        .airdrop
        .claim(&mut fx.token, &x, &proof_z, None, T0)
        .unwrap_err();
    assert!(matches!(err, EmberError::NotEligible));
    let err = fx
        .airdrop
        .claim(&mut fx.token, &outsider, &proof_x, None, T0)
        .unwrap_err();
    assert!(matches!(err, EmberError::NotEligible));
    assert_eq!(fx.token.balance_of(&x), 0);
    assert_eq!(fx.token.balance_of(&outsider), 0);
}

#[test]
fn self_referral_is_rejected() {
    let mut fx = Fixture::new(8_000, 800);
    fx.activate(T0);
    let x = fx.member(0);
    let proof = fx.proof_for(0);

    let err = fx
        .airdrop
        .claim(&mut fx.token, &x, &proof, Some(&x), T0)
        .unwrap_err();
    assert!(matches!(err, EmberError::SelfReferral));
    assert_eq!(fx.airdrop.claimed_users(), 0);
}

#[test]
fn locked_claimant_is_rejected() {
    let mut fx = Fixture::new(8_000, 800);
    fx.activate(T0);
    let x = fx.member(0);
    let proof = fx.proof_for(0);

    // arm X with a qualifying receipt long before the airdrop so the lock
    // has already engaged by claim time
    fx.token
        .release(&x, 100, T0 - LOCK_WINDOW_SECS - 10)
        .unwrap();
    assert!(fx.token.is_locked(&x, T0));

    let err = fx
        .airdrop
        .claim(&mut fx.token, &x, &proof, None, T0)
        .unwrap_err();
    assert!(matches!(err, EmberError::CallerLocked(_)));
    assert_eq!(fx.airdrop.claimed_users(), 0);
    fx.conserved();
}

#[test]
fn locked_referrer_is_rejected() {
    let mut fx = Fixture::new(8_000, 800);
    fx.activate(T0);
    let x = fx.member(0);
    let proof = fx.proof_for(0);
    let referrer = addr(20);

    fx.token
        .release(&referrer, 100, T0 - LOCK_WINDOW_SECS - 10)
        .unwrap();
    assert!(fx.token.is_locked(&referrer, T0));

    let err = fx
        .airdrop
        .claim(&mut fx.token, &x, &proof, Some(&referrer), T0)
        .unwrap_err();
    assert!(matches!(err, EmberError::ReferrerLocked(_)));

    // the same claim with no referrer goes through
    fx.airdrop
        .claim(&mut fx.token, &x, &proof, None, T0)
        .unwrap();
    assert_eq!(fx.token.balance_of(&x), 720);
}

#[test]
fn claiming_arms_the_claimant() {
    let mut fx = Fixture::new(8_000, 800);
    fx.activate(T0);
    let x = fx.member(0);
    let proof = fx.proof_for(0);

    assert_eq!(fx.token.time_till_locked(&x, T0), None);
    fx.airdrop
        .claim(&mut fx.token, &x, &proof, None, T0)
        .unwrap();
    assert_eq!(fx.token.time_till_locked(&x, T0), Some(LOCK_WINDOW_SECS));
}

#[test]
fn referral_bonus_withdrawal_flow() {
    let mut fx = Fixture::new(8_000, 800);
    fx.activate(T0);
    let x = fx.member(0);
    let y = fx.member(1);
    let proof_x = fx.proof_for(0);
    let proof_y = fx.proof_for(1);
    let referrer = addr(20);

    fx.airdrop
        .claim(&mut fx.token, &x, &proof_x, Some(&referrer), T0)
        .unwrap();
    fx.airdrop
        .claim(&mut fx.token, &y, &proof_y, Some(&referrer), T0 + 60)
        .unwrap();
    assert_eq!(fx.airdrop.referral_bonus(&referrer), 160);

    fx.airdrop
        .claim_referral_bonus(&mut fx.token, &referrer, T0 + 120)
        .unwrap();
    assert_eq!(fx.token.balance_of(&referrer), 160);
    assert_eq!(fx.airdrop.referral_bonus(&referrer), 0);
    assert_eq!(
        fx.token.time_till_locked(&referrer, T0 + 120),
        Some(LOCK_WINDOW_SECS)
    );

    let err = fx
        .airdrop
        .claim_referral_bonus(&mut fx.token, &referrer, T0 + 180)
        .unwrap_err();
    assert!(matches!(err, EmberError::NothingToClaim));
    fx.conserved();
}

#[test]
fn locked_referrer_cannot_withdraw() {
    let mut fx = Fixture::new(8_000, 800);
    let x = fx.member(0);
    let proof = fx.proof_for(0);
    let referrer = addr(20);

    // the referrer takes a qualifying receipt shortly before activation,
    // so their lock engages while the airdrop window is still open
    fx.token.release(&referrer, 10, T0 - 600).unwrap();
    fx.activate(T0);
    fx.airdrop
        .claim(&mut fx.token, &x, &proof, Some(&referrer), T0)
        .unwrap();

    let late = T0 + LOCK_WINDOW_SECS - 300;
    assert!(fx.token.is_locked(&referrer, late));
    assert!(fx.airdrop.is_active(late));

    let err = fx
        .airdrop
        .claim_referral_bonus(&mut fx.token, &referrer, late)
        .unwrap_err();
    assert!(matches!(err, EmberError::CallerLocked(_)));
    assert_eq!(fx.airdrop.referral_bonus(&referrer), 80);
}

#[test]
fn everything_fails_with_finished_after_the_window() {
    let mut fx = Fixture::new(8_000, 800);
    fx.activate(T0);
    let x = fx.member(0);
    let y = fx.member(1);
    let z = fx.member(2);
    let proof_x = fx.proof_for(0);
    let proof_y = fx.proof_for(1);
    let proof_z = fx.proof_for(2);
    let referrer = addr(20);

    fx.airdrop
        .claim(&mut fx.token, &x, &proof_x, Some(&referrer), T0)
        .unwrap();

    // claims still work at the boundary
    fx.airdrop
        .claim(&mut fx.token, &y, &proof_y, None, T0 + AIRDROP_WINDOW_SECS)
        .unwrap();

    let late = T0 + AIRDROP_WINDOW_SECS + 1;
    assert!(!fx.airdrop.is_active(late));
    let err = fx
        .airdrop
        .claim(&mut fx.token, &z, &proof_z, None, late)
        .unwrap_err();
    assert!(matches!(err, EmberError::AirdropFinished));
    let err = fx
        .airdrop
        .claim_referral_bonus(&mut fx.token, &referrer, late)
        .unwrap_err();
    assert!(matches!(err, EmberError::AirdropFinished));

    // the unwithdrawn bonus stays recorded, and the tokens stay put
    assert_eq!(fx.airdrop.referral_bonus(&referrer), 80);
    fx.conserved();
}

#[test]
fn claimed_tokens_follow_normal_transfer_rules() {
    let mut fx = Fixture::new(8_000, 800);
    fx.activate(T0);
    let x = fx.member(0);
    let proof = fx.proof_for(0);
    let friend = addr(30);

    fx.airdrop
        .claim(&mut fx.token, &x, &proof, None, T0)
        .unwrap();

    // claimed funds are ordinary balance: taxed on the way out
    fx.token.transfer(&x, &friend, 200, T0 + 600).unwrap();
    assert_eq!(fx.token.balance_of(&friend), 180);
    assert_eq!(fx.token.total_supply(), 8_000 - 10);

    // and the claim-armed deadline still bites
    let late = T0 + LOCK_WINDOW_SECS + 1;
    let err = fx.token.transfer(&x, &friend, 1, late).unwrap_err();
    assert!(matches!(err, EmberError::SenderLocked(_)));
    fx.conserved();
}

#[test]
fn single_member_tree_claims_with_an_empty_proof() {
    let mut token = Token::new(TokenConfig {
        owner: owner(),
        treasury: treasury(),
        dev_address: addr(3),
        reward_address: addr(4),
        initial_supply: 1_000,
        rates: TaxRates::default(),
        claim_amount: 500,
    });
    let solo = addr(40);
    let root = MerkleRoot::from_bytes(leaf_hash(&solo));

    let mut airdrop = Airdrop::new(500);
    airdrop.set_merkle_root(&token, &owner(), root).unwrap();
    airdrop.activate(&token, &owner(), T0).unwrap();

    airdrop.claim(&mut token, &solo, &[], None, T0).unwrap();
    assert_eq!(token.balance_of(&solo), 450);
}
