//! # Storage
//!
//! Typed helpers over Soroban's two storage tiers used by the protocol:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key              | Type   | Description                           |
//! |------------------|--------|---------------------------------------|
//! | `CampaignCount`  | `u64`  | Auto-increment campaign ID counter    |
//! | `DefaultLateFee` | `i128` | Global default late-fee proportion    |
//! | `PenaltyEnabled` | `bool` | Late-penalty accrual toggle           |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day
//! remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key              | Type             | Description                    |
//! |------------------|------------------|--------------------------------|
//! | `CampConfig(id)` | `CampaignConfig` | Immutable campaign terms       |
//! | `CampState(id)`  | `CampaignState`  | Mutable campaign state         |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days
//! remaining.
//!
//! The store performs no validation of its own — the lifecycle entry points
//! in `lib.rs` are its only caller and enforce every precondition before a
//! write. Records are never deleted; terminal campaigns persist for audits.

use soroban_sdk::{contracttype, panic_with_error, Env};

use crate::types::{Campaign, CampaignConfig, CampaignState};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
/// Shared with the claim-ledger and expiry-index keys.
pub(crate) const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
pub(crate) const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

/// Campaign-record storage keys.
///
/// Instance-tier keys live as long as the contract and are extended
/// together. Persistent-tier keys hold per-campaign data with independent
/// TTLs. Role storage lives in `RbacKey` (rbac.rs), claim-ledger storage in
/// `ClaimKey` (claims.rs), and the expiry index in `ExpiryKey` (expiry.rs).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Global auto-increment counter for campaign IDs (Instance).
    CampaignCount,
    /// Global default late-fee proportion, snapshotted at proposal (Instance).
    DefaultLateFee,
    /// Whether late-payment penalties accrue at all (Instance).
    PenaltyEnabled,
    /// Immutable campaign terms keyed by ID (Persistent).
    CampConfig(u64),
    /// Mutable campaign state keyed by ID (Persistent).
    CampState(u64),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

/// Extend instance storage TTL if it falls below the threshold.
pub fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Atomically reads, increments, and stores the campaign counter.
/// Returns the ID to use for the *current* campaign (pre-increment value).
pub fn get_and_increment_campaign_id(env: &Env) -> u64 {
    bump_instance(env);
    let current: u64 = env
        .storage()
        .instance()
        .get(&DataKey::CampaignCount)
        .unwrap_or(0);
    env.storage()
        .instance()
        .set(&DataKey::CampaignCount, &(current + 1));
    current
}

/// Store the global default late-fee proportion.
pub fn set_default_late_fee(env: &Env, proportion: &i128) {
    env.storage()
        .instance()
        .set(&DataKey::DefaultLateFee, proportion);
    bump_instance(env);
}

/// Global default late-fee proportion; `0` until an admin sets one.
pub fn default_late_fee(env: &Env) -> i128 {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::DefaultLateFee)
        .unwrap_or(0)
}

/// Store the late-penalty accrual toggle.
pub fn set_penalty_enabled(env: &Env, enabled: bool) {
    env.storage()
        .instance()
        .set(&DataKey::PenaltyEnabled, &enabled);
    bump_instance(env);
}

/// Whether late-payment penalties accrue. Disabled until an admin opts in.
pub fn penalty_enabled(env: &Env) -> bool {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::PenaltyEnabled)
        .unwrap_or(false)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

/// Extend the TTL for a persistent storage key.
fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save both the immutable terms and the initial state for a new campaign.
pub fn save_campaign(env: &Env, config: &CampaignConfig, state: &CampaignState) {
    let config_key = DataKey::CampConfig(config.id);
    let state_key = DataKey::CampState(config.id);

    env.storage().persistent().set(&config_key, config);
    env.storage().persistent().set(&state_key, state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

/// Load the full `Campaign` by combining config and state.
pub fn load_campaign(env: &Env, id: u64) -> Campaign {
    let config = load_campaign_config(env, id);
    let state = load_campaign_state(env, id);
    Campaign {
        id: config.id,
        borrower: config.borrower,
        sponsor: config.sponsor,
        asset: config.asset,
        unit_price: config.unit_price,
        max_units: config.max_units,
        yield_rate: config.yield_rate,
        collateral_ratio: config.collateral_ratio,
        late_fee_proportion: config.late_fee_proportion,
        max_funding_days: config.max_funding_days,
        days_to_first_installment: config.days_to_first_installment,
        installment_frequency_days: config.installment_frequency_days,
        number_of_installments: config.number_of_installments,
        deposit_amount: config.deposit_amount,
        status: state.status,
        funding_start: state.funding_start,
        loan_drawn_at: state.loan_drawn_at,
        installments_paid: state.installments_paid,
        principal_returned: state.principal_returned,
        yield_accrued: state.yield_accrued,
        amount_claimed_by_holders: state.amount_claimed_by_holders,
        collateral_claimed: state.collateral_claimed,
    }
}

/// Load only the immutable campaign terms.
pub fn load_campaign_config(env: &Env, id: u64) -> CampaignConfig {
    let key = DataKey::CampConfig(id);
    let config: CampaignConfig = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| panic_with_error!(env, Error::CampaignNotFound));
    bump_persistent(env, &key);
    config
}

/// Load only the mutable campaign state.
pub fn load_campaign_state(env: &Env, id: u64) -> CampaignState {
    let key = DataKey::CampState(id);
    let state: CampaignState = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| panic_with_error!(env, Error::CampaignNotFound));
    bump_persistent(env, &key);
    state
}

/// Save only the mutable campaign state.
pub fn save_campaign_state(env: &Env, id: u64, state: &CampaignState) {
    let key = DataKey::CampState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}
