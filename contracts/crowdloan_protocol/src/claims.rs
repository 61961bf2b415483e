//! # Fractional-claim ledger
//!
//! Multi-id unit ledger backing the campaigns: each campaign id has its own
//! fungible claim-unit supply, and each (campaign, holder) pair a balance.
//! A claim unit is a pro-rata right to principal plus yield.
//!
//! Only the lifecycle entry points mint and burn; `balance_of` and
//! `total_supply` are exposed read-only. The metadata URI is a single
//! instance entry settable through the admin surface.

use soroban_sdk::{contracttype, panic_with_error, Address, Env, String};

use crate::storage::{bump_instance, PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD};
use crate::Error;

/// Claim-ledger storage keys (Persistent tier for balances and supplies,
/// Instance for the metadata URI).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ClaimKey {
    /// Units held by an address for a campaign.
    Balance(u64, Address),
    /// Total units minted and not yet burned for a campaign.
    Supply(u64),
    /// Metadata URI for the whole ledger.
    MetadataUri,
}

/// Extend the TTL for a persistent claim-ledger key.
fn bump_persistent(env: &Env, key: &ClaimKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Mint `units` to `holder` for campaign `id`.
pub fn mint(env: &Env, holder: &Address, id: u64, units: i128) {
    let balance_key = ClaimKey::Balance(id, holder.clone());
    let supply_key = ClaimKey::Supply(id);

    let balance: i128 = env.storage().persistent().get(&balance_key).unwrap_or(0);
    let supply: i128 = env.storage().persistent().get(&supply_key).unwrap_or(0);

    env.storage().persistent().set(&balance_key, &(balance + units));
    env.storage().persistent().set(&supply_key, &(supply + units));
    bump_persistent(env, &balance_key);
    bump_persistent(env, &supply_key);
}

/// Burn `units` from `holder` for campaign `id`.
///
/// Panics with [`Error::NothingToClaim`] if the holder's balance is below
/// `units` — lifecycle callers always burn the exact balance they just read.
pub fn burn_from_holder(env: &Env, holder: &Address, id: u64, units: i128) {
    let balance_key = ClaimKey::Balance(id, holder.clone());
    let supply_key = ClaimKey::Supply(id);

    let balance: i128 = env.storage().persistent().get(&balance_key).unwrap_or(0);
    let supply: i128 = env.storage().persistent().get(&supply_key).unwrap_or(0);
    if units > balance || units > supply {
        panic_with_error!(env, Error::NothingToClaim);
    }

    if balance == units {
        env.storage().persistent().remove(&balance_key);
    } else {
        env.storage().persistent().set(&balance_key, &(balance - units));
        bump_persistent(env, &balance_key);
    }
    env.storage().persistent().set(&supply_key, &(supply - units));
    bump_persistent(env, &supply_key);
}

/// Units held by `holder` for campaign `id`.
pub fn balance_of(env: &Env, holder: &Address, id: u64) -> i128 {
    env.storage()
        .persistent()
        .get(&ClaimKey::Balance(id, holder.clone()))
        .unwrap_or(0)
}

/// Total outstanding units for campaign `id`.
pub fn total_supply(env: &Env, id: u64) -> i128 {
    env.storage()
        .persistent()
        .get(&ClaimKey::Supply(id))
        .unwrap_or(0)
}

/// Store the ledger metadata URI.
pub fn set_metadata_uri(env: &Env, uri: &String) {
    env.storage().instance().set(&ClaimKey::MetadataUri, uri);
    bump_instance(env);
}

/// Current ledger metadata URI, if one has been set.
pub fn metadata_uri(env: &Env) -> Option<String> {
    bump_instance(env);
    env.storage().instance().get(&ClaimKey::MetadataUri)
}
