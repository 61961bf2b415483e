//! # Threshold-expiry index
//!
//! Day-bucketed index of campaigns whose funding window lapses on a given
//! day, backing the two-phase `check_expiry` / `perform_expiry` sweep
//! driven by an external trigger.
//!
//! `open_funding` registers each campaign in the bucket for
//! `funding_start / DAY + max_funding_days`. The perform phase drains a
//! bucket exactly once — the entry is deleted after processing, so repeat
//! invocations for the same day are no-ops.
//!
//! Bucket entries are an index only, never ownership: the sweep re-checks
//! each campaign's status before touching it, because a campaign may have
//! reached its threshold (or been canceled) after registration.

use soroban_sdk::{contracttype, vec, Env, Vec};

use crate::storage::{PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD};

/// Expiry-index storage keys (Persistent tier).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExpiryKey {
    /// Campaign ids whose funding window lapses on this day number.
    Bucket(u64),
}

/// Append a campaign id to the bucket for `day`.
pub fn register(env: &Env, day: u64, id: u64) {
    let key = ExpiryKey::Bucket(day);
    let mut bucket: Vec<u64> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| vec![env]);
    bucket.push_back(id);
    env.storage().persistent().set(&key, &bucket);
    env.storage()
        .persistent()
        .extend_ttl(&key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Campaign ids registered for `day` without consuming the bucket.
pub fn peek(env: &Env, day: u64) -> Vec<u64> {
    env.storage()
        .persistent()
        .get(&ExpiryKey::Bucket(day))
        .unwrap_or_else(|| vec![env])
}

/// Remove and return the bucket for `day`. Empty on repeat calls.
pub fn drain(env: &Env, day: u64) -> Vec<u64> {
    let key = ExpiryKey::Bucket(day);
    let bucket: Vec<u64> = env
        .storage()
        .persistent()
        .get(&key)
        .unwrap_or_else(|| vec![env]);
    if !bucket.is_empty() {
        env.storage().persistent().remove(&key);
    }
    bucket
}
