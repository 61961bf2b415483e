//! # Settlement
//!
//! Funds-movement helpers shared by every lifecycle entry point.
//!
//! Inbound transfers are pull-based: the payer must have granted the
//! contract a sufficient allowance beforehand, and the allowance is checked
//! explicitly first — the contract never raises it on the caller's behalf.
//! Outbound transfers push from the contract's own balance.
//!
//! Soroban reverts all storage writes and transfers when an invocation
//! panics, so each entry point is all-or-nothing without further
//! bookkeeping here.

use soroban_sdk::{panic_with_error, token, Address, Env};

use crate::Error;

/// Pull `amount` of `asset` from `from` into the contract's escrow.
///
/// Panics with [`Error::InsufficientAllowance`] before attempting the
/// transfer when the standing allowance does not cover `amount`.
pub fn pull(env: &Env, asset: &Address, from: &Address, amount: i128) {
    if amount <= 0 {
        return;
    }
    let contract = env.current_contract_address();
    let client = token::Client::new(env, asset);

    if client.allowance(from, &contract) < amount {
        panic_with_error!(env, Error::InsufficientAllowance);
    }
    client.transfer_from(&contract, from, &contract, &amount);
}

/// Push `amount` of `asset` from the contract's escrow to `to`.
pub fn push(env: &Env, asset: &Address, to: &Address, amount: i128) {
    if amount <= 0 {
        return;
    }
    let contract = env.current_contract_address();
    token::Client::new(env, asset).transfer(&contract, to, &amount);
}
