//! # Events
//!
//! Typed payloads published on every state transition. Each event carries a
//! short-symbol leading topic plus the campaign id as the second topic, so
//! off-chain consumers (see `backend/indexer`) can filter per campaign
//! without decoding the data payload.
//!
//! | Topic       | Payload                |
//! |-------------|------------------------|
//! | `proposed`  | [`CampaignProposed`]   |
//! | `opened`    | [`FundingOpened`]      |
//! | `canceled`  | [`CampaignCanceled`]   |
//! | `funded`    | [`UnitsFunded`]        |
//! | `expired`   | [`CampaignExpired`]    |
//! | `drawn`     | [`LoanDrawn`]          |
//! | `repaid`    | [`InstallmentPaid`]    |
//! | `collat`    | [`CollateralClaimed`]  |
//! | `settled`   | [`ClaimSettled`]       |
//! | `recovered` | [`ClaimRecovered`]     |
//! | `residual`  | [`ResidualClaimed`]    |
//!
//! RBAC publishes its own `role_set` / `role_del` events (see `rbac.rs`),
//! and metadata updates publish under `meta`.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignProposed {
    pub campaign_id: u64,
    pub borrower: Address,
    pub sponsor: Address,
    pub asset: Address,
    pub unit_price: i128,
    pub max_units: u32,
    pub deposit_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundingOpened {
    pub campaign_id: u64,
    pub funding_start: u64,
    /// Day number whose expiry sweep will force-close the window.
    pub expiry_day: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignCanceled {
    pub campaign_id: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnitsFunded {
    pub campaign_id: u64,
    pub funder: Address,
    pub units: u32,
    pub amount: i128,
    pub threshold_met: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignExpired {
    pub campaign_id: u64,
    pub day: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoanDrawn {
    pub campaign_id: u64,
    pub borrower: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InstallmentPaid {
    pub campaign_id: u64,
    /// 1-based installment index.
    pub index: u32,
    pub amount: i128,
    pub penalty: i128,
    /// Whether this call retired the debt and opened settlement.
    pub finalized: bool,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollateralClaimed {
    pub campaign_id: u64,
    pub sponsor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimSettled {
    pub campaign_id: u64,
    pub holder: Address,
    pub units_burned: i128,
    pub base_amount: i128,
    pub yield_amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimRecovered {
    pub campaign_id: u64,
    pub holder: Address,
    pub units_burned: i128,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResidualClaimed {
    pub campaign_id: u64,
    pub borrower: Address,
    pub amount: i128,
}

pub fn campaign_proposed(env: &Env, ev: CampaignProposed) {
    env.events()
        .publish((symbol_short!("proposed"), ev.campaign_id), ev);
}

pub fn funding_opened(env: &Env, ev: FundingOpened) {
    env.events()
        .publish((symbol_short!("opened"), ev.campaign_id), ev);
}

pub fn campaign_canceled(env: &Env, ev: CampaignCanceled) {
    env.events()
        .publish((symbol_short!("canceled"), ev.campaign_id), ev);
}

pub fn units_funded(env: &Env, ev: UnitsFunded) {
    env.events()
        .publish((symbol_short!("funded"), ev.campaign_id), ev);
}

pub fn campaign_expired(env: &Env, ev: CampaignExpired) {
    env.events()
        .publish((symbol_short!("expired"), ev.campaign_id), ev);
}

pub fn loan_drawn(env: &Env, ev: LoanDrawn) {
    env.events()
        .publish((symbol_short!("drawn"), ev.campaign_id), ev);
}

pub fn installment_paid(env: &Env, ev: InstallmentPaid) {
    env.events()
        .publish((symbol_short!("repaid"), ev.campaign_id), ev);
}

pub fn collateral_claimed(env: &Env, ev: CollateralClaimed) {
    env.events()
        .publish((symbol_short!("collat"), ev.campaign_id), ev);
}

pub fn claim_settled(env: &Env, ev: ClaimSettled) {
    env.events()
        .publish((symbol_short!("settled"), ev.campaign_id), ev);
}

pub fn claim_recovered(env: &Env, ev: ClaimRecovered) {
    env.events()
        .publish((symbol_short!("recovered"), ev.campaign_id), ev);
}

pub fn residual_claimed(env: &Env, ev: ResidualClaimed) {
    env.events()
        .publish((symbol_short!("residual"), ev.campaign_id), ev);
}

pub fn metadata_updated(env: &Env, uri: &String) {
    env.events().publish((symbol_short!("meta"),), uri.clone());
}
