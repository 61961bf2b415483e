//! # Types
//!
//! Shared data structures used across all modules of the crowdloan protocol.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Campaign` is internally stored as two separate ledger entries:
//!
//! - [`CampaignConfig`] — written once at proposal; never mutated.
//! - [`CampaignState`] — rewritten by every lifecycle transition.
//!
//! The public API exposes the reconstructed [`Campaign`] struct for
//! convenience.
//!
//! ### Status as a Finite-State Machine
//!
//! [`CampaignStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Proposed ──► MintOpen ──► ThresholdMet ──► Loaned ──► BurnOpen ──► Finished
//!                  │
//!                  ├──► ThresholdUnmet ──► Finished
//!                  └──► Canceled
//! ```
//!
//! Backward transitions and transitions out of the terminal states
//! (`Finished`, `Canceled`) are rejected by the entry points in `lib.rs`;
//! no other mutation path exists.

use soroban_sdk::{contracttype, Address};

/// Fixed-point precision constant: `1e8` represents 100%.
///
/// Yield rates, late-fee proportions, and daily penalty factors are all
/// expressed against this base.
pub const PRECISION: i128 = 100_000_000;

/// Length of one scheduling day in seconds.
pub const DAY_IN_SECONDS: u64 = 86_400;

/// Lifecycle status of a campaign.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CampaignStatus {
    /// Collateral escrowed; funding not yet open.
    Proposed,
    /// Claim units on sale to the public.
    MintOpen,
    /// Fully subscribed before the window lapsed; loan may be drawn.
    ThresholdMet,
    /// Funding window lapsed below the cap; contributors may recover.
    ThresholdUnmet,
    /// Loan principal disbursed; installments being collected.
    Loaned,
    /// Debt retired; claim holders may settle.
    BurnOpen,
    /// All claim units redeemed.
    Finished,
    /// Withdrawn by the sponsor before any units were sold.
    Canceled,
}

/// Immutable campaign terms, written once at proposal.
///
/// Stored separately from the mutable state so that the high-frequency
/// writes (funding, installments) only rewrite the small state entry.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignConfig {
    pub id: u64,
    /// Borrower ("champion") the sponsor vouches for; receives the loan.
    pub borrower: Address,
    /// Collateral-posting party; the only identity allowed to open funding.
    pub sponsor: Address,
    /// Settlement asset every transfer of this campaign uses.
    pub asset: Address,
    /// Price per claim unit, in asset base units.
    pub unit_price: i128,
    /// Funding cap, in claim units.
    pub max_units: u32,
    /// Annualized yield, fixed-point against [`PRECISION`].
    pub yield_rate: i128,
    /// Sponsor's under-collateralization ratio, snapshotted at proposal.
    pub collateral_ratio: u32,
    /// Fraction of the yield applied as the daily late rate, snapshotted
    /// from the global default at proposal. Fixed-point against
    /// [`PRECISION`].
    pub late_fee_proportion: i128,
    /// Funding-window length in days, counted from `funding_start`.
    pub max_funding_days: u32,
    /// Days between loan draw and the first installment due date.
    pub days_to_first_installment: u32,
    /// Days between consecutive installment due dates.
    pub installment_frequency_days: u32,
    pub number_of_installments: u32,
    /// Collateral escrowed from the sponsor at proposal.
    pub deposit_amount: i128,
}

/// Mutable campaign state, rewritten on every lifecycle transition.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CampaignState {
    pub status: CampaignStatus,
    /// Timestamp `open_funding` was called; 0 until then.
    pub funding_start: u64,
    /// Timestamp the loan was disbursed; 0 until drawn.
    pub loan_drawn_at: u64,
    pub installments_paid: u32,
    /// Running total of installment payments collected (base plus yield).
    pub principal_returned: i128,
    /// Late-payment surcharge pot, drained pro-rata by settlement burns.
    pub yield_accrued: i128,
    /// Running total of base claims paid out to holders.
    /// Never exceeds `principal_returned`.
    pub amount_claimed_by_holders: i128,
    /// One-shot guard for the sponsor's collateral return.
    pub collateral_claimed: bool,
}

/// Full representation of a campaign.
///
/// Used as the public API return type; reconstructed internally from the
/// split `CampaignConfig` + `CampaignState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Campaign {
    pub id: u64,
    pub borrower: Address,
    pub sponsor: Address,
    pub asset: Address,
    pub unit_price: i128,
    pub max_units: u32,
    pub yield_rate: i128,
    pub collateral_ratio: u32,
    pub late_fee_proportion: i128,
    pub max_funding_days: u32,
    pub days_to_first_installment: u32,
    pub installment_frequency_days: u32,
    pub number_of_installments: u32,
    pub deposit_amount: i128,
    pub status: CampaignStatus,
    pub funding_start: u64,
    pub loan_drawn_at: u64,
    pub installments_paid: u32,
    pub principal_returned: i128,
    pub yield_accrued: i128,
    pub amount_claimed_by_holders: i128,
    pub collateral_claimed: bool,
}
